// journey/navigator.rs - Door transitions between rooms

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};

use super::presenter::JourneyPresenter;
use super::store::JourneyStore;
use super::{JourneyAction, JourneyState, TransitionPhase};
use crate::dungeon::door::{get_room_doors, get_room_doors_excluding};
use crate::dungeon::helpers::{
    get_dungeon_connecting_room, get_dungeon_door_by_id, get_dungeon_room_by_id,
};
use crate::error_handling::{DungeonError, Result};
use crate::types::{Door, DoorId, DungeonData, RoomId};

const DEFAULT_UNMOUNT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: RoomId, to: RoomId },
    /// Another transition was in flight; nothing happened
    AlreadyMoving,
}

#[derive(Debug, Clone)]
pub struct NavigatorBuilder {
    unmount_timeout: Duration,
}

impl Default for NavigatorBuilder {
    fn default() -> Self {
        Self {
            unmount_timeout: DEFAULT_UNMOUNT_TIMEOUT,
        }
    }
}

impl NavigatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound on waiting for the old room to unmount.
    pub fn unmount_timeout(mut self, timeout: Duration) -> Self {
        self.unmount_timeout = timeout;
        self
    }

    pub fn build<P: JourneyPresenter>(self, store: Arc<JourneyStore>, presenter: P) -> Navigator<P> {
        Navigator {
            store,
            presenter,
            moving: AtomicBool::new(false),
            unmount_timeout: self.unmount_timeout,
        }
    }
}

/// Clears the in-flight flag however the transition ends.
struct MovingGuard<'a>(&'a AtomicBool);

impl Drop for MovingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Moves the player through doors, one transition at a time.
pub struct Navigator<P> {
    store: Arc<JourneyStore>,
    presenter: P,
    moving: AtomicBool,
    unmount_timeout: Duration,
}

impl<P: JourneyPresenter> Navigator<P> {
    pub fn new(store: Arc<JourneyStore>, presenter: P) -> Self {
        NavigatorBuilder::default().build(store, presenter)
    }

    pub fn store(&self) -> &Arc<JourneyStore> {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn is_moving(&self) -> bool {
        self.moving.load(Ordering::SeqCst)
    }

    pub fn initialise(&self) -> Result<()> {
        self.store.dispatch(JourneyAction::Initialise)
    }

    /// Walk through the currently suggested door, if there is one.
    pub async fn move_to_next_room(&self) -> Result<Option<MoveOutcome>> {
        let state = self.store.get_state()?;
        match state.next_door_id {
            Some(door_id) => self.move_through_door(&door_id).await.map(Some),
            None => Ok(None),
        }
    }

    /// Open `door_id`, cross into the room behind it and close it again.
    ///
    /// Returns `AlreadyMoving` without touching anything while another
    /// transition is running. A failed transition leaves the journey in the
    /// room it started from with the door closed.
    pub async fn move_through_door(&self, door_id: &str) -> Result<MoveOutcome> {
        if self
            .moving
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Already moving, ignoring door {}", door_id);
            return Ok(MoveOutcome::AlreadyMoving);
        }
        let _guard = MovingGuard(&self.moving);

        let before = self.store.get_state()?;
        let result = self.transition(door_id).await;
        if let Err(e) = &result {
            if e.is_malformed_graph() {
                error!("Dungeon graph is malformed, aborting move: {}", e);
            } else {
                warn!("Move through door {} aborted: {}", door_id, e);
            }
            self.roll_back(before, door_id).await?;
        }
        result
    }

    /// Undo whatever part of a transition already happened.
    async fn roll_back(&self, before: JourneyState, door_id: &str) -> Result<()> {
        let state = self.store.get_state()?;
        let door_open = state
            .dungeon
            .as_deref()
            .and_then(|dungeon| get_dungeon_door_by_id(dungeon, door_id))
            .is_some_and(|door| door.is_open);
        if door_open && !self.presenter.set_door_open(door_id, false).await {
            warn!("Door {} could not be closed while rolling back", door_id);
        }

        if state.current_room_id != before.current_room_id {
            let center = state
                .dungeon
                .as_deref()
                .and_then(|dungeon| get_dungeon_room_by_id(dungeon, before.current_room_id))
                .map(|room| room.center());
            self.presenter.move_camera(center).await;
        }

        debug!("Rolled back to room {}", before.current_room_id);
        self.store.dispatch(JourneyAction::AbortTransition {
            previous: Box::new(before),
            door_id: door_id.to_string(),
        })
    }

    fn set_phase(&self, phase: TransitionPhase) -> Result<()> {
        self.store.dispatch(JourneyAction::SetPhase(phase))
    }

    fn current_dungeon(&self) -> Result<Arc<DungeonData>> {
        self.store.dungeon()?.ok_or(DungeonError::NoDungeon)
    }

    async fn close_door(&self, door_id: &str) -> Result<()> {
        if !self.presenter.set_door_open(door_id, false).await {
            error!("Presenter failed to close door {}", door_id);
            return Err(DungeonError::PresenterFailed(format!("door {} did not close", door_id)));
        }
        self.store.dispatch(JourneyAction::SetDoorOpen {
            door_id: door_id.to_string(),
            open: false,
        })
    }

    async fn transition(&self, door_id: &str) -> Result<MoveOutcome> {
        let state = self.store.get_state()?;
        if !state.is_initialised {
            error!("Journey not initialised, cannot use door {}", door_id);
            return Err(DungeonError::NotInitialised);
        }
        let from = state.current_room_id;
        let dungeon = self.current_dungeon()?;

        let Some(door) = get_dungeon_door_by_id(&dungeon, door_id).cloned() else {
            error!("Door {} not found", door_id);
            return Err(DungeonError::DoorNotFound(door_id.to_string()));
        };
        if !door.touches(from) {
            error!("Door {} does not lead out of room {}", door_id, from);
            return Err(DungeonError::DoorNotInRoom { door_id: door.id, room_id: from });
        }

        // Open the door while the camera moves to it
        debug!("Opening door {}", door_id);
        self.set_phase(TransitionPhase::OpeningDoor)?;
        let (opened, ()) = futures::join!(
            self.presenter.set_door_open(door_id, true),
            self.presenter.move_camera(Some(door.position))
        );
        if !opened {
            error!("Presenter failed to open door {}", door_id);
            return Err(DungeonError::PresenterFailed(format!("door {} did not open", door_id)));
        }
        self.store.dispatch(JourneyAction::SetDoorOpen {
            door_id: door_id.to_string(),
            open: true,
        })?;

        let dungeon = self.current_dungeon()?;
        let Some(next_room) = get_dungeon_connecting_room(&dungeon, from, &door).cloned() else {
            error!("Door {} leads nowhere from room {}", door_id, from);
            return Err(DungeonError::BrokenDoor { door_id: door.id, room_id: from });
        };
        let to = next_room.id;
        let next_doors = door_ids(get_room_doors(&dungeon, to));

        // Both rooms are on screen while crossing
        self.store.dispatch(JourneyAction::ShowEntities {
            room_ids: vec![to],
            door_ids: next_doors.clone(),
            clear: false,
        })?;
        if state.has_visited(to) {
            debug!("Returning to room {}", to);
        }

        debug!("Entering room {}", to);
        self.set_phase(TransitionPhase::Arriving)?;
        self.presenter.move_camera(Some(next_room.center())).await;
        self.store.dispatch(JourneyAction::EnterRoom(to))?;

        debug!("Closing door {}", door_id);
        self.set_phase(TransitionPhase::ClosingDoor)?;
        self.close_door(door_id).await?;

        debug!("Unmounting room {}", from);
        self.set_phase(TransitionPhase::Unmounting)?;
        let stale = door_ids(get_room_doors_excluding(&dungeon, from, Some(to)));
        match tokio::time::timeout(self.unmount_timeout, self.presenter.unmount_room(from, &stale)).await {
            Ok(true) => {}
            Ok(false) => warn!("Room {} did not unmount cleanly", from),
            Err(_) => warn!(
                "Unmounting room {} timed out after {:?}",
                from, self.unmount_timeout
            ),
        }

        self.store.dispatch(JourneyAction::ShowEntities {
            room_ids: vec![to],
            door_ids: next_doors,
            clear: true,
        })?;
        self.store.dispatch(JourneyAction::ApplyNextRoom)?;
        self.set_phase(TransitionPhase::Idle)?;

        debug!(
            "Moved from room {} to room {}, next door {:?}",
            from,
            to,
            self.store.get_state()?.next_door_id
        );
        Ok(MoveOutcome::Moved { from, to })
    }
}

fn door_ids(doors: Vec<&Door>) -> Vec<DoorId> {
    doors.into_iter().map(|door| door.id.clone()).collect()
}
