// journey/store.rs - Journey state container with subscriptions

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use log::debug;

use super::explore::{merge_unique, suggest_next_room};
use super::{JourneyAction, JourneyState, TransitionPhase};
use crate::dungeon::constants::CENTRAL_ROOM_ID;
use crate::dungeon::door::get_room_doors;
use crate::dungeon::helpers::{
    get_dungeon_door_by_id, get_dungeon_room_by_id, update_dungeon_door_state,
};
use crate::error_handling::{DungeonError, Result};
use crate::types::{DungeonData, RoomId};

pub type SubscriptionId = u64;

type Listener = Arc<dyn Fn(&JourneyState) + Send + Sync>;

/// Owns the journey state. Every change goes through [`JourneyStore::dispatch`];
/// subscribers see the new state after the write lock is released.
#[derive(Default)]
pub struct JourneyStore {
    state: RwLock<JourneyState>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl JourneyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `dungeon`, not yet initialised.
    pub fn with_dungeon(dungeon: DungeonData) -> Result<Self> {
        let store = Self::new();
        store.dispatch(JourneyAction::LoadDungeon(Arc::new(dungeon)))?;
        Ok(store)
    }

    pub fn get_state(&self) -> Result<JourneyState> {
        let state = self.state.read().map_err(|_| DungeonError::LockError)?;
        Ok(state.clone())
    }

    pub fn dungeon(&self) -> Result<Option<Arc<DungeonData>>> {
        let state = self.state.read().map_err(|_| DungeonError::LockError)?;
        Ok(state.dungeon.clone())
    }

    pub fn current_room_id(&self) -> Result<RoomId> {
        let state = self.state.read().map_err(|_| DungeonError::LockError)?;
        Ok(state.current_room_id)
    }

    /// Apply `action`. On error the state is left unchanged and nobody is notified.
    pub fn dispatch(&self, action: JourneyAction) -> Result<()> {
        let snapshot = {
            let mut state = self.state.write().map_err(|_| DungeonError::LockError)?;
            let mut next = state.clone();
            reduce(&mut next, action)?;
            *state = next;
            state.clone()
        };
        self.notify(&snapshot)
    }

    pub fn subscribe<F>(&self, listener: F) -> Result<SubscriptionId>
    where
        F: Fn(&JourneyState) + Send + Sync + 'static,
    {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        let mut listeners = self.listeners.lock().map_err(|_| DungeonError::LockError)?;
        listeners.push((id, Arc::new(listener)));
        Ok(id)
    }

    /// Returns whether a listener was removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool> {
        let mut listeners = self.listeners.lock().map_err(|_| DungeonError::LockError)?;
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        Ok(listeners.len() != before)
    }

    fn notify(&self, state: &JourneyState) -> Result<()> {
        // Listeners may dispatch or subscribe, so call them without holding the list
        let listeners: Vec<Listener> = {
            let listeners = self.listeners.lock().map_err(|_| DungeonError::LockError)?;
            listeners.iter().map(|(_, listener)| Arc::clone(listener)).collect()
        };
        for listener in listeners {
            listener(state);
        }
        Ok(())
    }
}

fn loaded_dungeon(state: &JourneyState) -> Result<&Arc<DungeonData>> {
    state.dungeon.as_ref().ok_or(DungeonError::NoDungeon)
}

fn reset_journey(state: &mut JourneyState) {
    state.is_initialised = false;
    state.current_room_id = CENTRAL_ROOM_ID;
    state.visited_room_ids.clear();
    state.room_history.clear();
    state.next_room_id = None;
    state.next_door_id = None;
    state.visible_room_ids.clear();
    state.visible_door_ids.clear();
    state.phase = TransitionPhase::Idle;
}

fn apply_next_room(state: &mut JourneyState) -> Result<()> {
    let dungeon = Arc::clone(loaded_dungeon(state)?);
    let (seed, suggestion) = suggest_next_room(
        &dungeon,
        state.seed,
        state.current_room_id,
        &state.visited_room_ids,
        &state.room_history,
    );
    state.seed = seed;
    state.next_room_id = suggestion.as_ref().map(|s| s.room_id);
    state.next_door_id = suggestion.map(|s| s.door_id);
    Ok(())
}

fn reduce(state: &mut JourneyState, action: JourneyAction) -> Result<()> {
    match action {
        JourneyAction::LoadDungeon(dungeon) => {
            state.seed = dungeon.seed;
            state.dungeon = Some(dungeon);
            reset_journey(state);
        }
        JourneyAction::ExtendDungeon(dungeon) => {
            state.dungeon = Some(dungeon);
        }
        JourneyAction::Initialise => {
            if state.is_initialised {
                return Ok(());
            }
            let dungeon = Arc::clone(loaded_dungeon(state)?);
            let room = get_dungeon_room_by_id(&dungeon, CENTRAL_ROOM_ID)
                .ok_or(DungeonError::RoomNotFound(CENTRAL_ROOM_ID))?;

            reset_journey(state);
            state.current_room_id = room.id;
            state.visited_room_ids.insert(room.id);
            state.room_history.push(room.id);
            state.visible_room_ids = vec![room.id];
            state.visible_door_ids = get_room_doors(&dungeon, room.id)
                .into_iter()
                .map(|door| door.id.clone())
                .collect();
            state.is_initialised = true;
            apply_next_room(state)?;
            debug!("Journey initialised in room {}", room.id);
        }
        JourneyAction::SetDoorOpen { door_id, open } => {
            let dungeon = loaded_dungeon(state)?;
            if get_dungeon_door_by_id(dungeon, &door_id).is_none() {
                return Err(DungeonError::DoorNotFound(door_id));
            }
            state.dungeon = Some(Arc::new(update_dungeon_door_state(dungeon, &door_id, open)));
        }
        JourneyAction::ShowEntities { room_ids, door_ids, clear } => {
            if clear {
                state.visible_room_ids = merge_unique(&[], &room_ids);
                state.visible_door_ids = merge_unique(&[], &door_ids);
            } else {
                state.visible_room_ids = merge_unique(&state.visible_room_ids, &room_ids);
                state.visible_door_ids = merge_unique(&state.visible_door_ids, &door_ids);
            }
        }
        JourneyAction::EnterRoom(room_id) => {
            state.current_room_id = room_id;
            state.visited_room_ids.insert(room_id);
            state.room_history.push(room_id);
        }
        JourneyAction::ApplyNextRoom => apply_next_room(state)?,
        JourneyAction::SetPhase(phase) => state.phase = phase,
        JourneyAction::AbortTransition { previous, door_id } => {
            let dungeon = state.dungeon.take();
            *state = *previous;
            state.phase = TransitionPhase::Idle;
            state.dungeon = match dungeon {
                Some(dungeon)
                    if get_dungeon_door_by_id(&dungeon, &door_id).is_some_and(|door| door.is_open) =>
                {
                    Some(Arc::new(update_dungeon_door_state(&dungeon, &door_id, false)))
                }
                other => other,
            };
        }
        JourneyAction::Reset => reset_journey(state),
    }
    Ok(())
}
