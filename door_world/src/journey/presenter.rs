// journey/presenter.rs - Rendering side of a door transition
//
// The navigator never draws anything. It asks a presenter to animate doors,
// move the camera and tear down rooms, and waits on the returned futures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use log::{debug, error};

use crate::error_handling::{DungeonError, Result};
use crate::types::{DoorId, Position, RoomId};

/// Completion signals for everything a transition animates.
pub trait JourneyPresenter: Send + Sync {
    /// Animate a door; `false` means the door could not be driven.
    fn set_door_open<'a>(&'a self, door_id: &'a str, open: bool) -> BoxFuture<'a, bool>;

    fn move_camera(&self, position: Option<Position>) -> BoxFuture<'_, ()>;

    /// Remove a room and the given doors from the scene.
    fn unmount_room<'a>(&'a self, room_id: RoomId, stale_door_ids: &'a [DoorId]) -> BoxFuture<'a, bool>;
}

impl<T: JourneyPresenter + ?Sized> JourneyPresenter for Arc<T> {
    fn set_door_open<'a>(&'a self, door_id: &'a str, open: bool) -> BoxFuture<'a, bool> {
        (**self).set_door_open(door_id, open)
    }

    fn move_camera(&self, position: Option<Position>) -> BoxFuture<'_, ()> {
        (**self).move_camera(position)
    }

    fn unmount_room<'a>(&'a self, room_id: RoomId, stale_door_ids: &'a [DoorId]) -> BoxFuture<'a, bool> {
        (**self).unmount_room(room_id, stale_door_ids)
    }
}

// ============================================================================
// PER-ENTITY HANDLES
// ============================================================================

pub trait DoorPresenter: Send + Sync {
    fn set_open(&self, open: bool) -> BoxFuture<'_, ()>;
    fn unmount(&self) -> BoxFuture<'_, ()>;
}

pub trait RoomPresenter: Send + Sync {
    fn unmount(&self) -> BoxFuture<'_, ()>;
}

pub trait CameraPresenter: Send + Sync {
    fn move_to(&self, position: Option<Position>) -> BoxFuture<'_, ()>;
}

/// Routes presenter calls to the handles of mounted doors and rooms.
///
/// A call for an entity with no registered handle reports `false`.
#[derive(Default)]
pub struct PresenterRegistry {
    doors: RwLock<HashMap<DoorId, Arc<dyn DoorPresenter>>>,
    rooms: RwLock<HashMap<RoomId, Arc<dyn RoomPresenter>>>,
    camera: RwLock<Option<Arc<dyn CameraPresenter>>>,
}

impl PresenterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_door(&self, door_id: impl Into<DoorId>, handle: Arc<dyn DoorPresenter>) -> Result<()> {
        let mut doors = self.doors.write().map_err(|_| DungeonError::LockError)?;
        doors.insert(door_id.into(), handle);
        Ok(())
    }

    pub fn unregister_door(&self, door_id: &str) -> Result<()> {
        let mut doors = self.doors.write().map_err(|_| DungeonError::LockError)?;
        doors.remove(door_id);
        Ok(())
    }

    pub fn register_room(&self, room_id: RoomId, handle: Arc<dyn RoomPresenter>) -> Result<()> {
        let mut rooms = self.rooms.write().map_err(|_| DungeonError::LockError)?;
        rooms.insert(room_id, handle);
        Ok(())
    }

    pub fn unregister_room(&self, room_id: RoomId) -> Result<()> {
        let mut rooms = self.rooms.write().map_err(|_| DungeonError::LockError)?;
        rooms.remove(&room_id);
        Ok(())
    }

    pub fn set_camera(&self, handle: Arc<dyn CameraPresenter>) -> Result<()> {
        let mut camera = self.camera.write().map_err(|_| DungeonError::LockError)?;
        *camera = Some(handle);
        Ok(())
    }

    pub fn has_door(&self, door_id: &str) -> bool {
        self.door(door_id).is_some()
    }

    pub fn has_room(&self, room_id: RoomId) -> bool {
        self.room(room_id).is_some()
    }

    fn door(&self, door_id: &str) -> Option<Arc<dyn DoorPresenter>> {
        self.doors.read().ok()?.get(door_id).cloned()
    }

    fn room(&self, room_id: RoomId) -> Option<Arc<dyn RoomPresenter>> {
        self.rooms.read().ok()?.get(&room_id).cloned()
    }
}

impl JourneyPresenter for PresenterRegistry {
    fn set_door_open<'a>(&'a self, door_id: &'a str, open: bool) -> BoxFuture<'a, bool> {
        async move {
            match self.door(door_id) {
                Some(handle) => {
                    handle.set_open(open).await;
                    true
                }
                None => {
                    error!("Missing presenter for door {}", door_id);
                    false
                }
            }
        }
        .boxed()
    }

    fn move_camera(&self, position: Option<Position>) -> BoxFuture<'_, ()> {
        async move {
            let camera = self.camera.read().ok().and_then(|camera| camera.clone());
            if let Some(camera) = camera {
                camera.move_to(position).await;
            }
        }
        .boxed()
    }

    fn unmount_room<'a>(&'a self, room_id: RoomId, stale_door_ids: &'a [DoorId]) -> BoxFuture<'a, bool> {
        async move {
            let Some(room) = self.room(room_id) else {
                debug!("Missing presenter for room {}", room_id);
                return false;
            };
            let doors: Option<Vec<_>> = stale_door_ids.iter().map(|id| self.door(id)).collect();
            let Some(doors) = doors else {
                error!("Missing door presenter while unmounting room {}", room_id);
                return false;
            };

            let door_unmounts = join_all(doors.iter().map(|door| door.unmount()));
            futures::join!(room.unmount(), door_unmounts);

            let unregistered = stale_door_ids
                .iter()
                .try_for_each(|door_id| self.unregister_door(door_id))
                .and_then(|()| self.unregister_room(room_id));
            if let Err(e) = unregistered {
                error!("Room {} unmounted but its handles could not be released: {}", room_id, e);
                return false;
            }
            true
        }
        .boxed()
    }
}

// ============================================================================
// HEADLESS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    DoorOpened(DoorId),
    DoorClosed(DoorId),
    CameraMoved(Option<Position>),
    RoomUnmounted { room_id: RoomId, door_ids: Vec<DoorId> },
}

/// Presenter with no scene: records every call, optionally taking time.
#[derive(Debug)]
pub struct HeadlessPresenter {
    events: Mutex<Vec<PresenterEvent>>,
    animation_delay: Option<Duration>,
    unmount_delay: Option<Duration>,
    failing_door: Option<DoorId>,
    failing_close: Option<DoorId>,
    unmount_succeeds: bool,
}

impl Default for HeadlessPresenter {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            animation_delay: None,
            unmount_delay: None,
            failing_door: None,
            failing_close: None,
            unmount_succeeds: true,
        }
    }
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every door and camera animation takes `delay`.
    pub fn with_animation_delay(mut self, delay: Duration) -> Self {
        self.animation_delay = Some(delay);
        self
    }

    pub fn with_unmount_delay(mut self, delay: Duration) -> Self {
        self.unmount_delay = Some(delay);
        self
    }

    /// Report failure for any action on `door_id`.
    pub fn with_failing_door(mut self, door_id: impl Into<DoorId>) -> Self {
        self.failing_door = Some(door_id.into());
        self
    }

    /// `door_id` opens but refuses to close.
    pub fn with_failing_close(mut self, door_id: impl Into<DoorId>) -> Self {
        self.failing_close = Some(door_id.into());
        self
    }

    pub fn with_failing_unmount(mut self) -> Self {
        self.unmount_succeeds = false;
        self
    }

    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    fn record(&self, event: PresenterEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    async fn pause(delay: Option<Duration>) {
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl JourneyPresenter for HeadlessPresenter {
    fn set_door_open<'a>(&'a self, door_id: &'a str, open: bool) -> BoxFuture<'a, bool> {
        async move {
            if self.failing_door.as_deref() == Some(door_id)
                || (!open && self.failing_close.as_deref() == Some(door_id))
            {
                return false;
            }
            Self::pause(self.animation_delay).await;
            self.record(if open {
                PresenterEvent::DoorOpened(door_id.to_string())
            } else {
                PresenterEvent::DoorClosed(door_id.to_string())
            });
            true
        }
        .boxed()
    }

    fn move_camera(&self, position: Option<Position>) -> BoxFuture<'_, ()> {
        async move {
            Self::pause(self.animation_delay).await;
            self.record(PresenterEvent::CameraMoved(position));
        }
        .boxed()
    }

    fn unmount_room<'a>(&'a self, room_id: RoomId, stale_door_ids: &'a [DoorId]) -> BoxFuture<'a, bool> {
        async move {
            Self::pause(self.unmount_delay).await;
            self.record(PresenterEvent::RoomUnmounted {
                room_id,
                door_ids: stale_door_ids.to_vec(),
            });
            self.unmount_succeeds
        }
        .boxed()
    }
}
