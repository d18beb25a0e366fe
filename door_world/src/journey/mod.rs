// journey/mod.rs - Walking through a generated dungeon
//
// The journey is an explicit state record owned by `JourneyStore`. All changes
// go through `JourneyAction`s; `Navigator` sequences those actions around
// presenter calls to move the player from room to room.

pub mod auto_walk;
pub mod explore;
pub mod navigator;
pub mod presenter;
pub mod store;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::types::{DoorId, DungeonData, RoomId, Seed};

pub use auto_walk::AutoWalker;
pub use navigator::{MoveOutcome, Navigator, NavigatorBuilder};
pub use presenter::{
    CameraPresenter, DoorPresenter, HeadlessPresenter, JourneyPresenter, PresenterEvent,
    PresenterRegistry, RoomPresenter,
};
pub use store::{JourneyStore, SubscriptionId};

/// Where a door transition currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    #[default]
    Idle,
    OpeningDoor,
    Arriving,
    ClosingDoor,
    Unmounting,
}

#[derive(Debug, Clone, Default)]
pub struct JourneyState {
    pub dungeon: Option<Arc<DungeonData>>,
    pub is_initialised: bool,
    pub current_room_id: RoomId,
    pub visited_room_ids: BTreeSet<RoomId>,
    /// Every room entered, in order, starting with the central room
    pub room_history: Vec<RoomId>,
    pub next_room_id: Option<RoomId>,
    pub next_door_id: Option<DoorId>,
    pub visible_room_ids: Vec<RoomId>,
    pub visible_door_ids: Vec<DoorId>,
    /// Generator state for next-room suggestions
    pub seed: Seed,
    pub phase: TransitionPhase,
}

impl JourneyState {
    pub fn has_visited(&self, room_id: RoomId) -> bool {
        self.visited_room_ids.contains(&room_id)
    }
}

#[derive(Debug, Clone)]
pub enum JourneyAction {
    /// Replace the dungeon and start the journey over
    LoadDungeon(Arc<DungeonData>),
    /// Replace the dungeon, keeping the journey (e.g. after growing rooms)
    ExtendDungeon(Arc<DungeonData>),
    /// Place the player in the central room. No-op once initialised.
    Initialise,
    SetDoorOpen { door_id: DoorId, open: bool },
    /// Merge ids into the visible sets, or replace them when `clear` is set
    ShowEntities {
        room_ids: Vec<RoomId>,
        door_ids: Vec<DoorId>,
        clear: bool,
    },
    EnterRoom(RoomId),
    /// Recompute the next-room suggestion
    ApplyNextRoom,
    SetPhase(TransitionPhase),
    /// Put the journey back to `previous` after a failed transition, keeping
    /// the current dungeon with `door_id` closed
    AbortTransition {
        previous: Box<JourneyState>,
        door_id: DoorId,
    },
    /// Forget the journey, keeping the dungeon
    Reset,
}
