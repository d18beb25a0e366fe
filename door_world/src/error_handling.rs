// error_handling.rs - Error taxonomy for dungeon generation and navigation

use thiserror::Error;

use crate::types::{DoorId, RoomId};

#[derive(Error, Debug)]
pub enum DungeonError {
    #[error("Room {0} not found")]
    RoomNotFound(RoomId),

    #[error("Door {0} not found")]
    DoorNotFound(DoorId),

    #[error("Door {door_id} does not lead from room {room_id} to a known room")]
    BrokenDoor { door_id: DoorId, room_id: RoomId },

    #[error("Door {door_id} is not a door of room {room_id}")]
    DoorNotInRoom { door_id: DoorId, room_id: RoomId },

    #[error("No dungeon exists. Call regenerate first.")]
    NoDungeon,

    #[error("Journey has not been initialised")]
    NotInitialised,

    #[error("Presenter failed: {0}")]
    PresenterFailed(String),

    #[error("Lock acquisition failed")]
    LockError,

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Invalid options: {reason}")]
    InvalidOptions { reason: String },

    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DungeonError>;

impl DungeonError {
    /// Errors caused by a dungeon graph that violates its own invariants,
    /// as opposed to a stale id supplied by the caller.
    pub fn is_malformed_graph(&self) -> bool {
        matches!(self, DungeonError::BrokenDoor { .. })
    }
}
