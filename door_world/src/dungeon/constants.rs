// dungeon/constants.rs - Generation tuning values

pub type RoomSizeRange = (i64, i64);

pub const ROOM_SIZE_SMALL: RoomSizeRange = (45, 50);
pub const ROOM_SIZE_MEDIUM: RoomSizeRange = (50, 80);
pub const ROOM_SIZE_LARGE: RoomSizeRange = (80, 120);

/// Upper bound on rooms in a dungeon
pub const MAX_ROOMS: usize = 500;

pub const DOOR_WIDTH: f64 = 8.0;
pub const DOOR_HEIGHT: f64 = 8.0;

/// Reference canvas the scored strategies measure against
pub const CANVAS_SIZE: f64 = 1000.0;

/// Ids below this are reserved; the central room is id 1.
pub const FIRST_ROOM_ID: u32 = 10;
pub const CENTRAL_ROOM_ID: u32 = 1;
pub const CENTRAL_ROOM_SIZE: f64 = 100.0;
pub const CENTRAL_ROOM_TEXT: &str = "Open Door Go North";

/// Generation stops once this many placements fail in a row
pub const MAX_CONSECUTIVE_FAILURES: u32 = 50;

/// An intermediate snapshot is emitted after this many successful rooms
pub const PROGRESS_INTERVAL: usize = 5;

/// Scored strategies pick uniformly among this many best rooms
pub const CANDIDATE_POOL_SIZE: usize = 5;
