// dungeon/helpers.rs - Dungeon construction, lookup and copy-on-write updates

use super::constants::{
    CENTRAL_ROOM_ID, CENTRAL_ROOM_SIZE, CENTRAL_ROOM_TEXT, FIRST_ROOM_ID,
};
use super::room::is_point_in_room;
use crate::types::{
    Area, CompassDirection, Door, DungeonData, FloorType, Position, Room, RoomId, RoomType, Seed,
};

/// Empty dungeon; room ids start at 10, leaving 1-9 reserved.
pub fn create_dungeon(seed: Seed) -> DungeonData {
    DungeonData {
        seed,
        id_inc: FIRST_ROOM_ID,
        rooms: Vec::new(),
        doors: Vec::new(),
        max_depth: 0,
        strategy: None,
    }
}

/// The starting room: centered on the origin and only growable northwards.
pub fn create_central_room() -> Room {
    let half = CENTRAL_ROOM_SIZE / 2.0;
    Room {
        id: CENTRAL_ROOM_ID,
        area: Area::new(-half, -half, CENTRAL_ROOM_SIZE, CENTRAL_ROOM_SIZE),
        depth: 0,
        room_type: RoomType::Normal,
        parent: None,
        is_central: true,
        allowed_edges: Some(vec![CompassDirection::North]),
        floor_text: Some(CENTRAL_ROOM_TEXT.to_string()),
        floor_type: FloorType::Transparent,
    }
}

pub fn get_dungeon_room_by_id(dungeon: &DungeonData, id: RoomId) -> Option<&Room> {
    dungeon.rooms.iter().find(|room| room.id == id)
}

pub fn get_dungeon_door_by_id<'d>(dungeon: &'d DungeonData, id: &str) -> Option<&'d Door> {
    dungeon.doors.iter().find(|door| door.id == id)
}

/// Room on the far side of `door` when standing in `room_id`.
pub fn get_dungeon_connecting_room<'d>(
    dungeon: &'d DungeonData,
    room_id: RoomId,
    door: &Door,
) -> Option<&'d Room> {
    get_dungeon_room_by_id(dungeon, door.other_room(room_id))
}

/// New snapshot with one door's open state changed; the input is untouched.
pub fn update_dungeon_door_state(dungeon: &DungeonData, door_id: &str, is_open: bool) -> DungeonData {
    DungeonData {
        doors: dungeon
            .doors
            .iter()
            .map(|door| {
                if door.id == door_id {
                    Door { is_open, ..door.clone() }
                } else {
                    door.clone()
                }
            })
            .collect(),
        ..dungeon.clone()
    }
}

/// Ids of every room sharing a door with `room_id`.
pub fn get_dungeon_connected_rooms(dungeon: &DungeonData, room_id: RoomId) -> Vec<RoomId> {
    dungeon
        .doors
        .iter()
        .filter(|door| door.touches(room_id))
        .map(|door| door.other_room(room_id))
        .collect()
}

/// First room containing `point` (edges inclusive).
pub fn find_room_at(dungeon: &DungeonData, point: Position) -> Option<&Room> {
    dungeon.rooms.iter().find(|room| is_point_in_room(point, room))
}
