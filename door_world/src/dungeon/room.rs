// dungeon/room.rs - Room geometry and single-room placement

use super::constants::{RoomSizeRange, ROOM_SIZE_LARGE, ROOM_SIZE_MEDIUM, ROOM_SIZE_SMALL};
use super::helpers::get_dungeon_room_by_id;
use crate::error_handling::{DungeonError, Result};
use crate::prng::{prng_int_range, prng_shuffle};
use crate::types::{
    Area, CompassDirection, DungeonData, FloorType, Position, Room, RoomId, RoomType, Seed, Size,
};

/// A room given either by id (resolved against a dungeon) or directly.
#[derive(Debug, Clone, Copy)]
pub enum RoomRef<'a> {
    Id(RoomId),
    Room(&'a Room),
}

impl From<RoomId> for RoomRef<'_> {
    fn from(id: RoomId) -> Self {
        RoomRef::Id(id)
    }
}

impl<'a> From<&'a Room> for RoomRef<'a> {
    fn from(room: &'a Room) -> Self {
        RoomRef::Room(room)
    }
}

impl<'a> RoomRef<'a> {
    fn resolve(self, dungeon: Option<&'a DungeonData>) -> Result<&'a Room> {
        match self {
            RoomRef::Room(room) => Ok(room),
            RoomRef::Id(id) => dungeon
                .and_then(|d| get_dungeon_room_by_id(d, id))
                .ok_or(DungeonError::RoomNotFound(id)),
        }
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Strict AABB intersection; rooms sharing an edge do not overlap.
pub fn rooms_overlap(a: &Room, b: &Room) -> bool {
    areas_overlap(&a.area, &b.area)
}

fn areas_overlap(a: &Area, b: &Area) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Rooms share an edge with zero gap. Perpendicular ranges may meet at a corner.
pub fn rooms_touch(a: &Room, b: &Room) -> bool {
    areas_touch(&a.area, &b.area)
}

fn areas_touch(a: &Area, b: &Area) -> bool {
    let horizontal = (a.right() == b.x || b.right() == a.x)
        && !(a.bottom() < b.y || b.bottom() < a.y);
    let vertical = (a.bottom() == b.y || b.bottom() == a.y)
        && !(a.right() < b.x || b.right() < a.x);
    horizontal || vertical
}

pub fn room_center(room: &Room) -> Position {
    room.center()
}

/// Center of a room given by id or value. Id lookups need a dungeon.
pub fn get_room_center<'a>(
    dungeon: Option<&'a DungeonData>,
    room: impl Into<RoomRef<'a>>,
) -> Result<Position> {
    room.into().resolve(dungeon).map(room_center)
}

/// Center-to-center distance, or 0.0 when either room cannot be resolved.
pub fn get_distance_between_rooms<'a>(
    dungeon: Option<&'a DungeonData>,
    a: impl Into<RoomRef<'a>>,
    b: impl Into<RoomRef<'a>>,
) -> f64 {
    match (get_room_center(dungeon, a), get_room_center(dungeon, b)) {
        (Ok(a), Ok(b)) => a.distance_to(b),
        _ => 0.0,
    }
}

/// Inclusive on all four edges.
pub fn is_point_in_room(point: Position, room: &Room) -> bool {
    let area = &room.area;
    point.x >= area.x && point.x <= area.right() && point.y >= area.y && point.y <= area.bottom()
}

pub fn get_max_room_depth(rooms: &[Room]) -> u32 {
    rooms.iter().map(|room| room.depth).max().unwrap_or(0)
}

fn size_range(room_type: RoomType) -> RoomSizeRange {
    match room_type {
        RoomType::Small => ROOM_SIZE_SMALL,
        RoomType::Normal => ROOM_SIZE_MEDIUM,
        RoomType::Large => ROOM_SIZE_LARGE,
    }
}

/// Width is drawn before height.
pub fn get_room_size_for_type(room_type: RoomType, seed: Seed) -> (Seed, Size) {
    let (min, max) = size_range(room_type);
    let (seed, width) = prng_int_range(seed, min, max);
    let (seed, height) = prng_int_range(seed, min, max);
    (seed, Size { width: width as f64, height: height as f64 })
}

// ============================================================================
// PLACEMENT
// ============================================================================

fn area_against_edge(target: &Area, edge: CompassDirection, size: Size) -> Area {
    let (x, y) = match edge {
        CompassDirection::North => (target.x, target.y - size.height),
        CompassDirection::East => (target.right(), target.y),
        CompassDirection::South => (target.x, target.bottom()),
        CompassDirection::West => (target.x - size.width, target.y),
    };
    Area::new(x, y, size.width, size.height)
}

/// Try to place one new room flush against `target`.
///
/// Draws a room type, a size and an edge order from `seed`, then takes the
/// first edge whose candidate touches the target without overlapping any room
/// in `existing`. `next_id` is only consumed on success; the advanced seed is
/// returned either way.
pub fn generate_room_around(
    seed: Seed,
    next_id: RoomId,
    target: &Room,
    existing: &[Room],
) -> (Seed, Option<Room>) {
    let (seed, type_index) = prng_int_range(seed, 0, RoomType::ALL.len() as i64 - 1);
    let room_type = RoomType::ALL[type_index as usize];
    let (seed, size) = get_room_size_for_type(room_type, seed);
    let (seed, edges) = prng_shuffle(seed, target.edges());

    let placed = edges.into_iter().find_map(|edge| {
        let area = area_against_edge(&target.area, edge, size);
        let fits = areas_touch(&area, &target.area)
            && !existing.iter().any(|room| areas_overlap(&area, &room.area));
        fits.then(|| Room {
            id: next_id,
            area,
            depth: target.depth + 1,
            room_type,
            parent: Some(target.id),
            is_central: false,
            allowed_edges: None,
            floor_text: None,
            floor_type: FloorType::Solid,
        })
    });

    (seed, placed)
}
