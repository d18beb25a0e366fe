// dungeon/door.rs - Door derivation between touching rooms

use super::constants::{DOOR_HEIGHT, DOOR_WIDTH};
use super::room::rooms_touch;
use crate::types::{CompassDirection, Door, DoorId, DungeonData, Position, Room, RoomId};

/// Canonical id, independent of argument order.
pub fn door_id(a: RoomId, b: RoomId) -> DoorId {
    format!("d-{}-{}", a.min(b), a.max(b))
}

/// Where a door between two touching rooms goes, if anywhere.
///
/// The door sits on an edge of whichever room restricts its edges (`a` first),
/// centered on the shared span and pushed half a door outward. Shared spans
/// narrower than a door get no door.
pub fn find_door_position(a: &Room, b: &Room) -> Option<(CompassDirection, Position)> {
    let (target, other) = if a.allowed_edges.is_some() { (a, b) } else { (b, a) };
    let (t, o) = (&target.area, &other.area);

    let edge = if o.bottom() == t.y {
        CompassDirection::North
    } else if t.bottom() == o.y {
        CompassDirection::South
    } else if o.right() == t.x {
        CompassDirection::West
    } else if t.right() == o.x {
        CompassDirection::East
    } else {
        return None;
    };

    if !target.edges().contains(&edge) {
        return None;
    }

    let position = match edge {
        CompassDirection::North | CompassDirection::South => {
            let start = t.x.max(o.x);
            let overlap = t.right().min(o.right()) - start;
            if overlap < DOOR_WIDTH {
                return None;
            }
            let x = start + (overlap - DOOR_WIDTH) / 2.0;
            let y = if edge == CompassDirection::North {
                t.y - DOOR_HEIGHT / 2.0
            } else {
                t.bottom() - DOOR_HEIGHT / 2.0
            };
            Position::new(x, y)
        }
        CompassDirection::East | CompassDirection::West => {
            let start = t.y.max(o.y);
            let overlap = t.bottom().min(o.bottom()) - start;
            if overlap < DOOR_HEIGHT {
                return None;
            }
            let y = start + (overlap - DOOR_HEIGHT) / 2.0;
            let x = if edge == CompassDirection::West {
                t.x - DOOR_WIDTH / 2.0
            } else {
                t.right() - DOOR_WIDTH / 2.0
            };
            Position::new(x, y)
        }
    };

    Some((edge, position))
}

/// Dominant-axis direction from `a`'s center to `b`'s.
pub fn get_door_direction(a: &Room, b: &Room) -> CompassDirection {
    let (from, to) = (a.center(), b.center());
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            CompassDirection::East
        } else {
            CompassDirection::West
        }
    } else if dy < 0.0 {
        CompassDirection::North
    } else {
        CompassDirection::South
    }
}

/// One door per touching pair with room for it. Pure function of `rooms`.
///
/// `dir` points from `room1` toward `room2`.
pub fn find_doors(rooms: &[Room]) -> Vec<Door> {
    let mut doors = Vec::new();
    for (i, a) in rooms.iter().enumerate() {
        for b in &rooms[i + 1..] {
            if !rooms_touch(a, b) {
                continue;
            }
            if let Some((_, position)) = find_door_position(a, b) {
                doors.push(Door {
                    id: door_id(a.id, b.id),
                    dir: get_door_direction(a, b),
                    position,
                    room1: a.id,
                    room2: b.id,
                    is_open: false,
                });
            }
        }
    }
    doors
}

pub fn get_room_doors(dungeon: &DungeonData, room_id: RoomId) -> Vec<&Door> {
    dungeon.doors.iter().filter(|door| door.touches(room_id)).collect()
}

/// Doors of `room_id`, minus any that lead to `exclude_room_id`.
pub fn get_room_doors_excluding(
    dungeon: &DungeonData,
    room_id: RoomId,
    exclude_room_id: Option<RoomId>,
) -> Vec<&Door> {
    dungeon
        .doors
        .iter()
        .filter(|door| door.touches(room_id))
        .filter(|door| exclude_room_id.map_or(true, |excluded| !door.touches(excluded)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::helpers::{create_central_room, create_dungeon};
    use crate::types::{Area, RoomType};

    fn room(id: RoomId, x: f64, y: f64, width: f64, height: f64) -> Room {
        Room::new(id, Area::new(x, y, width, height), RoomType::Normal)
    }

    fn door(id: &str, room1: RoomId, room2: RoomId) -> Door {
        Door {
            id: id.to_string(),
            dir: CompassDirection::North,
            position: Position::default(),
            room1,
            room2,
            is_open: false,
        }
    }

    fn ids(doors: Vec<&Door>) -> Vec<&str> {
        doors.into_iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_door_id_is_canonical() {
        assert_eq!(door_id(12, 3), "d-3-12");
        assert_eq!(door_id(3, 12), "d-3-12");
    }

    #[test]
    fn test_door_on_north_edge_of_central_room() {
        let central = create_central_room();
        let north = room(10, -50.0, -110.0, 60.0, 60.0);

        let (dir, position) = find_door_position(&central, &north).unwrap();
        assert_eq!(dir, CompassDirection::North);
        // Shared span is [-50, 10], 60 wide
        assert_eq!(position, Position::new(-50.0 + 26.0, -54.0));
        // Argument order does not matter, the restricted room is the target
        assert_eq!(find_door_position(&north, &central), Some((dir, position)));
    }

    #[test]
    fn test_disallowed_edge_gets_no_door() {
        let central = create_central_room();
        let east = room(10, 50.0, -50.0, 60.0, 60.0);
        assert!(find_door_position(&central, &east).is_none());
    }

    #[test]
    fn test_narrow_overlap_gets_no_door() {
        let a = room(1, 0.0, 0.0, 50.0, 50.0);
        let b = room(2, 50.0, 45.0, 50.0, 50.0);
        assert!(rooms_touch(&a, &b));
        assert!(find_door_position(&a, &b).is_none());
    }

    #[test]
    fn test_east_west_door_position() {
        let a = room(1, 0.0, 0.0, 50.0, 50.0);
        let b = room(2, 50.0, 10.0, 50.0, 50.0);
        // Neither restricts edges, so `b` is the target and `a` lies to its west
        let (dir, position) = find_door_position(&a, &b).unwrap();
        assert_eq!(dir, CompassDirection::West);
        assert_eq!(position, Position::new(46.0, 10.0 + 16.0));
    }

    #[test]
    fn test_door_direction() {
        let a = room(1, 0.0, 0.0, 10.0, 10.0);
        assert_eq!(get_door_direction(&a, &room(2, 10.0, 0.0, 10.0, 10.0)), CompassDirection::East);
        assert_eq!(get_door_direction(&a, &room(3, -10.0, 0.0, 10.0, 10.0)), CompassDirection::West);
        assert_eq!(get_door_direction(&a, &room(4, 0.0, -10.0, 10.0, 10.0)), CompassDirection::North);
        assert_eq!(get_door_direction(&a, &room(5, 0.0, 10.0, 10.0, 10.0)), CompassDirection::South);
        // Ties go vertical
        assert_eq!(get_door_direction(&a, &room(6, 10.0, 10.0, 10.0, 10.0)), CompassDirection::South);
    }

    #[test]
    fn test_find_doors_is_pure() {
        let rooms = vec![
            create_central_room(),
            room(10, -50.0, -110.0, 60.0, 60.0),
            room(11, 10.0, -110.0, 60.0, 60.0),
            room(12, 500.0, 500.0, 60.0, 60.0),
        ];
        let doors = find_doors(&rooms);
        let door_ids: Vec<_> = doors.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(door_ids, vec!["d-1-10", "d-1-11", "d-10-11"]);
        assert_eq!(find_doors(&rooms), doors);
        assert!(doors.iter().all(|d| !d.is_open));
    }

    #[test]
    fn test_door_dir_points_from_first_room_to_second() {
        let rooms = vec![
            room(10, 0.0, 0.0, 50.0, 50.0),
            room(11, 50.0, 0.0, 50.0, 50.0),
            room(12, 0.0, 50.0, 50.0, 50.0),
        ];
        let doors = find_doors(&rooms);
        assert_eq!(doors.len(), 2);
        assert_eq!(doors[0].id, "d-10-11");
        assert_eq!(doors[0].dir, CompassDirection::East);
        assert_eq!(doors[1].id, "d-10-12");
        assert_eq!(doors[1].dir, CompassDirection::South);
        // The edge picked for placement still belongs to the target room
        let (edge, _) = find_door_position(&rooms[0], &rooms[1]).unwrap();
        assert_eq!(edge, CompassDirection::West);
    }

    #[test]
    fn test_central_room_door_points_north() {
        let rooms = vec![create_central_room(), room(10, -50.0, -110.0, 60.0, 60.0)];
        let doors = find_doors(&rooms);
        assert_eq!(doors[0].dir, CompassDirection::North);
    }

    #[test]
    fn test_room_doors_excluding() {
        let mut dungeon = create_dungeon(1);
        dungeon.doors = vec![door("d1", 1, 2), door("d2", 1, 3), door("d3", 2, 3)];

        assert_eq!(ids(get_room_doors_excluding(&dungeon, 1, Some(2))), vec!["d2"]);
        assert_eq!(ids(get_room_doors_excluding(&dungeon, 1, None)), vec!["d1", "d2"]);
        assert_eq!(ids(get_room_doors(&dungeon, 3)), vec!["d2", "d3"]);

        dungeon.doors[1] = door("d2", 3, 1);
        assert_eq!(ids(get_room_doors_excluding(&dungeon, 1, Some(2))), vec!["d2"]);
    }

    #[test]
    fn test_room_doors_excluding_empty_dungeon() {
        let dungeon = create_dungeon(1);
        assert!(get_room_doors_excluding(&dungeon, 1, Some(2)).is_empty());
    }
}
