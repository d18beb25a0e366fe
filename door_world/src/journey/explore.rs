// journey/explore.rs - Visibility merging and next-room suggestions

use std::collections::BTreeSet;

use crate::prng::prng_int_range;
use crate::types::{Door, DoorId, DungeonData, RoomId, Seed};

/// Door the player should take next, and where it leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub room_id: RoomId,
    pub door_id: DoorId,
}

impl Suggestion {
    fn through(door: &Door, from: RoomId) -> Self {
        Self {
            room_id: door.other_room(from),
            door_id: door.id.clone(),
        }
    }
}

/// Append the ids from `incoming` that are not already in `existing`.
pub fn merge_unique<T: PartialEq + Clone>(existing: &[T], incoming: &[T]) -> Vec<T> {
    let mut merged = existing.to_vec();
    for item in incoming {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}

/// Doors of `room_id` where at least one side has not been visited.
pub fn unvisited_doors<'d>(
    dungeon: &'d DungeonData,
    room_id: RoomId,
    visited: &BTreeSet<RoomId>,
) -> Vec<&'d Door> {
    dungeon
        .doors
        .iter()
        .filter(|door| door.touches(room_id))
        .filter(|door| !visited.contains(&door.room1) || !visited.contains(&door.room2))
        .collect()
}

fn door_between(dungeon: &DungeonData, a: RoomId, b: RoomId) -> Option<&Door> {
    dungeon.doors.iter().find(|door| door.touches(a) && door.touches(b))
}

/// Door leading back the way the player first came into `current`.
///
/// When the room was reached some other way, falls back to the most recently
/// entered room that connects to it. Back at the start of the history there
/// is nowhere left to go.
pub fn backtrack_door<'d>(
    dungeon: &'d DungeonData,
    current: RoomId,
    history: &[RoomId],
) -> Option<&'d Door> {
    let most_recent_connected = || {
        history
            .iter()
            .rev()
            .filter(|&&id| id != current)
            .find_map(|&id| door_between(dungeon, current, id))
    };

    match history.iter().position(|&id| id == current) {
        Some(0) => None,
        Some(first) => {
            door_between(dungeon, current, history[first - 1]).or_else(most_recent_connected)
        }
        None => most_recent_connected(),
    }
}

/// Pick the next door from `current`, consuming randomness only when there is
/// an unvisited door to choose between.
pub fn suggest_next_room(
    dungeon: &DungeonData,
    seed: Seed,
    current: RoomId,
    visited: &BTreeSet<RoomId>,
    history: &[RoomId],
) -> (Seed, Option<Suggestion>) {
    let candidates = unvisited_doors(dungeon, current, visited);
    if !candidates.is_empty() {
        let (seed, index) = prng_int_range(seed, 0, candidates.len() as i64 - 1);
        let suggestion = candidates
            .get(index as usize)
            .map(|door| Suggestion::through(door, current));
        return (seed, suggestion);
    }

    let suggestion = backtrack_door(dungeon, current, history)
        .map(|door| Suggestion::through(door, current));
    (seed, suggestion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::helpers::create_dungeon;
    use crate::types::{CompassDirection, Position};

    fn door(room1: RoomId, room2: RoomId) -> Door {
        Door {
            id: crate::dungeon::door::door_id(room1, room2),
            dir: CompassDirection::North,
            position: Position::default(),
            room1,
            room2,
            is_open: false,
        }
    }

    /// 1 - 10 - 11, with 12 hanging off 10
    fn corridor() -> DungeonData {
        let mut dungeon = create_dungeon(1974);
        dungeon.doors = vec![door(1, 10), door(10, 11), door(10, 12)];
        dungeon
    }

    fn visited(ids: &[RoomId]) -> BTreeSet<RoomId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_merge_unique_keeps_order() {
        assert_eq!(merge_unique(&[1, 2, 3], &[3, 4, 1, 5]), vec![1, 2, 3, 4, 5]);
        assert_eq!(merge_unique::<u32>(&[], &[]), Vec::<u32>::new());
    }

    #[test]
    fn test_unvisited_doors() {
        let dungeon = corridor();
        let doors = unvisited_doors(&dungeon, 10, &visited(&[1, 10]));
        let ids: Vec<_> = doors.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d-10-11", "d-10-12"]);

        assert!(unvisited_doors(&dungeon, 10, &visited(&[1, 10, 11, 12])).is_empty());
    }

    #[test]
    fn test_suggestion_prefers_unvisited() {
        let dungeon = corridor();
        let (seed, suggestion) = suggest_next_room(&dungeon, 7, 1, &visited(&[1]), &[1]);
        assert_ne!(seed, 7);
        assert_eq!(
            suggestion,
            Some(Suggestion { room_id: 10, door_id: "d-1-10".into() })
        );
    }

    #[test]
    fn test_dead_end_backtracks_to_entry_room() {
        let dungeon = corridor();
        let seen = visited(&[1, 10, 11]);
        let (seed, suggestion) = suggest_next_room(&dungeon, 7, 11, &seen, &[1, 10, 11]);
        assert_eq!(seed, 7);
        assert_eq!(suggestion.map(|s| s.room_id), Some(10));
    }

    #[test]
    fn test_backtracking_does_not_ping_pong() {
        let dungeon = corridor();
        let seen = visited(&[1, 10, 11, 12]);
        // Explored everything and came back to 10 from 12
        let history = [1, 10, 11, 10, 12, 10];
        let door = backtrack_door(&dungeon, 10, &history).unwrap();
        assert_eq!(door.other_room(10), 1);

        let (_, suggestion) = suggest_next_room(&dungeon, 7, 10, &seen, &history);
        assert_eq!(suggestion.map(|s| s.room_id), Some(1));
    }

    #[test]
    fn test_fully_explored_at_start_clears() {
        let dungeon = corridor();
        let seen = visited(&[1, 10, 11, 12]);
        let history = [1, 10, 11, 10, 12, 10, 1];
        let (_, suggestion) = suggest_next_room(&dungeon, 7, 1, &seen, &history);
        assert!(suggestion.is_none());
    }

    #[test]
    fn test_unknown_room_falls_back_to_recent_connection() {
        let dungeon = corridor();
        let door = backtrack_door(&dungeon, 10, &[1, 11]).unwrap();
        assert_eq!(door.other_room(10), 11);
        assert!(backtrack_door(&dungeon, 12, &[]).is_none());
    }
}
