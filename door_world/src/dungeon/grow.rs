// dungeon/grow.rs - Bounded local growth around a single room

use log::debug;

use super::door::find_doors;
use super::room::{generate_room_around, get_max_room_depth};
use crate::types::{DungeonData, Room};

/// Parameters for [`generate_rooms_around`].
#[derive(Debug, Clone)]
pub struct GrowOptions {
    pub target_room: Room,
    /// Rooms to place around each target
    pub room_count: usize,
    /// Levels of growth; every room placed at one level is a target at the next
    pub recurse_count: usize,
    /// Per-target attempt budget
    pub max_attempts: u32,
    pub max_consecutive_failures: u32,
}

impl GrowOptions {
    pub fn new(target_room: Room) -> Self {
        Self {
            target_room,
            room_count: 1,
            recurse_count: 1,
            max_attempts: 20,
            max_consecutive_failures: 10,
        }
    }

    pub fn room_count(mut self, room_count: usize) -> Self {
        self.room_count = room_count;
        self
    }

    pub fn recurse_count(mut self, recurse_count: usize) -> Self {
        self.recurse_count = recurse_count;
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn max_consecutive_failures(mut self, max_consecutive_failures: u32) -> Self {
        self.max_consecutive_failures = max_consecutive_failures;
        self
    }
}

/// Grow rooms outward from `options.target_room`, level by level.
///
/// Returns a new snapshot carrying the advanced seed and id counter with doors
/// and max depth recomputed. The input dungeon is not modified.
pub fn generate_rooms_around(dungeon: &DungeonData, options: GrowOptions) -> DungeonData {
    let mut seed = dungeon.seed;
    let mut id_inc = dungeon.id_inc;
    let mut rooms = dungeon.rooms.clone();
    let mut total_generated = 0usize;

    let target_id = options.target_room.id;
    let mut level_targets = vec![options.target_room];

    for level in 0..options.recurse_count {
        let mut next_level = Vec::new();

        for target in &level_targets {
            let mut attempts = 0;
            let mut generated = 0;
            let mut consecutive_failures = 0;

            while attempts < options.max_attempts
                && generated < options.room_count
                && consecutive_failures < options.max_consecutive_failures
            {
                attempts += 1;
                let (next_seed, placed) = generate_room_around(seed, id_inc, target, &rooms);
                seed = next_seed;

                match placed {
                    Some(room) => {
                        id_inc += 1;
                        generated += 1;
                        total_generated += 1;
                        consecutive_failures = 0;
                        if level + 1 < options.recurse_count {
                            next_level.push(room.clone());
                        }
                        rooms.push(room);
                    }
                    None => consecutive_failures += 1,
                }
            }
        }

        level_targets = next_level;
    }

    debug!(
        "Grew {} rooms around room {} over {} levels",
        total_generated, target_id, options.recurse_count
    );

    DungeonData {
        seed,
        id_inc,
        doors: find_doors(&rooms),
        max_depth: get_max_room_depth(&rooms),
        rooms,
        strategy: dungeon.strategy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::helpers::create_dungeon;
    use crate::dungeon::room::rooms_overlap;
    use crate::types::{Area, RoomType};
    use std::collections::BTreeSet;

    fn mock_dungeon() -> DungeonData {
        let mut dungeon = create_dungeon(12_345);
        dungeon.rooms.push(Room::new(1, Area::new(0.0, 0.0, 10.0, 10.0), RoomType::Normal));
        dungeon
    }

    #[test]
    fn test_recursion_produces_several_depths() {
        let dungeon = mock_dungeon();
        let target = dungeon.rooms[0].clone();
        let grown = generate_rooms_around(&dungeon, GrowOptions::new(target).recurse_count(3).room_count(2));

        let depths: BTreeSet<u32> = grown.rooms.iter().map(|r| r.depth).collect();
        assert!(depths.len() > 1);
        assert!(grown.rooms.len() > dungeon.rooms.len());
        assert_eq!(grown.max_depth, *depths.iter().max().unwrap());
    }

    #[test]
    fn test_grown_rooms_do_not_overlap() {
        let dungeon = mock_dungeon();
        let target = dungeon.rooms[0].clone();
        let grown = generate_rooms_around(&dungeon, GrowOptions::new(target).recurse_count(3).room_count(3));

        for (i, a) in grown.rooms.iter().enumerate() {
            for b in &grown.rooms[i + 1..] {
                assert!(!rooms_overlap(a, b), "rooms {} and {} overlap", a.id, b.id);
            }
        }
    }

    #[test]
    fn test_counters_advance_and_input_untouched() {
        let dungeon = mock_dungeon();
        let target = dungeon.rooms[0].clone();
        let grown = generate_rooms_around(&dungeon, GrowOptions::new(target).room_count(2));

        let added = (grown.rooms.len() - dungeon.rooms.len()) as u32;
        assert_eq!(grown.id_inc, dungeon.id_inc + added);
        assert_ne!(grown.seed, dungeon.seed);
        assert_eq!(dungeon.rooms.len(), 1);
        // Single level, every new room hangs off the target
        assert!(grown.rooms[1..].iter().all(|r| r.parent == Some(1) && r.depth == 1));
    }

    #[test]
    fn test_deterministic() {
        let dungeon = mock_dungeon();
        let options = GrowOptions::new(dungeon.rooms[0].clone()).recurse_count(2).room_count(2);
        assert_eq!(
            generate_rooms_around(&dungeon, options.clone()),
            generate_rooms_around(&dungeon, options)
        );
    }

    #[test]
    fn test_zero_attempts_returns_same_rooms() {
        let dungeon = mock_dungeon();
        let options = GrowOptions::new(dungeon.rooms[0].clone()).max_attempts(0);
        let grown = generate_rooms_around(&dungeon, options);
        assert_eq!(grown.rooms, dungeon.rooms);
        assert_eq!(grown.seed, dungeon.seed);
    }
}
