// dungeon/strategies/simple.rs

use super::RoomGenerationStrategy;
use crate::types::{Room, Seed};

/// Always grows from the first room. Consumes no randomness.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleStrategy;

impl RoomGenerationStrategy for SimpleStrategy {
    fn select_target_room<'r>(&self, seed: Seed, rooms: &'r [Room]) -> (Seed, Option<&'r Room>) {
        (seed, rooms.first())
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::strategies::tests::grid;

    #[test]
    fn test_first_room_and_seed_untouched() {
        let rooms = grid(3);
        let (seed, picked) = SimpleStrategy.select_target_room(42, &rooms);
        assert_eq!(seed, 42);
        assert_eq!(picked.map(|r| r.id), Some(1));
    }
}
