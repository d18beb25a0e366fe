// dungeon/strategies/random.rs

use super::RoomGenerationStrategy;
use crate::prng::prng_int_range;
use crate::types::{Room, Seed};

/// Uniform pick over every room.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomStrategy;

impl RoomGenerationStrategy for RandomStrategy {
    fn select_target_room<'r>(&self, seed: Seed, rooms: &'r [Room]) -> (Seed, Option<&'r Room>) {
        if rooms.is_empty() {
            return (seed, None);
        }
        let (seed, index) = prng_int_range(seed, 0, rooms.len() as i64 - 1);
        (seed, rooms.get(index as usize))
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
