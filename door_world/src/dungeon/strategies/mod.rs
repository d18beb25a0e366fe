// dungeon/strategies/mod.rs - Pluggable target-room selection for placement

mod branching;
mod growth;
mod random;
mod room_type;
mod simple;

pub use branching::BranchingStrategy;
pub use growth::GrowthDirectionStrategy;
pub use random::RandomStrategy;
pub use room_type::RoomTypeStrategy;
pub use simple::SimpleStrategy;

use std::cmp::Ordering;

use super::constants::{CANDIDATE_POOL_SIZE, CANVAS_SIZE};
use crate::prng::prng_int_range;
use crate::types::{Position, Room, Seed, StrategyType};

/// Chooses which existing room the next room is grown from.
///
/// The seed is threaded explicitly: implementations return the advanced seed
/// together with their choice. An empty `rooms` slice yields `None`.
pub trait RoomGenerationStrategy: Send + Sync {
    fn select_target_room<'r>(&self, seed: Seed, rooms: &'r [Room]) -> (Seed, Option<&'r Room>);

    fn name(&self) -> &'static str;
}

pub fn create_strategy(strategy: StrategyType) -> Box<dyn RoomGenerationStrategy> {
    match strategy {
        StrategyType::Random => Box::new(RandomStrategy),
        StrategyType::Growth => Box::new(GrowthDirectionStrategy),
        StrategyType::Type => Box::new(RoomTypeStrategy),
        StrategyType::Branch => Box::new(BranchingStrategy),
        StrategyType::Simple => Box::new(SimpleStrategy),
    }
}

/// Stable descending sort by score, then a uniform pick among the best few.
pub(crate) fn pick_top_scored<'r>(
    seed: Seed,
    rooms: &'r [Room],
    score: impl Fn(&Room) -> f64,
) -> (Seed, Option<&'r Room>) {
    if rooms.is_empty() {
        return (seed, None);
    }

    let mut scored: Vec<(&Room, f64)> = rooms.iter().map(|room| (room, score(room))).collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let pool = scored.len().min(CANDIDATE_POOL_SIZE);
    let (seed, index) = prng_int_range(seed, 0, pool as i64 - 1);
    (seed, scored.get(index as usize).map(|(room, _)| *room))
}

/// Distance beyond 200 units from the middle of the reference canvas.
pub(crate) fn center_score(room: &Room) -> f64 {
    let canvas_center = Position::new(CANVAS_SIZE / 2.0, CANVAS_SIZE / 2.0);
    (room.center().distance_to(canvas_center) - 200.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Area, RoomType};

    pub(super) fn grid(count: u32) -> Vec<Room> {
        (0..count)
            .map(|i| {
                Room::new(
                    i + 1,
                    Area::new(i as f64 * 60.0, 0.0, 60.0, 60.0),
                    RoomType::Normal,
                )
            })
            .collect()
    }

    #[test]
    fn test_factory_covers_every_type() {
        for strategy in StrategyType::ALL {
            assert_eq!(create_strategy(strategy).name(), strategy.as_str());
        }
    }

    #[test]
    fn test_every_strategy_handles_empty_input() {
        for strategy in StrategyType::ALL {
            let (seed, picked) = create_strategy(strategy).select_target_room(99, &[]);
            assert!(picked.is_none());
            assert_eq!(seed, 99);
        }
    }

    #[test]
    fn test_every_strategy_returns_a_member() {
        let rooms = grid(12);
        for strategy in StrategyType::ALL {
            let (_, picked) = create_strategy(strategy).select_target_room(1974, &rooms);
            let picked = picked.unwrap();
            assert!(rooms.iter().any(|room| room.id == picked.id));
        }
    }

    #[test]
    fn test_pick_top_scored_limits_pool() {
        let rooms = grid(20);
        let mut seed = 7;
        for _ in 0..200 {
            let (next, picked) = pick_top_scored(seed, &rooms, |room| room.id as f64);
            // Highest ids score best; only the top five are eligible
            assert!(picked.unwrap().id > 15);
            seed = next;
        }
    }

    #[test]
    fn test_pick_top_scored_tolerates_nan() {
        let rooms = grid(3);
        let (_, picked) = pick_top_scored(1, &rooms, |_| f64::NAN);
        assert!(picked.is_some());
    }
}
