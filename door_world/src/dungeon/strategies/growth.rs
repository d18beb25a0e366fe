// dungeon/strategies/growth.rs

use super::{center_score, pick_top_scored, RoomGenerationStrategy};
use crate::dungeon::constants::CANVAS_SIZE;
use crate::types::{Room, Seed};

/// Favours rooms near the canvas frontier and far from its middle.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrowthDirectionStrategy;

/// Smallest distance from the room to any canvas edge.
fn frontier(room: &Room) -> f64 {
    let area = &room.area;
    area.x
        .min(CANVAS_SIZE - area.right())
        .min(area.y)
        .min(CANVAS_SIZE - area.bottom())
}

pub(crate) fn growth_score(room: &Room) -> f64 {
    let edge_score = (100.0 - frontier(room)).max(0.0);
    edge_score + center_score(room) * 0.5
}

impl RoomGenerationStrategy for GrowthDirectionStrategy {
    fn select_target_room<'r>(&self, seed: Seed, rooms: &'r [Room]) -> (Seed, Option<&'r Room>) {
        pick_top_scored(seed, rooms, growth_score)
    }

    fn name(&self) -> &'static str {
        "growth"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Area, RoomType};

    #[test]
    fn test_growth_score() {
        // Centered on the canvas: far from every edge, close to the middle
        let middle = Room::new(1, Area::new(470.0, 470.0, 60.0, 60.0), RoomType::Normal);
        assert_eq!(growth_score(&middle), 0.0);

        // Flush with the top-left corner
        let corner = Room::new(2, Area::new(0.0, 0.0, 60.0, 60.0), RoomType::Normal);
        let expected_center = ((470.0f64 * 470.0 * 2.0).sqrt() - 200.0) * 0.5;
        assert!((growth_score(&corner) - (100.0 + expected_center)).abs() < 1e-9);
    }

    #[test]
    fn test_prefers_frontier_rooms() {
        let mut rooms: Vec<Room> = (0..6)
            .map(|i| {
                Room::new(i + 1, Area::new(440.0 + i as f64, 440.0, 60.0, 60.0), RoomType::Normal)
            })
            .collect();
        rooms.push(Room::new(99, Area::new(-200.0, -200.0, 60.0, 60.0), RoomType::Normal));

        // Six middle rooms tie at zero; the stable sort keeps five of them behind room 99
        let mut seed = 3;
        let mut saw_frontier = false;
        for _ in 0..50 {
            let (next, picked) = GrowthDirectionStrategy.select_target_room(seed, &rooms);
            let picked = picked.unwrap();
            assert_ne!(picked.id, 6);
            saw_frontier |= picked.id == 99;
            seed = next;
        }
        assert!(saw_frontier);
    }
}
