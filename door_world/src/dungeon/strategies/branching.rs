// dungeon/strategies/branching.rs

use super::{pick_top_scored, RoomGenerationStrategy};
use crate::types::{Room, Seed};

const IDEAL_DEPTH: f64 = 3.0;

/// Favours mid-depth rooms with few children, spaced away from other branches.
#[derive(Debug, Default, Clone, Copy)]
pub struct BranchingStrategy;

fn children_count(room: &Room, rooms: &[Room]) -> usize {
    rooms.iter().filter(|other| other.parent == Some(room.id)).count()
}

/// Nearest room outside this room's sibling group, normalised to 200 units.
fn spacing_score(room: &Room, rooms: &[Room]) -> f64 {
    let center = room.center();
    let min_distance = rooms
        .iter()
        .filter(|other| other.id != room.id && other.parent != room.parent)
        .map(|other| other.center().distance_to(center))
        .fold(f64::INFINITY, f64::min);
    (min_distance / 200.0).min(1.0)
}

pub(crate) fn branch_score(room: &Room, rooms: &[Room]) -> f64 {
    let depth_score = (1.0 - (room.depth as f64 - IDEAL_DEPTH).abs()).max(0.0);
    let children = children_count(room, rooms) as f64;
    depth_score * 2.0 + (1.0 - children / 4.0) * 3.0 + spacing_score(room, rooms)
}

impl RoomGenerationStrategy for BranchingStrategy {
    fn select_target_room<'r>(&self, seed: Seed, rooms: &'r [Room]) -> (Seed, Option<&'r Room>) {
        pick_top_scored(seed, rooms, |room| branch_score(room, rooms))
    }

    fn name(&self) -> &'static str {
        "branch"
    }
}
