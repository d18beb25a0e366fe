// dungeon/strategies/room_type.rs

use super::{center_score, pick_top_scored, RoomGenerationStrategy};
use crate::types::{Room, Seed};

const DENSITY_RADIUS: f64 = 150.0;

/// Favours rooms in sparse neighbourhoods.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoomTypeStrategy;

/// Other rooms whose centers lie within the density radius.
fn density(room: &Room, rooms: &[Room]) -> usize {
    let center = room.center();
    rooms
        .iter()
        .filter(|other| other.id != room.id)
        .filter(|other| other.center().distance_to(center) < DENSITY_RADIUS)
        .count()
}

pub(crate) fn room_type_score(room: &Room, rooms: &[Room]) -> f64 {
    let density_score = (5.0 - density(room, rooms) as f64).max(0.0);
    density_score * 2.0 + center_score(room) * 0.5
}

impl RoomGenerationStrategy for RoomTypeStrategy {
    fn select_target_room<'r>(&self, seed: Seed, rooms: &'r [Room]) -> (Seed, Option<&'r Room>) {
        pick_top_scored(seed, rooms, |room| room_type_score(room, rooms))
    }

    fn name(&self) -> &'static str {
        "type"
    }
}
