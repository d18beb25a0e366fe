// dungeon/mod.rs - Seeded dungeon generation
//
// Generation is a step machine: each step asks the active strategy for a
// target room and tries to place one room against it. `DungeonGenerator`
// exposes the steps as an iterator of progress snapshots; `generate_dungeon`
// drives it cooperatively on the tokio scheduler.

pub mod constants;
pub mod door;
pub mod grow;
pub mod helpers;
pub mod room;
pub mod strategies;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};

use crate::error_handling::{DungeonError, Result};
use crate::prng::random_seed;
use crate::types::{DungeonData, Room, RoomId, Seed, StrategyType};
use constants::{MAX_CONSECUTIVE_FAILURES, MAX_ROOMS, PROGRESS_INTERVAL};
use door::find_doors;
use helpers::{create_central_room, create_dungeon};
use room::{generate_room_around, get_max_room_depth};
use strategies::{create_strategy, RoomGenerationStrategy};

pub use grow::{generate_rooms_around, GrowOptions};

// ============================================================================
// OPTIONS
// ============================================================================

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Existing dungeon to keep growing; a fresh one with a central room otherwise
    pub dungeon: Option<DungeonData>,
    pub seed: Seed,
    pub max_attempts: u32,
    pub max_rooms: usize,
    pub strategy: StrategyType,
}

impl GenerateOptions {
    pub fn builder() -> GenerateOptionsBuilder {
        GenerateOptionsBuilder::default()
    }
}

/// Builder for [`GenerateOptions`]. Attempts default to twice the room budget.
#[derive(Debug, Default)]
pub struct GenerateOptionsBuilder {
    dungeon: Option<DungeonData>,
    seed: Option<Seed>,
    max_attempts: Option<u32>,
    max_rooms: Option<usize>,
    strategy: StrategyType,
}

impl GenerateOptionsBuilder {
    pub fn dungeon(mut self, dungeon: DungeonData) -> Self {
        self.dungeon = Some(dungeon);
        self
    }

    pub fn seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn max_rooms(mut self, max_rooms: usize) -> Self {
        self.max_rooms = Some(max_rooms);
        self
    }

    pub fn strategy(mut self, strategy: StrategyType) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn build(self) -> Result<GenerateOptions> {
        let max_rooms = self.max_rooms.unwrap_or(50);
        if max_rooms > MAX_ROOMS {
            return Err(DungeonError::InvalidOptions {
                reason: format!("max_rooms {} exceeds the limit of {}", max_rooms, MAX_ROOMS),
            });
        }

        let seed = match self.seed {
            Some(0) => {
                return Err(DungeonError::InvalidOptions {
                    reason: "seed must be non-zero".to_string(),
                })
            }
            Some(seed) => seed,
            None => random_seed(),
        };

        Ok(GenerateOptions {
            dungeon: self.dungeon,
            seed,
            max_attempts: self.max_attempts.unwrap_or(max_rooms as u32 * 2),
            max_rooms,
            strategy: self.strategy,
        })
    }
}

/// Shared cancellation flag for a running generation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ============================================================================
// GENERATOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Empty,
    Growing,
    Complete,
}

/// Result of a single placement step.
#[derive(Debug)]
pub enum GenerationStep {
    /// A room was placed and a progress snapshot is due
    Progress(DungeonData),
    Continue,
    Done,
}

pub struct DungeonGenerator {
    seed: Seed,
    id_inc: RoomId,
    rooms: Vec<Room>,
    strategy_type: StrategyType,
    strategy: Box<dyn RoomGenerationStrategy>,
    state: GeneratorState,

    max_attempts: u32,
    max_rooms: usize,
    attempts: u32,
    rooms_generated: usize,
    consecutive_failures: u32,
}

impl DungeonGenerator {
    pub fn new(options: GenerateOptions) -> Result<Self> {
        let dungeon = match options.dungeon {
            Some(dungeon) if dungeon.rooms.is_empty() => {
                return Err(DungeonError::InvalidOptions {
                    reason: "dungeon has no rooms to grow from".to_string(),
                })
            }
            Some(dungeon) => dungeon,
            None => {
                let mut dungeon = create_dungeon(options.seed);
                dungeon.rooms.push(create_central_room());
                dungeon
            }
        };

        debug!(
            "Generating dungeon: seed={}, max_rooms={}, max_attempts={}, strategy={}",
            dungeon.seed, options.max_rooms, options.max_attempts, options.strategy
        );

        Ok(Self {
            seed: dungeon.seed,
            id_inc: dungeon.id_inc,
            rooms: dungeon.rooms,
            strategy_type: options.strategy,
            strategy: create_strategy(options.strategy),
            state: GeneratorState::Empty,
            max_attempts: options.max_attempts,
            max_rooms: options.max_rooms,
            attempts: 0,
            rooms_generated: 0,
            consecutive_failures: 0,
        })
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn rooms_generated(&self) -> usize {
        self.rooms_generated
    }

    fn can_continue(&self) -> bool {
        self.attempts < self.max_attempts
            && self.rooms_generated < self.max_rooms
            && self.consecutive_failures < MAX_CONSECUTIVE_FAILURES
    }

    /// Run one placement attempt.
    pub fn step(&mut self) -> GenerationStep {
        if self.state == GeneratorState::Complete {
            return GenerationStep::Done;
        }
        if !self.can_continue() {
            self.complete();
            return GenerationStep::Done;
        }
        self.state = GeneratorState::Growing;

        let (seed, target) = self.strategy.select_target_room(self.seed, &self.rooms);
        let Some(target) = target else {
            self.complete();
            return GenerationStep::Done;
        };
        let (seed, placed) = generate_room_around(seed, self.id_inc, target, &self.rooms);
        self.seed = seed;
        self.attempts += 1;

        match placed {
            Some(room) => {
                self.rooms.push(room);
                self.id_inc += 1;
                self.rooms_generated += 1;
                self.consecutive_failures = 0;
                if self.rooms_generated % PROGRESS_INTERVAL == 0 {
                    return GenerationStep::Progress(self.snapshot());
                }
            }
            None => self.consecutive_failures += 1,
        }
        GenerationStep::Continue
    }

    fn complete(&mut self) {
        if self.state == GeneratorState::Complete {
            return;
        }
        if self.consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
            debug!(
                "Generation stuck after {} consecutive failures, stopping with {} rooms",
                self.consecutive_failures,
                self.rooms.len()
            );
        }
        self.state = GeneratorState::Complete;
    }

    /// Current rooms with doors and max depth derived from them.
    pub fn snapshot(&self) -> DungeonData {
        DungeonData {
            seed: self.seed,
            id_inc: self.id_inc,
            rooms: self.rooms.clone(),
            doors: find_doors(&self.rooms),
            max_depth: get_max_room_depth(&self.rooms),
            strategy: Some(self.strategy_type),
        }
    }

    /// Final dungeon from whatever has been placed so far.
    pub fn into_dungeon(mut self) -> DungeonData {
        self.complete();
        let doors = find_doors(&self.rooms);
        let max_depth = get_max_room_depth(&self.rooms);
        DungeonData {
            seed: self.seed,
            id_inc: self.id_inc,
            rooms: self.rooms,
            doors,
            max_depth,
            strategy: Some(self.strategy_type),
        }
    }
}

impl Iterator for DungeonGenerator {
    type Item = DungeonData;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.step() {
                GenerationStep::Progress(snapshot) => return Some(snapshot),
                GenerationStep::Continue => continue,
                GenerationStep::Done => return None,
            }
        }
    }
}

// ============================================================================
// DRIVERS
// ============================================================================

/// Generate a dungeon, yielding to the scheduler after each progress snapshot.
///
/// A cancelled token stops generation at the next step and returns the rooms
/// placed so far.
pub async fn generate_dungeon<F>(
    options: GenerateOptions,
    mut on_progress: F,
    cancel: Option<&CancelToken>,
) -> Result<DungeonData>
where
    F: FnMut(&DungeonData),
{
    let mut generator = DungeonGenerator::new(options)?;

    loop {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            info!(
                "Generation cancelled after {} rooms",
                generator.rooms_generated()
            );
            break;
        }
        match generator.step() {
            GenerationStep::Progress(snapshot) => {
                on_progress(&snapshot);
                tokio::task::yield_now().await;
            }
            GenerationStep::Continue => {}
            GenerationStep::Done => break,
        }
    }

    let dungeon = generator.into_dungeon();
    info!(
        "Generated dungeon with {} rooms, {} doors, max depth {}",
        dungeon.rooms.len(),
        dungeon.doors.len(),
        dungeon.max_depth
    );
    Ok(dungeon)
}

/// Run generation to completion on the current thread.
pub fn generate_dungeon_blocking(options: GenerateOptions) -> Result<DungeonData> {
    let mut generator = DungeonGenerator::new(options)?;
    generator.by_ref().for_each(drop);
    Ok(generator.into_dungeon())
}
