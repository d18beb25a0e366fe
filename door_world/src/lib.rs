// lib.rs - Library exports for door-world
// Seeded dungeon generation plus a room-by-room journey through the result

pub mod dungeon;
pub mod error_handling;
pub mod journey;
pub mod prng;
pub mod session;
pub mod settings;
pub mod types;

// Re-export commonly used types
pub use dungeon::{
    generate_dungeon, generate_dungeon_blocking, generate_rooms_around, CancelToken,
    DungeonGenerator, GenerateOptions, GrowOptions,
};
pub use error_handling::{DungeonError, Result};
pub use journey::{
    AutoWalker, HeadlessPresenter, JourneyAction, JourneyPresenter, JourneyState, JourneyStore,
    Navigator,
};
pub use session::DungeonSession;
pub use settings::DungeonSettings;
pub use types::{Area, Door, DungeonData, Position, Room, RoomId, Seed, StrategyType};
