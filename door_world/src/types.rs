// types.rs - Shared type definitions for dungeon data structures
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error_handling::DungeonError;

/// Seed for the Lehmer generator; always below 2^31 - 1.
pub type Seed = u32;
pub type RoomId = u32;
pub type DoorId = String;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Position) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Rectangle in dungeon space. Origin top-left, y grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Area {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompassDirection {
    North,
    East,
    South,
    West,
}

impl CompassDirection {
    pub const ALL: [CompassDirection; 4] = [
        CompassDirection::North,
        CompassDirection::East,
        CompassDirection::South,
        CompassDirection::West,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Large,
    Normal,
    Small,
}

impl RoomType {
    /// Declaration order; room placement picks a type by index into this list.
    pub const ALL: [RoomType; 3] = [RoomType::Large, RoomType::Normal, RoomType::Small];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorType {
    #[default]
    Solid,
    Transparent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub area: Area,
    /// Placement generations from the central room
    pub depth: u32,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    /// Room this one was grown from
    #[serde(default)]
    pub parent: Option<RoomId>,
    #[serde(default)]
    pub is_central: bool,
    /// Edges new rooms and doors may use; `None` means all four
    #[serde(default)]
    pub allowed_edges: Option<Vec<CompassDirection>>,
    #[serde(default)]
    pub floor_text: Option<String>,
    #[serde(default)]
    pub floor_type: FloorType,
}

impl Room {
    /// Plain room with no parent and no edge restrictions.
    pub fn new(id: RoomId, area: Area, room_type: RoomType) -> Self {
        Self {
            id,
            area,
            depth: 0,
            room_type,
            parent: None,
            is_central: false,
            allowed_edges: None,
            floor_text: None,
            floor_type: FloorType::Solid,
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_parent(mut self, parent: RoomId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_allowed_edges(mut self, edges: Vec<CompassDirection>) -> Self {
        self.allowed_edges = Some(edges);
        self
    }

    /// Allowed edges, falling back to all four directions.
    pub fn edges(&self) -> &[CompassDirection] {
        self.allowed_edges.as_deref().unwrap_or(&CompassDirection::ALL)
    }

    #[inline]
    pub fn center(&self) -> Position {
        self.area.center()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Door {
    pub id: DoorId,
    pub dir: CompassDirection,
    pub position: Position,
    pub room1: RoomId,
    pub room2: RoomId,
    #[serde(default)]
    pub is_open: bool,
}

impl Door {
    pub fn touches(&self, room_id: RoomId) -> bool {
        self.room1 == room_id || self.room2 == room_id
    }

    /// The room on the other side of the door from `room_id`.
    pub fn other_room(&self, room_id: RoomId) -> RoomId {
        if self.room1 == room_id {
            self.room2
        } else {
            self.room1
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyType {
    #[default]
    Random,
    Growth,
    Type,
    Branch,
    Simple,
}

impl StrategyType {
    pub const ALL: [StrategyType; 5] = [
        StrategyType::Random,
        StrategyType::Growth,
        StrategyType::Type,
        StrategyType::Branch,
        StrategyType::Simple,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyType::Random => "random",
            StrategyType::Growth => "growth",
            StrategyType::Type => "type",
            StrategyType::Branch => "branch",
            StrategyType::Simple => "simple",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyType {
    type Err = DungeonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyType::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DungeonError::UnknownStrategy(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DungeonData {
    pub seed: Seed,
    /// Next room id to hand out
    pub id_inc: RoomId,
    pub rooms: Vec<Room>,
    pub doors: Vec<Door>,
    pub max_depth: u32,
    #[serde(default)]
    pub strategy: Option<StrategyType>,
}
