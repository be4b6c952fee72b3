//! Player - Per-slot racer state and advancement
//!
//! Each player occupies a fixed slot (0..=3) with a name, a color tag,
//! an optional captured face photo, and a race position driven by taps.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Fixed number of players per game.
pub const PLAYER_COUNT: usize = 4;

/// Position gained per tap.
pub const STEP: u32 = 5;

/// Position at which the race is won.
pub const FINISH_LINE: u32 = 700;

/// Per-slot color tags, in slot order.
pub const PLAYER_COLORS: [&str; PLAYER_COUNT] = ["#f06292", "#4dd0e1", "#ffd54f", "#81c784"];

const LANE_TOP: u32 = 60;
const LANE_SPACING: u32 = 80;

/// A player's slot index (0..=3). The index is private so a slot can
/// only exist in bounds; construct via `new` or `ALL`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PlayerSlot(usize);

impl PlayerSlot {
    /// All four slots in order.
    pub const ALL: [Self; PLAYER_COUNT] = [Self(0), Self(1), Self(2), Self(3)];

    /// Validate a raw index into a slot.
    pub fn new(index: usize) -> Option<Self> {
        (index < PLAYER_COUNT).then_some(Self(index))
    }

    /// Iterate the four slots in order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// Vertical position of this slot's lane on the play field.
    pub fn lane_y(self) -> u32 {
        LANE_TOP + LANE_SPACING * self.0 as u32
    }

    pub fn color(self) -> &'static str {
        PLAYER_COLORS[self.0]
    }

    /// Name used when the slot's name field is left blank.
    pub fn default_name(self) -> String {
        format!("Player {}", self.0 + 1)
    }
}

impl std::fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accumulated drag offset for positioning a face inside the clip.
/// Unbounded; deltas sum without clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceOffset {
    pub x: i32,
    pub y: i32,
}

impl FaceOffset {
    pub fn shift(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }
}

/// A committed camera snapshot plus its drag offset.
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    pub image: RgbaImage,
    pub offset: FaceOffset,
}

/// Complete state for a single player.
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Fixed slot this player occupies
    pub slot: PlayerSlot,
    /// Display name (trimmed, defaulted when blank)
    pub name: String,
    /// Race position, 0 at the start line
    pub position: u32,
    /// Optional face photo composited onto the avatar
    pub photo: Option<CapturedPhoto>,
}

impl PlayerState {
    pub fn new(slot: PlayerSlot, name: String, photo: Option<CapturedPhoto>) -> Self {
        Self {
            slot,
            name,
            position: 0,
            photo,
        }
    }

    /// One tap: move forward by `step`, clamped to the finish line.
    /// Idempotent once the clamp is reached.
    pub fn advance(&mut self, step: u32, finish_line: u32) {
        self.position = (self.position + step).min(finish_line);
    }

    pub fn snapshot(&self, finish_line: u32) -> PlayerSnapshot {
        PlayerSnapshot {
            slot: self.slot.index(),
            name: self.name.clone(),
            color: self.slot.color().to_string(),
            position: self.position,
            lane_y: self.slot.lane_y(),
            has_photo: self.photo.is_some(),
            finished: self.position >= finish_line,
        }
    }
}

/// Compact player state for IPC transfer to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub slot: usize,
    pub name: String,
    pub color: String,
    pub position: u32,
    pub lane_y: u32,
    pub has_photo: bool,
    pub finished: bool,
}
