//! Game Module
//!
//! Tapping race core: players, photo booth, avatar compositing, and the
//! session state machine. Communicates with the JS frontend via Tauri
//! commands.

pub mod assets;
pub mod booth;
pub mod compositor;
pub mod player;
pub mod race;
pub mod session;

use std::path::PathBuf;

pub use assets::AvatarSet;
pub use booth::PhotoBooth;
pub use player::{CapturedPhoto, FaceOffset, PlayerSlot, PlayerState};
pub use race::{Race, RaceConfig, RaceStatus};
pub use session::{GameSession, Screen, SessionSnapshot};

/// Errors surfaced by the game core. Commands map these to strings at
/// the IPC boundary.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("failed to load avatar sprite {}: {message}", path.display())]
    AssetLoad { path: PathBuf, message: String },
    #[error("captured frame is {width}x{height}, expected 80x80")]
    BadFrame { width: u32, height: u32 },
    #[error("captured frame buffer has {len} bytes, expected 25600 (80x80 RGBA)")]
    BadFrameLen { len: usize },
    #[error("png encode failed: {0}")]
    Encode(String),
    #[error("no photo is being edited")]
    NoEditSession,
    #[error("invalid player slot {0}")]
    BadSlot(usize),
    #[error("game already started")]
    AlreadyStarted,
    #[error("no race in progress")]
    NoRace,
    #[error("race has not finished")]
    NotFinished,
}
