//! Race - Countdown, tap-driven advancement, and finish detection
//!
//! The race is a four-state machine. Taps are the only thing that moves
//! a player; the per-frame update just runs the countdown clock and
//! scans for a winner.

use serde::{Deserialize, Serialize};

use crate::game::player::{PlayerSlot, PlayerSnapshot, PlayerState, FINISH_LINE, STEP};

/// Race configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Position at which the race ends
    pub finish_line: u32,
    /// Position gained per tap
    pub step: u32,
    /// Countdown length in seconds
    pub countdown_secs: f32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            finish_line: FINISH_LINE,
            step: STEP,
            countdown_secs: 3.0,
        }
    }
}

/// Race status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceStatus {
    NotStarted,
    Countdown,
    Racing,
    Finished,
}

/// Complete race state
#[derive(Debug, Clone)]
pub struct Race {
    /// Race configuration
    pub config: RaceConfig,
    /// Current race status
    pub status: RaceStatus,
    /// All players, in slot order
    pub players: Vec<PlayerState>,
    /// Countdown remaining (seconds); "GO!" shows while it runs negative
    countdown: f32,
    /// Winning slot, set on the frame a player reaches the line
    winner: Option<PlayerSlot>,
}

impl Race {
    /// Create a new race over the given players
    pub fn new(players: Vec<PlayerState>, config: RaceConfig) -> Self {
        Self {
            countdown: config.countdown_secs,
            config,
            status: RaceStatus::NotStarted,
            players,
            winner: None,
        }
    }

    /// Start the countdown
    pub fn start_countdown(&mut self) {
        self.status = RaceStatus::Countdown;
        self.countdown = self.config.countdown_secs;
    }

    /// Advance the clock and check for a winner
    pub fn update(&mut self, delta: f32) {
        match self.status {
            RaceStatus::NotStarted | RaceStatus::Finished => {}

            RaceStatus::Countdown => {
                self.countdown -= delta;
                // "GO!" stays up for one second before play begins.
                if self.countdown <= -1.0 {
                    self.status = RaceStatus::Racing;
                }
            }

            RaceStatus::Racing => {
                // First slot at or past the line wins; ties in the same
                // frame resolve to the lowest slot.
                let finish_line = self.config.finish_line;
                if let Some(winner) = self
                    .players
                    .iter()
                    .find(|player| player.position >= finish_line)
                {
                    self.winner = Some(winner.slot);
                    self.status = RaceStatus::Finished;
                }
            }
        }
    }

    /// One tap for one player. Only effective while racing.
    pub fn tap(&mut self, slot: PlayerSlot) {
        if self.status != RaceStatus::Racing {
            return;
        }
        if let Some(player) = self.players.get_mut(slot.index()) {
            player.advance(self.config.step, self.config.finish_line);
        }
    }

    /// Text shown during the countdown: "3", "2", "1", then "GO!".
    pub fn countdown_label(&self) -> String {
        if self.countdown > 0.0 {
            format!("{}", self.countdown.ceil() as u32)
        } else {
            "GO!".to_string()
        }
    }

    pub fn winner(&self) -> Option<PlayerSlot> {
        self.winner
    }

    pub fn player(&self, slot: PlayerSlot) -> Option<&PlayerState> {
        self.players.get(slot.index())
    }

    /// Get compact snapshot for IPC transfer
    pub fn snapshot(&self) -> RaceSnapshot {
        let finish_line = self.config.finish_line;
        RaceSnapshot {
            status: self.status,
            countdown_label: (self.status == RaceStatus::Countdown)
                .then(|| self.countdown_label()),
            players: self
                .players
                .iter()
                .map(|player| player.snapshot(finish_line))
                .collect(),
            winner: self
                .winner
                .and_then(|slot| self.player(slot))
                .map(|player| player.snapshot(finish_line)),
        }
    }
}

/// Compact race snapshot for IPC transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub status: RaceStatus,
    pub countdown_label: Option<String>,
    pub players: Vec<PlayerSnapshot>,
    pub winner: Option<PlayerSnapshot>,
}
