//! Session - Owns the booth, the active race, and screen transitions
//!
//! Single owner of all mutable game state. The Tauri commands drive one
//! of these behind a mutex; the frontend renders from its snapshots.

use std::path::PathBuf;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::game::assets::{self, AvatarSet};
use crate::game::booth::{PhotoBooth, FRAME_SIZE};
use crate::game::compositor;
use crate::game::player::{PlayerSlot, PlayerSnapshot, PlayerState, PLAYER_COUNT};
use crate::game::race::{Race, RaceConfig, RaceStatus};
use crate::game::GameError;

/// Which screen the frontend should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Setup,
    Countdown,
    Playing,
    Winner,
}

/// Everything the frontend needs to draw a frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub screen: Screen,
    pub countdown_label: Option<String>,
    pub players: Vec<PlayerSnapshot>,
    pub winner: Option<PlayerSnapshot>,
}

/// Process-wide game state: photo booth, active race, loaded sprites.
pub struct GameSession {
    asset_dir: PathBuf,
    config: RaceConfig,
    booth: PhotoBooth,
    sprites: Option<AvatarSet>,
    race: Option<Race>,
}

impl GameSession {
    pub fn new(asset_dir: PathBuf) -> Self {
        Self {
            asset_dir,
            config: RaceConfig::default(),
            booth: PhotoBooth::new(),
            sprites: None,
            race: None,
        }
    }

    /// Take a raw RGBA camera frame for a slot and open the editor.
    pub fn capture_photo(&mut self, slot: PlayerSlot, frame: Vec<u8>) -> Result<(), GameError> {
        let len = frame.len();
        // from_raw tolerates oversized buffers, so the length must be exact
        // here or a larger capture would be reinterpreted as a scrambled 80x80.
        if len != (FRAME_SIZE * FRAME_SIZE * 4) as usize {
            return Err(GameError::BadFrameLen { len });
        }
        let frame = RgbaImage::from_raw(FRAME_SIZE, FRAME_SIZE, frame)
            .ok_or(GameError::BadFrameLen { len })?;
        self.booth.capture(slot, frame)
    }

    pub fn drag_start(&mut self) {
        self.booth.drag_start();
    }

    pub fn drag_move(&mut self, dx: i32, dy: i32) {
        self.booth.drag_move(dx, dy);
    }

    pub fn drag_end(&mut self) {
        self.booth.drag_end();
    }

    pub fn confirm_photo(&mut self) {
        self.booth.confirm();
    }

    pub fn cancel_photo(&mut self) {
        self.booth.cancel();
    }

    /// Which slots already have a committed photo, for the setup screen.
    pub fn photo_slots(&self) -> [bool; PLAYER_COUNT] {
        let mut taken = [false; PLAYER_COUNT];
        for slot in PlayerSlot::all() {
            taken[slot.index()] = self.booth.photo(slot).is_some();
        }
        taken
    }

    /// PNG of the edited slot's sprite with the face at its current
    /// offset, redrawn on every drag move.
    pub fn editor_preview(&self) -> Result<Vec<u8>, GameError> {
        let slot = self.booth.editing_slot().ok_or(GameError::NoEditSession)?;
        let sprite = assets::load_sprite(&self.asset_dir, slot)?;
        let preview = self
            .booth
            .preview(&sprite)
            .ok_or(GameError::NoEditSession)?;
        compositor::encode_png(&preview)
    }

    /// Build the four players from names and booth photos and start the
    /// countdown. All sprites must load before the transition.
    pub fn start_game(&mut self, names: [String; PLAYER_COUNT]) -> Result<(), GameError> {
        if self.race.is_some() {
            return Err(GameError::AlreadyStarted);
        }
        let sprites = AvatarSet::load(&self.asset_dir)?;

        let mut players = Vec::with_capacity(PLAYER_COUNT);
        for slot in PlayerSlot::all() {
            let trimmed = names[slot.index()].trim();
            let name = if trimmed.is_empty() {
                slot.default_name()
            } else {
                trimmed.to_string()
            };
            players.push(PlayerState::new(slot, name, self.booth.take_photo(slot)));
        }

        let mut race = Race::new(players, self.config);
        race.start_countdown();
        self.sprites = Some(sprites);
        self.race = Some(race);
        Ok(())
    }

    /// Per-frame drive: advance the race clock, then report state.
    pub fn tick(&mut self, delta: f32) -> SessionSnapshot {
        if let Some(race) = &mut self.race {
            race.update(delta);
        }
        self.snapshot()
    }

    /// One tap for one player. Ignored outside the racing phase.
    pub fn tap(&mut self, slot: PlayerSlot) {
        if let Some(race) = &mut self.race {
            race.tap(slot);
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        match &self.race {
            None => SessionSnapshot {
                screen: Screen::Setup,
                countdown_label: None,
                players: Vec::new(),
                winner: None,
            },
            Some(race) => {
                let snap = race.snapshot();
                let screen = match snap.status {
                    RaceStatus::NotStarted => Screen::Setup,
                    RaceStatus::Countdown => Screen::Countdown,
                    RaceStatus::Racing => Screen::Playing,
                    RaceStatus::Finished => Screen::Winner,
                };
                SessionSnapshot {
                    screen,
                    countdown_label: snap.countdown_label,
                    players: snap.players,
                    winner: snap.winner,
                }
            }
        }
    }

    /// PNG of a player's avatar with their face composited in.
    pub fn player_portrait(&self, slot: PlayerSlot) -> Result<Vec<u8>, GameError> {
        let race = self.race.as_ref().ok_or(GameError::NoRace)?;
        let sprites = self.sprites.as_ref().ok_or(GameError::NoRace)?;
        let player = race.player(slot).ok_or(GameError::NoRace)?;
        let portrait = compositor::composite_avatar(
            sprites.sprite(slot),
            player
                .photo
                .as_ref()
                .map(|photo| (&photo.image, photo.offset)),
        );
        compositor::encode_png(&portrait)
    }

    /// Full-size winner portrait for the winner screen.
    pub fn winner_portrait(&self) -> Result<Vec<u8>, GameError> {
        let race = self.race.as_ref().ok_or(GameError::NoRace)?;
        let slot = race.winner().ok_or(GameError::NotFinished)?;
        self.player_portrait(slot)
    }

    /// Back to setup; no players, photos, or names carry over.
    pub fn new_game(&mut self) {
        self.race = None;
        self.sprites = None;
        self.booth.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::fs;
    use std::path::Path;

    fn scratch_assets(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lake-race-session-{}-{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("create scratch dir");
        for i in 1..=4 {
            let sprite = RgbaImage::from_pixel(80, 80, Rgba([200, 100, 50, 255]));
            sprite
                .save(dir.join(format!("axolotl-{i}.png")))
                .expect("write sprite");
        }
        dir
    }

    fn session(dir: &Path) -> GameSession {
        GameSession::new(dir.to_path_buf())
    }

    fn names(raw: [&str; 4]) -> [String; 4] {
        raw.map(str::to_string)
    }

    fn frame_bytes() -> Vec<u8> {
        vec![128; (FRAME_SIZE * FRAME_SIZE * 4) as usize]
    }

    #[test]
    fn blank_names_default_and_entered_names_trim() {
        let dir = scratch_assets("names");
        let mut session = session(&dir);
        session
            .start_game(names(["", "   ", " Ana ", "Bo"]))
            .expect("start");
        let snap = session.snapshot();
        assert_eq!(snap.screen, Screen::Countdown);
        let got: Vec<&str> = snap.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(got, ["Player 1", "Player 2", "Ana", "Bo"]);
    }

    #[test]
    fn start_fails_when_sprites_are_missing() {
        let dir = std::env::temp_dir().join(format!("lake-race-empty-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create dir");
        let mut session = session(&dir);
        assert!(session.start_game(names(["", "", "", ""])).is_err());
        assert_eq!(session.snapshot().screen, Screen::Setup);
    }

    #[test]
    fn double_start_is_rejected() {
        let dir = scratch_assets("double");
        let mut session = session(&dir);
        session.start_game(names(["", "", "", ""])).expect("start");
        assert!(matches!(
            session.start_game(names(["", "", "", ""])),
            Err(GameError::AlreadyStarted)
        ));
    }

    #[test]
    fn photo_flows_from_booth_into_player() {
        let dir = scratch_assets("photo");
        let mut session = session(&dir);
        session
            .capture_photo(PlayerSlot::ALL[1], frame_bytes())
            .expect("capture");
        session.drag_start();
        session.drag_move(2, 3);
        session.drag_end();

        let preview = session.editor_preview().expect("preview");
        assert_eq!(&preview[..4], b"\x89PNG");

        session.confirm_photo();
        assert_eq!(session.photo_slots(), [false, true, false, false]);

        session.start_game(names(["", "", "", ""])).expect("start");
        let snap = session.snapshot();
        assert!(snap.players[1].has_photo);
        assert!(!snap.players[0].has_photo);
        assert_eq!(
            session.photo_slots(),
            [false; 4],
            "photos are consumed at game start"
        );
    }

    #[test]
    fn capture_rejects_non_exact_frame_buffers() {
        let dir = scratch_assets("framelen");
        let mut session = session(&dir);

        // A 100x100 capture must not be reinterpreted as a scrambled 80x80.
        let oversized = vec![200u8; 100 * 100 * 4];
        assert!(matches!(
            session.capture_photo(PlayerSlot::ALL[0], oversized),
            Err(GameError::BadFrameLen { len: 40_000 })
        ));
        assert!(
            session.editor_preview().is_err(),
            "no edit session was opened"
        );

        let undersized = vec![0u8; 100];
        assert!(session
            .capture_photo(PlayerSlot::ALL[0], undersized)
            .is_err());

        session
            .capture_photo(PlayerSlot::ALL[0], frame_bytes())
            .expect("exact-size frame is accepted");
    }

    #[test]
    fn race_runs_to_a_winner_and_new_game_resets_everything() {
        let dir = scratch_assets("reset");
        let mut session = session(&dir);
        session
            .capture_photo(PlayerSlot::ALL[0], frame_bytes())
            .expect("capture");
        session.confirm_photo();
        session.start_game(names(["", "", "", ""])).expect("start");

        assert!(matches!(
            session.winner_portrait(),
            Err(GameError::NotFinished)
        ));

        // Through the countdown, then slot 2 taps to the line.
        let snap = session.tick(4.0);
        assert_eq!(snap.screen, Screen::Playing);
        for _ in 0..140 {
            session.tap(PlayerSlot::ALL[2]);
        }
        let snap = session.tick(0.016);
        assert_eq!(snap.screen, Screen::Winner);
        assert_eq!(snap.winner.expect("winner").slot, 2);
        assert_eq!(&session.winner_portrait().expect("portrait")[..4], b"\x89PNG");

        session.new_game();
        let snap = session.snapshot();
        assert_eq!(snap.screen, Screen::Setup);
        assert!(snap.players.is_empty());
        assert!(snap.winner.is_none());

        // Prior round's photo is gone: fresh players have none.
        session.start_game(names(["", "", "", ""])).expect("restart");
        let snap = session.snapshot();
        assert!(snap.players.iter().all(|p| !p.has_photo));
        assert!(snap.players.iter().all(|p| p.position == 0));
    }

    #[test]
    fn preview_without_capture_is_an_error() {
        let dir = scratch_assets("noedit");
        let session = session(&dir);
        assert!(matches!(
            session.editor_preview(),
            Err(GameError::NoEditSession)
        ));
    }
}
