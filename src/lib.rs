//! Lake Race - Tauri Backend
//!
//! Provides the game session for the tapping race and commands for frontend communication.

mod game;

use game::player::PlayerSlot;
use game::session::{GameSession, SessionSnapshot};
use game::GameError;
use std::path::PathBuf;
use std::sync::Mutex;
use tauri::State;

fn parse_slot(index: usize) -> Result<PlayerSlot, String> {
    PlayerSlot::new(index).ok_or_else(|| GameError::BadSlot(index).to_string())
}

/// Snapshot an 80x80 RGBA camera frame for a slot and open the editor
#[tauri::command]
fn capture_photo(
    session: State<'_, Mutex<GameSession>>,
    slot: usize,
    frame: Vec<u8>,
) -> Result<(), String> {
    let slot = parse_slot(slot)?;
    let mut session = session.lock().map_err(|e| e.to_string())?;
    session.capture_photo(slot, frame).map_err(|e| e.to_string())?;
    log::info!("Photo captured for slot {}", slot);
    Ok(())
}

/// Begin a drag gesture in the photo editor
#[tauri::command]
fn drag_start(session: State<'_, Mutex<GameSession>>) -> Result<(), String> {
    let mut session = session.lock().map_err(|e| e.to_string())?;
    session.drag_start();
    Ok(())
}

/// Accumulate a pointer movement delta into the edit offset
#[tauri::command]
fn drag_move(session: State<'_, Mutex<GameSession>>, dx: i32, dy: i32) -> Result<(), String> {
    let mut session = session.lock().map_err(|e| e.to_string())?;
    session.drag_move(dx, dy);
    Ok(())
}

/// End the active drag gesture
#[tauri::command]
fn drag_end(session: State<'_, Mutex<GameSession>>) -> Result<(), String> {
    let mut session = session.lock().map_err(|e| e.to_string())?;
    session.drag_end();
    Ok(())
}

/// Get the editor preview as PNG bytes
#[tauri::command]
fn editor_preview(session: State<'_, Mutex<GameSession>>) -> Result<Vec<u8>, String> {
    let session = session.lock().map_err(|e| e.to_string())?;
    session.editor_preview().map_err(|e| e.to_string())
}

/// Commit the edited photo to its slot
#[tauri::command]
fn confirm_photo(session: State<'_, Mutex<GameSession>>) -> Result<(), String> {
    let mut session = session.lock().map_err(|e| e.to_string())?;
    session.confirm_photo();
    log::info!("Photo confirmed");
    Ok(())
}

/// Discard the in-progress photo edit
#[tauri::command]
fn cancel_photo(session: State<'_, Mutex<GameSession>>) -> Result<(), String> {
    let mut session = session.lock().map_err(|e| e.to_string())?;
    session.cancel_photo();
    Ok(())
}

/// Which slots already have a committed photo
#[tauri::command]
fn photo_slots(session: State<'_, Mutex<GameSession>>) -> Result<[bool; 4], String> {
    let session = session.lock().map_err(|e| e.to_string())?;
    Ok(session.photo_slots())
}

/// Build the players from entered names and start the countdown
#[tauri::command]
fn start_game(session: State<'_, Mutex<GameSession>>, names: Vec<String>) -> Result<(), String> {
    let names: [String; 4] = names
        .try_into()
        .map_err(|_| "expected four player names".to_string())?;
    let mut session = session.lock().map_err(|e| e.to_string())?;
    session.start_game(names).map_err(|e| e.to_string())?;
    log::info!("Game started");
    Ok(())
}

/// Advance the race clock by one frame and return the current state
#[tauri::command]
fn tick(session: State<'_, Mutex<GameSession>>, delta: f32) -> Result<SessionSnapshot, String> {
    let mut session = session.lock().map_err(|e| e.to_string())?;
    Ok(session.tick(delta))
}

/// One tap for one player's button
#[tauri::command]
fn tap(session: State<'_, Mutex<GameSession>>, slot: usize) -> Result<(), String> {
    let slot = parse_slot(slot)?;
    let mut session = session.lock().map_err(|e| e.to_string())?;
    session.tap(slot);
    Ok(())
}

/// Get the current snapshot without advancing the clock
#[tauri::command]
fn get_snapshot(session: State<'_, Mutex<GameSession>>) -> Result<SessionSnapshot, String> {
    let session = session.lock().map_err(|e| e.to_string())?;
    Ok(session.snapshot())
}

/// Get a player's composited avatar as PNG bytes
#[tauri::command]
fn player_portrait(session: State<'_, Mutex<GameSession>>, slot: usize) -> Result<Vec<u8>, String> {
    let slot = parse_slot(slot)?;
    let session = session.lock().map_err(|e| e.to_string())?;
    session.player_portrait(slot).map_err(|e| e.to_string())
}

/// Get the winner's composited avatar for the winner screen
#[tauri::command]
fn winner_portrait(session: State<'_, Mutex<GameSession>>) -> Result<Vec<u8>, String> {
    let session = session.lock().map_err(|e| e.to_string())?;
    session.winner_portrait().map_err(|e| e.to_string())
}

/// Reset to the setup screen for a fresh round
#[tauri::command]
fn new_game(session: State<'_, Mutex<GameSession>>) -> Result<(), String> {
    let mut session = session.lock().map_err(|e| e.to_string())?;
    session.new_game();
    log::info!("New game");
    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .manage(Mutex::new(GameSession::new(PathBuf::from("images"))))
        .setup(|app| {
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }
            log::info!("Lake Race game session initialized");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            capture_photo,
            drag_start,
            drag_move,
            drag_end,
            editor_preview,
            confirm_photo,
            cancel_photo,
            photo_slots,
            start_game,
            tick,
            tap,
            get_snapshot,
            player_portrait,
            winner_portrait,
            new_game,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application")
}
