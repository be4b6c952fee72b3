//! Photo booth - Capture and edit flow for face photos
//!
//! Holds one committed photo per slot plus the in-progress edit session.
//! A capture opens an edit session; pointer drags accumulate into the
//! session offset; confirm commits to the slot, cancel discards.

use image::RgbaImage;

use crate::game::compositor;
use crate::game::player::{CapturedPhoto, FaceOffset, PlayerSlot, PLAYER_COUNT};
use crate::game::GameError;

/// Camera frames are snapshotted to this square size before editing.
pub const FRAME_SIZE: u32 = 80;

#[derive(Debug, Clone)]
struct EditSession {
    slot: PlayerSlot,
    image: RgbaImage,
    offset: FaceOffset,
    dragging: bool,
}

/// Per-slot photo storage and the active edit session.
#[derive(Debug, Default)]
pub struct PhotoBooth {
    slots: [Option<CapturedPhoto>; PLAYER_COUNT],
    editing: Option<EditSession>,
}

impl PhotoBooth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a camera frame for a slot and open the editor with a zero
    /// offset. Replaces any edit already in progress.
    pub fn capture(&mut self, slot: PlayerSlot, frame: RgbaImage) -> Result<(), GameError> {
        if frame.dimensions() != (FRAME_SIZE, FRAME_SIZE) {
            return Err(GameError::BadFrame {
                width: frame.width(),
                height: frame.height(),
            });
        }
        self.editing = Some(EditSession {
            slot,
            image: frame,
            offset: FaceOffset::default(),
            dragging: false,
        });
        Ok(())
    }

    pub fn drag_start(&mut self) {
        if let Some(session) = &mut self.editing {
            session.dragging = true;
        }
    }

    pub fn drag_end(&mut self) {
        if let Some(session) = &mut self.editing {
            session.dragging = false;
        }
    }

    /// Pointer movement: only accumulates while a drag is active.
    pub fn drag_move(&mut self, dx: i32, dy: i32) {
        if let Some(session) = &mut self.editing {
            if session.dragging {
                session.offset.shift(dx, dy);
            }
        }
    }

    /// Slot currently being edited, if any.
    pub fn editing_slot(&self) -> Option<PlayerSlot> {
        self.editing.as_ref().map(|session| session.slot)
    }

    /// Editor preview: the session's face composited on the slot's
    /// sprite at the current offset.
    pub fn preview(&self, sprite: &RgbaImage) -> Option<RgbaImage> {
        self.editing
            .as_ref()
            .map(|session| compositor::composite_avatar(sprite, Some((&session.image, session.offset))))
    }

    /// Commit the edit session to its slot. Silent no-op when nothing
    /// is being edited.
    pub fn confirm(&mut self) {
        if let Some(session) = self.editing.take() {
            self.slots[session.slot.index()] = Some(CapturedPhoto {
                image: session.image,
                offset: session.offset,
            });
        }
    }

    /// Discard the edit session; the slot keeps whatever it had.
    pub fn cancel(&mut self) {
        self.editing = None;
    }

    pub fn photo(&self, slot: PlayerSlot) -> Option<&CapturedPhoto> {
        self.slots[slot.index()].as_ref()
    }

    /// Move a slot's photo out, for building the player at game start.
    pub fn take_photo(&mut self, slot: PlayerSlot) -> Option<CapturedPhoto> {
        self.slots[slot.index()].take()
    }

    /// New-game semantics: all slots and any active session are dropped.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
