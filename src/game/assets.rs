//! Assets - Avatar sprite loading
//!
//! Sprites are plain files named by 1-indexed slot (`axolotl-1.png` ..
//! `axolotl-4.png`) under the asset directory. Loading the set is an
//! explicit wait-for-all barrier: a missing or unreadable sprite fails
//! the whole load with the offending path instead of stalling the game.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::game::compositor::SPRITE_SIZE;
use crate::game::player::{PlayerSlot, PLAYER_COUNT};
use crate::game::GameError;

fn sprite_path(dir: &Path, slot: PlayerSlot) -> PathBuf {
    dir.join(format!("axolotl-{}.png", slot.index() + 1))
}

/// Load one slot's sprite, normalized to the 80x80 draw size.
pub fn load_sprite(dir: &Path, slot: PlayerSlot) -> Result<RgbaImage, GameError> {
    let path = sprite_path(dir, slot);
    let image = image::open(&path)
        .map_err(|err| GameError::AssetLoad {
            path: path.clone(),
            message: err.to_string(),
        })?
        .into_rgba8();
    Ok(normalize(image))
}

fn normalize(image: RgbaImage) -> RgbaImage {
    if image.dimensions() == (SPRITE_SIZE, SPRITE_SIZE) {
        image
    } else {
        imageops::resize(&image, SPRITE_SIZE, SPRITE_SIZE, FilterType::Triangle)
    }
}

/// The four avatar sprites, one per slot.
#[derive(Debug, Clone)]
pub struct AvatarSet {
    sprites: [RgbaImage; PLAYER_COUNT],
}

impl AvatarSet {
    pub fn new(sprites: [RgbaImage; PLAYER_COUNT]) -> Self {
        Self {
            sprites: sprites.map(normalize),
        }
    }

    /// Load all four sprites; the countdown must not start until every
    /// one is in.
    pub fn load(dir: &Path) -> Result<Self, GameError> {
        let [first, second, third, fourth] = PlayerSlot::ALL;
        Ok(Self::new([
            load_sprite(dir, first)?,
            load_sprite(dir, second)?,
            load_sprite(dir, third)?,
            load_sprite(dir, fourth)?,
        ]))
    }

    pub fn sprite(&self, slot: PlayerSlot) -> &RgbaImage {
        &self.sprites[slot.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lake-race-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    fn write_sprites(dir: &Path, size: u32) {
        for slot in PlayerSlot::all() {
            let image = RgbaImage::from_pixel(size, size, Rgba([10, 20, 30, 255]));
            image.save(sprite_path(dir, slot)).expect("write sprite");
        }
    }

    #[test]
    fn missing_sprite_fails_with_its_path() {
        let dir = scratch_dir("missing");
        let err = AvatarSet::load(&dir).expect_err("empty dir must fail");
        match err {
            GameError::AssetLoad { path, .. } => {
                assert!(path.to_string_lossy().contains("axolotl-1.png"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_normalizes_sprites_to_draw_size() {
        let dir = scratch_dir("normalize");
        write_sprites(&dir, 40);
        let set = AvatarSet::load(&dir).expect("load");
        for slot in PlayerSlot::all() {
            assert_eq!(set.sprite(slot).dimensions(), (SPRITE_SIZE, SPRITE_SIZE));
        }
    }

    #[test]
    fn partial_set_still_fails() {
        let dir = scratch_dir("partial");
        write_sprites(&dir, 80);
        fs::remove_file(sprite_path(&dir, PlayerSlot::ALL[2])).expect("remove");
        assert!(AvatarSet::load(&dir).is_err());
    }
}
