//! Compositor - Ellipse-clipped face-over-sprite drawing
//!
//! Reproduces the canvas compositing used everywhere a player is shown:
//! the avatar sprite fills an 80x80 cell, and the captured face is scaled
//! to a 24x32 rect and drawn only inside an ellipse clip over the
//! sprite's head, shifted by the player's drag offset.

use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, Pixel, RgbaImage};

use crate::game::player::FaceOffset;
use crate::game::GameError;

/// Avatar sprites are drawn at this square size.
pub const SPRITE_SIZE: u32 = 80;

/// Ellipse clip center, sprite-relative.
const CLIP_CENTER: (f32, f32) = (40.0, 32.0);
/// Ellipse clip radii (x, y).
const CLIP_RADII: (f32, f32) = (12.0, 16.0);
/// Top-left corner of the face draw rect, sprite-relative, before offset.
const FACE_ORIGIN: (i32, i32) = (28, 16);
/// Size the captured face is scaled to before drawing.
const FACE_SIZE: (u32, u32) = (24, 32);

/// True when the pixel center falls inside the head-clip ellipse.
fn in_clip(x: u32, y: u32) -> bool {
    let dx = (x as f32 + 0.5 - CLIP_CENTER.0) / CLIP_RADII.0;
    let dy = (y as f32 + 0.5 - CLIP_CENTER.1) / CLIP_RADII.1;
    dx * dx + dy * dy <= 1.0
}

/// Draw a face over an avatar sprite inside the ellipse clip.
///
/// Pixels outside the clip always come from the sprite. Inside the clip
/// the scaled face is alpha-blended over the sprite, so transparent face
/// pixels keep the sprite underneath. With no face, the sprite is
/// returned unchanged.
pub fn composite_avatar(sprite: &RgbaImage, face: Option<(&RgbaImage, FaceOffset)>) -> RgbaImage {
    let mut out = sprite.clone();
    let Some((face, offset)) = face else {
        return out;
    };

    let face = imageops::resize(face, FACE_SIZE.0, FACE_SIZE.1, FilterType::Triangle);
    for (fx, fy, px) in face.enumerate_pixels() {
        let x = FACE_ORIGIN.0 + offset.x + fx as i32;
        let y = FACE_ORIGIN.1 + offset.y + fy as i32;
        if x < 0 || y < 0 {
            continue;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= out.width() || y >= out.height() || !in_clip(x, y) {
            continue;
        }
        out.get_pixel_mut(x, y).blend(px);
    }
    out
}

/// Encode a composited image as PNG for IPC transfer.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, GameError> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|err| GameError::Encode(err.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn sprite() -> RgbaImage {
        RgbaImage::from_pixel(SPRITE_SIZE, SPRITE_SIZE, RED)
    }

    fn face() -> RgbaImage {
        RgbaImage::from_pixel(80, 80, BLUE)
    }

    #[test]
    fn no_face_returns_sprite_unchanged() {
        let out = composite_avatar(&sprite(), None);
        assert_eq!(out, sprite());
    }

    #[test]
    fn face_shows_only_inside_ellipse() {
        let out = composite_avatar(&sprite(), Some((&face(), FaceOffset::default())));
        assert_eq!(*out.get_pixel(40, 32), BLUE, "clip center shows the face");
        assert_eq!(*out.get_pixel(0, 0), RED, "corner is untouched sprite");
        assert_eq!(*out.get_pixel(40, 10), RED, "above the clip is sprite");
        assert_eq!(*out.get_pixel(60, 32), RED, "right of the clip is sprite");
    }

    #[test]
    fn offset_moves_the_face_out_of_the_clip() {
        // The face rect lands entirely outside the ellipse, so nothing shows.
        let offset = FaceOffset { x: 100, y: 0 };
        let out = composite_avatar(&sprite(), Some((&face(), offset)));
        assert_eq!(out, sprite());
    }

    #[test]
    fn negative_offset_does_not_panic() {
        let offset = FaceOffset { x: -200, y: -200 };
        let out = composite_avatar(&sprite(), Some((&face(), offset)));
        assert_eq!(out, sprite());
    }

    #[test]
    fn encode_png_produces_png_magic() {
        let bytes = encode_png(&sprite()).expect("encode");
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
