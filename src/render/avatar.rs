//! Flat head avatar

use image::RgbaImage;

use super::{RenderError, RenderSize};
use crate::atlas::{TextureAtlas, HAT_FRONT, HEAD_FRONT};
use crate::geometry::Rect;
use crate::surface::Surface;

/// Render the head front scaled to `size` x `size`, hat layer on top.
pub fn render_avatar(atlas: &TextureAtlas, size: RenderSize) -> Result<RgbaImage, RenderError> {
    let s = size.get();
    let mut surface = Surface::new(s, s)?;
    let full = Rect::new(0.0, 0.0, s as f64, s as f64);

    surface.draw_region(atlas, HEAD_FRONT, full)?;
    surface.draw_region(atlas, HAT_FRONT, full)?;

    Ok(surface.into_image())
}
