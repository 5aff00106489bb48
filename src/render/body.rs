//! Front-facing body and bust
//!
//! Both renders are a fixed table of atlas regions blitted onto a 16 unit wide
//! grid. Every segment paints its inner layer, then its outer (second) layer
//! on top.

use image::RgbaImage;

use super::{RenderError, RenderSize};
use crate::atlas::{AtlasFormat, SourceRegion, TextureAtlas, LEGACY_HEIGHT};
use crate::geometry::{Affine, Rect};
use crate::surface::Surface;

/// Grid units across the output width.
pub const GRID_WIDTH: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Head,
    Torso,
    RightArm,
    LeftArm,
    RightLeg,
    LeftLeg,
}

impl Segment {
    pub fn is_leg(self) -> bool {
        matches!(self, Segment::RightLeg | Segment::LeftLeg)
    }
}

/// Where one segment comes from and where it goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentLayout {
    pub segment: Segment,
    pub inner: SourceRegion,
    pub outer: SourceRegion,
    /// Destination in grid units.
    pub dest: Rect,
    /// Region mirrored in place of `inner` on legacy skins.
    pub legacy_fallback: Option<SourceRegion>,
}

impl SegmentLayout {
    const fn new(segment: Segment, inner: SourceRegion, outer: SourceRegion, dest: Rect) -> Self {
        Self { segment, inner, outer, dest, legacy_fallback: None }
    }

    const fn with_fallback(mut self, region: SourceRegion) -> Self {
        self.legacy_fallback = Some(region);
        self
    }

    /// Destination in pixels for a grid unit of `unit` pixels.
    pub fn dest_rect(&self, unit: f64) -> Rect {
        Rect::new(self.dest.x * unit, self.dest.y * unit, self.dest.w * unit, self.dest.h * unit)
    }
}

const RIGHT_ARM_INNER: SourceRegion = SourceRegion::new(44, 20, 4, 12);
const RIGHT_LEG_INNER: SourceRegion = SourceRegion::new(4, 20, 4, 12);

/// Segments in paint order.
pub const BODY_LAYOUT: [SegmentLayout; 6] = [
    SegmentLayout::new(
        Segment::Head,
        SourceRegion::new(8, 8, 8, 8),
        SourceRegion::new(40, 8, 8, 8),
        Rect::new(4.0, 0.0, 8.0, 8.0),
    ),
    SegmentLayout::new(
        Segment::Torso,
        SourceRegion::new(20, 20, 8, 12),
        SourceRegion::new(20, 36, 8, 12),
        Rect::new(4.0, 8.0, 8.0, 12.0),
    ),
    SegmentLayout::new(Segment::RightArm, RIGHT_ARM_INNER, SourceRegion::new(44, 36, 4, 12), Rect::new(0.0, 8.0, 4.0, 12.0)),
    SegmentLayout::new(
        Segment::LeftArm,
        SourceRegion::new(36, 52, 4, 12),
        SourceRegion::new(52, 52, 4, 12),
        Rect::new(12.0, 8.0, 4.0, 12.0),
    )
    .with_fallback(RIGHT_ARM_INNER),
    SegmentLayout::new(Segment::RightLeg, RIGHT_LEG_INNER, SourceRegion::new(4, 36, 4, 12), Rect::new(4.0, 20.0, 4.0, 12.0)),
    SegmentLayout::new(
        Segment::LeftLeg,
        SourceRegion::new(20, 52, 4, 12),
        SourceRegion::new(4, 52, 4, 12),
        Rect::new(8.0, 20.0, 4.0, 12.0),
    )
    .with_fallback(RIGHT_LEG_INNER),
];

/// Height of a bust render: head plus torso, 20 of the body's 32 units.
pub fn bust_height(size: RenderSize) -> u32 {
    (size.get() as f64 * 1.25).round() as u32
}

/// Render the whole player on a `size` x `2 * size` image.
pub fn render_body(atlas: &TextureAtlas, size: RenderSize) -> Result<RgbaImage, RenderError> {
    let s = size.get();
    compose(atlas, s, s * 2, BODY_LAYOUT.iter())
}

/// Render head, torso and arms on a `size` x `bust_height(size)` image.
pub fn render_bust(atlas: &TextureAtlas, size: RenderSize) -> Result<RgbaImage, RenderError> {
    compose(atlas, size.get(), bust_height(size), BODY_LAYOUT.iter().filter(|layout| !layout.segment.is_leg()))
}

fn compose<'a>(
    atlas: &TextureAtlas,
    width: u32,
    height: u32,
    layouts: impl Iterator<Item = &'a SegmentLayout>,
) -> Result<RgbaImage, RenderError> {
    let mut surface = Surface::new(width, height)?;
    let unit = width as f64 / GRID_WIDTH;
    for layout in layouts {
        draw_segment(&mut surface, atlas, layout, unit)?;
    }
    Ok(surface.into_image())
}

fn draw_segment(surface: &mut Surface, atlas: &TextureAtlas, layout: &SegmentLayout, unit: f64) -> Result<(), RenderError> {
    let dest = layout.dest_rect(unit);
    let legacy = atlas.format() == AtlasFormat::Legacy;

    match layout.legacy_fallback {
        Some(fallback) if legacy && !atlas.contains(layout.inner) => draw_mirrored(surface, atlas, fallback, dest)?,
        _ => surface.draw_region(atlas, layout.inner, dest)?,
    }

    // Legacy skins have no second layer below the first half of the atlas.
    if legacy && layout.outer.y >= LEGACY_HEIGHT {
        return Ok(());
    }
    surface.draw_region(atlas, layout.outer, dest)?;
    Ok(())
}

fn draw_mirrored(surface: &mut Surface, atlas: &TextureAtlas, region: SourceRegion, dest: Rect) -> Result<(), RenderError> {
    let mut guard = surface.save();
    guard.transform(Affine::translate(dest.x + dest.w, dest.y).then_apply(&Affine::scale(-1.0, 1.0)));
    guard.draw_region(atlas, region, Rect::new(0.0, 0.0, dest.w, dest.h))?;
    Ok(())
}
