//! Raster drawing surface
//!
//! [`Surface`] is the render target every compositor draws into. It keeps a
//! current transform and a stack of clip quads, and blits atlas regions with
//! nearest-neighbor sampling through both. State changes are scoped with
//! [`Surface::save`], which hands out a [`SurfaceGuard`] that restores the
//! previous transform and clip when dropped, on every exit path.

mod blend;

use image::RgbaImage;
use std::ops::{Deref, DerefMut};
use thiserror::Error;

use crate::atlas::{AtlasError, SourceRegion, TextureAtlas};
use crate::geometry::{Affine, GeometryError, Point2, Quad, Rect};

/// Errors raised while drawing.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// Width or height of the requested target is zero
    #[error("surface dimensions must be positive, got {width}x{height}")]
    EmptySurface { width: u32, height: u32 },
    /// Source region problem (out of bounds)
    #[error(transparent)]
    Atlas(#[from] AtlasError),
    /// Transform or clip geometry problem
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Relative tolerance for destination coverage at the edges.
const EDGE_SLACK: f64 = 1e-9;

/// Transform and clip, as saved and restored by [`SurfaceGuard`].
#[derive(Debug, Clone, Default)]
struct DrawState {
    transform: Affine,
    /// Clip quads in device space; a pixel must be inside all of them.
    clips: Vec<Quad>,
}

/// An RGBA render target with canvas-style transform and clip state.
#[derive(Debug)]
pub struct Surface {
    image: RgbaImage,
    state: DrawState,
    saved: Vec<DrawState>,
}

/// Integer pixel span `[x0, x1) x [y0, y1)` worth visiting for a draw.
struct PixelSpan {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Surface {
    /// Allocate a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::EmptySurface { width, height });
        }
        Ok(Self { image: RgbaImage::new(width, height), state: DrawState::default(), saved: Vec::new() })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Finish drawing and take the pixels.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Current user-to-device transform.
    pub fn current_transform(&self) -> Affine {
        self.state.transform
    }

    /// Number of active clip quads.
    pub fn clip_depth(&self) -> usize {
        self.state.clips.len()
    }

    /// Number of outstanding saves.
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    /// Push the current transform and clip; the guard pops them on drop.
    pub fn save(&mut self) -> SurfaceGuard<'_> {
        self.saved.push(self.state.clone());
        SurfaceGuard { surface: self }
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    /// Post-multiply the current transform: `m` applies to user coordinates
    /// before whatever transform is already in effect.
    pub fn transform(&mut self, m: Affine) {
        self.state.transform = self.state.transform.then_apply(&m);
    }

    /// Intersect the clip with `quad`, given in current user coordinates.
    pub fn clip(&mut self, quad: &Quad) -> Result<(), SurfaceError> {
        let device = quad.transformed(&self.state.transform)?;
        self.state.clips.push(device);
        Ok(())
    }

    /// Draw `region` of the atlas stretched over `dest` (user coordinates).
    ///
    /// Each device pixel whose center falls inside the transformed `dest`
    /// (edges included) and inside every clip takes the nearest texel,
    /// composited source-over.
    ///
    /// A pixel center lying on an edge shared with a neighbouring draw is
    /// painted by both, so the later draw owns that pixel. Keep the test
    /// closed: a half-open one leaves such pixels unpainted next to a
    /// mirrored neighbour.
    pub fn draw_region(&mut self, atlas: &TextureAtlas, region: SourceRegion, dest: Rect) -> Result<(), SurfaceError> {
        atlas.check(region)?;
        if region.w == 0 || region.h == 0 || dest.is_empty() {
            return Ok(());
        }

        let inverse = self.state.transform.invert()?;
        let Some(span) = self.device_span(&dest) else {
            return Ok(());
        };

        for py in span.y0..span.y1 {
            for px in span.x0..span.x1 {
                let center = Point2::new(px as f64 + 0.5, py as f64 + 0.5);
                if !self.state.clips.iter().all(|clip| clip.contains(center)) {
                    continue;
                }

                let local = inverse.apply(center);
                if !covers(&dest, local) {
                    continue;
                }

                let tx = region.x + texel_offset(local.x - dest.x, dest.w, region.w);
                let ty = region.y + texel_offset(local.y - dest.y, dest.h, region.h);
                let src = atlas.texel(tx, ty);
                if src[3] == 0 {
                    continue;
                }

                let dst = *self.image.get_pixel(px, py);
                self.image.put_pixel(px, py, blend::source_over(src, dst));
            }
        }

        Ok(())
    }

    /// Device pixels touched by `dest` under the current transform, narrowed
    /// by the clip bounds and the surface edges.
    fn device_span(&self, dest: &Rect) -> Option<PixelSpan> {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for corner in dest.corners() {
            let p = self.state.transform.apply(corner);
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        for clip in &self.state.clips {
            let (clip_min, clip_max) = clip.bounds();
            min.x = min.x.max(clip_min.x);
            min.y = min.y.max(clip_min.y);
            max.x = max.x.min(clip_max.x);
            max.y = max.y.min(clip_max.y);
        }

        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = max.x.ceil().min(self.width() as f64).max(0.0) as u32;
        let y1 = max.y.ceil().min(self.height() as f64).max(0.0) as u32;

        if x0 >= x1 || y0 >= y1 {
            None
        } else {
            Some(PixelSpan { x0, y0, x1, y1 })
        }
    }
}

/// Closed containment with a little slack, so pixel centers that land on an
/// edge shared by two abutting draws are painted by at least one of them.
fn covers(dest: &Rect, p: Point2) -> bool {
    let slack_x = dest.w * EDGE_SLACK;
    let slack_y = dest.h * EDGE_SLACK;
    p.x >= dest.x - slack_x && p.x <= dest.x + dest.w + slack_x && p.y >= dest.y - slack_y && p.y <= dest.y + dest.h + slack_y
}

/// Index of the texel covering `offset` along an edge of `extent` user units
/// spanning `texels` texels.
fn texel_offset(offset: f64, extent: f64, texels: u32) -> u32 {
    let t = (offset / extent * texels as f64).floor().max(0.0) as u32;
    t.min(texels - 1)
}

/// Scoped access to a [`Surface`] that restores transform and clip on drop.
pub struct SurfaceGuard<'a> {
    surface: &'a mut Surface,
}

impl Deref for SurfaceGuard<'_> {
    type Target = Surface;

    fn deref(&self) -> &Surface {
        self.surface
    }
}

impl DerefMut for SurfaceGuard<'_> {
    fn deref_mut(&mut self) -> &mut Surface {
        self.surface
    }
}

impl Drop for SurfaceGuard<'_> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}
