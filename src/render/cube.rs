//! Isometric head cube
//!
//! Three faces of the head (player's right side, front and top) are projected
//! onto the screen with a fixed isometric camera. Each face is an
//! 8x8 texel square mapped with an affine transform onto a parallelogram that
//! is slightly larger than the true face, and clipped to it, so neighbouring
//! faces overlap by a fraction of a pixel instead of leaving a seam.

use image::RgbaImage;

use super::{RenderError, RenderSize};
use crate::atlas::{SourceRegion, TextureAtlas, HEAD_FRONT, HEAD_RIGHT, HEAD_TOP};
use crate::geometry::{Affine, GeometryError, Point2, Point3, Quad, Rect};
use crate::surface::Surface;

/// Distance in device pixels each face outline is pushed outwards.
pub const INSET_EPSILON: f64 = 0.6;

/// Cube edge length relative to the output size.
pub const SCALE_FACTOR: f64 = 0.45;

/// Maps unit-cube coordinates onto the output image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoProjector {
    pub center: Point2,
    pub scale: f64,
}

impl IsoProjector {
    /// Camera for an output of `size` x `size` pixels.
    pub fn for_size(size: RenderSize) -> Self {
        let s = size.get() as f64;
        Self { center: Point2::new(s / 2.0, s * 0.5), scale: s * SCALE_FACTOR }
    }

    pub fn project(&self, p: Point3) -> Point2 {
        let half_sqrt3 = 3f64.sqrt() / 2.0;
        Point2::new(
            self.center.x + (p.x - p.z) * self.scale * half_sqrt3,
            self.center.y + (p.x + p.z) * self.scale * 0.5 - p.y * self.scale,
        )
    }
}

/// The visible faces, in the order they are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    Left,
    Front,
    Top,
}

impl CubeFace {
    pub const DRAW_ORDER: [CubeFace; 3] = [CubeFace::Left, CubeFace::Front, CubeFace::Top];

    /// Atlas region painted on this face.
    pub fn region(self) -> SourceRegion {
        match self {
            CubeFace::Left => HEAD_RIGHT,
            CubeFace::Front => HEAD_FRONT,
            CubeFace::Top => HEAD_TOP,
        }
    }

    /// Unit-cube corners; corner 0 takes texel (0, 0), corner 1 the end of
    /// the first texel row and corner 3 the start of the last one.
    pub fn corners(self) -> [Point3; 4] {
        let c = |x: u8, y: u8, z: u8| Point3::new(x as f64, y as f64, z as f64);
        match self {
            CubeFace::Left => [c(0, 1, 1), c(1, 1, 1), c(1, 0, 1), c(0, 0, 1)],
            CubeFace::Front => [c(1, 1, 0), c(1, 1, 1), c(1, 0, 1), c(1, 0, 0)],
            CubeFace::Top => [c(0, 1, 1), c(0, 1, 0), c(1, 1, 0), c(1, 1, 1)],
        }
    }

    /// Exact projected outline of the face.
    pub fn outline(self, projector: &IsoProjector) -> Result<Quad, GeometryError> {
        Quad::new(self.corners().map(|p| projector.project(p)))
    }
}

/// Projected outline of `face`, grown by [`INSET_EPSILON`].
pub fn face_quad(face: CubeFace, projector: &IsoProjector) -> Result<Quad, GeometryError> {
    face.outline(projector)?.expand(INSET_EPSILON)
}

fn draw_face(surface: &mut Surface, atlas: &TextureAtlas, face: CubeFace, projector: &IsoProjector) -> Result<(), RenderError> {
    let quad = face_quad(face, projector)?;

    let mut guard = surface.save();
    guard.clip(&quad)?;
    guard.transform(Affine::from_quad(&quad));
    guard.draw_region(atlas, face.region(), Rect::UNIT)?;
    Ok(())
}

/// Render the head as an isometric cube on a `size` x `size` transparent image.
pub fn render_cube(atlas: &TextureAtlas, size: RenderSize) -> Result<RgbaImage, RenderError> {
    let s = size.get();
    let mut surface = Surface::new(s, s)?;
    let projector = IsoProjector::for_size(size);

    for face in CubeFace::DRAW_ORDER {
        draw_face(&mut surface, atlas, face, &projector)?;
    }

    Ok(surface.into_image())
}
