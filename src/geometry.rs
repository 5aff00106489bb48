//! Points, rectangles, quads and 2D affine transforms
//!
//! Everything here works in `f64` destination-pixel units. The compositors
//! build quads from projected cube corners and derive the affine transform
//! that maps the unit square onto each of them.

use std::ops::{Add, Mul, Sub};
use thiserror::Error;

/// Cross products at or below this magnitude count as collinear.
const AREA_EPSILON: f64 = 1e-9;

/// Errors raised by geometric constructions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Three consecutive corners are collinear or two corners coincide
    #[error("quad is degenerate (collinear or zero-area corners)")]
    DegenerateQuad,
    /// Corners turn in both directions (self-intersecting or concave)
    #[error("quad corners do not share a consistent winding")]
    InconsistentWinding,
    /// The transform collapses the plane and cannot be inverted
    #[error("transform is not invertible (determinant {determinant})")]
    SingularTransform { determinant: f64 },
}

/// A point in 2D destination space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector from the origin to this point.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Z component of the 3D cross product of two planar vectors.
    pub fn cross(self, other: Point2) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Point2;

    fn mul(self, rhs: f64) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

/// A point in 3D model space (cube corners use 0 or 1 per axis).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned rectangle in destination (or user) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// The unit square `[0,1] x [0,1]`.
    pub const UNIT: Rect = Rect::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open containment: left/top edges are inside, right/bottom are not.
    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    /// Corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.x, self.y),
            Point2::new(self.x + self.w, self.y),
            Point2::new(self.x + self.w, self.y + self.h),
            Point2::new(self.x, self.y + self.h),
        ]
    }

    pub fn is_empty(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }
}

/// A convex quadrilateral with a consistent winding.
///
/// Construction rejects collinear corners and bow-tie orderings, so every
/// `Quad` in circulation has a well defined inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    corners: [Point2; 4],
}

impl Quad {
    /// Build a quad from four corners in drawing order.
    pub fn new(corners: [Point2; 4]) -> Result<Self, GeometryError> {
        let turns: [f64; 4] = std::array::from_fn(|i| {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            let c = corners[(i + 2) % 4];
            (b - a).cross(c - b)
        });

        if turns.iter().any(|t| t.abs() <= AREA_EPSILON) {
            return Err(GeometryError::DegenerateQuad);
        }
        let positive = turns.iter().filter(|t| **t > 0.0).count();
        if positive != 0 && positive != 4 {
            return Err(GeometryError::InconsistentWinding);
        }

        Ok(Self { corners })
    }

    pub fn corners(&self) -> &[Point2; 4] {
        &self.corners
    }

    /// Shoelace area; the sign encodes the winding direction.
    pub fn signed_area(&self) -> f64 {
        let mut sum = 0.0;
        for i in 0..4 {
            sum += self.corners[i].cross(self.corners[(i + 1) % 4]);
        }
        sum / 2.0
    }

    /// Average of the four corners.
    pub fn centroid(&self) -> Point2 {
        let sum = self.corners.iter().fold(Point2::default(), |acc, p| acc + *p);
        sum * 0.25
    }

    /// Push every corner `epsilon` units away from the centroid.
    ///
    /// A corner sitting exactly on the centroid is left in place. The
    /// result is re-validated, so the winding of the input is preserved.
    pub fn expand(&self, epsilon: f64) -> Result<Quad, GeometryError> {
        let center = self.centroid();
        let corners = self.corners.map(|p| {
            let d = p - center;
            let len = d.length();
            if len == 0.0 {
                p
            } else {
                p + d * (epsilon / len)
            }
        });
        Quad::new(corners)
    }

    /// Map all corners through `transform`.
    pub fn transformed(&self, transform: &Affine) -> Result<Quad, GeometryError> {
        Quad::new(self.corners.map(|p| transform.apply(p)))
    }

    /// Inside test, inclusive of the edges.
    pub fn contains(&self, p: Point2) -> bool {
        let orientation = self.signed_area().signum();
        (0..4).all(|i| {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            (b - a).cross(p - a) * orientation >= 0.0
        })
    }

    /// Smallest axis-aligned box holding the quad, as `(min, max)`.
    pub fn bounds(&self) -> (Point2, Point2) {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.corners {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }
}

/// 2D affine transform in canvas order `(a, b, c, d, e, f)`:
///
/// ```text
/// x' = a*x + c*y + e
/// y' = b*x + d*y + f
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// The map taking the unit square onto `quad`.
    ///
    /// Corner 0 is the origin, `corner1 - corner0` the image of the x axis
    /// and `corner3 - corner0` the image of the y axis. For a parallelogram
    /// the unit square lands exactly on the quad.
    pub fn from_quad(quad: &Quad) -> Self {
        let [p0, p1, _, p3] = *quad.corners();
        let u = p1 - p0;
        let v = p3 - p0;
        Self::new(u.x, u.y, v.x, v.y, p0.x, p0.y)
    }

    /// Composition `self ∘ inner`: points go through `inner` first.
    pub fn then_apply(&self, inner: &Affine) -> Affine {
        let s = self;
        Affine::new(
            s.a * inner.a + s.c * inner.b,
            s.b * inner.a + s.d * inner.b,
            s.a * inner.c + s.c * inner.d,
            s.b * inner.c + s.d * inner.d,
            s.a * inner.e + s.c * inner.f + s.e,
            s.b * inner.e + s.d * inner.f + s.f,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn invert(&self) -> Result<Affine, GeometryError> {
        let det = self.determinant();
        if det.abs() <= AREA_EPSILON || !det.is_finite() {
            return Err(GeometryError::SingularTransform { determinant: det });
        }
        Ok(Affine::new(
            self.d / det,
            -self.b / det,
            -self.c / det,
            self.a / det,
            (self.c * self.f - self.d * self.e) / det,
            (self.b * self.e - self.a * self.f) / det,
        ))
    }

    pub fn apply(&self, p: Point2) -> Point2 {
        Point2::new(self.a * p.x + self.c * p.y + self.e, self.b * p.x + self.d * p.y + self.f)
    }
}
