//! Compositors turning a skin atlas into finished renders
//!
//! Every render type is a member of the closed [`RenderKind`] set and every
//! size goes through [`RenderSize`], so an out-of-range request never reaches
//! a surface allocation.

pub mod avatar;
pub mod body;
pub mod cube;

pub use avatar::render_avatar;
pub use body::{bust_height, render_body, render_bust};
pub use cube::render_cube;

use clap::ValueEnum;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::atlas::{AtlasError, TextureAtlas};
use crate::geometry::GeometryError;
use crate::surface::SurfaceError;

/// Smallest accepted render size in pixels.
pub const MIN_SIZE: u32 = 8;
/// Largest accepted render size in pixels.
pub const MAX_SIZE: u32 = 512;
/// Size used when a caller does not ask for one.
pub const DEFAULT_SIZE: u32 = 512;

/// Errors raised by the compositors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Texture could not be loaded as a skin
    #[error(transparent)]
    Atlas(#[from] AtlasError),
    /// Drawing failed
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    /// Projected geometry was unusable
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// PNG encoding failed
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    /// Background render task did not complete
    #[error("render task failed: {0}")]
    Task(String),
}

/// Rejected size parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    /// Not an integer at all
    #[error("Size must be a number between 8 and 512, got '{0}'")]
    NotANumber(String),
    /// An integer outside `[MIN_SIZE, MAX_SIZE]`
    #[error("Size must be between 8 and 512, got {0}")]
    OutOfRange(i64),
}

/// Validated render size, always within `[MIN_SIZE, MAX_SIZE]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderSize(u32);

impl RenderSize {
    pub fn new(size: u32) -> Result<Self, SizeError> {
        if (MIN_SIZE..=MAX_SIZE).contains(&size) {
            Ok(Self(size))
        } else {
            Err(SizeError::OutOfRange(size as i64))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for RenderSize {
    fn default() -> Self {
        Self(DEFAULT_SIZE)
    }
}

impl FromStr for RenderSize {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: i64 = trimmed.parse().map_err(|_| SizeError::NotANumber(trimmed.to_string()))?;
        match u32::try_from(value) {
            Ok(size) => RenderSize::new(size),
            Err(_) => Err(SizeError::OutOfRange(value)),
        }
    }
}

impl fmt::Display for RenderSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unrecognised render type name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid render type '{0}', expected one of: avatar, cube, body, bust, skin")]
pub struct UnknownRenderKind(pub String);

/// The render types on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    /// Flat front view of the head with the hat layer
    Avatar,
    /// Isometric cube of the head
    Cube,
    /// Front view of the whole player
    Body,
    /// Head, torso and arms
    Bust,
    /// The raw skin texture
    Skin,
}

impl RenderKind {
    pub const ALL: [RenderKind; 5] =
        [RenderKind::Avatar, RenderKind::Cube, RenderKind::Body, RenderKind::Bust, RenderKind::Skin];

    pub fn as_str(self) -> &'static str {
        match self {
            RenderKind::Avatar => "avatar",
            RenderKind::Cube => "cube",
            RenderKind::Body => "body",
            RenderKind::Bust => "bust",
            RenderKind::Skin => "skin",
        }
    }

    /// Output dimensions for composited kinds; `None` for the raw skin.
    pub fn dimensions(self, size: RenderSize) -> Option<(u32, u32)> {
        let s = size.get();
        match self {
            RenderKind::Avatar | RenderKind::Cube => Some((s, s)),
            RenderKind::Body => Some((s, s * 2)),
            RenderKind::Bust => Some((s, bust_height(size))),
            RenderKind::Skin => None,
        }
    }

    /// Whether the size parameter affects this kind.
    pub fn uses_size(self) -> bool {
        !matches!(self, RenderKind::Skin)
    }
}

impl FromStr for RenderKind {
    type Err = UnknownRenderKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        RenderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| UnknownRenderKind(s.to_string()))
    }
}

impl fmt::Display for RenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run the compositor for `kind`. The raw skin comes back as the atlas image.
pub fn render_atlas(atlas: &TextureAtlas, kind: RenderKind, size: RenderSize) -> Result<RgbaImage, RenderError> {
    match kind {
        RenderKind::Avatar => render_avatar(atlas, size),
        RenderKind::Cube => render_cube(atlas, size),
        RenderKind::Body => render_body(atlas, size),
        RenderKind::Bust => render_bust(atlas, size),
        RenderKind::Skin => Ok(atlas.image().clone()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_size_bounds() {
        assert_eq!(RenderSize::new(8).unwrap().get(), 8);
        assert_eq!(RenderSize::new(512).unwrap().get(), 512);
        assert_eq!(RenderSize::new(7), Err(SizeError::OutOfRange(7)));
        assert_eq!(RenderSize::new(513), Err(SizeError::OutOfRange(513)));
        assert_eq!(RenderSize::default().get(), 512);
    }

    #[test]
    fn test_render_size_parse() {
        assert_eq!("128".parse::<RenderSize>().unwrap().get(), 128);
        assert_eq!(" 64 ".parse::<RenderSize>().unwrap().get(), 64);
        assert_eq!("4".parse::<RenderSize>(), Err(SizeError::OutOfRange(4)));
        assert_eq!("-16".parse::<RenderSize>(), Err(SizeError::OutOfRange(-16)));
        assert_eq!("abc".parse::<RenderSize>(), Err(SizeError::NotANumber("abc".to_string())));
        assert_eq!("12px".parse::<RenderSize>(), Err(SizeError::NotANumber("12px".to_string())));
        assert_eq!("".parse::<RenderSize>(), Err(SizeError::NotANumber(String::new())));
        assert!(matches!("99999999999999999999".parse::<RenderSize>(), Err(SizeError::NotANumber(_))));
    }

    #[test]
    fn test_size_error_messages() {
        assert_eq!(SizeError::OutOfRange(4).to_string(), "Size must be between 8 and 512, got 4");
    }

    #[test]
    fn test_render_kind_parse_is_case_insensitive() {
        assert_eq!("Avatar".parse::<RenderKind>().unwrap(), RenderKind::Avatar);
        assert_eq!("CUBE".parse::<RenderKind>().unwrap(), RenderKind::Cube);
        assert_eq!("bust".parse::<RenderKind>().unwrap(), RenderKind::Bust);
        assert!("head".parse::<RenderKind>().is_err());
    }

    #[test]
    fn test_render_kind_round_trips_through_display() {
        for kind in RenderKind::ALL {
            assert_eq!(kind.to_string().parse::<RenderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_render_kind_dimensions() {
        let size = RenderSize::new(100).unwrap();
        assert_eq!(RenderKind::Avatar.dimensions(size), Some((100, 100)));
        assert_eq!(RenderKind::Cube.dimensions(size), Some((100, 100)));
        assert_eq!(RenderKind::Body.dimensions(size), Some((100, 200)));
        assert_eq!(RenderKind::Bust.dimensions(size), Some((100, 125)));
        assert_eq!(RenderKind::Skin.dimensions(size), None);
    }

    #[test]
    fn test_only_skin_ignores_size() {
        for kind in RenderKind::ALL {
            let size = RenderSize::new(16).unwrap();
            assert_eq!(kind.uses_size(), kind.dimensions(size).is_some(), "{}", kind);
        }
        assert!(!RenderKind::Skin.uses_size());
    }

    #[test]
    fn test_render_atlas_dispatch_matches_dimensions() {
        let atlas = test_support::painted_atlas(64, &[]);
        let size = RenderSize::new(24).unwrap();
        for kind in RenderKind::ALL {
            let image = render_atlas(&atlas, kind, size).unwrap();
            let expected = kind.dimensions(size).unwrap_or((64, 64));
            assert_eq!(image.dimensions(), expected, "{}", kind);
        }
    }
}
