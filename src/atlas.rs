//! Skin texture atlas and the named regions inside it
//!
//! A skin is a 64x64 RGBA image (or a legacy 64x32 one) in which fixed
//! rectangles hold the faces of every body part. The atlas is decoded once
//! per render and never mutated afterwards.

use image::{Rgba, RgbaImage};
use std::fmt;
use thiserror::Error;

/// Width shared by every supported skin layout.
pub const ATLAS_WIDTH: u32 = 64;
/// Height of the current skin layout.
pub const STANDARD_HEIGHT: u32 = 64;
/// Height of skins created before the second layer existed.
pub const LEGACY_HEIGHT: u32 = 32;

/// Front of the head.
pub const HEAD_FRONT: SourceRegion = SourceRegion::new(8, 8, 8, 8);
/// Player's right side of the head (drawn on the left of the cube).
pub const HEAD_RIGHT: SourceRegion = SourceRegion::new(0, 8, 8, 8);
/// Top of the head.
pub const HEAD_TOP: SourceRegion = SourceRegion::new(8, 0, 8, 8);
/// Front of the hat overlay.
pub const HAT_FRONT: SourceRegion = SourceRegion::new(40, 8, 8, 8);

/// Errors raised while loading or reading an atlas.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Texture bytes could not be decoded as an image
    #[error("failed to decode skin texture: {0}")]
    Decode(#[from] image::ImageError),
    /// Decoded image is not a 64x64 or 64x32 skin
    #[error("unsupported skin dimensions {width}x{height}, expected 64x64 or 64x32")]
    UnsupportedDimensions { width: u32, height: u32 },
    /// A region reaches past the atlas edge
    #[error("source region {region} lies outside the {width}x{height} atlas")]
    RegionOutOfBounds { region: SourceRegion, width: u32, height: u32 },
}

/// Skin layout, determined from the atlas height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtlasFormat {
    /// 64x64 with second-layer and separate left limbs
    Standard,
    /// 64x32 single-layer skin; left limbs mirror the right ones
    Legacy,
}

/// Rectangle in atlas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRegion {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl SourceRegion {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge.
    pub const fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Exclusive bottom edge.
    pub const fn bottom(&self) -> u32 {
        self.y + self.h
    }
}

impl fmt::Display for SourceRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.w, self.h)
    }
}

/// A decoded skin texture.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    image: RgbaImage,
    format: AtlasFormat,
}

impl TextureAtlas {
    /// Wrap an already decoded image, rejecting non-skin dimensions.
    pub fn from_image(image: RgbaImage) -> Result<Self, AtlasError> {
        let format = match image.dimensions() {
            (ATLAS_WIDTH, STANDARD_HEIGHT) => AtlasFormat::Standard,
            (ATLAS_WIDTH, LEGACY_HEIGHT) => AtlasFormat::Legacy,
            (width, height) => return Err(AtlasError::UnsupportedDimensions { width, height }),
        };
        Ok(Self { image, format })
    }

    /// Decode PNG (or any format `image` recognises) bytes into an atlas.
    pub fn decode(bytes: &[u8]) -> Result<Self, AtlasError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Self::from_image(image)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn format(&self) -> AtlasFormat {
        self.format
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Whether `region` lies entirely inside the atlas.
    pub fn contains(&self, region: SourceRegion) -> bool {
        region.right() <= self.width() && region.bottom() <= self.height()
    }

    /// Like [`TextureAtlas::contains`], but as an error for `?` chains.
    pub fn check(&self, region: SourceRegion) -> Result<(), AtlasError> {
        if self.contains(region) {
            Ok(())
        } else {
            Err(AtlasError::RegionOutOfBounds {
                region,
                width: self.width(),
                height: self.height(),
            })
        }
    }

    /// Texel at `(x, y)`; callers stay within a checked region.
    pub fn texel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }
}
