//! Player profile resolution and texture download
//!
//! Turning a name into pixels takes three upstream calls: name to identifier,
//! identifier to skin URL, URL to texture bytes. [`TextureSource`] is the seam
//! between the renderer and whatever answers those calls; [`ProfileClient`]
//! is the HTTP implementation.

pub mod client;
pub mod identifier;
pub mod textures;

pub use client::ProfileClient;
pub use identifier::PlayerId;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while talking to the profile service.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Name lookup answered with a non-success status
    #[error("player not found: {0}")]
    PlayerNotFound(String),
    /// Session profile request answered with a non-success status
    #[error("profile not found: {0}")]
    ProfileNotFound(String),
    /// Texture download answered with a non-success status
    #[error("texture download from {url} failed with status {status}")]
    TextureStatus { url: String, status: u16 },
    /// Response body did not have the expected shape
    #[error("malformed profile response: {0}")]
    Malformed(String),
    /// URL could not be built from the configured base
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),
    /// Transport failure (connect, timeout, body read)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Where profiles and skin textures come from.
#[async_trait]
pub trait TextureSource: Send + Sync {
    /// Resolve a player name to its identifier.
    async fn lookup_name(&self, name: &str) -> Result<PlayerId, ProfileError>;

    /// Skin URL for `id`, or `None` when the profile has no skin.
    async fn skin_url(&self, id: &PlayerId) -> Result<Option<String>, ProfileError>;

    /// Raw texture bytes behind `url`.
    async fn fetch_texture(&self, url: &str) -> Result<Vec<u8>, ProfileError>;
}
