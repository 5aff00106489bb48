//! Identifier-to-PNG facade
//!
//! [`SkinRenderer`] chains the profile lookups, the texture download and one
//! compositor. Arguments are validated before the first upstream request and
//! the CPU-bound compositing runs on tokio's blocking pool.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::atlas::TextureAtlas;
use crate::config::ApiConfig;
use crate::error::{Error, ParameterError, Result};
use crate::output::encode_png;
use crate::profile::{PlayerId, ProfileClient, TextureSource};
use crate::render::{render_atlas, RenderError, RenderKind, RenderSize};

/// Decode a skin texture, run the compositor for `kind` and encode the result.
///
/// Kinds that ignore the size ([`RenderKind::Skin`]) hand the texture back
/// untouched.
pub fn render_texture(texture: &[u8], kind: RenderKind, size: RenderSize) -> Result<Vec<u8>, RenderError> {
    if !kind.uses_size() {
        return Ok(texture.to_vec());
    }
    let atlas = TextureAtlas::decode(texture)?;
    let image = render_atlas(&atlas, kind, size)?;
    Ok(encode_png(&image)?)
}

/// Renders players by name or identifier.
#[derive(Clone)]
pub struct SkinRenderer {
    source: Arc<dyn TextureSource>,
}

impl std::fmt::Debug for SkinRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkinRenderer").finish_non_exhaustive()
    }
}

impl SkinRenderer {
    /// Renderer backed by the HTTP profile client.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = ProfileClient::new(config).map_err(Error::Resolution)?;
        Ok(Self::with_source(client))
    }

    pub fn with_source(source: impl TextureSource + 'static) -> Self {
        Self { source: Arc::new(source) }
    }

    pub fn from_shared(source: Arc<dyn TextureSource>) -> Self {
        Self { source }
    }

    /// Canonical identifier for a name or identifier. Identifiers are
    /// normalised locally; only names go upstream.
    pub async fn resolve_id(&self, name_or_id: &str) -> Result<PlayerId> {
        let input = require_identifier(name_or_id)?;
        if let Some(id) = PlayerId::parse(input) {
            debug!(%id, "identifier given directly");
            return Ok(id);
        }
        let id = self.source.lookup_name(input).await.map_err(Error::Resolution)?;
        debug!(name = input, %id, "resolved player name");
        Ok(id)
    }

    /// Skin URL for an identifier, `None` when the profile has no skin.
    pub async fn skin_url(&self, id: &PlayerId) -> Result<Option<String>> {
        self.source.skin_url(id).await.map_err(Error::Resolution)
    }

    /// Raw bytes behind a texture URL.
    pub async fn fetch_texture(&self, url: &str) -> Result<Vec<u8>> {
        self.source.fetch_texture(url).await.map_err(Error::Fetch)
    }

    /// The player's skin texture, as stored upstream.
    pub async fn fetch_skin(&self, name_or_id: &str) -> Result<Vec<u8>> {
        let id = self.resolve_id(name_or_id).await?;
        let url = self.skin_url(&id).await?.ok_or(Error::SkinNotFound)?;
        self.fetch_texture(&url).await
    }

    /// Render `kind` for a player and return PNG bytes.
    pub async fn render(&self, kind: RenderKind, name_or_id: &str, size: RenderSize) -> Result<Vec<u8>> {
        let started = Instant::now();
        let texture = self.fetch_skin(name_or_id).await?;
        if !kind.uses_size() {
            return Ok(texture);
        }

        let png = Self::composite(texture, kind, size).await?;

        info!(
            %kind,
            %size,
            player = name_or_id.trim(),
            bytes = png.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "render complete"
        );
        Ok(png)
    }

    /// [`render_texture`] on the blocking pool.
    pub async fn composite(texture: Vec<u8>, kind: RenderKind, size: RenderSize) -> Result<Vec<u8>> {
        let png = tokio::task::spawn_blocking(move || render_texture(&texture, kind, size))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))??;
        Ok(png)
    }

    /// Like [`SkinRenderer::render`] with the kind and size still as text.
    /// A missing size means the default. Everything is validated before any
    /// request goes out.
    pub async fn render_by_name(&self, kind: &str, name_or_id: &str, size: Option<&str>) -> Result<Vec<u8>> {
        let kind: RenderKind = kind.parse()?;
        let size = match size {
            Some(raw) => raw.parse::<RenderSize>()?,
            None => RenderSize::default(),
        };
        require_identifier(name_or_id)?;
        self.render(kind, name_or_id, size).await
    }

    pub async fn render_avatar(&self, name_or_id: &str, size: RenderSize) -> Result<Vec<u8>> {
        self.render(RenderKind::Avatar, name_or_id, size).await
    }

    pub async fn render_cube(&self, name_or_id: &str, size: RenderSize) -> Result<Vec<u8>> {
        self.render(RenderKind::Cube, name_or_id, size).await
    }

    pub async fn render_body(&self, name_or_id: &str, size: RenderSize) -> Result<Vec<u8>> {
        self.render(RenderKind::Body, name_or_id, size).await
    }

    pub async fn render_bust(&self, name_or_id: &str, size: RenderSize) -> Result<Vec<u8>> {
        self.render(RenderKind::Bust, name_or_id, size).await
    }
}

fn require_identifier(name_or_id: &str) -> Result<&str> {
    let trimmed = name_or_id.trim();
    if trimmed.is_empty() {
        Err(ParameterError::MissingIdentifier.into())
    } else {
        Ok(trimmed)
    }
}
