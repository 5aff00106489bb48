//! HTTP implementation of [`TextureSource`]

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::debug;

use super::{textures, PlayerId, ProfileError, TextureSource};
use crate::config::ApiConfig;

/// Client for the name lookup and session services.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    http: reqwest::Client,
    api_base: Url,
    session_base: Url,
}

impl ProfileClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ProfileError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            api_base: parse_base(&config.api_base_url)?,
            session_base: parse_base(&config.session_base_url)?,
        })
    }

    /// `{api_base}/users/profiles/minecraft/{name}`
    pub fn lookup_url(&self, name: &str) -> Result<Url, ProfileError> {
        join_segments(&self.api_base, &["users", "profiles", "minecraft", name])
    }

    /// `{session_base}/session/minecraft/profile/{id}`
    pub fn profile_url(&self, id: &PlayerId) -> Result<Url, ProfileError> {
        join_segments(&self.session_base, &["session", "minecraft", "profile", id.as_str()])
    }

    async fn get(&self, url: Url) -> Result<(StatusCode, Vec<u8>), ProfileError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }
}

fn parse_base(base: &str) -> Result<Url, ProfileError> {
    let url = Url::parse(base).map_err(|_| ProfileError::InvalidUrl(base.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ProfileError::InvalidUrl(base.to_string()));
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each one.
fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ProfileError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ProfileError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl TextureSource for ProfileClient {
    async fn lookup_name(&self, name: &str) -> Result<PlayerId, ProfileError> {
        let url = self.lookup_url(name)?;
        debug!(%url, "looking up player name");
        let (status, body) = self.get(url).await?;
        if status != StatusCode::OK {
            debug!(name, status = status.as_u16(), "name lookup failed");
            return Err(ProfileError::PlayerNotFound(name.to_string()));
        }
        textures::parse_lookup(&body)
    }

    async fn skin_url(&self, id: &PlayerId) -> Result<Option<String>, ProfileError> {
        let url = self.profile_url(id)?;
        debug!(%url, "fetching session profile");
        let (status, body) = self.get(url).await?;
        if status != StatusCode::OK {
            debug!(%id, status = status.as_u16(), "profile request failed");
            return Err(ProfileError::ProfileNotFound(id.to_string()));
        }
        textures::parse_skin_url(&body)
    }

    async fn fetch_texture(&self, url: &str) -> Result<Vec<u8>, ProfileError> {
        let parsed = Url::parse(url).map_err(|_| ProfileError::InvalidUrl(url.to_string()))?;
        debug!(url = %parsed, "downloading texture");
        let (status, body) = self.get(parsed).await?;
        if !status.is_success() {
            return Err(ProfileError::TextureStatus { url: url.to_string(), status: status.as_u16() });
        }
        Ok(body)
    }
}
