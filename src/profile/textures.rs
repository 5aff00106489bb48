//! Profile service payloads
//!
//! The session service wraps texture information in a base64 encoded JSON
//! document stored in the profile property named `textures`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::{PlayerId, ProfileError};

/// Name of the profile property carrying texture locations.
pub const TEXTURES_PROPERTY: &str = "textures";

/// Body of a successful name lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameLookup {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Session profile as returned for an identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub properties: Vec<ProfileProperty>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileProperty {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Decoded `textures` property value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TexturesPayload {
    #[serde(default)]
    pub textures: TextureSet,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextureSet {
    #[serde(rename = "SKIN", default, skip_serializing_if = "Option::is_none")]
    pub skin: Option<TextureRef>,
    #[serde(rename = "CAPE", default, skip_serializing_if = "Option::is_none")]
    pub cape: Option<TextureRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureRef {
    pub url: String,
}

/// Identifier from a name lookup body.
pub fn parse_lookup(body: &[u8]) -> Result<PlayerId, ProfileError> {
    let lookup: NameLookup =
        serde_json::from_slice(body).map_err(|e| ProfileError::Malformed(format!("name lookup: {}", e)))?;
    PlayerId::from_service(&lookup.id)
        .ok_or_else(|| ProfileError::Malformed(format!("name lookup returned id '{}'", lookup.id)))
}

/// Skin URL from a session profile body; `None` when the profile has no
/// textures property or the textures carry no skin.
pub fn parse_skin_url(body: &[u8]) -> Result<Option<String>, ProfileError> {
    let profile: SessionProfile =
        serde_json::from_slice(body).map_err(|e| ProfileError::Malformed(format!("session profile: {}", e)))?;
    skin_url(&profile)
}

pub fn skin_url(profile: &SessionProfile) -> Result<Option<String>, ProfileError> {
    let Some(property) = profile.properties.iter().find(|p| p.name == TEXTURES_PROPERTY) else {
        return Ok(None);
    };
    let payload = decode_textures(&property.value)?;
    Ok(payload.textures.skin.map(|skin| skin.url).filter(|url| !url.is_empty()))
}

pub fn decode_textures(value: &str) -> Result<TexturesPayload, ProfileError> {
    let json = STANDARD
        .decode(value.trim())
        .map_err(|e| ProfileError::Malformed(format!("textures property is not base64: {}", e)))?;
    serde_json::from_slice(&json).map_err(|e| ProfileError::Malformed(format!("textures property: {}", e)))
}

/// Encode a textures property the way the session service does.
pub fn encode_textures(payload: &TexturesPayload) -> String {
    STANDARD.encode(serde_json::to_vec(payload).unwrap_or_default())
}
