//! Shared fixtures: a stand-in profile service on an ephemeral port.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use image::{Rgba, RgbaImage};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

use skinrender::config::ApiConfig;
use skinrender::output::encode_png;
use skinrender::profile::textures::{encode_textures, TextureRef, TextureSet, TexturesPayload};

pub const NOTCH_ID: &str = "069a79f444e94726a5befca90e38aaf5";
pub const LEGACY_ID: &str = "0000000000000000000000000000c0de";
pub const SKINLESS_ID: &str = "ffffffffffffffffffffffffffffffff";
pub const BROKEN_ID: &str = "badbadbadbadbadbadbadbadbadbad00";

/// Opaque 64 wide skin where every texel has its own color.
pub fn skin_image(height: u32) -> RgbaImage {
    RgbaImage::from_fn(64, height, |x, y| Rgba([(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8, 255]))
}

pub fn skin_png(height: u32) -> Vec<u8> {
    encode_png(&skin_image(height)).unwrap()
}

/// Requests seen by the fake service.
#[derive(Debug, Default)]
pub struct Counters {
    pub lookups: AtomicUsize,
    pub profiles: AtomicUsize,
    pub textures: AtomicUsize,
}

impl Counters {
    pub fn snapshot(&self) -> (usize, usize, usize) {
        (
            self.lookups.load(Ordering::SeqCst),
            self.profiles.load(Ordering::SeqCst),
            self.textures.load(Ordering::SeqCst),
        )
    }
}

#[derive(Clone)]
struct UpstreamState {
    base_url: String,
    counters: Arc<Counters>,
}

/// Running fake upstream; the server task lives as long as the runtime.
pub struct FakeUpstream {
    pub base_url: String,
    pub counters: Arc<Counters>,
}

impl FakeUpstream {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let counters = Arc::new(Counters::default());
        let state = UpstreamState { base_url: base_url.clone(), counters: counters.clone() };

        let app = Router::new()
            .route("/users/profiles/minecraft/{name}", get(lookup))
            .route("/session/minecraft/profile/{id}", get(profile))
            .route("/textures/{name}", get(texture))
            .with_state(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, counters }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::with_base_url(&self.base_url)
    }

    pub fn calls(&self) -> (usize, usize, usize) {
        self.counters.snapshot()
    }
}

async fn lookup(State(state): State<UpstreamState>, Path(name): Path<String>) -> Response {
    state.counters.lookups.fetch_add(1, Ordering::SeqCst);
    let id = match name.to_ascii_lowercase().as_str() {
        "notch" => NOTCH_ID,
        "oldtimer" => LEGACY_ID,
        "skinless" => SKINLESS_ID,
        "broken" => BROKEN_ID,
        // The real service answers unknown names with an empty 204 or a 404.
        "nobody" => return StatusCode::NO_CONTENT.into_response(),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    Json(json!({ "id": id, "name": name })).into_response()
}

async fn profile(State(state): State<UpstreamState>, Path(id): Path<String>) -> Response {
    state.counters.profiles.fetch_add(1, Ordering::SeqCst);
    let texture = match id.as_str() {
        NOTCH_ID => Some("notch"),
        LEGACY_ID => Some("legacy"),
        BROKEN_ID => Some("broken"),
        SKINLESS_ID => None,
        _ => return StatusCode::NO_CONTENT.into_response(),
    };
    let payload = TexturesPayload {
        textures: TextureSet {
            skin: texture.map(|name| TextureRef { url: format!("{}/textures/{}", state.base_url, name) }),
            cape: None,
        },
    };
    Json(json!({
        "id": id,
        "name": "player",
        "properties": [{ "name": "textures", "value": encode_textures(&payload) }]
    }))
    .into_response()
}

async fn texture(State(state): State<UpstreamState>, Path(name): Path<String>) -> Response {
    state.counters.textures.fetch_add(1, Ordering::SeqCst);
    match name.as_str() {
        "notch" => skin_png(64).into_response(),
        "legacy" => skin_png(32).into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
