//! Skinrender - renders of player skin textures
//!
//! This library provides:
//! - Compositors turning a 64x64 (or legacy 64x32) skin atlas into a flat
//!   avatar, an isometric head cube, a full body or a bust
//! - A profile client resolving player names to skin textures
//! - A facade ([`SkinRenderer`]) chaining the two, plus the CLI and HTTP
//!   service built on it

pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod output;
pub mod profile;
pub mod render;
pub mod renderer;
pub mod server;
pub mod surface;
pub mod telemetry;

pub use error::{Error, ParameterError, Result};
pub use render::{RenderKind, RenderSize};
pub use renderer::SkinRenderer;
