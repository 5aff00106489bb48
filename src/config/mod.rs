//! Configuration for the renderer, CLI and HTTP service
//!
//! Provides types and loading for `skinrender.toml` plus environment
//! overrides.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
