//! Command-line interface implementation
//!
//! This module provides the CLI entry point and hands the parsed arguments to
//! the render command.

mod render;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::render::{RenderKind, RenderSize};

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Skinrender - avatar, isometric head, body and bust renders from player skins
#[derive(Debug, Parser)]
#[command(name = "skinrender")]
#[command(about = "Render avatars, isometric heads, bodies and busts from player skins")]
#[command(version)]
pub struct Cli {
    /// What to render
    #[arg(value_enum, ignore_case = true)]
    pub kind: RenderKind,

    /// Player name or identifier (32 hex digits, dashes optional)
    #[arg(value_name = "USERNAME_OR_ID")]
    pub player: String,

    /// Output file, or a directory to write {player}_{kind}.png into
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Size in pixels (8-512); defaults to render.default_size from the config
    #[arg(short, long)]
    pub size: Option<RenderSize>,

    /// Config file to use instead of discovering skinrender.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL for both profile services (overrides [api] and the environment)
    #[arg(long, value_name = "URL")]
    pub api_base_url: Option<String>,

    /// Print debug logs to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse the process arguments and run.
pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::from(EXIT_INVALID_ARGS) } else { ExitCode::from(EXIT_SUCCESS) };
        }
    };

    crate::telemetry::init_tracing(cli.verbose);
    render::run_render(&cli)
}
