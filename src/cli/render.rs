//! Render command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::loader::{check, load_config, merge_cli_overrides, CliOverrides};
use crate::error::{Error, ParameterError};
use crate::output::{generate_output_path, write_bytes};
use crate::render::{RenderKind, RenderSize};
use crate::renderer::SkinRenderer;

use super::{Cli, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the render command
pub fn run_render(cli: &Cli) -> ExitCode {
    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    merge_cli_overrides(&mut config, &CliOverrides { api_base_url: cli.api_base_url.clone(), ..Default::default() });
    if let Err(e) = check(&config) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let size = match cli.size {
        Some(size) => size,
        None => match RenderSize::new(config.render.default_size) {
            Ok(size) => size,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        },
    };

    let renderer = match SkinRenderer::new(&config.api) {
        Ok(renderer) => renderer,
        Err(e) => return report(&e),
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match runtime.block_on(render_to_file(&renderer, cli.kind, &cli.player, size, &cli.output)) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => report(&e),
    }
}

/// Print an error and pick the exit code for it.
fn report(err: &Error) -> ExitCode {
    eprintln!("Error: {}", err);
    if err.is_invalid_parameter() {
        ExitCode::from(EXIT_INVALID_ARGS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

async fn render_to_file(
    renderer: &SkinRenderer,
    kind: RenderKind,
    player: &str,
    size: RenderSize,
    output: &Path,
) -> Result<(), Error> {
    let player = player.trim();
    if player.is_empty() {
        return Err(ParameterError::MissingIdentifier.into());
    }

    println!("Resolving player id for \"{}\"...", player);
    let id = renderer.resolve_id(player).await?;
    println!("Player id: {}", id);

    println!("Fetching skin...");
    let url = renderer.skin_url(&id).await?.ok_or(Error::SkinNotFound)?;
    let texture = renderer.fetch_texture(&url).await?;

    println!("Rendering {}...", kind);
    let png = SkinRenderer::composite(texture, kind, size).await?;
    let size_line = if kind.uses_size() { format!("{}px", size) } else { format!("{} bytes", png.len()) };

    let path = generate_output_path(output, player, kind);
    write_bytes(&png, &path)?;
    println!("Saved to: {}", path.display());
    println!("Size: {}", size_line);
    Ok(())
}
