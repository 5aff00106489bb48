//! Skinrender HTTP service

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use skinrender::config::{check, load_config, merge_cli_overrides, CliOverrides};
use skinrender::server;
use skinrender::telemetry::init_tracing;

/// Serve skin renders over HTTP
#[derive(Debug, Parser)]
#[command(name = "skinrender-server")]
#[command(version)]
struct Args {
    /// Config file to use instead of discovering skinrender.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides server.bind)
    #[arg(long)]
    bind: Option<String>,

    /// Base URL for both profile services (overrides [api] and the environment)
    #[arg(long, value_name = "URL")]
    api_base_url: Option<String>,

    /// Print debug logs
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides { bind: self.bind.clone(), api_base_url: self.api_base_url.clone() }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };
    merge_cli_overrides(&mut config, &args.overrides());
    if let Err(e) = check(&config) {
        eprintln!("Error: {}", e);
        return ExitCode::from(2);
    }

    match server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server stopped");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
