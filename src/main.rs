//! Skinrender - command-line renders of player skins

use std::process::ExitCode;

use skinrender::cli;

fn main() -> ExitCode {
    cli::run()
}
