//! Log subscriber setup for the binaries
//!
//! Library code only emits `tracing` events; the binaries decide where they
//! go. `RUST_LOG` wins when set, otherwise `-v` selects debug output for this
//! crate and warnings for everything else.

use tracing_subscriber::EnvFilter;

/// Default directives without `-v`.
pub const DEFAULT_FILTER: &str = "skinrender=info,warn";
/// Default directives with `-v`.
pub const VERBOSE_FILTER: &str = "skinrender=debug,tower_http=debug,info";

/// Filter for the given verbosity, honouring `RUST_LOG`.
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Install the global subscriber, writing to stderr so stdout stays free for
/// progress output. Calling it twice is harmless.
pub fn init_tracing(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(false), "skinrender=info,warn");
        assert!(default_directives(true).starts_with("skinrender=debug"));
    }

    #[test]
    fn test_directives_parse() {
        for verbose in [false, true] {
            assert!(EnvFilter::try_new(default_directives(verbose)).is_ok());
        }
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing(false);
        init_tracing(true);
    }
}
