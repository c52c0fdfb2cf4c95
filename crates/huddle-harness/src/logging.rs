#![forbid(unsafe_code)]

//! Diagnostic subscriber setup.
//!
//! Diagnostics go to stderr so stdout can carry the JSONL trace untouched.
//! The filter is read from `HUDDLE_LOG` using `EnvFilter` directive syntax,
//! e.g. `HUDDLE_LOG=huddle_runtime=debug`. Build with the `json` feature to
//! get one JSON object per diagnostic line.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "HUDDLE_LOG";

/// Filter used when `HUDDLE_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter from `HUDDLE_LOG`, falling back to [`DEFAULT_FILTER`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global stderr subscriber.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case the existing one is left alone.
pub fn init_tracing() -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false);

    #[cfg(feature = "json")]
    let result = builder.json().try_init();
    #[cfg(not(feature = "json"))]
    let result = builder.try_init();

    result.is_ok()
}
