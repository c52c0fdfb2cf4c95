#![forbid(unsafe_code)]

//! Deterministic replay harness for huddle transitions.
//!
//! A [`Scenario`] is a JSON document listing scenes and timed selections. The
//! harness replays it against a [`TransitionEngine`](huddle_runtime::TransitionEngine)
//! driven by a simulated display and records every published frame and engine
//! event into a [`FrameTrace`]. The trace serializes to JSON lines and carries
//! an FNV-1a checksum, so two runs of the same scenario can be compared with a
//! single number.
//!
//! # Quick Start
//!
//! ```ignore
//! use huddle_harness::{Scenario, replay};
//!
//! let scenario = Scenario::load("plays.json")?;
//! let trace = replay(&scenario)?;
//! println!("{:#018x}", trace.checksum()?);
//! ```

pub mod logging;
pub mod replay;
pub mod script;
pub mod trace;

use std::fmt;
use std::io;

use huddle_runtime::ConfigError;

pub use logging::init_tracing;
pub use replay::replay;
pub use script::{Scenario, ScenarioConfig, Step};
pub use trace::{FrameTrace, TraceEntry, fnv1a64};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while loading or replaying a scenario.
#[derive(Debug)]
pub enum HarnessError {
    /// Reading or writing a file or stream failed.
    Io(io::Error),
    /// Scenario or trace JSON was malformed.
    Json(serde_json::Error),
    /// Two scenes share an id.
    DuplicateScene(String),
    /// A scene lists the same point key twice.
    DuplicateKey { scene: String, key: String },
    /// A step selects a scene id that the scenario does not define.
    UnknownScene { step: usize, id: String },
    /// The scenario's transition settings were rejected.
    Config(ConfigError),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Json(err) => write!(f, "invalid JSON: {err}"),
            Self::DuplicateScene(id) => write!(f, "scene id {id:?} is defined more than once"),
            Self::DuplicateKey { scene, key } => {
                write!(f, "scene {scene:?} lists point key {key:?} more than once")
            }
            Self::UnknownScene { step, id } => {
                write!(f, "step {step} selects unknown scene {id:?}")
            }
            Self::Config(err) => write!(f, "invalid transition config: {err}"),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::DuplicateScene(_) | Self::DuplicateKey { .. } | Self::UnknownScene { .. } => {
                None
            }
        }
    }
}

impl From<io::Error> for HarnessError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ConfigError> for HarnessError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_names_the_problem() {
        let err = HarnessError::UnknownScene {
            step: 3,
            id: "nickel".into(),
        };
        assert_eq!(err.to_string(), "step 3 selects unknown scene \"nickel\"");

        let err = HarnessError::from(ConfigError::ExitDistance(0.0));
        assert!(err.to_string().starts_with("invalid transition config"));
        assert!(err.source().is_some());
    }

    #[test]
    fn io_errors_convert() {
        let err: HarnessError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, HarnessError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn json_errors_convert() {
        let err: HarnessError = serde_json::from_str::<Scenario>("{").unwrap_err().into();
        assert!(matches!(err, HarnessError::Json(_)));
    }
}
