#![forbid(unsafe_code)]

//! Transition strategy selection.
//!
//! | Previous scene            | Strategy                          |
//! |---------------------------|-----------------------------------|
//! | none                      | [`Strategy::EnterOnly`]           |
//! | same category as next     | [`Strategy::Interpolate`]         |
//! | different category        | [`Strategy::ExitThenEnter`]       |
//!
//! The entry side after an exit is always the mirror of the exit side, so the
//! incoming points keep travelling the way the outgoing ones went.

use std::fmt;

use huddle_core::{Category, SlideDirection};

use crate::config::TransitionConfig;
use crate::phase::Phase;

/// How the engine moves from the current frame to a new scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "strategy", rename_all = "snake_case"))]
pub enum Strategy {
    /// Slide the new scene in from off-screen on `from` side.
    EnterOnly { from: SlideDirection },
    /// Move matched points straight to their new positions.
    Interpolate,
    /// Slide the current points out toward `exit`, then enter from the
    /// opposite side.
    ExitThenEnter { exit: SlideDirection },
}

impl Strategy {
    /// The phase the strategy starts in.
    #[must_use]
    pub const fn first_phase(self) -> Phase {
        match self {
            Self::EnterOnly { .. } => Phase::Entering,
            Self::Interpolate => Phase::Interpolating,
            Self::ExitThenEnter { .. } => Phase::Exiting,
        }
    }

    /// Stable name for logs and traces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EnterOnly { .. } => "enter_only",
            Self::Interpolate => "interpolate",
            Self::ExitThenEnter { .. } => "exit_then_enter",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick the strategy for moving to a scene of category `next`.
///
/// `previous` is the category of the scene currently on screen, or `None`
/// when nothing has been shown yet.
#[must_use]
pub fn select_strategy(
    previous: Option<Category>,
    next: Category,
    config: &TransitionConfig,
) -> Strategy {
    match previous {
        None => Strategy::EnterOnly {
            from: config.first_entry_direction,
        },
        Some(prev) if prev == next => Strategy::Interpolate,
        Some(prev) => Strategy::ExitThenEnter {
            exit: (config.exit_side)(prev, next),
        },
    }
}
