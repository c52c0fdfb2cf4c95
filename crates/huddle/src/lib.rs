#![forbid(unsafe_code)]

//! Huddle public facade crate.
//!
//! Animated transitions between scenes of labeled points. This crate
//! re-exports the stable surface of the internal crates and offers a prelude
//! for day-to-day usage.
//!
//! ```ignore
//! use huddle::prelude::*;
//!
//! let offense = Scene::new("i-form", Category::Offensive).with("qb", 0.4, 0.5);
//! let mut engine = TransitionEngine::new(SystemFrameClock::default());
//! engine.select(Some(&offense), true);
//! // each display refresh:
//! engine.pump();
//! draw(engine.rendered_points());
//! ```

// --- Core re-exports -------------------------------------------------------

pub use huddle_core::animation::{EasingFn, PhaseTimer, ease_in_out_cubic, ease_out_cubic, lerp};
pub use huddle_core::{
    Category, FrameClock, FrameToken, ManualFrameClock, Pair, PairKind, Point, RenderedPoint,
    Scene, SlideDirection, SystemFrameClock, pair,
};

// --- Runtime re-exports ----------------------------------------------------

pub use huddle_runtime::{
    ConfigError, EngineEvent, ExitSideFn, FrameSnapshot, Phase, Strategy, TransitionConfig,
    TransitionEngine, exit_side_by_outgoing, select_strategy,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Category, EngineEvent, FrameClock, FrameSnapshot, ManualFrameClock, Phase, Point,
        RenderedPoint, Scene, SlideDirection, SystemFrameClock, TransitionConfig,
        TransitionEngine,
    };

    pub use crate::{core, runtime};
}

pub use huddle_core as core;
#[cfg(feature = "harness")]
pub use huddle_harness as harness;
pub use huddle_runtime as runtime;
