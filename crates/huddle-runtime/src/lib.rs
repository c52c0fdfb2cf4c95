#![forbid(unsafe_code)]

//! Huddle Runtime
//!
//! The transition engine that moves a set of labeled points from one scene
//! to the next, one display frame at a time.
//!
//! # Key Components
//!
//! - [`TransitionEngine`] - Phase state machine and frame driver
//! - [`TransitionConfig`] - Phase durations, slide distances, side policy
//! - [`Strategy`] / [`select_strategy`] - Picks interpolate, enter, or exit-then-enter
//! - [`phase`] - Per-phase frame computation (pure functions)
//! - [`EngineEvent`] - Poll-based lifecycle notifications
//!
//! # Driving the engine
//!
//! ```ignore
//! use huddle_core::{ManualFrameClock, Scene, Category};
//! use huddle_runtime::TransitionEngine;
//!
//! let mut engine = TransitionEngine::new(ManualFrameClock::new());
//! engine.select(Some(&scene), true);
//! while engine.is_transitioning() {
//!     engine.clock_mut().advance(Duration::from_millis(16));
//!     engine.pump();
//!     draw(engine.rendered_points());
//! }
//! ```

pub mod config;
pub mod engine;
pub mod phase;
pub mod selector;

pub use config::{ConfigError, ExitSideFn, TransitionConfig, exit_side_by_outgoing};
pub use engine::{EngineEvent, FrameSnapshot, TransitionEngine};
pub use phase::Phase;
pub use selector::{Strategy, select_strategy};
