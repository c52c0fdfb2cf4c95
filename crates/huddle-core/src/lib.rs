#![forbid(unsafe_code)]

//! Core: scene data, easing curves, key pairing, and frame clocks.
//!
//! Everything in this crate is pure or host-driven. The transition state
//! machine that ties these pieces together lives in `huddle-runtime`.

pub mod animation;
pub mod clock;
pub mod pairing;
pub mod scene;

pub use clock::{FrameClock, FrameToken, ManualFrameClock, SystemFrameClock};
pub use pairing::{Pair, PairKind, pair};
pub use scene::{Category, Point, RenderedPoint, Scene, SlideDirection};
