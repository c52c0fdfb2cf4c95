#![forbid(unsafe_code)]

//! Scenario replay against a simulated display.
//!
//! Each display tick, in order:
//!
//! 1. due frame requests are delivered to the engine,
//! 2. steps whose `at_ms` has been reached are applied,
//! 3. drained engine events are recorded, then the visible frame is recorded
//!    if anything was published during the tick.
//!
//! While the engine is idle and no frame is pending the clock jumps straight
//! to the next step, so long gaps between selections cost nothing.

use std::time::Duration;

use huddle_core::{FrameClock, ManualFrameClock};
use huddle_runtime::TransitionEngine;
use tracing::{debug, info, warn};

use crate::HarnessError;
use crate::script::Scenario;
use crate::trace::FrameTrace;

/// Upper bound on simulated ticks; a scenario that needs more is truncated.
pub const MAX_TICKS: u64 = 1_000_000;

fn millis(at: Duration) -> u64 {
    u64::try_from(at.as_millis()).unwrap_or(u64::MAX)
}

/// Replay `scenario` and return its trace.
///
/// The replay ends once every step has been applied and the engine is idle.
pub fn replay(scenario: &Scenario) -> Result<FrameTrace, HarnessError> {
    scenario.validate()?;
    let config = scenario.config.to_config()?;
    let mut engine = TransitionEngine::with_config(ManualFrameClock::new(), config)?;
    let interval = Duration::from_millis(scenario.frame_interval_ms.max(1));
    let steps = scenario.ordered_steps();

    info!(
        scenes = scenario.scenes.len(),
        steps = steps.len(),
        interval_ms = millis(interval),
        "replay started"
    );

    let mut trace = FrameTrace::new();
    let mut next = 0;
    let mut recorded_seq = engine.frame_seq();

    for _ in 0..MAX_TICKS {
        let now = millis(engine.clock().now());

        engine.pump();

        while let Some(step) = steps.get(next).filter(|s| s.at_ms <= now) {
            let scene = match step.select.as_deref() {
                Some(id) => Some(scenario.scene(id).ok_or_else(|| HarnessError::UnknownScene {
                    step: next,
                    id: id.to_string(),
                })?),
                None => None,
            };
            debug!(at_ms = now, select = ?step.select, animations = step.animations, "applying step");
            engine.select(scene, step.animations);
            next += 1;
        }

        for event in engine.drain_events() {
            trace.push_event(now, event);
        }
        if engine.frame_seq() != recorded_seq {
            recorded_seq = engine.frame_seq();
            trace.push_frame(recorded_seq, now, engine.phase(), engine.snapshot());
        }

        match steps.get(next) {
            None if !engine.is_transitioning() => {
                info!(entries = trace.len(), end_ms = now, "replay finished");
                return Ok(trace);
            }
            Some(step) if !engine.is_transitioning() && engine.pending_frame().is_none() => {
                engine.clock_mut().set(Duration::from_millis(step.at_ms));
            }
            _ => engine.clock_mut().advance(interval),
        }
    }

    warn!(max_ticks = MAX_TICKS, "replay truncated");
    Ok(trace)
}
