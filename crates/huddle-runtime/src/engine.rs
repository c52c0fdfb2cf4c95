#![forbid(unsafe_code)]

//! Transition engine: the phase state machine and its frame driver.
//!
//! [`TransitionEngine`] owns a [`FrameClock`], the working state of the
//! current transition, and the last published [`FrameSnapshot`]. The host
//! feeds it scene selections and due frames; the engine answers with fresh
//! snapshots until the target scene is reached exactly.
//!
//! # State machine
//!
//! ```text
//! Idle --(same category)----> Interpolating --(t=1)--> Idle
//! Idle --(other category)---> Exiting --(t=1)--> Entering --(t=1)--> Idle
//! Idle --(first selection)--> Entering --(t=1)--> Idle
//! any  --(new selection)----> restart from the currently published frame
//! any  --(cleared)----------> Idle, empty frame
//! ```
//!
//! # Invariants
//!
//! 1. At most one frame request is outstanding. Entering a phase, selecting a
//!    scene, clearing, and dropping the engine all cancel it first.
//! 2. A frame token other than the outstanding one is ignored.
//! 3. A new selection starts from the last published frame, never from the
//!    state before the interrupted transition.
//! 4. In [`Phase::Idle`] the published frame equals the target scene at full
//!    opacity, bit for bit.
//! 5. Snapshots are immutable: each frame is a new `Arc<[RenderedPoint]>`.
//!
//! # Failure Modes
//!
//! There are none to report. Duplicate keys within a scene are a caller
//! precondition violation; pairing of the duplicated key is then unspecified.

use std::sync::Arc;
use std::time::Duration;

use huddle_core::animation::PhaseTimer;
use huddle_core::{Category, FrameClock, FrameToken, RenderedPoint, Scene, SlideDirection};
use tracing::{debug, trace, trace_span};

use crate::config::{ConfigError, TransitionConfig};
use crate::phase::{self, Phase};
use crate::selector::{Strategy, select_strategy};

/// An immutable published frame.
pub type FrameSnapshot = Arc<[RenderedPoint]>;

/// Lifecycle notification queued by the engine.
///
/// Drained with [`TransitionEngine::drain_events`]; events are not replayed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum EngineEvent {
    /// A selection started a transition.
    StrategyChosen { generation: u64, strategy: Strategy },
    /// The state machine moved between phases.
    PhaseChanged { from: Phase, to: Phase },
    /// The target scene is on screen exactly.
    Settled { generation: u64 },
    /// The selection was cleared and the frame emptied.
    Cleared { generation: u64 },
}

/// Frame-driven scene transition engine.
#[derive(Debug)]
pub struct TransitionEngine<C: FrameClock> {
    clock: C,
    config: TransitionConfig,

    phase: Phase,
    /// Frame the current phase departs from.
    from_points: Vec<RenderedPoint>,
    /// Target scene at full opacity.
    to_points: Vec<RenderedPoint>,
    /// Exit direction while exiting; entry side while entering.
    direction: SlideDirection,
    timer: PhaseTimer,

    /// Category of the last scene that settled on screen.
    settled_category: Option<Category>,
    /// Category of the most recently selected scene.
    target_category: Option<Category>,

    pending: Option<FrameToken>,
    generation: u64,

    published: FrameSnapshot,
    frame_seq: u64,
    events: Vec<EngineEvent>,
}

impl<C: FrameClock> TransitionEngine<C> {
    /// Create an engine with the default configuration.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self::build(clock, TransitionConfig::default())
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(clock: C, config: TransitionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(clock, config))
    }

    fn build(clock: C, config: TransitionConfig) -> Self {
        Self {
            clock,
            config,
            phase: Phase::Idle,
            from_points: Vec::new(),
            to_points: Vec::new(),
            direction: config.first_entry_direction,
            timer: PhaseTimer::new(Duration::ZERO, Duration::ZERO),
            settled_category: None,
            target_category: None,
            pending: None,
            generation: 0,
            published: Arc::from(Vec::new()),
            frame_seq: 0,
            events: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------

    /// Select `scene` (or clear with `None`).
    ///
    /// `animations_enabled` is read here only. When `false` the target is
    /// published immediately, the engine stays idle, and no frame is requested.
    /// Otherwise any transition in flight is abandoned and a new one starts
    /// from the currently published frame.
    pub fn select(&mut self, scene: Option<&Scene>, animations_enabled: bool) {
        self.cancel_pending();
        self.generation += 1;

        let Some(scene) = scene else {
            self.reset();
            return;
        };

        let on_screen = if self.published.is_empty() {
            None
        } else {
            self.settled_category.or(self.target_category)
        };
        self.target_category = Some(scene.category);
        self.to_points = scene.rendered();

        if !animations_enabled {
            debug!(
                generation = self.generation,
                scene = %scene.id,
                "animations disabled; jumping to target"
            );
            self.settle();
            return;
        }

        let strategy = select_strategy(on_screen, scene.category, &self.config);
        debug!(
            generation = self.generation,
            scene = %scene.id,
            strategy = %strategy,
            from_keys = self.published.len(),
            to_keys = self.to_points.len(),
            "transition strategy chosen"
        );
        self.events.push(EngineEvent::StrategyChosen {
            generation: self.generation,
            strategy,
        });

        let now = self.clock.now();
        match strategy {
            Strategy::Interpolate => {
                self.from_points = self.published.to_vec();
                self.begin(Phase::Interpolating, now);
            }
            Strategy::ExitThenEnter { exit } => {
                self.from_points = self.published.to_vec();
                self.direction = exit;
                self.begin(Phase::Exiting, now);
            }
            Strategy::EnterOnly { from } => {
                self.from_points =
                    phase::offscreen(&self.to_points, from, self.config.exit_distance);
                self.direction = from;
                self.begin(Phase::Entering, now);
            }
        }
    }

    /// Clear the selection: cancel any transition and publish an empty frame.
    ///
    /// The next selection is treated as the first one.
    pub fn clear(&mut self) {
        self.select(None, false);
    }

    /// Deliver a frame for `token` at time `now`.
    ///
    /// Returns `false` (and does nothing) when `token` is not the outstanding
    /// request, e.g. a frame that was cancelled by a newer selection.
    pub fn on_frame(&mut self, token: FrameToken, now: Duration) -> bool {
        if self.pending != Some(token) {
            debug!(token = token.id(), pending = ?self.pending.map(FrameToken::id), "ignoring stale frame");
            return false;
        }
        self.pending = None;

        let t = self.timer.progress(now);
        let _span = trace_span!("huddle.frame", phase = %self.phase, t).entered();

        if t < 1.0 {
            self.render(t);
            self.pending = Some(self.clock.request_frame());
            return true;
        }

        match self.phase {
            Phase::Exiting => self.hand_off(now),
            Phase::Interpolating | Phase::Entering => self.settle(),
            Phase::Idle => {}
        }
        true
    }

    /// Collect due frames from the clock and run them.
    ///
    /// Returns the number of frames that were accepted.
    pub fn pump(&mut self) -> usize {
        let due = self.clock.take_due();
        let now = self.clock.now();
        due.into_iter()
            .filter(|&token| self.on_frame(token, now))
            .count()
    }

    /// Cancel any outstanding frame request without changing the frame.
    ///
    /// Call when the consuming view goes away; dropping the engine does the
    /// same.
    pub fn shutdown(&mut self) {
        self.cancel_pending();
    }

    // -----------------------------------------------------------------------
    // Outputs
    // -----------------------------------------------------------------------

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a transition is in flight.
    #[inline]
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.phase.is_active()
    }

    /// Latest published frame.
    #[must_use]
    pub fn rendered_points(&self) -> &[RenderedPoint] {
        &self.published
    }

    /// Latest published frame as a shareable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        Arc::clone(&self.published)
    }

    /// Target scene at full opacity.
    #[must_use]
    pub fn target_points(&self) -> &[RenderedPoint] {
        &self.to_points
    }

    /// Number of frames published so far.
    #[inline]
    #[must_use]
    pub fn frame_seq(&self) -> u64 {
        self.frame_seq
    }

    /// Selection counter; increments on every `select` and `clear`.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The outstanding frame request, if any.
    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending
    }

    /// Drain all queued events.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Replace the configuration. A phase in flight keeps its duration.
    pub fn set_config(&mut self, config: TransitionConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn begin(&mut self, next: Phase, now: Duration) {
        self.cancel_pending();
        self.set_phase(next);
        self.timer = PhaseTimer::new(now, self.config.duration_for(next));
        self.render(0.0);
        self.pending = Some(self.clock.request_frame());
    }

    /// Exit finished: stage the entry from the mirrored side in the same tick.
    fn hand_off(&mut self, now: Duration) {
        let side = self.direction.mirrored();
        self.from_points = phase::offscreen(&self.to_points, side, self.config.exit_distance);
        self.direction = side;
        self.begin(Phase::Entering, now);
    }

    fn settle(&mut self) {
        self.cancel_pending();
        self.from_points.clone_from(&self.to_points);
        self.set_phase(Phase::Idle);
        self.publish(self.to_points.clone());
        self.settled_category = self.target_category;
        self.events.push(EngineEvent::Settled {
            generation: self.generation,
        });
        debug!(generation = self.generation, points = self.to_points.len(), "transition settled");
    }

    fn reset(&mut self) {
        self.set_phase(Phase::Idle);
        self.from_points.clear();
        self.to_points.clear();
        self.settled_category = None;
        self.target_category = None;
        self.publish(Vec::new());
        self.events.push(EngineEvent::Cleared {
            generation: self.generation,
        });
        debug!(generation = self.generation, "selection cleared");
    }

    fn render(&mut self, t: f32) {
        let frame = match self.phase {
            Phase::Idle => self.to_points.clone(),
            Phase::Interpolating => phase::interpolate_frame(&self.from_points, &self.to_points, t),
            Phase::Exiting => phase::exit_frame(&self.from_points, self.direction, t, &self.config),
            Phase::Entering => {
                phase::enter_frame(&self.from_points, &self.to_points, t, &self.config)
            }
        };
        self.publish(frame);
    }

    fn publish(&mut self, points: Vec<RenderedPoint>) {
        self.published = Arc::from(points);
        self.frame_seq += 1;
        trace!(frame_seq = self.frame_seq, points = self.published.len(), "frame published");
    }

    fn set_phase(&mut self, next: Phase) {
        if self.phase != next {
            debug!(from = %self.phase, to = %next, "phase changed");
            self.events.push(EngineEvent::PhaseChanged {
                from: self.phase,
                to: next,
            });
            self.phase = next;
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            self.clock.cancel_frame(token);
        }
    }
}

impl<C: FrameClock> Drop for TransitionEngine<C> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
