#![forbid(unsafe_code)]

//! Easing curves and interpolation helpers.
//!
//! Every curve maps `t` in [0, 1] to an output in [0, 1]; inputs outside that
//! range are clamped first, so callers can feed raw timer ratios straight in.
//! Nothing here allocates or holds state apart from [`PhaseTimer`], which is a
//! plain value anchored to a caller-supplied clock reading.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-out: fast start, slow landing.
///
/// `1 - (1 - t)^3`
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Cubic ease-in-out: slow at both ends, symmetric about `t = 0.5`.
///
/// `4t^3` below the midpoint, `1 - (-2t + 2)^3 / 2` above it.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Linear interpolation from `a` to `b`. `t` is not clamped.
///
/// Exact at both endpoints: `lerp(a, b, 0.0) == a` and `lerp(a, b, 1.0) == b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Progress of `t` through the sub-interval `[start, end]`, clamped to [0, 1].
///
/// Used to run a curve over only part of a phase, e.g. fading during the
/// second half. A degenerate window (`end <= start`) acts as a step at `end`.
#[inline]
pub fn window(t: f32, start: f32, end: f32) -> f32 {
    if end <= start {
        return if t >= end { 1.0 } else { 0.0 };
    }
    ((t - start) / (end - start)).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// PhaseTimer
// ---------------------------------------------------------------------------

/// Linear progress through a fixed-length interval anchored at a clock reading.
///
/// Unlike a tick-accumulating animation, the timer stores only its anchor and
/// length: progress is recomputed from the absolute timestamp on every frame,
/// so a late or dropped frame never causes drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimer {
    start: Duration,
    duration: Duration,
}

impl PhaseTimer {
    /// Start a timer at `start` lasting `duration`.
    ///
    /// A zero duration is clamped to one nanosecond: the first reading at or
    /// after `start` reports completion.
    #[must_use]
    pub fn new(start: Duration, duration: Duration) -> Self {
        Self {
            start,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
        }
    }

    /// Clock reading the timer is anchored to.
    #[must_use]
    pub const fn start(&self) -> Duration {
        self.start
    }

    /// Interval length.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Raw linear progress at `now`, in [0.0, 1.0].
    ///
    /// Readings earlier than the anchor report 0.
    #[must_use]
    pub fn progress(&self, now: Duration) -> f32 {
        let elapsed = now.saturating_sub(self.start);
        if elapsed >= self.duration {
            return 1.0;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Whether the interval has fully elapsed at `now`.
    #[must_use]
    pub fn is_complete(&self, now: Duration) -> bool {
        now.saturating_sub(self.start) >= self.duration
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
