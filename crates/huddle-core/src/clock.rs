#![forbid(unsafe_code)]

//! Frame clocks: monotonic time plus cancellable one-shot frame requests.
//!
//! A [`FrameClock`] plays the role of a display's refresh callback. Consumers
//! call [`request_frame`](FrameClock::request_frame) and receive an opaque
//! [`FrameToken`]; the host later collects due tokens with
//! [`take_due`](FrameClock::take_due) and hands each one back to whoever
//! requested it. Requests are one-shot: a delivered token is gone.
//!
//! # Design
//!
//! Tokens are handed back by value instead of invoking stored closures. The
//! requester compares the token against the one it is waiting for, so a frame
//! that slips through after cancellation is recognizably stale and can be
//! ignored. No callbacks capture engine state.
//!
//! # Invariants
//!
//! 1. Token ids are never reused by a clock instance.
//! 2. A cancelled token is never returned by `take_due`.
//! 3. `now()` is monotonic non-decreasing.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Handle for one outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(u64);

impl FrameToken {
    /// Raw id, unique per clock.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// A monotonic clock with one-shot frame requests.
pub trait FrameClock {
    /// Current monotonic time.
    fn now(&self) -> Duration;

    /// Ask for a frame at the next refresh.
    fn request_frame(&mut self) -> FrameToken;

    /// Withdraw a request. Unknown or already delivered tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);

    /// Remove and return every request that is due, oldest first.
    fn take_due(&mut self) -> Vec<FrameToken>;

    /// Number of requests not yet delivered or cancelled.
    fn pending_count(&self) -> usize;
}

// ---------------------------------------------------------------------------
// Request bookkeeping
// ---------------------------------------------------------------------------

/// Outstanding request set shared by the clock implementations.
#[derive(Debug, Default, Clone)]
struct Requests {
    next_id: u64,
    pending: BTreeSet<FrameToken>,
}

impl Requests {
    fn request(&mut self) -> FrameToken {
        let token = FrameToken(self.next_id);
        self.next_id += 1;
        self.pending.insert(token);
        token
    }

    fn cancel(&mut self, token: FrameToken) {
        self.pending.remove(&token);
    }

    fn drain(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// ManualFrameClock
// ---------------------------------------------------------------------------

/// Deterministic clock advanced explicitly by the host.
///
/// Every outstanding request is due at the next `take_due`, which models a
/// host that calls it once per simulated refresh after advancing time.
#[derive(Debug, Default, Clone)]
pub struct ManualFrameClock {
    now: Duration,
    requests: Requests,
}

impl ManualFrameClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current time. Earlier values are ignored to keep time monotonic.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Whether `token` is still outstanding.
    #[must_use]
    pub fn is_pending(&self, token: FrameToken) -> bool {
        self.requests.pending.contains(&token)
    }
}

impl FrameClock for ManualFrameClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn request_frame(&mut self) -> FrameToken {
        self.requests.request()
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.requests.cancel(token);
    }

    fn take_due(&mut self) -> Vec<FrameToken> {
        self.requests.drain()
    }

    fn pending_count(&self) -> usize {
        self.requests.pending.len()
    }
}

// ---------------------------------------------------------------------------
// SystemFrameClock
// ---------------------------------------------------------------------------

/// Wall-clock frame pacing backed by [`Instant`].
///
/// Requests become due once `interval` has passed since the previous delivery,
/// so a host may poll `take_due` as often as it likes.
#[derive(Debug, Clone)]
pub struct SystemFrameClock {
    origin: Instant,
    interval: Duration,
    last_delivery: Option<Duration>,
    requests: Requests,
}

impl SystemFrameClock {
    /// Refresh interval of a 60 Hz display.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_micros(16_667);

    /// Create a clock pacing frames at `interval`.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            origin: Instant::now(),
            interval,
            last_delivery: None,
            requests: Requests::default(),
        }
    }

    /// Pacing interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Time until pending requests become due, or `None` when nothing is pending.
    #[must_use]
    pub fn time_until_due(&self) -> Option<Duration> {
        if self.requests.pending.is_empty() {
            return None;
        }
        let Some(last) = self.last_delivery else {
            return Some(Duration::ZERO);
        };
        Some(last.saturating_add(self.interval).saturating_sub(self.now()))
    }
}

impl Default for SystemFrameClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

impl FrameClock for SystemFrameClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn request_frame(&mut self) -> FrameToken {
        self.requests.request()
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.requests.cancel(token);
    }

    fn take_due(&mut self) -> Vec<FrameToken> {
        if self.time_until_due() != Some(Duration::ZERO) {
            return Vec::new();
        }
        self.last_delivery = Some(self.now());
        self.requests.drain()
    }

    fn pending_count(&self) -> usize {
        self.requests.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    #[test]
    fn manual_clock_starts_at_zero() {
        let clock = ManualFrameClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.pending_count(), 0);
    }

    #[test]
    fn manual_clock_advance_and_set() {
        let mut clock = ManualFrameClock::new();
        clock.advance(MS_16);
        clock.advance(MS_16);
        assert_eq!(clock.now(), Duration::from_millis(32));
        clock.set(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::from_millis(32), "set never rewinds");
        clock.set(Duration::from_millis(100));
        assert_eq!(clock.now(), Duration::from_millis(100));
    }

    #[test]
    fn tokens_are_unique_and_one_shot() {
        let mut clock = ManualFrameClock::new();
        let a = clock.request_frame();
        let b = clock.request_frame();
        assert_ne!(a, b);
        assert_eq!(clock.take_due(), vec![a, b]);
        assert!(clock.take_due().is_empty());
        let c = clock.request_frame();
        assert!(c.id() > b.id());
    }

    #[test]
    fn cancelled_token_never_delivered() {
        let mut clock = ManualFrameClock::new();
        let a = clock.request_frame();
        let b = clock.request_frame();
        clock.cancel_frame(a);
        assert!(!clock.is_pending(a));
        assert!(clock.is_pending(b));
        assert_eq!(clock.take_due(), vec![b]);
    }

    #[test]
    fn cancel_unknown_token_is_noop() {
        let mut clock = ManualFrameClock::new();
        let a = clock.request_frame();
        clock.take_due();
        clock.cancel_frame(a);
        clock.cancel_frame(FrameToken(999));
        assert_eq!(clock.pending_count(), 0);
    }

    #[test]
    fn system_clock_first_request_due_immediately() {
        let mut clock = SystemFrameClock::new(Duration::from_secs(3600));
        assert_eq!(clock.time_until_due(), None);
        let a = clock.request_frame();
        assert_eq!(clock.take_due(), vec![a]);
    }

    #[test]
    fn system_clock_paces_subsequent_requests() {
        let mut clock = SystemFrameClock::new(Duration::from_secs(3600));
        clock.request_frame();
        clock.take_due();
        clock.request_frame();
        assert!(clock.take_due().is_empty(), "interval not yet elapsed");
        assert_eq!(clock.pending_count(), 1);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemFrameClock::default();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
