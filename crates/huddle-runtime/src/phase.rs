#![forbid(unsafe_code)]

//! Transition phases and per-phase frame computation.
//!
//! Each `*_frame` function is pure: it takes the phase's fixed inputs and a
//! raw progress `t` in [0, 1] and returns a fresh point list. Easing is
//! applied inside. The engine is responsible for the exact terminal snap at
//! `t = 1`; these functions only get close to it.
//!
//! | Phase         | Position curve        | Opacity                                   |
//! |---------------|-----------------------|-------------------------------------------|
//! | Interpolating | `ease_in_out_cubic`   | entering keys fade in over `t` in [0.5, 1], leaving keys fade out over [0, 0.5] |
//! | Exiting       | `ease_out_cubic`      | held until `exit_fade_start`, then eased to 0 |
//! | Entering      | `ease_out_cubic`      | eased 0 to 1 over the first `enter_fade_span` |

use std::fmt;

use huddle_core::animation::{ease_in_out_cubic, ease_out_cubic, lerp, window};
use huddle_core::{RenderedPoint, SlideDirection, pair};

use crate::config::TransitionConfig;

/// One state of the transition state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Phase {
    /// Nothing in flight; the published frame is the target scene.
    #[default]
    Idle,
    Interpolating,
    Exiting,
    Entering,
}

impl Phase {
    /// Whether a transition is in flight.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Interpolating => "interpolating",
            Self::Exiting => "exiting",
            Self::Entering => "entering",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Interpolating
// ---------------------------------------------------------------------------

/// Same-category frame: pair by key, move matched points, cross-fade the rest.
///
/// Matched points travel in a straight line and ease their opacity from the
/// source value to 1 (constant 1 when starting from a settled frame). Points
/// new to the target stay at their target position and fade in during the
/// second half; points missing from the target stay at their source position
/// and fade out during the first half. Output order follows [`pair`].
#[must_use]
pub fn interpolate_frame(
    from: &[RenderedPoint],
    to: &[RenderedPoint],
    t: f32,
) -> Vec<RenderedPoint> {
    let e = ease_in_out_cubic(t);
    pair(from, to)
        .into_iter()
        .filter_map(|p| match (p.from, p.to) {
            (Some(src), Some(dst)) => Some(dst.moved(
                lerp(src.x, dst.x, e),
                lerp(src.y, dst.y, e),
                src.opacity + (1.0 - src.opacity) * e,
            )),
            (None, Some(dst)) => Some(dst.moved(
                dst.x,
                dst.y,
                ease_out_cubic(window(t, 0.5, 1.0)),
            )),
            (Some(src), None) => Some(src.moved(
                src.x,
                src.y,
                src.opacity * (1.0 - ease_out_cubic(window(t, 0.0, 0.5))),
            )),
            (None, None) => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Exiting
// ---------------------------------------------------------------------------

/// Category-switch exit frame: slide every point `exit_distance` toward
/// `direction`, fading out once `t` passes `exit_fade_start`.
#[must_use]
pub fn exit_frame(
    from: &[RenderedPoint],
    direction: SlideDirection,
    t: f32,
    config: &TransitionConfig,
) -> Vec<RenderedPoint> {
    let dx = direction.sign() * config.exit_distance * ease_out_cubic(t);
    let fade = 1.0 - ease_out_cubic(window(t, config.exit_fade_start, 1.0));
    from.iter()
        .map(|p| p.moved(p.x + dx, p.y, p.opacity * fade))
        .collect()
}

/// Where exiting points end up: fully displaced and transparent.
#[must_use]
pub fn exit_terminal(
    from: &[RenderedPoint],
    direction: SlideDirection,
    config: &TransitionConfig,
) -> Vec<RenderedPoint> {
    let dx = direction.sign() * config.exit_distance;
    from.iter().map(|p| p.moved(p.x + dx, p.y, 0.0)).collect()
}

// ---------------------------------------------------------------------------
// Entering
// ---------------------------------------------------------------------------

/// Entry starting snapshot: `target` displaced `distance` toward `side`,
/// fully transparent.
#[must_use]
pub fn offscreen(target: &[RenderedPoint], side: SlideDirection, distance: f32) -> Vec<RenderedPoint> {
    let dx = side.sign() * distance;
    target.iter().map(|p| p.moved(p.x + dx, p.y, 0.0)).collect()
}

/// Entry frame: move each point from its off-screen start to its target and
/// fade it in over the first `enter_fade_span` of the phase.
///
/// `start` must be index-aligned with `target` (as built by [`offscreen`]).
#[must_use]
pub fn enter_frame(
    start: &[RenderedPoint],
    target: &[RenderedPoint],
    t: f32,
    config: &TransitionConfig,
) -> Vec<RenderedPoint> {
    let e = ease_out_cubic(t);
    let opacity = ease_out_cubic(window(t, 0.0, config.enter_fade_span));
    start
        .iter()
        .zip(target)
        .map(|(src, dst)| dst.moved(lerp(src.x, dst.x, e), lerp(src.y, dst.y, e), opacity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::Point;

    fn rp(key: &str, x: f32, y: f32) -> RenderedPoint {
        RenderedPoint::from(&Point::new(key, key.to_uppercase(), x, y))
    }

    fn find<'a>(frame: &'a [RenderedPoint], key: &str) -> &'a RenderedPoint {
        frame.iter().find(|p| &*p.key == key).unwrap()
    }

    #[test]
    fn phase_activity() {
        assert!(!Phase::Idle.is_active());
        assert!(Phase::Interpolating.is_active());
        assert!(Phase::Exiting.is_active());
        assert!(Phase::Entering.is_active());
        assert_eq!(Phase::default(), Phase::Idle);
        assert_eq!(Phase::Entering.to_string(), "entering");
    }

    // ---- Interpolating ----

    #[test]
    fn interpolate_starts_at_source() {
        let from = vec![rp("qb", 0.4, 0.5)];
        let to = vec![rp("qb", 0.3, 0.6)];
        let frame = interpolate_frame(&from, &to, 0.0);
        assert_eq!(frame, from);
    }

    #[test]
    fn interpolate_ends_at_target() {
        let from = vec![rp("qb", 0.4, 0.5), rp("fb", 0.35, 0.5)];
        let to = vec![rp("qb", 0.3, 0.6), rp("rb", 0.2, 0.5)];
        let frame = interpolate_frame(&from, &to, 1.0);
        assert_eq!(find(&frame, "qb"), &to[0]);
        assert_eq!(find(&frame, "rb"), &to[1]);
        assert_eq!(find(&frame, "fb").opacity, 0.0);
    }

    #[test]
    fn interpolate_matched_moves_on_straight_line() {
        let from = vec![rp("qb", 0.2, 0.2)];
        let to = vec![rp("qb", 0.6, 0.4)];
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let p = &interpolate_frame(&from, &to, t)[0];
            // On the segment: (y - 0.2) / (x - 0.2) == 0.5
            assert!(((p.y - 0.2) - 0.5 * (p.x - 0.2)).abs() < 1e-6, "t={t}");
            assert_eq!(p.opacity, 1.0);
        }
    }

    #[test]
    fn interpolate_entering_key_waits_for_second_half() {
        let from = vec![rp("qb", 0.4, 0.5)];
        let to = vec![rp("qb", 0.3, 0.5), rp("rb", 0.2, 0.5)];
        for t in [0.0, 0.25, 0.5] {
            let rb = interpolate_frame(&from, &to, t)[1].clone();
            assert_eq!(rb.opacity, 0.0, "t={t}");
            assert_eq!((rb.x, rb.y), (0.2, 0.5));
        }
        let late = interpolate_frame(&from, &to, 0.75)[1].clone();
        assert!(late.opacity > 0.0 && late.opacity < 1.0);
        assert_eq!((late.x, late.y), (0.2, 0.5));
    }

    #[test]
    fn interpolate_leaving_key_gone_by_midpoint() {
        let from = vec![rp("qb", 0.4, 0.5), rp("fb", 0.35, 0.5)];
        let to = vec![rp("qb", 0.3, 0.5)];
        let early = interpolate_frame(&from, &to, 0.25);
        let fb = find(&early, "fb");
        assert!(fb.opacity > 0.0 && fb.opacity < 1.0);
        assert_eq!((fb.x, fb.y), (0.35, 0.5));
        for t in [0.5, 0.75, 1.0] {
            assert_eq!(find(&interpolate_frame(&from, &to, t), "fb").opacity, 0.0);
        }
    }

    #[test]
    fn interpolate_restores_partial_opacity() {
        let from = vec![rp("qb", 0.4, 0.5).moved(0.4, 0.5, 0.25)];
        let to = vec![rp("qb", 0.4, 0.5)];
        assert_eq!(interpolate_frame(&from, &to, 0.0)[0].opacity, 0.25);
        assert_eq!(interpolate_frame(&from, &to, 1.0)[0].opacity, 1.0);
    }

    #[test]
    fn interpolate_uses_target_label() {
        let from = vec![RenderedPoint::from(&Point::new("x", "old", 0.1, 0.1))];
        let to = vec![RenderedPoint::from(&Point::new("x", "new", 0.2, 0.2))];
        assert_eq!(&*interpolate_frame(&from, &to, 0.1)[0].label, "new");
    }

    // ---- Exiting ----

    #[test]
    fn exit_moves_monotonically_toward_direction() {
        let config = TransitionConfig::default();
        let from = vec![rp("mlb", 0.7, 0.5)];
        let mut prev = 0.7;
        for i in 1..=20 {
            let t = i as f32 / 20.0;
            let x = exit_frame(&from, SlideDirection::Left, t, &config)[0].x;
            assert!(x < prev, "t={t}: {x} !< {prev}");
            prev = x;
        }
        assert!((prev - (0.7 - 1.5)).abs() < 1e-6);
    }

    #[test]
    fn exit_holds_opacity_until_fade_start() {
        let config = TransitionConfig::default();
        let from = vec![rp("mlb", 0.7, 0.5)];
        for t in [0.0, 0.3, 0.7] {
            assert_eq!(exit_frame(&from, SlideDirection::Right, t, &config)[0].opacity, 1.0);
        }
        let mid = exit_frame(&from, SlideDirection::Right, 0.85, &config)[0].opacity;
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(exit_frame(&from, SlideDirection::Right, 1.0, &config)[0].opacity, 0.0);
    }

    #[test]
    fn exit_terminal_clears_visible_range() {
        let config = TransitionConfig::default();
        let from = vec![rp("a", 0.0, 0.5), rp("b", 1.0, 0.5)];
        for p in exit_terminal(&from, SlideDirection::Left, &config) {
            assert!(p.x < 0.0);
            assert_eq!(p.opacity, 0.0);
        }
        for p in exit_terminal(&from, SlideDirection::Right, &config) {
            assert!(p.x > 1.0);
        }
    }

    // ---- Entering ----

    #[test]
    fn offscreen_is_displaced_and_transparent() {
        let target = vec![rp("cb", 0.9, 0.1)];
        let start = offscreen(&target, SlideDirection::Right, 1.5);
        assert!((start[0].x - 2.4).abs() < 1e-6);
        assert_eq!(start[0].y, 0.1);
        assert_eq!(start[0].opacity, 0.0);
    }

    #[test]
    fn enter_runs_from_start_to_target() {
        let config = TransitionConfig::default();
        let target = vec![rp("cb", 0.9, 0.1)];
        let start = offscreen(&target, SlideDirection::Left, config.exit_distance);
        assert_eq!(enter_frame(&start, &target, 0.0, &config), start);
        assert_eq!(enter_frame(&start, &target, 1.0, &config), target);
    }

    #[test]
    fn enter_monotonic_toward_target() {
        let config = TransitionConfig::default();
        let target = vec![rp("cb", 0.9, 0.1)];
        let start = offscreen(&target, SlideDirection::Right, config.exit_distance);
        let mut prev = start[0].x;
        for i in 1..=20 {
            let t = i as f32 / 20.0;
            let x = enter_frame(&start, &target, t, &config)[0].x;
            assert!(x < prev, "t={t}");
            prev = x;
        }
    }

    #[test]
    fn enter_fully_opaque_after_fade_span() {
        let config = TransitionConfig::default();
        let target = vec![rp("cb", 0.9, 0.1)];
        let start = offscreen(&target, SlideDirection::Right, config.exit_distance);
        let early = enter_frame(&start, &target, 0.2, &config)[0].opacity;
        assert!(early > 0.0 && early < 1.0);
        for t in [0.4, 0.6, 0.9] {
            assert_eq!(enter_frame(&start, &target, t, &config)[0].opacity, 1.0, "t={t}");
        }
    }
}
