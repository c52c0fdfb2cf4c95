#![forbid(unsafe_code)]

//! Transition engine configuration.

use std::fmt;
use std::time::Duration;

use huddle_core::{Category, SlideDirection};

use crate::phase::Phase;

/// Chooses the side outgoing points leave toward, given the outgoing and
/// incoming scene categories.
pub type ExitSideFn = fn(Category, Category) -> SlideDirection;

/// Default side policy: offensive scenes leave to the left, defensive scenes
/// to the right. The incoming category is ignored.
#[must_use]
pub fn exit_side_by_outgoing(outgoing: Category, _incoming: Category) -> SlideDirection {
    match outgoing {
        Category::Offensive => SlideDirection::Left,
        Category::Defensive => SlideDirection::Right,
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for [`TransitionEngine`](crate::TransitionEngine).
#[derive(Debug, Clone, Copy)]
pub struct TransitionConfig {
    /// Length of a same-category position interpolation.
    /// Default: 600ms
    pub interpolate_duration: Duration,

    /// Length of the slide-out before a category switch.
    /// Default: 450ms
    pub exit_duration: Duration,

    /// Length of the slide-in after a category switch or first selection.
    /// Default: 550ms
    pub enter_duration: Duration,

    /// Horizontal distance, in normalized units, covered by an exit or entry
    /// slide. Must clear the visible [0, 1] range from any starting x.
    /// Default: 1.5
    pub exit_distance: f32,

    /// Raw exit progress after which outgoing points start fading.
    /// Default: 0.7
    pub exit_fade_start: f32,

    /// Fraction of the entry phase over which incoming points fade in.
    /// Default: 0.4
    pub enter_fade_span: f32,

    /// Side the very first scene slides in from.
    /// Default: right
    pub first_entry_direction: SlideDirection,

    /// Exit side policy for category switches.
    /// Default: [`exit_side_by_outgoing`]
    pub exit_side: ExitSideFn,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            interpolate_duration: Duration::from_millis(600),
            exit_duration: Duration::from_millis(450),
            enter_duration: Duration::from_millis(550),
            exit_distance: 1.5,
            exit_fade_start: 0.7,
            enter_fade_span: 0.4,
            first_entry_direction: SlideDirection::Right,
            exit_side: exit_side_by_outgoing,
        }
    }
}

impl TransitionConfig {
    /// Set the interpolation duration.
    #[must_use]
    pub fn with_interpolate_duration(mut self, duration: Duration) -> Self {
        self.interpolate_duration = duration;
        self
    }

    /// Set the exit duration.
    #[must_use]
    pub fn with_exit_duration(mut self, duration: Duration) -> Self {
        self.exit_duration = duration;
        self
    }

    /// Set the entry duration.
    #[must_use]
    pub fn with_enter_duration(mut self, duration: Duration) -> Self {
        self.enter_duration = duration;
        self
    }

    /// Set the off-screen slide distance.
    #[must_use]
    pub fn with_exit_distance(mut self, distance: f32) -> Self {
        self.exit_distance = distance;
        self
    }

    /// Set the raw progress at which exiting points begin to fade.
    #[must_use]
    pub fn with_exit_fade_start(mut self, start: f32) -> Self {
        self.exit_fade_start = start;
        self
    }

    /// Set the fraction of the entry phase spent fading in.
    #[must_use]
    pub fn with_enter_fade_span(mut self, span: f32) -> Self {
        self.enter_fade_span = span;
        self
    }

    /// Set the side the first scene enters from.
    #[must_use]
    pub fn with_first_entry_direction(mut self, direction: SlideDirection) -> Self {
        self.first_entry_direction = direction;
        self
    }

    /// Set the exit side policy.
    #[must_use]
    pub fn with_exit_side(mut self, policy: ExitSideFn) -> Self {
        self.exit_side = policy;
        self
    }

    /// Configured length of `phase`. [`Phase::Idle`] has none.
    #[must_use]
    pub fn duration_for(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Idle => Duration::ZERO,
            Phase::Interpolating => self.interpolate_duration,
            Phase::Exiting => self.exit_duration,
            Phase::Entering => self.enter_duration,
        }
    }

    /// Check the numeric parameters. Durations are always valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.exit_distance.is_finite() || self.exit_distance <= 0.0 {
            return Err(ConfigError::ExitDistance(self.exit_distance));
        }
        if !(0.0..1.0).contains(&self.exit_fade_start) {
            return Err(ConfigError::ExitFadeStart(self.exit_fade_start));
        }
        if !(self.enter_fade_span > 0.0 && self.enter_fade_span <= 1.0) {
            return Err(ConfigError::EnterFadeSpan(self.enter_fade_span));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A rejected [`TransitionConfig`] parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// `exit_distance` was not a positive finite number.
    ExitDistance(f32),
    /// `exit_fade_start` was outside `[0, 1)`.
    ExitFadeStart(f32),
    /// `enter_fade_span` was outside `(0, 1]`.
    EnterFadeSpan(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExitDistance(v) => write!(f, "exit distance must be positive and finite, got {v}"),
            Self::ExitFadeStart(v) => write!(f, "exit fade start must be in [0, 1), got {v}"),
            Self::EnterFadeSpan(v) => write!(f, "enter fade span must be in (0, 1], got {v}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(TransitionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn builder_sets_fields() {
        let config = TransitionConfig::default()
            .with_interpolate_duration(Duration::from_millis(10))
            .with_exit_duration(Duration::from_millis(20))
            .with_enter_duration(Duration::from_millis(30))
            .with_first_entry_direction(SlideDirection::Left);
        assert_eq!(config.duration_for(Phase::Interpolating), Duration::from_millis(10));
        assert_eq!(config.duration_for(Phase::Exiting), Duration::from_millis(20));
        assert_eq!(config.duration_for(Phase::Entering), Duration::from_millis(30));
        assert_eq!(config.duration_for(Phase::Idle), Duration::ZERO);
        assert_eq!(config.first_entry_direction, SlideDirection::Left);
    }

    #[test]
    fn zero_durations_are_accepted() {
        let config = TransitionConfig::default()
            .with_interpolate_duration(Duration::ZERO)
            .with_exit_duration(Duration::ZERO)
            .with_enter_duration(Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_distance() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = TransitionConfig::default().with_exit_distance(bad).validate();
            assert!(matches!(err, Err(ConfigError::ExitDistance(_))), "{bad}");
        }
    }

    #[test]
    fn rejects_bad_fade_windows() {
        assert_eq!(
            TransitionConfig::default().with_exit_fade_start(1.0).validate(),
            Err(ConfigError::ExitFadeStart(1.0))
        );
        assert_eq!(
            TransitionConfig::default().with_enter_fade_span(0.0).validate(),
            Err(ConfigError::EnterFadeSpan(0.0))
        );
        assert!(
            TransitionConfig::default()
                .with_enter_fade_span(f32::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn error_messages_name_the_field() {
        let msg = ConfigError::ExitFadeStart(1.2).to_string();
        assert!(msg.contains("exit fade start"), "{msg}");
    }

    #[test]
    fn default_side_policy_ignores_incoming() {
        assert_eq!(
            exit_side_by_outgoing(Category::Offensive, Category::Defensive),
            SlideDirection::Left
        );
        assert_eq!(
            exit_side_by_outgoing(Category::Defensive, Category::Offensive),
            SlideDirection::Right
        );
    }
}
