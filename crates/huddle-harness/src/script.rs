#![forbid(unsafe_code)]

//! Scenario scripts: scenes plus timed selections.
//!
//! ```json
//! {
//!   "frame_interval_ms": 16,
//!   "config": { "exit_ms": 300 },
//!   "scenes": [
//!     { "id": "i-form", "category": "offensive",
//!       "points": [{ "key": "qb", "label": "QB", "x": 0.4, "y": 0.5 }] }
//!   ],
//!   "steps": [
//!     { "at_ms": 0, "select": "i-form" },
//!     { "at_ms": 900, "select": null, "animations": false }
//!   ]
//! }
//! ```
//!
//! Omitted config fields keep their engine defaults. `animations` defaults to
//! `true`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use huddle_core::{Scene, SlideDirection};
use huddle_runtime::{ConfigError, TransitionConfig};
use serde::{Deserialize, Serialize};

use crate::HarnessError;

/// Display refresh used when a scenario does not set one.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

fn default_frame_interval_ms() -> u64 {
    DEFAULT_FRAME_INTERVAL_MS
}

fn default_animations() -> bool {
    true
}

/// A replayable scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Simulated display refresh interval.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// Transition settings; unset fields use engine defaults.
    #[serde(default)]
    pub config: ScenarioConfig,
    pub scenes: Vec<Scene>,
    pub steps: Vec<Step>,
}

/// One timed selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Simulated time at which the selection happens.
    pub at_ms: u64,
    /// Scene id to select; `null` clears the selection.
    #[serde(default)]
    pub select: Option<String>,
    #[serde(default = "default_animations")]
    pub animations: bool,
}

/// Optional overrides for [`TransitionConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    pub interpolate_ms: Option<u64>,
    pub exit_ms: Option<u64>,
    pub enter_ms: Option<u64>,
    pub exit_distance: Option<f32>,
    pub exit_fade_start: Option<f32>,
    pub enter_fade_span: Option<f32>,
    pub first_entry_direction: Option<SlideDirection>,
}

impl ScenarioConfig {
    /// Apply the overrides on top of the engine defaults and validate.
    pub fn to_config(&self) -> Result<TransitionConfig, ConfigError> {
        let mut config = TransitionConfig::default();
        if let Some(ms) = self.interpolate_ms {
            config = config.with_interpolate_duration(Duration::from_millis(ms));
        }
        if let Some(ms) = self.exit_ms {
            config = config.with_exit_duration(Duration::from_millis(ms));
        }
        if let Some(ms) = self.enter_ms {
            config = config.with_enter_duration(Duration::from_millis(ms));
        }
        if let Some(distance) = self.exit_distance {
            config = config.with_exit_distance(distance);
        }
        if let Some(start) = self.exit_fade_start {
            config = config.with_exit_fade_start(start);
        }
        if let Some(span) = self.enter_fade_span {
            config = config.with_enter_fade_span(span);
        }
        if let Some(direction) = self.first_entry_direction {
            config = config.with_first_entry_direction(direction);
        }
        config.validate()?;
        Ok(config)
    }
}

impl Scenario {
    /// Parse a scenario from JSON text.
    pub fn from_json(text: &str) -> Result<Self, HarnessError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Look up a scene by id.
    #[must_use]
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Check scene ids and point keys are unique and every step names a
    /// known scene.
    pub fn validate(&self) -> Result<(), HarnessError> {
        let mut ids = HashSet::new();
        for scene in &self.scenes {
            if !ids.insert(scene.id.as_str()) {
                return Err(HarnessError::DuplicateScene(scene.id.clone()));
            }
            let mut keys = HashSet::new();
            for point in &scene.points {
                if !keys.insert(&*point.key) {
                    return Err(HarnessError::DuplicateKey {
                        scene: scene.id.clone(),
                        key: point.key.to_string(),
                    });
                }
            }
        }
        for (index, step) in self.steps.iter().enumerate() {
            if let Some(id) = &step.select
                && !ids.contains(id.as_str())
            {
                return Err(HarnessError::UnknownScene {
                    step: index,
                    id: id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Steps in time order; steps sharing a time keep their script order.
    #[must_use]
    pub fn ordered_steps(&self) -> Vec<&Step> {
        let mut steps: Vec<&Step> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.at_ms);
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::Category;

    const PLAYBOOK: &str = r#"{
        "config": { "exit_ms": 300, "first_entry_direction": "left" },
        "scenes": [
            { "id": "i-form", "name": "I-Form", "category": "offensive",
              "points": [{ "key": "qb", "label": "QB", "x": 0.4, "y": 0.5 }] },
            { "id": "cover-2", "category": "defensive",
              "points": [{ "key": "fs", "label": "FS", "x": 0.5, "y": 0.1 }] }
        ],
        "steps": [
            { "at_ms": 500, "select": "cover-2" },
            { "at_ms": 0, "select": "i-form" },
            { "at_ms": 900, "select": null, "animations": false }
        ]
    }"#;

    #[test]
    fn parses_with_defaults() {
        let scenario = Scenario::from_json(PLAYBOOK).unwrap();
        assert_eq!(scenario.frame_interval_ms, DEFAULT_FRAME_INTERVAL_MS);
        assert_eq!(scenario.scenes.len(), 2);
        assert_eq!(scenario.scene("i-form").unwrap().name, "I-Form");
        assert_eq!(scenario.scene("cover-2").unwrap().category, Category::Defensive);
        assert!(scenario.steps[0].animations);
        assert!(!scenario.steps[2].animations);
        assert_eq!(scenario.steps[2].select, None);
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn config_overrides_apply_over_defaults() {
        let scenario = Scenario::from_json(PLAYBOOK).unwrap();
        let config = scenario.config.to_config().unwrap();
        assert_eq!(config.exit_duration, Duration::from_millis(300));
        assert_eq!(config.enter_duration, TransitionConfig::default().enter_duration);
        assert_eq!(config.first_entry_direction, SlideDirection::Left);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let config = ScenarioConfig {
            enter_fade_span: Some(2.0),
            ..ScenarioConfig::default()
        };
        assert_eq!(config.to_config().unwrap_err(), ConfigError::EnterFadeSpan(2.0));
    }

    #[test]
    fn steps_sort_stably_by_time() {
        let mut scenario = Scenario::from_json(PLAYBOOK).unwrap();
        scenario.steps.push(Step {
            at_ms: 500,
            select: Some("i-form".into()),
            animations: true,
        });
        let order: Vec<Option<&str>> = scenario
            .ordered_steps()
            .iter()
            .map(|s| s.select.as_deref())
            .collect();
        assert_eq!(
            order,
            vec![Some("i-form"), Some("cover-2"), Some("i-form"), None]
        );
    }

    #[test]
    fn unknown_scene_is_reported_with_step_index() {
        let mut scenario = Scenario::from_json(PLAYBOOK).unwrap();
        scenario.steps[1].select = Some("nickel".into());
        match scenario.validate() {
            Err(HarnessError::UnknownScene { step, id }) => {
                assert_eq!(step, 1);
                assert_eq!(id, "nickel");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn duplicate_ids_and_keys_are_rejected() {
        let mut scenario = Scenario::from_json(PLAYBOOK).unwrap();
        let copy = scenario.scenes[0].clone();
        scenario.scenes.push(copy);
        assert!(matches!(scenario.validate(), Err(HarnessError::DuplicateScene(id)) if id == "i-form"));

        let mut scenario = Scenario::from_json(PLAYBOOK).unwrap();
        scenario.scenes[1] = Scene::new("cover-2", Category::Defensive)
            .with("fs", 0.5, 0.1)
            .with("fs", 0.6, 0.1);
        assert!(matches!(
            scenario.validate(),
            Err(HarnessError::DuplicateKey { key, .. }) if key == "fs"
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Scenario::from_json(r#"{"scenes": [], "steps": [], "fps": 60}"#).unwrap_err();
        assert!(matches!(err, HarnessError::Json(_)));
    }
}
