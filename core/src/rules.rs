use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const POSITION_TOLERANCE_DEFAULT: f32 = 2.0;
pub const SNAP_THRESHOLD_DEFAULT: f32 = 35.0;
pub const HISTORY_CAPACITY_DEFAULT: usize = 20;
pub const HISTORY_DEBOUNCE_MS_DEFAULT: f64 = 100.0;
pub const COUNTDOWN_SECS_DEFAULT: u32 = 5;
pub const OVERFLOW_OFFSET_DEFAULT: f32 = 30.0;
pub const BOARD_PADDING_TOP_DEFAULT: f32 = 40.0;
pub const BOARD_PADDING_BOTTOM_DEFAULT: f32 = 40.0;
pub const BOARD_PADDING_SIDE_DEFAULT: f32 = 20.0;
pub const MAX_DRAW_WIDTH_DEFAULT: f32 = 710.0;
pub const MAX_DRAW_HEIGHT_DEFAULT: f32 = 1150.0;
pub const TICK_INTERVAL_MS_DEFAULT: f64 = 1000.0;
pub const IMAGE_LOAD_TIMEOUT_MS_DEFAULT: u32 = 15_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub position_tolerance: f32,
    pub snap_threshold: f32,
    pub history_capacity: usize,
    pub history_debounce_ms: f64,
    pub countdown_secs: u32,
    pub overflow_offset: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub padding_side: f32,
    pub max_draw_width: f32,
    pub max_draw_height: f32,
    pub tick_interval_ms: f64,
    pub image_load_timeout_ms: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            position_tolerance: POSITION_TOLERANCE_DEFAULT,
            snap_threshold: SNAP_THRESHOLD_DEFAULT,
            history_capacity: HISTORY_CAPACITY_DEFAULT,
            history_debounce_ms: HISTORY_DEBOUNCE_MS_DEFAULT,
            countdown_secs: COUNTDOWN_SECS_DEFAULT,
            overflow_offset: OVERFLOW_OFFSET_DEFAULT,
            padding_top: BOARD_PADDING_TOP_DEFAULT,
            padding_bottom: BOARD_PADDING_BOTTOM_DEFAULT,
            padding_side: BOARD_PADDING_SIDE_DEFAULT,
            max_draw_width: MAX_DRAW_WIDTH_DEFAULT,
            max_draw_height: MAX_DRAW_HEIGHT_DEFAULT,
            tick_interval_ms: TICK_INTERVAL_MS_DEFAULT,
            image_load_timeout_ms: IMAGE_LOAD_TIMEOUT_MS_DEFAULT,
        }
    }
}

impl GameRules {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let rules: GameRules =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("position_tolerance", self.position_tolerance)?;
        positive("snap_threshold", self.snap_threshold)?;
        positive("max_draw_width", self.max_draw_width)?;
        positive("max_draw_height", self.max_draw_height)?;
        non_negative("overflow_offset", self.overflow_offset)?;
        non_negative("padding_top", self.padding_top)?;
        non_negative("padding_bottom", self.padding_bottom)?;
        non_negative("padding_side", self.padding_side)?;
        if self.history_capacity == 0 {
            return Err(ConfigError::InvalidRule {
                name: "history_capacity",
                reason: "must hold at least one snapshot".to_string(),
            });
        }
        if !self.history_debounce_ms.is_finite() || self.history_debounce_ms < 0.0 {
            return Err(ConfigError::InvalidRule {
                name: "history_debounce_ms",
                reason: format!("{} is not a valid duration", self.history_debounce_ms),
            });
        }
        if !self.tick_interval_ms.is_finite() || self.tick_interval_ms <= 0.0 {
            return Err(ConfigError::InvalidRule {
                name: "tick_interval_ms",
                reason: format!("{} is not a valid interval", self.tick_interval_ms),
            });
        }
        if self.image_load_timeout_ms == 0 {
            return Err(ConfigError::InvalidRule {
                name: "image_load_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRule {
            name,
            reason: format!("{value} must be a positive number"),
        })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRule {
            name,
            reason: format!("{value} must not be negative"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameRules::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let rules = GameRules::from_json(r#"{"snap_threshold": 20.0}"#).unwrap();
        assert_eq!(rules.snap_threshold, 20.0);
        assert_eq!(rules.history_capacity, HISTORY_CAPACITY_DEFAULT);
        assert_eq!(rules.countdown_secs, COUNTDOWN_SECS_DEFAULT);
    }

    #[test]
    fn rejects_zero_history() {
        let err = GameRules::from_json(r#"{"history_capacity": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRule {
                name: "history_capacity",
                ..
            }
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            GameRules::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn json_round_trip_preserves_rules() {
        let mut rules = GameRules::default();
        rules.overflow_offset = 12.5;
        let raw = rules.to_json().unwrap();
        assert_eq!(GameRules::from_json(&raw).unwrap(), rules);
    }
}
