//! Engine configuration.

use crate::error::{CoreError, CoreResult};
use crate::shapes::SerializableColor;
use serde::{Deserialize, Serialize};

/// Tunables for a canvas instance.
///
/// Every field has a default matching the reference behavior, so a partial
/// JSON document only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Lower zoom clamp.
    pub min_zoom: f64,
    /// Upper zoom clamp.
    pub max_zoom: f64,
    /// Zoom multiplier for a wheel step towards the user (negative delta).
    pub zoom_in_factor: f64,
    /// Zoom multiplier for a wheel step away from the user (positive delta).
    pub zoom_out_factor: f64,
    /// Resize handle grab radius in screen pixels.
    pub handle_hit_tolerance: f64,
    /// Grid line spacing in logical units.
    pub grid_size: f64,
    /// Canvas background.
    pub background_color: SerializableColor,
    /// Grid line color.
    pub grid_color: SerializableColor,
    /// Font size for new text elements.
    pub default_font_size: f64,
    /// History depth cap. `None` keeps every snapshot.
    pub max_history: Option<usize>,
    /// Logical distance a freehand sample must travel from the previous
    /// sample to be recorded. Zero records every sample.
    pub min_sample_distance: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 5.0,
            zoom_in_factor: 1.1,
            zoom_out_factor: 0.9,
            handle_hit_tolerance: 8.0,
            grid_size: 50.0,
            background_color: SerializableColor::white(),
            grid_color: SerializableColor::new(0xe5, 0xe7, 0xeb, 255),
            default_font_size: 16.0,
            max_history: None,
            min_sample_distance: 0.0,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the engine's invariants.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.min_zoom > 0.0) || !(self.max_zoom > 0.0) {
            return Err(CoreError::InvalidConfig("zoom bounds must be positive".into()));
        }
        if self.min_zoom > self.max_zoom {
            return Err(CoreError::InvalidConfig(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_in_factor > 0.0) || !(self.zoom_out_factor > 0.0) {
            return Err(CoreError::InvalidConfig("zoom factors must be positive".into()));
        }
        if !(self.handle_hit_tolerance > 0.0) {
            return Err(CoreError::InvalidConfig("handle_hit_tolerance must be positive".into()));
        }
        if !(self.grid_size > 0.0) {
            return Err(CoreError::InvalidConfig("grid_size must be positive".into()));
        }
        if !(self.default_font_size > 0.0) {
            return Err(CoreError::InvalidConfig("default_font_size must be positive".into()));
        }
        if self.min_sample_distance < 0.0 {
            return Err(CoreError::InvalidConfig("min_sample_distance must not be negative".into()));
        }
        if self.max_history == Some(0) {
            return Err(CoreError::InvalidConfig(
                "max_history must keep at least one snapshot".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CanvasConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.max_history.is_none());
        assert!((config.grid_size - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CanvasConfig::from_json(r#"{ "max_zoom": 8.0, "max_history": 20 }"#).unwrap();
        assert!((config.max_zoom - 8.0).abs() < f64::EPSILON);
        assert!((config.min_zoom - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.max_history, Some(20));
    }

    #[test]
    fn test_rejects_inverted_zoom_bounds() {
        let err = CanvasConfig::from_json(r#"{ "min_zoom": 3.0, "max_zoom": 2.0 }"#).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_zero_history() {
        let config = CanvasConfig {
            max_history: Some(0),
            ..CanvasConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = CanvasConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_json_roundtrip_keeps_colors() {
        let config = CanvasConfig::default();
        let json = config.to_json().unwrap();
        let back = CanvasConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }
}
