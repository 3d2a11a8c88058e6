//! Activity configuration, fixed when the activities are constructed.
//!
//! The page may pass a JSON object to `ExploraServer::with_config`; any
//! missing key falls back to the default below.

use crate::activities::error::ActivityError;
use crate::activities::robot::DEFAULT_GRID_RADIUS;
use crate::activities::water_cycle::PhaseDurations;
use serde::Deserialize;

/// Largest board the robot page will render. The grid is (2r+1)² cells.
pub const MAX_GRID_RADIUS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    /// Robot board half-width.
    pub grid_radius: u32,
    /// Map drag quantization. 0 disables snapping.
    pub snap_step: f64,
    pub durations: PhaseDurations,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            grid_radius: DEFAULT_GRID_RADIUS,
            snap_step: 0.5,
            durations: PhaseDurations::default(),
        }
    }
}

impl ActivityConfig {
    pub fn from_json(json: &str) -> Result<Self, ActivityError> {
        let config: ActivityConfig = serde_json::from_str(json)
            .map_err(|e| ActivityError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Range checks that serde cannot express. Phase durations are checked
    /// by the water cycle controller itself.
    pub fn validate(&self) -> Result<(), ActivityError> {
        if self.grid_radius > MAX_GRID_RADIUS {
            return Err(ActivityError::InvalidConfig(format!(
                "grid_radius must be at most {}, got {}",
                MAX_GRID_RADIUS, self.grid_radius
            )));
        }
        if !self.snap_step.is_finite() || self.snap_step < 0.0 {
            return Err(ActivityError::InvalidConfig(format!(
                "snap_step must be a finite number >= 0, got {}",
                self.snap_step
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = ActivityConfig::from_json("{}").unwrap();
        assert_eq!(config, ActivityConfig::default());
        assert_eq!(config.grid_radius, 4);
        assert_eq!(config.durations.precipitation, 3.5);
    }

    #[test]
    fn partial_durations_keep_other_defaults() {
        let config =
            ActivityConfig::from_json(r#"{"grid_radius":2,"durations":{"condensation":1.5}}"#)
                .unwrap();
        assert_eq!(config.grid_radius, 2);
        assert_eq!(config.durations.condensation, 1.5);
        assert_eq!(config.durations.evaporation, 4.0);
        assert_eq!(config.snap_step, 0.5);
    }

    #[test]
    fn rejects_bad_json_and_negative_snap() {
        assert!(matches!(
            ActivityConfig::from_json("not json"),
            Err(ActivityError::InvalidConfig(_))
        ));
        assert!(ActivityConfig::from_json(r#"{"snap_step":-1}"#).is_err());
    }

    #[test]
    fn rejects_oversized_grid_radius() {
        let err = ActivityConfig::from_json(r#"{"grid_radius": 4000000000}"#).unwrap_err();
        assert!(matches!(err, ActivityError::InvalidConfig(ref msg) if msg.contains("grid_radius")));
        assert!(ActivityConfig::from_json(r#"{"grid_radius": 51}"#).is_err());

        let config = ActivityConfig::from_json(r#"{"grid_radius": 50}"#).unwrap();
        assert_eq!(config.grid_radius, MAX_GRID_RADIUS);
        assert!(ActivityConfig::from_json(r#"{"grid_radius": 0}"#).is_ok());
    }
}
