//! Simulation settings
//!
//! Defaults reproduce the tuning the locomotion layer was built around:
//! 5 m/s walk, 20 m/s² gravity, 45° walkable slopes, a 0.6 m step height
//! and a 300 ms double-tap window for flight.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::foundation::math::utils::deg_to_rad;

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be finite and positive, got {value}")))
    }
}

/// Top-level settings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Default log filter (overridden by `RUST_LOG`)
    pub log_level: String,
    /// Fixed simulation rate
    pub tick_rate_hz: f32,
    /// Movement tuning
    pub locomotion: LocomotionConfig,
    /// Ground probe geometry
    pub probe: GroundProbeConfig,
    /// Wall push-out settings
    pub resolver: WallResolverConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            tick_rate_hz: 60.0,
            locomotion: LocomotionConfig::default(),
            probe: GroundProbeConfig::default(),
            resolver: WallResolverConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Length of one fixed step in seconds
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate_hz
    }

    /// Builder method to set the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Config for SimulationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("tick_rate_hz", self.tick_rate_hz)?;
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::invalid("log_level", "must not be empty"));
        }
        self.locomotion.validate()?;
        self.probe.validate()?;
        self.resolver.validate()
    }
}

/// Character movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Horizontal speed on foot (m/s)
    pub walk_speed: f32,
    /// Downward acceleration (m/s²)
    pub gravity: f32,
    /// Vertical velocity given by a jump (m/s)
    pub jump_velocity: f32,
    /// Maximum falling speed (m/s)
    pub terminal_velocity: f32,
    /// Downward velocity held while grounded so the actor hugs slopes (m/s)
    pub ground_stick_velocity: f32,
    /// Steepest walkable slope (degrees)
    pub max_walk_angle_degrees: f32,
    /// Downhill acceleration on slopes that are too steep (m/s²)
    pub slide_acceleration: f32,
    /// Vertical ladder speed (m/s)
    pub climb_speed: f32,
    /// Sideways speed while on a ladder (m/s)
    pub climb_strafe_speed: f32,
    /// Upward kick when jumping off a ladder (m/s)
    pub climb_jump_velocity: f32,
    /// Speed while flying or in ghost mode (m/s)
    pub fly_speed: f32,
    /// Two jump presses closer than this toggle flight (ms)
    pub double_tap_window_ms: u64,
    /// Exponential momentum decay rate (1/s)
    pub momentum_damping: f32,
    /// Squared momentum magnitude below which it snaps to zero
    pub momentum_epsilon: f32,
    /// Ladder volumes are grown by this much when testing containment (m)
    pub ladder_margin: f32,
    /// Height of the point tested against ladder volumes, above the feet (m)
    pub chest_height: f32,
    /// Radius of the actor's collision sphere (m)
    pub body_radius: f32,
    /// Height of the collision sphere's center above the feet (m)
    pub body_center_height: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            gravity: 20.0,
            jump_velocity: 8.0,
            terminal_velocity: 50.0,
            ground_stick_velocity: 0.5,
            max_walk_angle_degrees: 45.0,
            slide_acceleration: 10.0,
            climb_speed: 3.0,
            climb_strafe_speed: 1.5,
            climb_jump_velocity: 6.0,
            fly_speed: 10.0,
            double_tap_window_ms: 300,
            momentum_damping: 2.0,
            momentum_epsilon: 0.01,
            ladder_margin: 0.3,
            chest_height: 1.2,
            body_radius: 0.4,
            body_center_height: 0.9,
        }
    }
}

impl LocomotionConfig {
    /// Steepest walkable slope in radians
    pub fn max_walk_angle(&self) -> f32 {
        deg_to_rad(self.max_walk_angle_degrees)
    }

    /// Double-tap window as a duration
    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("locomotion.walk_speed", self.walk_speed),
            ("locomotion.gravity", self.gravity),
            ("locomotion.jump_velocity", self.jump_velocity),
            ("locomotion.terminal_velocity", self.terminal_velocity),
            ("locomotion.slide_acceleration", self.slide_acceleration),
            ("locomotion.climb_speed", self.climb_speed),
            ("locomotion.climb_strafe_speed", self.climb_strafe_speed),
            ("locomotion.climb_jump_velocity", self.climb_jump_velocity),
            ("locomotion.fly_speed", self.fly_speed),
            ("locomotion.momentum_damping", self.momentum_damping),
            ("locomotion.momentum_epsilon", self.momentum_epsilon),
            ("locomotion.chest_height", self.chest_height),
            ("locomotion.body_radius", self.body_radius),
            ("locomotion.body_center_height", self.body_center_height),
        ];
        for (field, value) in positive {
            require_positive(field, value)?;
        }

        if !self.ground_stick_velocity.is_finite() || self.ground_stick_velocity < 0.0 {
            return Err(ConfigError::invalid(
                "locomotion.ground_stick_velocity",
                "must be finite and not negative",
            ));
        }
        if !self.ladder_margin.is_finite() || self.ladder_margin < 0.0 {
            return Err(ConfigError::invalid("locomotion.ladder_margin", "must be finite and not negative"));
        }
        if !(self.max_walk_angle_degrees > 0.0 && self.max_walk_angle_degrees < 90.0) {
            return Err(ConfigError::invalid(
                "locomotion.max_walk_angle_degrees",
                format!("must be between 0 and 90, got {}", self.max_walk_angle_degrees),
            ));
        }
        if self.double_tap_window_ms == 0 {
            return Err(ConfigError::invalid("locomotion.double_tap_window_ms", "must not be zero"));
        }
        Ok(())
    }
}

/// Ground probe geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundProbeConfig {
    /// Horizontal distance of the four outer rays from the center ray (m)
    pub sample_offset: f32,
    /// How far below the feet ground is still found (m)
    pub ray_length: f32,
    /// How far above the feet ground is still accepted (m)
    pub step_height: f32,
}

impl Default for GroundProbeConfig {
    fn default() -> Self {
        Self {
            sample_offset: 0.3,
            ray_length: 1.0,
            step_height: 0.6,
        }
    }
}

impl GroundProbeConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("probe.ray_length", self.ray_length)?;
        require_positive("probe.step_height", self.step_height)?;
        if !self.sample_offset.is_finite() || self.sample_offset < 0.0 {
            return Err(ConfigError::invalid("probe.sample_offset", "must be finite and not negative"));
        }
        Ok(())
    }
}

/// Wall push-out settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallResolverConfig {
    /// Contacts whose normal has a larger |y| are floors or ceilings and
    /// are left to the ground probe
    pub max_vertical_normal: f32,
}

impl Default for WallResolverConfig {
    fn default() -> Self {
        Self { max_vertical_normal: 0.5 }
    }
}

impl WallResolverConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_vertical_normal > 0.0 && self.max_vertical_normal <= 1.0) {
            return Err(ConfigError::invalid(
                "resolver.max_vertical_normal",
                format!("must be in (0, 1], got {}", self.max_vertical_normal),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("stride_engine_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.locomotion.double_tap_window(), Duration::from_millis(300));
        assert!((config.tick_seconds() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SimulationConfig = toml::from_str(
            r#"
            tick_rate_hz = 120.0

            [locomotion]
            walk_speed = 7.5
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_rate_hz, 120.0);
        assert_eq!(config.locomotion.walk_speed, 7.5);
        assert_eq!(config.locomotion.gravity, 20.0);
        assert_eq!(config.probe, GroundProbeConfig::default());
    }

    #[test]
    fn test_toml_file_round_trip() {
        let path = scratch_path("round_trip.toml");
        let mut config = SimulationConfig::default().with_log_level("debug");
        config.locomotion.jump_velocity = 9.0;

        config.save_to_file(&path).unwrap();
        let loaded = SimulationConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_file_round_trip() {
        let path = scratch_path("round_trip.ron");
        let mut config = SimulationConfig::default();
        config.probe.step_height = 0.4;

        config.save_to_file(&path).unwrap();
        let loaded = SimulationConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = SimulationConfig::default().save_to_file(scratch_path("settings.json"));
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_invalid_values_rejected_on_load() {
        let path = scratch_path("invalid.toml");
        std::fs::write(&path, "[locomotion]\nmax_walk_angle_degrees = 95.0\n").unwrap();
        let result = SimulationConfig::load_from_file(&path);
        let _ = std::fs::remove_file(&path);

        match result {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "locomotion.max_walk_angle_degrees"),
            other => panic!("expected invalid value error, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_speed_rejected() {
        let mut config = SimulationConfig::default();
        config.locomotion.walk_speed = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.resolver.max_vertical_normal = 0.0;
        assert!(config.validate().is_err());
    }
}
