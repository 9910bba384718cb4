//! Session configuration loaded from YAML.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```yaml
//! primary:
//!   name: Star
//!   mu: 0.0039478
//!   radius: 0.08
//! pursuer:
//!   position: [0.6, 0.0]
//!   velocity: [0.0, 0.0811]
//!   radius: 0.02
//! dt: 0.5
//! delta_v: 0.003
//! world_radius: 1.0
//! max_ticks: 2000
//! ```

use std::f64::consts::PI;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use nalgebra::Vector2;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::orbital::circular_state;

/// Gravitational parameter giving `period = 100 sqrt(r^3)` in screen units.
pub const GAME_MU: f64 = 4.0 * PI * PI * 1e-4;

/// Earth gravitational parameter, m^3/s^2.
pub const MU_EARTH: f64 = 3.986e14;

/// Upper bound on `max_ticks`; a session keeps one snapshot per tick.
pub const MAX_SESSION_TICKS: u64 = 1_000_000;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PrimaryConfig {
    pub name: String,
    pub mu: f64,
    pub radius: f64,
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self { name: "Star".into(), mu: GAME_MU, radius: 0.08 }
    }
}

/// Initial Cartesian state of one orbiting body.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    #[serde(default)]
    pub name: String,
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    pub radius: f64,
}

impl BodyConfig {
    /// Circular prograde orbit at `orbit` radius and polar angle in degrees.
    pub fn circular(name: impl Into<String>, orbit: f64, angle_deg: f64, radius: f64, mu: f64) -> Self {
        let (pos, vel) = circular_state(orbit, angle_deg.to_radians(), mu);
        Self {
            name: name.into(),
            position: [pos.x, pos.y],
            velocity: [vel.x, vel.y],
            radius,
        }
    }

    pub fn pos(&self) -> Vector2<f64> {
        Vector2::new(self.position[0], self.position[1])
    }

    pub fn vel(&self) -> Vector2<f64> {
        Vector2::new(self.velocity[0], self.velocity[1])
    }
}

/// Numeric constants consumed by [`crate::sim::Simulation`].
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub primary: PrimaryConfig,
    pub pursuer: BodyConfig,
    pub target: BodyConfig,
    pub dt: f64,           // tick duration
    pub delta_v: f64,      // maneuver magnitude per key press
    pub world_radius: f64, // normalization radius for the proximity test
    pub max_ticks: u64,    // headless session limit
}

impl Default for SimConfig {
    /// The rendezvous game in normalized screen units ([-1, 1] world).
    fn default() -> Self {
        Self {
            primary: PrimaryConfig::default(),
            pursuer: BodyConfig::circular("Ship", 0.6, 0.0, 0.02, GAME_MU),
            target: BodyConfig::circular("Debris", 0.5, 90.0, 0.02, GAME_MU),
            dt: 0.5,
            delta_v: 0.003,
            world_radius: 1.0,
            max_ticks: 2000,
        }
    }
}

impl SimConfig {
    /// Low Earth orbit chase in SI units: target 50 km above the pursuer.
    pub fn leo() -> Self {
        Self {
            primary: PrimaryConfig { name: "Earth".into(), mu: MU_EARTH, radius: 6.371e6 },
            pursuer: BodyConfig::circular("Chaser", 7.0e6, 0.0, 5.0e4, MU_EARTH),
            target: BodyConfig::circular("Station", 7.05e6, 30.0, 5.0e4, MU_EARTH),
            dt: 10.0,
            delta_v: 10.0,
            world_radius: 1.0e7,
            max_ticks: 20_000,
        }
    }

    /// Look up a built-in configuration by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "game" | "default" => Some(Self::default()),
            "leo" => Some(Self::leo()),
            _ => None,
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        let config: SimConfig = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the constants are usable; orbit boundedness is checked when
    /// the bodies are built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("primary.mu", self.primary.mu),
            ("primary.radius", self.primary.radius),
            ("pursuer.radius", self.pursuer.radius),
            ("target.radius", self.target.radius),
            ("dt", self.dt),
            ("world_radius", self.world_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.delta_v.is_finite() && self.delta_v >= 0.0) {
            return Err(ConfigError::Invalid(format!("delta_v must be >= 0, got {}", self.delta_v)));
        }
        if self.max_ticks > MAX_SESSION_TICKS {
            return Err(ConfigError::Invalid(format!(
                "max_ticks {} exceeds the limit of {MAX_SESSION_TICKS}",
                self.max_ticks
            )));
        }
        for body in [&self.pursuer, &self.target] {
            if !body.position.iter().chain(&body.velocity).all(|c| c.is_finite()) {
                return Err(ConfigError::Invalid(format!("{} has a non-finite state", body.name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_game_layout() {
        let c = SimConfig::default();
        assert!((c.pursuer.pos() - Vector2::new(0.6, 0.0)).norm() < 1e-12);
        assert!((c.target.pos() - Vector2::new(0.0, 0.5)).norm() < 1e-12);
        assert!(c.validate().is_ok());
        // period = 100 * sqrt(r^3) in screen units
        let period = 2.0 * PI * (0.6_f64.powi(3) / c.primary.mu).sqrt();
        assert!((period - 100.0 * 0.6_f64.powi(3).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let c = SimConfig::from_yaml_str("dt: 0.25\ndelta_v: 0.01\n").unwrap();
        assert_eq!(c.dt, 0.25);
        assert_eq!(c.delta_v, 0.01);
        assert_eq!(c.primary, PrimaryConfig::default());
    }

    #[test]
    fn yaml_body_override() {
        let text = "pursuer:\n  name: Probe\n  position: [0.7, 0.0]\n  velocity: [0.0, 0.07]\n  radius: 0.03\n";
        let c = SimConfig::from_yaml_str(text).unwrap();
        assert_eq!(c.pursuer.name, "Probe");
        assert_eq!(c.pursuer.radius, 0.03);
        assert_eq!(c.target, SimConfig::default().target);
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(SimConfig::from_yaml_str("dt: -1.0\n").is_err());
        assert!(SimConfig::from_yaml_str("world_radius: 0.0\n").is_err());
        assert!(SimConfig::from_yaml_str("primary:\n  mu: -3.0\n").is_err());
        assert!(SimConfig::from_yaml_str("dt: [1, 2]\n").is_err());
        assert!(SimConfig::from_yaml_str("max_ticks: 1000001\n").is_err());
        assert!(SimConfig::from_yaml_str("max_ticks: 1000000\n").is_ok());
    }

    #[test]
    fn presets_by_name() {
        assert!(SimConfig::preset("leo").is_some());
        assert_eq!(SimConfig::preset("game"), Some(SimConfig::default()));
        assert!(SimConfig::preset("mars").is_none());
    }
}
