//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`WorldConfig`]      – the bounding rectangle
//! - [`ParametersConfig`] – restitution, gravity, dt cap, drag and radius constants
//! - [`BodyConfig`]       – initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! Every section has defaults; `{}` is the default two-ball scene.
//!
//! # YAML format
//!
//! ```yaml
//! world:
//!   width: 600.0
//!   height: 400.0
//!
//! parameters:
//!   restitution: 0.8          # wall and collision bounciness
//!   gravity: 10.0             # units/s^2
//!   gravity_direction: 270.0  # degrees, 270 points down
//!   max_dt: 0.0333333         # longest single step
//!   drag_window_ms: 150.0
//!   release_span_ms: 50.0
//!   velocity_scale: 3.0
//!   max_release_speed: 800.0
//!   min_radius: 15.0
//!   base_radius: 15.0
//!   radius_per_mass: 5.0
//!
//! bodies:
//!   - label: "#3b82f6"
//!     x: [150.0, 300.0]
//!     m: 1.0
//!   - label: "#6b7280"
//!     x: [350.0, 300.0]
//!     v: [0.0, 0.0]           # optional
//!     m: 0.8
//! ```
//!
//! Radii are not part of the file, they are derived from mass.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::simulation::params::{DragParams, Parameters, RadiusScaling};

/// Errors raised while loading or validating a scenario
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The scenario file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML is malformed or does not match the schema
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value is out of its valid range
    #[error("Invalid scenario: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// World rectangle
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
        }
    }
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ParametersConfig {
    pub restitution: f64,       // shared by walls and collisions, in [0, 1]
    pub gravity: f64,           // magnitude
    pub gravity_direction: f64, // degrees, wrapped on load
    pub max_dt: f64,            // longest single step in seconds
    pub drag_window_ms: f64,    // drag history recency window
    pub release_span_ms: f64,   // preferred span between release samples
    pub velocity_scale: f64,    // gesture speed amplification
    pub max_release_speed: f64, // launch speed cap
    pub min_radius: f64,
    pub base_radius: f64,
    pub radius_per_mass: f64,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        let p = Parameters::default();
        Self {
            restitution: p.restitution,
            gravity: p.gravity,
            gravity_direction: p.gravity_direction,
            max_dt: p.max_dt,
            drag_window_ms: p.drag.window_ms,
            release_span_ms: p.drag.release_span_ms,
            velocity_scale: p.drag.velocity_scale,
            max_release_speed: p.drag.max_speed,
            min_radius: p.radius.min_radius,
            base_radius: p.radius.base_radius,
            radius_per_mass: p.radius.per_mass,
        }
    }
}

impl ParametersConfig {
    /// Map to runtime `Parameters`
    pub fn to_parameters(&self) -> Parameters {
        Parameters {
            restitution: self.restitution,
            gravity: self.gravity,
            gravity_direction: crate::simulation::params::wrap_degrees(self.gravity_direction),
            max_dt: self.max_dt,
            drag: DragParams {
                window_ms: self.drag_window_ms,
                release_span_ms: self.release_span_ms,
                velocity_scale: self.velocity_scale,
                max_speed: self.max_release_speed,
            },
            radius: RadiusScaling {
                min_radius: self.min_radius,
                base_radius: self.base_radius,
                per_mass: self.radius_per_mass,
            },
        }
    }
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    #[serde(default)]
    pub label: String, // opaque identity for the renderer, e.g. a colour
    pub x: [f64; 2], // initial position in world units
    #[serde(default)]
    pub v: [f64; 2], // initial velocity, defaults to rest
    pub m: f64, // mass, strictly positive
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    pub world: WorldConfig,
    pub parameters: ParametersConfig,
    pub bodies: Vec<BodyConfig>,
}

impl Default for ScenarioConfig {
    /// Blue ball of mass 1 and gray ball of mass 0.8, both at rest near the top
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            parameters: ParametersConfig::default(),
            bodies: vec![
                BodyConfig {
                    label: "#3b82f6".to_string(),
                    x: [150.0, 300.0],
                    v: [0.0, 0.0],
                    m: 1.0,
                },
                BodyConfig {
                    label: "#6b7280".to_string(),
                    x: [350.0, 300.0],
                    v: [0.0, 0.0],
                    m: 0.8,
                },
            ],
        }
    }
}

impl ScenarioConfig {
    /// Parse and validate a scenario from a YAML string
    pub fn from_yaml_str(s: &str) -> ConfigResult<Self> {
        let cfg: ScenarioConfig = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a scenario file
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the stepper would silently misbehave on
    pub fn validate(&self) -> ConfigResult<()> {
        let w = &self.world;
        if !(w.width.is_finite() && w.width > 0.0 && w.height.is_finite() && w.height > 0.0) {
            return Err(invalid(format!("world size must be positive, got {} x {}", w.width, w.height)));
        }

        let p = &self.parameters;
        if !(0.0..=1.0).contains(&p.restitution) {
            return Err(invalid(format!("restitution must be in [0, 1], got {}", p.restitution)));
        }
        if !p.gravity.is_finite() || !p.gravity_direction.is_finite() {
            return Err(invalid("gravity and gravity_direction must be finite".to_string()));
        }
        if !(p.max_dt.is_finite() && p.max_dt > 0.0) {
            return Err(invalid(format!("max_dt must be positive, got {}", p.max_dt)));
        }
        let drag = [
            ("drag_window_ms", p.drag_window_ms),
            ("release_span_ms", p.release_span_ms),
            ("velocity_scale", p.velocity_scale),
            ("max_release_speed", p.max_release_speed),
            ("min_radius", p.min_radius),
            ("base_radius", p.base_radius),
            ("radius_per_mass", p.radius_per_mass),
        ];
        for (name, value) in drag {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{name} must be finite and non-negative, got {value}")));
            }
        }

        if self.bodies.is_empty() {
            return Err(invalid("at least one body is required".to_string()));
        }
        for (i, b) in self.bodies.iter().enumerate() {
            validate_mass(b.m).map_err(|e| invalid(format!("body {i}: {e}")))?;
            if !b.x.iter().chain(b.v.iter()).all(|c| c.is_finite()) {
                return Err(invalid(format!("body {i}: position and velocity must be finite")));
            }
        }
        Ok(())
    }
}

/// Mass must be finite and strictly positive. Shared with the viewer's mass controls
pub fn validate_mass(m: f64) -> Result<(), String> {
    if m.is_finite() && m > 0.0 {
        Ok(())
    } else {
        Err(format!("mass must be finite and positive, got {m}"))
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::Invalid(msg)
}
