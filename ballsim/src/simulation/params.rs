//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - restitution shared by wall bounces and collisions,
//! - gravity magnitude and direction (degrees, mutable at runtime),
//! - the per-call dt cap,
//! - drag-release constants,
//! - the mass to radius mapping

#[derive(Debug, Clone)]
pub struct Parameters {
    pub restitution: f64, // fraction of approach speed returned after a bounce/collision
    pub gravity: f64, // gravity magnitude, units/s^2
    pub gravity_direction: f64, // degrees, 0 = +x, 90 = +y
    pub max_dt: f64, // upper bound for a single step
    pub drag: DragParams, // release-velocity inference
    pub radius: RadiusScaling, // radius derived from mass
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            restitution: 0.8,
            gravity: 10.0,
            gravity_direction: 270.0,
            max_dt: 1.0 / 30.0,
            drag: DragParams::default(),
            radius: RadiusScaling::default(),
        }
    }
}

/// Constants for turning a pointer gesture into a launch velocity
#[derive(Debug, Clone, Copy)]
pub struct DragParams {
    pub window_ms: f64, // samples older than this (relative to the newest) are dropped
    pub release_span_ms: f64, // preferred minimum time span between the two release samples
    pub velocity_scale: f64, // gesture speed amplification
    pub max_speed: f64, // launch speed cap
}

impl Default for DragParams {
    fn default() -> Self {
        Self {
            window_ms: 150.0,
            release_span_ms: 50.0,
            velocity_scale: 3.0,
            max_speed: 800.0,
        }
    }
}

/// `radius = max(min_radius, base_radius + mass * per_mass)`
#[derive(Debug, Clone, Copy)]
pub struct RadiusScaling {
    pub min_radius: f64,
    pub base_radius: f64,
    pub per_mass: f64,
}

impl RadiusScaling {
    pub fn radius_for(&self, mass: f64) -> f64 {
        self.min_radius.max(self.base_radius + mass * self.per_mass)
    }
}

impl Default for RadiusScaling {
    fn default() -> Self {
        Self {
            min_radius: 15.0,
            base_radius: 15.0,
            per_mass: 5.0,
        }
    }
}

/// Wrap an angle in degrees into `[0, 360)`
pub fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
