//! Acceleration contributors for the ball engine
//!
//! Defines the acceleration trait, the set that sums contributions per body,
//! and directional gravity, the one term the default scene registers

use crate::simulation::params::Parameters;
use crate::simulation::states::{System, NVec2};

/// Collection of acceleration terms (gravity, wind, etc.)
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compute total accelerations for all bodies in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    /// - dragged bodies always end up with zero acceleration
    pub fn accumulate_accels(&self, sys: &System, params: &Parameters, out: &mut [NVec2]) {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec2::zeros();
        }
        for term in &self.terms {
            term.acceleration(sys, params, out);
        }
        for (b, a) in sys.bodies.iter().zip(out.iter_mut()) {
            if b.dragging {
                *a = NVec2::zeros();
            }
        }
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for acceleration sources operating on [`System`]
/// Implementations add their contribution into `out[i]` for each body.
/// Live settings such as gravity are read from `params` on every call so
/// runtime setters take effect on the next step
pub trait Acceleration {
    fn acceleration(&self, sys: &System, params: &Parameters, out: &mut [NVec2]);
}

/// Uniform gravity pointing along `params.gravity_direction` (degrees)
/// with magnitude `params.gravity`. Mass independent
pub struct DirectionalGravity;

impl DirectionalGravity {
    /// Gravity as a vector: (cos θ, sin θ) * g
    pub fn vector(params: &Parameters) -> NVec2 {
        let theta = params.gravity_direction.to_radians();
        NVec2::new(theta.cos(), theta.sin()) * params.gravity
    }
}

impl Acceleration for DirectionalGravity {
    fn acceleration(&self, sys: &System, params: &Parameters, out: &mut [NVec2]) {
        let g = Self::vector(params);
        for (b, a) in sys.bodies.iter().zip(out.iter_mut()) {
            if !b.dragging {
                *a += g;
            }
        }
    }
}
