//! Core state types for the two-ball simulation.
//!
//! - `Body`   one draggable disc (position, velocity, mass, derived radius)
//! - `World`  fixed bounding rectangle, origin bottom-left, +y up
//! - `System` the authoritative body list plus the world and current time `t`
//!
//! The stepper mutates a `System` in place and the renderer reads the same
//! container after each step.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone)]
pub struct Body {
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub m: f64, // mass
    pub radius: f64, // derived from mass, see `RadiusScaling`
    pub label: String, // opaque identity, only used by the renderer
    pub dragging: bool, // true while this body is the active pointer target
}

impl Body {
    /// Body at rest with a radius already derived from its mass
    pub fn at_rest(label: impl Into<String>, x: NVec2, m: f64, radius: f64) -> Self {
        Self {
            x,
            v: NVec2::zeros(),
            m,
            radius,
            label: label.into(),
            dragging: false,
        }
    }

    /// True when `p` lies on or inside the disc
    pub fn contains(&self, p: &NVec2) -> bool {
        (p - self.x).norm() <= self.radius
    }
}

/// Rectangle `[0, width] x [0, height]` the bodies live in. Never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct World {
    pub width: f64,
    pub height: f64,
}

impl World {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp a center so a disc of `radius` stays fully inside the world
    pub fn clamp_center(&self, p: &NVec2, radius: f64) -> NVec2 {
        NVec2::new(
            p.x.max(radius).min(self.width - radius),
            p.y.max(radius).min(self.height - radius),
        )
    }

    /// `radius <= x <= width - radius` and the same for y
    pub fn contains_disc(&self, p: &NVec2, radius: f64) -> bool {
        p.x >= radius && p.x <= self.width - radius && p.y >= radius && p.y <= self.height - radius
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // bodies in draw order, later ones are in front
    pub world: World, // bounding rectangle
    pub t: f64, // simulated time
}

impl System {
    pub fn new(bodies: Vec<Body>, world: World) -> Self {
        Self {
            bodies,
            world,
            t: 0.0,
        }
    }

    /// Index of the body currently being dragged, if any
    pub fn dragged(&self) -> Option<usize> {
        self.bodies.iter().position(|b| b.dragging)
    }

    /// Sum of translational kinetic energy, used by tests and diagnostics
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| 0.5 * b.m * b.v.norm_squared())
            .sum()
    }
}
