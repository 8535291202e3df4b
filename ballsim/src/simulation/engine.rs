//! Simulation context: owns the body system, parameters, force set and pointer state
//!
//! One `Engine` is one independent simulation. The host drives it with
//! `frame(now_ms)` (or `step(dt)`) once per animation callback and forwards pointer
//! events between frames; it reads `bodies()` back for drawing after each step.
//! `teardown()` stops the frame clock and drops any active drag

use tracing::{debug, info, trace};

use crate::simulation::collision::{apply_boundaries, contain, resolve_pairs};
use crate::simulation::drag::{DragController, Release};
use crate::simulation::forces::{AccelSet, DirectionalGravity};
use crate::simulation::integrator::{clamp_dt, semi_implicit_euler};
use crate::simulation::params::{wrap_degrees, Parameters};
use crate::simulation::states::{Body, System, NVec2};

/// What happened during one step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepReport {
    pub dt: f64, // clamped step actually taken
    pub wall_hits: usize, // bodies reflected off a wall
    pub contacts: usize, // pairs resolved
}

/// Turns host timestamps into step deltas
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameClock {
    Idle, // no frame seen yet
    Running { last_ms: f64 },
    Stopped, // torn down, frames are ignored
}

impl FrameClock {
    /// Record `now_ms` and return the elapsed seconds since the previous frame.
    /// The first frame only records the timestamp
    pub fn tick(&mut self, now_ms: f64) -> Option<f64> {
        match *self {
            FrameClock::Idle => {
                *self = FrameClock::Running { last_ms: now_ms };
                None
            }
            FrameClock::Running { last_ms } => {
                *self = FrameClock::Running { last_ms: now_ms };
                Some((now_ms - last_ms) / 1000.0)
            }
            FrameClock::Stopped => None,
        }
    }
}

pub struct Engine {
    system: System,
    parameters: Parameters,
    forces: AccelSet,
    drag: DragController,
    clock: FrameClock,
}

impl Engine {
    /// Create an engine with directional gravity registered.
    /// Radii are recomputed from mass so the body list is consistent from the start
    pub fn new(mut system: System, parameters: Parameters) -> Self {
        for b in system.bodies.iter_mut() {
            b.radius = parameters.radius.radius_for(b.m);
        }
        info!(
            bodies = system.bodies.len(),
            width = system.world.width,
            height = system.world.height,
            "engine created"
        );
        Self::with_forces(system, parameters, AccelSet::new().with(DirectionalGravity))
    }

    /// Create an engine with a caller-provided force set, radii are taken as given
    pub fn with_forces(system: System, parameters: Parameters, forces: AccelSet) -> Self {
        Self {
            system,
            parameters,
            forces,
            drag: DragController::new(),
            clock: FrameClock::Idle,
        }
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    /// Direct access for hosts and tests that need to place bodies
    pub fn system_mut(&mut self) -> &mut System {
        &mut self.system
    }

    pub fn bodies(&self) -> &[Body] {
        &self.system.bodies
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn is_running(&self) -> bool {
        self.clock != FrameClock::Stopped
    }

    /// Per-frame callback. Converts the host's monotonic timestamp into a clamped dt
    /// and steps. Returns `None` on the first frame, after teardown, or when no time passed
    pub fn frame(&mut self, now_ms: f64) -> Option<StepReport> {
        let raw = self.clock.tick(now_ms)?;
        clamp_dt(raw, self.parameters.max_dt).map(|dt| self.advance(dt))
    }

    /// Advance by `dt` seconds (clamped to `max_dt`): integrate, reflect, resolve pairs, contain.
    /// A non-positive dt is a no-op and reports `dt = 0`
    pub fn step(&mut self, dt: f64) -> StepReport {
        match clamp_dt(dt, self.parameters.max_dt) {
            Some(dt) => self.advance(dt),
            None => StepReport::default(),
        }
    }

    fn advance(&mut self, dt: f64) -> StepReport {
        let restitution = self.parameters.restitution;

        semi_implicit_euler(&mut self.system, &self.forces, &self.parameters, dt);
        let wall_hits = apply_boundaries(&mut self.system, restitution);
        let contacts = resolve_pairs(&mut self.system.bodies, restitution);
        contain(&mut self.system);

        trace!(t = self.system.t, dt, wall_hits, contacts, "step");
        StepReport {
            dt,
            wall_hits,
            contacts,
        }
    }

    // ------------------------------------------------------------------
    // pointer events, coordinates already in world space

    pub fn pointer_down(&mut self, p: NVec2, now_ms: f64) -> Option<usize> {
        self.drag.pointer_down(&mut self.system, p, now_ms)
    }

    pub fn pointer_move(&mut self, p: NVec2, now_ms: f64) {
        self.drag
            .pointer_move(&mut self.system, p, now_ms, &self.parameters.drag);
    }

    /// Pointer up and pointer leave are both a release
    pub fn pointer_up(&mut self) -> Option<Release> {
        self.drag.pointer_up(&mut self.system, &self.parameters.drag)
    }

    // ------------------------------------------------------------------
    // configuration setters, values are expected to be validated by the caller

    pub fn set_gravity(&mut self, g: f64) {
        self.parameters.gravity = g;
        debug!(gravity = g, "gravity changed");
    }

    /// Set gravity direction in degrees, wrapped into [0, 360)
    pub fn set_gravity_direction(&mut self, deg: f64) {
        self.parameters.gravity_direction = wrap_degrees(deg);
        debug!(direction = self.parameters.gravity_direction, "gravity direction changed");
    }

    pub fn gravity(&self) -> (f64, f64) {
        (self.parameters.gravity, self.parameters.gravity_direction)
    }

    /// Change a body's mass and recompute its radius. Returns false for an unknown index
    pub fn set_mass(&mut self, index: usize, m: f64) -> bool {
        let scaling = self.parameters.radius;
        let Some(b) = self.system.bodies.get_mut(index) else {
            return false;
        };
        b.m = m;
        b.radius = scaling.radius_for(m);
        debug!(body = index, mass = m, radius = b.radius, "mass changed");
        true
    }

    /// Stop accepting frames and drop any active drag without launching it
    pub fn teardown(&mut self) {
        if self.clock == FrameClock::Stopped {
            return;
        }
        self.drag.cancel(&mut self.system);
        self.clock = FrameClock::Stopped;
        info!(t = self.system.t, "engine torn down");
    }
}
