//! Pointer dragging and release-velocity inference.
//!
//! A body goes `Idle -> Dragging -> Idle`. While dragging, its position follows the
//! pointer (clamped into the world) and each position is recorded with its timestamp.
//! On release the launch velocity is estimated from the last part of the gesture only:
//!
//! ```text
//!   samples:  s0 ... s(k) ............ s(n-1)
//!                     |<-- >= span -->|
//!                  previous         current
//!   v = (current - previous) / dt * velocity_scale, then capped to max_speed
//! ```
//!
//! Samples older than `window_ms` relative to the newest one are pruned as the pointer
//! moves, so a long pause before a flick does not average the flick away.

use tracing::debug;

use crate::simulation::params::DragParams;
use crate::simulation::states::{System, NVec2};

/// One recorded pointer position, `time_ms` from the host's monotonic clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    pub pos: NVec2,
    pub time_ms: f64,
}

impl DragSample {
    pub fn new(x: f64, y: f64, time_ms: f64) -> Self {
        Self {
            pos: NVec2::new(x, y),
            time_ms,
        }
    }
}

/// Time-bounded, ordered buffer of samples for the body being dragged
#[derive(Debug, Clone, Default)]
pub struct DragHistory {
    samples: Vec<DragSample>,
}

impl DragHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and seed with a single sample
    pub fn start(&mut self, sample: DragSample) {
        self.samples.clear();
        self.samples.push(sample);
    }

    /// Append a sample and prune entries older than `window_ms` relative to it
    pub fn push(&mut self, sample: DragSample, window_ms: f64) {
        self.samples.push(sample);
        let newest = sample.time_ms;
        self.samples.retain(|s| newest - s.time_ms <= window_ms);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[DragSample] {
        &self.samples
    }
}

/// Launch velocity inferred at release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseVelocity {
    pub v: NVec2,
    pub capped: bool, // true if the raw estimate exceeded `max_speed`
}

impl ReleaseVelocity {
    pub const ZERO: ReleaseVelocity = ReleaseVelocity {
        v: NVec2::new(0.0, 0.0),
        capped: false,
    };
}

/// Estimate release velocity from a drag history.
///
/// - fewer than 2 samples: zero
/// - `current` is the newest sample; `previous` is found by scanning backward from the
///   second-to-last sample for the first one at least `release_span_ms` older than
///   `current`, falling back to the oldest sample
/// - a non-positive time span gives zero
pub fn release_velocity(samples: &[DragSample], params: &DragParams) -> ReleaseVelocity {
    let Some((current, earlier)) = samples.split_last() else {
        return ReleaseVelocity::ZERO;
    };
    if earlier.is_empty() {
        return ReleaseVelocity::ZERO;
    }

    let previous = earlier
        .iter()
        .rev()
        .find(|s| current.time_ms - s.time_ms >= params.release_span_ms)
        .unwrap_or(&earlier[0]);

    let dt = (current.time_ms - previous.time_ms) / 1000.0;
    if !(dt > 0.0) {
        return ReleaseVelocity::ZERO;
    }

    let v = (current.pos - previous.pos) / dt * params.velocity_scale;
    let speed = v.norm();
    if speed > params.max_speed {
        ReleaseVelocity {
            v: v * (params.max_speed / speed),
            capped: true,
        }
    } else {
        ReleaseVelocity { v, capped: false }
    }
}

/// Result of releasing a dragged body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub index: usize,
    pub velocity: ReleaseVelocity,
}

/// Pointer state machine. Owns the drag history; the body list stays in `System`
#[derive(Debug, Clone, Default)]
pub struct DragController {
    active: Option<usize>,
    history: DragHistory,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the body being dragged
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn history(&self) -> &DragHistory {
        &self.history
    }

    /// Grab the front-most body under the pointer.
    ///
    /// Bodies are tested in reverse order so later (drawn on top) bodies win.
    /// The grabbed body stops and the history is seeded with its current position.
    /// A press that misses every body leaves the state unchanged
    pub fn pointer_down(&mut self, sys: &mut System, p: NVec2, now_ms: f64) -> Option<usize> {
        let hit = sys.bodies.iter().rposition(|b| b.contains(&p))?;

        // a second press without a release drops the previous grab without launching it
        if let Some(prev) = self.active.take() {
            if let Some(b) = sys.bodies.get_mut(prev) {
                b.dragging = false;
            }
        }

        let body = &mut sys.bodies[hit];
        body.dragging = true;
        body.v = NVec2::zeros();
        self.history.start(DragSample {
            pos: body.x,
            time_ms: now_ms,
        });
        self.active = Some(hit);

        debug!(body = hit, label = %body.label, x = body.x.x, y = body.x.y, "drag started");
        Some(hit)
    }

    /// Move the dragged body to the pointer, clamped into the world.
    /// No-op when nothing is being dragged
    pub fn pointer_move(&mut self, sys: &mut System, p: NVec2, now_ms: f64, params: &DragParams) {
        let Some(idx) = self.active else {
            return;
        };
        let world = sys.world;
        let Some(body) = sys.bodies.get_mut(idx) else {
            self.active = None;
            self.history.clear();
            return;
        };

        body.x = world.clamp_center(&p, body.radius);
        self.history.push(
            DragSample {
                pos: body.x,
                time_ms: now_ms,
            },
            params.window_ms,
        );
    }

    /// Release the dragged body and launch it with the inferred velocity.
    /// Returns `None` when nothing was being dragged
    pub fn pointer_up(&mut self, sys: &mut System, params: &DragParams) -> Option<Release> {
        let idx = self.active.take()?;
        let velocity = release_velocity(self.history.samples(), params);
        self.history.clear();

        let body = sys.bodies.get_mut(idx)?;
        body.dragging = false;
        body.v = velocity.v;

        debug!(
            body = idx,
            vx = velocity.v.x,
            vy = velocity.v.y,
            capped = velocity.capped,
            "drag released"
        );
        Some(Release { index: idx, velocity })
    }

    /// Drop any active drag without imparting velocity
    pub fn cancel(&mut self, sys: &mut System) {
        if let Some(idx) = self.active.take() {
            if let Some(b) = sys.bodies.get_mut(idx) {
                b.dragging = false;
                b.v = NVec2::zeros();
            }
        }
        self.history.clear();
    }
}
