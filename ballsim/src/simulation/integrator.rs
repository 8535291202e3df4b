//! Frame-step time integrator for the ball system
//!
//! Semi-implicit (symplectic) Euler driven by `AccelSet` and `Parameters`:
//! velocity is kicked first, then the *new* velocity drifts the position

use super::states::{System, NVec2};
use super::forces::AccelSet;
use super::params::Parameters;

/// Clamp a raw frame delta to `[0, max_dt]`.
/// Returns `None` for non-positive or non-finite deltas, which callers treat as a no-op
pub fn clamp_dt(dt: f64, max_dt: f64) -> Option<f64> {
    if !dt.is_finite() || dt <= 0.0 {
        return None;
    }
    Some(dt.min(max_dt))
}

/// Advance the system by one step of `dt` using semi-implicit Euler.
/// Dragged bodies are skipped entirely, their position belongs to the drag handler.
/// `dt` is expected to be clamped already; `dt <= 0` does nothing
pub fn semi_implicit_euler(sys: &mut System, forces: &AccelSet, params: &Parameters, dt: f64) {
    let n = sys.bodies.len();
    if n == 0 || !(dt > 0.0) { // nothing to move
        return;
    }

    // acc[i] holds the acceleration of body i at the current state
    let mut acc = vec![NVec2::zeros(); n];
    forces.accumulate_accels(&*sys, params, &mut acc);

    for (b, a) in sys.bodies.iter_mut().zip(acc.iter()) {
        if b.dragging {
            continue;
        }
        // Kick: v_n+1 = v_n + dt a_n
        b.v += dt * *a;
        // Drift with the updated velocity: x_n+1 = x_n + dt v_n+1
        b.x += dt * b.v;
    }

    sys.t += dt;
}
