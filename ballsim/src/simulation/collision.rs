//! Wall reflection and disc–disc collision response.
//!
//! Per step, after integration:
//!
//! 1. every non-dragged body is reflected off the world rectangle, one axis at a time,
//! 2. every unordered pair `(i, j)` with `i < j` is checked once and, when the discs
//!    overlap, pushed apart along the contact normal and exchanged an impulse,
//! 3. positions are clamped back into the world (corrections from 2. can cross a wall).
//!
//! The pair pass is a single sweep, not iterated to convergence. With two bodies that is
//! exact; a crowded scene can leave residual overlap until the next step.

use crate::simulation::states::{Body, System, World, NVec2};

/// Which branch `resolve_collision` took
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionOutcome {
    /// Centers coincide, the normal is undefined. Nothing was changed
    Coincident,
    /// Positions were corrected, bodies were already moving apart so velocities are untouched
    Separating,
    /// Positions were corrected and the scalar impulse `2 dvn / (m1 + m2)` was applied
    Impulse(f64),
}

/// Reflect one body off the walls. Returns true if any wall was hit.
///
/// On each axis: clamp the center back to `radius` from the wall and
/// replace the velocity component with `-v * restitution`
pub fn reflect_off_walls(body: &mut Body, world: &World, restitution: f64) -> bool {
    let r = body.radius;
    let mut hit = false;

    if body.x.x - r < 0.0 {
        body.x.x = r;
        body.v.x = -body.v.x * restitution;
        hit = true;
    } else if body.x.x + r > world.width {
        body.x.x = world.width - r;
        body.v.x = -body.v.x * restitution;
        hit = true;
    }

    if body.x.y - r < 0.0 {
        body.x.y = r;
        body.v.y = -body.v.y * restitution;
        hit = true;
    } else if body.x.y + r > world.height {
        body.x.y = world.height - r;
        body.v.y = -body.v.y * restitution;
        hit = true;
    }

    hit
}

/// Apply wall reflection to every non-dragged body, returns the number of bodies that bounced
pub fn apply_boundaries(sys: &mut System, restitution: f64) -> usize {
    let world = sys.world;
    sys.bodies
        .iter_mut()
        .filter(|b| !b.dragging)
        .map(|b| reflect_off_walls(b, &world, restitution))
        .filter(|hit| *hit)
        .count()
}

/// Center distance strictly less than the sum of radii
pub fn check_collision(a: &Body, b: &Body) -> bool {
    (b.x - a.x).norm() < a.radius + b.radius
}

/// Separate two overlapping discs and exchange momentum along the contact normal.
///
/// Positional correction splits the overlap by the *other* body's share of the total
/// mass, so the lighter disc moves further. A dragged body still takes its share of
/// the correction but never receives a velocity change. Tangential velocity is untouched
pub fn resolve_collision(a: &mut Body, b: &mut Body, restitution: f64) -> CollisionOutcome {
    let d = b.x - a.x;
    let dist = d.norm();
    if dist == 0.0 {
        return CollisionOutcome::Coincident;
    }

    // Unit normal from a to b
    let n: NVec2 = d / dist;

    let overlap = a.radius + b.radius - dist;
    let total_mass = a.m + b.m;
    let sep_a = overlap * (b.m / total_mass);
    let sep_b = overlap * (a.m / total_mass);

    a.x -= n * sep_a;
    b.x += n * sep_b;

    // Relative normal velocity, positive means moving apart
    let dvn = (b.v - a.v).dot(&n);
    if dvn > 0.0 {
        return CollisionOutcome::Separating;
    }

    let impulse = 2.0 * dvn / total_mass;
    if !a.dragging {
        a.v += n * (impulse * b.m * restitution);
    }
    if !b.dragging {
        b.v -= n * (impulse * a.m * restitution);
    }

    CollisionOutcome::Impulse(impulse)
}

/// Check every unordered pair once and resolve the overlapping ones.
/// Returns the number of resolved contacts (coincident pairs are not counted)
pub fn resolve_pairs(bodies: &mut [Body], restitution: f64) -> usize {
    let n = bodies.len();
    let mut contacts = 0;

    for i in 0..n {
        // split so body i and body j can be borrowed mutably at the same time
        let (left, right) = bodies.split_at_mut(i + 1);
        let bi = &mut left[i];
        for bj in right.iter_mut() {
            if !check_collision(bi, bj) {
                continue;
            }
            if resolve_collision(bi, bj, restitution) != CollisionOutcome::Coincident {
                contacts += 1;
            }
        }
    }

    contacts
}

/// Position-only clamp of every body into the world, velocities are left alone
pub fn contain(sys: &mut System) {
    let world = sys.world;
    for b in sys.bodies.iter_mut() {
        b.x = world.clamp_center(&b.x, b.radius);
    }
}
