use std::time::Instant;
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, System, World, NVec2};

/// Time `Engine::step` as the body count grows. The pair pass is O(N^2),
/// so this is where that shows up
pub fn bench_pairwise() {
    let ns = [2, 8, 32, 128, 512];
    let steps = 200; // steps timed per body count
    let dt = 1.0 / 60.0;

    for n in ns {
        let params = Parameters::default();

        // square grid, cells a little wider than a mass-1 ball
        let side = (n as f64).sqrt().ceil() as usize;
        let cell = 2.0 * params.radius.radius_for(1.0) + 2.0;
        let world = World::new(side as f64 * cell, side as f64 * cell);

        let bodies: Vec<Body> = (0..n)
            .map(|i| {
                let i_f = i as f64;
                let x = NVec2::new(
                    ((i % side) as f64 + 0.5) * cell,
                    ((i / side) as f64 + 0.5) * cell,
                );
                let mut b = Body::at_rest(format!("b{i}"), x, 1.0, 0.0);
                // deterministic velocities, no rand needed
                b.v = NVec2::new((i_f * 0.37).sin() * 200.0, (i_f * 0.13).cos() * 200.0);
                b
            })
            .collect();

        let mut engine = Engine::new(System::new(bodies, world), params);

        // Warm up
        engine.step(dt);

        let t0 = Instant::now();
        let mut contacts = 0;
        for _ in 0..steps {
            contacts += engine.step(dt).contacts;
        }
        let per_step = t0.elapsed().as_secs_f64() / steps as f64;

        println!("N = {n:4}, step = {:10.3} us, contacts = {contacts}", per_step * 1.0e6);
    }
}
