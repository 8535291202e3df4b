use ballsim::simulation::collision::{apply_boundaries, check_collision, reflect_off_walls, resolve_collision, resolve_pairs, CollisionOutcome};
use ballsim::simulation::engine::{Engine, FrameClock};
use ballsim::simulation::forces::{AccelSet, DirectionalGravity};
use ballsim::simulation::integrator::{clamp_dt, semi_implicit_euler};
use ballsim::simulation::params::{Parameters, RadiusScaling};
use ballsim::simulation::scenario::Scenario;
use ballsim::simulation::states::{Body, System, World, NVec2};
use ballsim::ScenarioConfig;

const EPS: f64 = 1e-9;

/// Build a 2-body System separated along x around the world's center, radii from mass
pub fn two_body_system(dist: f64, m1: f64, m2: f64) -> System {
    let world = World::new(600.0, 400.0);
    let scaling = RadiusScaling::default();
    let cx = world.width / 2.0;
    let cy = world.height / 2.0;
    let b1 = Body::at_rest("a", NVec2::new(cx - dist / 2.0, cy), m1, scaling.radius_for(m1));
    let b2 = Body::at_rest("b", NVec2::new(cx + dist / 2.0, cy), m2, scaling.radius_for(m2));
    System::new(vec![b1, b2], world)
}

/// Default parameters with gravity switched off
pub fn test_params() -> Parameters {
    Parameters {
        gravity: 0.0,
        ..Parameters::default()
    }
}

fn single_body_engine(x: NVec2, v: NVec2, params: Parameters) -> Engine {
    let mut b = Body::at_rest("solo", x, 1.0, 0.0);
    b.v = v;
    Engine::new(System::new(vec![b], World::new(600.0, 400.0)), params)
}

fn distance(sys: &System) -> f64 {
    (sys.bodies[1].x - sys.bodies[0].x).norm()
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn semi_implicit_euler_uses_updated_velocity() {
    let mut sys = two_body_system(200.0, 1.0, 1.0);
    let params = Parameters::default(); // g = 10 at 270 degrees
    let forces = AccelSet::new().with(DirectionalGravity);
    let y0 = sys.bodies[0].x.y;

    semi_implicit_euler(&mut sys, &forces, &params, 0.01);

    let b = &sys.bodies[0];
    assert!(b.v.x.abs() < EPS, "vx = {}", b.v.x);
    assert!((b.v.y + 0.1).abs() < EPS, "vy = {}", b.v.y);
    // displacement uses the new velocity: -0.1 * 0.01
    assert!((b.x.y - (y0 - 0.001)).abs() < EPS, "y = {}", b.x.y);
    assert!((sys.t - 0.01).abs() < EPS);
}

#[test]
fn gravity_direction_is_in_degrees() {
    let params = Parameters {
        gravity: 2.0,
        gravity_direction: 0.0,
        ..Parameters::default()
    };
    let g = DirectionalGravity::vector(&params);
    assert!((g.x - 2.0).abs() < EPS && g.y.abs() < EPS);

    let params = Parameters { gravity_direction: 90.0, ..params };
    let g = DirectionalGravity::vector(&params);
    assert!(g.x.abs() < EPS && (g.y - 2.0).abs() < EPS);
}

#[test]
fn non_positive_dt_is_a_noop() {
    let mut engine = single_body_engine(NVec2::new(300.0, 200.0), NVec2::new(50.0, 0.0), Parameters::default());
    let before = engine.bodies()[0].clone();

    for dt in [0.0, -0.5, f64::NAN] {
        let report = engine.step(dt);
        assert_eq!(report.dt, 0.0);
    }

    let after = &engine.bodies()[0];
    assert_eq!(after.x, before.x);
    assert_eq!(after.v, before.v);
    assert_eq!(engine.system().t, 0.0);
}

#[test]
fn dt_is_clamped_to_max() {
    assert_eq!(clamp_dt(1.0, 1.0 / 30.0), Some(1.0 / 30.0));
    assert_eq!(clamp_dt(0.01, 1.0 / 30.0), Some(0.01));
    assert_eq!(clamp_dt(0.0, 1.0 / 30.0), None);

    let mut engine = single_body_engine(NVec2::new(300.0, 200.0), NVec2::new(30.0, 0.0), test_params());
    let report = engine.step(5.0);
    assert!((report.dt - 1.0 / 30.0).abs() < EPS);
    assert!((engine.bodies()[0].x.x - 301.0).abs() < EPS);
}

#[test]
fn dragged_body_ignores_gravity() {
    let mut engine = single_body_engine(NVec2::new(300.0, 200.0), NVec2::zeros(), Parameters::default());
    engine.pointer_down(NVec2::new(300.0, 200.0), 0.0);

    for _ in 0..30 {
        engine.step(1.0 / 60.0);
    }

    let b = &engine.bodies()[0];
    assert!(b.dragging);
    assert_eq!(b.x, NVec2::new(300.0, 200.0));
    assert_eq!(b.v, NVec2::zeros());
}

// ==================================================================================
// Boundary tests
// ==================================================================================

#[test]
fn wall_bounce_scales_normal_speed_by_restitution() {
    // radius 20, crosses the right wall within one 1/60 s step
    let mut engine = single_body_engine(NVec2::new(578.0, 200.0), NVec2::new(300.0, 10.0), test_params());
    let report = engine.step(1.0 / 60.0);

    let b = &engine.bodies()[0];
    assert_eq!(report.wall_hits, 1);
    assert!((b.x.x - 580.0).abs() < EPS, "x = {}", b.x.x);
    assert!((b.v.x + 0.8 * 300.0).abs() < EPS, "vx = {}", b.v.x);
    // the other axis is untouched
    assert!((b.v.y - 10.0).abs() < EPS);
}

#[test]
fn floor_bounce_reflects_y() {
    let world = World::new(600.0, 400.0);
    let mut b = Body::at_rest("b", NVec2::new(100.0, 5.0), 1.0, 20.0);
    b.v = NVec2::new(0.0, -50.0);

    assert!(reflect_off_walls(&mut b, &world, 0.5));
    assert_eq!(b.x.y, 20.0);
    assert!((b.v.y - 25.0).abs() < EPS);
}

#[test]
fn dragged_body_is_not_reflected() {
    let mut sys = two_body_system(200.0, 1.0, 1.0);
    sys.bodies[0].x = NVec2::new(-10.0, 200.0);
    sys.bodies[0].dragging = true;

    assert_eq!(apply_boundaries(&mut sys, 0.8), 0);
    assert_eq!(sys.bodies[0].x.x, -10.0);
}

#[test]
fn bodies_stay_inside_the_world() {
    let cfg = ScenarioConfig::default();
    let mut scenario = Scenario::build_scenario(cfg);
    let engine = &mut scenario.engine;

    {
        let sys = engine.system_mut();
        sys.bodies[0].v = NVec2::new(700.0, -450.0);
        sys.bodies[1].v = NVec2::new(-650.0, 800.0);
    }

    for i in 0..2000 {
        let i_f = i as f64;
        if i % 100 == 0 {
            engine.set_gravity(25.0 + 25.0 * (i_f * 0.1).sin());
            engine.set_gravity_direction(i_f * 37.0);
        }
        // mix of normal, slow and stalled frames
        let dt = match i % 7 {
            0 => 0.5,
            1 => 0.0,
            _ => 1.0 / 60.0,
        };
        engine.step(dt);

        let sys = engine.system();
        for b in &sys.bodies {
            assert!(
                sys.world.contains_disc(&b.x, b.radius),
                "step {i}: body at {:?} with r = {} left the world",
                b.x,
                b.radius
            );
        }
    }
}

// ==================================================================================
// Collision tests
// ==================================================================================

#[test]
fn overlap_detection_is_strict() {
    let sys = two_body_system(39.0, 1.0, 0.8); // radii 20 and 19
    assert!(!check_collision(&sys.bodies[0], &sys.bodies[1]));
    let sys = two_body_system(38.9, 1.0, 0.8);
    assert!(check_collision(&sys.bodies[0], &sys.bodies[1]));
}

#[test]
fn resolution_separates_overlapping_bodies() {
    let mut sys = two_body_system(12.0, 2.0, 0.5);
    sys.bodies[0].v = NVec2::new(40.0, 5.0);
    sys.bodies[1].v = NVec2::new(-30.0, 0.0);
    let target = sys.bodies[0].radius + sys.bodies[1].radius;

    let (a, b) = sys.bodies.split_at_mut(1);
    let outcome = resolve_collision(&mut a[0], &mut b[0], 0.8);

    assert!(matches!(outcome, CollisionOutcome::Impulse(_)));
    assert!(distance(&sys) >= target - 1e-9, "distance {} < {}", distance(&sys), target);
}

#[test]
fn lighter_body_is_displaced_more() {
    let world = World::new(600.0, 400.0);
    let r = 20.0;
    let overlap = 8.0;
    let mut a = Body::at_rest("light", NVec2::new(300.0, 200.0), 1.0, r);
    let mut b = Body::at_rest("heavy", NVec2::new(300.0 + 2.0 * r - overlap, 200.0), 3.0, r);
    // identical approach
    a.v = NVec2::new(10.0, 0.0);
    b.v = NVec2::new(-10.0, 0.0);
    let (a0, b0) = (a.x, b.x);

    resolve_collision(&mut a, &mut b, 0.8);

    let da = (a.x - a0).norm();
    let db = (b.x - b0).norm();
    assert!((da - overlap * 0.75).abs() < EPS, "light moved {da}");
    assert!((db - overlap * 0.25).abs() < EPS, "heavy moved {db}");
    assert!(a.x.x < a0.x && b.x.x > b0.x, "bodies must move apart");
    assert!(world.contains_disc(&a.x, r));
}

#[test]
fn separating_bodies_keep_their_velocities() {
    let mut sys = two_body_system(30.0, 1.0, 1.0);
    sys.bodies[0].v = NVec2::new(-5.0, 3.0);
    sys.bodies[1].v = NVec2::new(5.0, -1.0);
    let (va, vb) = (sys.bodies[0].v, sys.bodies[1].v);

    let (a, b) = sys.bodies.split_at_mut(1);
    let outcome = resolve_collision(&mut a[0], &mut b[0], 0.8);

    assert_eq!(outcome, CollisionOutcome::Separating);
    assert_eq!(sys.bodies[0].v, va);
    assert_eq!(sys.bodies[1].v, vb);
    assert!(distance(&sys) >= 40.0 - EPS);
}

#[test]
fn coincident_centers_are_skipped() {
    let mut sys = two_body_system(0.0, 1.0, 1.0);
    sys.bodies[0].v = NVec2::new(1.0, 0.0);
    let before: Vec<Body> = sys.bodies.clone();

    let (a, b) = sys.bodies.split_at_mut(1);
    assert_eq!(resolve_collision(&mut a[0], &mut b[0], 0.8), CollisionOutcome::Coincident);
    assert_eq!(resolve_pairs(&mut sys.bodies, 0.8), 0);

    for (b, b0) in sys.bodies.iter().zip(before.iter()) {
        assert_eq!(b.x, b0.x);
        assert_eq!(b.v, b0.v);
    }
}

#[test]
fn collision_conserves_momentum_and_loses_energy() {
    let mut sys = two_body_system(35.0, 0.5, 4.0);
    sys.bodies[0].v = NVec2::new(300.0, 20.0);
    sys.bodies[1].v = NVec2::new(-10.0, 0.0);

    let p0 = sys.bodies[0].v * sys.bodies[0].m + sys.bodies[1].v * sys.bodies[1].m;
    let e0 = sys.kinetic_energy();

    assert_eq!(resolve_pairs(&mut sys.bodies, 0.8), 1);

    let p1 = sys.bodies[0].v * sys.bodies[0].m + sys.bodies[1].v * sys.bodies[1].m;
    assert!((p1 - p0).norm() < 1e-9, "momentum changed: {:?} -> {:?}", p0, p1);
    assert!(sys.kinetic_energy() <= e0 + 1e-9);
    // tangential (y) components untouched
    assert!((sys.bodies[0].v.y - 20.0).abs() < EPS);
    assert!(sys.bodies[1].v.y.abs() < EPS);
}

#[test]
fn forced_overlap_at_rest_separates_to_contact() {
    // masses 1 and 0.8 give radii 20 and 19, centers 10 apart
    let sys = two_body_system(10.0, 1.0, 0.8);
    let mut engine = Engine::new(sys, test_params());

    let report = engine.step(1.0 / 60.0);

    assert_eq!(report.contacts, 1);
    let sys = engine.system();
    assert!((distance(sys) - 39.0).abs() < 1e-9, "distance = {}", distance(sys));
    for b in &sys.bodies {
        assert_eq!(b.v, NVec2::zeros());
    }
}

#[test]
fn dragged_body_is_pushed_but_keeps_zero_velocity() {
    let sys = two_body_system(30.0, 1.0, 1.0);
    let mut engine = Engine::new(sys, test_params());
    let grab = engine.bodies()[0].x;
    engine.pointer_down(grab, 0.0);
    engine.system_mut().bodies[1].v = NVec2::new(-100.0, 0.0);

    engine.step(1.0 / 60.0);

    let sys = engine.system();
    assert!(sys.bodies[0].x.x < grab.x, "dragged body should still be separated");
    assert_eq!(sys.bodies[0].v, NVec2::zeros());
    // impulse -100 scaled by restitution: -100 + 0.8 * 100
    assert!((sys.bodies[1].v.x + 20.0).abs() < 1e-9, "vx = {}", sys.bodies[1].v.x);
}

// ==================================================================================
// Drag tests
// ==================================================================================

#[test]
fn release_after_fast_drag_is_capped() {
    let mut engine = single_body_engine(NVec2::new(100.0, 100.0), NVec2::zeros(), test_params());

    assert_eq!(engine.pointer_down(NVec2::new(105.0, 100.0), 0.0), Some(0));
    engine.pointer_move(NVec2::new(200.0, 100.0), 100.0);

    let release = engine.pointer_up().expect("body was being dragged");
    assert!(release.velocity.capped);
    let b = &engine.bodies()[0];
    assert!(!b.dragging);
    assert!((b.v.x - 800.0).abs() < EPS, "vx = {}", b.v.x);
    assert!(b.v.y.abs() < EPS);
    assert!(engine.drag().history().is_empty());
}

#[test]
fn release_without_movement_gives_zero_velocity() {
    let mut engine = single_body_engine(NVec2::new(100.0, 100.0), NVec2::new(50.0, 50.0), test_params());

    engine.pointer_down(NVec2::new(100.0, 100.0), 0.0);
    let release = engine.pointer_up().expect("body was being dragged");

    assert_eq!(release.velocity.v, NVec2::zeros());
    assert_eq!(engine.bodies()[0].v, NVec2::zeros());
}

#[test]
fn pointer_events_without_drag_are_noops() {
    let mut engine = single_body_engine(NVec2::new(100.0, 100.0), NVec2::new(5.0, 0.0), test_params());

    assert_eq!(engine.pointer_down(NVec2::new(500.0, 300.0), 0.0), None);
    engine.pointer_move(NVec2::new(10.0, 10.0), 10.0);
    assert!(engine.pointer_up().is_none());

    let b = &engine.bodies()[0];
    assert_eq!(b.x, NVec2::new(100.0, 100.0));
    assert_eq!(b.v, NVec2::new(5.0, 0.0));
}

#[test]
fn front_most_body_wins_the_grab() {
    let sys = two_body_system(10.0, 1.0, 1.0);
    let mut engine = Engine::with_forces(sys, test_params(), AccelSet::new());
    let mid = (engine.bodies()[0].x + engine.bodies()[1].x) / 2.0;

    assert_eq!(engine.pointer_down(mid, 0.0), Some(1));
    assert!(engine.bodies()[1].dragging);
    assert!(!engine.bodies()[0].dragging);
}

#[test]
fn drag_is_clamped_into_the_world() {
    let mut engine = single_body_engine(NVec2::new(100.0, 100.0), NVec2::zeros(), test_params());
    engine.pointer_down(NVec2::new(100.0, 100.0), 0.0);
    engine.pointer_move(NVec2::new(-50.0, 1000.0), 16.0);

    let b = &engine.bodies()[0];
    assert_eq!(b.x, NVec2::new(20.0, 380.0));
    let last = engine.drag().history().samples().last().copied().expect("sample recorded");
    assert_eq!(last.pos, b.x);
}

#[test]
fn long_pause_before_flick_keeps_flick_speed() {
    let params = Parameters {
        drag: ballsim::DragParams {
            max_speed: 1.0e9,
            ..Default::default()
        },
        ..test_params()
    };
    let mut engine = single_body_engine(NVec2::new(100.0, 200.0), NVec2::zeros(), params);

    engine.pointer_down(NVec2::new(100.0, 200.0), 0.0);
    // hold still for two seconds, then flick 60 units in 60 ms
    engine.pointer_move(NVec2::new(100.0, 200.0), 2000.0);
    engine.pointer_move(NVec2::new(130.0, 200.0), 2030.0);
    engine.pointer_move(NVec2::new(160.0, 200.0), 2060.0);
    engine.pointer_up();

    // (160 - 100) / 0.06 * 3
    let vx = engine.bodies()[0].v.x;
    assert!((vx - 3000.0).abs() < 1e-6, "vx = {vx}");
}

// ==================================================================================
// Configuration and lifecycle tests
// ==================================================================================

#[test]
fn mass_change_recomputes_radius() {
    let mut engine = Scenario::default().engine;
    assert!((engine.bodies()[0].radius - 20.0).abs() < EPS);

    assert!(engine.set_mass(0, 3.0));
    assert!((engine.bodies()[0].radius - 30.0).abs() < EPS);

    // the minimum radius wins for tiny masses
    engine.set_mass(1, 0.0);
    assert!((engine.bodies()[1].radius - 15.0).abs() < EPS);

    assert!(!engine.set_mass(7, 1.0));
}

#[test]
fn gravity_direction_wraps() {
    let mut engine = Scenario::default().engine;
    engine.set_gravity_direction(-30.0);
    assert!((engine.gravity().1 - 330.0).abs() < EPS);
    engine.set_gravity_direction(720.0);
    assert!(engine.gravity().1.abs() < EPS);
    engine.set_gravity(12.5);
    assert_eq!(engine.gravity().0, 12.5);
}

#[test]
fn frame_clock_derives_dt_from_timestamps() {
    let mut clock = FrameClock::Idle;
    assert_eq!(clock.tick(1000.0), None);
    assert_eq!(clock.tick(1016.0), Some(0.016));

    let mut engine = single_body_engine(NVec2::new(300.0, 200.0), NVec2::new(60.0, 0.0), test_params());
    assert!(engine.frame(0.0).is_none());
    // a backgrounded tab: 5 s later, only one capped step is taken
    let report = engine.frame(5000.0).expect("second frame steps");
    assert!((report.dt - 1.0 / 30.0).abs() < EPS);
    assert!((engine.bodies()[0].x.x - 302.0).abs() < EPS);
}

#[test]
fn teardown_stops_frames_and_cancels_drag() {
    let mut engine = single_body_engine(NVec2::new(300.0, 200.0), NVec2::zeros(), Parameters::default());
    engine.frame(0.0);
    engine.pointer_down(NVec2::new(300.0, 200.0), 0.0);
    engine.pointer_move(NVec2::new(400.0, 200.0), 50.0);

    engine.teardown();

    assert!(!engine.is_running());
    assert!(engine.frame(16.0).is_none());
    assert!(engine.frame(32.0).is_none());
    let b = &engine.bodies()[0];
    assert!(!b.dragging);
    assert_eq!(b.v, NVec2::zeros());
    assert!(engine.pointer_up().is_none());
}

#[test]
fn independent_engines_do_not_share_state() {
    let mut a = Scenario::default().engine;
    let b = Scenario::default().engine;

    a.set_gravity(40.0);
    for _ in 0..10 {
        a.step(1.0 / 60.0);
    }

    assert_eq!(b.gravity().0, 10.0);
    assert_eq!(b.system().t, 0.0);
    assert!(a.system().t > 0.0);
}

#[test]
fn scenario_file_round_trip_through_engine() {
    let yaml = "
world: { width: 800.0, height: 300.0 }
parameters: { gravity: 0.0 }
bodies:
  - { label: red, x: [150.0, 150.0], v: [300.0, 0.0], m: 0.5 }
  - { label: green, x: [550.0, 150.0], m: 4.0 }
";
    let cfg = ScenarioConfig::from_yaml_str(yaml).expect("valid scenario");
    let mut engine = Scenario::build_scenario(cfg).engine;
    assert!((engine.bodies()[1].radius - 35.0).abs() < EPS);

    let mut contacts = 0;
    for _ in 0..120 {
        contacts += engine.step(1.0 / 60.0).contacts;
    }
    assert!(contacts >= 1, "the light ball should reach the heavy one");
    assert!(engine.bodies()[0].v.x < 300.0);
    assert!(engine.bodies()[1].v.x > 0.0);
}
