pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Body, System, World, NVec2};
pub use simulation::params::{Parameters, DragParams, RadiusScaling};
pub use simulation::forces::{Acceleration, AccelSet, DirectionalGravity};
pub use simulation::integrator::{semi_implicit_euler, clamp_dt};
pub use simulation::collision::{check_collision, resolve_collision, resolve_pairs, reflect_off_walls, CollisionOutcome};
pub use simulation::drag::{DragController, DragHistory, DragSample, Release, ReleaseVelocity, release_velocity};
pub use simulation::engine::{Engine, FrameClock, StepReport};
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, WorldConfig, ParametersConfig, BodyConfig, ConfigError, ConfigResult};

pub use visualization::{viewer2d::run_2d, headless::run_headless};

pub use benchmark::benchmark::bench_pairwise;
