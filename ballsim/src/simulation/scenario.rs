//! Build a fully-initialized simulation scenario from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! `Scenario`, which owns the `Engine` (system state, parameters, force set,
//! pointer state). It is inserted into Bevy as a `Resource` and consumed by the
//! stepping, input and drawing systems

use bevy::prelude::Resource;

use crate::configuration::config::{BodyConfig, ScenarioConfig};
use crate::simulation::engine::Engine;
use crate::simulation::states::{Body, System, World, NVec2};

/// Bevy resource representing a fully-initialized scenario
///
/// `selected` is the body the viewer's mass controls act on
#[derive(Resource)]
pub struct Scenario {
    pub engine: Engine,
    pub selected: usize,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        let parameters = cfg.parameters.to_parameters();

        // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        let bodies: Vec<Body> = cfg.bodies.iter().map(|bc: &BodyConfig| Body {
            x: NVec2::new(bc.x[0], bc.x[1]),
            v: NVec2::new(bc.v[0], bc.v[1]),
            m: bc.m,
            radius: parameters.radius.radius_for(bc.m),
            label: bc.label.clone(),
            dragging: false,
        }).collect();

        let world = World::new(cfg.world.width, cfg.world.height);
        let system = System::new(bodies, world);

        Self {
            engine: Engine::new(system, parameters),
            selected: 0,
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::build_scenario(ScenarioConfig::default())
    }
}
