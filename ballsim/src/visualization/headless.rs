//! Windowless host: steps the scenario at a fixed rate for a set number of
//! frames, logs the final state and exits

use bevy::prelude::*;
use bevy::log::LogPlugin;
use bevy::app::AppExit;

use crate::simulation::scenario::Scenario;

/// Fixed frame delta used instead of wall-clock time
pub const HEADLESS_DT: f64 = 1.0 / 60.0;

#[derive(Resource)]
struct FrameBudget {
    remaining: u32,
}

pub fn run_headless(scenario: Scenario, frames: u32) {
    println!("run_headless: {} frames with {} bodies", frames, scenario.engine.bodies().len());

    App::new()
        .insert_resource(scenario)
        .insert_resource(FrameBudget { remaining: frames })
        .add_plugins((MinimalPlugins, LogPlugin::default()))
        .add_systems(Update, headless_step_system)
        .run();
}

fn headless_step_system(mut scenario: ResMut<Scenario>, mut budget: ResMut<FrameBudget>, mut exit: EventWriter<AppExit>) {
    if budget.remaining == 0 {
        if scenario.engine.is_running() {
            for (i, b) in scenario.engine.bodies().iter().enumerate() {
                info!(
                    "body {i} ({}): x = ({:.2}, {:.2}) v = ({:.2}, {:.2}) r = {:.1}",
                    b.label, b.x.x, b.x.y, b.v.x, b.v.y, b.radius
                );
            }
            scenario.engine.teardown();
            exit.send(AppExit::Success);
        }
        return;
    }

    budget.remaining -= 1;
    scenario.engine.step(HEADLESS_DT);
}
