use ballsim::{ScenarioConfig, Scenario};
use ballsim::{run_2d, run_headless};
use ballsim::bench_pairwise;

use clap::Parser;
use anyhow::{Context, Result};

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file, looked up under `scenarios/` unless absolute
    #[arg(short)]
    file_name: Option<String>,

    /// Step without a window and log the final state
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Time the stepping pipeline for growing body counts and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario(file_name: Option<&str>) -> Result<ScenarioConfig> {
    let Some(file_name) = file_name else {
        return Ok(ScenarioConfig::default());
    };

    let given = PathBuf::from(file_name);
    let config_path = if given.is_absolute() {
        given
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(given)
    };

    ScenarioConfig::load(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        bench_pairwise();
        return Ok(());
    }

    let scenario_cfg = load_scenario(args.file_name.as_deref())?;
    let scenario = Scenario::build_scenario(scenario_cfg);

    if args.headless {
        run_headless(scenario, args.frames);
    } else {
        run_2d(scenario);
    }

    Ok(())
}
