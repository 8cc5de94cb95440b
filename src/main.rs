use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use antworld::{
    engine::{EngineBuilder, EngineSettings},
    scenario::{Scenario, ScenarioLoader},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless ant-world environment runner")]
struct Cli {
    /// Path to a scenario YAML file (built-in defaults when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print world stats as a JSON line every N ticks; 0 disables
    #[arg(long, default_value_t = 0)]
    report_every: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut scenario = match &cli.scenario {
        Some(path) => ScenarioLoader::new(".").load(path)?,
        None => Scenario::default(),
    };
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    init_tracing(&scenario.logging.level);

    let mut world = scenario.build_world()?;
    let ticks = scenario.ticks(cli.ticks);
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
    };
    let mut engine = EngineBuilder::new(settings).build();

    let report_every = cli.report_every;
    let mut report_error = None;
    engine.run_with_hook(&mut world, ticks, |stats| {
        if report_every > 0 && stats.tick % report_every == 0 && report_error.is_none() {
            match serde_json::to_string(stats) {
                Ok(line) => println!("{line}"),
                Err(err) => report_error = Some(err),
            }
        }
    })?;
    if let Some(err) = report_error {
        return Err(err.into());
    }

    let stats = world.stats();
    println!(
        "Scenario '{}' completed for {} ticks. Food left: {}, sources replaced: {}",
        scenario.name, ticks, stats.remaining_food, stats.replacements
    );
    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
