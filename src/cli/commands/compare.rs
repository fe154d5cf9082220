//! Compare command - Run the baselines and the learning agent on the same worlds

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::{App, DriverKind},
    cli::{config::RunArgs, output::print_section},
    pipeline::{ComparisonFramework, ComparisonResult, Driver},
};

#[derive(Parser, Debug)]
#[command(about = "Compare drivers", allow_negative_numbers = true)]
pub struct CompareArgs {
    /// Drivers to compare (random, naive, informed, q-learning); all when omitted
    pub drivers: Vec<DriverKind>,

    #[command(flatten)]
    pub run: RunArgs,

    /// Export comparison results to CSV
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn execute(args: CompareArgs) -> Result<()> {
    let mut config = args.run.resolve()?;
    config.experiment.export_every = None;

    let kinds = if args.drivers.is_empty() {
        DriverKind::ALL.to_vec()
    } else {
        args.drivers.clone()
    };

    let app = App::new();
    let drivers = kinds
        .iter()
        .map(|&kind| app.create_driver(kind, &config.agent))
        .collect::<crate::Result<Vec<Box<dyn Driver>>>>()?;

    println!("Comparing {} drivers:", drivers.len());
    for (i, driver) in drivers.iter().enumerate() {
        println!("  {}: {}", i + 1, driver.name());
    }
    println!("\nTrials per driver: {}", config.experiment.num_trials);

    let world_seed = RunArgs::world_seed(&config).unwrap_or_else(rand::random);
    let mut framework = ComparisonFramework::new(drivers, config.world)
        .with_experiment(config.experiment.clone())
        .with_world_seed(world_seed);
    let result = framework.compare()?;

    print_section("Comparison Results");
    println!(
        "{:<12} {:>8} {:>10} {:>12} {:>12}",
        "Driver", "Arrived", "Rate", "Mean reward", "Penalties"
    );
    for outcome in &result.outcomes {
        println!(
            "{:<12} {:>8} {:>9.1}% {:>12.2} {:>12.1}",
            outcome.name,
            outcome.successes,
            outcome.success_rate * 100.0,
            outcome.mean_reward,
            outcome.total_penalty
        );
    }
    if let Some(best) = result.best() {
        println!("\nBest: {}", best.name);
    }

    if let Some(output_path) = &args.output {
        export_csv(&result, output_path)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        println!("\nResults exported to: {}", output_path.display());
    }

    Ok(())
}

fn export_csv(result: &ComparisonResult, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for outcome in &result.outcomes {
        writer.serialize(outcome)?;
    }
    writer.flush()?;
    Ok(())
}
