//! Grid-search command - Rank hyper-parameter settings by penalty score

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    analysis::{DEFAULT_SEARCH_VALUES, GridSearch},
    cli::{
        config::RunArgs,
        output::{create_progress, print_kv, print_section},
    },
};

#[derive(Parser, Debug)]
#[command(about = "Search alpha, gamma and epsilon by penalty score")]
pub struct GridSearchArgs {
    /// Comma-separated values tried for each parameter
    #[arg(long, value_delimiter = ',')]
    pub values: Vec<f64>,

    #[command(flatten)]
    pub run: RunArgs,

    /// Export every grid point to CSV
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn execute(args: GridSearchArgs) -> Result<()> {
    let mut config = args.run.resolve()?;
    config.experiment.export_every = None;

    let values = if args.values.is_empty() {
        DEFAULT_SEARCH_VALUES.to_vec()
    } else {
        args.values.clone()
    };
    if let Some(bad) = values.iter().find(|v| !(**v > 0.0 && **v <= 1.0)) {
        return Err(anyhow!("search value {bad} is outside (0, 1]"));
    }

    let search = GridSearch::new()
        .with_values(values)
        .with_agent(config.agent.clone())
        .with_world(config.world)
        .with_experiment(config.experiment.clone())
        .with_world_seed(RunArgs::world_seed(&config).unwrap_or_else(rand::random));

    let pb = create_progress(search.size() as u64, "settings")?;
    let mut best_so_far = f64::INFINITY;
    let result = search.run(|point| {
        best_so_far = best_so_far.min(point.penalty);
        pb.inc(1);
        pb.set_message(format!("best penalty {best_so_far:.1}"));
    })?;
    pb.finish();

    print_section("Grid Search Results");
    match result.best() {
        Some(best) => {
            print_kv("alpha", &best.alpha.to_string());
            print_kv("gamma", &best.gamma.to_string());
            print_kv("epsilon", &best.epsilon.to_string());
            print_kv("Penalty score", &format!("{:.1}", best.penalty));
            print_kv(
                "Success rate",
                &format!("{:.1}%", best.success_rate * 100.0),
            );
        }
        None => println!("No settings searched"),
    }

    if let Some(path) = &args.output {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        for point in &result.points {
            writer.serialize(point)?;
        }
        writer.flush()?;
        println!("\nResults exported to: {}", path.display());
    }

    Ok(())
}
