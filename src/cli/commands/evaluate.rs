//! Evaluate command - Run a trained agent without learning or exploring

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::warn;

use crate::{
    analysis::{TrialSummary, penalty_score},
    app::App,
    cli::{
        config::RunArgs,
        output::{print_kv, print_section, print_subsection, print_trial_summary},
    },
    pipeline::{ExperimentPipeline, ProgressObserver},
    sim::GridWorld,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent", allow_negative_numbers = true)]
pub struct EvaluateArgs {
    /// Path to trained agent file
    pub agent: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,

    /// Export the evaluation result as JSON
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let overrides = args.run.agent_overrides();
    if !overrides.is_empty() {
        return Err(anyhow!(
            "{} cannot be applied to a saved agent; its hyper-parameters come from {}",
            overrides.join(", "),
            args.agent.display()
        ));
    }
    let mut config = args.run.resolve()?;
    config.experiment.export_every = None;

    println!("Loading trained agent from: {}", args.agent.display());
    let app = App::new();
    let (agent, metadata) = app
        .load_agent(&args.agent)
        .with_context(|| format!("failed to load agent from {}", args.agent.display()))?;

    print_section("Loaded Agent Info");
    print_kv(
        "Hyper-parameters",
        &format!(
            "alpha={} gamma={} epsilon={}",
            agent.alpha(),
            agent.gamma(),
            agent.epsilon()
        ),
    );
    print_kv("Encoding", &agent.encoding().to_string());
    print_kv("States learned", &agent.store().state_count().to_string());
    if agent.store().state_count() == 0 {
        warn!("agent has an empty Q-table; every decision is a tie");
    }
    if let Some(trials) = metadata.trials_trained {
        print_kv("Trials trained", &trials.to_string());
    }
    if let Some(successes) = metadata.successes {
        print_kv("Training successes", &successes.to_string());
    }

    let mut agent = agent.frozen();
    let mut world = GridWorld::new(config.world)?;
    if let Some(seed) = RunArgs::world_seed(&config) {
        world = world.with_seed(seed);
    }

    let mut pipeline = ExperimentPipeline::new(config.experiment.clone());
    if !args.quiet {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    let result = pipeline.run(&mut agent, &mut world)?;

    print_subsection("Evaluation Results");
    print_trial_summary(&TrialSummary::from_records(&result.trials));
    print_kv("Penalty score", &format!("{:.1}", penalty_score(&result.trials)));

    if let Some(path) = &args.export {
        result
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nResults exported to: {}", path.display());
    }

    Ok(())
}
