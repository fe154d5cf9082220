//! Train command - Train the Q-learning agent in the grid world

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use crate::{
    analysis::{TrialSummary, penalty_score},
    app::App,
    cli::{
        config::RunArgs,
        output::{print_kv, print_section, print_subsection, print_trial_summary},
    },
    export::{TrialLogCsv, ValueTableCsv, ValueTableKind},
    pipeline::{CsvReportObserver, ExperimentPipeline, JsonlObserver, ProgressObserver},
    q_learning::TrainingMetadata,
    sim::GridWorld,
};

#[derive(Parser, Debug)]
#[command(about = "Train the Q-learning agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Directory for Q, N and trial-stats CSV reports
    #[arg(long, short = 'd', default_value = "reports")]
    pub report_dir: PathBuf,

    /// Label used in report file names (defaults to a{alpha}_g{gamma}_e{epsilon})
    #[arg(long)]
    pub label: Option<String>,

    /// Output file for the trained agent (MessagePack)
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional file for per-tick JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing the run result as JSON
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.run.resolve()?;
    let app = App::new();
    let mut agent = app.create_agent(config.agent.clone())?;
    let mut world = GridWorld::new(config.world)?;
    if let Some(seed) = RunArgs::world_seed(&config) {
        world = world.with_seed(seed);
    }

    let label = args.label.clone().unwrap_or_else(|| {
        format!(
            "a{}_g{}_e{}",
            config.agent.alpha, config.agent.gamma, config.agent.epsilon
        )
    });

    print_section("Training Q-learning agent");
    print_kv("Trials", &config.experiment.num_trials.to_string());
    print_kv(
        "Hyper-parameters",
        &format!(
            "alpha={} gamma={} epsilon={}",
            config.agent.alpha, config.agent.gamma, config.agent.epsilon
        ),
    );
    print_kv("Tie break", &config.agent.tie_break.to_string());
    print_kv("Encoding", &config.agent.encoding.to_string());
    print_kv(
        "Seed",
        &config
            .experiment
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string()),
    );

    let reports = CsvReportObserver::new(&args.report_dir, label.clone())
        .with_context(|| format!("failed to prepare {}", args.report_dir.display()))?;
    let q_path = reports.table_path(ValueTableKind::Q);
    let n_path = reports.table_path(ValueTableKind::N);
    let stats_path = reports.trial_stats_path();

    let mut pipeline = ExperimentPipeline::new(config.experiment.clone());
    if !args.quiet {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    pipeline = pipeline.with_observer(Box::new(reports));
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run(&mut agent, &mut world)?;

    // Always leave the final tables behind, even off the export cadence
    let exported_last = config
        .experiment
        .export_every
        .is_some_and(|every| result.total_trials > 0 && result.total_trials % every == 0);
    if !exported_last {
        ValueTableCsv::save(agent.store(), ValueTableKind::Q, &q_path)?;
        ValueTableCsv::save(agent.store(), ValueTableKind::N, &n_path)?;
        TrialLogCsv::save(&result.trials, &stats_path)?;
        info!("wrote final reports to {}", args.report_dir.display());
    }

    print_subsection("Results");
    print_trial_summary(&TrialSummary::from_records(&result.trials));
    print_kv("Penalty score", &format!("{:.1}", penalty_score(&result.trials)));
    print_kv("States learned", &agent.store().state_count().to_string());

    print_subsection("Reports");
    print_kv("Q-table", &q_path.display().to_string());
    print_kv("N-table", &n_path.display().to_string());
    print_kv("Trial stats", &stats_path.display().to_string());

    if let Some(path) = &args.output {
        let metadata = TrainingMetadata {
            trials_trained: Some(result.total_trials),
            successes: Some(result.successes),
            seed: config.experiment.seed,
        };
        app.save_agent(&agent, metadata, path)
            .with_context(|| format!("failed to save agent to {}", path.display()))?;
        print_kv("Saved agent", &path.display().to_string());
    }

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        print_kv("Summary", &path.display().to_string());
    }

    Ok(())
}
