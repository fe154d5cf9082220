//! Summarize command - Print statistics of a trial-stats CSV file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    analysis::{TrialSummary, penalty_score},
    cli::output::{print_kv, print_section, print_subsection, print_trial_summary},
    export::TrialLogCsv,
};

#[derive(Parser, Debug)]
#[command(about = "Summarize a trial-stats CSV file")]
pub struct SummarizeArgs {
    /// Trial-stats CSV written by `train`
    pub file: PathBuf,

    /// Also summarize only the last N trials
    #[arg(long)]
    pub last: Option<usize>,
}

pub fn execute(args: SummarizeArgs) -> Result<()> {
    let records = TrialLogCsv::load(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    print_section(&format!("Trial statistics: {}", args.file.display()));
    print_trial_summary(&TrialSummary::from_records(&records));
    print_kv("Penalty score", &format!("{:.1}", penalty_score(&records)));

    if let Some(n) = args.last {
        print_subsection(&format!("Last {n} trials"));
        print_trial_summary(&TrialSummary::tail(&records, n));
    }

    Ok(())
}
