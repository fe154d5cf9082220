//! Output formatting and progress bars for CLI

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::{SeriesStats, TrialSummary};

/// Create a progress bar counting `unit`s
pub fn create_progress(total: u64, unit: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "[{{elapsed_precise}}] {{bar:40.cyan/blue}} {{pos}}/{{len}} {unit} ({{msg}})"
            ))?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, String)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

fn series(stats: &SeriesStats) -> String {
    format!(
        "mean {:>8.2}  std {:>7.2}  min {:>8.2}  max {:>8.2}",
        stats.mean, stats.std_dev, stats.min, stats.max
    )
}

/// Print a trial summary block
pub fn print_trial_summary(summary: &TrialSummary) {
    print_stats_table(&[
        ("Trials", summary.trials.to_string()),
        (
            "Reached destination",
            format!(
                "{} ({:.1}%)",
                summary.successes,
                summary.success_rate * 100.0
            ),
        ),
        ("Penalized trials", summary.penalized_trials.to_string()),
        ("Total reward", series(&summary.total_reward)),
        ("Negative reward", series(&summary.negative_reward)),
        ("Trial length", series(&summary.trial_length)),
    ]);
}
