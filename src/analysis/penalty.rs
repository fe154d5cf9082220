//! Penalty score used to rank hyper-parameter settings

use crate::pipeline::TrialRecord;

/// How late in the run the agent was still making mistakes.
///
/// Sum of the mean index of the last two trials with any negative reward and
/// the mean index of the last two failed trials. A group with no members
/// contributes 0. Lower is better.
pub fn penalty_score(records: &[TrialRecord]) -> f64 {
    let penalized = last_two_mean(
        records
            .iter()
            .filter(|r| r.negative_reward < 0.0)
            .map(|r| r.trial),
    );
    let failed = last_two_mean(
        records
            .iter()
            .filter(|r| !r.reached_destination)
            .map(|r| r.trial),
    );
    penalized + failed
}

fn last_two_mean(indices: impl DoubleEndedIterator<Item = usize>) -> f64 {
    let last: Vec<usize> = indices.rev().take(2).collect();
    if last.is_empty() {
        0.0
    } else {
        last.iter().sum::<usize>() as f64 / last.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(trial: usize, negative: f64, reached: bool) -> TrialRecord {
        TrialRecord {
            trial,
            total_reward: 0.0,
            negative_reward: negative,
            trial_length: 1,
            reached_destination: reached,
        }
    }

    #[test]
    fn test_score_uses_last_two_of_each_group() {
        let records = vec![
            record(0, -1.0, false),
            record(1, -1.0, true),
            record(2, 0.0, false),
            record(3, -0.5, true),
            record(4, 0.0, false),
            record(5, 0.0, true),
        ];
        // penalized: 1, 3 -> 2.0; failed: 2, 4 -> 3.0
        assert_eq!(penalty_score(&records), 5.0);
    }

    #[test]
    fn test_single_member_group() {
        let records = vec![record(0, 0.0, true), record(7, -1.0, false)];
        assert_eq!(penalty_score(&records), 14.0);
    }

    #[test]
    fn test_clean_run_scores_zero() {
        let records: Vec<_> = (0..5).map(|i| record(i, 0.0, true)).collect();
        assert_eq!(penalty_score(&records), 0.0);
        assert_eq!(penalty_score(&[]), 0.0);
    }
}
