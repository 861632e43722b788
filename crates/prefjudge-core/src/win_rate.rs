use tracing::{debug, info, warn};

use crate::judge::RetryingJudge;
use crate::model::{JudgmentRequest, WinRateReport};
use crate::prompts::judge_prompt_for;

/// Counts how often the first-listed candidate outscores the second.
#[derive(Clone)]
pub struct WinRateAggregator {
    judge: RetryingJudge,
}

impl WinRateAggregator {
    pub fn new(judge: RetryingJudge) -> Self {
        Self { judge }
    }

    /// Judge `requests` in order. Requests without a usable judgment are
    /// skipped and do not count towards either total.
    pub async fn evaluate<I>(&self, filename: &str, requests: I) -> WinRateReport
    where
        I: IntoIterator<Item = JudgmentRequest>,
    {
        let mut wins = 0u64;
        let mut valid = 0u64;

        for request in requests {
            let prompt = judge_prompt_for(&request);
            match self.judge.judge_with_retry(&prompt).await {
                Some(result) => {
                    valid += 1;
                    if result.first_wins() {
                        wins += 1;
                    }
                    debug!(
                        id = %request.id,
                        score_a = result.score_a,
                        score_b = result.score_b,
                        "judged"
                    );
                }
                None => warn!(file = filename, id = %request.id, "no judgment, skipping"),
            }
        }

        let report = WinRateReport::from_counts(filename, wins, valid);
        match report.win_rate {
            Some(rate) => info!(
                file = filename,
                wins,
                valid_judgments = valid,
                "win rate {:.2}",
                rate
            ),
            None => warn!(file = filename, "no valid judgments"),
        }
        report
    }
}
