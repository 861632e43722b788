use std::path::{Path, PathBuf};

use tracing::info;

use super::{display_name, read_requests, result_path, write_jsonl};
use crate::error::PipelineResult;
use crate::model::{LineStats, WinRateReport};
use crate::win_rate::WinRateAggregator;

#[derive(Debug, Clone)]
pub struct WinRateFileOutcome {
    pub report: WinRateReport,
    /// `None` when the win rate is undefined.
    pub output: Option<PathBuf>,
    pub stats: LineStats,
}

/// Evaluate the win rate over `path` and write `<stem>_result.jsonl`.
pub async fn process_win_rate_file(
    aggregator: &WinRateAggregator,
    path: &Path,
) -> PipelineResult<WinRateFileOutcome> {
    let (requests, mut stats) = read_requests(path).await?;
    let attempted = requests.len() as u64;
    let report = aggregator.evaluate(&display_name(path), requests).await;

    stats.judged = report.valid_judgments;
    stats.judge_failures = attempted - report.valid_judgments;
    info!(
        file = %report.filename,
        lines = stats.lines,
        judged = stats.judged,
        judge_failures = stats.judge_failures,
        malformed = stats.malformed,
        "file evaluated"
    );

    let output = match report.win_rate {
        Some(_) => {
            let out = result_path(path);
            write_jsonl(&out, std::slice::from_ref(&report)).await?;
            info!(file = %report.filename, output = %out.display(), "wrote win rate");
            Some(out)
        }
        None => None,
    };

    Ok(WinRateFileOutcome {
        report,
        output,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::judge::RetryingJudge;
    use crate::prompts::judge_prompt;
    use crate::providers::fake::FakeJudgeClient;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;

    fn aggregator(client: FakeJudgeClient) -> WinRateAggregator {
        WinRateAggregator::new(RetryingJudge::new(
            Arc::new(client),
            RetryPolicy::new(1, Duration::ZERO),
        ))
    }

    fn write_lines(path: &Path, n: usize) {
        let body: Vec<String> = (0..n)
            .map(|i| {
                serde_json::json!({"id": i, "prompt": judge_prompt("text", "ref", "gen")})
                    .to_string()
            })
            .collect();
        std::fs::write(path, body.join("\n")).unwrap();
    }

    #[tokio::test]
    async fn writes_single_result_object() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("ja.jsonl");
        write_lines(&input, 4);

        let client = FakeJudgeClient::new()
            .with_queue(["[[8]] [[2]]", "garbage", "[[3]] [[6]]"])
            .with_response("[[7]] [[1]]");
        let outcome = process_win_rate_file(&aggregator(client), &input)
            .await
            .unwrap();

        assert_eq!(outcome.report.valid_judgments, 3);
        assert_eq!(outcome.report.wins, 2);
        assert_eq!(outcome.stats.judge_failures, 1);

        let out = outcome.output.unwrap();
        assert_eq!(out, tmp.path().join("ja_result.jsonl"));
        let text = std::fs::read_to_string(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        let v: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(v["filename"], "ja.jsonl");
        assert_eq!(v["wins"], 2);
        assert_eq!(v["valid_judgments"], 3);
        assert!((v["win_rate"].as_f64().unwrap() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn undefined_rate_writes_nothing() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("ko.jsonl");
        write_lines(&input, 2);

        let client = FakeJudgeClient::new().with_response("no scores");
        let outcome = process_win_rate_file(&aggregator(client), &input)
            .await
            .unwrap();

        assert_eq!(outcome.report.win_rate, None);
        assert!(outcome.output.is_none());
        assert!(!tmp.path().join("ko_result.jsonl").exists());
    }
}
