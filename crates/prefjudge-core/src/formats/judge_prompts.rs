//! Judge prompt records from generated summaries.
//!
//! The reference summary is listed first and the generated response second,
//! so the first score belongs to the reference.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{convert_lines, ConversionStats};
use crate::error::PipelineResult;
use crate::prompts::judge_prompt;

/// An article with its reference summary and one generated response.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedSummary {
    pub id: serde_json::Value,
    pub text: String,
    pub summary: String,
    pub response: String,
}

/// Input line of the preference and win-rate pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgePromptRecord {
    pub id: serde_json::Value,
    pub prompt: String,
}

impl From<GeneratedSummary> for JudgePromptRecord {
    fn from(g: GeneratedSummary) -> Self {
        if g.summary.contains('\n') || g.response.contains('\n') {
            // Decomposition keeps only the first line of each candidate.
            warn!(id = %g.id, "multi-line candidate will be truncated when judged");
        }
        Self {
            prompt: judge_prompt(&g.text, &g.summary, &g.response),
            id: g.id,
        }
    }
}

pub async fn convert_file(input: &Path, output: &Path) -> PipelineResult<ConversionStats> {
    convert_lines(input, output, |g: GeneratedSummary| JudgePromptRecord::from(g)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::parse_prompt_line;
    use tempfile::tempdir;

    #[tokio::test]
    async fn prompts_decompose_back_into_requests() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("gen.jsonl");
        let output = tmp.path().join("prompts.jsonl");
        let lines = [
            serde_json::json!({
                "id": "en-1",
                "text": "Article\nwith lines.",
                "summary": "Ref.",
                "response": "Gen."
            }),
            serde_json::json!({"id": 7, "text": "기사", "summary": "요약", "response": "응답"}),
        ];
        let body: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        std::fs::write(&input, body.join("\n") + "\n{\"id\": 3}\n").unwrap();

        let stats = convert_file(&input, &output).await.unwrap();
        assert_eq!(stats, ConversionStats { written: 2, skipped: 1 });

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("기사"));
        let requests: Vec<_> = text
            .lines()
            .enumerate()
            .map(|(i, l)| parse_prompt_line(i + 1, l).unwrap())
            .collect();

        assert_eq!(requests[0].id, "en-1");
        assert_eq!(requests[0].original_text, "Article\nwith lines.");
        assert_eq!(requests[0].candidate_a, "Ref.");
        assert_eq!(requests[0].candidate_b, "Gen.");
        assert_eq!(requests[1].id, "7");
        assert_eq!(requests[1].candidate_b, "응답");
    }
}
