//! Decomposition of judge-prompt records into [`JudgmentRequest`]s.
//!
//! The prompt text is sliced around the fixed scaffolding that
//! [`crate::prompts::judge_prompt`] emits. Slicing is lenient in the same way
//! the records were produced: the *last* occurrence of each opening marker
//! wins, so original texts that happen to contain "2. " list items still
//! decompose correctly.

use serde::Deserialize;

use crate::error::{PipelineError, PipelineResult};
use crate::model::JudgmentRequest;
use crate::prompts::{
    CANDIDATES_HEADER, FIRST_CANDIDATE_MARKER, ORIGINAL_TEXT_MARKER, SECOND_CANDIDATE_MARKER,
};

/// A required delimiter was not found in the prompt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("prompt is missing delimiter {delimiter:?}")]
pub struct MissingDelimiter {
    pub delimiter: &'static str,
}

/// Raw input line: `{"id": ..., "prompt": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptRecord {
    pub id: serde_json::Value,
    pub prompt: String,
}

impl PromptRecord {
    /// String ids pass through; numeric ids are rendered.
    pub fn id_string(&self) -> Option<String> {
        match &self.id {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

fn after_last<'a>(haystack: &'a str, marker: &'static str) -> Result<&'a str, MissingDelimiter> {
    haystack
        .rfind(marker)
        .map(|idx| &haystack[idx + marker.len()..])
        .ok_or(MissingDelimiter { delimiter: marker })
}

fn first_line(s: &str) -> &str {
    s.split('\n').next().unwrap_or("")
}

/// Slice `prompt` into original text and the two candidates.
pub fn decompose_prompt(
    id: impl Into<String>,
    prompt: &str,
) -> Result<JudgmentRequest, MissingDelimiter> {
    let tail = after_last(prompt, ORIGINAL_TEXT_MARKER)?;
    let original_text = tail
        .find(CANDIDATES_HEADER)
        .map(|end| &tail[..end])
        .ok_or(MissingDelimiter {
            delimiter: CANDIDATES_HEADER,
        })?;

    let candidate_a = first_line(after_last(prompt, FIRST_CANDIDATE_MARKER)?);
    let candidate_b = first_line(after_last(prompt, SECOND_CANDIDATE_MARKER)?);

    Ok(JudgmentRequest {
        id: id.into(),
        original_text: original_text.trim().to_string(),
        candidate_a: candidate_a.trim().to_string(),
        candidate_b: candidate_b.trim().to_string(),
    })
}

/// Parse one JSONL line (`line_no` is 1-based, for diagnostics).
pub fn parse_prompt_line(line_no: usize, line: &str) -> PipelineResult<JudgmentRequest> {
    let record: PromptRecord = serde_json::from_str(line.trim())
        .map_err(|e| PipelineError::malformed_line(line_no, e.to_string()))?;
    let id = record
        .id_string()
        .ok_or_else(|| PipelineError::malformed_line(line_no, "`id` must be a string or number"))?;
    decompose_prompt(id, &record.prompt)
        .map_err(|e| PipelineError::malformed_line(line_no, e.to_string()))
}
