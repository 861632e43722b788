//! Line-by-line JSONL dataset conversions around the judging pipeline.

pub mod judge_prompts;
pub mod sft;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{PipelineError, PipelineResult};

/// Lines converted and lines dropped by one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub written: u64,
    pub skipped: u64,
}

/// Read `input`, map every parseable line through `convert`, write `output`.
/// Lines that fail to deserialize as `I` are logged and skipped.
pub(crate) async fn convert_lines<I, O, F>(
    input: &Path,
    output: &Path,
    convert: F,
) -> PipelineResult<ConversionStats>
where
    I: DeserializeOwned,
    O: Serialize,
    F: Fn(I) -> O,
{
    let content = tokio::fs::read_to_string(input)
        .await
        .map_err(|e| PipelineError::io(input, e))?;

    let mut stats = ConversionStats::default();
    let mut out = String::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: I = match serde_json::from_str(line.trim()) {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    file = %input.display(),
                    line = idx + 1,
                    error = %e,
                    "skipping unreadable record"
                );
                stats.skipped += 1;
                continue;
            }
        };
        let rendered =
            serde_json::to_string(&convert(record)).map_err(|e| PipelineError::FileLevelFailure {
                path: output.to_path_buf(),
                message: format!("failed to serialize record: {e}"),
            })?;
        out.push_str(&rendered);
        out.push('\n');
        stats.written += 1;
    }

    tokio::fs::write(output, out)
        .await
        .map_err(|e| PipelineError::io(output, e))?;
    Ok(stats)
}
