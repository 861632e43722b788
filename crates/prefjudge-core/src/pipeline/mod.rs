//! Per-file workers for the batch commands: read a JSONL file of judge
//! prompts, judge each line, write the per-file output next to the input.

pub mod preference_file;
pub mod win_rate_file;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::error::{PipelineError, PipelineResult};
use crate::model::{JudgmentRequest, LineStats};
use crate::request::parse_prompt_line;

pub use preference_file::{process_preference_file, PreferenceFileOutcome};
pub use win_rate_file::{process_win_rate_file, WinRateFileOutcome};

/// Output suffix of the preference pipeline.
pub const PROCESSED_SUFFIX: &str = "_processed.jsonl";
/// Output suffix of the win-rate pipeline.
pub const RESULT_SUFFIX: &str = "_result.jsonl";

/// `dir/name.jsonl` -> `dir/name_processed.jsonl`
pub fn processed_path(input: &Path) -> PathBuf {
    with_suffix(input, PROCESSED_SUFFIX)
}

/// `dir/name.jsonl` -> `dir/name_result.jsonl`
pub fn result_path(input: &Path) -> PathBuf {
    with_suffix(input, RESULT_SUFFIX)
}

fn with_suffix(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}"))
}

/// File name for logs and reports.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Decompose every non-empty line of `path`. Malformed lines are logged,
/// counted and skipped; only an unreadable file is an error.
pub(crate) async fn read_requests(
    path: &Path,
) -> PipelineResult<(Vec<JudgmentRequest>, LineStats)> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PipelineError::io(path, e))?;

    let mut stats = LineStats::default();
    let mut requests = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        stats.lines += 1;
        match parse_prompt_line(idx + 1, line) {
            Ok(request) => requests.push(request),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping malformed line");
                stats.malformed += 1;
            }
        }
    }
    Ok((requests, stats))
}

/// One JSON document per line, UTF-8, non-ASCII kept verbatim.
pub(crate) async fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> PipelineResult<()> {
    let mut out = String::new();
    for record in records {
        let line = serde_json::to_string(record).map_err(|e| PipelineError::FileLevelFailure {
            path: path.to_path_buf(),
            message: format!("failed to serialize record: {e}"),
        })?;
        out.push_str(&line);
        out.push('\n');
    }
    tokio::fs::write(path, out)
        .await
        .map_err(|e| PipelineError::io(path, e))
}
