use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{display_name, processed_path, read_requests, write_jsonl};
use crate::error::PipelineResult;
use crate::model::LineStats;
use crate::preference::PreferenceBuilder;

#[derive(Debug, Clone)]
pub struct PreferenceFileOutcome {
    pub input: PathBuf,
    /// `None` when no record survived and nothing was written.
    pub output: Option<PathBuf>,
    pub records: usize,
    pub stats: LineStats,
}

/// Build preference records for every line of `path`, in input order, and
/// write them to `<stem>_processed.jsonl`.
pub async fn process_preference_file(
    builder: &PreferenceBuilder,
    path: &Path,
) -> PipelineResult<PreferenceFileOutcome> {
    let (requests, mut stats) = read_requests(path).await?;
    let file = display_name(path);

    let mut records = Vec::with_capacity(requests.len());
    for request in &requests {
        match builder.build(request).await {
            Some(record) => {
                stats.judged += 1;
                records.push(record);
            }
            None => {
                warn!(file = %file, id = %request.id, "no judgment, dropping record");
                stats.judge_failures += 1;
            }
        }
    }

    info!(
        file = %file,
        lines = stats.lines,
        judged = stats.judged,
        judge_failures = stats.judge_failures,
        malformed = stats.malformed,
        "file judged"
    );

    let output = if records.is_empty() {
        warn!(file = %file, lines = stats.lines, "no preference records produced, nothing written");
        None
    } else {
        let out = processed_path(path);
        write_jsonl(&out, &records).await?;
        info!(
            file = %file,
            output = %out.display(),
            records = records.len(),
            "wrote preference records"
        );
        Some(out)
    };

    Ok(PreferenceFileOutcome {
        input: path.to_path_buf(),
        output,
        records: records.len(),
        stats,
    })
}
