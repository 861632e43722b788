//! Console output for batch commands. Everything here goes to stderr;
//! stdout is reserved for machine-readable results.

use std::path::Path;
use std::sync::Arc;

use prefjudge_core::{BatchReport, LineStats, ProgressEvent, ProgressSink};

pub(crate) fn progress_sink() -> ProgressSink {
    Arc::new(|ev: ProgressEvent| {
        let status = if ev.ok { "ok" } else { "FAILED" };
        eprintln!("[{}/{}] {} {}", ev.done, ev.total, status, ev.path.display());
    })
}

pub(crate) fn print_summary<T>(command: &str, report: &BatchReport<T>, totals: &LineStats) {
    eprintln!(
        "{}: {} file(s) ok, {} failed; {} line(s) judged, {} skipped ({} judge failures, {} malformed)",
        command,
        report.results.len(),
        report.failures.len(),
        totals.judged,
        totals.skipped(),
        totals.judge_failures,
        totals.malformed,
    );
    for failure in &report.failures {
        eprintln!("  failed: {}: {}", failure.path.display(), failure.error);
    }
}

/// One line per successful file with its line counts.
pub(crate) fn print_file_stats<'a>(
    files: impl IntoIterator<Item = (&'a Path, &'a LineStats)>,
) {
    for (path, stats) in files {
        eprintln!("{}", file_line(path, stats));
    }
}

fn file_line(path: &Path, stats: &LineStats) -> String {
    format!(
        "  {}: {} line(s), {} judged, {} judge failures, {} malformed",
        path.display(),
        stats.lines,
        stats.judged,
        stats.judge_failures,
        stats.malformed
    )
}

/// Sum of per-file line counts.
pub(crate) fn total_stats<'a>(stats: impl IntoIterator<Item = &'a LineStats>) -> LineStats {
    let mut totals = LineStats::default();
    for s in stats {
        totals.merge(s);
    }
    totals
}
