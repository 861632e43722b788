use anyhow::Context;
use prefjudge_core::{process_win_rate_file, BatchRunner, WinRateAggregator};

use super::super::args::WinRateArgs;
use super::judge_builder::{build_judge, resolve_config};
use super::reporting;
use crate::exit_codes::SUCCESS;

pub async fn run(args: WinRateArgs) -> anyhow::Result<i32> {
    let cfg = resolve_config(&args.batch, None)?;
    let aggregator = WinRateAggregator::new(build_judge(&cfg)?);

    let report = BatchRunner::new(cfg.batch.clone())
        .with_progress(reporting::progress_sink())
        .run(&args.dir, move |path| {
            let aggregator = aggregator.clone();
            async move { process_win_rate_file(&aggregator, &path).await }
        })
        .await
        .with_context(|| format!("failed to scan {}", args.dir.display()))?;

    // One JSON object per file on stdout, in path order.
    for outcome in report.results.values() {
        println!("{}", serde_json::to_string(&outcome.report)?);
    }

    let totals = reporting::total_stats(report.results.values().map(|o| &o.stats));
    reporting::print_file_stats(
        report
            .results
            .iter()
            .map(|(path, o)| (path.as_path(), &o.stats)),
    );
    reporting::print_summary("win-rate", &report, &totals);
    Ok(SUCCESS)
}
