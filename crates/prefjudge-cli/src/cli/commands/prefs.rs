use anyhow::Context;
use prefjudge_core::{process_preference_file, BatchRunner, PreferenceBuilder};

use super::super::args::PrefsArgs;
use super::judge_builder::{build_judge, resolve_config};
use super::reporting;
use crate::exit_codes::SUCCESS;

pub async fn run(args: PrefsArgs) -> anyhow::Result<i32> {
    let cfg = resolve_config(&args.batch, args.tie_break.map(Into::into))?;
    let builder = PreferenceBuilder::new(build_judge(&cfg)?, cfg.tie_break);

    let report = BatchRunner::new(cfg.batch.clone())
        .with_progress(reporting::progress_sink())
        .run(&args.dir, move |path| {
            let builder = builder.clone();
            async move { process_preference_file(&builder, &path).await }
        })
        .await
        .with_context(|| format!("failed to scan {}", args.dir.display()))?;

    let records: usize = report.results.values().map(|o| o.records).sum();
    let totals = reporting::total_stats(report.results.values().map(|o| &o.stats));
    reporting::print_file_stats(
        report
            .results
            .iter()
            .map(|(path, o)| (path.as_path(), &o.stats)),
    );
    reporting::print_summary("prefs", &report, &totals);
    eprintln!("prefs: {} preference record(s) written", records);
    Ok(SUCCESS)
}
