use anyhow::Context;
use prefjudge_core::formats::judge_prompts::convert_file;

use super::super::args::JudgePromptsArgs;
use crate::exit_codes::SUCCESS;

pub async fn run(args: JudgePromptsArgs) -> anyhow::Result<i32> {
    let stats = convert_file(&args.input, &args.output)
        .await
        .with_context(|| format!("failed to convert {}", args.input.display()))?;
    eprintln!(
        "judge-prompts: {} prompt(s) written to {}, {} line(s) skipped",
        stats.written,
        args.output.display(),
        stats.skipped
    );
    Ok(SUCCESS)
}
