use anyhow::bail;
use prefjudge_core::formats::sft::convert_tree;

use super::super::args::SftFormatArgs;
use crate::exit_codes::SUCCESS;

pub async fn run(args: SftFormatArgs) -> anyhow::Result<i32> {
    if !args.root.is_dir() {
        bail!("dataset root {} is not a directory", args.root.display());
    }
    let tree = convert_tree(&args.root).await?;
    for (output, stats) in &tree.converted {
        eprintln!(
            "wrote {} ({} record(s), {} skipped)",
            output.display(),
            stats.written,
            stats.skipped
        );
    }
    eprintln!(
        "sft-format: {} split(s) converted, {} not found",
        tree.converted.len(),
        tree.missing.len()
    );
    Ok(SUCCESS)
}
