use super::args::*;

pub(crate) mod judge_builder;
pub mod judge_prompts;
pub mod prefs;
pub(crate) mod reporting;
pub mod sft_format;
pub mod win_rate;

use crate::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Prefs(args) => prefs::run(args).await,
        Command::WinRate(args) => win_rate::run(args).await,
        Command::SftFormat(args) => sft_format::run(args).await,
        Command::JudgePrompts(args) => judge_prompts::run(args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
