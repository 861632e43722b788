use clap::{Parser, Subcommand, ValueEnum};
use prefjudge_core::TieBreak;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "prefjudge",
    version,
    about = "LLM-judged preference data and win rates for summarization datasets"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build chosen/rejected preference pairs from judge prompt files
    Prefs(PrefsArgs),
    /// Win rate of the first-listed candidate, per file
    WinRate(WinRateArgs),
    /// Convert XL-Sum splits into SFT chat records
    SftFormat(SftFormatArgs),
    /// Render judge prompt records from generated summaries
    JudgePrompts(JudgePromptsArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct JudgeArgs {
    /// Judge backend
    /// - openai: OpenAI-compatible chat completions endpoint
    /// - fake: deterministic fake judge (tests/dev)
    #[arg(long, env = "PREFJUDGE_JUDGE")]
    pub judge: Option<String>,

    /// Base URL of the judge endpoint (`/chat/completions` is appended)
    #[arg(long)]
    pub judge_url: Option<String>,

    /// Judge model identifier
    /// Example: gpt-4o-mini
    #[arg(long)]
    pub judge_model: Option<String>,

    /// Falls back to OPENAI_API_KEY when unset
    #[arg(long, env = "PREFJUDGE_API_KEY", hide_env_values = true)]
    pub judge_api_key: Option<String>,

    /// Per-request timeout in seconds (default: none)
    #[arg(long)]
    pub judge_timeout_secs: Option<u64>,

    /// Fixed reply for --judge fake
    #[arg(long)]
    pub fake_response: Option<String>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct BatchArgs {
    /// YAML config file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Judge attempts per record, first call included
    /// Default: 3
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Sleep between judge attempts, in milliseconds
    /// Default: 1000
    #[arg(long)]
    pub backoff_ms: Option<u64>,

    /// Files processed at once
    /// Default: 4
    #[arg(long)]
    pub concurrency: Option<usize>,

    #[command(flatten)]
    pub judge: JudgeArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreakArg {
    First,
    Second,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::First => TieBreak::PreferFirst,
            TieBreakArg::Second => TieBreak::PreferSecond,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct PrefsArgs {
    /// Directory of `{id, prompt}` JSONL files
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Candidate chosen when both scores are equal (default: second)
    #[arg(long, value_enum)]
    pub tie_break: Option<TieBreakArg>,

    #[command(flatten)]
    pub batch: BatchArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct WinRateArgs {
    /// Directory of `{id, prompt}` JSONL files
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub batch: BatchArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SftFormatArgs {
    /// Dataset root containing `<language>/<split>.jsonl`
    #[arg(long)]
    pub root: PathBuf,
}

#[derive(clap::Args, Debug, Clone)]
pub struct JudgePromptsArgs {
    /// JSONL of `{id, text, summary, response}`
    #[arg(long)]
    pub input: PathBuf,

    /// Output JSONL of `{id, prompt}` (overwritten)
    #[arg(long)]
    pub output: PathBuf,
}
