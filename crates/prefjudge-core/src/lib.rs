//! LLM-judge preference labelling for summarization datasets.
//!
//! This crate turns pairs of candidate summaries into chosen/rejected
//! preference data by asking an external judge model to score them, and
//! measures how often one candidate beats the other. It provides:
//!
//! - [`JudgeClient`] with an OpenAI-compatible HTTP implementation and a fake
//! - Lenient score parsing and a bounded-retry [`RetryingJudge`]
//! - [`PreferenceBuilder`] and [`WinRateAggregator`]
//! - A concurrent per-file [`BatchRunner`] with per-file failure isolation
//! - XL-Sum to SFT conversion and judge prompt generation ([`formats`])
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use prefjudge_core::{
//!     build_client, process_preference_file, BatchRunner, PipelineConfig, PreferenceBuilder,
//!     RetryingJudge,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = PipelineConfig::load(None)?;
//! config.validate()?;
//!
//! let judge = RetryingJudge::new(build_client(&config.judge)?, config.retry.clone());
//! let builder = PreferenceBuilder::new(judge, config.tie_break);
//!
//! let report = BatchRunner::new(config.batch.clone())
//!     .run(Path::new("./prompts"), move |path| {
//!         let builder = builder.clone();
//!         async move { process_preference_file(&builder, &path).await }
//!     })
//!     .await?;
//! println!("{} ok, {} failed", report.results.len(), report.failures.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `PREFJUDGE_JUDGE_URL` | Judge base URL (default: `https://api.openai.com/v1`) |
//! | `PREFJUDGE_JUDGE_MODEL` | Judge model name (required for the HTTP judge) |
//! | `PREFJUDGE_API_KEY` | Bearer token; `OPENAI_API_KEY` is used when unset |
//! | `PREFJUDGE_JUDGE_TIMEOUT` | Per-request timeout in seconds (default: none) |

pub mod batch;
pub mod config;
pub mod error;
pub mod formats;
pub mod judge;
pub mod model;
pub mod pipeline;
pub mod preference;
pub mod prompts;
pub mod providers;
pub mod request;
pub mod win_rate;

pub use batch::progress::{ProgressEvent, ProgressSink};
pub use batch::{BatchReport, BatchRunner, FileFailure};
pub use config::{BatchConfig, JudgeConfig, JudgeProvider, PipelineConfig, RetryPolicy};
pub use error::{PipelineError, PipelineResult};
pub use formats::ConversionStats;
pub use judge::{JudgeOutcome, RetryingJudge};
pub use model::{
    JudgmentRequest, JudgmentResult, LineStats, PreferenceRecord, Role, Transcript, Turn,
    WinRateReport,
};
pub use pipeline::{
    process_preference_file, process_win_rate_file, PreferenceFileOutcome, WinRateFileOutcome,
};
pub use preference::{PreferenceBuilder, TieBreak};
pub use providers::{build_client, JudgeClient};
pub use win_rate::WinRateAggregator;
