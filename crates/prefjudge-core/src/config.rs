//! Pipeline configuration.
//!
//! Values are resolved in three layers: built-in defaults (or a YAML file),
//! then environment variables, then whatever the caller sets explicitly
//! (the CLI applies its flags last).
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `PREFJUDGE_JUDGE_URL` | Base URL of the OpenAI-compatible judge endpoint |
//! | `PREFJUDGE_JUDGE_MODEL` | Judge model name |
//! | `PREFJUDGE_API_KEY` | Judge API key (falls back to `OPENAI_API_KEY`) |
//! | `PREFJUDGE_JUDGE_TIMEOUT` | Per-request timeout in seconds (unset: no timeout) |

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::preference::TieBreak;

/// Which judge client to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeProvider {
    /// OpenAI-compatible chat completions endpoint.
    #[default]
    OpenAi,
    /// Deterministic fake judge (tests/dev).
    Fake,
}

impl std::str::FromStr for JudgeProvider {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "fake" => Ok(Self::Fake),
            other => Err(PipelineError::config(format!(
                "unknown judge provider: {other} (expected openai|fake)"
            ))),
        }
    }
}

/// Judge endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JudgeConfig {
    #[serde(default)]
    pub provider: JudgeProvider,

    /// Base URL; `/chat/completions` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Per-request timeout. `None` leaves requests unbounded.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Canned reply for the fake provider.
    #[serde(default)]
    pub fake_response: Option<String>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            provider: JudgeProvider::default(),
            base_url: default_base_url(),
            api_key: None,
            model: None,
            temperature: None,
            max_tokens: None,
            timeout_secs: None,
            fake_response: None,
        }
    }
}

impl JudgeConfig {
    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Bounded retry policy for judge calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryPolicy {
    /// Total attempts per judgment, first call included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed sleep between attempts.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    1000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff_ms: backoff.as_millis().min(u128::from(u64::MAX)) as u64,
        }
    }

    /// Attempts actually made; zero is clamped to one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// File discovery and worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Maximum number of files processed at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Input file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// File name suffixes skipped during discovery (our own outputs).
    #[serde(default = "default_exclude_suffixes")]
    pub exclude_suffixes: Vec<String>,
}

fn default_concurrency() -> usize {
    4
}

fn default_extension() -> String {
    "jsonl".to_string()
}

fn default_exclude_suffixes() -> Vec<String> {
    vec![
        crate::pipeline::PROCESSED_SUFFIX.to_string(),
        crate::pipeline::RESULT_SUFFIX.to_string(),
    ]
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            extension: default_extension(),
            exclude_suffixes: default_exclude_suffixes(),
        }
    }
}

/// Everything a batch command needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default)]
    pub judge: JudgeConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl PipelineConfig {
    /// Load defaults or a YAML file, then overlay the process environment.
    pub fn load(path: Option<&Path>) -> PipelineResult<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_yaml_file(path: &Path) -> PipelineResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        Self::from_yaml_str(&raw)
            .map_err(|e| PipelineError::config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml_str(raw: &str) -> PipelineResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
            .map_err(|e| PipelineError::config(format!("failed to parse YAML: {}", e)))
    }

    /// Overlay environment variables using `lookup` (injectable for tests).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("PREFJUDGE_JUDGE_URL") {
            self.judge.base_url = url;
        }
        if let Some(model) = non_empty("PREFJUDGE_JUDGE_MODEL") {
            self.judge.model = Some(model);
        }
        if let Some(key) = non_empty("PREFJUDGE_API_KEY").or_else(|| non_empty("OPENAI_API_KEY"))
        {
            self.judge.api_key = Some(key);
        }
        if let Some(timeout) = non_empty("PREFJUDGE_JUDGE_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.judge.timeout_secs = Some(timeout);
        }
    }

    /// Reject settings no batch can run with.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.batch.concurrency == 0 {
            return Err(PipelineError::config("batch.concurrency must be at least 1"));
        }
        if self.batch.extension.trim().is_empty() {
            return Err(PipelineError::config("batch.extension must not be empty"));
        }
        if self.judge.provider == JudgeProvider::OpenAi {
            if self.judge.base_url.trim().is_empty() {
                return Err(PipelineError::config("judge.base_url must not be empty"));
            }
            if self.judge.model.as_deref().map_or(true, |m| m.trim().is_empty()) {
                return Err(PipelineError::config(
                    "judge model not set (use --judge-model or PREFJUDGE_JUDGE_MODEL)",
                ));
            }
        }
        Ok(())
    }
}
