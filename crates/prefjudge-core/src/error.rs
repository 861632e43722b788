//! Error types for the judging pipeline.

use std::path::PathBuf;
use std::time::Duration;

/// Pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Judge endpoint could not be reached or returned no usable content.
    #[error("judge unavailable: {message}")]
    JudgeUnavailable { message: String },

    /// Judge endpoint rejected the request because of rate limiting.
    #[error("judge rate limited: retry after {retry_after:?}")]
    JudgeRateLimited { retry_after: Option<Duration> },

    /// Judge replied, but with fewer than two bracketed scores.
    #[error("malformed judge output: found {found} score(s) in {excerpt:?}")]
    MalformedJudgeOutput { found: usize, excerpt: String },

    /// Input line is not valid JSON or lacks expected fields/scaffolding.
    #[error("malformed input line {line}: {reason}")]
    MalformedInputLine { line: usize, reason: String },

    /// Unhandled failure while processing one file.
    #[error("processing {} failed: {message}", path.display())]
    FileLevelFailure { path: PathBuf, message: String },

    /// Filesystem error.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or incomplete configuration.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl PipelineError {
    /// Whether RetryingJudge should try again after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::JudgeUnavailable { .. }
                | Self::JudgeRateLimited { .. }
                | Self::MalformedJudgeOutput { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed_line(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInputLine {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        Self::JudgeUnavailable {
            message: err.to_string(),
        }
    }
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
