pub mod scores;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::error::PipelineError;
use crate::model::JudgmentResult;
use crate::providers::JudgeClient;

/// How a retried judgment ended.
#[derive(Debug)]
pub struct JudgeOutcome {
    pub result: Option<JudgmentResult>,
    pub attempts: u32,
    /// Error of the final failed attempt, if the judgment failed.
    pub last_error: Option<PipelineError>,
}

/// JudgeClient plus score parsing, retried with a fixed backoff.
#[derive(Clone)]
pub struct RetryingJudge {
    client: Arc<dyn JudgeClient>,
    policy: RetryPolicy,
}

impl RetryingJudge {
    pub fn new(client: Arc<dyn JudgeClient>, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Scores for the two candidates, or `None` once every attempt failed.
    pub async fn judge_with_retry(&self, prompt: &str) -> Option<JudgmentResult> {
        self.judge_detailed(prompt).await.result
    }

    pub async fn judge_detailed(&self, prompt: &str) -> JudgeOutcome {
        let max_attempts = self.policy.attempts();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.attempt(prompt).await {
                Ok(result) => {
                    debug!(attempt, score_a = result.score_a, score_b = result.score_b, "judged");
                    return JudgeOutcome {
                        result: Some(result),
                        attempts: attempt,
                        last_error: None,
                    };
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        attempt,
                        max_attempts,
                        provider = self.client.provider_name(),
                        "judge attempt failed"
                    );
                    last_error = Some(e);
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.policy.backoff()).await;
            }
        }

        warn!(max_attempts, "all judge attempts failed");
        JudgeOutcome {
            result: None,
            attempts: max_attempts,
            last_error,
        }
    }

    async fn attempt(&self, prompt: &str) -> Result<JudgmentResult, PipelineError> {
        let raw = self.client.judge(prompt).await?;
        let parsed = scores::parse_scores(&raw);
        match JudgmentResult::from_scores(&parsed) {
            Some(result) if scores::is_sufficient(&parsed) => Ok(result),
            _ => Err(PipelineError::MalformedJudgeOutput {
                found: parsed.len(),
                excerpt: excerpt(&raw),
            }),
        }
    }
}

fn excerpt(raw: &str) -> String {
    const MAX_CHARS: usize = 120;
    let mut out: String = raw.chars().take(MAX_CHARS).collect();
    if raw.chars().nth(MAX_CHARS).is_some() {
        out.push('…');
    }
    out
}
