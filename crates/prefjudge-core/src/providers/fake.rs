use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::JudgeClient;
use crate::error::{PipelineError, PipelineResult};

const DEFAULT_RESPONSE: &str = "summary1: [[5]], summary2: [[5]]";

/// Offline judge: replays queued replies, then a fixed reply.
#[derive(Debug, Default)]
pub struct FakeJudgeClient {
    fixed_response: Option<String>,
    queued: Mutex<VecDeque<PipelineResult<String>>>,
    calls: AtomicUsize,
}

impl FakeJudgeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    /// Replies handed out one per call before falling back to the fixed reply.
    pub fn with_queue<I, S>(mut self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queue_mut()
            .extend(replies.into_iter().map(|r| Ok(r.into())));
        self
    }

    /// Queue a transport failure.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.queue_mut().push_back(Err(PipelineError::JudgeUnavailable {
            message: message.into(),
        }));
        self
    }

    fn queue_mut(&mut self) -> &mut VecDeque<PipelineResult<String>> {
        self.queued.get_mut().unwrap_or_else(|e| e.into_inner())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JudgeClient for FakeJudgeClient {
    async fn judge(&self, _prompt: &str) -> PipelineResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .queued
            .lock()
            .map_err(|_| PipelineError::JudgeUnavailable {
                message: "fake judge queue poisoned".to_string(),
            })?
            .pop_front();
        match next {
            Some(reply) => reply,
            None => Ok(self
                .fixed_response
                .clone()
                .unwrap_or_else(|| DEFAULT_RESPONSE.to_string())),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queue_then_fixed_response() {
        let client = FakeJudgeClient::new()
            .with_response("[[1]] [[2]]")
            .with_queue(["first"])
            .with_failure("down");

        assert_eq!(client.judge("p").await.unwrap(), "first");
        assert!(client.judge("p").await.is_err());
        assert_eq!(client.judge("p").await.unwrap(), "[[1]] [[2]]");
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn default_response_is_a_tie() {
        let client = FakeJudgeClient::new();
        let reply = client.judge("p").await.unwrap();
        assert_eq!(crate::judge::scores::parse_scores(&reply), vec![5, 5]);
    }
}
