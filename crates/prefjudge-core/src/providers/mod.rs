pub mod fake;
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{JudgeConfig, JudgeProvider};
use crate::error::PipelineResult;

/// Sends one judgment prompt to an external model and returns its raw reply.
///
/// Implementations make exactly one outbound call per invocation and never
/// retry; retrying belongs to [`crate::judge::RetryingJudge`].
#[async_trait]
pub trait JudgeClient: Send + Sync {
    async fn judge(&self, prompt: &str) -> PipelineResult<String>;

    fn provider_name(&self) -> &'static str;
}

/// Build the client selected by `config`.
pub fn build_client(config: &JudgeConfig) -> PipelineResult<Arc<dyn JudgeClient>> {
    match config.provider {
        JudgeProvider::OpenAi => Ok(Arc::new(openai::OpenAiJudgeClient::new(config.clone())?)),
        JudgeProvider::Fake => {
            let client = match &config.fake_response {
                Some(text) => fake::FakeJudgeClient::new().with_response(text.clone()),
                None => fake::FakeJudgeClient::new(),
            };
            Ok(Arc::new(client))
        }
    }
}
