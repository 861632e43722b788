//! OpenAI-compatible chat completions judge.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde_json::json;
use tracing::debug;

use super::JudgeClient;
use crate::config::JudgeConfig;
use crate::error::{PipelineError, PipelineResult};

/// User agent for judge requests.
const USER_AGENT_VALUE: &str = concat!("prefjudge/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct OpenAiJudgeClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    config: JudgeConfig,
}

impl OpenAiJudgeClient {
    pub fn new(config: JudgeConfig) -> PipelineResult<Self> {
        let model = config
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| PipelineError::config("judge model not set"))?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let mut builder = reqwest::Client::builder().default_headers(default_headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PipelineError::config(format!("failed to create HTTP client: {}", e)))?;

        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            endpoint,
            model,
            config,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl JudgeClient for OpenAiJudgeClient {
    async fn judge(&self, prompt: &str) -> PipelineResult<String> {
        let mut body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });
        if let Some(temperature) = self.config.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.header(AUTHORIZATION, format!("Bearer {}", key));
        }

        debug!(endpoint = %self.endpoint, model = %self.model, "calling judge");
        let response = request.send().await?;
        let status = response.status();

        match status.as_u16() {
            200..=299 => {}
            429 => {
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .map(std::time::Duration::from_secs);
                return Err(PipelineError::JudgeRateLimited { retry_after });
            }
            _ => {
                let message = response.text().await.unwrap_or_else(|_| status.to_string());
                return Err(PipelineError::JudgeUnavailable {
                    message: format!("HTTP {}: {}", status.as_u16(), message),
                });
            }
        }

        let json: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| PipelineError::JudgeUnavailable {
                    message: format!("invalid judge response body: {}", e),
                })?;

        json.pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| PipelineError::JudgeUnavailable {
                message: "judge response missing content".to_string(),
            })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_trailing_slash() {
        let cfg = JudgeConfig::default()
            .with_base_url("http://localhost:8000/v1/")
            .with_model("judge");
        let client = OpenAiJudgeClient::new(cfg).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/v1/chat/completions");
    }

    #[test]
    fn missing_model_is_config_error() {
        let err = OpenAiJudgeClient::new(JudgeConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Config { .. }));
    }
}
