use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::LLMConfig;

const MOCK_RESPONSE: &str = "Mock LLM response";

/// OpenAI 兼容的 chat-completions 客户端
#[derive(Debug, Clone)]
pub struct LlmProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl LlmProvider {
    pub fn new(config: &LLMConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config: config.clone(),
            client,
        }
    }

    /// 启动时校验：启用真实调用时必须提供 API 地址
    pub fn validate_config(config: &LLMConfig) -> Result<(), LlmError> {
        if config.enabled && !config.mock && config.api_url.trim().is_empty() {
            return Err(LlmError::Misconfigured(
                "LLM_ENABLED=true and LLM_MOCK=false require LLM_API_URL".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn is_mock(&self) -> bool {
        self.config.mock
    }

    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }
        if self.config.mock {
            return Ok(MOCK_RESPONSE.to_string());
        }

        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: &messages,
            temperature: 0.4,
        };

        let mut request = self.client.post(&self.config.api_url).json(&body);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::ApiError {
                status: status.as_u16(),
                message: "empty completion".to_string(),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("llm is disabled")]
    Disabled,
    #[error("llm request timed out")]
    Timeout,
    #[error("llm network error: {0}")]
    Network(String),
    #[error("llm api error: status={status}, message={message}")]
    ApiError { status: u16, message: String },
    #[error("llm misconfigured: {0}")]
    Misconfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_mode_returns_error() {
        let provider = LlmProvider::new(&LLMConfig::default());
        let result = provider.chat(vec![]).await;
        assert!(matches!(result, Err(LlmError::Disabled)));
    }

    #[tokio::test]
    async fn mock_mode_returns_text() {
        let cfg = LLMConfig {
            enabled: true,
            mock: true,
            ..LLMConfig::default()
        };
        let provider = LlmProvider::new(&cfg);
        let result = provider.chat(vec![ChatMessage::user("hi")]).await.unwrap();
        assert_eq!(result, MOCK_RESPONSE);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let cfg = LLMConfig {
            enabled: true,
            mock: false,
            api_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            timeout_secs: 2,
            ..LLMConfig::default()
        };
        let provider = LlmProvider::new(&cfg);
        let result = provider.chat(vec![ChatMessage::user("hi")]).await;
        assert!(matches!(
            result,
            Err(LlmError::Network(_)) | Err(LlmError::Timeout)
        ));
    }

    #[test]
    fn real_mode_without_url_is_rejected() {
        let cfg = LLMConfig {
            enabled: true,
            mock: false,
            ..LLMConfig::default()
        };
        assert!(matches!(
            LlmProvider::validate_config(&cfg),
            Err(LlmError::Misconfigured(_))
        ));
        assert!(LlmProvider::validate_config(&LLMConfig::default()).is_ok());
    }
}
