//! Minimal LLM client: one prompt in, one completion out.
//!
//! Talks to Ollama's generate API or any OpenAI-compatible chat
//! completions endpoint.

mod config;
mod prompts;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use config::{LlmConfig, LlmProvider};
pub use prompts::DEFAULT_JUDGE_PROMPT;

/// HTTP client for the analyzer backend.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    /// Constrains Ollama to emit a JSON document.
    format: &'static str,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send a prompt and return the raw completion text.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }
        let model = self.config.model.as_str();

        match self.config.provider {
            LlmProvider::Ollama => {
                let request = GenerateRequest {
                    model,
                    prompt,
                    stream: false,
                    format: "json",
                    options: GenerateOptions {
                        temperature: self.config.temperature,
                        num_predict: self.config.max_tokens,
                    },
                };
                let reply: GenerateResponse = self.post_json("api/generate", &request).await?;
                Ok(reply.response)
            }
            LlmProvider::OpenAI => {
                let request = ChatRequest {
                    model,
                    messages: [ChatMessage {
                        role: "user",
                        content: prompt,
                    }],
                    max_tokens: self.config.max_tokens,
                    temperature: self.config.temperature,
                };
                let reply: ChatResponse = self.post_json("v1/chat/completions", &request).await?;
                reply
                    .choices
                    .into_iter()
                    .next()
                    .map(|c| c.message.content)
                    .ok_or_else(|| LlmError::Parse("no choices in completion".to_string()))
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match self.config.api_key {
            Some(ref key) => req.bearer_auth(key),
            None => req,
        }
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, LlmError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {} (model {})", url, self.config.model);

        let resp = self
            .authorized(self.client.post(&url).json(body))
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND && self.config.provider == LlmProvider::Ollama {
            return Err(LlmError::ModelNotFound(self.config.model.clone()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        resp.json().await.map_err(|e| LlmError::Parse(e.to_string()))
    }
}

/// Analyzer backend failures. All of them mean "no judgment this time".
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("cannot reach analyzer: {0}")]
    Connection(String),
    #[error("analyzer returned an error: {0}")]
    Api(String),
    #[error("unreadable analyzer reply: {0}")]
    Parse(String),
    #[error("model '{0}' is not installed")]
    ModelNotFound(String),
    #[error("analyzer is disabled")]
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_local_and_disabled() {
        let config = LlmConfig::base_default();
        assert!(!config.enabled);
        assert_eq!(config.provider, LlmProvider::Ollama);
        assert!(config.judge_prompt.is_none());
        assert!(config.get_judge_prompt().contains("{url}"));
        assert!(config.get_judge_prompt().contains("{domain}"));
    }

    #[test]
    fn provider_aliases() {
        assert_eq!(LlmProvider::from_str("GROQ"), Some(LlmProvider::OpenAI));
        assert_eq!(LlmProvider::from_str("ollama"), Some(LlmProvider::Ollama));
        assert_eq!(LlmProvider::from_str("bard"), None);
    }

    #[test]
    fn urls_join_without_double_slashes() {
        let config = LlmConfig {
            endpoint: "http://localhost:11434/".to_string(),
            ..LlmConfig::base_default()
        };
        let client = LlmClient::new(config).unwrap();
        assert_eq!(client.url("api/generate"), "http://localhost:11434/api/generate");
    }

    #[tokio::test]
    async fn disabled_client_refuses_to_generate() {
        let client = LlmClient::new(LlmConfig::base_default()).unwrap();
        assert!(matches!(client.generate("hi").await, Err(LlmError::Disabled)));
    }
}
