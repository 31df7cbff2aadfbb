//! Analyzer backend configuration.

use serde::{Deserialize, Serialize};

use super::prompts::DEFAULT_JUDGE_PROMPT;

/// Hosted OpenAI-compatible services and their API roots.
const HOSTED_ENDPOINTS: &[(&str, &str)] = &[
    ("openai", "https://api.openai.com"),
    ("groq", "https://api.groq.com/openai"),
    ("together", "https://api.together.xyz"),
];

/// Wire protocol spoken by the analyzer backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Local Ollama server
    #[default]
    Ollama,
    /// Any OpenAI-compatible chat completions API
    OpenAI,
}

impl LlmProvider {
    /// Accepts protocol names as well as hosted service names.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        if s == "ollama" {
            Some(Self::Ollama)
        } else if HOSTED_ENDPOINTS.iter().any(|(name, _)| *name == s) {
            Some(Self::OpenAI)
        } else {
            None
        }
    }
}

/// Settings for the external media analyzer.
///
/// Disabled unless turned on in the config file or with `LLM_ENABLED`; when
/// off, discovery classifies candidates heuristically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub provider: LlmProvider,
    /// API root, without the `/api/...` or `/v1/...` path
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Bearer token for hosted providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Replies are short JSON objects; this caps runaway generations
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Prompt template with `{url}` and `{domain}` placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge_prompt: Option<String>,
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_temperature() -> f32 {
    0.1
}

fn default_timeout_secs() -> u64 {
    60
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl LlmConfig {
    /// Defaults without looking at the environment.
    pub(crate) fn base_default() -> Self {
        Self {
            enabled: false,
            provider: LlmProvider::default(),
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            judge_prompt: None,
        }
    }

    /// Apply `LLM_*` environment variables.
    ///
    /// `LLM_PROVIDER` may name a hosted service (`openai`, `groq`, `together`),
    /// which also selects its endpoint unless `LLM_ENDPOINT` is set. Without an
    /// explicit provider, a bare `OPENAI_API_KEY` switches to OpenAI.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(val) = env_var("LLM_ENABLED") {
            self.enabled = matches!(val.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        let endpoint = env_var("LLM_ENDPOINT");
        self.api_key = env_var("LLM_API_KEY").or(self.api_key);

        match env_var("LLM_PROVIDER").map(|p| p.to_lowercase()) {
            Some(name) => {
                if let Some(provider) = LlmProvider::from_str(&name) {
                    self.provider = provider;
                }
                if let Some((_, root)) = HOSTED_ENDPOINTS.iter().find(|(n, _)| *n == name) {
                    self.endpoint = root.to_string();
                }
                if name == "openai" && self.api_key.is_none() {
                    self.api_key = env_var("OPENAI_API_KEY");
                }
            }
            None if self.api_key.is_none() => {
                if let Some(key) = env_var("OPENAI_API_KEY") {
                    self.api_key = Some(key);
                    self.provider = LlmProvider::OpenAI;
                    self.endpoint = HOSTED_ENDPOINTS[0].1.to_string();
                }
            }
            None => {}
        }

        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if let Some(model) = env_var("LLM_MODEL") {
            self.model = model;
        }
        if let Some(secs) = env_var("LLM_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = secs;
        }
        if let Some(prompt) = env_var("LLM_JUDGE_PROMPT") {
            self.judge_prompt = Some(prompt);
        }
        self
    }

    /// The configured judge prompt, or the built-in one.
    pub fn get_judge_prompt(&self) -> &str {
        self.judge_prompt.as_deref().unwrap_or(DEFAULT_JUDGE_PROMPT)
    }
}
