//! External media analysis through an LLM.

mod client;
mod judge;

pub use client::{LlmClient, LlmConfig, LlmError, LlmProvider, DEFAULT_JUDGE_PROMPT};
pub use judge::{extract_json_object, parse_judgment, LlmJudge, MediaJudge, MediaJudgment};
