//! Media judgment capability: decide what a URL's outlet is and describe it.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::client::{LlmClient, LlmError};
use crate::models::{MediaEnrichment, SocialMedia};

/// Structured answer from an analyzer about one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaJudgment {
    pub domain: String,
    pub description: String,
    pub enrichment: Option<MediaEnrichment>,
}

/// An external analyzer that can judge a URL.
///
/// Implementations must never fail loudly: `None` means "unavailable" and the
/// caller falls back to normalizer output.
#[async_trait]
pub trait MediaJudge: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn judge(&self, url: &str, base_domain: &str) -> Option<MediaJudgment>;
}

/// Judge backed by an LLM prompt.
pub struct LlmJudge {
    client: LlmClient,
}

impl LlmJudge {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaJudge for LlmJudge {
    fn name(&self) -> &str {
        &self.client.config().model
    }

    async fn judge(&self, url: &str, base_domain: &str) -> Option<MediaJudgment> {
        let prompt = self
            .client
            .config()
            .get_judge_prompt()
            .replace("{url}", url)
            .replace("{domain}", base_domain);

        debug!("Judging {} ({})", url, base_domain);
        let reply = match self.client.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Analyzer unavailable for {}: {}", url, e);
                return None;
            }
        };

        match parse_judgment(&reply, base_domain) {
            Ok(judgment) => Some(judgment),
            Err(e) => {
                warn!("Malformed analyzer reply for {}: {}", url, e);
                None
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawJudgment {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    media_type: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    coverage: Option<String>,
    #[serde(default)]
    reliability_score: Option<Value>,
    #[serde(default)]
    social_media: Option<RawSocial>,
    #[serde(default)]
    has_rss: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSocial {
    #[serde(default)]
    facebook: Option<String>,
    #[serde(default)]
    twitter: Option<String>,
    #[serde(default)]
    telegram: Option<String>,
}

/// Slice the outermost JSON object out of a reply that may carry prose or fences.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

/// Parse an analyzer reply. The record domain is always `base_domain`.
pub fn parse_judgment(reply: &str, base_domain: &str) -> Result<MediaJudgment, LlmError> {
    let json = extract_json_object(reply)
        .ok_or_else(|| LlmError::Parse("No JSON object in reply".to_string()))?;
    let raw: RawJudgment =
        serde_json::from_str(json).map_err(|e| LlmError::Parse(e.to_string()))?;

    let social = raw.social_media.unwrap_or_default();
    let enrichment = MediaEnrichment {
        name: non_empty(raw.name),
        media_type: non_empty(raw.media_type),
        language: non_empty(raw.language),
        coverage: non_empty(raw.coverage),
        reliability_score: raw.reliability_score.as_ref().and_then(score_value),
        social_media: SocialMedia {
            facebook: non_empty(social.facebook),
            twitter: non_empty(social.twitter),
            telegram: non_empty(social.telegram),
        },
        has_rss: raw.has_rss.as_ref().map(truthy).unwrap_or(false),
    };

    Ok(MediaJudgment {
        domain: base_domain.to_string(),
        description: raw.description.unwrap_or_default().trim().to_string(),
        enrichment: Some(enrichment),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
}

/// Reliability score as 0..=100, accepting numbers or numeric strings.
fn score_value(value: &Value) -> Option<u8> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(0.0, 100.0) as u8)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.to_lowercase().as_str(), "true" | "yes" | "1"),
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_reply() {
        let reply = r#"Sure! ```json
        {"domain": "www.pravda.com.ua", "description": "Суспільно-політичне видання",
         "name": "Українська правда", "type": "online", "language": "uk",
         "coverage": "national", "reliability_score": 140,
         "social_media": {"facebook": "https://facebook.com/pravda", "twitter": null, "telegram": ""},
         "has_rss": "yes"}
        ```"#;

        let judgment = parse_judgment(reply, "pravda.com.ua").unwrap();
        assert_eq!(judgment.domain, "pravda.com.ua");
        assert_eq!(judgment.description, "Суспільно-політичне видання");

        let enrichment = judgment.enrichment.unwrap();
        assert_eq!(enrichment.name.as_deref(), Some("Українська правда"));
        assert_eq!(enrichment.reliability_score, Some(100));
        assert!(enrichment.social_media.facebook.is_some());
        assert!(enrichment.social_media.twitter.is_none());
        assert!(enrichment.social_media.telegram.is_none());
        assert!(enrichment.has_rss);
    }

    #[test]
    fn string_scores_are_accepted() {
        let judgment = parse_judgment(r#"{"reliability_score": "72.4"}"#, "example.ua").unwrap();
        assert_eq!(judgment.enrichment.unwrap().reliability_score, Some(72));
    }

    #[test]
    fn rejects_reply_without_json() {
        assert!(parse_judgment("I cannot browse the web.", "example.ua").is_err());
        assert!(parse_judgment("} nope {", "example.ua").is_err());
        assert!(parse_judgment("{not json}", "example.ua").is_err());
    }

    #[test]
    fn extracts_outermost_object() {
        assert_eq!(extract_json_object("x {\"a\": {\"b\": 1}} y"), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(extract_json_object("no braces"), None);
    }
}
