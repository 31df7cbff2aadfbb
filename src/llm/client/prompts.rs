//! Prompt templates.

/// Default prompt for judging whether a URL belongs to a media outlet.
///
/// Placeholders: `{url}`, `{domain}`.
pub const DEFAULT_JUDGE_PROMPT: &str = r#"You are a media analyst cataloguing Ukrainian-language news outlets.

Analyze the website at {url} (registrable domain: {domain}).

Respond with ONLY a JSON object, no prose and no markdown fences, with these keys:
{
  "domain": "{domain}",
  "description": "one or two sentences describing the outlet, in Ukrainian",
  "name": "outlet name",
  "type": "one of: online, newspaper, tv, radio, agency, blog, other",
  "language": "ISO 639-1 code of the main language",
  "coverage": "national, regional, local or international",
  "reliability_score": integer from 0 to 100,
  "social_media": {"facebook": "url or null", "twitter": "url or null", "telegram": "url or null"},
  "has_rss": true or false
}

Use null for anything you do not know."#;
