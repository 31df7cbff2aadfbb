//! Domain normalization: reduce arbitrary URLs to their registrable base domain.
//!
//! Everything here is pure and fails soft: malformed input yields an empty
//! string (or `None`), which callers treat as "reject this candidate".

use regex::Regex;
use std::net::IpAddr;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Extract the lowercase host of a URL or bare domain, without `www.` or a trailing dot.
///
/// Input may lack a scheme and may carry a path, query string, fragment or port.
pub fn host_of(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lowered = trimmed.to_lowercase();
    let parsed = if lowered.contains("://") {
        url::Url::parse(&lowered)
    } else {
        url::Url::parse(&format!("http://{}", lowered.trim_start_matches("//")))
    }
    .ok()?;

    let host = parsed.host_str()?.trim_end_matches('.');
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host.is_empty() {
        return None;
    }
    Some(host.to_string())
}

/// Registrable base domain of a URL using public-suffix rules.
///
/// `https://kyiv.suspilne.media/news?id=1` → `suspilne.media`,
/// `www.example.com` → `example.com`. Returns an empty string for input
/// that has no registrable domain (IP addresses, bare suffixes, garbage).
pub fn base_domain(input: &str) -> String {
    let Some(host) = host_of(input) else {
        return String::new();
    };

    let bare = host.trim_start_matches('[').trim_end_matches(']');
    if bare.parse::<IpAddr>().is_ok() {
        return String::new();
    }

    psl::domain_str(&host)
        .map(|d| d.to_string())
        .unwrap_or_default()
}

/// Normalize a value already believed to be a domain, such as analyzer output.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(domain: &str) -> String {
    base_domain(domain)
}

/// Whether `url` points at `host` or one of its subdomains.
pub fn is_host_or_subdomain(url: &str, host: &str) -> bool {
    let host = host.trim().to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    match host_of(url) {
        Some(h) => h == host || h.ends_with(&format!(".{}", host)),
        None => false,
    }
}

/// Strip markup and collapse runs of whitespace.
pub fn clean_text(text: &str) -> String {
    let without_tags = TAG_RE.replace_all(text, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    WS_RE.replace_all(&decoded, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_subdomains_using_public_suffix() {
        assert_eq!(base_domain("https://kyiv.suspilne.media/news"), "suspilne.media");
        assert_eq!(base_domain("www.example.com"), "example.com");
        assert_eq!(base_domain("https://sub.example.ua/a"), "example.ua");
        assert_eq!(base_domain("https://www.bbc.co.uk/ukrainian"), "bbc.co.uk");
        assert_eq!(base_domain("https://www.pravda.com.ua/news/2024/"), "pravda.com.ua");
    }

    #[test]
    fn ignores_scheme_query_fragment_and_case() {
        assert_eq!(
            base_domain("HTTPS://News.Example.UA:8443/path?utm_source=x#top"),
            "example.ua"
        );
        assert_eq!(base_domain("//cdn.example.ua/x"), "example.ua");
    }

    #[test]
    fn malformed_input_yields_empty() {
        assert_eq!(base_domain(""), "");
        assert_eq!(base_domain("   "), "");
        assert_eq!(base_domain("http://"), "");
        assert_eq!(base_domain("http://127.0.0.1/admin"), "");
        assert_eq!(base_domain("com.ua"), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for url in [
            "https://kyiv.suspilne.media/news",
            "https://www.pravda.com.ua/story",
            "example.ua",
            "http://a.b.c.example.org/x?y=z",
        ] {
            let once = normalize(&base_domain(url));
            assert_eq!(normalize(&once), once, "not idempotent for {url}");
        }
    }

    #[test]
    fn host_of_keeps_subdomain() {
        assert_eq!(host_of("https://www.news.google.com/rss").as_deref(), Some("news.google.com"));
        assert_eq!(host_of("example.ua/path").as_deref(), Some("example.ua"));
        assert_eq!(host_of(""), None);
    }

    #[test]
    fn host_matching() {
        assert!(is_host_or_subdomain("https://news.google.com/articles/1", "news.google.com"));
        assert!(is_host_or_subdomain("https://accounts.google.com/login", "google.com"));
        assert!(!is_host_or_subdomain("https://pravda.com.ua/story", "news.google.com"));
        assert!(!is_host_or_subdomain("https://notgoogle.com", "google.com"));
    }

    #[test]
    fn clean_text_strips_tags_and_whitespace() {
        assert_eq!(
            clean_text("  <b>Українська</b>\n\n правда &amp; co  "),
            "Українська правда & co"
        );
    }
}
