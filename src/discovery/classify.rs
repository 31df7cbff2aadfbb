//! Heuristic news-source classification.
//!
//! Scores a page from URL keywords and a few DOM structure signals. This is a
//! heuristic: false positives and false negatives are expected.

use scraper::{Html, Selector};

/// Minimum score at which a page is treated as a news source.
pub const NEWS_SCORE_THRESHOLD: u8 = 3;

const URL_KEYWORDS: &[&str] = &["news", "article", "story", "press", "media", "journal"];
const DATE_CLASS_KEYWORDS: &[&str] = &["date", "published", "time", "posted"];
const SHARE_CLASS_KEYWORDS: &[&str] = &["share", "twitter", "facebook", "linkedin"];

/// Score a page. `content` is the raw HTML when it could be fetched.
pub fn news_score(url: &str, content: Option<&str>) -> u8 {
    let lowered = url.to_lowercase();
    let mut score = URL_KEYWORDS
        .iter()
        .filter(|kw| lowered.contains(*kw))
        .count() as u8;

    if let Some(html) = content {
        score += structure_score(html);
    }

    score
}

/// Whether the page scores at or above [`NEWS_SCORE_THRESHOLD`].
pub fn is_news_source(url: &str, content: Option<&str>) -> bool {
    news_score(url, content) >= NEWS_SCORE_THRESHOLD
}

fn structure_score(html: &str) -> u8 {
    let document = Html::parse_document(html);
    let mut score = 0;

    if let Ok(article) = Selector::parse("article") {
        if document.select(&article).next().is_some() {
            score += 2;
        }
    }

    let Ok(classed) = Selector::parse("[class]") else {
        return score;
    };

    let mut has_date = false;
    let mut has_share = false;
    for element in document.select(&classed) {
        let Some(class) = element.value().attr("class") else {
            continue;
        };
        let class = class.to_lowercase();
        has_date |= DATE_CLASS_KEYWORDS.iter().any(|kw| class.contains(kw));
        has_share |= SHARE_CLASS_KEYWORDS.iter().any(|kw| class.contains(kw));
        if has_date && has_share {
            break;
        }
    }

    score + u8::from(has_date) + u8::from(has_share)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_date_and_news_url_scores_four() {
        let html = r#"<html><body>
            <article><h1>Headline</h1><span class="post-date">12.03.2024</span></article>
        </body></html>"#;

        assert_eq!(news_score("https://example.ua/news/1", Some(html)), 4);
        assert!(is_news_source("https://example.ua/news/1", Some(html)));
    }

    #[test]
    fn bare_page_scores_zero() {
        let html = "<html><body><p>Hello</p></body></html>";
        assert_eq!(news_score("https://example.ua/", Some(html)), 0);
        assert!(!is_news_source("https://example.ua/", Some(html)));
    }

    #[test]
    fn url_keywords_count_once_each() {
        assert_eq!(news_score("https://news.example.ua/news/news", None), 1);
        assert_eq!(news_score("https://example.ua/press/media/story", None), 3);
        assert_eq!(news_score("https://EXAMPLE.ua/ARTICLE", None), 1);
    }

    #[test]
    fn date_and_share_classes_add_one_each() {
        let html = r#"<div class="meta published"></div>
            <div class="time-ago"></div>
            <a class="share-facebook"></a><a class="twitter-btn"></a>"#;
        assert_eq!(news_score("https://example.ua/", Some(html)), 2);
    }

    #[test]
    fn url_only_can_reach_threshold() {
        assert!(is_news_source("https://media.example.ua/news/article-1", None));
        assert!(!is_news_source("https://shop.example.ua/cart", None));
    }
}
