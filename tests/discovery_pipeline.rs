//! End-to-end discovery runs against in-memory sources, resolver, judge and fetcher.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use ua_media_scanner::discovery::{
    DiscoveryError, MediaAnalyzer, MediaDiscovery, PageFetcher, PassthroughResolver,
    RedirectResolver, SearchSource,
};
use ua_media_scanner::llm::{MediaJudge, MediaJudgment};
use ua_media_scanner::models::{MediaEnrichment, SearchOrigin, SourceCandidate};

struct StaticSource {
    origin: SearchOrigin,
    urls: Vec<&'static str>,
    calls: AtomicUsize,
}

impl StaticSource {
    fn new(origin: SearchOrigin, urls: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            origin,
            urls: urls.to_vec(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SearchSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn origin(&self) -> SearchOrigin {
        self.origin
    }

    async fn search(
        &self,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<SourceCandidate>, DiscoveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .urls
            .iter()
            .take(max_results)
            .map(|url| SourceCandidate::new("Заголовок", *url, self.origin).with_snippet("уривок"))
            .collect())
    }
}

struct BrokenSource;

#[async_trait]
impl SearchSource for BrokenSource {
    fn name(&self) -> &str {
        "broken"
    }

    fn origin(&self) -> SearchOrigin {
        SearchOrigin::WebSearch
    }

    async fn search(
        &self,
        _query: &str,
        _max_results: usize,
    ) -> Result<Vec<SourceCandidate>, DiscoveryError> {
        Err(DiscoveryError::Unavailable("HTTP 503".to_string()))
    }
}

/// Resolves from a fixed table; unknown URLs come back unchanged.
struct MapResolver {
    targets: HashMap<&'static str, &'static str>,
    calls: AtomicUsize,
}

#[async_trait]
impl RedirectResolver for MapResolver {
    async fn resolve(&self, url: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.targets
            .get(url)
            .map(|s| s.to_string())
            .unwrap_or_else(|| url.to_string())
    }
}

struct StubJudge {
    available: bool,
    calls: AtomicUsize,
}

impl StubJudge {
    fn new(available: bool) -> Arc<Self> {
        Arc::new(Self {
            available,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl MediaJudge for StubJudge {
    fn name(&self) -> &str {
        "stub"
    }

    async fn judge(&self, _url: &str, base_domain: &str) -> Option<MediaJudgment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.available.then(|| MediaJudgment {
            domain: base_domain.to_string(),
            description: format!("Видання {}", base_domain),
            enrichment: Some(MediaEnrichment {
                language: Some("uk".to_string()),
                reliability_score: Some(70),
                ..Default::default()
            }),
        })
    }
}

struct NoPages;

#[async_trait]
impl PageFetcher for NoPages {
    async fn fetch(&self, _url: &str) -> Option<String> {
        None
    }
}

fn discovery(
    sources: Vec<Arc<dyn SearchSource>>,
    resolver: Arc<dyn RedirectResolver>,
    judge: Option<Arc<StubJudge>>,
) -> MediaDiscovery {
    let mut analyzer = MediaAnalyzer::new().with_fetcher(Arc::new(NoPages));
    if let Some(judge) = judge {
        analyzer = analyzer.with_judge(judge);
    }
    MediaDiscovery::new(sources, resolver, analyzer)
}

#[tokio::test]
async fn subdomains_collapse_to_one_record() {
    let web = StaticSource::new(
        SearchOrigin::WebSearch,
        &["https://sub.example.ua/a", "https://example.ua/b"],
    );
    let judge = StubJudge::new(true);
    let pipeline = discovery(vec![web], Arc::new(PassthroughResolver), Some(judge.clone()));

    let records = pipeline.search_media("новини", 10).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].domain, "example.ua");
    assert_eq!(records[0].url, "https://sub.example.ua/a");
    assert_eq!(records[0].description, "Видання example.ua");
    assert_eq!(judge.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn aggregator_links_are_resolved_before_normalizing() {
    let aggregator = StaticSource::new(
        SearchOrigin::NewsAggregator,
        &["https://news.google.com/rss/articles/XYZ"],
    );
    let resolver = Arc::new(MapResolver {
        targets: HashMap::from([(
            "https://news.google.com/rss/articles/XYZ",
            "https://www.pravda.com.ua/news/2024/03/01/7445000/",
        )]),
        calls: AtomicUsize::new(0),
    });
    let pipeline = discovery(vec![aggregator], resolver.clone(), Some(StubJudge::new(true)));

    let records = pipeline.search_media("новини", 5).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].domain, "pravda.com.ua");
    assert_eq!(
        records[0].url,
        "https://www.pravda.com.ua/news/2024/03/01/7445000/"
    );
    assert_eq!(records[0].source_origin, SearchOrigin::NewsAggregator);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn web_search_links_skip_the_resolver() {
    let web = StaticSource::new(
        SearchOrigin::WebSearch,
        &["https://news.google.com/rss/articles/ABC"],
    );
    let resolver = Arc::new(MapResolver {
        targets: HashMap::new(),
        calls: AtomicUsize::new(0),
    });
    let pipeline = discovery(vec![web], resolver.clone(), Some(StubJudge::new(true)));

    let records = pipeline.search_media("новини", 5).await;

    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].domain, "google.com");
}

#[tokio::test]
async fn unavailable_analyzer_falls_back_to_bare_records() {
    let web = StaticSource::new(
        SearchOrigin::WebSearch,
        &["https://www.unian.ua/war/1", "https://zaxid.net/news/2"],
    );
    let judge = StubJudge::new(false);
    let pipeline = discovery(vec![web], Arc::new(PassthroughResolver), Some(judge.clone()));

    let records = pipeline.search_media("новини", 10).await;

    let domains: Vec<_> = records.iter().map(|r| r.domain.as_str()).collect();
    assert_eq!(domains, ["unian.ua", "zaxid.net"]);
    for record in &records {
        assert!(record.description.is_empty());
        assert!(record.enrichment.is_none());
    }
    assert_eq!(judge.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn results_are_bounded_unique_and_ordered() {
    let web = StaticSource::new(
        SearchOrigin::WebSearch,
        &[
            "https://a.ua/1",
            "https://www.a.ua/2",
            "https://b.com.ua/3",
            "https://c.kiev.ua/4",
            "https://d.ua/5",
        ],
    );
    let aggregator = StaticSource::new(SearchOrigin::NewsAggregator, &["https://e.ua/6"]);
    let pipeline = discovery(
        vec![web, aggregator],
        Arc::new(PassthroughResolver),
        Some(StubJudge::new(true)),
    );

    let records = pipeline.search_media("новини", 3).await;

    let domains: Vec<_> = records.iter().map(|r| r.domain.as_str()).collect();
    assert_eq!(domains, ["a.ua", "b.com.ua", "c.kiev.ua"]);
}

#[tokio::test]
async fn web_results_win_domain_collisions() {
    let web = StaticSource::new(SearchOrigin::WebSearch, &["https://lb.ua/web"]);
    let aggregator = StaticSource::new(
        SearchOrigin::NewsAggregator,
        &["https://lb.ua/feed", "https://nv.ua/feed"],
    );
    let pipeline = discovery(
        vec![web, aggregator],
        Arc::new(PassthroughResolver),
        Some(StubJudge::new(true)),
    );

    let records = pipeline.search_media("новини", 10).await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].domain, "lb.ua");
    assert_eq!(records[0].source_origin, SearchOrigin::WebSearch);
    assert_eq!(records[1].domain, "nv.ua");
}

#[tokio::test]
async fn failing_source_does_not_abort_the_run() {
    let aggregator = StaticSource::new(SearchOrigin::NewsAggregator, &["https://suspilne.media/1"]);
    let sources: Vec<Arc<dyn SearchSource>> = vec![Arc::new(BrokenSource), aggregator];
    let pipeline = discovery(sources, Arc::new(PassthroughResolver), None);

    let records = pipeline.search_media("новини", 10).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].domain, "suspilne.media");
    assert_eq!(records[0].description, "уривок");
}

#[tokio::test]
async fn zero_max_results_queries_nothing() {
    let web = StaticSource::new(SearchOrigin::WebSearch, &["https://a.ua/1"]);
    let pipeline = discovery(
        vec![web.clone()],
        Arc::new(PassthroughResolver),
        Some(StubJudge::new(true)),
    );

    assert!(pipeline.search_media("новини", 0).await.is_empty());
    assert_eq!(web.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn heuristic_judges_unfetchable_web_pages_by_url() {
    let web = StaticSource::new(
        SearchOrigin::WebSearch,
        &[
            "https://shop.example.ua/catalog",
            "https://example.com.ua/press/news/article/1",
        ],
    );
    let pipeline = discovery(vec![web], Arc::new(PassthroughResolver), None);

    let records = pipeline.search_media("новини", 10).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].domain, "example.com.ua");
}
