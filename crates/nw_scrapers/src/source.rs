use async_trait::async_trait;
use nw_core::{Error, RawCandidate, Result, WatchConfig};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Produces raw title/url candidates from somewhere. The scheduler only ever
/// sees this trait, so the extraction strategy stays swappable without
/// touching the dedupe or persistence contracts.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Label recorded on articles captured from this source.
    fn source(&self) -> &str;

    async fn fetch_candidates(&self) -> Result<Vec<RawCandidate>>;
}

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Containers that tend to wrap headline cards on news homepages.
const DEFAULT_CONTAINER_SELECTORS: &[&str] = &[
    "div.news-card",
    "div.article",
    "div.top-story",
    "div.list-item",
    "a[href*=\"/articleshow/\"]",
];

/// Probed in order inside each container to find the headline text.
const DEFAULT_TITLE_SELECTORS: &[&str] = &["h2", "h3", "h4", ".title", ".headline", "a"];

/// Fetches the configured homepage and pulls out candidate headlines with a
/// list of heuristic CSS selectors. No attempt is made to be correct against
/// any particular site's markup; the selector lists are configuration.
pub struct HomepageScraper {
    client: reqwest::Client,
    base_url: String,
    source: String,
    container_selectors: Vec<String>,
    title_selectors: Vec<String>,
}

impl HomepageScraper {
    pub fn new(config: &WatchConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            source: config.source.clone(),
            container_selectors: DEFAULT_CONTAINER_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            title_selectors: DEFAULT_TITLE_SELECTORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Swaps out the heuristic selector lists.
    pub fn with_selectors(mut self, containers: Vec<String>, titles: Vec<String>) -> Self {
        self.container_selectors = containers;
        self.title_selectors = titles;
        self
    }

    fn extract(&self, html: &str) -> Result<Vec<RawCandidate>> {
        let document = Html::parse_document(html);
        let anchor = Selector::parse("a").unwrap();
        let mut candidates = Vec::new();
        for raw in &self.container_selectors {
            let selector = parse_selector(raw)?;
            for element in document.select(&selector) {
                if let Some(title) = self.extract_title(&element) {
                    let url = extract_href(&element, &anchor).unwrap_or_default();
                    candidates.push(RawCandidate { title, url });
                }
            }
        }
        Ok(candidates)
    }

    fn extract_title(&self, element: &ElementRef) -> Option<String> {
        for raw in &self.title_selectors {
            if let Ok(selector) = Selector::parse(raw) {
                if let Some(found) = element.select(&selector).next() {
                    let text = found.text().collect::<String>().trim().to_string();
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
        }
        let text = element.text().collect::<String>().trim().to_string();
        (!text.is_empty()).then_some(text)
    }
}

#[async_trait]
impl CandidateSource for HomepageScraper {
    fn source(&self) -> &str {
        &self.source
    }

    async fn fetch_candidates(&self) -> Result<Vec<RawCandidate>> {
        let response = self
            .client
            .get(&self.base_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?;
        let html = response.text().await?;
        let candidates = self.extract(&html)?;
        debug!(count = candidates.len(), "extracted candidates from {}", self.base_url);
        Ok(candidates)
    }
}

fn parse_selector(raw: &str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| Error::Parse(format!("invalid selector {raw:?}: {e}")))
}

/// The element's own href if it is a link, otherwise the first nested link
/// that carries one.
fn extract_href(element: &ElementRef, anchor: &Selector) -> Option<String> {
    if let Some(href) = element.value().attr("href") {
        return Some(href.to_owned());
    }
    element
        .select(anchor)
        .find_map(|a| a.value().attr("href").map(str::to_owned))
}
