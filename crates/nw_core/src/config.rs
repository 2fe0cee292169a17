use std::path::PathBuf;
use std::time::Duration;

use crate::{Error, Result};

/// Knobs shared by the scraper, deduplicator and scheduler.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Homepage to fetch; also the origin used to resolve relative links.
    pub base_url: String,
    /// Label recorded on every captured article.
    pub source: String,
    /// Titles this long or shorter are treated as scraping noise.
    pub min_title_len: usize,
    /// Time between refresh cycles.
    pub interval: Duration,
    /// Path of the persisted article store.
    pub data_file: PathBuf,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://timesofindia.indiatimes.com/".to_string(),
            source: "Times of India".to_string(),
            min_title_len: 10,
            interval: Duration::from_secs(30 * 60),
            data_file: PathBuf::from("news_data.json"),
        }
    }
}

impl WatchConfig {
    /// Base URL with any trailing slash stripped, for prepending to
    /// site-absolute paths.
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        Ok(())
    }
}
