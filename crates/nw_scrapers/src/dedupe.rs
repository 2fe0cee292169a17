use std::collections::HashSet;

use chrono::Utc;
use nw_core::{ArticleRecord, NormalizedKey, RawCandidate, WatchConfig};
use nw_storage::ArticleStore;

/// Result of one dedupe pass: the records to insert, in candidate order,
/// and how many candidates were dropped as already known.
#[derive(Debug)]
pub struct DedupeOutcome {
    pub new_records: Vec<(NormalizedKey, ArticleRecord)>,
    pub skipped: usize,
}

/// Filters scraping noise and drops candidates whose normalized title is
/// already known, either in the store or earlier in the same batch.
pub struct Deduplicator {
    min_title_len: usize,
    source: String,
    origin: String,
}

impl Deduplicator {
    pub fn new(config: &WatchConfig) -> Self {
        Self {
            min_title_len: config.min_title_len,
            source: config.source.clone(),
            origin: config.origin().to_string(),
        }
    }

    pub fn dedupe(&self, candidates: &[RawCandidate], store: &ArticleStore) -> DedupeOutcome {
        let mut new_records = Vec::new();
        let mut seen_in_batch: HashSet<NormalizedKey> = HashSet::new();
        let mut skipped = 0;

        for candidate in candidates {
            let title = candidate.title.trim();
            // navigation labels, icons and other sub-headline noise
            if title.chars().count() <= self.min_title_len {
                continue;
            }
            let key = NormalizedKey::from_title(title);
            if store.contains(&key) || seen_in_batch.contains(&key) {
                skipped += 1;
                continue;
            }
            let record = ArticleRecord {
                title: title.to_string(),
                url: self.resolve_url(&candidate.url),
                timestamp: Utc::now(),
                source: self.source.clone(),
            };
            seen_in_batch.insert(key.clone());
            new_records.push((key, record));
        }

        DedupeOutcome {
            new_records,
            skipped,
        }
    }

    /// Site-absolute paths get the origin prepended and absolute links pass
    /// through. Anything else falls back to the bare origin: imprecise, but
    /// such hrefs carry no better information to resolve against.
    fn resolve_url(&self, raw: &str) -> String {
        if raw.starts_with('/') {
            format!("{}{}", self.origin, raw)
        } else if raw.starts_with("http") {
            raw.to_string()
        } else {
            self.origin.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deduplicator() -> Deduplicator {
        Deduplicator::new(&WatchConfig::default())
    }

    fn empty_store() -> (tempfile::TempDir, ArticleStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::load(dir.path().join("news_data.json")).unwrap();
        (dir, store)
    }

    fn candidate(title: &str, url: &str) -> RawCandidate {
        RawCandidate {
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn title_length_boundary_is_strict() {
        let (_dir, store) = empty_store();
        let outcome = deduplicator().dedupe(
            &[
                candidate("abcdefghij", "/articleshow/1.cms"),  // 10 chars, rejected
                candidate("abcdefghijk", "/articleshow/2.cms"), // 11 chars, accepted
            ],
            &store,
        );
        assert_eq!(outcome.new_records.len(), 1);
        assert_eq!(outcome.new_records[0].1.title, "abcdefghijk");
    }

    #[test]
    fn dedupe_is_idempotent_against_the_store() {
        let (_dir, mut store) = empty_store();
        let candidates = [
            candidate("Government Announces New Policy On Electric Vehicles", "/articleshow/1.cms"),
            candidate("Monsoon Arrives Early Across The Coast", "/articleshow/2.cms"),
        ];

        let first = deduplicator().dedupe(&candidates, &store);
        assert_eq!(first.new_records.len(), 2);
        assert_eq!(first.skipped, 0);
        for (key, record) in first.new_records {
            store.insert(key, record);
        }

        let second = deduplicator().dedupe(&candidates, &store);
        assert!(second.new_records.is_empty());
        assert_eq!(second.skipped, 2);
    }

    #[test]
    fn intra_batch_duplicates_collapse_to_the_first() {
        let (_dir, store) = empty_store();
        let outcome = deduplicator().dedupe(
            &[
                candidate("Election Results Declared In Three States", "/articleshow/1.cms"),
                candidate(" election results  declared in three states ", "/articleshow/2.cms"),
            ],
            &store,
        );
        assert_eq!(outcome.new_records.len(), 1);
        assert_eq!(outcome.skipped, 1);
        assert!(outcome.new_records[0].1.url.ends_with("/articleshow/1.cms"));
    }

    #[test]
    fn accepted_candidates_keep_input_order() {
        let (_dir, store) = empty_store();
        let outcome = deduplicator().dedupe(
            &[
                candidate("First Headline Of The Morning", "/articleshow/1.cms"),
                candidate("Second Headline Of The Morning", "/articleshow/2.cms"),
                candidate("Third Headline Of The Morning", "/articleshow/3.cms"),
            ],
            &store,
        );
        let titles: Vec<_> = outcome.new_records.iter().map(|(_, r)| r.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "First Headline Of The Morning",
                "Second Headline Of The Morning",
                "Third Headline Of The Morning"
            ]
        );
    }

    #[test]
    fn url_resolution_policy() {
        let dedup = deduplicator();
        assert_eq!(
            dedup.resolve_url("/articleshow/1.cms"),
            "https://timesofindia.indiatimes.com/articleshow/1.cms"
        );
        assert_eq!(
            dedup.resolve_url("https://example.com/a"),
            "https://example.com/a"
        );
        // no usable href: fall back to the origin
        assert_eq!(dedup.resolve_url(""), "https://timesofindia.indiatimes.com");
        assert_eq!(
            dedup.resolve_url("articleshow/1.cms"),
            "https://timesofindia.indiatimes.com"
        );
    }

    #[test]
    fn records_carry_the_configured_source_label() {
        let (_dir, store) = empty_store();
        let outcome = deduplicator().dedupe(
            &[candidate("Rail Network Expansion Plan Approved", "/articleshow/1.cms")],
            &store,
        );
        assert_eq!(outcome.new_records[0].1.source, "Times of India");
    }
}
