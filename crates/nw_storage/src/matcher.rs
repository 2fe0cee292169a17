use std::collections::HashSet;

use nw_core::ArticleRecord;

use crate::store::SharedStore;

const DEFAULT_THRESHOLD: f64 = 0.7;

/// Fuzzy headline lookup: a query matches a stored article when either text
/// contains the other, or their word sets overlap by a Jaccard score above
/// the threshold (strictly greater).
#[derive(Debug, Clone)]
pub struct SimilarityMatcher {
    threshold: f64,
}

impl SimilarityMatcher {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Returns the first stored article the query matches, scanning in the
    /// iterator's order. An empty query matches nothing: the naive substring
    /// rule would make it match every title, which is never what a caller
    /// asking "is this headline known" wants.
    pub fn matches<'a, I>(&self, query: &str, articles: I) -> Option<ArticleRecord>
    where
        I: IntoIterator<Item = &'a ArticleRecord>,
    {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        for article in articles {
            let title = article.title.to_lowercase();
            if title.contains(&query)
                || query.contains(&title)
                || jaccard(&query, &title) > self.threshold
            {
                return Some(article.clone());
            }
        }
        None
    }
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// |intersection| / |union| of the whitespace-delimited token sets; 0.0 when
/// both sides tokenize to nothing.
fn jaccard(a: &str, b: &str) -> f64 {
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

/// Direct pass-through query used by the web and CLI surfaces. Scans a
/// snapshot so a write-in-progress never blocks the caller.
pub async fn check_news_exists(
    store: &SharedStore,
    user_input: &str,
) -> (bool, Option<ArticleRecord>) {
    let snapshot = store.read().await.snapshot();
    let matched = SimilarityMatcher::new().matches(user_input, snapshot.values());
    (matched.is_some(), matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ArticleStore;
    use chrono::Utc;
    use nw_core::NormalizedKey;

    fn article(title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            url: "https://example.com/articleshow/1.cms".to_string(),
            timestamp: Utc::now(),
            source: "test".to_string(),
        }
    }

    #[test]
    fn substring_in_either_direction_matches() {
        let stored = [article("Government Announces New Policy On Electric Vehicles")];
        let matcher = SimilarityMatcher::new();

        // query contained in the title
        assert!(matcher
            .matches("new policy on electric vehicles", stored.iter())
            .is_some());
        // title contained in the query
        assert!(matcher
            .matches(
                "breaking: government announces new policy on electric vehicles today",
                stored.iter()
            )
            .is_some());
        assert!(matcher
            .matches("completely unrelated sports result", stored.iter())
            .is_none());
    }

    #[test]
    fn jaccard_above_threshold_matches_without_containment() {
        // same 9 tokens in a different order: Jaccard 1.0, no substring relation
        let stored = [article("Ministry Plans Electric Vehicle Subsidy Rollout Next Year Nationwide")];
        let found = SimilarityMatcher::new().matches(
            "nationwide ministry plans electric vehicle subsidy rollout next year",
            stored.iter(),
        );
        assert!(found.is_some());
    }

    #[test]
    fn jaccard_of_exactly_seven_tenths_does_not_match() {
        // shared tokens: ministry plans electric vehicle subsidy rollout next (7)
        // title adds: year nationwide; query adds: month
        // intersection 7, union 10 -> exactly 0.7, strict > excludes it
        let stored = [article("Ministry Plans Electric Vehicle Subsidy Rollout Next Year Nationwide")];
        let found = SimilarityMatcher::new().matches(
            "ministry plans electric vehicle subsidy rollout next month",
            stored.iter(),
        );
        assert!(found.is_none());
    }

    #[test]
    fn empty_query_matches_nothing() {
        let stored = [article("Government Announces New Policy On Electric Vehicles")];
        let matcher = SimilarityMatcher::new();
        assert!(matcher.matches("", stored.iter()).is_none());
        assert!(matcher.matches("   ", stored.iter()).is_none());
    }

    #[test]
    fn jaccard_is_zero_on_empty_union() {
        assert_eq!(jaccard("", ""), 0.0);
    }

    #[tokio::test]
    async fn check_news_exists_reads_the_shared_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::load(dir.path().join("news_data.json"))
            .unwrap()
            .into_shared();

        let title = "Government Announces New Policy On Electric Vehicles";
        store
            .write()
            .await
            .insert(NormalizedKey::from_title(title), article(title));

        let (found, matched) = check_news_exists(&store, "new policy on electric vehicles").await;
        assert!(found);
        assert_eq!(matched.unwrap().title, title);

        let (found, matched) = check_news_exists(&store, "completely unrelated sports result").await;
        assert!(!found);
        assert!(matched.is_none());
    }
}
