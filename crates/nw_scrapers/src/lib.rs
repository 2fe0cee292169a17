pub mod dedupe;
pub mod scheduler;
pub mod source;

pub use dedupe::{DedupeOutcome, Deduplicator};
pub use scheduler::RefreshScheduler;
pub use source::{CandidateSource, HomepageScraper};

pub mod prelude {
    pub use super::{CandidateSource, Deduplicator, HomepageScraper, RefreshScheduler};
    pub use nw_core::{ArticleRecord, Error, RawCandidate, Result};
}
