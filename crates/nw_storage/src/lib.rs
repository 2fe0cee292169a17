pub mod matcher;
pub mod store;

pub use matcher::{check_news_exists, SimilarityMatcher};
pub use store::{persist_shared, ArticleStore, SharedStore};

pub mod prelude {
    pub use super::{check_news_exists, ArticleStore, SharedStore, SimilarityMatcher};
    pub use nw_core::{ArticleRecord, Error, NormalizedKey, Result};
}
