pub mod config;
pub mod error;
pub mod types;

pub use config::WatchConfig;
pub use error::Error;
pub use types::{ArticleRecord, NormalizedKey, RawCandidate};

pub type Result<T> = std::result::Result<T, Error>;
