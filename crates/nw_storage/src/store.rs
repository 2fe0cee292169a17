use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nw_core::{ArticleRecord, Error, NormalizedKey, Result};
use tokio::sync::RwLock;
use tracing::debug;

/// Handle shared between the refresh scheduler and the query paths.
/// Scans take the read lock; the scheduler's insert batch takes the write
/// lock briefly, and file I/O happens outside any lock.
pub type SharedStore = Arc<RwLock<ArticleStore>>;

/// Append-only mapping from normalized title to the first record captured
/// for it, backed by a single JSON file.
pub struct ArticleStore {
    path: PathBuf,
    articles: HashMap<NormalizedKey, ArticleRecord>,
    dirty: bool,
}

impl ArticleStore {
    /// Loads persisted state. A missing file yields an empty store; a file
    /// that exists but cannot be parsed is a fatal [`Error::CorruptState`],
    /// since quietly starting over would discard the capture history.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let articles = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| Error::CorruptState {
                    path: path.clone(),
                    source,
                })?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        debug!(articles = articles.len(), path = %path.display(), "loaded article store");
        Ok(Self {
            path,
            articles,
            dirty: false,
        })
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    pub fn contains(&self, key: &NormalizedKey) -> bool {
        self.articles.contains_key(key)
    }

    /// First-seen wins: inserting under an already-present key is a no-op.
    pub fn insert(&mut self, key: NormalizedKey, record: ArticleRecord) {
        if let std::collections::hash_map::Entry::Vacant(entry) = self.articles.entry(key) {
            entry.insert(record);
            self.dirty = true;
        }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// True when there are inserts not yet persisted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clone of the current mapping, for scans that must not hold the lock.
    pub fn snapshot(&self) -> HashMap<NormalizedKey, ArticleRecord> {
        self.articles.clone()
    }

    /// Writes the full mapping to the data file via a temp file in the same
    /// directory plus an atomic rename, so a concurrent reader never observes
    /// a half-written document.
    pub fn persist(&mut self) -> Result<()> {
        write_mapping(&self.path, &self.articles)?;
        self.dirty = false;
        Ok(())
    }
}

/// Persists a shared store without holding any lock across the file I/O:
/// the mapping is snapshotted under the read lock and written afterwards.
/// The scheduler is the sole writer, so no insert can slip in between the
/// snapshot and the dirty-flag reset.
pub async fn persist_shared(store: &SharedStore) -> Result<()> {
    let (path, snapshot) = {
        let guard = store.read().await;
        (guard.path.clone(), guard.articles.clone())
    };
    write_mapping(&path, &snapshot)?;
    store.write().await.dirty = false;
    Ok(())
}

fn write_mapping(path: &Path, articles: &HashMap<NormalizedKey, ArticleRecord>) -> Result<()> {
    let persist_err = |source: std::io::Error| Error::Persistence {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(persist_err)?;
    serde_json::to_writer_pretty(&mut tmp, articles).map_err(|e| persist_err(e.into()))?;
    tmp.persist(path).map_err(|e| persist_err(e.error))?;
    debug!(articles = articles.len(), path = %path.display(), "persisted article store");
    Ok(())
}
