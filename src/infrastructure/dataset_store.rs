//! Durable card dataset
//!
//! The dataset is one JSON object keyed by card id, loaded once before the
//! first request and rewritten in full after every page.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::domain::card::CardRecord;
use crate::infrastructure::error::{CollectorError, CollectorResult};

/// Accumulated card records keyed by id, in insertion order
///
/// Entries loaded from disk stay raw JSON so older layouts are written back
/// exactly as found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    entries: Map<String, Value>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.entries.get(id)
    }

    /// Insert `record` under `id` unless the key is already present
    ///
    /// Returns `true` when the record was added. An existing value is never
    /// replaced, even if `record` differs from it.
    pub fn insert_if_absent(&mut self, id: &str, record: &CardRecord) -> CollectorResult<bool> {
        if self.entries.contains_key(id) {
            return Ok(false);
        }
        let value = serde_json::to_value(record)?;
        self.entries.insert(id.to_string(), value);
        Ok(true)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for Dataset {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

/// Dataset snapshot stored as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonDatasetStore {
    path: PathBuf,
}

impl JsonDatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot; a missing file is an empty dataset
    pub async fn load(&self) -> CollectorResult<Dataset> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No dataset at {:?}, starting empty", self.path);
                return Ok(Dataset::new());
            }
            Err(e) => return Err(CollectorError::io(&self.path, e)),
        };

        let entries: Map<String, Value> = serde_json::from_str(&contents)?;
        info!("Loaded {} cards from {:?}", entries.len(), self.path);
        Ok(Dataset::from(entries))
    }

    /// Like [`load`](Self::load), but an unreadable snapshot is logged and
    /// replaced by an empty dataset
    pub async fn load_or_empty(&self) -> Dataset {
        match self.load().await {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!("Failed to load dataset {:?}, starting empty: {}", self.path, e);
                Dataset::new()
            }
        }
    }

    /// Rewrite the whole snapshot
    ///
    /// The JSON goes to a sibling `.tmp` file first and is then renamed over
    /// the target, so an interrupted save leaves the previous snapshot intact.
    pub async fn save(&self, dataset: &Dataset) -> CollectorResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CollectorError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(&dataset.entries)?;
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|e| CollectorError::io(&temp_path, e))?;

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                warn!("Failed to remove {:?}: {}", temp_path, cleanup);
            }
            return Err(CollectorError::io(&self.path, e));
        }

        debug!("Saved {} cards to {:?}", dataset.len(), self.path);
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
