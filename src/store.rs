//! Recent-search persistence: one JSON array in the user data directory

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::state::RecentSearches;

pub const RECENT_FILE_NAME: &str = "recent_searches.json";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("recent searches file is corrupted: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct RecentStore {
    path: PathBuf,
}

impl RecentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store inside `dir`, using the standard file name
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(RECENT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored list. A missing file is an empty list.
    pub async fn load(&self) -> Result<RecentSearches, StoreError> {
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RecentSearches::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let saved: Vec<String> = serde_json::from_str(&json)?;
        Ok(RecentSearches::from_saved(saved))
    }

    /// Read the stored list, falling back to empty on any error.
    pub async fn load_or_default(&self) -> RecentSearches {
        match self.load().await {
            Ok(recent) => recent,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable recent searches");
                RecentSearches::new()
            }
        }
    }

    /// Overwrite the stored list.
    pub async fn save(&self, cities: &[String]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        let json = serde_json::to_string(cities)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }
}
