//! Local durable storage for the favorites set.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Fixed key under which the favorites set is persisted locally.
pub const FAVORITES_KEY: &str = "favorite_meal_ids";

/// Errors reading or writing the local favorites file.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("failed to access favorites file: {0}")]
    Io(#[from] io::Error),
    #[error("favorites file is not a valid id list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-device persisted copy of the favorites set.
///
/// One JSON file per data directory, named after [`FAVORITES_KEY`], holding a
/// list of identifier strings. Every write replaces the whole list; the
/// stored order carries no meaning.
#[derive(Debug, Clone)]
pub struct FavoritesFile {
    path: PathBuf,
}

impl FavoritesFile {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{FAVORITES_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored id list. An absent file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<Vec<String>>, LocalStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let ids: Vec<String> = serde_json::from_str(&contents)?;
        Ok(Some(ids))
    }

    /// Replaces the stored list with `ids`, creating the data directory on
    /// first write. Ids are written sorted so saving the same set twice
    /// produces identical files.
    pub fn save(&self, ids: &HashSet<String>) -> Result<(), LocalStoreError> {
        let mut list: Vec<&str> = ids.iter().map(String::as_str).collect();
        list.sort_unstable();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(&list)?)?;
        Ok(())
    }
}
