//! File-backed durable key-value store.
//!
//! One file per key under a base directory. Writes go through a temporary
//! file plus atomic rename, so a failed write never corrupts the previous
//! record and never touches other keys.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use voyago_core::error::Result;
use voyago_core::store::KeyValueStore;

use crate::paths::VoyagoPaths;

/// Durable store keeping each key in `<dir>/<key>.json`.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store at the platform default state directory.
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(VoyagoPaths::state_dir()?))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{key}.json.tmp"))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.entry_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write to a temporary file, then atomically rename into place.
        let tmp = self.temp_path(key);
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, self.entry_path(key)).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
