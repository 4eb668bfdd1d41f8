//! File-backed [`KeyValueStore`].
//!
//! One file per key inside a data directory, named after the key and holding
//! the value verbatim. Writes go to a temporary file that is then renamed over
//! the target, so a crash mid-write leaves either the old value or the new one.

use std::io::ErrorKind;
use std::path::PathBuf;
use todolist_core::storage::{KeyValueStore, StorageError, StorageFuture};

/// Key-value store that keeps each key in its own file
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`
    ///
    /// The directory is created lazily on the first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`
    ///
    /// Characters outside `[A-Za-z0-9._-]` are replaced with `_` so a key can
    /// never escape the data directory.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(file_name(key))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.tmp", file_name(key)))
    }
}

fn file_name(key: &str) -> String {
    let name: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match name.trim_start_matches('.') {
        "" => "_".to_string(),
        trimmed => trimmed.to_string(),
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>> {
        Box::pin(async move {
            match tokio::fs::read_to_string(self.path_for(key)).await {
                Ok(value) => Ok(Some(value)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(StorageError::io(key, e)),
            }
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            tokio::fs::create_dir_all(&self.dir)
                .await
                .map_err(|e| StorageError::io(key, e))?;

            let path = self.path_for(key);
            let tmp = self.temp_path_for(key);
            tokio::fs::write(&tmp, value)
                .await
                .map_err(|e| StorageError::io(key, e))?;
            tokio::fs::rename(&tmp, &path)
                .await
                .map_err(|e| StorageError::io(key, e))?;

            tracing::trace!(%key, path = %path.display(), "Wrote key");
            Ok(())
        })
    }
}
