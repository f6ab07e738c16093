//! Durable persistence of the small index-freshness document.
//!
//! This is an optimization, never a correctness requirement: the index can
//! always be rebuilt from the canonical store, so every failure path here
//! degrades to "no persisted state" and gets logged rather than surfaced.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::types::{IndexMetadata, METADATA_VERSION};

const METADATA_FILE: &str = "index-metadata.json";

/// Key-value persistence for [`IndexMetadata`], one JSON file at a fixed path.
///
/// Cloneable so incremental saves can be shipped off to a background task.
#[derive(Debug, Clone)]
pub struct IndexMetadataStore {
    path: PathBuf,
}

impl IndexMetadataStore {
    /// A store writing to an explicit path. Used by tests and embedders that
    /// manage their own data directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        IndexMetadataStore { path: path.into() }
    }

    /// The store at the application's private data directory
    /// (`<data-dir>/octavo/index-metadata.json`), falling back to the
    /// current directory when the platform reports no data dir.
    pub fn at_default_location() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        IndexMetadataStore {
            path: base.join("octavo").join(METADATA_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize to JSON and atomically replace the metadata file.
    ///
    /// Write-to-temp-then-rename: a crash mid-write leaves either the old
    /// file or the new one, never a torn document.
    pub fn save(&self, metadata: &IndexMetadata) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(metadata)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Load the persisted metadata, if any.
    ///
    /// An absent file, unreadable file, parse failure, or unknown schema
    /// version are all the same thing to callers: no persisted state.
    pub fn load(&self) -> Option<IndexMetadata> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read index metadata");
                return None;
            }
        };
        match serde_json::from_slice::<IndexMetadata>(&bytes) {
            Ok(meta) if meta.version == METADATA_VERSION => Some(meta),
            Ok(meta) => {
                tracing::debug!(
                    version = meta.version,
                    "ignoring index metadata with unknown schema version"
                );
                None
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to parse index metadata");
                None
            }
        }
    }

    /// Remove the metadata file. Already-absent is not an error.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;
    use uuid::Uuid;

    fn store() -> (tempfile::TempDir, IndexMetadataStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexMetadataStore::new(dir.path().join("index-metadata.json"));
        (dir, store)
    }

    fn metadata() -> IndexMetadata {
        IndexMetadata::new(
            [Uuid::new_v4(), Uuid::new_v4()].into_iter().collect(),
            Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = store();
        let meta = metadata();
        store.save(&meta).unwrap();
        assert_eq!(store.load(), Some(meta));
    }

    #[test]
    fn save_leaves_no_temp_debris() {
        let (dir, store) = store();
        store.save(&metadata()).unwrap();
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["index-metadata.json".to_string()]);
    }

    #[test]
    fn absent_file_loads_as_none() {
        let (_dir, store) = store();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn corrupt_file_loads_as_none() {
        let (_dir, store) = store();
        fs::write(store.path(), b"{ not json").unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn unknown_version_loads_as_none() {
        let (_dir, store) = store();
        let mut meta = metadata();
        meta.version = 99;
        fs::write(store.path(), serde_json::to_vec(&meta).unwrap()).unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let (_dir, store) = store();
        store.save(&metadata()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
        store.clear().unwrap(); // already gone
    }

    #[test]
    fn save_creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("index-metadata.json");
        let store = IndexMetadataStore::new(&nested);
        store.save(&metadata()).unwrap();
        assert!(nested.exists());
        let ids: HashSet<Uuid> = store.load().unwrap().book_ids;
        assert_eq!(ids.len(), 2);
    }
}
