//! On-disk lookup-table cache.
//!
//! Layout under the cache directory:
//!
//! ```text
//! mmd_k2.json    {"version", "k", "built_at", "checksum", "entries"}
//! mmd_k2.lock    advisory lock taken by writers
//! ```
//!
//! `checksum` is `blake3:<hex>` over `k` and the little-endian bits of every
//! entry. Writers hold the lock, write a temp file and rename it into
//! place, so readers never see a partial document.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::lock::CacheLock;
use crate::cache::{LookupCache, LookupEntry, LookupTable};
use crate::error::{DagologyError, Result};

const FORMAT_VERSION: u32 = 1;
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, Deserialize)]
struct CacheDocument {
    version: u32,
    k: usize,
    built_at: DateTime<Utc>,
    checksum: String,
    entries: Vec<LookupEntry>,
}

/// Lookup-table cache stored as one JSON file per chain length.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
    lock_timeout: Duration,
}

impl FileCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document holding the table for `k`.
    #[must_use]
    pub fn entry_path(&self, k: usize) -> PathBuf {
        self.dir.join(format!("mmd_k{k}.json"))
    }

    fn lock_path(&self, k: usize) -> PathBuf {
        self.dir.join(format!("mmd_k{k}.lock"))
    }
}

fn checksum(k: usize, entries: &[LookupEntry]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(k as u64).to_le_bytes());
    for entry in entries {
        hasher.update(&entry.dimension.to_bits().to_le_bytes());
        hasher.update(&entry.fraction.to_bits().to_le_bytes());
    }
    format!("blake3:{}", hasher.finalize().to_hex())
}

fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, path)
}

impl LookupCache for FileCache {
    fn get(&self, k: usize) -> Result<Option<LookupTable>> {
        let path = self.entry_path(k);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let corrupt = |reason: String| DagologyError::CacheCorrupt { k, reason };
        let doc: CacheDocument =
            serde_json::from_str(&text).map_err(|e| corrupt(format!("parse: {e}")))?;

        if doc.version != FORMAT_VERSION {
            return Err(corrupt(format!("unsupported format version {}", doc.version)));
        }
        if doc.k != k {
            return Err(corrupt(format!("document is for k={}", doc.k)));
        }
        if doc.checksum != checksum(k, &doc.entries) {
            return Err(corrupt("checksum mismatch".to_string()));
        }

        debug!(k, built_at = %doc.built_at, path = %path.display(), "lookup table loaded");
        Ok(Some(LookupTable::new(k, doc.entries)))
    }

    fn put(&mut self, table: &LookupTable) -> Result<()> {
        let k = table.k();
        fs::create_dir_all(&self.dir)?;
        let _lock = CacheLock::acquire(&self.lock_path(k), self.lock_timeout)?;

        let doc = CacheDocument {
            version: FORMAT_VERSION,
            k,
            built_at: Utc::now(),
            checksum: checksum(k, table.entries()),
            entries: table.entries().to_vec(),
        };
        let bytes = serde_json::to_vec(&doc).map_err(io::Error::other)?;

        let path = self.entry_path(k);
        let tmp = path.with_extension(format!("json.tmp.{}", std::process::id()));
        let written = write_then_rename(&tmp, &path, &bytes);
        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written?;

        debug!(k, path = %path.display(), "lookup table persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table(k: usize) -> LookupTable {
        LookupTable::new(
            k,
            (0..5)
                .map(|i| LookupEntry {
                    dimension: 1.0 + 0.01 * f64::from(i),
                    fraction: 1.0 / (3.0 + f64::from(i)),
                })
                .collect(),
        )
    }

    #[test]
    fn miss_then_hit() {
        let tmp = TempDir::new().expect("tempdir");
        let mut cache = FileCache::new(tmp.path().join("cache"));

        assert!(cache.get(2).expect("get").is_none());
        cache.put(&table(2)).expect("put");
        assert_eq!(cache.get(2).expect("get"), Some(table(2)));
        assert!(cache.get(3).expect("get").is_none());
        assert!(cache.entry_path(2).exists());
    }

    #[test]
    fn tampered_entry_is_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let mut cache = FileCache::new(tmp.path());
        cache.put(&table(2)).expect("put");

        let path = cache.entry_path(2);
        let text = fs::read_to_string(&path).expect("read");
        let mut doc: serde_json::Value = serde_json::from_str(&text).expect("json");
        doc["entries"][0]["fraction"] = serde_json::json!(0.999);
        fs::write(&path, doc.to_string()).expect("write");

        assert!(matches!(
            cache.get(2),
            Err(DagologyError::CacheCorrupt { k: 2, .. })
        ));
    }

    #[test]
    fn garbage_is_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let cache = FileCache::new(tmp.path());
        fs::write(cache.entry_path(4), "not json").expect("write");
        assert!(matches!(
            cache.get(4),
            Err(DagologyError::CacheCorrupt { k: 4, .. })
        ));
    }

    #[test]
    fn rewrite_replaces_entry() {
        let tmp = TempDir::new().expect("tempdir");
        let mut cache = FileCache::new(tmp.path());
        cache.put(&table(2)).expect("put");

        let shorter = LookupTable::new(2, table(2).entries()[..2].to_vec());
        cache.put(&shorter).expect("put");
        assert_eq!(cache.get(2).expect("get"), Some(shorter));
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let tmp = TempDir::new().expect("tempdir");
        let mut cache = FileCache::new(tmp.path());
        // A non-empty directory where the document belongs makes the rename fail.
        let blocker = cache.entry_path(2);
        fs::create_dir(&blocker).expect("mkdir");
        fs::write(blocker.join("keep"), "x").expect("write");

        assert!(cache.put(&table(2)).is_err());
        let leftovers: Vec<_> = fs::read_dir(tmp.path())
            .expect("read dir")
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty(), "{leftovers:?}");
    }
}
