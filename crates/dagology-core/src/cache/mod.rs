//! Lookup tables from ordering fraction to Myrheim–Meyer dimension.
//!
//! # Overview
//!
//! Inverting the Myrheim–Meyer formula means scanning a dense dimension
//! grid, so the scan is built once per chain length `k` and kept in a
//! [`LookupCache`]. The caller owns the cache and picks the backend:
//!
//! - [`MemoryCache`]: process-local map.
//! - [`FileCache`]: one JSON document per `k` under a cache directory.
//!
//! A backend reports a damaged entry as
//! [`DagologyError::CacheCorrupt`](crate::error::DagologyError::CacheCorrupt);
//! the read-through helper in [`crate::dimension::myrheim_meyer`] treats
//! that as a miss and rebuilds. Entries are append-only per `k` and
//! rebuilding is idempotent, so racing writers only cost redundant work.

mod file;
mod lock;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use file::FileCache;

/// Largest grid dimension; returned when the ordering fraction lies below
/// every grid value.
pub const D_MAX: f64 = 9.99;

/// One grid point: the analytic ordering fraction at `dimension`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub dimension: f64,
    pub fraction: f64,
}

/// Grid of analytic ordering fractions for one chain length, in ascending
/// dimension order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupTable {
    k: usize,
    entries: Vec<LookupEntry>,
}

impl LookupTable {
    #[must_use]
    pub const fn new(k: usize, entries: Vec<LookupEntry>) -> Self {
        Self { k, entries }
    }

    /// Chain length this table was built for.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    #[must_use]
    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    /// First grid dimension whose fraction drops below `fraction`.
    ///
    /// The analytic fraction decreases with dimension; when it never drops
    /// below `fraction` the estimate saturates at [`D_MAX`].
    #[must_use]
    pub fn lookup(&self, fraction: f64) -> f64 {
        self.entries
            .iter()
            .find(|entry| entry.fraction < fraction)
            .map_or(D_MAX, |entry| entry.dimension)
    }
}

/// Storage for lookup tables keyed by chain length.
pub trait LookupCache {
    /// Fetch the table for `k`, or `None` on a miss.
    ///
    /// # Errors
    ///
    /// Backend I/O failures, or [`DagologyError::CacheCorrupt`](crate::error::DagologyError::CacheCorrupt)
    /// for an entry that exists but cannot be trusted.
    fn get(&self, k: usize) -> Result<Option<LookupTable>>;

    /// Store `table` under `table.k()`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Backend I/O failures.
    fn put(&mut self, table: &LookupTable) -> Result<()>;
}

/// In-process cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    tables: HashMap<usize, LookupTable>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl LookupCache for MemoryCache {
    fn get(&self, k: usize) -> Result<Option<LookupTable>> {
        Ok(self.tables.get(&k).cloned())
    }

    fn put(&mut self, table: &LookupTable) -> Result<()> {
        self.tables.insert(table.k(), table.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LookupTable {
        LookupTable::new(
            2,
            vec![
                LookupEntry { dimension: 1.0, fraction: 0.5 },
                LookupEntry { dimension: 2.0, fraction: 0.25 },
                LookupEntry { dimension: 3.0, fraction: 0.1 },
            ],
        )
    }

    #[test]
    fn lookup_returns_first_smaller_fraction() {
        let t = table();
        assert!((t.lookup(0.3) - 2.0).abs() < f64::EPSILON);
        assert!((t.lookup(0.6) - 1.0).abs() < f64::EPSILON);
        assert!((t.lookup(0.25) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lookup_saturates() {
        assert!((table().lookup(0.01) - D_MAX).abs() < f64::EPSILON);
    }

    #[test]
    fn memory_cache_round_trip() {
        let mut cache = MemoryCache::new();
        assert!(cache.get(2).expect("get").is_none());
        cache.put(&table()).expect("put");
        assert_eq!(cache.get(2).expect("get"), Some(table()));
        assert_eq!(cache.len(), 1);
    }
}
