//! Two-tier key/value store with TTL expiry.
//!
//! The fast tier is an in-process map; the durable tier is one JSON file
//! per key under the cache directory. Both tiers carry an explicitly
//! stored creation timestamp, and validity is always decided from that
//! timestamp, never from file metadata. Expiry is lazy: entries are
//! checked (and dropped) at read time, there is no background sweeper.
//!
//! Durable-tier I/O is soft: a failed write or an unreadable/corrupt
//! entry is logged and degrades to cache-miss behavior. A read miss is a
//! normal outcome, never an error.

use super::key::CacheKey;
use crate::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

#[derive(Clone)]
struct MemEntry {
    value: Value,
    created_at_ms: u64,
}

/// On-disk entry format: self-describing and human-diffable.
#[derive(Serialize, Deserialize)]
struct DurableEntry {
    value: Value,
    created_at_ms: u64,
}

/// Cache statistics snapshot; observability only.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub fast_count: usize,
    pub durable_count: usize,
    pub ttl_secs: u64,
    pub location: String,
}

/// Generic two-tier TTL cache.
pub struct CacheStore {
    dir: PathBuf,
    ttl: Duration,
    fast: RwLock<HashMap<String, MemEntry>>,
}

impl CacheStore {
    /// Open (or create) a cache rooted at `dir` with a fixed TTL.
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            ttl,
            fast: RwLock::new(HashMap::new()),
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store a value in the fast tier and, when `persist` is set, in the
    /// durable tier. Durable-tier failures are logged and swallowed; the
    /// fast tier remains authoritative until process restart.
    pub async fn set<T: Serialize>(&self, key: &CacheKey, value: &T, persist: bool) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!(key = %key, error = %e, "failed to encode cache value");
                return;
            }
        };
        let created_at_ms = now_ms();
        {
            let mut fast = self.fast.write().unwrap();
            fast.insert(
                key.as_str().to_string(),
                MemEntry {
                    value: value.clone(),
                    created_at_ms,
                },
            );
        }
        if persist {
            let entry = DurableEntry {
                value,
                created_at_ms,
            };
            let path = self.entry_path(key);
            match serde_json::to_vec_pretty(&entry) {
                Ok(bytes) => {
                    if let Err(e) = tokio::fs::write(&path, bytes).await {
                        warn!(key = %key, error = %e, "failed to write durable cache entry");
                    }
                }
                Err(e) => warn!(key = %key, error = %e, "failed to encode durable cache entry"),
            }
        }
    }

    /// Look up a value: fast tier first, then the durable tier. A valid
    /// durable hit is promoted into the fast tier with its original
    /// creation time. Expired entries behave as absent.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        if let Some(entry) = self.get_fast(key) {
            return decode(key, entry.value);
        }
        let entry = self.get_durable(key).await?;
        {
            let mut fast = self.fast.write().unwrap();
            fast.insert(
                key.as_str().to_string(),
                MemEntry {
                    value: entry.value.clone(),
                    created_at_ms: entry.created_at_ms,
                },
            );
        }
        decode(key, entry.value)
    }

    /// Remove a key from both tiers; idempotent on missing keys.
    pub async fn delete(&self, key: &CacheKey) {
        {
            let mut fast = self.fast.write().unwrap();
            fast.remove(key.as_str());
        }
        if let Err(e) = tokio::fs::remove_file(self.entry_path(key)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(key = %key, error = %e, "failed to delete durable cache entry");
            }
        }
    }

    /// Empty both tiers entirely; idempotent.
    pub async fn clear(&self) {
        {
            let mut fast = self.fast.write().unwrap();
            fast.clear();
        }
        match tokio::fs::read_dir(&self.dir).await {
            Ok(mut entries) => {
                while let Ok(Some(entry)) = entries.next_entry().await {
                    let path = entry.path();
                    if path.extension().is_some_and(|ext| ext == "json") {
                        if let Err(e) = tokio::fs::remove_file(&path).await {
                            warn!(path = %path.display(), error = %e, "failed to clear durable cache entry");
                        }
                    }
                }
            }
            Err(e) => warn!(error = %e, "failed to list durable cache directory"),
        }
    }

    /// Snapshot of entry counts and configuration. The fast count skips
    /// expired entries; the durable count is the raw entry-file count.
    pub fn stats(&self) -> CacheStats {
        let fast_count = {
            let fast = self.fast.read().unwrap();
            fast.values().filter(|e| self.is_fresh(e.created_at_ms)).count()
        };
        let durable_count = std::fs::read_dir(&self.dir)
            .map(|entries| {
                entries
                    .flatten()
                    .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                    .count()
            })
            .unwrap_or(0);
        CacheStats {
            fast_count,
            durable_count,
            ttl_secs: self.ttl.as_secs(),
            location: self.dir.display().to_string(),
        }
    }

    fn get_fast(&self, key: &CacheKey) -> Option<MemEntry> {
        let mut fast = self.fast.write().unwrap();
        match fast.get(key.as_str()) {
            Some(entry) if self.is_fresh(entry.created_at_ms) => Some(entry.clone()),
            Some(_) => {
                fast.remove(key.as_str());
                None
            }
            None => None,
        }
    }

    async fn get_durable(&self, key: &CacheKey) -> Option<DurableEntry> {
        let path = self.entry_path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "failed to read durable cache entry");
                return None;
            }
        };
        let entry: DurableEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                // A crash mid-write can leave a truncated file; treat it
                // as a miss, not an error.
                warn!(key = %key, error = %e, "corrupt durable cache entry, treating as miss");
                return None;
            }
        };
        if !self.is_fresh(entry.created_at_ms) {
            debug!(key = %key, "durable cache entry expired");
            let _ = tokio::fs::remove_file(&path).await;
            return None;
        }
        Some(entry)
    }

    fn is_fresh(&self, created_at_ms: u64) -> bool {
        now_ms().saturating_sub(created_at_ms) < self.ttl.as_millis() as u64
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }

    pub fn location(&self) -> &Path {
        &self.dir
    }
}

fn decode<T: DeserializeOwned>(key: &CacheKey, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key = %key, error = %e, "cached value does not match expected shape");
            None
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
