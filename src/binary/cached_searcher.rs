//! Cached region searcher with hot reload support.
//!
//! This module provides a thread-safe searcher with:
//! - A bounded cache of lookup results keyed by address
//! - Atomic hot reload for swapping in a new index without downtime

use arc_swap::ArcSwap;
use quick_cache::sync::Cache;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::memory::MemorySearcher;
use crate::{IpQuery, RegionInfo, Result};

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Configuration for the cached searcher.
#[derive(Debug, Clone)]
pub struct CachedSearcherConfig {
    /// Maximum number of entries in the cache.
    pub cache_capacity: usize,
    /// Whether to enable caching.
    pub cache_enabled: bool,
}

impl Default for CachedSearcherConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_enabled: true,
        }
    }
}

impl CachedSearcherConfig {
    /// Create a new configuration with the specified cache capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache_capacity: capacity,
            cache_enabled: true,
        }
    }

    /// Create a configuration with caching disabled.
    pub fn no_cache() -> Self {
        Self {
            cache_capacity: 0,
            cache_enabled: false,
        }
    }
}

/// Thread-safe region searcher with result caching and hot reload.
///
/// Wraps a [`MemorySearcher`] and adds:
/// - A cache of results (hits and misses) to skip repeated searches
/// - Atomic replacement of the index without blocking readers
///
/// # Example
///
/// ```ignore
/// use ip2region::CachedRegionSearcher;
/// use std::path::Path;
///
/// let searcher = CachedRegionSearcher::open(Path::new("ip2region.db"))?;
/// let region = searcher.search("1.0.0.128")?;
///
/// // Swap in a freshly built index
/// searcher.reload(Path::new("ip2region_new.db"))?;
/// ```
pub struct CachedRegionSearcher {
    /// The underlying searcher, wrapped in ArcSwap for atomic replacement.
    inner: ArcSwap<MemorySearcher>,
    /// Cache of lookup results.
    cache: Option<Cache<u32, Option<RegionInfo>>>,
    /// Configuration.
    config: CachedSearcherConfig,
    /// Number of reloads so far.
    generation: AtomicU64,
}

impl CachedRegionSearcher {
    /// Open an index file with default configuration.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_config(path, CachedSearcherConfig::default())
    }

    /// Open an index file with custom configuration.
    pub fn open_with_config(path: &Path, config: CachedSearcherConfig) -> Result<Self> {
        Ok(Self::with_searcher(MemorySearcher::open(path)?, config))
    }

    /// Create from bytes with default configuration.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_config(data, CachedSearcherConfig::default())
    }

    /// Create from bytes with custom configuration.
    pub fn from_bytes_with_config(data: Vec<u8>, config: CachedSearcherConfig) -> Result<Self> {
        Ok(Self::with_searcher(MemorySearcher::from_bytes(data)?, config))
    }

    /// Wrap an already loaded searcher.
    pub fn with_searcher(searcher: MemorySearcher, config: CachedSearcherConfig) -> Self {
        let cache = if config.cache_enabled && config.cache_capacity > 0 {
            Some(Cache::new(config.cache_capacity))
        } else {
            None
        };

        Self {
            inner: ArcSwap::from_pointee(searcher),
            cache,
            config,
            generation: AtomicU64::new(0),
        }
    }

    /// Hot reload the index from a new file.
    ///
    /// In-flight lookups finish against the old index; new lookups see the
    /// new one. The cache is cleared.
    pub fn reload(&self, path: &Path) -> Result<()> {
        self.swap(MemorySearcher::open(path)?);
        log::info!("Hot reloaded index from {:?}", path);
        Ok(())
    }

    /// Hot reload the index from bytes.
    pub fn reload_from_bytes(&self, data: Vec<u8>) -> Result<()> {
        self.swap(MemorySearcher::from_bytes(data)?);
        log::info!("Hot reloaded index from bytes");
        Ok(())
    }

    fn swap(&self, searcher: MemorySearcher) {
        self.inner.store(Arc::new(searcher));
        self.generation.fetch_add(1, Ordering::SeqCst);

        if let Some(ref cache) = self.cache {
            cache.clear();
        }
    }

    /// Resolve `ip`, consulting the cache first.
    ///
    /// Misses are cached too; errors are not.
    pub fn search(&self, ip: impl IpQuery) -> Result<Option<RegionInfo>> {
        let ip = ip.to_ip_num()?;

        if let Some(ref cache) = self.cache {
            if let Some(result) = cache.get(&ip) {
                return Ok(result);
            }
        }

        let result = self.inner.load().search(ip)?;

        if let Some(ref cache) = self.cache {
            cache.insert(ip, result.clone());
        }

        Ok(result)
    }

    /// Clear the cache.
    pub fn clear_cache(&self) {
        if let Some(ref cache) = self.cache {
            cache.clear();
        }
    }

    /// Get cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        if let Some(ref cache) = self.cache {
            CacheStats {
                capacity: self.config.cache_capacity,
                len: cache.len(),
                enabled: true,
            }
        } else {
            CacheStats {
                capacity: 0,
                len: 0,
                enabled: false,
            }
        }
    }

    /// Get the current generation (incremented on each reload).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Get the underlying searcher.
    ///
    /// The returned handle keeps the index it was loaded from alive, even
    /// across a later reload.
    pub fn inner(&self) -> Arc<MemorySearcher> {
        self.inner.load_full()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Maximum cache capacity.
    pub capacity: usize,
    /// Current number of entries in the cache.
    pub len: usize,
    /// Whether caching is enabled.
    pub enabled: bool,
}
