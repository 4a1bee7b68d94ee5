//! Backend-agnostic token cache
//!
//! Real text repeats the same words constantly, so tokenizations are kept in
//! an LRU keyed by everything that can change the result: the word, the
//! system it was tokenized against and the active modes.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::types::Token;
use crate::Selection;

const DEFAULT_CAPACITY: usize = 4096;

/// Key for caching tokenizer results
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenCacheKey {
    pub word: String,
    /// [`System::id`](crate::System::id) of the system used
    pub system_id: u64,
    pub modes: Selection,
}

impl TokenCacheKey {
    pub fn new(word: impl Into<String>, system_id: u64, modes: &Selection) -> Self {
        Self {
            word: word.into(),
            system_id,
            modes: modes.clone(),
        }
    }
}

/// LRU of tokenizations, safe to share between threads
pub struct TokenCache {
    entries: Mutex<LruCache<TokenCacheKey, Vec<Token>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A capacity of zero is treated as one
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &TokenCacheKey) -> Option<Vec<Token>> {
        let hit = self.entries.lock().get(key).cloned();
        let counter = if hit.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        hit
    }

    pub fn insert(&self, key: TokenCacheKey, tokens: Vec<Token>) {
        self.entries.lock().put(key, tokens);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStats {
            hits,
            misses,
            entries: self.len(),
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("stats", &self.stats())
            .finish()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub hit_rate: f64,
}

/// A token cache shared between pipelines
pub type SharedTokenCache = Arc<TokenCache>;
