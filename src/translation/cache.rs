/*!
 * Translation caching functionality.
 *
 * Emergency notices are short and often re-assessed while an operator edits
 * them, so repeated (text, target language) pairs are answered from memory.
 * The cache is bounded; once full, the oldest entry is evicted first.
 */

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

/// Entries kept before the oldest is evicted
pub const DEFAULT_CAPACITY: usize = 512;

type CacheKey = (String, String);

/// Hit and miss counters of a cache
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that found nothing
    pub misses: usize,
    /// Entries dropped to stay within capacity
    pub evictions: usize,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache, 0 when nothing was looked up
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, String>,
    /// Keys in insertion order
    order: VecDeque<CacheKey>,
    stats: CacheStats,
}

/// Bounded translation cache shared between clones of a service
#[derive(Clone)]
pub struct TranslationCache {
    state: Arc<Mutex<CacheState>>,
    capacity: usize,
}

impl TranslationCache {
    /// Cache holding up to `DEFAULT_CAPACITY` entries; a disabled cache has capacity zero
    pub fn new(enabled: bool) -> Self {
        Self::with_capacity(if enabled { DEFAULT_CAPACITY } else { 0 })
    }

    /// Cache holding up to `capacity` entries; zero disables it
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            capacity,
        }
    }

    /// Cached translation of `source_text` into `target_language`
    pub fn get(&self, source_text: &str, target_language: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }

        let mut state = self.state.lock();
        let key = (source_text.to_string(), target_language.to_string());
        match state.entries.get(&key).cloned() {
            Some(translation) => {
                state.stats.hits += 1;
                debug!("Cache hit for '{}' (-> {})", preview(source_text, 30), target_language);
                Some(translation)
            }
            None => {
                state.stats.misses += 1;
                None
            }
        }
    }

    /// Remember a translation, evicting the oldest entries beyond capacity
    pub fn store(&self, source_text: &str, target_language: &str, translation: &str) {
        if !self.is_enabled() {
            return;
        }

        let mut state = self.state.lock();
        let key = (source_text.to_string(), target_language.to_string());
        if state.entries.insert(key.clone(), translation.to_string()).is_none() {
            state.order.push_back(key);
        }

        while state.order.len() > self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.entries.remove(&oldest);
                state.stats.evictions += 1;
            }
        }
    }

    /// Counters since creation or the last `clear`
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        *self.state.lock() = CacheState::default();
        debug!("Translation cache cleared");
    }

    /// Number of cached translations
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the cache stores anything at all
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when cut
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
