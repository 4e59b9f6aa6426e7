// core/src/engine.rs
//
// The `Pinyin` engine: one dictionary snapshot plus configuration, exposing
// resolve / sentence / permlink / abbr over it.

use std::borrow::Cow;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use lru::LruCache;
use tracing::debug;
use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

use crate::dict::{DictLayer, DictStore};
use crate::error::Result;
use crate::format::{self, AbbrOptions};
use crate::resolver::{Piece, Resolver};
use crate::sentence::{self, SentenceOptions};
use crate::tone::{Reading, ToneMode};
use crate::value::Value;
use crate::Config;

// (input, tone mode, store generation)
type CacheKey = (String, ToneMode, usize);

/// Pinyin conversion engine.
///
/// Lookups work on an `Arc<DictStore>` snapshot taken at the start of each
/// call. `install_override_layer` builds a new store and swaps it in, so a
/// conversion already running keeps the dictionary it started with.
///
/// # Example
/// ```
/// use hanzi2pinyin_core::{DictLayer, Pinyin, Reading, ToneMode};
///
/// let mut layer = DictLayer::new();
/// layer.add_char('好', vec![Reading::new("hao", 3).unwrap(), Reading::new("hao", 4).unwrap()]);
/// let pinyin = Pinyin::from_layer(layer).unwrap();
///
/// let values = pinyin.resolve("好!", ToneMode::Ascii);
/// assert_eq!(values, vec!["hao3"]);
/// ```
pub struct Pinyin {
    store: RwLock<Arc<DictStore>>,
    config: Config,
    cache: Option<Mutex<LruCache<CacheKey, Vec<Value>>>>,
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
}

impl Pinyin {
    pub fn new(store: DictStore) -> Self {
        Self::with_config(store, Config::default())
    }

    pub fn with_config(store: DictStore, config: Config) -> Self {
        let cache = NonZeroUsize::new(config.max_cache_size).map(|n| Mutex::new(LruCache::new(n)));
        Self {
            store: RwLock::new(Arc::new(store)),
            config,
            cache,
            cache_hits: AtomicUsize::new(0),
            cache_misses: AtomicUsize::new(0),
        }
    }

    /// Build an engine whose store holds a single base layer.
    pub fn from_layer(layer: DictLayer) -> Result<Self> {
        Ok(Self::new(DictStore::from_layer(layer)?))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The dictionary as of now.
    pub fn snapshot(&self) -> Arc<DictStore> {
        match self.store.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Merge a layer on top of the current dictionary.
    ///
    /// Later layers win for the characters they define. A malformed layer is
    /// rejected and the current dictionary stays in place.
    pub fn install_override_layer(&self, layer: DictLayer) -> Result<()> {
        let mut guard = match self.store.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = DictStore::clone(&guard);
        next.install_override_layer(layer)?;
        *guard = Arc::new(next);
        drop(guard);

        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                cache.clear();
            }
        }
        debug!("dictionary swapped");
        Ok(())
    }

    fn prepare<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.config.normalize_input && is_nfc_quick(text.chars()) != IsNormalized::Yes {
            Cow::Owned(text.nfc().collect())
        } else {
            Cow::Borrowed(text)
        }
    }

    /// Resolve `text` into one `Value` per CJK character or Latin word.
    ///
    /// Punctuation, whitespace, symbols and characters missing from the
    /// dictionary are dropped. Empty input gives an empty vector.
    pub fn resolve(&self, text: &str, mode: ToneMode) -> Vec<Value> {
        if text.is_empty() {
            return Vec::new();
        }
        let store = self.snapshot();
        let key = (text.to_string(), mode, store.layer_count());

        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                if let Some(hit) = cache.get(&key) {
                    self.cache_hits.fetch_add(1, Ordering::Relaxed);
                    return hit.clone();
                }
            }
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }

        let text = self.prepare(text);
        let values: Vec<Value> = Resolver::new(&store)
            .pieces(&text)
            .into_iter()
            .filter_map(|piece| match piece {
                Piece::Hanzi(ch, reading) => Some(Value::hanzi(ch, reading, mode)),
                Piece::Latin(word) => Some(Value::latin(word)),
                Piece::Unknown(_) | Piece::Other(_) => None,
            })
            .collect();

        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                cache.put(key, values.clone());
            }
        }
        values
    }

    /// Resolve with the configured default tone mode.
    pub fn resolve_default(&self, text: &str) -> Vec<Value> {
        self.resolve(text, self.config.tone)
    }

    /// Render `text` as a sentence, keeping punctuation.
    pub fn sentence(&self, text: &str, mode: ToneMode) -> String {
        let opts = SentenceOptions {
            tone: mode,
            capitalize: self.config.capitalize_sentence,
        };
        self.sentence_with(text, &opts)
    }

    pub fn sentence_with(&self, text: &str, opts: &SentenceOptions) -> String {
        let store = self.snapshot();
        let text = self.prepare(text);
        let pieces = Resolver::new(&store).pieces(&text);
        sentence::compose(&pieces, opts)
    }

    /// Lower-case slug of plain syllables joined by `separator`.
    pub fn permlink(&self, text: &str, separator: &str) -> String {
        format::permlink(&self.resolve(text, ToneMode::Plain), separator)
    }

    /// Slug using the configured separator.
    pub fn permlink_default(&self, text: &str) -> String {
        self.permlink(text, &self.config.separator)
    }

    /// Initials of each syllable.
    ///
    /// `keep_lead` keeps the first syllable whole; `keep_latin` keeps Latin
    /// words whole instead of reducing them to their first letter.
    pub fn abbr(&self, text: &str, keep_lead: bool, keep_latin: bool) -> String {
        self.abbr_with(text, &AbbrOptions::new(keep_lead, keep_latin))
    }

    pub fn abbr_with(&self, text: &str, opts: &AbbrOptions) -> String {
        format::abbr(&self.resolve(text, ToneMode::Plain), opts)
    }

    /// Every recorded reading of `ch`, default first.
    pub fn heteronyms(&self, ch: char) -> Vec<Reading> {
        self.snapshot().readings(ch).to_vec()
    }

    /// Cache statistics as (hits, misses).
    pub fn cache_stats(&self) -> (usize, usize) {
        (
            self.cache_hits.load(Ordering::Relaxed),
            self.cache_misses.load(Ordering::Relaxed),
        )
    }
}

impl std::fmt::Debug for Pinyin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pinyin")
            .field("chars", &self.snapshot().len())
            .field("config", &self.config)
            .finish()
    }
}
