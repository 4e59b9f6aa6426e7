//! hanzi2pinyin crate root
//!
//! This crate wires the `hanzi2pinyin-core` engine to its dictionary
//! sources: the bundled character and word tables, `.dat` files on disk and
//! bincode snapshots. It also keeps a process-wide converter behind a set of
//! free functions for callers that do not want to thread a `Pinyin` around.
//!
//! Public API exported here:
//! - `PinyinConfig` from `config`
//! - `parse_layer`, `load_layer`, `install_override_sources`, ... from `loader`
//! - `build`, `init`, `global` and the free conversion functions below
//!
//! ```
//! use hanzi2pinyin::ToneMode;
//!
//! assert_eq!(hanzi2pinyin::sentence("长江大桥", ToneMode::Unicode), "cháng jiāng dà qiáo");
//! assert_eq!(hanzi2pinyin::permlink("感谢party", "-"), "gan-xie-party");
//! ```

pub mod config;
pub mod loader;

use std::path::Path;

use once_cell::sync::OnceCell;
use tracing::{info, warn};

pub use config::PinyinConfig;
pub use loader::{
    bundled_layer, bundled_store, install_override_sources, load_dir, load_layer, load_snapshot,
    parse_layer, save_snapshot, LoadError,
};

// Convenience re-exports for common types used by callers.
pub use hanzi2pinyin_core::{
    AbbrOptions, Config, DictLayer, DictStore, LatinWords, Origin, Pinyin, PinyinError, Reading,
    SentenceOptions, Tone, ToneMode, Value,
};

static GLOBAL: OnceCell<Pinyin> = OnceCell::new();

/// Build a converter from `config`: base dictionary, then override files.
pub fn build(config: &PinyinConfig) -> Result<Pinyin, LoadError> {
    let store = if let Some(path) = &config.snapshot {
        load_snapshot(path)?
    } else if let Some(dir) = &config.data_dir {
        DictStore::from_layer(load_dir(dir)?)?
    } else {
        bundled_store()?
    };
    info!(chars = store.len(), "dictionary ready");

    let pinyin = Pinyin::with_config(store, config.base().clone());
    install_override_sources(&pinyin, &config.override_files)?;
    Ok(pinyin)
}

/// Initialize the process-wide converter from `config`.
///
/// Must run before the first call to `global()` or any free function;
/// afterwards it fails with `LoadError::AlreadyInitialized`.
pub fn init(config: &PinyinConfig) -> Result<&'static Pinyin, LoadError> {
    if GLOBAL.get().is_some() {
        return Err(LoadError::AlreadyInitialized);
    }
    let pinyin = build(config)?;
    GLOBAL
        .set(pinyin)
        .map_err(|_| LoadError::AlreadyInitialized)?;
    Ok(global())
}

/// The process-wide converter, built from the bundled tables on first use.
pub fn global() -> &'static Pinyin {
    GLOBAL.get_or_init(|| {
        build(&PinyinConfig::default()).unwrap_or_else(|e| {
            warn!(error = %e, "bundled dictionary failed to load; starting empty");
            Pinyin::new(DictStore::new())
        })
    })
}

/// Resolve `text` into one value per character or Latin word.
///
/// `None` and empty input give an empty vector.
pub fn of_string<'a, T: Into<Option<&'a str>>>(text: T, mode: ToneMode) -> Vec<Value> {
    match text.into() {
        Some(text) => global().resolve(text, mode),
        None => Vec::new(),
    }
}

/// Render `text` as a sentence, keeping punctuation.
pub fn sentence(text: &str, mode: ToneMode) -> String {
    global().sentence(text, mode)
}

/// Lower-case slug of `text` joined by `separator`.
pub fn permlink(text: &str, separator: &str) -> String {
    global().permlink(text, separator)
}

/// Initials of each syllable. See `Pinyin::abbr`.
pub fn abbr(text: &str, keep_lead: bool, keep_latin: bool) -> String {
    global().abbr(text, keep_lead, keep_latin)
}

/// Every reading known for `ch`, default first.
pub fn heteronyms(ch: char) -> Vec<Reading> {
    global().heteronyms(ch)
}

/// Install `.dat` files over the process-wide dictionary, in order.
pub fn override_files<P: AsRef<Path>>(paths: &[P]) -> Result<usize, LoadError> {
    install_override_sources(global(), paths)
}
