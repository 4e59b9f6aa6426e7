//! hanzi2pinyin-core
//!
//! Dictionary store, tokenizer, polyphone resolver, tone rendering and the
//! output formatters behind `hanzi2pinyin`. This crate consumes parsed
//! dictionary layers and never reads files; loading `.dat` sources is the job
//! of the `hanzi2pinyin` crate.
//!
//! Public API:
//! - `Pinyin` - engine holding a dictionary snapshot and configuration
//! - `DictStore` / `DictLayer` - merged dictionary and the layers fed into it
//! - `Reading`, `Tone`, `ToneMode` - pronunciations and how to write them
//! - `Value` - one resolved token
//! - `Tokenizer`, `Resolver` - the lower-level pipeline stages
//! - `Config` - engine configuration
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{PinyinError, Result};

pub mod tone;
pub use tone::{render, render_raw, strip_tone, Reading, Tone, ToneMode};

pub mod dict;
pub use dict::{CharEntry, DictLayer, DictStore, LayerEntry, OverrideRule};

pub mod tokenizer;
pub use tokenizer::{is_cjk, RunKind, TokenRun, Tokenizer};

pub mod resolver;
pub use resolver::{Piece, Resolver};

pub mod value;
pub use value::{Origin, Value};

pub mod sentence;
pub use sentence::SentenceOptions;

pub mod format;
pub use format::{AbbrOptions, LatinWords};

pub mod engine;
pub use engine::Pinyin;

/// Engine configuration.
///
/// Language data (which files to load, override sources) lives in the
/// loader's `PinyinConfig`; this struct only holds conversion options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Tone mode used by `resolve_default`.
    pub tone: ToneMode,

    /// Separator used by `permlink_default`.
    pub separator: String,

    /// Upper-case the first letter of `sentence` output.
    pub capitalize_sentence: bool,

    /// NFC-normalize input before tokenizing, so decomposed sequences still
    /// match dictionary keys.
    pub normalize_input: bool,

    /// Maximum number of cached `resolve` results. 0 disables the cache.
    pub max_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tone: ToneMode::Plain,
            separator: "-".to_string(),
            capitalize_sentence: false,
            normalize_input: true,
            // Short inputs repeat a lot (names, slugs); 1000 entries is plenty.
            max_cache_size: 1000,
        }
    }
}

impl Config {
    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Set the default tone mode from its name (`plain`, `ascii`, `unicode`).
    ///
    /// Unknown names are rejected rather than silently falling back.
    pub fn set_tone_name(&mut self, name: &str) -> Result<()> {
        self.tone = name.parse()?;
        Ok(())
    }

    /// Set the permlink separator.
    pub fn set_separator(&mut self, separator: &str) {
        self.separator = separator.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.tone = ToneMode::Unicode;
        cfg.set_separator("_");
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = Config::from_toml_str("tone = \"ascii\"\n").unwrap();
        assert_eq!(cfg.tone, ToneMode::Ascii);
        assert_eq!(cfg.separator, "-");
        assert!(cfg.normalize_input);
    }

    #[test]
    fn unknown_tone_name_is_an_error() {
        let mut cfg = Config::default();
        assert!(cfg.set_tone_name("loud").is_err());
        assert_eq!(cfg.tone, ToneMode::Plain);
        assert!(Config::from_toml_str("tone = \"loud\"\n").is_err());
    }
}
