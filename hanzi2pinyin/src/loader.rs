//! Dictionary sources: `.dat` text layers, bincode snapshots and the bundled
//! data compiled into the crate.
//!
//! A `.dat` file holds one entry per line:
//!
//! ```text
//! # comment
//! 长 chang2 zhang3        character line, default reading first
//! U+957F chang2 zhang3    same, keyed by code point
//! 市长 shi4 zhang3         word line, one reading per character
//! ```
//!
//! A reading is a toneless pinyin syllable with an optional tone digit
//! (`0`-`5`, missing means neutral). `ü` may be written `ü`, `u:` or `v`.

use std::fs;
use std::path::{Path, PathBuf};

use hanzi2pinyin_core::{is_cjk, DictLayer, DictStore, Pinyin, PinyinError, Reading};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

static CHARS_DAT: &str = include_str!("../data/chars.dat");
static WORDS_DAT: &str = include_str!("../data/words.dat");

static READING_RE: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^(?P<syllable>[a-z]+)(?P<tone>[0-5])?$"));
static CODEPOINT_RE: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[Uu]\+(?P<hex>[0-9A-Fa-f]{4,6})$"));

fn compiled(re: &'static Result<Regex, regex::Error>) -> Result<&'static Regex, LoadError> {
    re.as_ref().map_err(|e| LoadError::Pattern(e.clone()))
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        source: Box<LoadError>,
    },

    #[error(transparent)]
    Layer(#[from] PinyinError),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid pattern: {0}")]
    Pattern(regex::Error),

    #[error("the global converter is already initialized")]
    AlreadyInitialized,
}

impl LoadError {
    fn in_file(path: &Path, err: LoadError) -> Self {
        match err {
            err @ (LoadError::Io { .. } | LoadError::File { .. }) => err,
            err => LoadError::File {
                path: path.to_path_buf(),
                source: Box::new(err),
            },
        }
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> LoadError {
    LoadError::Parse {
        line,
        message: message.into(),
    }
}

/// Normalize the spellings of `ü` to the internal `v`, except in `lüe`/`nüe`
/// which stay `lue`/`nue`.
pub fn normalize_syllable(raw: &str) -> String {
    let s = raw.to_lowercase().replace("u:", "ü");
    let lue = s
        .strip_prefix(['l', 'n'])
        .and_then(|rest| rest.strip_prefix("üe").or_else(|| rest.strip_prefix("ve")))
        .map(|tail| format!("{}ue{}", &s[..1], tail));
    lue.unwrap_or(s).replace('ü', "v")
}

/// Parse one reading token such as `zhang3`, `lu:4` or `le`.
pub fn parse_reading(token: &str) -> Result<Reading, LoadError> {
    Ok(reading(compiled(&READING_RE)?, token)?)
}

fn reading(re: &Regex, token: &str) -> Result<Reading, PinyinError> {
    let normalized = normalize_syllable(token);
    let caps = re
        .captures(&normalized)
        .ok_or_else(|| PinyinError::MalformedLayer {
            key: token.to_string(),
            reason: "expected a pinyin syllable with an optional tone digit".to_string(),
        })?;
    let tone = caps
        .name("tone")
        .and_then(|m| m.as_str().parse::<u8>().ok())
        .unwrap_or(0);
    Reading::new(&caps["syllable"], tone)
}

fn parse_key(re: &Regex, key: &str) -> Option<Vec<char>> {
    if let Some(caps) = re.captures(key) {
        let ch = u32::from_str_radix(&caps["hex"], 16)
            .ok()
            .and_then(char::from_u32)?;
        return Some(vec![ch]);
    }
    Some(key.chars().collect())
}

/// Parse `.dat` text into a layer.
///
/// Within one source a later line for the same character replaces the
/// earlier reading list; word lines accumulate.
pub fn parse_layer(text: &str) -> Result<DictLayer, LoadError> {
    let reading_re = compiled(&READING_RE)?;
    let codepoint_re = compiled(&CODEPOINT_RE)?;
    let mut layer = DictLayer::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let Some(key) = fields.next() else {
            continue;
        };
        let readings = fields
            .map(|token| reading(reading_re, token))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| parse_error(line_no, e.to_string()))?;
        if readings.is_empty() {
            return Err(parse_error(line_no, format!("'{}' has no readings", key)));
        }

        let chars = parse_key(codepoint_re, key)
            .ok_or_else(|| parse_error(line_no, format!("invalid code point '{}'", key)))?;
        if let Some(bad) = chars.iter().find(|c| !is_cjk(**c)) {
            return Err(parse_error(
                line_no,
                format!("'{}' in '{}' is not a CJK ideograph", bad, key),
            ));
        }

        match chars.as_slice() {
            [ch] => layer.add_char(*ch, readings),
            _ => {
                let word: String = chars.iter().collect();
                layer
                    .add_word(&word, &readings)
                    .map_err(|e| parse_error(line_no, e.to_string()))?;
            }
        }
    }

    Ok(layer)
}

/// Read and parse a `.dat` file.
pub fn load_layer<P: AsRef<Path>>(path: P) -> Result<DictLayer, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let layer = parse_layer(&text).map_err(|e| LoadError::in_file(path, e))?;
    debug!(path = %path.display(), entries = layer.len(), "parsed dictionary layer");
    Ok(layer)
}

/// Load every `*.dat` file in `dir`, in file name order, as one layer.
pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<DictLayer, LoadError> {
    let dir = dir.as_ref();
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.extension().is_some_and(|ext| ext == "dat") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut layer = DictLayer::new();
    for path in &paths {
        layer.extend(load_layer(path)?);
    }
    info!(dir = %dir.display(), files = paths.len(), entries = layer.len(), "loaded dictionary directory");
    Ok(layer)
}

/// The character and word tables shipped with the crate.
pub fn bundled_layer() -> Result<DictLayer, LoadError> {
    let mut layer = parse_layer(CHARS_DAT)?;
    layer.extend(parse_layer(WORDS_DAT)?);
    Ok(layer)
}

/// A store holding only the bundled tables.
pub fn bundled_store() -> Result<DictStore, LoadError> {
    Ok(DictStore::from_layer(bundled_layer()?)?)
}

/// Load a store previously written with `save_snapshot`.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<DictStore, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    DictStore::from_bincode(&bytes).map_err(|e| LoadError::in_file(path, e.into()))
}

pub fn save_snapshot<P: AsRef<Path>>(store: &DictStore, path: P) -> Result<(), LoadError> {
    let path = path.as_ref();
    let bytes = store.to_bincode()?;
    fs::write(path, bytes).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load each path as a layer and install it on `pinyin`, in order.
///
/// Stops at the first file that fails to load or merge; layers installed
/// before it stay in place. Returns the number of layers installed.
pub fn install_override_sources<P: AsRef<Path>>(
    pinyin: &Pinyin,
    paths: &[P],
) -> Result<usize, LoadError> {
    for (installed, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let result = load_layer(path).and_then(|layer| {
            pinyin
                .install_override_layer(layer)
                .map_err(|e| LoadError::in_file(path, e.into()))
        });
        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "override source rejected");
            return Err(e);
        }
        debug!(path = %path.display(), layer = installed + 1, "override source installed");
    }
    Ok(paths.len())
}
