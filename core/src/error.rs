//! Error type shared by the dictionary store and the tone renderer.

/// Errors raised by `hanzi2pinyin-core`.
///
/// Unrecognized input characters are never reported here: the resolver drops
/// or passes them through. These variants cover contract violations (bad tone
/// numbers, unknown tone-mode names) and structurally invalid dictionary layers.
#[derive(Debug, thiserror::Error)]
pub enum PinyinError {
    #[error("tone number {0} is outside 0..=5")]
    InvalidTone(u8),

    #[error("unknown tone mode '{0}' (expected plain, ascii or unicode)")]
    UnknownToneMode(String),

    #[error("malformed dictionary entry '{key}': {reason}")]
    MalformedLayer { key: String, reason: String },

    #[error("character '{0}' has context rules but no default reading")]
    MissingDefault(char),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
}

impl PinyinError {
    pub(crate) fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        PinyinError::MalformedLayer {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PinyinError>;
