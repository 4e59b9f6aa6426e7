//! Resolved output units.

use serde::Serialize;
use std::fmt;

use crate::tone::{render, Reading, Tone, ToneMode};

/// Where a `Value` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// A CJK character resolved through the dictionary.
    Hanzi,
    /// An ASCII letter/digit run passed through unchanged.
    Latin,
}

/// One resolved token: the source text, its syllable and tone, and the
/// rendering in the tone mode requested at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Value {
    text: String,
    syllable: String,
    tone: Option<Tone>,
    origin: Origin,
    rendered: String,
}

impl Value {
    pub fn hanzi(ch: char, reading: &Reading, mode: ToneMode) -> Self {
        Self {
            text: ch.to_string(),
            syllable: reading.syllable().to_string(),
            tone: Some(reading.tone()),
            origin: Origin::Hanzi,
            rendered: render(reading, mode),
        }
    }

    pub fn latin(word: &str) -> Self {
        Self {
            text: word.to_string(),
            syllable: word.to_string(),
            tone: None,
            origin: Origin::Latin,
            rendered: word.to_string(),
        }
    }

    /// The original source text of this token.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Toneless syllable (or the Latin word itself).
    pub fn syllable(&self) -> &str {
        &self.syllable
    }

    /// Tone of a resolved character; `None` for Latin words.
    pub fn tone(&self) -> Option<Tone> {
        self.tone
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn is_hanzi(&self) -> bool {
        self.origin == Origin::Hanzi
    }

    pub fn is_latin(&self) -> bool {
        self.origin == Origin::Latin
    }

    /// The token rendered in the requested tone mode.
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    pub fn into_string(self) -> String {
        self.rendered
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl AsRef<str> for Value {
    fn as_ref(&self) -> &str {
        &self.rendered
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.rendered == other
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.rendered == *other
    }
}
