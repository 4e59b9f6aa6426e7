//! Readings and tone rendering.
//!
//! A `Reading` is a toneless pinyin spelling plus a validated `Tone`. The
//! spelling uses plain ASCII: `v` stands for `ü`, and after `l`/`n` the
//! spelling `ue` is the orthographic `üe` (so 掠 is stored as `lue3`).
//!
//! `render` turns a reading into one of three surface forms:
//! - `Plain`   → `lue`
//! - `Ascii`   → `lue3`
//! - `Unicode` → `lüě`
//!
//! Diacritic placement follows the usual pinyin rule: `a` or `e` takes the
//! mark, otherwise the `o` of `ou`, otherwise the last vowel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;

use crate::error::{PinyinError, Result};

/// A Mandarin tone number. `0` is the neutral tone; `5` is accepted as an
/// alias for neutral and normalized to `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tone(u8);

impl Tone {
    pub const NEUTRAL: Tone = Tone(0);

    /// Validate a raw tone number.
    ///
    /// ```
    /// use hanzi2pinyin_core::Tone;
    ///
    /// assert_eq!(Tone::new(3).unwrap().number(), 3);
    /// assert_eq!(Tone::new(5).unwrap(), Tone::NEUTRAL);
    /// assert!(Tone::new(7).is_err());
    /// ```
    pub fn new(n: u8) -> Result<Self> {
        match n {
            0 | 5 => Ok(Tone(0)),
            1..=4 => Ok(Tone(n)),
            _ => Err(PinyinError::InvalidTone(n)),
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn is_neutral(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for Tone {
    type Error = PinyinError;

    fn try_from(n: u8) -> Result<Self> {
        Tone::new(n)
    }
}

impl From<Tone> for u8 {
    fn from(t: Tone) -> u8 {
        t.0
    }
}

/// A single pronunciation: toneless syllable plus tone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reading {
    syllable: String,
    tone: Tone,
}

impl Reading {
    /// Build a reading from a lowercase ASCII syllable and a raw tone number.
    pub fn new<S: Into<String>>(syllable: S, tone: u8) -> Result<Self> {
        let syllable = syllable.into();
        if !is_valid_syllable(&syllable) {
            return Err(PinyinError::malformed(
                syllable,
                "syllable must be non-empty lowercase ascii",
            ));
        }
        Ok(Self {
            syllable,
            tone: Tone::new(tone)?,
        })
    }

    pub fn syllable(&self) -> &str {
        &self.syllable
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn render(&self, mode: ToneMode) -> String {
        render(self, mode)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, ToneMode::Ascii))
    }
}

pub(crate) fn is_valid_syllable(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_lowercase())
}

/// How tones are written in rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMode {
    /// Syllable only: `hao`.
    #[default]
    Plain,
    /// Syllable followed by the tone digit: `hao3`. Neutral tone has no digit.
    Ascii,
    /// Diacritic on the nucleus vowel: `hǎo`.
    Unicode,
}

impl ToneMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ToneMode::Plain => "plain",
            ToneMode::Ascii => "ascii",
            ToneMode::Unicode => "unicode",
        }
    }
}

impl FromStr for ToneMode {
    type Err = PinyinError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "none" => Ok(ToneMode::Plain),
            "ascii" | "number" | "numeric" => Ok(ToneMode::Ascii),
            "unicode" | "mark" => Ok(ToneMode::Unicode),
            _ => Err(PinyinError::UnknownToneMode(s.to_string())),
        }
    }
}

impl fmt::Display for ToneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `true` selects ASCII tone digits, `false` plain syllables.
impl From<bool> for ToneMode {
    fn from(with_tone: bool) -> Self {
        if with_tone {
            ToneMode::Ascii
        } else {
            ToneMode::Plain
        }
    }
}

/// Render a reading in the requested mode.
pub fn render(reading: &Reading, mode: ToneMode) -> String {
    render_parts(&reading.syllable, reading.tone, mode)
}

/// Render an unchecked `(syllable, tone)` pair.
///
/// Fails with `InvalidTone` for tone numbers outside `0..=5`.
pub fn render_raw(syllable: &str, tone: u8, mode: ToneMode) -> Result<String> {
    Ok(render_parts(syllable, Tone::new(tone)?, mode))
}

fn render_parts(syllable: &str, tone: Tone, mode: ToneMode) -> String {
    match mode {
        ToneMode::Plain => syllable.to_string(),
        ToneMode::Ascii if tone.is_neutral() => syllable.to_string(),
        ToneMode::Ascii => format!("{}{}", syllable, tone.number()),
        ToneMode::Unicode => with_diacritic(syllable, tone),
    }
}

const VOWELS: [char; 6] = ['a', 'e', 'i', 'o', 'u', 'ü'];

// Combining macron, acute, caron, grave.
const COMBINING_MARKS: [char; 4] = ['\u{0304}', '\u{0301}', '\u{030C}', '\u{0300}'];

fn with_diacritic(syllable: &str, tone: Tone) -> String {
    let mut chars = spell_umlaut(syllable);
    if tone.is_neutral() {
        return chars.into_iter().collect();
    }
    let idx = usize::from(tone.number() - 1);

    match nucleus(&chars) {
        Some(pos) => {
            if let Some(marked) = marked_vowel(chars[pos], idx) {
                chars[pos] = marked;
            }
            chars.into_iter().collect()
        }
        // Syllabic nasals (m, n, ng, hm, hng): combine onto the first nasal.
        None => {
            if let Some(pos) = chars.iter().position(|&c| c == 'm' || c == 'n') {
                chars.insert(pos + 1, COMBINING_MARKS[idx]);
            }
            chars.into_iter().collect::<String>().nfc().collect()
        }
    }
}

fn spell_umlaut(syllable: &str) -> Vec<char> {
    let mut chars: Vec<char> = syllable
        .chars()
        .map(|c| if c == 'v' { 'ü' } else { c })
        .collect();
    if chars.len() >= 3 && matches!(chars[0], 'l' | 'n') && chars[1] == 'u' && chars[2] == 'e' {
        chars[1] = 'ü';
    }
    chars
}

fn nucleus(chars: &[char]) -> Option<usize> {
    if let Some(pos) = chars.iter().position(|&c| c == 'a' || c == 'e') {
        return Some(pos);
    }
    if let Some(pos) = chars.windows(2).position(|w| w == ['o', 'u']) {
        return Some(pos);
    }
    chars.iter().rposition(|c| VOWELS.contains(c))
}

fn marked_vowel(vowel: char, idx: usize) -> Option<char> {
    let row = match vowel {
        'a' => ['ā', 'á', 'ǎ', 'à'],
        'e' => ['ē', 'é', 'ě', 'è'],
        'i' => ['ī', 'í', 'ǐ', 'ì'],
        'o' => ['ō', 'ó', 'ǒ', 'ò'],
        'u' => ['ū', 'ú', 'ǔ', 'ù'],
        'ü' => ['ǖ', 'ǘ', 'ǚ', 'ǜ'],
        _ => return None,
    };
    row.get(idx).copied()
}

/// Remove tone marks or a trailing tone digit, recovering the plain spelling.
///
/// ```
/// use hanzi2pinyin_core::strip_tone;
///
/// assert_eq!(strip_tone("lüě"), "lue");
/// assert_eq!(strip_tone("lǜ"), "lv");
/// assert_eq!(strip_tone("hao3"), "hao");
/// ```
pub fn strip_tone(s: &str) -> String {
    let decomposed: Vec<char> = s
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .collect();

    let mut letters: Vec<char> = Vec::with_capacity(decomposed.len());
    let mut iter = decomposed.into_iter().peekable();
    while let Some(c) = iter.next() {
        if c == 'u' && iter.peek() == Some(&'\u{0308}') {
            iter.next();
            letters.push('ü');
        } else {
            letters.push(c);
        }
    }
    while letters.last().is_some_and(|c| c.is_ascii_digit()) {
        letters.pop();
    }

    let mut out = String::with_capacity(letters.len());
    for (i, &c) in letters.iter().enumerate() {
        if c == 'ü' {
            out.push(if letters.get(i + 1) == Some(&'e') { 'u' } else { 'v' });
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(s: &str, t: u8) -> Reading {
        Reading::new(s, t).unwrap()
    }

    #[test]
    fn plain_and_ascii() {
        assert_eq!(render(&r("hao", 3), ToneMode::Plain), "hao");
        assert_eq!(render(&r("hao", 3), ToneMode::Ascii), "hao3");
        assert_eq!(render(&r("le", 0), ToneMode::Ascii), "le");
        assert_eq!(render(&r("le", 5), ToneMode::Ascii), "le");
    }

    #[test]
    fn unicode_vowel_priority() {
        assert_eq!(render(&r("jie", 2), ToneMode::Unicode), "jié");
        assert_eq!(render(&r("cao", 1), ToneMode::Unicode), "cāo");
        assert_eq!(render(&r("duan", 3), ToneMode::Unicode), "duǎn");
        assert_eq!(render(&r("gou", 3), ToneMode::Unicode), "gǒu");
        assert_eq!(render(&r("liu", 2), ToneMode::Unicode), "liú");
        assert_eq!(render(&r("gui", 4), ToneMode::Unicode), "guì");
        assert_eq!(render(&r("shi", 4), ToneMode::Unicode), "shì");
        assert_eq!(render(&r("le", 0), ToneMode::Unicode), "le");
    }

    #[test]
    fn unicode_umlaut_spellings() {
        assert_eq!(render(&r("lue", 3), ToneMode::Unicode), "lüě");
        assert_eq!(render(&r("nue", 4), ToneMode::Unicode), "nüè");
        assert_eq!(render(&r("lv", 4), ToneMode::Unicode), "lǜ");
        assert_eq!(render(&r("jue", 2), ToneMode::Unicode), "jué");
        assert_eq!(render(&r("xue", 2), ToneMode::Unicode), "xué");
    }

    #[test]
    fn unicode_syllabic_nasal() {
        assert_eq!(render(&r("ng", 2), ToneMode::Unicode), "ńg");
        assert_eq!(render(&r("n", 4), ToneMode::Unicode), "ǹ");
        assert_eq!(render(&r("m", 2), ToneMode::Unicode), "ḿ");
    }

    #[test]
    fn raw_render_rejects_bad_tone() {
        assert_eq!(render_raw("hao", 3, ToneMode::Ascii).unwrap(), "hao3");
        assert!(matches!(
            render_raw("hao", 6, ToneMode::Unicode),
            Err(PinyinError::InvalidTone(6))
        ));
    }

    #[test]
    fn reading_rejects_bad_syllable() {
        assert!(Reading::new("Hao", 3).is_err());
        assert!(Reading::new("", 1).is_err());
        assert!(Reading::new("hao", 9).is_err());
    }

    #[test]
    fn tone_mode_parsing() {
        assert_eq!("unicode".parse::<ToneMode>().unwrap(), ToneMode::Unicode);
        assert_eq!("ASCII".parse::<ToneMode>().unwrap(), ToneMode::Ascii);
        assert!(matches!(
            "fancy".parse::<ToneMode>(),
            Err(PinyinError::UnknownToneMode(_))
        ));
        assert_eq!(ToneMode::from(true), ToneMode::Ascii);
        assert_eq!(ToneMode::from(false), ToneMode::Plain);
    }

    #[test]
    fn strip_recovers_plain_syllable() {
        let samples = [
            r("lue", 3),
            r("lv", 4),
            r("nv", 3),
            r("jue", 2),
            r("zhuang", 4),
            r("ng", 2),
            r("er", 0),
            r("xiong", 1),
        ];
        for reading in &samples {
            for mode in [ToneMode::Plain, ToneMode::Ascii, ToneMode::Unicode] {
                assert_eq!(
                    strip_tone(&render(reading, mode)),
                    reading.syllable(),
                    "{:?} in {:?}",
                    reading,
                    mode
                );
            }
        }
    }
}
