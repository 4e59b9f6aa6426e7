//! Sentence composition.
//!
//! Resolved words are joined with single spaces. Punctuation runs are kept:
//! full-width marks are mapped to ASCII, whitespace inside the run is dropped,
//! and the mark sticks to the preceding word. Opening brackets stick to the
//! following word instead. Runs with no ASCII punctuation after mapping, such
//! as `×`, are spaced like words.

use phf::phf_map;

use crate::resolver::Piece;
use crate::tone::{render, ToneMode};

/// CJK punctuation outside the FF01-FF5E full-width block.
static CJK_PUNCTUATION: phf::Map<char, &'static str> = phf_map! {
    '。' => ".",
    '、' => ",",
    '｡' => ".",
    '､' => ",",
    '「' => "\"",
    '」' => "\"",
    '『' => "\"",
    '』' => "\"",
    '“' => "\"",
    '”' => "\"",
    '‘' => "'",
    '’' => "'",
    '《' => "<",
    '》' => ">",
    '〈' => "<",
    '〉' => ">",
    '【' => "[",
    '】' => "]",
    '〔' => "(",
    '〕' => ")",
    '…' => "...",
    '—' => "-",
    '–' => "-",
    '·' => "-",
    '・' => "-",
};

fn is_opening(ch: char) -> bool {
    matches!(
        ch,
        '(' | '[' | '{' | '<' | '（' | '［' | '｛' | '＜' | '《' | '〈' | '【' | '〔' | '“' | '‘' | '「' | '『'
    )
}

/// Options for `compose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentenceOptions {
    pub tone: ToneMode,
    /// Upper-case the first letter of the output, tone marks included.
    pub capitalize: bool,
}

impl SentenceOptions {
    pub fn new(tone: ToneMode) -> Self {
        Self {
            tone,
            capitalize: false,
        }
    }
}

/// Map full-width punctuation to ASCII and drop whitespace.
///
/// ```
/// use hanzi2pinyin_core::sentence::normalize_punctuation;
///
/// assert_eq!(normalize_punctuation("， "), ",");
/// assert_eq!(normalize_punctuation("。"), ".");
/// assert_eq!(normalize_punctuation("！？"), "!?");
/// ```
pub fn normalize_punctuation(run: &str) -> String {
    let mut out = String::with_capacity(run.len());
    for ch in run.chars() {
        if let Some(mapped) = CJK_PUNCTUATION.get(&ch) {
            out.push_str(mapped);
            continue;
        }
        let ch = match ch {
            '\u{FF01}'..='\u{FF5E}' => {
                char::from_u32(ch as u32 - 0xFF01 + 0x21).unwrap_or(ch)
            }
            '\u{3000}' => ' ',
            _ => ch,
        };
        if !ch.is_whitespace() {
            out.push(ch);
        }
    }
    out
}

#[derive(Debug, PartialEq, Eq)]
enum Last {
    Nothing,
    Word,
    Closing,
    Opening,
}

/// Compose resolved pieces into one sentence string.
pub fn compose(pieces: &[Piece<'_, '_>], opts: &SentenceOptions) -> String {
    let mut out = String::new();
    let mut last = Last::Nothing;

    for piece in pieces {
        let word = match piece {
            Piece::Hanzi(_, reading) => render(reading, opts.tone),
            Piece::Unknown(ch) => ch.to_string(),
            Piece::Latin(text) => (*text).to_string(),
            Piece::Other(text) => {
                let punct = normalize_punctuation(text);
                if punct.is_empty() {
                    continue;
                }
                // Symbols such as `×` or `©` stand apart like words.
                if !punct.chars().any(|c| c.is_ascii_punctuation()) {
                    if matches!(last, Last::Word | Last::Closing) {
                        out.push(' ');
                    }
                    out.push_str(&punct);
                    last = Last::Word;
                    continue;
                }
                let mut marks = text.chars().filter(|c| !c.is_whitespace());
                let opens = marks.next().is_some_and(is_opening);
                let ends_open = marks.last().map_or(opens, is_opening);
                if opens && matches!(last, Last::Word | Last::Closing) {
                    out.push(' ');
                }
                out.push_str(&punct);
                // Leading punctuation has nothing to attach to on the left.
                last = if ends_open || last == Last::Nothing {
                    Last::Opening
                } else {
                    Last::Closing
                };
                continue;
            }
        };
        if matches!(last, Last::Word | Last::Closing) {
            out.push(' ');
        }
        out.push_str(&word);
        last = Last::Word;
    }

    if opts.capitalize {
        capitalize_first(&mut out);
    }
    out
}

fn capitalize_first(s: &mut String) {
    if let Some((pos, ch)) = s.char_indices().find(|(_, c)| c.is_alphabetic()) {
        let upper: String = ch.to_uppercase().collect();
        s.replace_range(pos..pos + ch.len_utf8(), &upper);
    }
}
