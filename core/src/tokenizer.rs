//! Split text into classified runs.
//!
//! Three kinds of runs are produced, each maximal and in input order:
//! - `Cjk`: contiguous CJK ideographs,
//! - `Latin`: contiguous ASCII letters and digits,
//! - `Other`: everything else (punctuation, whitespace, symbols, other scripts).
//!
//! The iterator is lazy and borrows the input; `Tokenizer` is `Copy`, so
//! calling `runs()` again restarts from the beginning.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunKind {
    Cjk,
    Latin,
    Other,
}

impl RunKind {
    pub fn of(ch: char) -> Self {
        if is_cjk(ch) {
            RunKind::Cjk
        } else if ch.is_ascii_alphanumeric() {
            RunKind::Latin
        } else {
            RunKind::Other
        }
    }
}

/// A classified slice of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRun<'a> {
    pub kind: RunKind,
    /// Byte range of the run inside the tokenized text.
    pub span: Range<usize>,
    pub text: &'a str,
}

/// True for code points in the CJK ideograph blocks.
pub fn is_cjk(ch: char) -> bool {
    matches!(ch as u32,
        0x3007
        | 0x3400..=0x4DBF    // Extension A
        | 0x4E00..=0x9FFF    // Unified Ideographs
        | 0xF900..=0xFAFF    // Compatibility Ideographs
        | 0x20000..=0x2A6DF  // Extension B
        | 0x2A700..=0x2EBEF  // Extensions C-F
        | 0x2F800..=0x2FA1F  // Compatibility Supplement
        | 0x30000..=0x3134F  // Extension G
    )
}

#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    text: &'a str,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// A fresh iterator over the runs of the text.
    pub fn runs(&self) -> Runs<'a> {
        Runs {
            text: self.text,
            pos: 0,
        }
    }
}

impl<'a> IntoIterator for Tokenizer<'a> {
    type Item = TokenRun<'a>;
    type IntoIter = Runs<'a>;

    fn into_iter(self) -> Runs<'a> {
        self.runs()
    }
}

/// Iterator returned by `Tokenizer::runs`.
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Runs<'a> {
    type Item = TokenRun<'a>;

    fn next(&mut self) -> Option<TokenRun<'a>> {
        let rest = &self.text[self.pos..];
        let first = rest.chars().next()?;
        let kind = RunKind::of(first);

        let len = rest
            .char_indices()
            .find(|&(_, c)| RunKind::of(c) != kind)
            .map_or(rest.len(), |(i, _)| i);

        let start = self.pos;
        self.pos += len;
        Some(TokenRun {
            kind,
            span: start..self.pos,
            text: &self.text[start..self.pos],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(RunKind, &str)> {
        Tokenizer::new(text).runs().map(|r| (r.kind, r.text)).collect()
    }

    #[test]
    fn mixed_input() {
        assert_eq!(
            kinds("感谢party, 感谢guo jia!"),
            vec![
                (RunKind::Cjk, "感谢"),
                (RunKind::Latin, "party"),
                (RunKind::Other, ", "),
                (RunKind::Cjk, "感谢"),
                (RunKind::Latin, "guo"),
                (RunKind::Other, " "),
                (RunKind::Latin, "jia"),
                (RunKind::Other, "!"),
            ]
        );
    }

    #[test]
    fn garbage_between_ideographs() {
        assert_eq!(
            kinds("×甲×乙×"),
            vec![
                (RunKind::Other, "×"),
                (RunKind::Cjk, "甲"),
                (RunKind::Other, "×"),
                (RunKind::Cjk, "乙"),
                (RunKind::Other, "×"),
            ]
        );
    }

    #[test]
    fn fullwidth_punctuation_is_other() {
        assert_eq!(
            kinds("天冷了，快回家。"),
            vec![
                (RunKind::Cjk, "天冷了"),
                (RunKind::Other, "，"),
                (RunKind::Cjk, "快回家"),
                (RunKind::Other, "。"),
            ]
        );
    }

    #[test]
    fn spans_cover_input_and_restart() {
        let text = "ab12中文 x";
        let tok = Tokenizer::new(text);
        let spans: Vec<_> = tok.runs().map(|r| r.span).collect();
        assert_eq!(spans.first().map(|s| s.start), Some(0));
        assert_eq!(spans.last().map(|s| s.end), Some(text.len()));
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        // Restartable: a second pass yields the same runs.
        assert_eq!(tok.runs().count(), spans.len());
        assert_eq!(tok.into_iter().count(), spans.len());
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(Tokenizer::new("").runs().count(), 0);
    }

    #[test]
    fn cjk_ranges() {
        assert!(is_cjk('中'));
        assert!(is_cjk('〇'));
        assert!(is_cjk('\u{3400}'));
        assert!(is_cjk('\u{20000}'));
        assert!(!is_cjk('，'));
        assert!(!is_cjk('あ'));
        assert!(!is_cjk('a'));
    }
}
