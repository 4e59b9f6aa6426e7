//! Polyphone resolution.
//!
//! Each CJK character is looked up in the `DictStore`. Characters with a
//! single reading resolve directly. For polyphones, the resolver takes a
//! window around the character wide enough for the longest rule registered on
//! it and asks the store for the longest aligned rule. No match means the
//! default reading.
//!
//! Context never crosses run boundaries: rule words are pure CJK, so a
//! Latin or punctuation run between two characters breaks any match.

use crate::dict::DictStore;
use crate::tokenizer::{RunKind, Tokenizer};
use crate::tone::Reading;

/// One classified, resolved piece of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece<'a, 'd> {
    /// A CJK character and the reading chosen for it.
    Hanzi(char, &'d Reading),
    /// A CJK character the dictionary does not know.
    Unknown(char),
    /// An ASCII letter/digit run.
    Latin(&'a str),
    /// Punctuation, whitespace and anything else.
    Other(&'a str),
}

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'d> {
    store: &'d DictStore,
}

impl<'d> Resolver<'d> {
    pub fn new(store: &'d DictStore) -> Self {
        Self { store }
    }

    /// Reading for `chars[i]`, using the rest of `chars` as context.
    ///
    /// Returns `None` if the character is not in the dictionary.
    pub fn reading_at(&self, chars: &[char], i: usize) -> Option<&'d Reading> {
        let ch = *chars.get(i)?;
        let entry = self.store.entry(ch)?;
        if !entry.is_polyphone() || entry.rules.is_empty() {
            return Some(&entry.default);
        }

        let longest = entry.longest_rule.max(1);
        let lo = i.saturating_sub(longest - 1);
        let hi = (i + longest).min(chars.len());
        let contextual = self.store.lookup_contextual(ch, &chars[lo..hi], i - lo);
        Some(contextual.unwrap_or(&entry.default))
    }

    /// Resolve every character of a CJK run.
    pub fn resolve_run(&self, run: &str) -> Vec<(char, Option<&'d Reading>)> {
        let chars: Vec<char> = run.chars().collect();
        (0..chars.len())
            .map(|i| (chars[i], self.reading_at(&chars, i)))
            .collect()
    }

    /// Tokenize `text` and resolve it into pieces, in input order.
    pub fn pieces<'a>(&self, text: &'a str) -> Vec<Piece<'a, 'd>> {
        let mut out = Vec::new();
        for run in Tokenizer::new(text).runs() {
            match run.kind {
                RunKind::Cjk => {
                    out.extend(self.resolve_run(run.text).into_iter().map(
                        |(ch, reading)| match reading {
                            Some(r) => Piece::Hanzi(ch, r),
                            None => Piece::Unknown(ch),
                        },
                    ));
                }
                RunKind::Latin => out.push(Piece::Latin(run.text)),
                RunKind::Other => out.push(Piece::Other(run.text)),
            }
        }
        out
    }
}
