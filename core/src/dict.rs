//! Dictionary store for character readings and context rules.
//!
//! The store maps a single CJK code point to a `CharEntry`:
//! - a default reading used when no context rule applies,
//! - every reading seen for the character (heteronyms),
//! - an ordered list of `OverrideRule`s: "inside word W, at offset k, read
//!   this character as R".
//!
//! Data arrives as `DictLayer`s built by a loader. Layers are merged in
//! installation order: a later layer replaces the default of every character
//! it lists and re-registers its rules at the end of the rule list, so it
//! wins equal-length ties. Characters a layer does not mention are untouched.
//!
//! The store never touches the filesystem. `to_bincode`/`from_bincode` work on
//! byte buffers so a loader can persist compiled snapshots.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PinyinError, Result};
use crate::tone::{is_valid_syllable, Reading};

/// A context rule attached to one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    /// The multi-character word this rule recognizes.
    pub word: String,
    /// Character index of the target character inside `word`.
    pub offset: usize,
    /// Reading of the target character when `word` matches.
    pub reading: Reading,
}

impl OverrideRule {
    pub fn new<W: Into<String>>(word: W, offset: usize, reading: Reading) -> Self {
        Self {
            word: word.into(),
            offset,
            reading,
        }
    }

    /// Length of the word in characters.
    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// True if `window[position]` is this rule's target and the surrounding
    /// characters spell the rule's word.
    fn matches(&self, window: &[char], position: usize) -> bool {
        let Some(start) = position.checked_sub(self.offset) else {
            return false;
        };
        let end = start + self.len();
        end <= window.len() && window[start..end].iter().copied().eq(self.word.chars())
    }
}

/// Everything known about one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharEntry {
    pub default: Reading,
    /// Distinct readings in first-seen order.
    pub readings: Vec<Reading>,
    /// Context rules in registration order.
    pub rules: Vec<OverrideRule>,
    /// Character length of the longest rule word (0 if there are no rules).
    pub longest_rule: usize,
}

impl CharEntry {
    fn new(default: Reading) -> Self {
        Self {
            readings: vec![default.clone()],
            default,
            rules: Vec::new(),
            longest_rule: 0,
        }
    }

    /// True if the character has more than one distinct reading.
    pub fn is_polyphone(&self) -> bool {
        self.readings.len() > 1
    }

    fn note_reading(&mut self, reading: &Reading) {
        if !self.readings.contains(reading) {
            self.readings.push(reading.clone());
        }
    }

    fn set_default(&mut self, readings: &[Reading]) {
        let Some(first) = readings.first() else {
            return;
        };
        self.default = first.clone();
        // Keep the new default at the front of the heteronym list.
        self.readings.retain(|r| r != first);
        self.readings.insert(0, first.clone());
        for r in &readings[1..] {
            self.note_reading(r);
        }
    }

    fn register_rule(&mut self, rule: OverrideRule) {
        self.rules
            .retain(|r| !(r.word == rule.word && r.offset == rule.offset));
        self.note_reading(&rule.reading);
        self.longest_rule = self.longest_rule.max(rule.len());
        self.rules.push(rule);
    }
}

/// What a layer says about one character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerEntry {
    /// Readings from a character line; the first one becomes the default.
    pub readings: Vec<Reading>,
    pub rules: Vec<OverrideRule>,
}

/// One parsed dictionary source, ready to be installed into a `DictStore`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictLayer {
    entries: AHashMap<char, LayerEntry>,
    // Insertion order of `entries`, so merges are deterministic.
    order: Vec<char>,
}

impl DictLayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry_mut(&mut self, ch: char) -> &mut LayerEntry {
        if !self.entries.contains_key(&ch) {
            self.order.push(ch);
        }
        self.entries.entry(ch).or_default()
    }

    /// Declare a character and its readings, default first.
    ///
    /// A later declaration of the same character in the same layer replaces
    /// the earlier reading list.
    pub fn add_char(&mut self, ch: char, readings: Vec<Reading>) {
        self.entry_mut(ch).readings = readings;
    }

    /// Declare a word with one reading per character.
    ///
    /// Each position becomes an `OverrideRule` on its character.
    pub fn add_word(&mut self, word: &str, readings: &[Reading]) -> Result<()> {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < 2 {
            return Err(PinyinError::malformed(word, "a word needs at least two characters"));
        }
        if chars.len() != readings.len() {
            return Err(PinyinError::malformed(
                word,
                format!(
                    "{} characters but {} readings",
                    chars.len(),
                    readings.len()
                ),
            ));
        }
        for (offset, (ch, reading)) in chars.iter().zip(readings).enumerate() {
            self.add_rule(*ch, OverrideRule::new(word, offset, reading.clone()));
        }
        Ok(())
    }

    /// Attach a single rule to a character.
    pub fn add_rule(&mut self, ch: char, rule: OverrideRule) {
        self.entry_mut(ch).rules.push(rule);
    }

    pub fn get(&self, ch: char) -> Option<&LayerEntry> {
        self.entries.get(&ch)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &LayerEntry)> + '_ {
        self.order
            .iter()
            .filter_map(move |ch| self.entries.get(ch).map(|e| (*ch, e)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Append another layer's entries after this one's.
    pub fn extend(&mut self, other: DictLayer) {
        let DictLayer { mut entries, order } = other;
        for ch in order {
            if let Some(incoming) = entries.remove(&ch) {
                let entry = self.entry_mut(ch);
                if !incoming.readings.is_empty() {
                    entry.readings = incoming.readings;
                }
                entry.rules.extend(incoming.rules);
            }
        }
    }

    /// Check structural validity: well-formed syllables, rule words of at
    /// least two characters, offsets inside the word and pointing at the key.
    pub fn validate(&self) -> Result<()> {
        for (ch, entry) in self.iter() {
            for r in &entry.readings {
                if !is_valid_syllable(r.syllable()) {
                    return Err(PinyinError::malformed(ch.to_string(), "invalid syllable"));
                }
            }
            for rule in &entry.rules {
                if !is_valid_syllable(rule.reading.syllable()) {
                    return Err(PinyinError::malformed(rule.word.clone(), "invalid syllable"));
                }
                let len = rule.len();
                if len < 2 {
                    return Err(PinyinError::malformed(
                        rule.word.clone(),
                        "a word needs at least two characters",
                    ));
                }
                match rule.word.chars().nth(rule.offset) {
                    Some(target) if target == ch => {}
                    Some(target) => {
                        return Err(PinyinError::malformed(
                            rule.word.clone(),
                            format!("offset {} is '{}', not '{}'", rule.offset, target, ch),
                        ))
                    }
                    None => {
                        return Err(PinyinError::malformed(
                            rule.word.clone(),
                            format!("offset {} out of range for length {}", rule.offset, len),
                        ))
                    }
                }
            }
        }
        Ok(())
    }
}

/// Merged, read-only view over all installed layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictStore {
    entries: AHashMap<char, CharEntry>,
    layers: usize,
}

impl DictStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a single base layer.
    pub fn from_layer(layer: DictLayer) -> Result<Self> {
        let mut store = Self::new();
        store.install_override_layer(layer)?;
        Ok(store)
    }

    /// Default reading of `ch`, or `None` if the character is unknown.
    pub fn lookup_default(&self, ch: char) -> Option<&Reading> {
        self.entries.get(&ch).map(|e| &e.default)
    }

    /// Reading selected by the longest rule whose word appears in `window`
    /// with its target at `window[position]`. Later rules win length ties.
    pub fn lookup_contextual(&self, ch: char, window: &[char], position: usize) -> Option<&Reading> {
        let entry = self.entries.get(&ch)?;
        let mut best: Option<&OverrideRule> = None;
        for rule in &entry.rules {
            if !rule.matches(window, position) {
                continue;
            }
            if best.map_or(true, |b| rule.len() >= b.len()) {
                best = Some(rule);
            }
        }
        best.map(|rule| {
            tracing::trace!(%ch, word = %rule.word, reading = %rule.reading, "context rule matched");
            &rule.reading
        })
    }

    pub fn entry(&self, ch: char) -> Option<&CharEntry> {
        self.entries.get(&ch)
    }

    /// All known readings of `ch`, default first.
    pub fn readings(&self, ch: char) -> &[Reading] {
        self.entries
            .get(&ch)
            .map(|e| e.readings.as_slice())
            .unwrap_or_default()
    }

    /// Character length of the longest rule registered for `ch`.
    pub fn longest_rule(&self, ch: char) -> usize {
        self.entries.get(&ch).map_or(0, |e| e.longest_rule)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.entries.contains_key(&ch)
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.keys().copied()
    }

    /// Number of characters in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of layers merged so far.
    pub fn layer_count(&self) -> usize {
        self.layers
    }

    /// Merge `layer` on top of the current contents.
    ///
    /// The layer is validated first; on error the store is left unchanged.
    pub fn install_override_layer(&mut self, layer: DictLayer) -> Result<()> {
        layer.validate()?;

        // Every character with rules must end up with a default.
        for (ch, entry) in layer.iter() {
            if entry.readings.is_empty() && !self.entries.contains_key(&ch) {
                return Err(PinyinError::MissingDefault(ch));
            }
        }

        let mut chars = 0usize;
        let mut rules = 0usize;
        let DictLayer { mut entries, order } = layer;
        for ch in order {
            let Some(incoming) = entries.remove(&ch) else {
                continue;
            };
            chars += 1;
            rules += incoming.rules.len();

            if !self.entries.contains_key(&ch) {
                // Checked above: a new character always brings readings.
                let Some(first) = incoming.readings.first() else {
                    return Err(PinyinError::MissingDefault(ch));
                };
                self.entries.insert(ch, CharEntry::new(first.clone()));
            }
            let Some(entry) = self.entries.get_mut(&ch) else {
                continue;
            };
            entry.set_default(&incoming.readings);
            for rule in incoming.rules {
                entry.register_rule(rule);
            }
        }
        self.layers += 1;
        debug!(layer = self.layers, chars, rules, "installed dictionary layer");
        Ok(())
    }

    /// Serialize the merged store with bincode.
    pub fn to_bincode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize a store produced by `to_bincode`.
    pub fn from_bincode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
