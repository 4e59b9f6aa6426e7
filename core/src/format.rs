//! Slug and abbreviation formatters built on resolved values.

use crate::value::{Origin, Value};

/// Join plain syllables and Latin words, lower-cased, with `separator`.
///
/// Punctuation never reaches this point: only resolved values are joined.
pub fn permlink(values: &[Value], separator: &str) -> String {
    values
        .iter()
        .map(|v| v.syllable().to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(separator)
}

/// How Latin words take part in an abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatinWords {
    /// Keep the whole word: `感谢party` → `gxparty`.
    #[default]
    Whole,
    /// Keep its first letter: `感谢party` → `gxp`.
    Initial,
    /// Leave it out: `感谢party` → `gx`.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AbbrOptions {
    /// Keep the leading syllable whole instead of abbreviating it.
    pub keep_lead: bool,
    pub latin: LatinWords,
}

impl AbbrOptions {
    /// Options matching the two-flag form: `keep_latin` keeps Latin words
    /// whole, otherwise they are reduced to their initial.
    pub fn new(keep_lead: bool, keep_latin: bool) -> Self {
        Self {
            keep_lead,
            latin: if keep_latin {
                LatinWords::Whole
            } else {
                LatinWords::Initial
            },
        }
    }
}

/// First letter of each syllable, shaped by `opts`.
pub fn abbr(values: &[Value], opts: &AbbrOptions) -> String {
    let mut out = String::new();
    let mut leading = true;
    for v in values {
        let whole = match (v.origin(), opts.latin) {
            (Origin::Latin, LatinWords::Skip) => continue,
            (Origin::Latin, LatinWords::Whole) => true,
            _ => leading && opts.keep_lead,
        };
        leading = false;
        if whole {
            out.push_str(v.syllable());
        } else if let Some(initial) = v.syllable().chars().next() {
            out.push(initial);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::{Reading, ToneMode};

    fn sample() -> Vec<Value> {
        let r = |s: &str, t: u8| Reading::new(s, t).unwrap();
        vec![
            Value::hanzi('感', &r("gan", 3), ToneMode::Unicode),
            Value::hanzi('谢', &r("xie", 4), ToneMode::Unicode),
            Value::latin("Party"),
            Value::hanzi('家', &r("jia", 1), ToneMode::Unicode),
        ]
    }

    #[test]
    fn permlink_uses_plain_lowercase() {
        assert_eq!(permlink(&sample(), "-"), "gan-xie-party-jia");
        assert_eq!(permlink(&sample(), ""), "ganxiepartyjia");
        assert_eq!(permlink(&[], "-"), "");
    }

    #[test]
    fn permlink_alphabet_is_lowercase_letters_digits_and_separator() {
        let r = |s: &str, t: u8| Reading::new(s, t).unwrap();
        let mut values = sample();
        values.push(Value::latin("Party2024"));
        values.push(Value::hanzi('绿', &r("lv", 4), ToneMode::Unicode));
        values.push(Value::latin("X"));

        for sep in ["-", "+", "_"] {
            let slug = permlink(&values, sep);
            assert!(
                slug.split(sep).flat_map(str::chars).all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                "{slug}"
            );
        }
        assert_eq!(permlink(&values, "-"), "gan-xie-party-jia-party2024-lv-x");
    }

    #[test]
    fn abbr_variants() {
        let values = sample();
        assert_eq!(abbr(&values, &AbbrOptions::default()), "gxPartyj");
        assert_eq!(abbr(&values, &AbbrOptions::new(true, true)), "ganxPartyj");
        assert_eq!(abbr(&values, &AbbrOptions::new(false, false)), "gxPj");
        let skip = AbbrOptions {
            keep_lead: false,
            latin: LatinWords::Skip,
        };
        assert_eq!(abbr(&values, &skip), "gxj");
    }

    #[test]
    fn keep_lead_applies_to_first_included_value() {
        let r = Reading::new("gan", 3).unwrap();
        let values = vec![Value::latin("ok"), Value::hanzi('感', &r, ToneMode::Plain)];
        let opts = AbbrOptions {
            keep_lead: true,
            latin: LatinWords::Skip,
        };
        assert_eq!(abbr(&values, &opts), "gan");
    }
}
