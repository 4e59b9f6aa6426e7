//! Command-line front end.
//!
//! Usage:
//!   hanzi2pinyin sentence "天冷了，快回家。" --tone unicode
//!   echo 感谢party | hanzi2pinyin permlink --separator +
//!   hanzi2pinyin --override my.dat resolve 广 --json

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use hanzi2pinyin::{AbbrOptions, LatinWords, Pinyin, PinyinConfig, SentenceOptions, ToneMode};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hanzi2pinyin")]
#[command(about = "Convert Chinese text to pinyin")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra .dat file installed over the dictionary (repeatable)
    #[arg(short = 'o', long = "override")]
    overrides: Vec<PathBuf>,

    /// Tone mode: plain, ascii or unicode (defaults to the configured one)
    #[arg(short, long, global = true, value_parser = parse_tone)]
    tone: Option<ToneMode>,

    /// Emit JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One syllable per character or Latin word
    Resolve { text: Option<String> },

    /// Whole sentence with punctuation kept
    Sentence {
        text: Option<String>,

        /// Upper-case the first letter
        #[arg(long)]
        capitalize: bool,
    },

    /// URL slug
    Permlink {
        text: Option<String>,

        #[arg(short, long)]
        separator: Option<String>,
    },

    /// Initials of each syllable
    Abbr {
        text: Option<String>,

        /// Keep the first syllable whole
        #[arg(long)]
        keep_lead: bool,

        /// How Latin words are abbreviated
        #[arg(long, value_enum, default_value_t = LatinArg::Whole)]
        latin: LatinArg,
    },

    /// Every reading of each character
    Heteronyms { chars: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LatinArg {
    Whole,
    Initial,
    Skip,
}

impl From<LatinArg> for LatinWords {
    fn from(arg: LatinArg) -> Self {
        match arg {
            LatinArg::Whole => LatinWords::Whole,
            LatinArg::Initial => LatinWords::Initial,
            LatinArg::Skip => LatinWords::Skip,
        }
    }
}

fn parse_tone(s: &str) -> Result<ToneMode, String> {
    s.parse().map_err(|e: hanzi2pinyin::PinyinError| e.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// The argument if given, otherwise each non-empty stdin line.
fn inputs(text: Option<String>) -> anyhow::Result<Vec<String>> {
    if let Some(text) = text {
        return Ok(vec![text]);
    }
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn emit_text(json: bool, text: &str) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(text)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn run(args: Args, pinyin: &Pinyin) -> anyhow::Result<()> {
    let tone = args.tone.unwrap_or(pinyin.config().tone);

    match args.command {
        Command::Resolve { text } => {
            for line in inputs(text)? {
                let values = pinyin.resolve(&line, tone);
                if args.json {
                    println!("{}", serde_json::to_string(&values)?);
                } else {
                    let words: Vec<&str> = values.iter().map(|v| v.as_str()).collect();
                    println!("{}", words.join(" "));
                }
            }
        }
        Command::Sentence { text, capitalize } => {
            let opts = SentenceOptions {
                tone,
                capitalize: capitalize || pinyin.config().capitalize_sentence,
            };
            for line in inputs(text)? {
                emit_text(args.json, &pinyin.sentence_with(&line, &opts))?;
            }
        }
        Command::Permlink { text, separator } => {
            let separator = separator.unwrap_or_else(|| pinyin.config().separator.clone());
            for line in inputs(text)? {
                emit_text(args.json, &pinyin.permlink(&line, &separator))?;
            }
        }
        Command::Abbr {
            text,
            keep_lead,
            latin,
        } => {
            let opts = AbbrOptions {
                keep_lead,
                latin: latin.into(),
            };
            for line in inputs(text)? {
                emit_text(args.json, &pinyin.abbr_with(&line, &opts))?;
            }
        }
        Command::Heteronyms { chars } => {
            for ch in chars.chars().filter(|c| !c.is_whitespace()) {
                let readings: Vec<String> = pinyin
                    .heteronyms(ch)
                    .iter()
                    .map(|r| r.render(tone))
                    .collect();
                if args.json {
                    println!(
                        "{}",
                        serde_json::json!({ "char": ch.to_string(), "readings": readings })
                    );
                } else if readings.is_empty() {
                    println!("{}\t(unknown)", ch);
                } else {
                    println!("{}\t{}", ch, readings.join(" "));
                }
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PinyinConfig::load_toml(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PinyinConfig::default(),
    };
    config.override_files.extend(args.overrides.iter().cloned());

    let pinyin = hanzi2pinyin::build(&config).context("failed to load dictionary")?;
    run(args, &pinyin)
}
