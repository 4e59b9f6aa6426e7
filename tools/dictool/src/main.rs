//! Maintenance tool for `.dat` dictionary sources
//!
//! Usage:
//!   cargo run -p dictool -- check hanzi2pinyin/data/chars.dat hanzi2pinyin/data/words.dat
//!   cargo run -p dictool -- compile --bundled extra.dat -o dict.bin
//!   cargo run -p dictool -- show 长

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hanzi2pinyin::{bundled_store, load_layer, save_snapshot};
use hanzi2pinyin_core::{DictLayer, DictStore, ToneMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dictool")]
#[command(about = "Validate, compile and inspect pinyin dictionary sources")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate .dat files, then print counts
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Merge .dat files in order and write a bincode snapshot
    Compile {
        files: Vec<PathBuf>,

        /// Start from the bundled tables instead of an empty dictionary
        #[arg(long)]
        bundled: bool,

        /// Output snapshot path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print a character's readings and word rules
    Show {
        ch: char,

        /// Sources to load (defaults to the bundled tables)
        files: Vec<PathBuf>,
    },
}

/// Install each file as its own layer, in order.
fn merge(mut store: DictStore, files: &[PathBuf]) -> Result<DictStore> {
    for path in files {
        let layer = load_layer(path)?;
        store
            .install_override_layer(layer)
            .with_context(|| format!("failed to merge {}", path.display()))?;
        info!(path = %path.display(), "merged");
    }
    Ok(store)
}

fn check(files: &[PathBuf]) -> Result<()> {
    let mut combined = DictLayer::new();
    for path in files {
        let layer = load_layer(path)?;
        layer
            .validate()
            .with_context(|| format!("invalid entry in {}", path.display()))?;
        println!("{}: {} entries", path.display(), layer.len());
        combined.extend(layer);
    }

    let store = DictStore::from_layer(combined).context("sources do not merge")?;
    let words: BTreeSet<&str> = store
        .chars()
        .filter_map(|ch| store.entry(ch))
        .flat_map(|entry| entry.rules.iter().map(|rule| rule.word.as_str()))
        .collect();
    let polyphones = store
        .chars()
        .filter(|ch| store.entry(*ch).is_some_and(|e| e.is_polyphone()))
        .count();

    println!("chars:      {}", store.len());
    println!("words:      {}", words.len());
    println!("polyphones: {}", polyphones);
    Ok(())
}

fn show(ch: char, store: &DictStore) {
    let Some(entry) = store.entry(ch) else {
        println!("{} (U+{:04X}): not in dictionary", ch, ch as u32);
        return;
    };
    println!("{} (U+{:04X})", ch, ch as u32);
    println!("  default:  {}", entry.default.render(ToneMode::Unicode));
    let readings: Vec<String> = entry.readings.iter().map(|r| r.to_string()).collect();
    println!("  readings: {}", readings.join(" "));
    for rule in &entry.rules {
        println!("  {}[{}] -> {}", rule.word, rule.offset, rule.reading);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Check { files } => check(&files)?,
        Command::Compile {
            files,
            bundled,
            output,
        } => {
            if files.is_empty() && !bundled {
                anyhow::bail!("nothing to compile: pass .dat files or --bundled");
            }
            let base = if bundled {
                bundled_store()?
            } else {
                DictStore::new()
            };
            let store = merge(base, &files)?;
            save_snapshot(&store, &output)?;
            println!(
                "wrote {} ({} chars, {} layers)",
                output.display(),
                store.len(),
                store.layer_count()
            );
        }
        Command::Show { ch, files } => {
            let store = if files.is_empty() {
                bundled_store()?
            } else {
                merge(DictStore::new(), &files)?
            };
            show(ch, &store);
        }
    }

    Ok(())
}
