//! Building converters from `PinyinConfig`: data directories, snapshots and
//! override files.

use std::fs;
use std::path::PathBuf;

use hanzi2pinyin::{build, bundled_store, save_snapshot, LoadError, PinyinConfig, ToneMode};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hanzi2pinyin-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn data_dir_replaces_bundled_tables() {
    let dir = scratch("datadir");
    fs::write(dir.join("a_chars.dat"), "长 chang2 zhang3\n老 lao3\n").unwrap();
    fs::write(dir.join("b_words.dat"), "长老 zhang3 lao3\n").unwrap();
    fs::write(dir.join("notes.txt"), "ignored\n").unwrap();

    let config = PinyinConfig {
        data_dir: Some(dir.clone()),
        ..PinyinConfig::default()
    };
    let pinyin = build(&config).unwrap();
    assert_eq!(pinyin.snapshot().len(), 2);
    assert_eq!(pinyin.resolve("长老长", ToneMode::Ascii), vec!["zhang3", "lao3", "chang2"]);
    // Not in this directory, so unknown and dropped.
    assert!(pinyin.resolve("好", ToneMode::Ascii).is_empty());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn snapshot_takes_precedence() {
    let dir = scratch("snapshot");
    let snap = dir.join("dict.bin");
    save_snapshot(&bundled_store().unwrap(), &snap).unwrap();

    let config = PinyinConfig {
        snapshot: Some(snap),
        data_dir: Some(dir.join("does-not-exist")),
        ..PinyinConfig::default()
    };
    let pinyin = build(&config).unwrap();
    assert_eq!(pinyin.sentence("长江大桥", ToneMode::Ascii), "chang2 jiang1 da4 qiao2");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn config_file_with_overrides_and_options() {
    let dir = scratch("toml");
    fs::copy(fixture("my.dat"), dir.join("my.dat")).unwrap();
    let path = dir.join("pinyin.toml");
    fs::write(
        &path,
        "tone = \"unicode\"\nseparator = \"_\"\noverride_files = [\"my.dat\"]\n",
    )
    .unwrap();

    let config = PinyinConfig::load_toml(&path).unwrap();
    let pinyin = build(&config).unwrap();
    assert_eq!(pinyin.resolve_default("广"), vec!["yǎn"]);
    assert_eq!(pinyin.permlink_default("广场"), "yan_chang");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn broken_override_fails_the_build() {
    let dir = scratch("broken");
    let bad = dir.join("bad.dat");
    fs::write(&bad, "广 yan3\nabc def1\n").unwrap();

    let config = PinyinConfig {
        override_files: vec![bad],
        ..PinyinConfig::default()
    };
    match build(&config) {
        Err(LoadError::File { path, source }) => {
            assert!(path.ends_with("bad.dat"));
            assert!(matches!(*source, LoadError::Parse { line: 2, .. }));
        }
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }

    let _ = fs::remove_dir_all(&dir);
}
