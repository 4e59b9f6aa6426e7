// core/tests/cache_management.rs
//
// Integration tests for the `Pinyin` resolve cache.
//
// Tests cover:
// - LRU eviction with Config.max_cache_size
// - Hit/miss tracking statistics
// - Tone mode is part of the cache key
// - Invalidation when an override layer is installed

use hanzi2pinyin_core::{Config, DictLayer, DictStore, Pinyin, Reading, ToneMode};

fn r(s: &str, t: u8) -> Reading {
    Reading::new(s, t).unwrap()
}

fn setup_test_engine(cache_size: usize) -> Pinyin {
    let mut layer = DictLayer::new();
    layer.add_char('你', vec![r("ni", 3)]);
    layer.add_char('好', vec![r("hao", 3), r("hao", 4)]);
    layer.add_char('中', vec![r("zhong", 1), r("zhong", 4)]);
    layer.add_char('国', vec![r("guo", 2)]);

    let cfg = Config {
        max_cache_size: cache_size,
        ..Config::default()
    };
    Pinyin::with_config(DictStore::from_layer(layer).unwrap(), cfg)
}

#[test]
fn test_cache_hit_miss_tracking() {
    let engine = setup_test_engine(3);

    engine.resolve("你好", ToneMode::Plain);
    assert_eq!(engine.cache_stats(), (0, 1));

    engine.resolve("你好", ToneMode::Plain);
    assert_eq!(engine.cache_stats(), (1, 1));

    engine.resolve("中国", ToneMode::Plain);
    assert_eq!(engine.cache_stats(), (1, 2));
}

#[test]
fn test_tone_mode_is_part_of_key() {
    let engine = setup_test_engine(8);
    let plain = engine.resolve("你好", ToneMode::Plain);
    let marked = engine.resolve("你好", ToneMode::Unicode);
    assert_eq!(plain, vec!["ni", "hao"]);
    assert_eq!(marked, vec!["nǐ", "hǎo"]);
    assert_eq!(engine.cache_stats(), (0, 2));
}

#[test]
fn test_lru_eviction() {
    let engine = setup_test_engine(2);

    engine.resolve("你", ToneMode::Plain);
    engine.resolve("好", ToneMode::Plain);
    engine.resolve("中", ToneMode::Plain); // evicts 你
    engine.resolve("好", ToneMode::Plain); // hit
    engine.resolve("你", ToneMode::Plain); // miss again

    assert_eq!(engine.cache_stats(), (1, 4));
}

#[test]
fn test_cache_invalidated_by_override() {
    let engine = setup_test_engine(8);
    assert_eq!(engine.resolve("好", ToneMode::Ascii), vec!["hao3"]);

    let mut layer = DictLayer::new();
    layer.add_char('好', vec![r("hao", 4)]);
    engine.install_override_layer(layer).unwrap();

    // Same input, same mode: must not be served from the old entry.
    assert_eq!(engine.resolve("好", ToneMode::Ascii), vec!["hao4"]);
    assert_eq!(engine.cache_stats(), (0, 2));
}
