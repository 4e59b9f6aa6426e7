use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::loader::LoadError;

/// Settings read from a TOML file.
///
/// Engine options sit at the top level next to the dictionary source:
/// the bundled tables unless `data_dir` or `snapshot` says otherwise. Files
/// in `override_files` are installed over it in order.
///
/// # Example
///
/// ```rust
/// use hanzi2pinyin::PinyinConfig;
///
/// let config: PinyinConfig = toml::from_str(r#"
///     tone = "unicode"
///     override_files = ["my.dat"]
/// "#).unwrap();
/// assert_eq!(config.override_files.len(), 1);
/// let base = config.into_base();
/// assert_eq!(base.tone, hanzi2pinyin::ToneMode::Unicode);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PinyinConfig {
    #[serde(flatten)]
    pub base: hanzi2pinyin_core::Config,

    /// Directory of `.dat` files replacing the bundled tables.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Bincode snapshot replacing the bundled tables. Takes precedence over
    /// `data_dir`.
    #[serde(default)]
    pub snapshot: Option<PathBuf>,

    /// `.dat` files installed over the base dictionary, later files winning.
    #[serde(default)]
    pub override_files: Vec<PathBuf>,
}

impl PinyinConfig {
    /// Read a TOML file. Relative paths inside it are taken relative to the
    /// file's directory.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: PinyinConfig = toml::from_str(&text)?;
        if let Some(dir) = path.parent() {
            config.rebase(dir);
        }
        Ok(config)
    }

    fn rebase(&mut self, dir: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        };
        self.data_dir.iter_mut().for_each(fix);
        self.snapshot.iter_mut().for_each(fix);
        self.override_files.iter_mut().for_each(fix);
    }

    /// Drop the file-level settings, keeping the engine options.
    pub fn into_base(self) -> hanzi2pinyin_core::Config {
        self.base
    }

    /// Engine options: tone, separator, capitalization and cache size.
    pub fn base(&self) -> &hanzi2pinyin_core::Config {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut hanzi2pinyin_core::Config {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanzi2pinyin_core::ToneMode;

    #[test]
    fn flattened_fields() {
        let cfg: PinyinConfig = toml::from_str(
            "tone = \"ascii\"\nseparator = \"+\"\ndata_dir = \"dict\"\n",
        )
        .unwrap();
        assert_eq!(cfg.base().tone, ToneMode::Ascii);
        assert_eq!(cfg.base().separator, "+");
        assert_eq!(cfg.data_dir, Some(PathBuf::from("dict")));
        assert!(cfg.override_files.is_empty());
    }

    #[test]
    fn engine_options_pass_through() {
        let mut cfg = PinyinConfig::default();
        cfg.base_mut().separator = "_".to_string();
        cfg.base_mut().capitalize_sentence = true;
        cfg.override_files.push(PathBuf::from("my.dat"));

        let base = cfg.into_base();
        assert_eq!(base.separator, "_");
        assert!(base.capitalize_sentence);
        assert_eq!(base.tone, ToneMode::Plain);
    }

    #[test]
    fn empty_file_is_default() {
        let cfg: PinyinConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, PinyinConfig::default());
    }

    #[test]
    fn relative_paths_follow_config_file() {
        let dir = std::env::temp_dir().join(format!("hanzi2pinyin-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pinyin.toml");
        fs::write(&path, "override_files = [\"my.dat\", \"/abs/other.dat\"]\n").unwrap();

        let cfg = PinyinConfig::load_toml(&path).unwrap();
        assert_eq!(cfg.override_files[0], dir.join("my.dat"));
        assert_eq!(cfg.override_files[1], PathBuf::from("/abs/other.dat"));

        fs::write(&path, "tone = \"loud\"\n").unwrap();
        assert!(matches!(PinyinConfig::load_toml(&path), Err(LoadError::Config(_))));
        let _ = fs::remove_dir_all(&dir);
    }
}
