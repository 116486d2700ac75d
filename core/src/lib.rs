//! libjyutping-core
//!
//! Candidate generation for a Cantonese (Jyutping) input method: given raw
//! keystrokes and a ranked syllable segmentation of them, produce best-first
//! dictionary candidates from a read-only, frequency-ordered lexicon.
//!
//! Segmentation is supplied from outside through the `Segmenter` trait; the
//! `libjyutping` crate ships a trie-backed one.
//!
//! Public API:
//! - `Engine` - Dispatcher over the matching strategies, plus ten-key entry points
//! - `Candidate` / `CoreCandidate` - Suggestions and their reduced form
//! - `LexiconStore` - Read-only store capability (`Lexicon` in memory, `RedbStore` on disk)
//! - `LexiconHandle` - Explicitly owned store holder with an open/close lifecycle
//! - `Segmentation` / `Scheme` / `Syllable` - Segmenter output
//! - `Combo` - Ten-key letter groups
//! - `Config` - Fan-out limits and ranking tunables
use serde::{Deserialize, Serialize};

pub mod candidate;
pub use candidate::{uniqued, Candidate, CoreCandidate};

pub mod classifier;
pub use classifier::InputShape;

pub mod combo;
pub use combo::Combo;

pub mod hash;

pub mod lexicon;
pub use lexicon::{Lexicon, LexiconHandle, LexiconRow, LexiconStore, StoreError, WordEntry};

pub mod redb_store;
pub use redb_store::RedbStore;

pub mod segmentation;
pub use segmentation::{NoSegmenter, Scheme, Segmentation, Segmenter, Syllable, Symbol, SymbolSource};

pub mod matcher;
pub use matcher::Matcher;

pub mod ranking;
pub use ranking::RowCandidate;

pub mod engine;
pub use engine::{Engine, SuggestOptions};

pub mod tenkey;

/// Tunables for candidate generation.
///
/// Every fan-out in the engine is bounded by one of these; the defaults keep
/// a keystroke well inside one input frame on a full-size lexicon.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Rows per shortcut (abbreviation) query
    pub shortcut_limit: usize,
    /// Rows per prefix query
    pub prefix_limit: usize,

    /// Row distance inside which candidates count as equally frequent.
    /// Scaled to the shipped lexicon size; shrink it for small lexicons.
    pub order_tolerance: i64,

    // Tail concatenation
    /// Head candidates combined with tails
    pub concat_head_limit: usize,
    /// Tail candidates combined with heads
    pub concat_tail_limit: usize,
    /// Combinations kept
    pub concat_result_limit: usize,
    /// Row limit for exact lookups made while processing a tail
    pub tail_query_limit: usize,
    /// Maximum nesting of tail processing
    pub max_concat_depth: usize,

    // Ten-key
    /// Presses above which the full Cartesian expansion is skipped
    pub ten_key_max_presses: usize,
    /// Presses expanded by the deep fallback
    pub ten_key_deep_limit: usize,

    /// Build the prefix index when constructing an in-memory lexicon
    pub prefix_index: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shortcut_limit: 50,
            prefix_limit: 50,
            order_tolerance: 50_000,
            concat_head_limit: 3,
            concat_tail_limit: 8,
            concat_result_limit: 4,
            tail_query_limit: 8,
            max_concat_depth: 6,
            ten_key_max_presses: 8,
            ten_key_deep_limit: 8,
            prefix_index: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize raw keystrokes: NFC, trimmed, ASCII letters lowercased.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_toml_roundtrip() {
        let mut config = Config::default();
        config.order_tolerance = 1_000;
        config.prefix_index = false;
        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("shortcut_limit = 10\n").unwrap();
        assert_eq!(config.shortcut_limit, 10);
        assert_eq!(config.concat_result_limit, 4);
        assert_eq!(config.order_tolerance, 50_000);
    }

    #[test]
    fn config_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("libjyutping_config_{}.toml", std::process::id()));
        Config::default().save_toml(&path).unwrap();
        assert_eq!(Config::load_toml(&path).unwrap(), Config::default());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn normalize_input() {
        assert_eq!(utils::normalize("  NeiHou5 \n"), "neihou5");
        assert_eq!(utils::normalize(""), "");
    }
}
