//! Jyutping input method engine
//!
//! A thin wrapper around the generic `libjyutping_core::Engine<Segmentor>`
//! that segments keystrokes itself and knows how to load a data directory.

use std::cmp::Reverse;
use std::error::Error;
use std::path::Path;

use libjyutping_core::classifier::removed_separators_tones;
use libjyutping_core::tenkey::ten_key_sequences;
use libjyutping_core::{
    utils, Candidate, Combo, Config, Engine, Lexicon, LexiconHandle, RedbStore, Scheme,
    Segmentation, Segmenter, SuggestOptions,
};
use tracing::{debug, warn};

use crate::segmentor::Segmentor;

/// Presses up to which ten-key input is segmented by trying every letter
/// sequence; longer runs are only matched as abbreviations.
pub const TEN_KEY_SEGMENT_PRESSES: usize = 6;

/// Schemes kept for one ten-key segmentation.
const TEN_KEY_SCHEMES: usize = 16;

/// Public engine for libjyutping.
pub struct JyutpingEngine {
    inner: Engine<Segmentor>,
}

impl JyutpingEngine {
    /// Engine over an already opened store.
    pub fn new(store: LexiconHandle, config: Config) -> Self {
        Self {
            inner: Engine::new(store, Segmentor::new(), config),
        }
    }

    /// Engine over the built-in demo lexicon.
    pub fn demo() -> Self {
        Self::new(LexiconHandle::with_store(Lexicon::load_demo()), Config::default())
    }

    /// Load an engine from a data directory.
    ///
    /// Expected layout (data-dir):
    ///  - config.toml       (optional tunables)
    ///  - lexicon.redb      (preferred store)
    ///  - lexicon.bincode   (in-memory store, used when no redb file exists)
    pub fn from_data_dir<P: AsRef<Path>>(data_dir: P) -> Result<Self, Box<dyn Error>> {
        let data_dir = data_dir.as_ref();
        let config_path = data_dir.join("config.toml");
        let config = if config_path.exists() {
            Config::load_toml(&config_path)?
        } else {
            Config::default()
        };
        Self::from_data_dir_with_config(data_dir, config)
    }

    /// Like `from_data_dir`, with explicit tunables instead of `config.toml`.
    pub fn from_data_dir_with_config<P: AsRef<Path>>(data_dir: P, config: Config) -> Result<Self, Box<dyn Error>> {
        let data_dir = data_dir.as_ref();
        let redb_path = data_dir.join("lexicon.redb");
        let bincode_path = data_dir.join("lexicon.bincode");

        let handle = LexiconHandle::new();
        if redb_path.exists() {
            handle
                .prepare(|| RedbStore::open(&redb_path))
                .map_err(|e| format!("failed to open lexicon {:?}: {}", redb_path, e))?;
        } else if bincode_path.exists() {
            warn!("no lexicon.redb in {:?}, loading bincode lexicon into memory", data_dir);
            handle
                .prepare(|| Lexicon::load_bincode(&bincode_path))
                .map_err(|e| format!("failed to load lexicon {:?}: {}", bincode_path, e))?;
        } else {
            return Err(format!("no lexicon.redb or lexicon.bincode in {:?}", data_dir).into());
        }
        Ok(Self::new(handle, config))
    }

    pub fn inner(&self) -> &Engine<Segmentor> {
        &self.inner
    }

    pub fn config(&self) -> &Config {
        self.inner.config()
    }

    /// Ranked syllable schemes for the letters of `text`, ignoring tones and
    /// separators.
    pub fn segment(&self, text: &str) -> Segmentation {
        let letters = removed_separators_tones(&utils::normalize(text));
        self.inner.segmenter().segment(&letters)
    }

    /// Best-first candidates for typed keystrokes.
    pub fn suggest(&self, text: &str) -> Vec<Candidate> {
        self.suggest_with(text, SuggestOptions::default())
    }

    pub fn suggest_with(&self, text: &str, options: SuggestOptions) -> Vec<Candidate> {
        let segmentation = self.segment(text);
        self.inner.suggest(text, &segmentation, options)
    }

    /// Best-first candidates for a run of ten-key presses.
    pub fn ten_key(&self, combos: &[Combo]) -> Vec<Candidate> {
        let segmentation = self.ten_key_segmentation(combos);
        self.inner.ten_key_suggest(combos, &segmentation)
    }

    /// Schemes spelled by some letter sequence of the presses. Schemes that
    /// cover every press win; otherwise the longest partial ones are kept.
    pub fn ten_key_segmentation(&self, combos: &[Combo]) -> Segmentation {
        if combos.is_empty() || combos.len() > TEN_KEY_SEGMENT_PRESSES {
            return Segmentation::default();
        }
        let segmentor = self.inner.segmenter();
        let mut schemes: Vec<Scheme> = Vec::new();
        for sequence in ten_key_sequences(combos) {
            for scheme in segmentor.segment(&sequence).iter() {
                if !schemes.contains(scheme) {
                    schemes.push(scheme.clone());
                }
            }
        }
        schemes.sort_by_key(|s| (Reverse(s.length()), s.count()));
        let longest = schemes.first().map(Scheme::length).unwrap_or(0);
        if longest == combos.len() {
            schemes.retain(|s| s.length() == longest);
        }
        schemes.truncate(TEN_KEY_SCHEMES);
        debug!(
            "ten-key segmentation: {} presses, {} schemes, longest {}",
            combos.len(),
            schemes.len(),
            longest
        );
        Segmentation::new(schemes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_engine_suggests() {
        let engine = JyutpingEngine::demo();
        let out = engine.suggest("neihou");
        assert_eq!(out[0].text, "你好");
        assert_eq!(out[0].input, "neihou");
    }

    #[test]
    fn segment_ignores_tones_and_separators() {
        let engine = JyutpingEngine::demo();
        let best = engine.segment("nei5'hou2");
        assert_eq!(best.best().map(Scheme::input_text), Some("neihou".to_string()));
    }

    #[test]
    fn ten_key_segmentation_prefers_full_cover() {
        let engine = JyutpingEngine::demo();
        // h-o-u
        let seg = engine.ten_key_segmentation(&[Combo::GHI, Combo::MNO, Combo::TUV]);
        assert!(!seg.is_empty());
        assert!(seg.iter().all(|s| s.length() == 3));
        assert!(seg.iter().any(|s| s.input_text() == "hou"));
    }

    #[test]
    fn missing_data_dir_is_an_error() {
        let dir = std::env::temp_dir().join(format!("libjyutping_missing_{}", std::process::id()));
        assert!(JyutpingEngine::from_data_dir(&dir).is_err());
    }
}
