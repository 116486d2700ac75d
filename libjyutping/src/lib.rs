//! libjyutping crate root
//!
//! This crate provides the Cantonese-specific half of the input method: the
//! Jyutping syllable inventory, a trie-backed segmentor, and a high-level
//! `JyutpingEngine` that composes the segmentor with the shared
//! `libjyutping-core` candidate engine.
//!
//! Public API exported here:
//! - `Segmentor` from `segmentor`
//! - `JyutpingEngine` from `engine`
//! - `is_syllable` / `inventory` from `syllables`

pub mod engine;
pub mod segmentor;
pub mod syllables;

pub use engine::JyutpingEngine;
pub use segmentor::{canonical, Segmentor};
pub use syllables::{inventory, is_syllable};

// Convenience re-exports for common types used by callers.
pub use libjyutping_core::{
    Candidate, Combo, Config, Lexicon, LexiconHandle, RedbStore, Segmentation, Segmenter,
    SuggestOptions, Symbol, SymbolSource,
};
