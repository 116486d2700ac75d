//! Ten-key entry points.
//!
//! Each press stands for 2-4 letters. Presses are expanded into letter
//! sequences and matched as abbreviations, alongside the best-effort
//! segmentation of the most likely letters.

use tracing::debug;

use crate::candidate::{uniqued, Candidate};
use crate::combo::Combo;
use crate::engine::Engine;
use crate::ranking::ten_key_sorted;
use crate::segmentation::{Segmentation, Segmenter};

/// Every letter sequence the presses can spell, first press varying slowest.
pub fn ten_key_sequences(combos: &[Combo]) -> Vec<String> {
    let Some((first, rest)) = combos.split_first() else {
        return Vec::new();
    };
    let mut sequences: Vec<String> = first.letters().iter().map(|c| c.to_string()).collect();
    for combo in rest {
        sequences = extend(&sequences, combo);
    }
    sequences
}

/// Every sequence followed by every letter of `combo`.
fn extend(sequences: &[String], combo: &Combo) -> Vec<String> {
    sequences
        .iter()
        .flat_map(|s| combo.letters().iter().map(move |c| format!("{}{}", s, c)))
        .collect()
}

impl<G: Segmenter> Engine<G> {
    /// Best-first candidates for a run of ten-key presses.
    pub fn ten_key_suggest(&self, combos: &[Combo], segmentation: &Segmentation) -> Vec<Candidate> {
        if combos.is_empty() {
            return Vec::new();
        }
        if segmentation.max_scheme_length() == 0 {
            return self.ten_key_deep_process(combos);
        }
        let search = self.ten_key_search(combos, segmentation, None);
        if search.is_empty() {
            debug!("no ten-key scheme matches, deep expansion");
            return self.ten_key_deep_process(combos);
        }
        let full_length = search.iter().any(|c| c.input_len() == combos.len());
        let shortcuts = self.ten_key_process(combos);
        let extra = if !full_length && shortcuts.is_empty() {
            self.ten_key_deep_process(combos)
        } else {
            shortcuts
        };
        ten_key_sorted(uniqued(search.into_iter().chain(extra).collect()))
    }

    /// Scheme matches for the presses. Schemes spanning every press are also
    /// tried with trailing syllables dropped.
    pub fn ten_key_search(&self, combos: &[Combo], segmentation: &Segmentation, limit: Option<usize>) -> Vec<Candidate> {
        let count = combos.len();
        let m = self.matcher();
        let perfect: Vec<_> = segmentation.iter().filter(|s| s.length() == count).collect();
        if perfect.is_empty() {
            return segmentation
                .iter()
                .flat_map(|scheme| {
                    m.match_ping(&scheme.ping_text(), &scheme.input_text(), Some(scheme.mark_text().as_str()), limit)
                })
                .collect();
        }
        perfect
            .into_iter()
            .flat_map(|scheme| (1..=scheme.count()).rev().map(move |n| scheme.leading(n)))
            .flat_map(|slice| {
                m.match_ping(&slice.ping_text(), &slice.input_text(), Some(slice.mark_text().as_str()), limit)
            })
            .collect()
    }

    /// Full Cartesian expansion matched as abbreviations, by row order.
    /// Nothing for more than `ten_key_max_presses` presses.
    pub fn ten_key_process(&self, combos: &[Combo]) -> Vec<Candidate> {
        if combos.is_empty() || combos.len() > self.config().ten_key_max_presses {
            return Vec::new();
        }
        let m = self.matcher();
        let mut out: Vec<Candidate> = ten_key_sequences(combos)
            .iter()
            .flat_map(|sequence| m.shortcut(sequence, None))
            .collect();
        out.sort_by_key(|c| c.order);
        out
    }

    /// Fallback expansion over at most `ten_key_deep_limit` presses, matching
    /// every intermediate length too.
    pub fn ten_key_deep_process(&self, combos: &[Combo]) -> Vec<Candidate> {
        let combos = &combos[..combos.len().min(self.config().ten_key_deep_limit)];
        let Some((first, rest)) = combos.split_first() else {
            return Vec::new();
        };
        let m = self.matcher();
        let mut sequences: Vec<String> = first.letters().iter().map(|c| c.to_string()).collect();
        let mut out: Vec<Candidate> = sequences.iter().flat_map(|s| m.shortcut(s, None)).collect();
        for combo in rest {
            sequences = extend(&sequences, combo);
            out.extend(sequences.iter().flat_map(|s| m.shortcut(s, None)));
        }
        ten_key_sorted(uniqued(out))
    }
}
