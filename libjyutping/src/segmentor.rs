// libjyutping/src/segmentor.rs
//
// Jyutping segmentation: slices raw letters into ranked syllable schemes.
// - trie over the syllable inventory for prefix walks
// - beam search keeping the hypotheses that cover the most keystrokes
// - `yu` typed for `jyu` is accepted and canonicalised in the syllable origin

use std::collections::HashMap;

use libjyutping_core::{Scheme, Segmentation, Segmenter, Syllable};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::syllables;

/// Schemes returned per input unless configured otherwise.
pub const DEFAULT_MAX_SCHEMES: usize = 8;

/// `yu` not already written with an initial and not part of `yuk`/`yum`/`yung`.
static YU: Lazy<Regex> = Lazy::new(|| Regex::new(r"([csjz]?)yu(k|m|ng)?").unwrap());

/// Canonical spelling of a typed syllable: a bare `yu` gains its `j`.
pub fn canonical(text: &str) -> String {
    YU.replace_all(text, |caps: &Captures| {
        if caps[1].is_empty() && caps.get(2).is_none() {
            "jyu".to_string()
        } else {
            caps[0].to_string()
        }
    })
    .into_owned()
}

/// Prefix tree over syllable spellings.
#[derive(Debug, Default)]
struct SyllableTrie {
    children: HashMap<char, SyllableTrie>,
    terminal: bool,
}

impl SyllableTrie {
    fn insert(&mut self, syllable: &str) {
        let mut node = self;
        for ch in syllable.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.terminal = true;
    }

    fn contains(&self, syllable: &str) -> bool {
        let mut node = self;
        for ch in syllable.chars() {
            match node.children.get(&ch) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.terminal
    }

    /// End positions of every syllable starting at `start`, shortest first.
    fn walk(&self, input: &[char], start: usize) -> Vec<usize> {
        let mut ends = Vec::new();
        let mut node = self;
        for (offset, ch) in input[start..].iter().enumerate() {
            let Some(child) = node.children.get(ch) else {
                break;
            };
            node = child;
            if node.terminal {
                ends.push(start + offset + 1);
            }
        }
        ends
    }
}

/// Trie-backed Jyutping segmenter.
///
/// Schemes are ranked by keystrokes covered (more first), then by syllable
/// count (fewer first). A scheme may stop before the end of the input when
/// the rest cannot be spelled.
#[derive(Debug)]
pub struct Segmentor {
    trie: SyllableTrie,
    max_schemes: usize,
}

impl Default for Segmentor {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmentor {
    /// Segmentor over the full Jyutping inventory, `yu` spellings included.
    pub fn new() -> Self {
        let mut syllables = syllables::inventory();
        syllables.extend(
            syllables::FINALS
                .iter()
                .filter(|f| f.starts_with("yu"))
                .map(|f| f.to_string()),
        );
        Self::with_syllables(&syllables)
    }

    /// Segmentor over a custom syllable list.
    pub fn with_syllables<T: AsRef<str>>(syllables: &[T]) -> Self {
        let mut trie = SyllableTrie::default();
        for s in syllables {
            trie.insert(s.as_ref());
        }
        Self {
            trie,
            max_schemes: DEFAULT_MAX_SCHEMES,
        }
    }

    pub fn with_max_schemes(mut self, max_schemes: usize) -> Self {
        self.max_schemes = max_schemes.max(1);
        self
    }

    pub fn contains_syllable(&self, syllable: &str) -> bool {
        self.trie.contains(syllable)
    }

    /// Ranked syllable spellings for `text`, best first.
    pub fn segment_texts(&self, text: &str) -> Vec<Vec<String>> {
        let input: Vec<char> = text.chars().collect();
        if input.is_empty() {
            return Vec::new();
        }

        struct State {
            pos: usize,
            ends: Vec<usize>,
        }

        let beam_width = std::cmp::max(8, self.max_schemes.saturating_mul(4));
        let mut beam = vec![State {
            pos: 0,
            ends: Vec::new(),
        }];
        let mut completed: Vec<State> = Vec::new();

        while !beam.is_empty() {
            let mut next: Vec<State> = Vec::new();
            for st in beam {
                let ends = self.trie.walk(&input, st.pos);
                if ends.is_empty() {
                    if !st.ends.is_empty() {
                        completed.push(st);
                    }
                    continue;
                }
                // longest syllable first so ties keep the greedy reading
                for end in ends.into_iter().rev() {
                    let mut path = st.ends.clone();
                    path.push(end);
                    next.push(State { pos: end, ends: path });
                }
            }
            next.sort_by_key(|s| std::cmp::Reverse(s.pos));
            next.truncate(beam_width);
            beam = next;
        }

        completed.sort_by_key(|s| (std::cmp::Reverse(s.pos), s.ends.len()));
        let mut out: Vec<Vec<String>> = Vec::new();
        for st in completed {
            let mut start = 0;
            let texts: Vec<String> = st
                .ends
                .iter()
                .map(|&end| {
                    let piece: String = input[start..end].iter().collect();
                    start = end;
                    piece
                })
                .collect();
            if !out.contains(&texts) {
                out.push(texts);
            }
            if out.len() == self.max_schemes {
                break;
            }
        }
        out
    }
}

impl Segmenter for Segmentor {
    fn segment(&self, text: &str) -> Segmentation {
        let schemes = self
            .segment_texts(text)
            .into_iter()
            .map(|texts| {
                Scheme::new(
                    texts
                        .into_iter()
                        .map(|t| {
                            let origin = canonical(&t);
                            Syllable::new(t, origin)
                        })
                        .collect(),
                )
            })
            .collect();
        Segmentation::new(schemes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalises_bare_yu() {
        assert_eq!(canonical("yu"), "jyu");
        assert_eq!(canonical("yut"), "jyut");
        assert_eq!(canonical("jyut"), "jyut");
        assert_eq!(canonical("syu"), "syu");
        assert_eq!(canonical("yuk"), "yuk");
        assert_eq!(canonical("yung"), "yung");
        assert_eq!(canonical("nei"), "nei");
    }

    #[test]
    fn trie_walk_reports_every_end() {
        let seg = Segmentor::with_syllables(&["n", "nei", "neih"]);
        let input: Vec<char> = "neihou".chars().collect();
        assert_eq!(seg.trie.walk(&input, 0), vec![1, 3, 4]);
        assert!(seg.trie.walk(&input, 5).is_empty());
        assert!(seg.contains_syllable("nei"));
        assert!(!seg.contains_syllable("ne"));
    }

    #[test]
    fn full_cover_ranks_first() {
        let seg = Segmentor::with_syllables(&["nei", "hou", "ne", "ih"]);
        let schemes = seg.segment_texts("neihou");
        assert_eq!(schemes[0], vec!["nei", "hou"]);
    }

    #[test]
    fn partial_cover_is_kept() {
        let seg = Segmentor::with_syllables(&["gwong"]);
        let schemes = seg.segment_texts("gwongw");
        assert_eq!(schemes, vec![vec!["gwong".to_string()]]);
        assert!(seg.segment_texts("xyz").is_empty());
        assert!(seg.segment_texts("").is_empty());
    }

    #[test]
    fn yu_is_spelled_out_in_origin() {
        let seg = Segmentor::new();
        let segmentation = seg.segment("yutyu");
        let best = segmentation.best().unwrap();
        assert_eq!(best.input_text(), "yutyu");
        assert_eq!(best.ping_text(), "jyutjyu");
    }

    #[test]
    fn max_schemes_is_respected() {
        let seg = Segmentor::new().with_max_schemes(2);
        assert!(seg.segment_texts("gwongzauwaa").len() <= 2);
    }
}
