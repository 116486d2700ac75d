//! Segmentation types and the collaborator traits the engine is driven by.
//!
//! Segmentation itself happens outside the engine: a `Segmenter` turns raw
//! text into ranked schemes, and the engine never re-ranks them.

use crate::candidate::Candidate;

/// One syllable of a scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Syllable {
    /// The keystrokes as typed, e.g. "yu".
    pub text: String,
    /// Canonical spelling used for lookups, e.g. "jyu".
    pub origin: String,
}

impl Syllable {
    pub fn new<T: Into<String>, O: Into<String>>(text: T, origin: O) -> Self {
        Self {
            text: text.into(),
            origin: origin.into(),
        }
    }

    /// A syllable typed exactly as it is spelled.
    pub fn plain<T: Into<String>>(text: T) -> Self {
        let text = text.into();
        Self {
            origin: text.clone(),
            text,
        }
    }
}

/// One way of slicing the keystrokes into syllables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Scheme {
    syllables: Vec<Syllable>,
}

impl Scheme {
    pub fn new(syllables: Vec<Syllable>) -> Self {
        Self { syllables }
    }

    /// Scheme of syllables typed as spelled.
    pub fn from_texts<T: AsRef<str>>(texts: &[T]) -> Self {
        Self::new(texts.iter().map(|t| Syllable::plain(t.as_ref())).collect())
    }

    pub fn syllables(&self) -> &[Syllable] {
        &self.syllables
    }

    /// Number of syllables.
    pub fn count(&self) -> usize {
        self.syllables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syllables.is_empty()
    }

    /// Number of keystrokes covered.
    pub fn length(&self) -> usize {
        self.syllables.iter().map(|s| s.text.chars().count()).sum()
    }

    /// The first `count` syllables.
    pub fn leading(&self, count: usize) -> Scheme {
        Scheme::new(self.syllables.iter().take(count).cloned().collect())
    }

    /// Canonical spelling, concatenated: the ping text.
    pub fn ping_text(&self) -> String {
        self.syllables.iter().map(|s| s.origin.as_str()).collect()
    }

    /// Keystrokes, concatenated.
    pub fn input_text(&self) -> String {
        self.syllables.iter().map(|s| s.text.as_str()).collect()
    }

    /// Keystrokes, space separated, for display.
    pub fn mark_text(&self) -> String {
        self.syllables
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// First keystroke of every syllable.
    pub fn anchors(&self) -> String {
        self.syllables
            .iter()
            .filter_map(|s| s.text.chars().next())
            .collect()
    }
}

/// Ranked schemes for one input, best first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    schemes: Vec<Scheme>,
}

impl Segmentation {
    pub fn new(schemes: Vec<Scheme>) -> Self {
        Self {
            schemes: schemes.into_iter().filter(|s| !s.is_empty()).collect(),
        }
    }

    /// Convenience for fixtures: every scheme typed as spelled.
    pub fn from_texts(schemes: &[&[&str]]) -> Self {
        Self::new(schemes.iter().map(|s| Scheme::from_texts(*s)).collect())
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn best(&self) -> Option<&Scheme> {
        self.schemes.first()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Keystroke length of the longest scheme; 0 when there is none.
    pub fn max_scheme_length(&self) -> usize {
        self.schemes.iter().map(Scheme::length).max().unwrap_or(0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scheme> {
        self.schemes.iter()
    }
}

impl<'a> IntoIterator for &'a Segmentation {
    type Item = &'a Scheme;
    type IntoIter = std::slice::Iter<'a, Scheme>;

    fn into_iter(self) -> Self::IntoIter {
        self.schemes.iter()
    }
}

/// Produces ranked syllable schemes for raw text.
///
/// The engine calls this for the unconsumed tail of an input when it
/// concatenates candidates.
pub trait Segmenter {
    fn segment(&self, text: &str) -> Segmentation;
}

/// A segmenter that never finds a syllable. Useful when the caller always
/// supplies segmentation and does not want tail concatenation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSegmenter;

impl Segmenter for NoSegmenter {
    fn segment(&self, _text: &str) -> Segmentation {
        Segmentation::default()
    }
}

/// A symbol/emoji candidate tied to the lexicon word it decorates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The word this symbol stands for, e.g. "你好" for a waving hand.
    pub lexicon_text: String,
    pub candidate: Candidate,
}

impl Symbol {
    pub fn new<T: Into<String>>(lexicon_text: T, candidate: Candidate) -> Self {
        Self {
            lexicon_text: lexicon_text.into(),
            candidate,
        }
    }

    /// Same shape as `Candidate::lexicon_identity` of the decorated word.
    pub fn lexicon_identity(&self) -> (&str, &str) {
        (&self.lexicon_text, &self.candidate.romanization)
    }
}

/// External source of symbol/emoji candidates, merged by lexicon identity.
pub trait SymbolSource: Send + Sync {
    fn symbols(&self, text: &str, segmentation: &Segmentation) -> Vec<Symbol>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_spellings() {
        let scheme = Scheme::new(vec![Syllable::plain("gwong"), Syllable::new("yu", "jyu")]);
        assert_eq!(scheme.length(), 7);
        assert_eq!(scheme.count(), 2);
        assert_eq!(scheme.ping_text(), "gwongjyu");
        assert_eq!(scheme.input_text(), "gwongyu");
        assert_eq!(scheme.mark_text(), "gwong yu");
        assert_eq!(scheme.anchors(), "gy");
        assert_eq!(scheme.leading(1).input_text(), "gwong");
    }

    #[test]
    fn empty_schemes_are_dropped() {
        let seg = Segmentation::new(vec![Scheme::default(), Scheme::from_texts(&["nei"])]);
        assert_eq!(seg.schemes().len(), 1);
        assert_eq!(seg.max_scheme_length(), 3);
        assert_eq!(Segmentation::default().max_scheme_length(), 0);
    }
}
