//! Store lookups turned into candidates.

use crate::candidate::Candidate;
use crate::classifier::removed_tones;
use crate::hash::{ping_code, shortcut_code};
use crate::lexicon::{LexiconHandle, LexiconRow};
use crate::Config;

/// Borrowed view over the store used by one engine call.
pub struct Matcher<'a> {
    store: &'a LexiconHandle,
    config: &'a Config,
}

impl<'a> Matcher<'a> {
    pub fn new(store: &'a LexiconHandle, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// Exact lookup of a toneless spelling.
    ///
    /// `input` becomes the consumed input of every hit; `mark` defaults to the
    /// row's toneless romanization.
    pub fn match_ping(&self, text: &str, input: &str, mark: Option<&str>, limit: Option<usize>) -> Vec<Candidate> {
        if text.is_empty() {
            return Vec::new();
        }
        self.store
            .query_by_ping(ping_code(text), limit)
            .into_iter()
            .map(|row| {
                let mark = mark.map(str::to_string).unwrap_or_else(|| removed_tones(&row.romanization));
                Candidate::new(row.word, row.romanization, input, mark, row.rowid)
            })
            .collect()
    }

    /// Abbreviation lookup, one letter per syllable.
    pub fn shortcut(&self, text: &str, limit: Option<usize>) -> Vec<Candidate> {
        if text.is_empty() {
            return Vec::new();
        }
        let limit = limit.unwrap_or(self.config.shortcut_limit);
        self.store
            .query_by_shortcut(shortcut_code(text), limit)
            .into_iter()
            .map(|row| Self::verbatim_hit(row, text))
            .collect()
    }

    /// Rows whose toneless spelling starts with `text`. Empty when the store
    /// has no prefix index.
    pub fn prefix(&self, text: &str, limit: Option<usize>) -> Vec<Candidate> {
        if text.chars().count() < crate::lexicon::MIN_PREFIX_CHARS || !self.store.supports_prefix() {
            return Vec::new();
        }
        let limit = limit.unwrap_or(self.config.prefix_limit);
        self.store
            .query_by_prefix(ping_code(text), limit)
            .into_iter()
            .filter(|row| row.ping_text().starts_with(text))
            .map(|row| Self::verbatim_hit(row, text))
            .collect()
    }

    /// Cheap probe: could anything in the store match text starting like this?
    pub fn can_process(&self, text: &str) -> bool {
        match text.chars().next() {
            Some(first) => self.store.can_process(first),
            None => false,
        }
    }

    fn verbatim_hit(row: LexiconRow, text: &str) -> Candidate {
        Candidate::new(row.word, row.romanization, text, text, row.rowid)
    }
}
