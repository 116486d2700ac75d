//! Candidate types produced by the engine.
//!
//! This module provides:
//! - `Candidate`: a lexicon word together with the input it consumed
//! - `CoreCandidate`: the reduced form used mid-pipeline before promotion
//! - `uniqued`: order-preserving de-duplication by lexicon identity and input

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// A single word suggestion.
///
/// `input` is the prefix of the raw query this candidate accounts for and
/// `order` is the lexicon row it came from (lower is more frequent).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// Dictionary surface form, e.g. "廣韻".
    pub text: String,
    /// Canonical romanization, e.g. "gwong2 wan3".
    pub romanization: String,
    /// Consumed prefix of the raw input.
    pub input: String,
    /// Display oriented romanization (may omit tones or show partial forms).
    pub mark: String,
    /// Lexicon row ordinal, only ever used as a tie-break.
    pub order: i64,
}

impl Candidate {
    pub fn new<T, R, I, M>(text: T, romanization: R, input: I, mark: M, order: i64) -> Self
    where
        T: Into<String>,
        R: Into<String>,
        I: Into<String>,
        M: Into<String>,
    {
        Self {
            text: text.into(),
            romanization: romanization.into(),
            input: input.into(),
            mark: mark.into(),
            order,
        }
    }

    /// Number of raw input characters this candidate consumes.
    pub fn input_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Number of characters in the surface form.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Identity of the underlying lexicon entry, ignoring how it was reached.
    pub fn lexicon_identity(&self) -> (&str, &str) {
        (&self.text, &self.romanization)
    }

    /// Copy of this candidate with a different consumed input.
    pub fn with_input<I: Into<String>>(&self, input: I) -> Self {
        Self {
            input: input.into(),
            ..self.clone()
        }
    }

    /// Drop the display fields.
    pub fn to_core(&self) -> CoreCandidate {
        CoreCandidate::new(&self.text, &self.romanization, &self.input)
    }

    /// Promote a reduced candidate back to a full one.
    pub fn promote(core: CoreCandidate, mark: impl Into<String>, order: i64) -> Self {
        Self {
            text: core.text,
            romanization: core.romanization,
            input: core.input,
            mark: mark.into(),
            order,
        }
    }
}

impl Add for &Candidate {
    type Output = Candidate;

    /// Concatenate head and tail field-wise; `order` comes from the head.
    fn add(self, tail: &Candidate) -> Candidate {
        Candidate {
            text: format!("{}{}", self.text, tail.text),
            romanization: format!("{} {}", self.romanization, tail.romanization),
            input: format!("{}{}", self.input, tail.input),
            mark: format!("{} {}", self.mark, tail.mark),
            order: self.order,
        }
    }
}

impl Add<&CoreCandidate> for &Candidate {
    type Output = Candidate;

    fn add(self, tail: &CoreCandidate) -> Candidate {
        let tail_mark = crate::classifier::removed_tones(&tail.romanization);
        Candidate {
            text: format!("{}{}", self.text, tail.text),
            romanization: format!("{} {}", self.romanization, tail.romanization),
            input: format!("{}{}", self.input, tail.input),
            mark: format!("{} {}", self.mark, tail_mark),
            order: self.order,
        }
    }
}

/// Candidate without display fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoreCandidate {
    pub text: String,
    pub romanization: String,
    pub input: String,
}

impl CoreCandidate {
    pub fn new<T, R, I>(text: T, romanization: R, input: I) -> Self
    where
        T: Into<String>,
        R: Into<String>,
        I: Into<String>,
    {
        Self {
            text: text.into(),
            romanization: romanization.into(),
            input: input.into(),
        }
    }

    pub fn input_len(&self) -> usize {
        self.input.chars().count()
    }
}

impl Add for &CoreCandidate {
    type Output = CoreCandidate;

    fn add(self, tail: &CoreCandidate) -> CoreCandidate {
        CoreCandidate {
            text: format!("{}{}", self.text, tail.text),
            romanization: format!("{} {}", self.romanization, tail.romanization),
            input: format!("{}{}", self.input, tail.input),
        }
    }
}

/// Remove later duplicates, keeping first occurrences in place.
///
/// Two candidates are duplicates when they share word, romanization and
/// consumed input; `mark` and `order` do not participate.
pub fn uniqued(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: AHashSet<(String, String, String)> = AHashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|c| seen.insert((c.text.clone(), c.romanization.clone(), c.input.clone())))
        .collect()
}
