// core/src/engine.rs
//
// Candidate dispatcher: picks matching strategies from the input shape and
// the segmentation, sequences them, and owns tail concatenation.

use tracing::{debug, trace};

use crate::candidate::{uniqued, Candidate, CoreCandidate};
use crate::classifier::{
    char_at, char_prefix, char_suffix, is_separator, is_tone, removed_separators,
    removed_separators_tones, removed_spaces, removed_spaces_tones, removed_tones, tones,
    InputShape, SEPARATOR,
};
use crate::lexicon::LexiconHandle;
use crate::matcher::Matcher;
use crate::ranking::{preferred, rank_rows, RowCandidate};
use crate::segmentation::{NoSegmenter, Segmentation, Segmenter, SymbolSource};
use crate::{utils, Config};

/// Per-call switches for `Engine::suggest`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuggestOptions {
    /// Merge symbol/emoji candidates from the attached `SymbolSource`.
    pub needs_symbols: bool,
    /// Skip the strict tone/separator handling and answer from a plain query.
    pub asap: bool,
}

/// Candidate generation engine.
///
/// Holds the injected store handle, a segmenter used for unconsumed tails,
/// and an optional symbol source. Every call is independent; nothing is
/// cached between keystrokes.
pub struct Engine<G = NoSegmenter> {
    store: LexiconHandle,
    segmenter: G,
    config: Config,
    symbols: Option<Box<dyn SymbolSource>>,
}

impl<G: Segmenter> Engine<G> {
    pub fn new(store: LexiconHandle, segmenter: G, config: Config) -> Self {
        Self {
            store,
            segmenter,
            config,
            symbols: None,
        }
    }

    /// Attach a symbol/emoji source.
    pub fn with_symbols<S: SymbolSource + 'static>(mut self, source: S) -> Self {
        self.symbols = Some(Box::new(source));
        self
    }

    pub fn store(&self) -> &LexiconHandle {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn segmenter(&self) -> &G {
        &self.segmenter
    }

    pub(crate) fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.store, &self.config)
    }

    /// Best-first candidates for `text` given its segmentation.
    pub fn suggest(&self, text: &str, segmentation: &Segmentation, options: SuggestOptions) -> Vec<Candidate> {
        let text = utils::normalize(text);
        match text.chars().count() {
            0 => Vec::new(),
            1 => self.suggest_letter(&text),
            _ if !options.asap => self.dispatch(&text, segmentation, options.needs_symbols),
            _ if segmentation.max_scheme_length() == 0 => self.process_verbatim(&text, None),
            _ => {
                let candidates = self.query(&text, segmentation, options.needs_symbols, None);
                if candidates.is_empty() {
                    self.process_verbatim(&text, None)
                } else {
                    candidates
                }
            }
        }
    }

    /// One keystroke: `a`, `o`, `m` and `e` are words on their own, every
    /// other letter only opens an abbreviation.
    fn suggest_letter(&self, text: &str) -> Vec<Candidate> {
        let m = self.matcher();
        let out = match text {
            "a" => {
                let mut out = m.match_ping(text, text, None, None);
                out.extend(m.match_ping("aa", text, None, None));
                out.extend(m.shortcut(text, None));
                out
            }
            "o" | "m" | "e" => {
                let mut out = m.match_ping(text, text, None, None);
                out.extend(m.shortcut(text, None));
                out
            }
            _ => m.shortcut(text, None),
        };
        uniqued(out)
    }

    /// Branch on (has separators, has tones).
    pub fn dispatch(&self, text: &str, segmentation: &Segmentation, needs_symbols: bool) -> Vec<Candidate> {
        let shape = InputShape::classify(text);
        debug!(
            "dispatch {:?}: separators={} tones={}",
            text, shape.has_separators, shape.has_tones
        );
        match (shape.has_separators, shape.has_tones) {
            (true, true) => self.dispatch_spelled(text),
            (false, true) => self.dispatch_toned(text, segmentation),
            (true, false) => self.dispatch_separated(text, segmentation),
            (false, false) => {
                let Some(best) = segmentation.best() else {
                    debug!("no scheme for {:?}, verbatim fallback", text);
                    return self.process_verbatim(text, None);
                };
                if best.length() == text.chars().count() {
                    self.process(text, segmentation, needs_symbols, None, 0)
                } else {
                    debug!("best scheme covers {} of {:?}", best.length(), text);
                    self.process_partial(text, segmentation, needs_symbols)
                }
            }
        }
    }

    /// Separators and tones: the typed text must spell the start of the
    /// candidate's romanization literally.
    fn dispatch_spelled(&self, text: &str) -> Vec<Candidate> {
        let spelled = text.replace(SEPARATOR, " ");
        let spelled = spelled.trim();
        self.matcher()
            .match_ping(&removed_separators_tones(text), text, None, None)
            .into_iter()
            .filter(|c| c.romanization.starts_with(spelled))
            .collect()
    }

    /// Tones only: match toneless, then keep what agrees with the digits.
    fn dispatch_toned(&self, text: &str, segmentation: &Segmentation) -> Vec<Candidate> {
        let text_tones = tones(text);
        let raw = removed_tones(text);
        let mut candidates = self.matcher().match_ping(&raw, &raw, None, None);
        candidates.extend(self.search(&raw, segmentation, None));
        let qualified: Vec<Candidate> = uniqued(candidates)
            .iter()
            .filter_map(|item| qualify_tones(text, &text_tones, item))
            .collect();
        trace!("{} toned candidates for {:?}", qualified.len(), text);
        preferred(uniqued(qualified), text)
    }

    /// Separators only: the typed parts must equal the candidate's syllables,
    /// or be an in-progress prefix of them.
    fn dispatch_separated(&self, text: &str, segmentation: &Segmentation) -> Vec<Candidate> {
        let parts: Vec<&str> = text.split(SEPARATOR).filter(|p| !p.is_empty()).collect();
        let raw = removed_separators(text);
        let mut candidates = self.matcher().match_ping(&raw, &raw, None, None);
        candidates.extend(self.search(&raw, segmentation, None));
        let qualified: Vec<Candidate> = uniqued(candidates)
            .iter()
            .filter_map(|item| qualify_parts(text, &parts, item))
            .collect();
        let sorted = preferred(uniqued(qualified), text);
        if !sorted.is_empty() {
            return sorted;
        }

        // each part may be a bare initial
        let anchors: String = parts.iter().filter_map(|p| p.chars().next()).collect();
        debug!("separated parts unmatched, trying anchors {:?}", anchors);
        self.matcher()
            .shortcut(&anchors, None)
            .into_iter()
            .filter(|item| {
                let spelled = removed_tones(&item.romanization);
                let syllables: Vec<&str> = spelled.split(' ').collect();
                syllables.len() == parts.len()
                    && syllables.iter().zip(&parts).all(|(s, p)| {
                        if p.chars().count() == 1 {
                            s.starts_with(*p)
                        } else {
                            s == p
                        }
                    })
            })
            .map(|item| item.with_input(text))
            .collect()
    }

    /// Segmentation-driven matching for plain letters that a scheme covers.
    ///
    /// `limit` bounds every store query and is set while processing a tail;
    /// `depth` counts tail nesting.
    pub fn process(
        &self,
        text: &str,
        segmentation: &Segmentation,
        needs_symbols: bool,
        limit: Option<usize>,
        depth: usize,
    ) -> Vec<Candidate> {
        if !self.matcher().can_process(text) {
            return Vec::new();
        }
        let text_count = text.chars().count();
        let primary = self.query(text, segmentation, needs_symbols, limit);
        let Some(first_len) = primary.first().map(Candidate::input_len) else {
            return self.process_verbatim(text, limit);
        };
        if first_len == text_count {
            return primary;
        }

        let prefixes = self.expand_prefixes(text, segmentation, limit);
        if !prefixes.is_empty() {
            trace!("{} prefix expansions for {:?}", prefixes.len(), text);
            return uniqued(prefixes.into_iter().chain(primary).collect());
        }

        let mut concatenated = Vec::new();
        if depth < self.config.max_concat_depth {
            let tail = char_suffix(text, first_len);
            if self.matcher().can_process(tail) {
                let tail_segmentation = self.segmenter.segment(tail);
                let tails: Vec<Candidate> = self
                    .process(
                        tail,
                        &tail_segmentation,
                        false,
                        Some(self.config.tail_query_limit),
                        depth + 1,
                    )
                    .into_iter()
                    .take(self.config.concat_tail_limit)
                    .collect();
                let heads: Vec<&Candidate> = primary
                    .iter()
                    .filter(|c| c.input_len() == first_len)
                    .take(self.config.concat_head_limit)
                    .collect();
                concatenated = tails
                    .iter()
                    .flat_map(|t| heads.iter().map(move |h| *h + t))
                    .take(self.config.concat_result_limit)
                    .collect();
            }
        } else {
            debug!("concatenation depth {} reached at {:?}", depth, text);
        }
        trace!("{} concatenations for {:?}", concatenated.len(), text);

        let backup = self.process_verbatim(text, limit);
        uniqued(concatenated.into_iter().chain(primary).chain(backup).collect())
    }

    /// Anchor expansion for under-typed trailing syllables: every scheme's
    /// initials plus the first unconsumed letter as an abbreviation.
    fn expand_prefixes(&self, text: &str, segmentation: &Segmentation, limit: Option<usize>) -> Vec<Candidate> {
        let text_count = text.chars().count();
        if segmentation.max_scheme_length() >= text_count {
            return Vec::new();
        }
        let m = self.matcher();
        let mut out = Vec::new();
        for scheme in segmentation {
            let tail = char_suffix(text, scheme.length());
            let Some(last_anchor) = tail.chars().next() else {
                continue;
            };
            let mut anchors = scheme.anchors();
            anchors.push(last_anchor);
            let mark = format!("{} {}", scheme.mark_text(), tail);
            out.extend(
                m.shortcut(&anchors, limit)
                    .into_iter()
                    .filter(|c| removed_tones(&c.romanization).starts_with(&mark))
                    .map(|c| Candidate::new(c.text, c.romanization, text, mark.as_str(), c.order)),
            );
        }
        if out.is_empty() && self.store.supports_prefix() {
            debug!("anchor expansion empty, querying prefix index for {:?}", text);
            out = m.prefix(text, limit);
        }
        out
    }

    /// Matching for text that the best scheme covers only in part.
    pub fn process_partial(&self, text: &str, segmentation: &Segmentation, needs_symbols: bool) -> Vec<Candidate> {
        let text_count = text.chars().count();
        let m = self.matcher();
        let candidates = self.search(text, segmentation, None);
        let mut full = m.match_ping(text, text, None, None);
        if needs_symbols {
            self.insert_symbols(&mut full, text, segmentation);
        }
        full.extend(m.shortcut(text, None));
        let backup = self.process_verbatim(text, None);

        let fallback = |middle: Vec<Candidate>| -> Vec<Candidate> {
            uniqued(
                full.iter()
                    .cloned()
                    .chain(middle)
                    .chain(candidates.iter().cloned())
                    .chain(backup.iter().cloned())
                    .collect(),
            )
        };

        let Some(first_len) = candidates.first().map(Candidate::input_len) else {
            return fallback(Vec::new());
        };
        if first_len == text_count {
            return fallback(Vec::new());
        }

        let prefixes = self.expand_prefixes(text, segmentation, None);
        if !prefixes.is_empty() {
            return fallback(prefixes);
        }

        let tail = char_suffix(text, first_len);
        let tail_letters: Vec<char> = tail.chars().collect();
        let tails: Vec<CoreCandidate> = self
            .process_verbatim(tail, None)
            .into_iter()
            .filter(|item| {
                if removed_spaces_tones(&item.romanization).starts_with(tail) {
                    return true;
                }
                let initials: Vec<char> = item
                    .romanization
                    .split(' ')
                    .filter_map(|s| s.chars().next())
                    .collect();
                initials == tail_letters
            })
            .map(|item| CoreCandidate::new(item.text, item.romanization, tail))
            .collect();
        if tails.is_empty() {
            return fallback(Vec::new());
        }
        let heads: Vec<&Candidate> = candidates
            .iter()
            .take(self.config.concat_head_limit)
            .filter(|c| c.input_len() == first_len)
            .collect();
        let concatenated: Vec<Candidate> = tails
            .iter()
            .flat_map(|t| heads.iter().map(move |h| *h + t))
            .take(self.config.concat_result_limit)
            .collect();
        trace!("{} partial concatenations for {:?}", concatenated.len(), text);
        fallback(concatenated)
    }

    /// Exact and abbreviation lookups on every non-empty leading slice of
    /// `text`, longest first.
    pub fn process_verbatim(&self, text: &str, limit: Option<usize>) -> Vec<Candidate> {
        let m = self.matcher();
        if !m.can_process(text) {
            return Vec::new();
        }
        let count = text.chars().count();
        let mut out = Vec::new();
        for dropped in 0..count {
            let leading = char_prefix(text, count - dropped);
            out.extend(m.match_ping(leading, leading, None, limit));
            out.extend(m.shortcut(leading, limit));
        }
        uniqued(out)
    }

    /// Exact match, full-length scheme matches, symbols, shortcut, then every
    /// scheme match.
    pub fn query(
        &self,
        text: &str,
        segmentation: &Segmentation,
        needs_symbols: bool,
        limit: Option<usize>,
    ) -> Vec<Candidate> {
        let text_count = text.chars().count();
        let m = self.matcher();
        let searches = self.search(text, segmentation, limit);
        let mut items = m.match_ping(text, text, None, limit);
        items.extend(searches.iter().filter(|c| c.input_len() == text_count).cloned());
        if needs_symbols && limit.is_none() && !items.is_empty() {
            self.insert_symbols(&mut items, text, segmentation);
        }
        items.extend(m.shortcut(text, limit));
        items.extend(searches);
        uniqued(items)
    }

    /// Match every ranked scheme. Schemes spanning the whole text are also
    /// tried with trailing syllables dropped.
    pub fn search(&self, text: &str, segmentation: &Segmentation, limit: Option<usize>) -> Vec<Candidate> {
        let text_count = text.chars().count();
        let m = self.matcher();
        let perfect: Vec<_> = segmentation
            .iter()
            .filter(|s| s.length() == text_count)
            .collect();
        let slices: Vec<_> = if perfect.is_empty() {
            segmentation.iter().cloned().collect()
        } else {
            perfect
                .into_iter()
                .flat_map(|scheme| (1..=scheme.count()).rev().map(move |n| scheme.leading(n)))
                .collect()
        };
        let rows: Vec<RowCandidate> = slices
            .iter()
            .flat_map(|slice| {
                let is_exact = slice.length() == text_count;
                m.match_ping(&slice.ping_text(), &slice.input_text(), Some(slice.mark_text().as_str()), limit)
                    .into_iter()
                    .map(move |c| RowCandidate::new(c, is_exact))
            })
            .collect();
        trace!("{} scheme rows for {:?}", rows.len(), text);
        rank_rows(rows, text_count, self.config.order_tolerance)
    }

    /// Place each symbol right after the first item with the same lexicon
    /// identity; symbols without such an item are dropped.
    fn insert_symbols(&self, items: &mut Vec<Candidate>, text: &str, segmentation: &Segmentation) {
        let Some(source) = &self.symbols else {
            return;
        };
        for symbol in source.symbols(text, segmentation).into_iter().rev() {
            let position = items
                .iter()
                .position(|c| c.lexicon_identity() == symbol.lexicon_identity());
            if let Some(index) = position {
                items.insert(index + 1, symbol.candidate);
            }
        }
    }
}

/// Keep `item` if its tones agree with the digits typed in `text`, rewriting
/// its consumed input to include them.
fn qualify_tones(text: &str, text_tones: &str, item: &Candidate) -> Option<Candidate> {
    let continuous = removed_spaces(&item.romanization);
    let continuous_tones = tones(&continuous);
    let len = item.input_len();
    let text_len = text.chars().count();
    let tone_follows = char_at(text, len).is_some_and(is_tone);
    let tone_last = text.chars().last().is_some_and(is_tone);
    let input = match (text_tones.chars().count(), continuous_tones.chars().count()) {
        (1, 1) => {
            if text_tones != continuous_tones || !tone_follows {
                return None;
            }
            char_prefix(text, len + 1)
        }
        (1, 2) if tone_last => {
            if !continuous_tones.ends_with(text_tones) || !tone_follows {
                return None;
            }
            text
        }
        (1, 2) => {
            if !continuous_tones.starts_with(text_tones) {
                return None;
            }
            char_prefix(text, len + 1)
        }
        (2, 1) => {
            if !text_tones.starts_with(continuous_tones.as_str()) || !tone_follows {
                return None;
            }
            char_prefix(text, len + 1)
        }
        (2, 2) => {
            if text_tones != continuous_tones {
                return None;
            }
            if tone_last {
                if len + 2 != text_len {
                    return None;
                }
                text
            } else {
                if char_at(text, len + 1) != text_tones.chars().last() {
                    return None;
                }
                char_prefix(text, len + 2)
            }
        }
        _ => {
            if continuous.starts_with(text) {
                text
            } else if text.starts_with(continuous.as_str()) {
                char_prefix(text, continuous.chars().count())
            } else {
                return None;
            }
        }
    };
    Some(item.with_input(input))
}

/// Keep `item` if its syllables line up with the separated `parts` typed in
/// `text`, rewriting its consumed input to include the separators.
fn qualify_parts(text: &str, parts: &[&str], item: &Candidate) -> Option<Candidate> {
    let spelled = removed_tones(&item.romanization);
    let syllables: Vec<&str> = spelled.split(' ').collect();
    if syllables == parts {
        return Some(item.with_input(text));
    }
    if text.starts_with(SEPARATOR) {
        return None;
    }
    let separators = text.chars().filter(|c| is_separator(*c)).count();
    let trailing = text.ends_with(SEPARATOR);
    let len = item.input_len();
    let text_len = text.chars().count();
    let first = parts.first().copied().unwrap_or_default();
    let input = match (separators, trailing, syllables.len()) {
        (1, true, 1) if len + 1 == text_len => text,
        (1, true, _) => return None,
        (1, false, 1) if item.input == first => char_prefix(text, len + 1),
        (1, false, 2) if syllables[0] == first => char_prefix(text, len + 1),
        (1, false, _) => return None,
        (2, true, 1) if item.input == first => char_prefix(text, len + 1),
        (2, true, 2) if len + 2 == text_len && syllables[0] == first => text,
        (2, true, _) => return None,
        (_, _, count) => {
            if count >= parts.len() || syllables.iter().zip(parts).any(|(s, p)| s != p) {
                return None;
            }
            char_prefix(text, len + count - 1)
        }
    };
    Some(item.with_input(input))
}
