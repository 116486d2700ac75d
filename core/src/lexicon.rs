//! Lexicon store access layer.
//!
//! The lexicon is a pre-built, frequency-ordered table of
//! `{word, romanization, ping, shortcut, rowid}` rows queried by integer code.
//! Row order is the frequency proxy: lower `rowid` is more common.
//!
//! Public API:
//! - `LexiconRow` - one table row
//! - `LexiconStore` - the read-only query capability, with an optional prefix index
//! - `Lexicon` - in-memory store with bincode (de)serialization helpers
//! - `LexiconHandle` - explicitly owned holder with an open/close lifecycle
//!
//! Backends report failures as `StoreError`; the handle turns every failure
//! into an empty answer so candidate generation never errors out.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::classifier::removed_spaces_tones;
use crate::hash::{abbreviation, ping_code, shortcut_code};

/// A single lexicon row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconRow {
    pub word: String,
    /// Space separated syllables, each tone-digit suffixed.
    pub romanization: String,
    /// Code of the toneless, space-free romanization.
    pub ping: i64,
    /// Code of the abbreviation (`y` folded into `j`).
    pub shortcut: i64,
    pub rowid: i64,
}

impl LexiconRow {
    /// Build a row, deriving both codes from the romanization.
    pub fn new<W: Into<String>, R: Into<String>>(word: W, romanization: R, rowid: i64) -> Self {
        let romanization = romanization.into();
        let ping = ping_code(&removed_spaces_tones(&romanization));
        let shortcut = shortcut_code(&abbreviation(&romanization));
        Self {
            word: word.into(),
            romanization,
            ping,
            shortcut,
            rowid,
        }
    }

    /// Toneless, space-free romanization.
    pub fn ping_text(&self) -> String {
        removed_spaces_tones(&self.romanization)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("lexicon store is not ready")]
    NotReady,
    #[error("store does not support {0} queries")]
    Unsupported(&'static str),
    #[error("redb: {0}")]
    Backend(#[from] redb::Error),
    #[error("codec: {0}")]
    Codec(#[from] bincode::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read-only queries over the lexicon table.
///
/// Every query returns rows in ascending `rowid` order. `limit` bounds the
/// number of rows; `None` means unbounded.
pub trait LexiconStore: Send + Sync {
    /// Rows whose ping code equals `code`.
    fn query_by_ping(&self, code: i64, limit: Option<usize>) -> Result<Vec<LexiconRow>, StoreError>;

    /// Rows whose shortcut code equals `code`.
    fn query_by_shortcut(&self, code: i64, limit: usize) -> Result<Vec<LexiconRow>, StoreError>;

    /// Existence probe on the shortcut index.
    fn contains_shortcut(&self, code: i64) -> Result<bool, StoreError> {
        Ok(!self.query_by_shortcut(code, 1)?.is_empty())
    }

    /// Existence probe on abbreviation initials: is there any row whose
    /// abbreviation starts with the letter hashed into `code`?
    fn contains_initial(&self, code: i64) -> Result<bool, StoreError> {
        self.contains_shortcut(code)
    }

    /// Whether `query_by_prefix` is backed by an index.
    fn supports_prefix(&self) -> bool {
        false
    }

    /// Rows whose toneless romanization starts with the text hashed into `code`.
    fn query_by_prefix(&self, _code: i64, _limit: usize) -> Result<Vec<LexiconRow>, StoreError> {
        Err(StoreError::Unsupported("prefix"))
    }
}

/// Shortest prefix worth indexing; single letters are the shortcut index's job.
pub const MIN_PREFIX_CHARS: usize = 2;

/// Shortcut code of the first letter of a row's abbreviation.
pub fn initial_code(romanization: &str) -> Option<i64> {
    romanization
        .chars()
        .next()
        .map(|first| shortcut_code(&first.to_string()))
}

/// Codes of every indexed proper prefix of `ping_text`.
pub fn prefix_codes(ping_text: &str) -> Vec<i64> {
    let chars: Vec<char> = ping_text.chars().collect();
    (MIN_PREFIX_CHARS..chars.len())
        .map(|len| ping_code(&chars[..len].iter().collect::<String>()))
        .collect()
}

/// In-memory lexicon with hash indexes over its rows.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    rows: Vec<LexiconRow>,
    by_ping: AHashMap<i64, Vec<usize>>,
    by_shortcut: AHashMap<i64, Vec<usize>>,
    by_prefix: Option<AHashMap<i64, Vec<usize>>>,
    initials: AHashSet<i64>,
}

/// Serialized form: only the rows, indexes are rebuilt on load.
#[derive(Serialize, Deserialize)]
struct LexiconFile {
    rows: Vec<LexiconRow>,
    prefix_index: bool,
}

/// Entry of a JSON word list.
#[derive(Debug, Clone, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub romanization: String,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(word, romanization)` pairs listed most frequent first.
    /// Row ids are assigned from 1 in iteration order.
    pub fn from_entries<I, W, R>(entries: I, prefix_index: bool) -> Self
    where
        I: IntoIterator<Item = (W, R)>,
        W: Into<String>,
        R: Into<String>,
    {
        let rows = entries
            .into_iter()
            .enumerate()
            .map(|(i, (w, r))| LexiconRow::new(w, r, i as i64 + 1))
            .collect();
        Self::from_rows(rows, prefix_index)
    }

    /// Build from rows that already carry their codes and row ids.
    pub fn from_rows(mut rows: Vec<LexiconRow>, prefix_index: bool) -> Self {
        rows.sort_by_key(|r| r.rowid);
        let mut by_ping: AHashMap<i64, Vec<usize>> = AHashMap::new();
        let mut by_shortcut: AHashMap<i64, Vec<usize>> = AHashMap::new();
        let mut by_prefix: AHashMap<i64, Vec<usize>> = AHashMap::new();
        let mut initials: AHashSet<i64> = AHashSet::new();
        for (idx, row) in rows.iter().enumerate() {
            initials.extend(initial_code(&row.romanization));
            by_ping.entry(row.ping).or_default().push(idx);
            by_shortcut.entry(row.shortcut).or_default().push(idx);
            if prefix_index {
                for code in prefix_codes(&row.ping_text()) {
                    let bucket = by_prefix.entry(code).or_default();
                    if bucket.last() != Some(&idx) {
                        bucket.push(idx);
                    }
                }
            }
        }
        Self {
            rows,
            by_ping,
            by_shortcut,
            by_prefix: prefix_index.then_some(by_prefix),
            initials,
        }
    }

    /// Parse a JSON array of `{word, romanization}` objects.
    pub fn from_json_str(content: &str, prefix_index: bool) -> Result<Self, StoreError> {
        let entries: Vec<WordEntry> = serde_json::from_str(content)?;
        Ok(Self::from_entries(
            entries.into_iter().map(|e| (e.word, e.romanization)),
            prefix_index,
        ))
    }

    /// A handful of common words for smoke-testing.
    pub fn load_demo() -> Self {
        Self::from_entries(
            [
                ("你", "nei5"),
                ("好", "hou2"),
                ("你好", "nei5 hou2"),
                ("廣", "gwong2"),
                ("韻", "wan5"),
                ("廣韻", "gwong2 wan5"),
                ("香港", "hoeng1 gong2"),
                ("香", "hoeng1"),
                ("港", "gong2"),
                ("粵語", "jyut6 jyu5"),
                ("語", "jyu5"),
                ("我", "ngo5"),
                ("哋", "dei6"),
                ("我哋", "ngo5 dei6"),
            ],
            true,
        )
    }

    pub fn rows(&self) -> &[LexiconRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn collect(&self, bucket: Option<&Vec<usize>>, limit: Option<usize>) -> Vec<LexiconRow> {
        let Some(bucket) = bucket else {
            return Vec::new();
        };
        let limit = limit.unwrap_or(usize::MAX);
        bucket
            .iter()
            .take(limit)
            .map(|idx| self.rows[*idx].clone())
            .collect()
    }

    /// Save the rows using bincode serialization.
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let payload = LexiconFile {
            rows: self.rows.clone(),
            prefix_index: self.by_prefix.is_some(),
        };
        bincode::serialize_into(writer, &payload)?;
        Ok(())
    }

    /// Load a lexicon written by `save_bincode`.
    pub fn load_bincode<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let payload: LexiconFile = bincode::deserialize_from(reader)?;
        Ok(Self::from_rows(payload.rows, payload.prefix_index))
    }
}

impl LexiconStore for Lexicon {
    fn query_by_ping(&self, code: i64, limit: Option<usize>) -> Result<Vec<LexiconRow>, StoreError> {
        Ok(self.collect(self.by_ping.get(&code), limit))
    }

    fn query_by_shortcut(&self, code: i64, limit: usize) -> Result<Vec<LexiconRow>, StoreError> {
        Ok(self.collect(self.by_shortcut.get(&code), Some(limit)))
    }

    fn contains_shortcut(&self, code: i64) -> Result<bool, StoreError> {
        Ok(self.by_shortcut.contains_key(&code))
    }

    fn contains_initial(&self, code: i64) -> Result<bool, StoreError> {
        Ok(self.initials.contains(&code))
    }

    fn supports_prefix(&self) -> bool {
        self.by_prefix.is_some()
    }

    fn query_by_prefix(&self, code: i64, limit: usize) -> Result<Vec<LexiconRow>, StoreError> {
        match &self.by_prefix {
            Some(index) => Ok(self.collect(index.get(&code), Some(limit))),
            None => Err(StoreError::Unsupported("prefix")),
        }
    }
}

/// Shared, explicitly owned handle to the opened store.
///
/// Cloning the handle shares the same slot. `prepare` opens the store once;
/// calling it again while a store is present does nothing. Queries made
/// before `prepare` or after `close` answer with empty results.
#[derive(Clone, Default)]
pub struct LexiconHandle {
    slot: Arc<RwLock<Option<Arc<dyn LexiconStore>>>>,
}

impl std::fmt::Debug for LexiconHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexiconHandle")
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl LexiconHandle {
    /// A handle with nothing opened yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that is ready immediately.
    pub fn with_store<S: LexiconStore + 'static>(store: S) -> Self {
        let handle = Self::new();
        handle.install(Arc::new(store));
        handle
    }

    fn install(&self, store: Arc<dyn LexiconStore>) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = Some(store);
        }
    }

    /// Open the store with `loader` unless one is already open.
    ///
    /// Returns `Ok(true)` when this call opened the store.
    pub fn prepare<S, F>(&self, loader: F) -> Result<bool, StoreError>
    where
        S: LexiconStore + 'static,
        F: FnOnce() -> Result<S, StoreError>,
    {
        let Ok(mut slot) = self.slot.write() else {
            return Err(StoreError::NotReady);
        };
        if slot.is_some() {
            return Ok(false);
        }
        let store = loader()?;
        *slot = Some(Arc::new(store));
        tracing::debug!("lexicon store prepared");
        Ok(true)
    }

    /// Drop the opened store.
    pub fn close(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
    }

    pub fn is_ready(&self) -> bool {
        self.slot.read().map(|s| s.is_some()).unwrap_or(false)
    }

    fn store(&self) -> Result<Arc<dyn LexiconStore>, StoreError> {
        self.slot
            .read()
            .ok()
            .and_then(|s| s.clone())
            .ok_or(StoreError::NotReady)
    }

    fn degrade<T: Default>(what: &str, result: Result<T, StoreError>) -> T {
        result.unwrap_or_else(|e| {
            tracing::warn!("{} query failed: {}", what, e);
            T::default()
        })
    }

    pub fn query_by_ping(&self, code: i64, limit: Option<usize>) -> Vec<LexiconRow> {
        Self::degrade("ping", self.store().and_then(|s| s.query_by_ping(code, limit)))
    }

    pub fn query_by_shortcut(&self, code: i64, limit: usize) -> Vec<LexiconRow> {
        Self::degrade("shortcut", self.store().and_then(|s| s.query_by_shortcut(code, limit)))
    }

    /// Empty when the store has no prefix index.
    pub fn query_by_prefix(&self, code: i64, limit: usize) -> Vec<LexiconRow> {
        match self.store() {
            Ok(s) if s.supports_prefix() => Self::degrade("prefix", s.query_by_prefix(code, limit)),
            Ok(_) => Vec::new(),
            Err(e) => Self::degrade("prefix", Err(e)),
        }
    }

    pub fn supports_prefix(&self) -> bool {
        self.store().map(|s| s.supports_prefix()).unwrap_or(false)
    }

    /// Whether anything in the store could match text starting with `first`.
    pub fn can_process(&self, first: char) -> bool {
        let code = shortcut_code(&first.to_string());
        Self::degrade("existence", self.store().and_then(|s| s.contains_initial(code)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_codes_derive_from_romanization() {
        let row = LexiconRow::new("廣韻", "gwong2 wan3", 7);
        assert_eq!(row.ping, ping_code("gwongwan"));
        assert_eq!(row.shortcut, shortcut_code("gw"));
        assert_eq!(row.ping_text(), "gwongwan");
    }

    #[test]
    fn queries_return_rows_in_rowid_order() {
        let lx = Lexicon::from_entries([("係", "hai6"), ("喺", "hai2"), ("嗨", "hai1")], false);
        let rows = lx.query_by_ping(ping_code("hai"), None).unwrap();
        let words: Vec<&str> = rows.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["係", "喺", "嗨"]);
        let limited = lx.query_by_shortcut(shortcut_code("h"), 2).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[1].rowid, 2);
    }

    #[test]
    fn initials_cover_multi_syllable_words() {
        let lx = Lexicon::from_entries([("廣韻", "gwong2 wan3"), ("粵語", "jyut6 jyu5")], false);
        assert!(lx.contains_initial(shortcut_code("g")).unwrap());
        assert!(!lx.contains_shortcut(shortcut_code("g")).unwrap());
        assert!(lx.contains_initial(shortcut_code("y")).unwrap());
        assert!(!lx.contains_initial(shortcut_code("w")).unwrap());
    }

    #[test]
    fn prefix_index_is_optional() {
        let plain = Lexicon::from_entries([("廣韻", "gwong2 wan3")], false);
        assert!(!plain.supports_prefix());
        assert!(plain.query_by_prefix(ping_code("gwongw"), 10).is_err());

        let indexed = Lexicon::from_entries([("廣韻", "gwong2 wan3")], true);
        assert!(indexed.supports_prefix());
        assert_eq!(indexed.query_by_prefix(ping_code("gwongw"), 10).unwrap().len(), 1);
        // the full spelling is the ping index's job
        assert!(indexed.query_by_prefix(ping_code("gwongwan"), 10).unwrap().is_empty());
    }

    #[test]
    fn bincode_roundtrip_keeps_indexes() {
        let tmp = std::env::temp_dir().join("libjyutping_lexicon_test.bin");
        let lx = Lexicon::from_entries([("你", "nei5"), ("好", "hou2")], true);
        lx.save_bincode(&tmp).unwrap();
        let loaded = Lexicon::load_bincode(&tmp).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.supports_prefix());
        assert_eq!(loaded.query_by_ping(ping_code("hou"), None).unwrap()[0].word, "好");
        let _ = std::fs::remove_file(tmp);
    }

    #[test]
    fn json_word_list() {
        let lx = Lexicon::from_json_str(
            r#"[{"word":"你","romanization":"nei5"},{"word":"好","romanization":"hou2"}]"#,
            false,
        )
        .unwrap();
        assert_eq!(lx.rows()[1].rowid, 2);
    }

    #[test]
    fn handle_lifecycle() {
        let handle = LexiconHandle::new();
        assert!(!handle.is_ready());
        assert!(handle.query_by_ping(ping_code("nei"), None).is_empty());
        assert!(!handle.can_process('n'));

        let opened = handle
            .prepare(|| Ok(Lexicon::from_entries([("你", "nei5")], false)))
            .unwrap();
        assert!(opened);
        assert!(handle.can_process('n'));

        // second prepare is a no-op and never runs the loader
        let again = handle
            .prepare(|| -> Result<Lexicon, StoreError> { Err(StoreError::NotReady) })
            .unwrap();
        assert!(!again);
        assert_eq!(handle.query_by_ping(ping_code("nei"), None).len(), 1);

        handle.close();
        assert!(handle.query_by_ping(ping_code("nei"), None).is_empty());
    }

    #[test]
    fn handle_prefix_query_degrades_without_index() {
        let handle = LexiconHandle::with_store(Lexicon::from_entries([("廣韻", "gwong2 wan3")], false));
        assert!(!handle.supports_prefix());
        assert!(handle.query_by_prefix(ping_code("gwongw"), 10).is_empty());
    }
}
