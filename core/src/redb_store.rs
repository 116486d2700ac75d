//! Persistent lexicon store backed by `redb`.
//!
//! Layout (all values bincode-encoded):
//! - `rows`:     rowid -> `LexiconRow`
//! - `ping`:     ping code -> ascending `Vec<u64>` of rowids
//! - `shortcut`: shortcut code -> ascending `Vec<u64>` of rowids
//! - `prefix`:   prefix code -> ascending `Vec<u64>` of rowids (optional)
//! - `initial`:  code of an abbreviation's first letter -> first rowid
//!
//! The prefix capability is present iff the `prefix` table was written.

use redb::{Database, ReadableTable, TableDefinition};
use std::collections::BTreeMap;
use std::path::Path;

use crate::lexicon::{initial_code, prefix_codes, Lexicon, LexiconRow, LexiconStore, StoreError};

const ROWS: TableDefinition<u64, Vec<u8>> = TableDefinition::new("rows");
const PING: TableDefinition<i64, Vec<u8>> = TableDefinition::new("ping");
const SHORTCUT: TableDefinition<i64, Vec<u8>> = TableDefinition::new("shortcut");
const PREFIX: TableDefinition<i64, Vec<u8>> = TableDefinition::new("prefix");
const INITIAL: TableDefinition<i64, u64> = TableDefinition::new("initial");

pub struct RedbStore {
    db: Database,
    has_prefix: bool,
}

impl RedbStore {
    /// Write `lexicon` into a new database at `path`, replacing any file there.
    pub fn create<P: AsRef<Path>>(path: P, lexicon: &Lexicon, prefix_index: bool) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        let db = Database::create(path).map_err(redb::Error::from)?;

        let mut ping: BTreeMap<i64, Vec<u64>> = BTreeMap::new();
        let mut shortcut: BTreeMap<i64, Vec<u64>> = BTreeMap::new();
        let mut prefix: BTreeMap<i64, Vec<u64>> = BTreeMap::new();
        let mut initial: BTreeMap<i64, u64> = BTreeMap::new();
        for row in lexicon.rows() {
            let rowid = row.rowid as u64;
            if let Some(code) = initial_code(&row.romanization) {
                initial.entry(code).or_insert(rowid);
            }
            ping.entry(row.ping).or_default().push(rowid);
            shortcut.entry(row.shortcut).or_default().push(rowid);
            if prefix_index {
                for code in prefix_codes(&row.ping_text()) {
                    let bucket = prefix.entry(code).or_default();
                    if bucket.last() != Some(&rowid) {
                        bucket.push(rowid);
                    }
                }
            }
        }

        let w = db.begin_write().map_err(redb::Error::from)?;
        {
            let mut table = w.open_table(ROWS).map_err(redb::Error::from)?;
            for row in lexicon.rows() {
                let ser = bincode::serialize(row)?;
                table
                    .insert(&(row.rowid as u64), &ser)
                    .map_err(redb::Error::from)?;
            }
            let mut table = w.open_table(INITIAL).map_err(redb::Error::from)?;
            for (code, rowid) in &initial {
                table.insert(code, rowid).map_err(redb::Error::from)?;
            }
        }
        write_index(&w, PING, &ping)?;
        write_index(&w, SHORTCUT, &shortcut)?;
        if prefix_index {
            write_index(&w, PREFIX, &prefix)?;
        }
        w.commit().map_err(redb::Error::from)?;

        tracing::debug!("wrote {} rows to {}", lexicon.len(), path.display());
        Ok(Self {
            db,
            has_prefix: prefix_index,
        })
    }

    /// Open an existing database read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = Database::open(path.as_ref()).map_err(redb::Error::from)?;
        let has_prefix = {
            let rt = db.begin_read().map_err(redb::Error::from)?;
            rt.open_table(PREFIX).is_ok()
        };
        Ok(Self { db, has_prefix })
    }

    fn lookup(
        &self,
        index: TableDefinition<i64, Vec<u8>>,
        code: i64,
        limit: Option<usize>,
    ) -> Result<Vec<LexiconRow>, StoreError> {
        let rt = self.db.begin_read().map_err(redb::Error::from)?;
        let table = rt.open_table(index).map_err(redb::Error::from)?;
        let Some(ids) = table.get(&code).map_err(redb::Error::from)? else {
            return Ok(Vec::new());
        };
        let ids: Vec<u64> = bincode::deserialize(&ids.value())?;
        let rows_table = rt.open_table(ROWS).map_err(redb::Error::from)?;
        let mut out = Vec::new();
        for id in ids.into_iter().take(limit.unwrap_or(usize::MAX)) {
            if let Some(raw) = rows_table.get(&id).map_err(redb::Error::from)? {
                match bincode::deserialize::<LexiconRow>(&raw.value()) {
                    Ok(row) => out.push(row),
                    Err(e) => tracing::warn!("skipping undecodable row {}: {}", id, e),
                }
            }
        }
        Ok(out)
    }
}

fn write_index(
    w: &redb::WriteTransaction,
    def: TableDefinition<i64, Vec<u8>>,
    index: &BTreeMap<i64, Vec<u64>>,
) -> Result<(), StoreError> {
    let mut table = w.open_table(def).map_err(redb::Error::from)?;
    for (code, ids) in index {
        let ser = bincode::serialize(ids)?;
        table.insert(code, &ser).map_err(redb::Error::from)?;
    }
    Ok(())
}

impl LexiconStore for RedbStore {
    fn query_by_ping(&self, code: i64, limit: Option<usize>) -> Result<Vec<LexiconRow>, StoreError> {
        self.lookup(PING, code, limit)
    }

    fn query_by_shortcut(&self, code: i64, limit: usize) -> Result<Vec<LexiconRow>, StoreError> {
        self.lookup(SHORTCUT, code, Some(limit))
    }

    fn contains_shortcut(&self, code: i64) -> Result<bool, StoreError> {
        let rt = self.db.begin_read().map_err(redb::Error::from)?;
        let table = rt.open_table(SHORTCUT).map_err(redb::Error::from)?;
        Ok(table.get(&code).map_err(redb::Error::from)?.is_some())
    }

    fn contains_initial(&self, code: i64) -> Result<bool, StoreError> {
        let rt = self.db.begin_read().map_err(redb::Error::from)?;
        let table = rt.open_table(INITIAL).map_err(redb::Error::from)?;
        Ok(table.get(&code).map_err(redb::Error::from)?.is_some())
    }

    fn supports_prefix(&self) -> bool {
        self.has_prefix
    }

    fn query_by_prefix(&self, code: i64, limit: usize) -> Result<Vec<LexiconRow>, StoreError> {
        if !self.has_prefix {
            return Err(StoreError::Unsupported("prefix"));
        }
        self.lookup(PREFIX, code, Some(limit))
    }
}
