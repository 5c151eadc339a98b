// src/journal.rs
//! Journal store: one JSON array of entries under one file path, the local
//! analogue of the UI's storage key. Mutated only by the caller after the
//! pipeline returns; last-write-wins on id collision.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::warn;

use crate::types::JournalEntry;

pub const DEFAULT_JOURNAL_PATH: &str = "data/journal_entries.json";

#[derive(Debug, Clone)]
pub struct JournalStore {
    path: PathBuf,
}

impl JournalStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir); // best-effort
        }
        Self { path }
    }

    pub fn at_default_path() -> Self {
        Self::new(DEFAULT_JOURNAL_PATH)
    }

    /// All entries, newest first. Read problems degrade to an empty list —
    /// a broken file must not take the journal UI down with it.
    pub fn get_all(&self) -> Vec<JournalEntry> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "journal file unreadable; treating as empty");
                Vec::new()
            }
        }
    }

    pub fn get_recent(&self, n: usize) -> Vec<JournalEntry> {
        let mut all = self.get_all();
        all.truncate(n);
        all
    }

    /// Insert or replace by id, keeping the newest entry first.
    pub fn save(&self, entry: &JournalEntry) -> std::io::Result<()> {
        let mut entries = self.get_all();
        entries.retain(|e| e.id != entry.id);
        entries.insert(0, entry.clone());
        self.write_all(&entries)
    }

    /// Returns true when an entry was actually removed.
    pub fn delete(&self, id: &str) -> bool {
        let mut entries = self.get_all();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return false;
        }
        self.write_all(&entries).is_ok()
    }

    pub fn clear(&self) -> std::io::Result<()> {
        self.write_all(&[])
    }

    /// Serialize the whole journal for backup/export.
    pub fn export_all(&self) -> String {
        serde_json::to_string_pretty(&self.get_all()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Replace the journal with an exported blob. Returns false (and leaves
    /// the store untouched) when the blob does not parse.
    pub fn import_all(&self, json: &str) -> bool {
        let entries: Vec<JournalEntry> = match serde_json::from_str(json) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "journal import rejected: invalid JSON");
                return false;
            }
        };
        self.write_all(&entries).is_ok()
    }

    /// Entries grouped by calendar day (UTC), for the history/chart views.
    pub fn group_by_day(&self) -> BTreeMap<NaiveDate, Vec<JournalEntry>> {
        let mut grouped: BTreeMap<NaiveDate, Vec<JournalEntry>> = BTreeMap::new();
        for entry in self.get_all() {
            grouped
                .entry(entry.timestamp.date_naive())
                .or_default()
                .push(entry);
        }
        grouped
    }

    fn write_all(&self, entries: &[JournalEntry]) -> std::io::Result<()> {
        // A serialization failure must surface, not overwrite the journal
        // with an empty array.
        let json = serde_json::to_string(entries)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let tmp = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&tmp)?;
        f.write_all(json.as_bytes())?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}
