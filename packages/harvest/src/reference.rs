//! Reference set of already-known events.
//!
//! A run can be seeded with a previously exported list so that events the
//! user has already collected are not reported again.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::pipeline::dedup::{fingerprint, normalize_key};
use crate::types::record::EventRecord;

/// Events known before the run started.
///
/// Lookup happens on the same normalized fingerprint the deduplicator
/// uses. Name-only keys are kept as well: a fresh record without a place
/// counts as known if any reference entry shares its name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceSet {
    fingerprints: HashSet<String>,
    name_keys: HashSet<String>,
}

impl ReferenceSet {
    /// Create an empty reference set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, place)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut set = Self::new();
        for (name, place) in pairs {
            set.insert(name, place);
        }
        set
    }

    /// Build from previously harvested records.
    pub fn from_records(records: &[EventRecord]) -> Self {
        let mut set = Self::new();
        for record in records {
            set.insert(&record.name, &record.place);
        }
        set
    }

    /// Build from a previously exported delimited text blob.
    ///
    /// The first line is treated as a header and skipped. The first
    /// column is the name, the second (if present) the place. Tabs are
    /// used as the delimiter when the header contains one, commas
    /// otherwise. Double-quoted fields are unwrapped.
    pub fn from_delimited(text: &str) -> Self {
        let mut lines = text.lines();
        let delimiter = match lines.next() {
            Some(header) if header.contains('\t') => '\t',
            Some(_) => ',',
            None => return Self::new(),
        };

        let mut set = Self::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = split_delimited(line, delimiter);
            let name = fields.next().unwrap_or_default();
            let place = fields.next().unwrap_or_default();
            if !name.trim().is_empty() {
                set.insert(&name, &place);
            }
        }
        set
    }

    /// Add one known event.
    pub fn insert(&mut self, name: &str, place: &str) {
        let name_key = normalize_key(name);
        if name_key.is_empty() {
            return;
        }
        self.fingerprints.insert(fingerprint(name, place));
        self.name_keys.insert(name_key);
    }

    /// Number of known events.
    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    /// Check whether a record is already known.
    ///
    /// Matches on the full `(name, place)` fingerprint; a record without
    /// a place also matches on name alone.
    pub fn contains(&self, record: &EventRecord) -> bool {
        if self.fingerprints.contains(&fingerprint(&record.name, &record.place)) {
            return true;
        }
        normalize_key(&record.place).is_empty()
            && self.name_keys.contains(&normalize_key(&record.name))
    }
}

/// Split one delimited line, unwrapping double-quoted fields.
fn split_delimited(line: &str, delimiter: char) -> impl Iterator<Item = String> + '_ {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    fields.push(current);
    fields.into_iter()
}
