//! Deduplication on normalized `(name, place)` fingerprints.

use indexmap::{IndexMap, IndexSet};

use crate::reference::ReferenceSet;
use crate::types::record::EventRecord;

/// Reduce a string to its dedup key: lowercase, alphanumeric only.
///
/// Spaces (including full-width), punctuation, and symbols are removed so
/// that cosmetic differences between source pages do not split one event
/// into several.
pub fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// The `(name, place)` fingerprint two records are compared by.
pub fn fingerprint(name: &str, place: &str) -> String {
    format!("{}|{}", normalize_key(name), normalize_key(place))
}

/// Order-preserving duplicate tracker.
///
/// Used by the run loop to dedup across source sites: the first site to
/// report an event wins, later sites' copies are dropped. A reference set
/// marks events as seen before the run even starts.
#[derive(Debug, Default)]
pub struct Deduplicator<'a> {
    seen: IndexSet<String>,
    reference: Option<&'a ReferenceSet>,
}

impl<'a> Deduplicator<'a> {
    /// Create a deduplicator, optionally seeded with known events.
    pub fn new(reference: Option<&'a ReferenceSet>) -> Self {
        Self {
            seen: IndexSet::new(),
            reference,
        }
    }

    /// Admit a record if its fingerprint has not been seen yet.
    ///
    /// Returns `false` for duplicates and reference-set hits.
    pub fn admit(&mut self, record: &EventRecord) -> bool {
        if let Some(reference) = self.reference {
            if reference.contains(record) {
                return false;
            }
        }
        self.seen.insert(fingerprint(&record.name, &record.place))
    }

    /// Number of distinct fingerprints admitted so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been admitted yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// One-shot dedup over a list, first occurrence wins.
pub fn dedup_records(
    records: Vec<EventRecord>,
    reference: Option<&ReferenceSet>,
) -> Vec<EventRecord> {
    let mut by_fingerprint: IndexMap<String, EventRecord> = IndexMap::new();

    for record in records {
        if let Some(reference) = reference {
            if reference.contains(&record) {
                continue;
            }
        }
        by_fingerprint
            .entry(fingerprint(&record.name, &record.place))
            .or_insert(record);
    }

    by_fingerprint.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key_strips_space_and_punctuation() {
        assert_eq!(normalize_key("Summer Fest!"), "summerfest");
        assert_eq!(normalize_key("夏　祭り・2025"), "夏祭り2025");
        assert_eq!(normalize_key("  "), "");
    }

    #[test]
    fn test_fingerprint_ignores_case_and_spacing() {
        assert_eq!(
            fingerprint("Summer Fest", "Ueno Park"),
            fingerprint("SUMMERFEST", "ueno park"),
        );
    }

    #[test]
    fn test_dedup_first_occurrence_wins() {
        let records = vec![
            EventRecord::new("夏祭り")
                .with_place("上野公園")
                .with_description("first"),
            EventRecord::new("マルシェ").with_place("駅前広場"),
            EventRecord::new("夏 祭り")
                .with_place("上野公園")
                .with_description("second"),
        ];

        let deduped = dedup_records(records, None);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].name, "夏祭り");
        assert_eq!(deduped[0].description, "first");
        assert_eq!(deduped[1].name, "マルシェ");
    }

    #[test]
    fn test_dedup_output_has_unique_fingerprints() {
        let records = vec![
            EventRecord::new("A").with_place("X"),
            EventRecord::new("B").with_place("X"),
            EventRecord::new("a ").with_place("x"),
            EventRecord::new("B").with_place("Y"),
        ];

        let deduped = dedup_records(records, None);

        let mut fingerprints: Vec<String> = deduped
            .iter()
            .map(|r| fingerprint(&r.name, &r.place))
            .collect();
        let before = fingerprints.len();
        fingerprints.sort();
        fingerprints.dedup();
        assert_eq!(before, fingerprints.len());
        assert_eq!(deduped.len(), 3);
    }

    #[test]
    fn test_dedup_against_reference() {
        let reference = ReferenceSet::from_pairs([("夏祭り", "上野公園")]);
        let records = vec![
            EventRecord::new("夏祭り").with_place("上野公園"),
            EventRecord::new("新作スイーツ発売").with_place("渋谷"),
        ];

        let deduped = dedup_records(records, Some(&reference));

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].name, "新作スイーツ発売");
    }

    #[test]
    fn test_deduplicator_accumulates_across_batches() {
        let mut dedup = Deduplicator::new(None);

        let first = EventRecord::new("夏祭り").with_place("上野公園");
        let second = EventRecord::new("夏祭り").with_place("上野公園");

        assert!(dedup.admit(&first));
        assert!(!dedup.admit(&second));
        assert_eq!(dedup.len(), 1);
    }
}
