//! Record filtering and source-link repair.
//!
//! Drops records the model should not have produced (empty or placeholder
//! names, bare facility names, missing required fields) and downgrades
//! untrusted source links to a web-search fallback instead of deleting
//! the record.

use tracing::debug;
use url::Url;

use crate::pipeline::dedup::normalize_key;
use crate::types::config::HarvestConfig;
use crate::types::record::EventRecord;

/// `source_name` value given to records whose link was replaced with a
/// generated search query.
pub const SEARCH_FALLBACK_LABEL: &str = "Web検索";

/// Name values that mean "the model had nothing".
const PLACEHOLDER_NAMES: &[&str] = &[
    "unknown", "n/a", "none", "tbd", "-", "不明", "未定", "なし",
];

/// Why a record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Empty or whitespace-only name
    MissingName,

    /// Name is a generic placeholder label
    PlaceholderName,

    /// Name is just the venue name (facility exclusion active)
    FacilityDuplicate,

    /// No source URL and the run requires one
    MissingSourceUrl,

    /// No coordinates and the run excludes unlocated records
    MissingCoordinates,
}

/// Outcome of screening one record.
#[derive(Debug, Clone)]
pub enum FilterDecision {
    /// Record passed unchanged
    Keep(EventRecord),

    /// Record passed with its source link replaced by a search fallback
    Downgraded(EventRecord),

    /// Record was dropped
    Drop(DropReason),
}

/// Screen one record against the run configuration.
pub fn screen_record(record: EventRecord, config: &HarvestConfig) -> FilterDecision {
    let name = record.name.trim();
    if name.is_empty() {
        return FilterDecision::Drop(DropReason::MissingName);
    }

    if is_placeholder(name) {
        debug!(name = %name, "dropping placeholder record");
        return FilterDecision::Drop(DropReason::PlaceholderName);
    }

    if config.exclude_facility_duplicates {
        let name_key = normalize_key(&record.name);
        if !name_key.is_empty() && name_key == normalize_key(&record.place) {
            debug!(name = %name, "dropping bare facility name");
            return FilterDecision::Drop(DropReason::FacilityDuplicate);
        }
    }

    if config.require_source_url && record.source_url.trim().is_empty() {
        return FilterDecision::Drop(DropReason::MissingSourceUrl);
    }

    if !config.include_unlocated && !record.has_coordinates() {
        return FilterDecision::Drop(DropReason::MissingCoordinates);
    }

    // Untrusted or unparseable links are repaired, not fatal. Records
    // with no link at all pass through untouched unless required above.
    if !record.source_url.trim().is_empty() && !config.allow_list.is_trusted(&record.source_url) {
        debug!(url = %record.source_url, "downgrading untrusted source link");
        return FilterDecision::Downgraded(downgrade_source(record));
    }

    FilterDecision::Keep(record)
}

/// Replace an untrusted source link with a generated search query link.
fn downgrade_source(mut record: EventRecord) -> EventRecord {
    record.source_url = fallback_search_url(&record.name, &record.place);
    record.source_name = SEARCH_FALLBACK_LABEL.to_string();
    record
}

/// Build a web-search URL for an event, used as the degraded source link.
pub fn fallback_search_url(name: &str, place: &str) -> String {
    let query = if place.trim().is_empty() {
        name.trim().to_string()
    } else {
        format!("{} {}", name.trim(), place.trim())
    };

    // Static base plus one query pair always parses
    Url::parse_with_params("https://www.google.com/search", &[("q", query.as_str())])
        .map(String::from)
        .unwrap_or_else(|_| "https://www.google.com/search".to_string())
}

/// Case-insensitive placeholder check.
fn is_placeholder(name: &str) -> bool {
    let lowered = name.to_lowercase();
    PLACEHOLDER_NAMES.iter().any(|p| lowered == *p)
}
