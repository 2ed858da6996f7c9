//! Configuration types for harvest runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::reference::ReferenceSet;

/// A source site the run is configured to read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSite {
    /// Display label used as the default `source_name`
    pub name: String,

    /// Page URL to fetch
    pub url: String,
}

impl SourceSite {
    /// Create a new source site.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// An inclusive date range handed to the extraction prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a new range. `end` before `start` is allowed but pointless;
    /// the prompt passes both through verbatim.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// One allow-list entry: a domain plus an optional path prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowRule {
    /// Host to trust, matched against the URL host and its subdomains
    pub domain: String,

    /// Optional path prefix the URL path must start with
    #[serde(default)]
    pub path_prefix: Option<String>,
}

impl AllowRule {
    /// Parse a rule from `"domain"` or `"domain/path"` form.
    pub fn parse(entry: &str) -> Self {
        let entry = entry
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://");

        match entry.split_once('/') {
            Some((domain, path)) if !path.is_empty() => Self {
                domain: domain.to_ascii_lowercase(),
                path_prefix: Some(format!("/{}", path)),
            },
            Some((domain, _)) => Self {
                domain: domain.to_ascii_lowercase(),
                path_prefix: None,
            },
            None => Self {
                domain: entry.to_ascii_lowercase(),
                path_prefix: None,
            },
        }
    }

    /// Check whether a parsed URL falls under this rule.
    pub fn matches(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(h) => h.to_ascii_lowercase(),
            None => return false,
        };

        let host_ok = host == self.domain || host.ends_with(&format!(".{}", self.domain));
        if !host_ok {
            return false;
        }

        match &self.path_prefix {
            Some(prefix) => url.path().starts_with(prefix.as_str()),
            None => true,
        }
    }
}

/// The set of trusted source domains/paths for a run.
///
/// An empty allow-list trusts everything. Records whose `source_url`
/// falls outside the list are downgraded, not dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllowList {
    #[serde(default)]
    rules: Vec<AllowRule>,
}

impl AllowList {
    /// Create an empty allow-list (trusts everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `"domain"` / `"domain/path"` strings.
    pub fn from_entries(entries: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self {
            rules: entries
                .into_iter()
                .map(|e| AllowRule::parse(e.as_ref()))
                .collect(),
        }
    }

    /// Build from the run's configured source sites.
    pub fn from_sites(sites: &[SourceSite]) -> Self {
        Self::from_entries(sites.iter().map(|s| s.url.as_str()))
    }

    /// Add a rule.
    pub fn allow(mut self, entry: &str) -> Self {
        self.rules.push(AllowRule::parse(entry));
        self
    }

    /// Whether no rules are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check a URL string against the list.
    ///
    /// An empty list trusts everything. A URL that does not parse is
    /// never trusted.
    pub fn is_trusted(&self, url: &str) -> bool {
        if self.rules.is_empty() {
            return true;
        }
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => return false,
        };
        self.rules.iter().any(|r| r.matches(&parsed))
    }
}

/// Configuration for one harvest run.
///
/// Consolidates the knobs the page variants used to hard-code: trusted
/// sources, facility-name exclusion, reference-set dedup, and date
/// normalization.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// What to look for (drives the extraction prompt)
    pub query: String,

    /// Date range the prompt restricts results to
    pub period: Option<DateRange>,

    /// Trusted source domains/paths
    pub allow_list: AllowList,

    /// Drop records whose name is just the venue name
    pub exclude_facility_duplicates: bool,

    /// Drop records without any source URL
    pub require_source_url: bool,

    /// Keep records that lack coordinates
    pub include_unlocated: bool,

    /// Rewrite recognized date formats to zero-padded form
    pub normalize_dates: bool,

    /// Previously exported records to treat as already known
    pub reference: Option<ReferenceSet>,

    /// Pause inserted between successive remote calls
    pub pause_between_calls: Duration,

    /// Cap on the number of output records (0 = uncapped)
    pub max_records: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            query: String::new(),
            period: None,
            allow_list: AllowList::new(),
            exclude_facility_duplicates: true,
            require_source_url: false,
            include_unlocated: true,
            normalize_dates: true,
            reference: None,
            pause_between_calls: Duration::from_millis(1000),
            max_records: 0,
        }
    }
}

impl HarvestConfig {
    /// Create a config for a query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set the date range.
    pub fn with_period(mut self, period: DateRange) -> Self {
        self.period = Some(period);
        self
    }

    /// Set the allow-list.
    pub fn with_allow_list(mut self, allow_list: AllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    /// Toggle the facility-name exclusion.
    pub fn with_facility_exclusion(mut self, on: bool) -> Self {
        self.exclude_facility_duplicates = on;
        self
    }

    /// Require a source URL on every record.
    pub fn require_source_url(mut self) -> Self {
        self.require_source_url = true;
        self
    }

    /// Drop records without coordinates.
    pub fn exclude_unlocated(mut self) -> Self {
        self.include_unlocated = false;
        self
    }

    /// Disable date normalization.
    pub fn without_date_normalization(mut self) -> Self {
        self.normalize_dates = false;
        self
    }

    /// Dedup against a reference set.
    pub fn with_reference(mut self, reference: ReferenceSet) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Set the pause between remote calls.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause_between_calls = pause;
        self
    }

    /// Cap the number of output records.
    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_rule_parse() {
        let rule = AllowRule::parse("https://example.jp/events");
        assert_eq!(rule.domain, "example.jp");
        assert_eq!(rule.path_prefix.as_deref(), Some("/events"));

        let bare = AllowRule::parse("example.jp");
        assert_eq!(bare.domain, "example.jp");
        assert!(bare.path_prefix.is_none());
    }

    #[test]
    fn test_allow_list_matches_subdomain() {
        let list = AllowList::from_entries(["example.jp"]);
        assert!(list.is_trusted("https://example.jp/page"));
        assert!(list.is_trusted("https://news.example.jp/page"));
        assert!(!list.is_trusted("https://evilexample.jp/page"));
        assert!(!list.is_trusted("https://other.jp/page"));
    }

    #[test]
    fn test_allow_list_path_prefix() {
        let list = AllowList::from_entries(["example.jp/events"]);
        assert!(list.is_trusted("https://example.jp/events/2025"));
        assert!(!list.is_trusted("https://example.jp/news/2025"));
    }

    #[test]
    fn test_empty_allow_list_trusts_everything() {
        let list = AllowList::new();
        assert!(list.is_trusted("https://anything.example/whatever"));
    }

    #[test]
    fn test_unparseable_url_is_untrusted() {
        let list = AllowList::from_entries(["example.jp"]);
        assert!(!list.is_trusted("not a url"));
    }

    #[test]
    fn test_from_sites() {
        let sites = vec![
            SourceSite::new("Walker+", "https://walkerplus.com/event_list/"),
            SourceSite::new("Jalan", "https://www.jalan.net/event/"),
        ];
        let list = AllowList::from_sites(&sites);
        assert!(list.is_trusted("https://walkerplus.com/event_list/ar0413/"));
        assert!(!list.is_trusted("https://unknown-blog.example/post"));
    }
}
