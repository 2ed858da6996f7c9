//! Record types - wire-form model output and cleaned event records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A cleaned, display-ready event record.
///
/// This is what the pipeline hands to its consumers (table, map, export).
/// Optional coordinates stay `None` when the source never mentioned them;
/// the pipeline never invents values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event or listing name
    pub name: String,

    /// Venue or area the event takes place in
    #[serde(default)]
    pub place: String,

    /// Loosely formatted date text (normalized where recognized)
    #[serde(default)]
    pub date_info: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Label of the page the record came from
    #[serde(default)]
    pub source_name: String,

    /// Link to the page the record came from
    #[serde(default)]
    pub source_url: String,

    /// Latitude, if the source provided one
    pub lat: Option<f64>,

    /// Longitude, if the source provided one
    pub lon: Option<f64>,
}

impl EventRecord {
    /// Create a new record with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            place: String::new(),
            date_info: String::new(),
            description: String::new(),
            source_name: String::new(),
            source_url: String::new(),
            lat: None,
            lon: None,
        }
    }

    /// Set the place.
    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = place.into();
        self
    }

    /// Set the date text.
    pub fn with_date_info(mut self, date_info: impl Into<String>) -> Self {
        self.date_info = date_info.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the source label and URL.
    pub fn with_source(
        mut self,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        self.source_name = name.into();
        self.source_url = url.into();
        self
    }

    /// Set the coordinates.
    pub fn with_coordinates(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    /// Whether the record carries a usable coordinate pair.
    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// One model-emitted object, before any cleaning.
///
/// Every field is optional and common alias spellings are accepted, since
/// the model does not reliably honor the requested field names.
/// Coordinates arrive as JSON numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEventRecord {
    #[serde(default, alias = "title", alias = "event_name")]
    pub name: Option<String>,

    #[serde(default, alias = "location", alias = "venue")]
    pub place: Option<String>,

    #[serde(default, alias = "date", alias = "period")]
    pub date_info: Option<String>,

    #[serde(default)]
    pub start_date: Option<String>,

    #[serde(default)]
    pub end_date: Option<String>,

    #[serde(default, alias = "summary", alias = "detail")]
    pub description: Option<String>,

    #[serde(default, alias = "source", alias = "source_label")]
    pub source_name: Option<String>,

    #[serde(default, alias = "url", alias = "link")]
    pub source_url: Option<String>,

    #[serde(default, alias = "latitude")]
    pub lat: Option<Value>,

    #[serde(default, alias = "lng", alias = "longitude")]
    pub lon: Option<Value>,
}

impl RawEventRecord {
    /// Lower this wire record into an [`EventRecord`].
    ///
    /// When `date_info` is absent but a start/end pair is present, the
    /// pair is joined with `〜`. No filtering happens here.
    pub fn into_event(self) -> EventRecord {
        let date_info = match (self.date_info, self.start_date, self.end_date) {
            (Some(d), _, _) if !d.trim().is_empty() => d,
            (_, Some(start), Some(end)) => format!("{}〜{}", start, end),
            (_, Some(start), None) => start,
            (_, None, Some(end)) => end,
            _ => String::new(),
        };

        EventRecord {
            name: self.name.unwrap_or_default(),
            place: self.place.unwrap_or_default(),
            date_info,
            description: self.description.unwrap_or_default(),
            source_name: self.source_name.unwrap_or_default(),
            source_url: self.source_url.unwrap_or_default(),
            lat: coerce_coordinate(self.lat.as_ref()),
            lon: coerce_coordinate(self.lon.as_ref()),
        }
    }
}

/// Read a coordinate that may be a JSON number, a numeric string, or null.
fn coerce_coordinate(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Counters and failures from one harvest run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Number of sites the run attempted
    pub sites_attempted: usize,

    /// Number of sites fetched and extracted successfully
    pub sites_succeeded: usize,

    /// Site URLs whose fetch or model call failed
    pub failed_sites: Vec<String>,

    /// Records recovered from model responses before cleaning
    pub records_recovered: usize,

    /// Records dropped by the filter stage
    pub records_filtered: usize,

    /// Records dropped as duplicates (including reference-set hits)
    pub records_deduplicated: usize,

    /// Records whose source link was downgraded to a search link
    pub records_downgraded: usize,

    /// Records in the final output
    pub records_kept: usize,
}

impl RunReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if every site contributed.
    pub fn is_complete(&self) -> bool {
        self.failed_sites.is_empty()
    }

    /// Check if the run produced nothing at all.
    pub fn is_empty_run(&self) -> bool {
        self.records_kept == 0
    }
}
