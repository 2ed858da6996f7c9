//! Trend/Event Extraction Harvest Library
//!
//! Fetches configured source pages, asks a hosted text model to extract
//! event-like records from them, and normalizes the model's output into
//! a clean, deduplicated list ready for tabular or map display.
//!
//! # Design Philosophy
//!
//! **"Trust the model's findings, never its formatting"**
//!
//! - The model decides what counts as an event; the pipeline never
//!   fabricates records
//! - Malformed responses are repaired, not rejected
//! - Low-quality records are filtered, untrusted links are downgraded
//! - Every stage degrades to fewer records, never to a failed run
//!
//! # Usage
//!
//! ```rust,ignore
//! use harvest::{harvest, AllowList, HarvestConfig, SourceSite};
//! use harvest::fetchers::HttpFetcher;
//! use harvest::model::GeminiModel;
//!
//! let sites = vec![
//!     SourceSite::new("Walker+", "https://walkerplus.com/event_list/"),
//! ];
//! let config = HarvestConfig::new("期間限定イベント")
//!     .with_allow_list(AllowList::from_sites(&sites));
//!
//! let fetcher = HttpFetcher::new();
//! let model = GeminiModel::from_env()?;
//!
//! let outcome = harvest(&sites, &config, &fetcher, &model).await;
//! println!("{} records", outcome.records.len());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (TextModel, PageFetcher)
//! - [`types`] - Records, pages, and run configuration
//! - [`pipeline`] - Repair, filter, dedup, and date normalization
//! - [`fetchers`] - Fetcher implementations (HttpFetcher, etc.)
//! - [`model`] - Model implementations (GeminiModel)
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod fetchers;
pub mod model;
pub mod pipeline;
pub mod prompts;
pub mod reference;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{FetchError, HarvestError};
pub use reference::ReferenceSet;
pub use traits::{fetcher::PageFetcher, model::TextModel};
pub use types::{
    config::{AllowList, AllowRule, DateRange, HarvestConfig, SourceSite},
    page::FetchedPage,
    record::{EventRecord, RawEventRecord, RunReport},
};

// Re-export pipeline entry points
pub use pipeline::{
    dedup_records, fallback_search_url, fingerprint, harvest, normalize, normalize_date_text,
    normalize_with_report, recover_records, screen_record, Deduplicator, DropReason,
    FilterDecision, HarvestOutcome, SEARCH_FALLBACK_LABEL,
};

// Re-export prompt helpers
pub use prompts::{extract_prompt_hash, format_extract_prompt, EXTRACT_PROMPT};

// Re-export implementations
pub use fetchers::{HttpFetcher, RateLimitedFetcher};
pub use model::GeminiModel;

// Re-export testing utilities
pub use testing::{MockFetcher, MockModel};
