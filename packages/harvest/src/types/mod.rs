//! Data types for the harvest pipeline.

pub mod config;
pub mod page;
pub mod record;

pub use config::{AllowList, AllowRule, DateRange, HarvestConfig, SourceSite};
pub use page::FetchedPage;
pub use record::{EventRecord, RawEventRecord, RunReport};
