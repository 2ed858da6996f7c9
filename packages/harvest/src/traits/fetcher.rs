//! Page fetcher trait - the fetch seam.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::types::page::FetchedPage;

/// Fetches one source page and reduces it to extractable text.
///
/// The run loop drives this one URL at a time and inserts its own pause
/// between calls, so implementations do not need to rate-limit single
/// fetches (wrap with [`crate::fetchers::RateLimitedFetcher`] when they
/// should anyway).
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a single page.
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage>;

    /// Fetcher name for logs.
    fn name(&self) -> &str {
        "fetcher"
    }
}
