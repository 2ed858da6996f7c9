//! Fetched page type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A fetched source page, reduced to extractable text.
///
/// The content hash lets callers skip re-extraction when a page has not
/// changed between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPage {
    /// URL the page was fetched from
    pub url: String,

    /// Page title if available
    pub title: Option<String>,

    /// Tag-stripped page text
    pub content: String,

    /// SHA-256 hash of the content
    pub content_hash: String,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    /// Create a new fetched page.
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let content_hash = Self::hash_content(&content);

        Self {
            url: url.into(),
            title: None,
            content,
            content_hash,
            fetched_at: Utc::now(),
        }
    }

    /// Calculate SHA-256 hash of content.
    pub fn hash_content(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the fetched timestamp.
    pub fn with_fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = fetched_at;
        self
    }

    /// Check if content differs from this page's content.
    pub fn content_changed(&self, new_content: &str) -> bool {
        Self::hash_content(new_content) != self.content_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash() {
        let page = FetchedPage::new("https://example.jp", "イベント情報");
        assert_eq!(page.content_hash.len(), 64); // SHA-256 hex
        assert!(!page.content_changed("イベント情報"));
        assert!(page.content_changed("別の内容"));
    }
}
