//! HTTP page fetcher.
//!
//! Fetches a single page and strips it down to text. No link following,
//! no JavaScript rendering; sites that need a real browser are out of
//! scope for this library.

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::PageFetcher;
use crate::types::page::FetchedPage;

/// Fetcher backed by a plain HTTP GET.
///
/// # Example
///
/// ```rust,ignore
/// use harvest::fetchers::HttpFetcher;
///
/// let fetcher = HttpFetcher::new().with_user_agent("TrendBot/1.0");
/// let page = fetcher.fetch("https://walkerplus.com/event_list/").await?;
/// ```
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
    max_content_chars: usize,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Create a new HTTP fetcher with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            user_agent: "HarvestBot/1.0".to_string(),
            max_content_chars: 40_000,
        }
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Cap page text length before it is handed to the model.
    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }

    /// Strip tags, scripts, and styles from HTML, leaving readable text.
    fn html_to_text(&self, html: &str) -> String {
        let mut text = html.to_string();

        // Remove scripts and styles
        let script_pattern = Regex::new(r"(?s)<script[^>]*>.*?</script>").unwrap();
        let style_pattern = Regex::new(r"(?s)<style[^>]*>.*?</style>").unwrap();
        text = script_pattern.replace_all(&text, "").to_string();
        text = style_pattern.replace_all(&text, "").to_string();

        // Block-level closings become line breaks so listings stay rows
        let break_pattern = Regex::new(r"(?i)</(p|div|li|tr|h[1-6])>|<br\s*/?>").unwrap();
        text = break_pattern.replace_all(&text, "\n").to_string();

        // Remove remaining tags
        let tag_pattern = Regex::new(r"<[^>]+>").unwrap();
        text = tag_pattern.replace_all(&text, "").to_string();

        // Decode the entities that matter for Japanese listing pages
        text = text
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");

        // Collapse blank-line runs
        let multi_newline = Regex::new(r"\n{3,}").unwrap();
        let squeezed = multi_newline.replace_all(&text, "\n\n");

        let trimmed: String = squeezed
            .lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n");

        truncate_chars(trimmed.trim(), self.max_content_chars)
    }

    /// Extract title from HTML.
    fn extract_title(&self, html: &str) -> Option<String> {
        let title_pattern = Regex::new(r"(?s)<title[^>]*>(.*?)</title>").ok()?;
        title_pattern
            .captures(html)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().trim().to_string())
    }
}

/// Truncate on a character boundary.
fn truncate_chars(s: &str, max: usize) -> String {
    if max == 0 || s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect()
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        debug!(url = %url, "HTTP fetch starting");

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        let title = self.extract_title(&html);
        let content = self.html_to_text(&html);

        debug!(
            url = %url,
            content_chars = content.chars().count(),
            "page fetched"
        );

        let mut page = FetchedPage::new(url, content);
        if let Some(title) = title {
            page = page.with_title(title);
        }
        Ok(page)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_strips_tags_and_scripts() {
        let fetcher = HttpFetcher::new();
        let html = r#"
            <html><head><script>var x = 1;</script><style>p{}</style></head>
            <body><h1>イベント一覧</h1><p>夏祭り &amp; 花火大会</p></body></html>
        "#;

        let text = fetcher.html_to_text(html);

        assert!(text.contains("イベント一覧"));
        assert!(text.contains("夏祭り & 花火大会"));
        assert!(!text.contains("var x"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_html_to_text_keeps_listing_rows_separate() {
        let fetcher = HttpFetcher::new();
        let html = "<ul><li>夏祭り</li><li>花火大会</li></ul>";

        let text = fetcher.html_to_text(html);

        assert!(text.contains("夏祭り\n"));
        assert!(text.contains("花火大会"));
    }

    #[test]
    fn test_content_is_truncated() {
        let fetcher = HttpFetcher::new().with_max_content_chars(5);
        let text = fetcher.html_to_text("<p>あいうえおかきくけこ</p>");
        assert_eq!(text, "あいうえお");
    }

    #[test]
    fn test_extract_title() {
        let fetcher = HttpFetcher::new();
        let html = "<html><head><title>イベント情報</title></head></html>";
        assert_eq!(fetcher.extract_title(html), Some("イベント情報".to_string()));
        assert_eq!(fetcher.extract_title("<html></html>"), None);
    }
}
