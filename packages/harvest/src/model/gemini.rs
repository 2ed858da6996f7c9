//! Gemini implementation of the text model trait.
//!
//! Calls the `generateContent` REST endpoint directly with reqwest.
//!
//! # Example
//!
//! ```rust,ignore
//! use harvest::model::GeminiModel;
//!
//! let model = GeminiModel::from_env()?;
//! let completion = model.generate("...").await?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HarvestError, Result};
use crate::security::credentials::ModelCredentials;
use crate::traits::model::TextModel;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini-backed text model.
#[derive(Clone)]
pub struct GeminiModel {
    client: Client,
    credentials: ModelCredentials,
    base_url: String,
}

impl GeminiModel {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            credentials: ModelCredentials::new(api_key, DEFAULT_MODEL),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let credentials = ModelCredentials::from_env("GEMINI_API_KEY", DEFAULT_MODEL)?;
        Ok(Self {
            client: Client::new(),
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Set the model (default: gemini-2.0-flash).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.credentials.model = model.into();
        self
    }

    /// Set a custom base URL (for proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.credentials.model
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl TextModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.credentials.model,
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(model = %self.credentials.model, prompt_chars = prompt.chars().count(), "model call");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.credentials.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| HarvestError::Model(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Model(
                format!("HTTP {} from model endpoint", status).into(),
            ));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| HarvestError::Model(Box::new(e)))?;

        let text: String = body
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(HarvestError::EmptyResponse);
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let model = GeminiModel::new("AIza-test");
        assert_eq!(model.model(), DEFAULT_MODEL);

        let custom = GeminiModel::new("AIza-test").with_model("gemini-2.5-pro");
        assert_eq!(custom.model(), "gemini-2.5-pro");
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "[{\"name\""}, {"text": ":\"A\"}]"}]}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        assert_eq!(text, r#"[{"name":"A"}]"#);
    }
}
