//! Text model trait - the LLM seam.

use async_trait::async_trait;

use crate::error::Result;

/// A hosted text model that turns a prompt into a completion.
///
/// Implementations wrap a specific provider and handle its request and
/// response shapes. The pipeline only ever sends one prompt and reads
/// one text back; response cleaning happens downstream in the repair
/// stage, so implementations should return the completion verbatim.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Generate a completion for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name for logs.
    fn name(&self) -> &str {
        "model"
    }
}
