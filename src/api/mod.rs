use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::models::StockPick;

pub mod gemini_client;
pub use gemini_client::GeminiClient;

/// Fallback shown when the service cannot produce a pick rationale.
pub const STOCK_INSIGHT_FALLBACK: &str =
    "Unable to generate AI insights at this time. Standard valuation metrics suggest a solid entry.";

/// Fallback shown when the service cannot analyze an attached file.
pub const FILE_INSIGHT_FALLBACK: &str =
    "Unable to analyze the attached file at this time. The dashboard data remains unaffected.";

/// Failures at the external-service boundary. Callers never see these
/// past the adapter; they are mapped to the fixed fallback strings.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned status {status}: {body}")]
    Service { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Boundary trait for the external text/vision generation service.
/// Single request, single text response; no retry, no streaming.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Short natural-language rationale for a pick.
    async fn stock_insight(&self, pick: &StockPick) -> Result<String, InsightError>;

    /// Free-text commentary on an uploaded file (image, PDF, audio, video).
    async fn file_insight(&self, data: &[u8], mime_type: &str) -> Result<String, InsightError>;
}

/// Request a pick rationale, degrading to the fixed fallback sentence on
/// any service failure. Errors stop here; display code only ever sees
/// text.
pub async fn request_stock_insight(provider: &dyn InsightProvider, pick: &StockPick) -> String {
    match provider.stock_insight(pick).await {
        Ok(text) => text,
        Err(e) => {
            warn!("stock insight for {} failed: {}", pick.symbol, e);
            STOCK_INSIGHT_FALLBACK.to_string()
        }
    }
}

/// Request file commentary with the same graceful-fallback policy as
/// `request_stock_insight`, using the file-specific fallback message.
pub async fn request_file_insight(
    provider: &dyn InsightProvider,
    data: &[u8],
    mime_type: &str,
) -> String {
    match provider.file_insight(data, mime_type).await {
        Ok(text) => text,
        Err(e) => {
            warn!("file insight ({}) failed: {}", mime_type, e);
            FILE_INSIGHT_FALLBACK.to_string()
        }
    }
}
