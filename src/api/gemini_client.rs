use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{InsightError, InsightProvider};
use crate::models::{Config, StockPick};

const STOCK_TEMPERATURE: f64 = 0.7;
const STOCK_TOP_P: f64 = 0.95;

const FILE_INSTRUCTION: &str = "Analyze the attached file in the context of Nairobi Securities \
Exchange investing. Summarize what it shows and point out anything relevant to valuation, \
dividends or risk, in at most four sentences.";

/// Gemini `generateContent` request payload.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "topP")]
    top_p: f64,
}

/// Gemini `generateContent` response payload, reduced to the fields the
/// adapter reads.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Client for the external generative text/vision service.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client from application configuration.
    pub fn new(config: &Config) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .user_agent("mapato/0.1")
            .build()?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Send one generate-content request and extract the first candidate's
    /// text. No retries; a failed call surfaces as an `InsightError` for
    /// the adapter's fallback handling.
    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, InsightError> {
        let url = self.endpoint();
        debug!("requesting insight from {} model {}", self.base_url, self.model);

        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Service { status, body });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Malformed(e.to_string()))?;

        let text = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(InsightError::Malformed("response contained no text".to_string()));
        }

        Ok(text.trim().to_string())
    }
}

/// Prompt embedding the pick's identity, price, valuation ratios,
/// catalysts and entry range, asking for a two-sentence rationale.
pub fn build_stock_prompt(pick: &StockPick) -> String {
    format!(
        "Analyze the following NSE stock pick using a value investing bias:\n\
        Symbol: {}\n\
        Sector: {}\n\
        Current Price: {}\n\
        Valuation (PE: {}, PB: {}, Div Yield: {}%)\n\
        Catalysts: {}\n\
        \n\
        Provide a concise 2-sentence rationale for the confidence score and whether \
        the entry range {}-{} is conservative enough given the sector weighting.",
        pick.symbol,
        pick.sector,
        pick.current_price,
        pick.valuation.pe,
        pick.valuation.pb,
        pick.valuation.div_yield_pct,
        pick.catalysts.join(", "),
        pick.buy_range_kes.low,
        pick.buy_range_kes.high,
    )
}

#[async_trait]
impl InsightProvider for GeminiClient {
    async fn stock_insight(&self, pick: &StockPick) -> Result<String, InsightError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::Text { text: build_stock_prompt(pick) }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: STOCK_TEMPERATURE,
                top_p: STOCK_TOP_P,
            }),
        };

        self.generate(&request).await
    }

    async fn file_insight(&self, data: &[u8], mime_type: &str) -> Result<String, InsightError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: general_purpose::STANDARD.encode(data),
                        },
                    },
                    Part::Text { text: FILE_INSTRUCTION.to_string() },
                ],
            }],
            generation_config: None,
        };

        self.generate(&request).await
    }
}
