//! Gemini recommendation client.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};
use vsound_models::{
    AnalysisResult, FrameSet, RecommendationMode, Recommendations, SongRecommendation,
    FRAME_MIME_TYPE, RECOMMENDATION_COUNT,
};

use crate::config::GeminiConfig;
use crate::error::{AiError, AiResult};
use crate::prompt::build_prompt;
use crate::schema::response_schema;
use crate::types::{Content, GeminiRequest, GeminiResponse, GenerationConfig, InlineData, Part};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Sends sampled frames to Gemini and returns a validated analysis.
///
/// One request per call; failures are returned as-is with no retry.
pub struct RecommendationClient {
    http: Client,
    config: GeminiConfig,
}

impl RecommendationClient {
    /// Create a new client.
    pub fn new(config: GeminiConfig) -> AiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> AiResult<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    pub fn mode(&self) -> RecommendationMode {
        self.config.mode
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Analyze the frames and return a mood description plus recommendations.
    pub async fn get_recommendations(&self, frames: &FrameSet) -> AiResult<AnalysisResult> {
        if frames.is_empty() {
            return Err(AiError::NoFrames);
        }

        let request = self.build_request(frames);
        let url = self.config.endpoint();

        info!(
            model = %self.config.model,
            mode = %self.config.mode,
            frames = frames.len(),
            "Requesting soundtrack recommendations"
        );

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::service(format!(
                "Gemini API returned {}: {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AiError::service(format!("Failed to parse Gemini response: {}", e)))?;

        let text = gemini_response.text().ok_or_else(|| {
            AiError::service(format!(
                "No content in Gemini response (finish reason: {})",
                gemini_response.finish_reason().unwrap_or("unknown")
            ))
        })?;
        debug!(bytes = text.len(), "Received analysis text");

        let result = parse_analysis(&text, self.config.mode)?;
        if result.recommendations.len() != RECOMMENDATION_COUNT {
            warn!(
                count = result.recommendations.len(),
                expected = RECOMMENDATION_COUNT,
                "Unexpected recommendation count"
            );
        }

        info!(
            recommendations = result.recommendations.len(),
            "Received soundtrack recommendations"
        );
        Ok(result)
    }

    fn build_request(&self, frames: &FrameSet) -> GeminiRequest {
        let mut parts = Vec::with_capacity(frames.len() + 1);
        parts.push(Part::Text {
            text: build_prompt(self.config.mode),
        });
        parts.extend(frames.iter().map(|frame| Part::Inline {
            inline_data: InlineData {
                mime_type: FRAME_MIME_TYPE.to_string(),
                data: frame.to_base64(),
            },
        }));

        GeminiRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(self.config.mode),
            },
        }
    }
}

/// Parse the model's text reply into an [`AnalysisResult`].
///
/// Only the shape is checked: `description` must be a string and
/// `recommendations` an array whose items match the mode. Count and genre
/// membership are left to the response schema.
pub fn parse_analysis(text: &str, mode: RecommendationMode) -> AiResult<AnalysisResult> {
    let value: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| AiError::validation(format!("response is not JSON: {}", e)))?;

    let description = value
        .get("description")
        .and_then(Value::as_str)
        .ok_or_else(|| AiError::validation("'description' must be a string"))?
        .to_string();

    let items = value
        .get("recommendations")
        .and_then(Value::as_array)
        .ok_or_else(|| AiError::validation("'recommendations' must be an array"))?;

    let recommendations = match mode {
        RecommendationMode::Songs => Recommendations::Songs(
            items
                .iter()
                .map(|item| {
                    serde_json::from_value::<SongRecommendation>(item.clone()).map_err(|e| {
                        AiError::validation(format!("invalid song recommendation: {}", e))
                    })
                })
                .collect::<AiResult<_>>()?,
        ),
        RecommendationMode::Genres => Recommendations::Genres(
            items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| AiError::validation("genre recommendations must be strings"))
                })
                .collect::<AiResult<_>>()?,
        ),
    };

    Ok(AnalysisResult {
        description,
        recommendations,
    })
}

/// Remove a surrounding markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}
