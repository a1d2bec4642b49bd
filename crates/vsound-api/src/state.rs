//! Application state.

use std::sync::Arc;

use vsound_ai::{AiResult, GeminiConfig, RecommendationClient};
use vsound_media::ExtractorConfig;

use crate::config::ApiConfig;

/// Shared application state.
///
/// Immutable after start-up; each request runs its own analysis.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub extractor: ExtractorConfig,
    pub recommender: Arc<RecommendationClient>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        config: ApiConfig,
        extractor: ExtractorConfig,
        gemini: GeminiConfig,
    ) -> AiResult<Self> {
        Ok(Self {
            config,
            extractor,
            recommender: Arc::new(RecommendationClient::new(gemini)?),
        })
    }

    /// Build state from environment variables.
    pub fn from_env(config: ApiConfig) -> AiResult<Self> {
        Self::new(config, ExtractorConfig::from_env(), GeminiConfig::from_env()?)
    }
}
