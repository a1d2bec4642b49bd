//! Recommendation client configuration.

use std::time::Duration;

use vsound_models::RecommendationMode;

use crate::error::{AiError, AiResult};

/// Gemini model used for analysis.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for the recommendation client.
///
/// The credential is owned by whoever builds the config; the client keeps
/// no process-wide state.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent with every request
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Base URL of the Gemini API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Song or genre recommendations
    pub mode: RecommendationMode,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("mode", &self.mode)
            .finish()
    }
}

impl GeminiConfig {
    /// Config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            mode: RecommendationMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: RecommendationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create config from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; `RECOMMENDATION_MODE` must be `songs`
    /// or `genres` when set.
    pub fn from_env() -> AiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AiError::config("GEMINI_API_KEY not set"))?;

        let mode = match std::env::var("RECOMMENDATION_MODE") {
            Ok(raw) => raw.parse().map_err(AiError::config)?,
            Err(_) => RecommendationMode::default(),
        };

        let mut config = Self::new(api_key).with_mode(mode);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(secs) = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// `generateContent` endpoint for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GeminiConfig::new("key");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.mode, RecommendationMode::Songs);
        assert_eq!(
            config.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = GeminiConfig::new("key").with_base_url("http://127.0.0.1:9000/");
        assert_eq!(
            config.endpoint(),
            "http://127.0.0.1:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeminiConfig::new("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[redacted]"));
    }
}
