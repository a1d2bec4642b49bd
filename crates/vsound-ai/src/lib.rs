//! Gemini client for video mood analysis and soundtrack recommendations.
//!
//! Sampled frames are sent inline with an instruction and a strict
//! response schema; the structured reply is shape-checked before it is
//! returned.

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;
pub mod schema;
mod types;

pub use client::{parse_analysis, RecommendationClient};
pub use config::{GeminiConfig, DEFAULT_MODEL};
pub use error::{AiError, AiResult, SERVICE_FAILURE_MESSAGE};
pub use prompt::build_prompt;
pub use schema::response_schema;
