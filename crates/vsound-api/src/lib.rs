//! Axum HTTP API for video soundtrack recommendations.
//!
//! This crate provides:
//! - Video upload with a uniform `video/*` gate
//! - The analysis pipeline (frame extraction, then AI recommendations)
//! - The genre soundtrack catalog
//! - Health and readiness probes

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use pipeline::{run_analysis, AnalysisError, StatusSender};
pub use routes::create_router;
pub use state::AppState;
