//! Health check handlers.

use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use vsound_media::{check_ffmpeg, check_ffprobe};

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub ffmpeg: CheckStatus,
    pub ffprobe: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for CheckStatus {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(_) => Self {
                status: "ok".to_string(),
                error: None,
            },
            Err(e) => Self {
                status: "error".to_string(),
                error: Some(e.to_string()),
            },
        }
    }
}

/// Readiness check endpoint (readiness probe).
/// Frame extraction needs both FFmpeg binaries on PATH.
pub async fn ready() -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let checks = ReadinessChecks {
        ffmpeg: check_ffmpeg().into(),
        ffprobe: check_ffprobe().into(),
    };

    let all_ok = checks.ffmpeg.status == "ok" && checks.ffprobe.status == "ok";
    let response = ReadinessResponse {
        status: if all_ok { "ready" } else { "degraded" }.to_string(),
        checks,
    };

    if all_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
