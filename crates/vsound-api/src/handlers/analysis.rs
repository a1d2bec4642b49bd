//! Video upload and analysis handler.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::Json;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;
use tracing::{error, info, warn};
use uuid::Uuid;

use vsound_media::{FfmpegFrameSource, FrameExtractor};
use vsound_models::{is_video_mime, AnalysisReport, AnalysisStatus, MediaInput, UploadError};

use crate::error::{ApiError, ApiResult};
use crate::pipeline::{run_analysis, AnalysisError};
use crate::state::AppState;

/// Multipart field carrying the video.
pub const VIDEO_FIELD: &str = "video";

/// Upload a video and return its mood description and soundtrack picks.
///
/// Expects `multipart/form-data` with a single `video` file field whose
/// content type is `video/*`.
pub async fn analyze_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<AnalysisReport>> {
    let (media, temp_path) = receive_video(&mut multipart).await?;
    let run_id = Uuid::new_v4();

    info!(
        run_id = %run_id,
        mime_type = %media.mime_type,
        bytes = media.byte_len,
        file_name = media.file_name.as_deref().unwrap_or(""),
        "Starting analysis"
    );

    let mut source = FfmpegFrameSource::new(media)
        .with_owned_file(temp_path)
        .with_capture_timeout(state.extractor.capture_timeout);
    let extractor = FrameExtractor::new(state.extractor.clone());
    let (status, _) = watch::channel(AnalysisStatus::Idle);

    let report = run_analysis(
        run_id,
        &mut source,
        &extractor,
        &state.recommender,
        &status,
    )
    .await
    .map_err(|e| {
        if matches!(e, AnalysisError::Service(_)) {
            error!(run_id = %run_id, error = %e, "Recommendation service error");
        }
        ApiError::from(e)
    })?;

    Ok(Json(report))
}

/// Read the `video` field into a temp file, applying the MIME gate first.
async fn receive_video(multipart: &mut Multipart) -> ApiResult<(MediaInput, TempPath)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let mime_type = field.content_type().unwrap_or_default().to_string();
        if !is_video_mime(&mime_type) {
            warn!(mime_type = %mime_type, "Rejected non-video upload");
            return Err(UploadError::UnsupportedMediaType(mime_type).into());
        }
        let file_name = field.file_name().map(str::to_string);

        let (temp_path, byte_len) = store_field(field).await?;
        let mut media = MediaInput::new(temp_path.to_path_buf(), mime_type, byte_len)?;
        if let Some(name) = file_name {
            media = media.with_file_name(name);
        }
        return Ok((media, temp_path));
    }

    Err(ApiError::bad_request(format!(
        "Missing '{}' file field",
        VIDEO_FIELD
    )))
}

/// Stream a multipart field to a new temp file.
async fn store_field(mut field: Field<'_>) -> ApiResult<(TempPath, u64)> {
    let temp_path = tempfile::Builder::new()
        .prefix("vsound-upload-")
        .tempfile()?
        .into_temp_path();

    let mut file = tokio::fs::File::create(&temp_path).await?;
    let mut byte_len = 0u64;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?
    {
        file.write_all(&chunk).await?;
        byte_len += chunk.len() as u64;
    }
    file.flush().await?;

    Ok((temp_path, byte_len))
}
