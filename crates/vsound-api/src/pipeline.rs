//! One analysis run: extract frames, then ask for recommendations.

use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;
use vsound_ai::{AiError, RecommendationClient, SERVICE_FAILURE_MESSAGE};
use vsound_media::{
    ExtractionError, FrameExtractor, FrameSource, ProgressReceiver, ProgressReporter,
};
use vsound_models::{AnalysisReport, AnalysisStatus, FrameSet};

/// Status updates for a run.
pub type StatusSender = watch::Sender<AnalysisStatus>;

/// Failure of an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Frame extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Recommendation service failed: {0}")]
    Service(String),

    #[error("Invalid recommendation response: {0}")]
    Validation(String),
}

impl From<AiError> for AnalysisError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::Validation(msg) => Self::Validation(msg),
            other => Self::Service(other.to_string()),
        }
    }
}

impl AnalysisError {
    /// The single message shown to the user for a failed run.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Extraction(e) if e.is_load_failure() => {
                "Could not load the video. Please try a different file."
            }
            Self::Extraction(_) => "Could not extract frames from the video.",
            Self::Service(_) | Self::Validation(_) => SERVICE_FAILURE_MESSAGE,
        }
    }
}

/// Run the full analysis for one upload.
///
/// All or nothing: a report is returned only when extraction and the
/// recommendation call both succeed. `status` ends in `Completed` or
/// `Failed`.
pub async fn run_analysis<S>(
    run_id: Uuid,
    source: &mut S,
    extractor: &FrameExtractor,
    recommender: &RecommendationClient,
    status: &StatusSender,
) -> Result<AnalysisReport, AnalysisError>
where
    S: FrameSource + ?Sized,
{
    status.send_replace(AnalysisStatus::Preparing);

    let result = analyze(run_id, source, extractor, recommender, status).await;
    match &result {
        Ok(report) => {
            info!(
                run_id = %run_id,
                recommendations = report.recommendations.len(),
                "Analysis completed"
            );
            status.send_replace(AnalysisStatus::Completed);
        }
        Err(e) => {
            warn!(run_id = %run_id, error = %e, "Analysis failed");
            status.send_replace(AnalysisStatus::Failed {
                message: e.user_message().to_string(),
            });
        }
    }
    result
}

async fn analyze<S>(
    run_id: Uuid,
    source: &mut S,
    extractor: &FrameExtractor,
    recommender: &RecommendationClient,
    status: &StatusSender,
) -> Result<AnalysisReport, AnalysisError>
where
    S: FrameSource + ?Sized,
{
    let frames = extract_with_progress(run_id, source, extractor, status).await?;
    if frames.is_empty() {
        return Err(ExtractionError::NoFrames.into());
    }

    status.send_replace(AnalysisStatus::Analyzing);
    let result = recommender.get_recommendations(&frames).await?;

    Ok(AnalysisReport::new(run_id, frames.len(), result))
}

/// Extract frames while forwarding capture progress to `status`.
async fn extract_with_progress<S>(
    run_id: Uuid,
    source: &mut S,
    extractor: &FrameExtractor,
    status: &StatusSender,
) -> Result<FrameSet, ExtractionError>
where
    S: FrameSource + ?Sized,
{
    let (reporter, mut progress) = ProgressReporter::channel();
    let extractor = extractor.clone().with_progress(reporter);
    status.send_replace(AnalysisStatus::Extracting {
        captured: 0,
        total: extractor.config().frame_count,
    });

    let extraction = extractor.extract(source);
    tokio::pin!(extraction);

    let result = loop {
        tokio::select! {
            result = &mut extraction => break result,
            Ok(()) = progress.changed() => forward_progress(run_id, &mut progress, status),
        }
    };

    // The last report can land in the same poll that finishes extraction
    if progress.has_changed().unwrap_or(false) {
        forward_progress(run_id, &mut progress, status);
    }
    result
}

fn forward_progress(run_id: Uuid, progress: &mut ProgressReceiver, status: &StatusSender) {
    let update = *progress.borrow_and_update();
    info!(
        run_id = %run_id,
        captured = update.captured,
        total = update.total,
        "Extracting frames... ({}/{})",
        update.captured,
        update.total
    );
    status.send_replace(update.into());
}
