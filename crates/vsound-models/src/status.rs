//! Analysis run status and progress.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Frame capture progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionProgress {
    /// Frames captured so far
    pub captured: usize,
    /// Frames requested
    pub total: usize,
}

impl ExtractionProgress {
    pub fn new(captured: usize, total: usize) -> Self {
        Self { captured, total }
    }

    pub fn is_complete(&self) -> bool {
        self.captured >= self.total
    }

    /// Progress percentage (0-100).
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.captured.min(self.total) * 100) / self.total) as u8
    }
}

/// State of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Nothing uploaded yet, or reset after a run
    #[default]
    Idle,
    /// Media accepted, metadata loading
    Preparing,
    /// Capturing frames
    Extracting { captured: usize, total: usize },
    /// Waiting on the AI service
    Analyzing,
    /// Result available
    Completed,
    /// Run failed; the message is safe to show to the user
    Failed { message: String },
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Preparing => "preparing",
            Self::Extracting { .. } => "extracting",
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
            Self::Failed { .. } => "failed",
        }
    }

    /// Loading message for the current state.
    pub fn message(&self) -> String {
        match self {
            Self::Idle | Self::Completed => String::new(),
            Self::Preparing => "Preparing video for analysis...".to_string(),
            Self::Extracting { captured, total } => {
                format!("Extracting frames... ({}/{})", captured, total)
            }
            Self::Analyzing => "AI is analyzing your video...".to_string(),
            Self::Failed { message } => message.clone(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            Self::Preparing | Self::Extracting { .. } | Self::Analyzing
        )
    }

    /// Discard all run state.
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}

impl From<ExtractionProgress> for AnalysisStatus {
    fn from(progress: ExtractionProgress) -> Self {
        Self::Extracting {
            captured: progress.captured,
            total: progress.total,
        }
    }
}
