//! Capture progress channel.

use tokio::sync::watch;
use vsound_models::ExtractionProgress;

/// Receiving end: the latest progress value, pollable or awaitable.
pub type ProgressReceiver = watch::Receiver<ExtractionProgress>;

/// Publishes capture progress to any number of observers.
///
/// Publishing never blocks and never fails, even with no observers left.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    tx: watch::Sender<ExtractionProgress>,
}

impl ProgressReporter {
    /// Create a reporter and its first receiver.
    pub fn channel() -> (Self, ProgressReceiver) {
        let (tx, rx) = watch::channel(ExtractionProgress::default());
        (Self { tx }, rx)
    }

    /// Publish `captured/total`.
    pub fn report(&self, captured: usize, total: usize) {
        self.tx.send_replace(ExtractionProgress::new(captured, total));
    }

    /// Additional receiver.
    pub fn subscribe(&self) -> ProgressReceiver {
        self.tx.subscribe()
    }

    /// Latest published value.
    pub fn current(&self) -> ExtractionProgress {
        *self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_receivers_see_latest_value() {
        let (reporter, mut rx) = ProgressReporter::channel();
        reporter.report(1, 5);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), ExtractionProgress::new(1, 5));

        let late = reporter.subscribe();
        reporter.report(2, 5);
        assert_eq!(*late.borrow(), ExtractionProgress::new(2, 5));
        assert_eq!(reporter.current().captured, 2);
    }

    #[test]
    fn test_report_without_receivers() {
        let (reporter, rx) = ProgressReporter::channel();
        drop(rx);
        reporter.report(3, 5);
        assert_eq!(reporter.current(), ExtractionProgress::new(3, 5));
    }
}
