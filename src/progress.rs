use crate::domain::events::ScanEvent;
use tokio::sync::broadcast;

/// Publishes scan status on the event bus.
///
/// Sending never fails from the caller's point of view: with no subscriber
/// the event is dropped.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    event_bus: broadcast::Sender<ScanEvent>,
}

impl ProgressReporter {
    #[must_use]
    pub const fn new(event_bus: broadcast::Sender<ScanEvent>) -> Self {
        Self { event_bus }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.event_bus.subscribe()
    }

    pub fn search_started(&self, message: impl Into<String>) {
        let _ = self.event_bus.send(ScanEvent::SearchStarted {
            message: message.into(),
        });
    }

    pub fn current_dir(&self, path: impl Into<String>) {
        let _ = self
            .event_bus
            .send(ScanEvent::CurrentDir { path: path.into() });
    }

    pub fn progress(&self, current: usize, total: usize) {
        let _ = self.event_bus.send(ScanEvent::Progress { current, total });
    }

    pub fn shows_loaded(&self) {
        let _ = self.event_bus.send(ScanEvent::ShowsLoaded);
    }
}

/// Single monotonic counter for one pipeline invocation.
#[derive(Debug, Default)]
pub struct ProgressCounter {
    current: usize,
    total: usize,
}

impl ProgressCounter {
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// Advances by one and reports the new position.
    pub fn advance(&mut self, reporter: &ProgressReporter) -> usize {
        self.current += 1;
        // Keep the ratio sane if more episodes show up than were counted.
        self.total = self.total.max(self.current);
        reporter.progress(self.current, self.total);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_monotonic_and_reported() {
        let (tx, mut rx) = broadcast::channel(16);
        let reporter = ProgressReporter::new(tx);
        let mut counter = ProgressCounter::new(2);

        assert_eq!(counter.advance(&reporter), 1);
        assert_eq!(counter.advance(&reporter), 2);
        assert_eq!(counter.advance(&reporter), 3);

        assert_eq!(
            rx.try_recv().unwrap(),
            ScanEvent::Progress {
                current: 1,
                total: 2
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            ScanEvent::Progress {
                current: 2,
                total: 2
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            ScanEvent::Progress {
                current: 3,
                total: 3
            }
        );
    }

    #[test]
    fn reporting_without_subscribers_is_silent() {
        let (tx, rx) = broadcast::channel(4);
        drop(rx);
        let reporter = ProgressReporter::new(tx);
        reporter.search_started("Searching for TV Shows...");
        reporter.shows_loaded();
    }
}
