//! Load status shown in the top-right corner.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Read side of a progress counter.
///
/// `loaded` never decreases; the Screen compares snapshots of it to decide
/// whether to redraw.
pub trait Status {
    fn loaded(&self) -> usize;
    fn summary(&self) -> String;
}

/// Number of sources loaded out of a known total.
#[derive(Debug, Clone)]
pub struct LoadStatus {
    total: usize,
    loaded: Arc<AtomicUsize>,
}

impl LoadStatus {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            loaded: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Producer handle; the only way to advance the counter.
    pub fn progress(&self) -> LoadProgress {
        LoadProgress {
            total: self.total,
            loaded: Arc::clone(&self.loaded),
        }
    }
}

impl Status for LoadStatus {
    fn loaded(&self) -> usize {
        self.loaded.load(Ordering::SeqCst)
    }

    fn summary(&self) -> String {
        format!("[{}/{}]", self.loaded(), self.total)
    }
}

#[derive(Debug, Clone)]
pub struct LoadProgress {
    total: usize,
    loaded: Arc<AtomicUsize>,
}

impl LoadProgress {
    /// Marks one more source loaded, saturating at the total.
    pub fn advance(&self) -> usize {
        let total = self.total;
        let result = self
            .loaded
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (current < total).then_some(current + 1)
            });
        match result {
            Ok(previous) => previous + 1,
            Err(current) => current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadStatus, Status};

    #[test]
    fn summary_reports_loaded_over_total() {
        let status = LoadStatus::new(10);
        assert_eq!(status.summary(), "[0/10]");
        status.progress().advance();
        assert_eq!(status.loaded(), 1);
        assert_eq!(status.summary(), "[1/10]");
    }

    #[test]
    fn progress_saturates_at_total() {
        let status = LoadStatus::new(2);
        let progress = status.progress();
        assert_eq!(progress.advance(), 1);
        assert_eq!(progress.advance(), 2);
        assert_eq!(progress.advance(), 2);
        assert_eq!(status.loaded(), 2);
    }

    #[test]
    fn clones_share_the_counter() {
        let status = LoadStatus::new(3);
        let view = status.clone();
        status.progress().advance();
        assert_eq!(view.loaded(), 1);
    }
}
