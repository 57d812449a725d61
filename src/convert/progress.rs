//! Conversion progress reporting.
//!
//! Progress is a single percentage split into fixed bands per stage:
//! extraction 0-40, grouping and classification 40-60, building 60-80 and
//! serialization 80-95. The caller reports 100 after the file is saved.
//! [`ProgressTracker`] drops values lower than the last one emitted, so a
//! sink only ever observes a non-decreasing sequence.

use std::sync::{Arc, Mutex};

/// Pipeline stage a progress value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Reading pages and text runs
    Extracting,
    /// Grouping runs into lines and classifying them
    Classifying,
    /// Assembling the output document
    Building,
    /// Writing DOCX bytes
    Serializing,
    /// File saved
    Done,
}

impl Stage {
    /// Percentage band `(start, end)` owned by this stage.
    pub fn band(&self) -> (u8, u8) {
        match self {
            Stage::Extracting => (0, 40),
            Stage::Classifying => (40, 60),
            Stage::Building => (60, 80),
            Stage::Serializing => (80, 95),
            Stage::Done => (100, 100),
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Extracting => "Extracting text",
            Stage::Classifying => "Analysing layout",
            Stage::Building => "Building document",
            Stage::Serializing => "Writing DOCX",
            Stage::Done => "Done",
        }
    }
}

/// Receives progress updates.
///
/// Implementations must be `Send + Sync`; pages may be extracted on
/// several threads.
pub trait ProgressSink: Send + Sync {
    /// Called with a percentage in 0..=100.
    fn on_progress(&self, percent: u8, stage: Stage) {
        let _ = (percent, stage);
    }
}

/// A sink that ignores every update.
pub struct NoopProgress;

impl ProgressSink for NoopProgress {}

impl<F> ProgressSink for F
where
    F: Fn(u8, Stage) + Send + Sync,
{
    fn on_progress(&self, percent: u8, stage: Stage) {
        self(percent, stage)
    }
}

/// Monotonic progress reporter in front of a [`ProgressSink`].
pub struct ProgressTracker {
    sink: Arc<dyn ProgressSink>,
    last: Mutex<Option<u8>>,
}

impl ProgressTracker {
    /// Wrap a sink.
    pub fn new(sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            sink,
            last: Mutex::new(None),
        }
    }

    /// A tracker that reports nowhere.
    pub fn noop() -> Self {
        Self::new(Arc::new(NoopProgress))
    }

    /// Report an absolute percentage. Values below the last emitted one
    /// are dropped.
    pub fn report(&self, percent: u8, stage: Stage) {
        let percent = percent.min(100);
        // A poisoned lock only means a sink panicked; keep reporting.
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if matches!(*last, Some(prev) if percent < prev) {
            return;
        }
        *last = Some(percent);
        self.sink.on_progress(percent, stage);
    }

    /// Report `done / total` of a stage, scaled into the stage's band.
    pub fn report_fraction(&self, stage: Stage, done: usize, total: usize) {
        let (start, end) = stage.band();
        let fraction = if total == 0 {
            1.0
        } else {
            (done as f32 / total as f32).clamp(0.0, 1.0)
        };
        let percent = start as f32 + fraction * (end - start) as f32;
        self.report(percent.floor() as u8, stage);
    }

    /// Report the start of a stage.
    pub fn start(&self, stage: Stage) {
        self.report(stage.band().0, stage);
    }

    /// Report the end of a stage.
    pub fn complete(&self, stage: Stage) {
        self.report(stage.band().1, stage);
    }

    /// Report exactly 100.
    pub fn finish(&self) {
        self.report(100, Stage::Done);
    }

    /// Last emitted value.
    pub fn last(&self) -> Option<u8> {
        *self.last.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::noop()
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("last", &self.last())
            .finish()
    }
}
