//! Fetch, optionally convert, then save.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::filename::resolve_filename;
use super::state::StateCell;
use super::{DownloadRequest, DownloadState, FileSink, Notification, Notifier, ResumeSource};
use crate::convert::{
    AbortSignal, ConvertContext, DocumentConverter, NoopProgress, ProgressSink, ProgressTracker,
};
use crate::detect::is_pdf_bytes;
use crate::error::{Error, Result};

/// Drives one résumé download at a time.
///
/// `pdf` and `docx` requests save the fetched bytes unchanged. `word`
/// requests fetch the PDF and run it through the converter on a blocking
/// worker before saving. A second call while a download is in flight
/// fails with [`Error::Busy`] and starts nothing.
pub struct DownloadOrchestrator<S, C, K, N> {
    source: S,
    converter: Arc<C>,
    sink: K,
    notifier: N,
    progress: Arc<dyn ProgressSink>,
    state: StateCell,
    abort: Mutex<Option<AbortSignal>>,
}

impl<S, C, K, N> DownloadOrchestrator<S, C, K, N>
where
    S: ResumeSource,
    C: DocumentConverter + 'static,
    K: FileSink,
    N: Notifier,
{
    /// Create an orchestrator.
    pub fn new(source: S, converter: C, sink: K, notifier: N) -> Self {
        Self {
            source,
            converter: Arc::new(converter),
            sink,
            notifier,
            progress: Arc::new(NoopProgress),
            state: StateCell::default(),
            abort: Mutex::new(None),
        }
    }

    /// Report progress into `sink`.
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Current state.
    pub fn state(&self) -> DownloadState {
        self.state.get()
    }

    /// The notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The converter.
    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Cancel the conversion in flight, if any.
    pub fn abort(&self) {
        if let Some(signal) = self.abort.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            log::info!("Abort requested");
            signal.abort();
        }
    }

    /// Run one download to completion and return the saved path.
    pub async fn download(&self, request: &DownloadRequest) -> Result<PathBuf> {
        self.state.begin()?;
        let mut guard = ResetOnDrop {
            orchestrator: self,
            armed: true,
        };
        self.notifier
            .on_state_change(DownloadState::Idle, DownloadState::Fetching);
        log::info!(
            "Downloading resume of candidate {} for job {} as {}",
            request.candidate_id,
            request.job_id,
            request.format
        );

        let abort = AbortSignal::new();
        *self.abort.lock().unwrap_or_else(|e| e.into_inner()) = Some(abort.clone());
        let tracker = Arc::new(ProgressTracker::new(self.progress.clone()));

        self.notifier.notify(&Notification::Preparing);
        let result = self.run(request, &tracker, &abort).await;
        guard.armed = false;
        *self.abort.lock().unwrap_or_else(|e| e.into_inner()) = None;

        match result {
            Ok(path) => {
                self.notifier.notify(&Notification::Done { path: path.clone() });
                tracker.finish();
                self.transition(DownloadState::Idle)?;
                Ok(path)
            }
            Err(err) => {
                log::warn!("Download failed: {}", err);
                self.notifier.notify(&Notification::Failed {
                    message: err.user_message(),
                    password_protected: err.is_password_protected(),
                });
                self.transition(DownloadState::Error)?;
                self.transition(DownloadState::Idle)?;
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        request: &DownloadRequest,
        tracker: &Arc<ProgressTracker>,
        abort: &AbortSignal,
    ) -> Result<PathBuf> {
        let fetched = self
            .source
            .fetch(
                &request.candidate_id,
                &request.job_id,
                request.format.fetch_format(),
            )
            .await?;
        let filename = resolve_filename(fetched.filename.as_deref(), request);

        let bytes = if request.format.needs_conversion() {
            if !is_pdf_bytes(&fetched.bytes) {
                return Err(Error::UnknownFormat);
            }
            self.transition(DownloadState::Converting)?;
            self.notifier.notify(&Notification::Converting);

            let ctx = ConvertContext::new()
                .with_tracker(tracker.clone())
                .with_abort(abort.clone());
            self.convert(fetched.bytes, ctx).await?
        } else {
            fetched.bytes
        };

        abort.check()?;
        self.transition(DownloadState::Saving)?;
        self.sink.save(&filename, &bytes).await
    }

    async fn convert(&self, pdf: Vec<u8>, ctx: ConvertContext) -> Result<Vec<u8>> {
        let converter = Arc::clone(&self.converter);
        let result = tokio::task::spawn_blocking(move || converter.convert_bytes(&pdf, &ctx))
            .await
            .map_err(|e| Error::Conversion(format!("conversion worker failed: {}", e)))??;
        Ok(result.bytes)
    }

    /// Return to idle after the `download` future was dropped mid-flight.
    fn reset_unfinished(&self) {
        if let Some(signal) = self.abort.lock().unwrap_or_else(|e| e.into_inner()).take() {
            signal.abort();
        }
        if self.state.get().is_busy() {
            log::warn!("Download dropped in state {}", self.state.get());
            let _ = self.transition(DownloadState::Error);
            let _ = self.transition(DownloadState::Idle);
        }
    }

    fn transition(&self, next: DownloadState) -> Result<()> {
        let prev = self.state.transition(next)?;
        log::info!("Download state {} -> {}", prev, next);
        self.notifier.on_state_change(prev, next);
        Ok(())
    }
}

/// Resets the orchestrator if a download future is dropped before it
/// finishes (timeout, `select!`, task abort).
struct ResetOnDrop<'a, S, C, K, N>
where
    S: ResumeSource,
    C: DocumentConverter + 'static,
    K: FileSink,
    N: Notifier,
{
    orchestrator: &'a DownloadOrchestrator<S, C, K, N>,
    armed: bool,
}

impl<S, C, K, N> Drop for ResetOnDrop<'_, S, C, K, N>
where
    S: ResumeSource,
    C: DocumentConverter + 'static,
    K: FileSink,
    N: Notifier,
{
    fn drop(&mut self) {
        if self.armed {
            self.orchestrator.reset_unfinished();
        }
    }
}

impl<S, C, K, N> std::fmt::Debug for DownloadOrchestrator<S, C, K, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadOrchestrator")
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}
