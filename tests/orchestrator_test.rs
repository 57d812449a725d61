//! Integration tests for download orchestration.

mod common;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use resumekit::convert::{ConvertContext, ConvertResult, DocumentConverter};
use resumekit::download::{
    DirectorySink, DownloadFormat, DownloadOrchestrator, DownloadRequest, DownloadState,
    FetchedFile, FileSink, Notification, Notifier, ResumeSource,
};
use resumekit::{Error, PdfToDocxConverter, Result, Stage};

/// Serves canned bytes and records every request.
struct MockSource {
    bytes: Vec<u8>,
    filename: Option<String>,
    fail: bool,
    yields: usize,
    hang_once: AtomicBool,
    calls: Arc<Mutex<Vec<(String, String, DownloadFormat)>>>,
}

impl MockSource {
    fn serving(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            filename: None,
            fail: false,
            yields: 0,
            hang_once: AtomicBool::new(false),
            calls: Arc::default(),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::serving(Vec::new())
        }
    }

    fn with_filename(mut self, name: &str) -> Self {
        self.filename = Some(name.to_string());
        self
    }

    fn slow(mut self, yields: usize) -> Self {
        self.yields = yields;
        self
    }

    /// The first fetch never completes.
    fn hanging_once(self) -> Self {
        self.hang_once.store(true, Ordering::SeqCst);
        self
    }

    fn call_log(&self) -> Arc<Mutex<Vec<(String, String, DownloadFormat)>>> {
        self.calls.clone()
    }
}

impl ResumeSource for MockSource {
    async fn fetch(
        &self,
        candidate_id: &str,
        job_id: &str,
        format: DownloadFormat,
    ) -> Result<FetchedFile> {
        self.calls
            .lock()
            .unwrap()
            .push((candidate_id.to_string(), job_id.to_string(), format));
        if self.hang_once.swap(false, Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        for _ in 0..self.yields {
            tokio::task::yield_now().await;
        }
        if self.fail {
            return Err(Error::HttpStatus {
                status: 500,
                url: "http://backend/candidate/download-resume".to_string(),
            });
        }
        let mut file = FetchedFile::new(self.bytes.clone());
        if let Some(name) = &self.filename {
            file = file.with_filename(name.clone());
        }
        Ok(file)
    }
}

/// Wraps the real converter and counts invocations.
#[derive(Default)]
struct CountingConverter {
    inner: PdfToDocxConverter,
    calls: AtomicUsize,
}

impl DocumentConverter for CountingConverter {
    fn name(&self) -> &str {
        "counting"
    }

    fn output_extension(&self) -> &str {
        self.inner.output_extension()
    }

    fn mime_type(&self) -> &'static str {
        self.inner.mime_type()
    }

    fn convert_bytes(&self, bytes: &[u8], ctx: &ConvertContext) -> Result<ConvertResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.convert_bytes(bytes, ctx)
    }
}

/// Keeps saved files in memory; clones share the same store.
#[derive(Clone, Default)]
struct MemorySink {
    saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl FileSink for MemorySink {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.saved
            .lock()
            .unwrap()
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from("/saved").join(filename))
    }
}

/// Records notifications and state changes.
#[derive(Default)]
struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
    transitions: Mutex<Vec<(DownloadState, DownloadState)>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.notifications.lock().unwrap().push(notification.clone());
    }

    fn on_state_change(&self, from: DownloadState, to: DownloadState) {
        self.transitions.lock().unwrap().push((from, to));
    }
}

type TestOrchestrator =
    DownloadOrchestrator<MockSource, CountingConverter, MemorySink, RecordingNotifier>;

fn orchestrator(source: MockSource) -> TestOrchestrator {
    DownloadOrchestrator::new(
        source,
        CountingConverter::default(),
        MemorySink::default(),
        RecordingNotifier::default(),
    )
}

#[tokio::test]
async fn test_pdf_download_saves_bytes_unchanged() {
    let pdf = common::sample_resume();
    let sink = MemorySink::default();
    let orch = DownloadOrchestrator::new(
        MockSource::serving(pdf.clone()).with_filename("resume.pdf"),
        CountingConverter::default(),
        sink.clone(),
        RecordingNotifier::default(),
    );
    let request = DownloadRequest::new("42", "7", DownloadFormat::Pdf);

    let path = orch.download(&request).await.unwrap();

    assert_eq!(path, PathBuf::from("/saved/resume.pdf"));
    assert_eq!(orch.converter().calls.load(Ordering::SeqCst), 0);
    let saved = sink.saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].1, pdf);
    assert_eq!(orch.state(), DownloadState::Idle);
}

#[tokio::test]
async fn test_word_download_fetches_pdf_and_converts_once() {
    let source = MockSource::serving(common::sample_resume()).with_filename("Jane_Doe.pdf");
    let orch = orchestrator(source);
    let request = DownloadRequest::new("42", "7", DownloadFormat::Word);

    let path = orch.download(&request).await.unwrap();

    assert_eq!(path, PathBuf::from("/saved/Jane_Doe.docx"));
    assert_eq!(orch.converter().calls.load(Ordering::SeqCst), 1);

    let notifications = orch.notifier().notifications.lock().unwrap().clone();
    assert_eq!(notifications[0], Notification::Preparing);
    assert_eq!(notifications[1], Notification::Converting);
    assert!(matches!(notifications[2], Notification::Done { .. }));
}

#[tokio::test]
async fn test_word_download_without_server_name() {
    let source = MockSource::serving(common::sample_resume());
    let sink = MemorySink::default();
    let orch = DownloadOrchestrator::new(
        source,
        CountingConverter::default(),
        sink.clone(),
        RecordingNotifier::default(),
    );
    let request = DownloadRequest::new("42", "7", DownloadFormat::Word).with_name("Jane Doe");

    orch.download(&request).await.unwrap();

    let saved = sink.saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, "Jane_Doe_resume.docx");
    assert!(saved[0].1.starts_with(b"PK"));
}

#[tokio::test]
async fn test_fetch_format_per_request_format() {
    for (format, expected) in [
        (DownloadFormat::Pdf, DownloadFormat::Pdf),
        (DownloadFormat::Docx, DownloadFormat::Docx),
        (DownloadFormat::Word, DownloadFormat::Pdf),
    ] {
        let source = MockSource::serving(common::sample_resume());
        let log = source.call_log();
        let orch = DownloadOrchestrator::new(
            source,
            CountingConverter::default(),
            MemorySink::default(),
            RecordingNotifier::default(),
        );
        orch.download(&DownloadRequest::new("c1", "j1", format))
            .await
            .unwrap();

        let calls = log.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            ("c1".to_string(), "j1".to_string(), expected),
            "fetch for {:?}",
            format
        );
    }
}

#[tokio::test]
async fn test_second_download_while_busy_is_rejected() {
    let orch = orchestrator(MockSource::serving(common::sample_resume()).slow(5));
    let request = DownloadRequest::new("42", "7", DownloadFormat::Pdf);

    let (first, second) = tokio::join!(orch.download(&request), orch.download(&request));

    assert!(first.is_ok());
    assert!(matches!(second, Err(Error::Busy)));
    assert_eq!(orch.state(), DownloadState::Idle);
    // The rejected call neither notified nor saved anything.
    let notifications = orch.notifier().notifications.lock().unwrap();
    assert_eq!(
        notifications
            .iter()
            .filter(|n| **n == Notification::Preparing)
            .count(),
        1
    );
}

#[tokio::test]
async fn test_dropped_download_returns_to_idle() {
    let sink = MemorySink::default();
    let orch = DownloadOrchestrator::new(
        MockSource::serving(common::sample_resume()).hanging_once(),
        CountingConverter::default(),
        sink.clone(),
        RecordingNotifier::default(),
    );
    let request = DownloadRequest::new("42", "7", DownloadFormat::Pdf);

    let timed_out = tokio::time::timeout(Duration::from_millis(20), orch.download(&request)).await;
    assert!(timed_out.is_err());
    assert_eq!(orch.state(), DownloadState::Idle);
    assert!(sink.saved.lock().unwrap().is_empty());
    {
        let transitions = orch.notifier().transitions.lock().unwrap();
        assert_eq!(
            transitions[transitions.len() - 2..],
            [
                (DownloadState::Fetching, DownloadState::Error),
                (DownloadState::Error, DownloadState::Idle),
            ]
        );
    }

    // The orchestrator accepts the next download.
    let path = orch.download(&request).await.unwrap();
    assert_eq!(path, PathBuf::from("/saved/candidate_42_resume.pdf"));
    assert_eq!(orch.state(), DownloadState::Idle);
}

#[tokio::test]
async fn test_fetch_failure_notifies_and_returns_to_idle() {
    let sink = MemorySink::default();
    let orch = DownloadOrchestrator::new(
        MockSource::failing(),
        CountingConverter::default(),
        sink.clone(),
        RecordingNotifier::default(),
    );
    let request = DownloadRequest::new("42", "7", DownloadFormat::Word);

    let err = orch.download(&request).await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
    assert_eq!(orch.state(), DownloadState::Idle);
    assert!(sink.saved.lock().unwrap().is_empty());
    assert_eq!(orch.converter().calls.load(Ordering::SeqCst), 0);

    let notifications = orch.notifier().notifications.lock().unwrap();
    match notifications.last() {
        Some(Notification::Failed {
            message,
            password_protected,
        }) => {
            assert_eq!(message, "download failed");
            assert!(!password_protected);
        }
        other => panic!("expected failure notification, got {:?}", other),
    }
}

#[tokio::test]
async fn test_word_download_of_encrypted_pdf_reports_password() {
    let sink = MemorySink::default();
    let orch = DownloadOrchestrator::new(
        MockSource::serving(common::encrypted_pdf()),
        CountingConverter::default(),
        sink.clone(),
        RecordingNotifier::default(),
    );
    let request = DownloadRequest::new("42", "7", DownloadFormat::Word);

    let err = orch.download(&request).await.unwrap_err();

    assert!(err.is_password_protected());
    assert_eq!(orch.converter().calls.load(Ordering::SeqCst), 1);
    assert!(sink.saved.lock().unwrap().is_empty());
    assert_eq!(orch.state(), DownloadState::Idle);

    let notifications = orch.notifier().notifications.lock().unwrap();
    match notifications.last() {
        Some(Notification::Failed {
            message,
            password_protected,
        }) => {
            assert_eq!(message, "cannot convert password-protected PDF");
            assert!(*password_protected);
        }
        other => panic!("expected failure notification, got {:?}", other),
    }
}

#[tokio::test]
async fn test_word_download_of_non_pdf_fails_without_saving() {
    let orch = orchestrator(MockSource::serving(b"PK\x03\x04not a pdf".to_vec()));
    let request = DownloadRequest::new("42", "7", DownloadFormat::Word);

    let err = orch.download(&request).await.unwrap_err();

    assert!(matches!(err, Error::UnknownFormat));
    assert_eq!(orch.converter().calls.load(Ordering::SeqCst), 0);
    assert_eq!(orch.state(), DownloadState::Idle);
    let notifications = orch.notifier().notifications.lock().unwrap();
    assert!(notifications.last().is_some_and(Notification::is_failure));
}

#[tokio::test]
async fn test_word_progress_is_monotonic_and_ends_at_100() {
    let seen = Arc::new(Mutex::new(Vec::<(u8, Stage)>::new()));
    let sink = seen.clone();
    let orch = orchestrator(MockSource::serving(common::sample_resume())).with_progress(Arc::new(
        move |p: u8, s: Stage| {
            sink.lock().unwrap().push((p, s));
        },
    ));

    orch.download(&DownloadRequest::new("42", "7", DownloadFormat::Word))
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert!(seen.len() > 2);
    assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
    assert_eq!(seen.last(), Some(&(100, Stage::Done)));
    assert_eq!(seen.iter().filter(|(p, _)| *p == 100).count(), 1);
}

#[tokio::test]
async fn test_state_change_sequences() {
    let orch = orchestrator(MockSource::serving(common::sample_resume()));
    orch.download(&DownloadRequest::new("1", "2", DownloadFormat::Word))
        .await
        .unwrap();
    let transitions = orch.notifier().transitions.lock().unwrap().clone();
    assert_eq!(
        transitions,
        vec![
            (DownloadState::Idle, DownloadState::Fetching),
            (DownloadState::Fetching, DownloadState::Converting),
            (DownloadState::Converting, DownloadState::Saving),
            (DownloadState::Saving, DownloadState::Idle),
        ]
    );

    let failing = orchestrator(MockSource::failing());
    let _ = failing
        .download(&DownloadRequest::new("1", "2", DownloadFormat::Pdf))
        .await;
    let transitions = failing.notifier().transitions.lock().unwrap().clone();
    assert_eq!(
        transitions,
        vec![
            (DownloadState::Idle, DownloadState::Fetching),
            (DownloadState::Fetching, DownloadState::Error),
            (DownloadState::Error, DownloadState::Idle),
        ]
    );
}

#[tokio::test]
async fn test_orchestrator_usable_after_failure() {
    let orch = orchestrator(MockSource::serving(b"not a pdf".to_vec()));
    let request = DownloadRequest::new("42", "7", DownloadFormat::Word);
    assert!(orch.download(&request).await.is_err());

    // Direct formats do not inspect the bytes.
    let path = orch
        .download(&DownloadRequest::new("42", "7", DownloadFormat::Docx))
        .await
        .unwrap();
    assert_eq!(path, PathBuf::from("/saved/candidate_42_resume.docx"));
}

#[tokio::test]
async fn test_directory_sink_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let orch = DownloadOrchestrator::new(
        MockSource::serving(common::sample_resume()),
        PdfToDocxConverter::default(),
        DirectorySink::new(dir.path()),
        RecordingNotifier::default(),
    );
    let request = DownloadRequest::new("42", "7", DownloadFormat::Word).with_name("Ada Lovelace");

    let path = orch.download(&request).await.unwrap();

    assert_eq!(path, dir.path().join("Ada_Lovelace_resume.docx"));
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"PK"));
}
