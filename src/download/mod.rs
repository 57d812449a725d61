//! Résumé download orchestration.
//!
//! Fetches a candidate's résumé from the backend, converts it to Word when
//! asked, and saves it. The four collaborators are traits so each can be
//! replaced: [`ResumeSource`] (HTTP by default), [`DocumentConverter`]
//! (the PDF pipeline), [`FileSink`] (a directory) and [`Notifier`] (the log).
//!
//! # Example
//!
//! ```no_run
//! use resumekit::config::ClientConfig;
//! use resumekit::convert::PdfToDocxConverter;
//! use resumekit::download::{
//!     DirectorySink, DownloadFormat, DownloadOrchestrator, DownloadRequest, HttpResumeSource,
//!     LogNotifier,
//! };
//!
//! # async fn run() -> resumekit::Result<()> {
//! let source = HttpResumeSource::new(
//!     ClientConfig::new("https://ats.example.com/api").with_token("secret"),
//! )?;
//! let orchestrator = DownloadOrchestrator::new(
//!     source,
//!     PdfToDocxConverter::default(),
//!     DirectorySink::new("downloads"),
//!     LogNotifier,
//! );
//! let request = DownloadRequest::new("42", "7", DownloadFormat::Word).with_name("Jane Doe");
//! let path = orchestrator.download(&request).await?;
//! println!("saved {}", path.display());
//! # Ok(())
//! # }
//! ```
//!
//! [`DocumentConverter`]: crate::convert::DocumentConverter

mod filename;
mod notify;
mod orchestrator;
mod request;
mod sink;
mod source;
mod state;

pub use filename::{fallback_filename, parse_content_disposition, resolve_filename};
pub use notify::{LogNotifier, Notification, Notifier};
pub use orchestrator::DownloadOrchestrator;
pub use request::{DownloadFormat, DownloadRequest};
pub use sink::{DirectorySink, FileSink};
pub use source::{FetchedFile, HttpResumeSource, ResumeSource};
pub use state::DownloadState;
