//! The PDF to Word conversion pipeline.
//!
//! A [`DocumentConverter`] turns source bytes into output bytes. The
//! orchestrator in [`crate::download`] only sees the trait, so any pipeline
//! can be plugged in.
//!
//! # Example
//!
//! ```no_run
//! use resumekit::convert::{ConvertContext, ConvertOptions, DocumentConverter, PdfToDocxConverter};
//!
//! fn main() -> resumekit::Result<()> {
//!     let converter = PdfToDocxConverter::new(ConvertOptions::default());
//!     let pdf = std::fs::read("resume.pdf")?;
//!     let result = converter.convert_bytes(&pdf, &ConvertContext::new())?;
//!     std::fs::write("resume.docx", &result.bytes)?;
//!     Ok(())
//! }
//! ```

mod cancel;
mod pdf;
mod progress;

pub use cancel::AbortSignal;
pub use pdf::PdfToDocxConverter;
pub use progress::{NoopProgress, ProgressSink, ProgressTracker, Stage};

use crate::error::Result;
use crate::layout::LayoutConfig;
use crate::model::OutputDocument;
use crate::parser::{ExtractOptions, PageSelection};
use crate::render::BuildOptions;
use std::path::Path;
use std::sync::Arc;

/// Options for the whole pipeline.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Extraction options
    pub extract: ExtractOptions,

    /// Grouping and classification heuristics
    pub layout: LayoutConfig,

    /// Document building options
    pub build: BuildOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    /// Set layout configuration.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set build options.
    pub fn with_build_options(mut self, options: BuildOptions) -> Self {
        self.build = options;
        self
    }

    /// Set document password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.extract = self.extract.with_password(password);
        self
    }

    /// Restrict conversion to some pages.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.extract = self.extract.with_pages(pages);
        self
    }
}

/// Progress and cancellation handles for one conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertContext {
    /// Progress tracker shared with the caller
    pub progress: Arc<ProgressTracker>,

    /// Cancellation flag
    pub abort: AbortSignal,
}

impl ConvertContext {
    /// A context that reports nowhere and is never aborted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report progress into a sink.
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Arc::new(ProgressTracker::new(sink));
        self
    }

    /// Share an existing tracker.
    pub fn with_tracker(mut self, tracker: Arc<ProgressTracker>) -> Self {
        self.progress = tracker;
        self
    }

    /// Use an abort signal.
    pub fn with_abort(mut self, abort: AbortSignal) -> Self {
        self.abort = abort;
        self
    }
}

/// Counters gathered during a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Pages extracted
    pub pages: u32,
    /// Text runs extracted
    pub runs: usize,
    /// Lines after grouping
    pub lines: usize,
    /// Links found
    pub links: usize,
    /// Paragraphs in the output
    pub paragraphs: usize,
}

/// Result of a conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Serialized output
    pub bytes: Vec<u8>,

    /// The document model the bytes were written from
    pub document: OutputDocument,

    /// Pipeline counters
    pub stats: ConvertStats,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Output length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the output is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Trait for document converters.
pub trait DocumentConverter: Send + Sync {
    /// Name of this converter.
    fn name(&self) -> &str;

    /// Extension of produced files, without the dot.
    fn output_extension(&self) -> &str;

    /// MIME type of produced files.
    fn mime_type(&self) -> &'static str;

    /// Convert from bytes.
    fn convert_bytes(&self, bytes: &[u8], ctx: &ConvertContext) -> Result<ConvertResult>;

    /// Convert a file at the given path.
    fn convert_file(&self, path: &Path, ctx: &ConvertContext) -> Result<ConvertResult> {
        let bytes = std::fs::read(path)?;
        self.convert_bytes(&bytes, ctx)
    }
}

impl<T: DocumentConverter + ?Sized> DocumentConverter for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn output_extension(&self) -> &str {
        (**self).output_extension()
    }

    fn mime_type(&self) -> &'static str {
        (**self).mime_type()
    }

    fn convert_bytes(&self, bytes: &[u8], ctx: &ConvertContext) -> Result<ConvertResult> {
        (**self).convert_bytes(bytes, ctx)
    }
}
