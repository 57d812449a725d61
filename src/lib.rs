//! # resumekit
//!
//! Résumé download and PDF to Word conversion for applicant tracking
//! workflows.
//!
//! The conversion pipeline reads positioned text runs from a PDF, groups
//! them into visual lines, classifies each line as a heading, bullet or body
//! text, and writes a `.docx` that keeps that structure. The download
//! orchestrator fetches résumés from the ATS backend and runs the pipeline
//! when Word output is requested.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> resumekit::Result<()> {
//!     let docx = resumekit::pdf_file_to_docx("resume.pdf")?;
//!     std::fs::write("resume.docx", docx)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout-aware extraction**: text runs with position, size, weight and colour
//! - **Heuristic structure**: headings, sub-headings, bullets and body text
//! - **Links**: annotation hyperlinks are kept as clickable Word links
//! - **Progress and cancellation**: monotonic percentages and an abort flag
//! - **Parallel processing**: Uses Rayon for multi-page documents
//! - **Download orchestration** (`download` feature): fetch, convert, save

pub mod config;
pub mod convert;
pub mod detect;
#[cfg(feature = "download")]
pub mod download;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use config::ClientConfig;
pub use convert::{
    AbortSignal, ConvertContext, ConvertOptions, ConvertResult, DocumentConverter,
    PdfToDocxConverter, ProgressSink, Stage,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, SourceFormat};
pub use error::{Error, ErrorCategory, Result};
pub use layout::{GroupingConfig, LayoutConfig, StyleConfig};
pub use model::{
    Alignment, Extraction, Line, LineKind, LineStyle, Link, Metadata, OutputDocument,
    OutputParagraph, ParagraphKind, PositionedTextRun, StyledLine,
};
pub use parser::{ErrorMode, ExtractOptions, PageSelection, PdfExtractor};
pub use render::{BuildOptions, JsonFormat};

use std::path::Path;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extract positioned text runs and links from PDF bytes.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("resume.pdf").unwrap();
/// let extraction = resumekit::extract_bytes(&data).unwrap();
/// println!("Pages: {}", extraction.page_count());
/// ```
pub fn extract_bytes(data: &[u8]) -> Result<Extraction> {
    PdfExtractor::default().extract_bytes(data)
}

/// Extract positioned text runs and links from a PDF file.
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Extraction> {
    PdfExtractor::default().extract_file(path)
}

/// Convert PDF bytes to DOCX bytes with default options.
pub fn pdf_bytes_to_docx(data: &[u8]) -> Result<Vec<u8>> {
    Resumekit::new().convert_bytes(data).map(|r| r.bytes)
}

/// Convert a PDF file to DOCX bytes with default options.
///
/// # Example
///
/// ```no_run
/// let docx = resumekit::pdf_file_to_docx("resume.pdf").unwrap();
/// std::fs::write("resume.docx", docx).unwrap();
/// ```
pub fn pdf_file_to_docx<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    Resumekit::new().convert_file(path).map(|r| r.bytes)
}

/// Builder for configuring and running conversions.
///
/// # Example
///
/// ```no_run
/// use resumekit::{PageSelection, Resumekit};
///
/// let result = Resumekit::new()
///     .lenient()
///     .with_pages(PageSelection::Range(1..=2))
///     .with_page_breaks(true)
///     .convert_file("resume.pdf")?;
/// std::fs::write("resume.docx", &result.bytes)?;
/// # Ok::<(), resumekit::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Resumekit {
    options: ConvertOptions,
    context: ConvertContext,
}

impl Resumekit {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip pages that fail to parse instead of failing.
    pub fn lenient(mut self) -> Self {
        self.options.extract = self.options.extract.lenient();
        self
    }

    /// Disable parallel page extraction.
    pub fn sequential(mut self) -> Self {
        self.options.extract = self.options.extract.sequential();
        self
    }

    /// Set document password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.options = self.options.with_password(password);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Insert page breaks between source pages.
    pub fn with_page_breaks(mut self, enabled: bool) -> Self {
        self.options.build = self.options.build.with_page_breaks(enabled);
        self
    }

    /// Set layout heuristics.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.options.layout = layout;
        self
    }

    /// Report progress into a sink.
    pub fn with_progress(mut self, sink: std::sync::Arc<dyn ProgressSink>) -> Self {
        self.context = self.context.with_sink(sink);
        self
    }

    /// Use an abort signal.
    pub fn with_abort(mut self, abort: AbortSignal) -> Self {
        self.context = self.context.with_abort(abort);
        self
    }

    /// The collected options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// The converter these options describe.
    pub fn converter(&self) -> PdfToDocxConverter {
        PdfToDocxConverter::new(self.options.clone())
    }

    /// Convert PDF bytes.
    pub fn convert_bytes(&self, data: &[u8]) -> Result<ConvertResult> {
        self.converter().convert_bytes(data, &self.context)
    }

    /// Convert a PDF file.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        self.converter().convert_file(path.as_ref(), &self.context)
    }

    /// Extract, group and classify without writing a document.
    pub fn classify_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<StyledLine>> {
        let data = std::fs::read(path)?;
        self.converter().classify_bytes(&data)
    }
}
