//! Source format detection.
//!
//! The backend serves résumés as either PDF or DOCX blobs. Conversion only
//! accepts PDF input, so fetched bytes are sniffed before they reach the
//! extractor.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Detected source document format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFormat {
    /// PDF with its header version (e.g., "1.7")
    Pdf {
        /// Version from the `%PDF-x.y` header
        version: String,
    },
    /// Office Open XML package (ZIP container)
    Docx,
}

impl SourceFormat {
    /// Whether this is a PDF.
    pub fn is_pdf(&self) -> bool {
        matches!(self, SourceFormat::Pdf { .. })
    }

    /// Conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Pdf { .. } => "pdf",
            SourceFormat::Docx => "docx",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Pdf { version } => write!(f, "PDF {}", version),
            SourceFormat::Docx => write!(f, "DOCX"),
        }
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Detect the source format from a file path.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut header = Vec::with_capacity(16);
    reader.take(16).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the source format from the leading bytes of a document.
///
/// # Returns
/// * `Ok(SourceFormat::Pdf { .. })` for a `%PDF-x.y` header
/// * `Ok(SourceFormat::Docx)` for a ZIP local file header
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<SourceFormat> {
    if data.starts_with(ZIP_MAGIC) {
        return Ok(SourceFormat::Docx);
    }

    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(SourceFormat::Pdf { version })
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check whether a file is a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    matches!(detect_format_from_path(path), Ok(SourceFormat::Pdf { .. }))
}

/// Check whether bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    matches!(detect_format_from_bytes(data), Ok(SourceFormat::Pdf { .. }))
}
