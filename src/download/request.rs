//! What to download.

use std::str::FromStr;

use crate::error::{Error, Result};

/// Requested output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadFormat {
    /// The stored PDF, unchanged
    Pdf,
    /// The stored DOCX, unchanged
    Docx,
    /// The stored PDF converted to Word locally
    Word,
}

impl DownloadFormat {
    /// Format to request from the backend. Conversion always starts from
    /// the PDF.
    pub fn fetch_format(&self) -> DownloadFormat {
        match self {
            DownloadFormat::Pdf | DownloadFormat::Word => DownloadFormat::Pdf,
            DownloadFormat::Docx => DownloadFormat::Docx,
        }
    }

    /// Value of the `format` query parameter.
    pub fn query_value(&self) -> &'static str {
        match self.fetch_format() {
            DownloadFormat::Docx => "docx",
            _ => "pdf",
        }
    }

    /// Whether the fetched bytes go through the converter.
    pub fn needs_conversion(&self) -> bool {
        matches!(self, DownloadFormat::Word)
    }

    /// Extension of the saved file.
    pub fn extension(&self) -> &'static str {
        match self {
            DownloadFormat::Pdf => "pdf",
            DownloadFormat::Docx | DownloadFormat::Word => "docx",
        }
    }
}

impl FromStr for DownloadFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(DownloadFormat::Pdf),
            "docx" => Ok(DownloadFormat::Docx),
            "word" => Ok(DownloadFormat::Word),
            other => Err(Error::Config(format!(
                "unknown download format {:?} (expected pdf, docx or word)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for DownloadFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DownloadFormat::Pdf => "pdf",
            DownloadFormat::Docx => "docx",
            DownloadFormat::Word => "word",
        })
    }
}

/// One résumé download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Candidate identifier
    pub candidate_id: String,
    /// Job identifier
    pub job_id: String,
    /// Candidate display name, used for fallback filenames
    pub candidate_name: Option<String>,
    /// Requested format
    pub format: DownloadFormat,
}

impl DownloadRequest {
    /// Create a request.
    pub fn new(
        candidate_id: impl Into<String>,
        job_id: impl Into<String>,
        format: DownloadFormat,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            job_id: job_id.into(),
            candidate_name: None,
            format,
        }
    }

    /// Set the candidate name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.candidate_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!("pdf".parse::<DownloadFormat>().unwrap(), DownloadFormat::Pdf);
        assert_eq!("DOCX".parse::<DownloadFormat>().unwrap(), DownloadFormat::Docx);
        assert_eq!(" word ".parse::<DownloadFormat>().unwrap(), DownloadFormat::Word);
        assert!("rtf".parse::<DownloadFormat>().is_err());
    }

    #[test]
    fn test_word_fetches_pdf() {
        assert_eq!(DownloadFormat::Word.fetch_format(), DownloadFormat::Pdf);
        assert_eq!(DownloadFormat::Word.query_value(), "pdf");
        assert_eq!(DownloadFormat::Docx.query_value(), "docx");
        assert_eq!(DownloadFormat::Pdf.query_value(), "pdf");
    }

    #[test]
    fn test_conversion_and_extension() {
        assert!(DownloadFormat::Word.needs_conversion());
        assert!(!DownloadFormat::Pdf.needs_conversion());
        assert!(!DownloadFormat::Docx.needs_conversion());
        assert_eq!(DownloadFormat::Word.extension(), "docx");
        assert_eq!(DownloadFormat::Pdf.extension(), "pdf");
    }
}
