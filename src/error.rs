//! Error types for resumekit.

use std::io;
use thiserror::Error;

/// Result type alias for resumekit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// User-facing message for password-protected sources.
pub const PASSWORD_PROTECTED_MESSAGE: &str = "cannot convert password-protected PDF";

/// User-facing message for fetch failures.
pub const DOWNLOAD_FAILED_MESSAGE: &str = "download failed";

/// User-facing message for any other conversion failure.
pub const CONVERSION_FAILED_MESSAGE: &str = "failed to convert resume to Word";

/// Error types that can occur while downloading or converting a resume.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is neither a PDF nor a Word document.
    #[error("Unknown file format: not a PDF or DOCX document")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and requires a password.
    #[error("Document is encrypted and requires a password")]
    Encrypted,

    /// The provided password is incorrect.
    #[error("Invalid password for encrypted document")]
    InvalidPassword,

    /// The PDF structure is corrupted or malformed.
    #[error("Corrupted PDF structure: {0}")]
    Corrupted(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Failure while grouping, classifying or building the output document.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Failure while serializing the Word document.
    #[error("DOCX write error: {0}")]
    DocxWrite(String),

    /// Error serializing structured output (JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Transport-level failure while fetching a file.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Status code returned by the server
        status: u16,
        /// Requested URL
        url: String,
    },

    /// A download is already in flight on this orchestrator.
    #[error("A download is already in progress")]
    Busy,

    /// The operation was cancelled through its abort signal.
    #[error("Operation cancelled")]
    Cancelled,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Coarse error classes used to pick the user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Fetch failure or non-2xx response.
    Network,
    /// Malformed, unsupported or protected source document.
    Parse,
    /// Failure in grouping, classification, building or serialization.
    Conversion,
    /// Cancelled by the caller.
    Cancelled,
    /// Caller misuse (busy orchestrator, bad configuration, bad page range).
    Usage,
    /// Local file system failure.
    Io,
}

impl Error {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Network(_) | Error::HttpStatus { .. } => ErrorCategory::Network,
            Error::UnknownFormat
            | Error::UnsupportedVersion(_)
            | Error::PdfParse(_)
            | Error::Encrypted
            | Error::InvalidPassword
            | Error::Corrupted(_)
            | Error::PageOutOfRange(..)
            | Error::TextExtract(_) => ErrorCategory::Parse,
            Error::Conversion(_) | Error::DocxWrite(_) | Error::Render(_) | Error::Other(_) => {
                ErrorCategory::Conversion
            }
            Error::Cancelled => ErrorCategory::Cancelled,
            Error::Busy | Error::Config(_) | Error::InvalidPageRange(_) => ErrorCategory::Usage,
            Error::Io(_) => ErrorCategory::Io,
        }
    }

    /// Whether the failure stems from a password-protected source.
    pub fn is_password_protected(&self) -> bool {
        match self {
            Error::Encrypted | Error::InvalidPassword => true,
            Error::PdfParse(msg) | Error::Corrupted(msg) | Error::TextExtract(msg) => {
                msg.to_lowercase().contains("password")
            }
            _ => false,
        }
    }

    /// Message shown to the user in a failure notification.
    pub fn user_message(&self) -> String {
        if self.is_password_protected() {
            return PASSWORD_PROTECTED_MESSAGE.to_string();
        }
        match self.category() {
            ErrorCategory::Network => DOWNLOAD_FAILED_MESSAGE.to_string(),
            ErrorCategory::Parse | ErrorCategory::Conversion => {
                CONVERSION_FAILED_MESSAGE.to_string()
            }
            ErrorCategory::Cancelled | ErrorCategory::Usage | ErrorCategory::Io => self.to_string(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(feature = "download")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::HttpStatus {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None => Error::Network(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted and requires a password");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_password_errors_get_tailored_message() {
        assert!(Error::Encrypted.is_password_protected());
        assert!(Error::InvalidPassword.is_password_protected());
        assert!(Error::PdfParse("needs a Password to open".into()).is_password_protected());
        assert!(!Error::PdfParse("bad xref".into()).is_password_protected());

        assert_eq!(Error::Encrypted.user_message(), PASSWORD_PROTECTED_MESSAGE);
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            Error::HttpStatus {
                status: 404,
                url: "http://x".into()
            }
            .category(),
            ErrorCategory::Network
        );
        assert_eq!(Error::Corrupted("x".into()).category(), ErrorCategory::Parse);
        assert_eq!(Error::DocxWrite("x".into()).category(), ErrorCategory::Conversion);
        assert_eq!(Error::Busy.category(), ErrorCategory::Usage);
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            Error::Network("connection reset".into()).user_message(),
            DOWNLOAD_FAILED_MESSAGE
        );
        assert_eq!(
            Error::PdfParse("bad xref".into()).user_message(),
            CONVERSION_FAILED_MESSAGE
        );
        assert_eq!(
            Error::Conversion("empty".into()).user_message(),
            CONVERSION_FAILED_MESSAGE
        );
    }
}
