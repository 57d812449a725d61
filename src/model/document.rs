//! Document-level types.

use super::{Alignment, RgbHex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Total number of pages
    pub page_count: u32,

    /// Whether the document was encrypted
    pub encrypted: bool,
}

impl Metadata {
    /// Create new metadata with PDF version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            pdf_version: version.into(),
            ..Default::default()
        }
    }

    /// `(label, value)` pairs for the fields that are present.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        let optional = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (label, value) in optional {
            if let Some(v) = value {
                fields.push((label, v.clone()));
            }
        }
        if let Some(created) = self.created {
            fields.push(("Created", created.to_rfc3339()));
        }
        if let Some(modified) = self.modified {
            fields.push(("Modified", modified.to_rfc3339()));
        }
        fields.push(("PDF version", self.pdf_version.clone()));
        fields.push(("Pages", self.page_count.to_string()));
        fields.push(("Encrypted", self.encrypted.to_string()));
        fields
    }
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSSOHH'mm'`).
pub fn parse_pdf_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim().strip_prefix("D:").unwrap_or(s.trim());
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return None;
    }

    let field = |start: usize, len: usize, default: u32| -> u32 {
        digits
            .get(start..start + len)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };

    let year = digits.get(0..4)?.parse::<i32>().ok()?;
    let naive = chrono::NaiveDate::from_ymd_opt(year, field(4, 2, 1), field(6, 2, 1))?
        .and_hms_opt(field(8, 2, 0), field(10, 2, 0), field(12, 2, 0))?;

    let rest = &s[digits.len()..];
    let offset_secs = match rest.chars().next() {
        Some(sign @ ('+' | '-')) => {
            let tz: String = rest[1..].chars().filter(|c| c.is_ascii_digit()).collect();
            let hours: i32 = tz.get(0..2).and_then(|v| v.parse().ok()).unwrap_or(0);
            let minutes: i32 = tz.get(2..4).and_then(|v| v.parse().ok()).unwrap_or(0);
            let secs = hours * 3600 + minutes * 60;
            if sign == '-' {
                -secs
            } else {
                secs
            }
        }
        _ => 0,
    };

    let utc = naive - chrono::Duration::seconds(offset_secs as i64);
    Some(DateTime::from_naive_utc_and_offset(utc, Utc))
}

/// Role of an output paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParagraphKind {
    /// Top-level heading
    Heading1,
    /// Sub-heading
    Heading2,
    /// List item
    Bullet,
    /// Body text
    Normal,
    /// The "Links:" label preceding the link list
    LinksHeading,
    /// A clickable external link
    Hyperlink {
        /// Target URI
        url: String,
    },
}

/// A formatted text run inside an output paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRun {
    /// Text content
    pub text: String,
    /// Font size in half-points
    pub size: u32,
    /// Bold flag
    pub bold: bool,
    /// Italic flag
    pub italic: bool,
    /// Colour
    pub color: RgbHex,
    /// Single underline flag
    pub underline: bool,
}

impl OutputRun {
    /// Create a plain black run.
    pub fn new(text: impl Into<String>, size: u32) -> Self {
        Self {
            text: text.into(),
            size,
            bold: false,
            italic: false,
            color: RgbHex::black(),
            underline: false,
        }
    }
}

/// A paragraph of the Word document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputParagraph {
    /// Role
    pub kind: ParagraphKind,
    /// Formatted runs (a single run for classified lines)
    pub runs: Vec<OutputRun>,
    /// Alignment
    pub alignment: Alignment,
    /// Space before, in twips
    pub spacing_before: u32,
    /// Space after, in twips
    pub spacing_after: u32,
    /// Start a new page before this paragraph
    pub page_break_before: bool,
}

impl OutputParagraph {
    /// Concatenated text of the paragraph.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Hyperlink target, if this paragraph is a link.
    pub fn url(&self) -> Option<&str> {
        match &self.kind {
            ParagraphKind::Hyperlink { url } => Some(url),
            _ => None,
        }
    }
}

/// The in-memory Word document produced by the builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputDocument {
    /// Metadata carried over from the source
    pub metadata: Metadata,
    /// Paragraphs in order
    pub paragraphs: Vec<OutputParagraph>,
}

impl OutputDocument {
    /// Create an empty document.
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            paragraphs: Vec::new(),
        }
    }

    /// Number of paragraphs.
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Whether the document has no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Paragraphs of a given kind.
    pub fn paragraphs_of<'a>(
        &'a self,
        kind: &'a ParagraphKind,
    ) -> impl Iterator<Item = &'a OutputParagraph> + 'a {
        self.paragraphs.iter().filter(move |p| &p.kind == kind)
    }

    /// Hyperlink paragraphs, in order.
    pub fn hyperlinks(&self) -> impl Iterator<Item = &OutputParagraph> {
        self.paragraphs.iter().filter(|p| p.url().is_some())
    }

    /// Plain text of the document, one paragraph per line.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
