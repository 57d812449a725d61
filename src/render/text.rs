//! Plain text rendering for built documents.

use crate::model::{OutputDocument, ParagraphKind};

/// Convert a document to plain text, one paragraph per line.
///
/// Hyperlinks are written as `text <url>` when the text differs from the URL.
pub fn to_text(doc: &OutputDocument) -> String {
    let mut output = String::new();
    for paragraph in &doc.paragraphs {
        let text = paragraph.text();
        match &paragraph.kind {
            ParagraphKind::Hyperlink { url } if *url != text => {
                output.push_str(&format!("{} <{}>", text, url));
            }
            _ => output.push_str(&text),
        }
        output.push('\n');
    }
    output.trim_end().to_string()
}
