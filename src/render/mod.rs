//! Rendering: building the Word document model and serializing it.

mod builder;
mod docx;
mod json;
mod options;
mod text;

pub use builder::{build_document, DocumentBuilder};
pub use docx::to_docx;
pub use json::{to_json, JsonFormat};
pub use options::{BuildOptions, Spacing};
pub use text::to_text;
