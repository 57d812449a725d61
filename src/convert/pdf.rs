//! PDF to DOCX converter implementation.

use crate::error::Result;
use crate::layout::{group_lines, StyleClassifier};
use crate::model::{Extraction, OutputDocument, StyledLine};
use crate::parser::PdfExtractor;
use crate::render::{to_docx, DocumentBuilder};

use super::{
    ConvertContext, ConvertOptions, ConvertResult, ConvertStats, DocumentConverter, Stage,
};

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Converts PDF résumés to Word documents.
///
/// Stages run strictly in order: extraction, grouping and classification,
/// building, serialization. The abort signal is checked between stages and
/// before each page.
#[derive(Debug, Clone, Default)]
pub struct PdfToDocxConverter {
    options: ConvertOptions,
}

impl PdfToDocxConverter {
    /// Create a converter.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// The conversion options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Run every stage except serialization.
    pub fn to_document(
        &self,
        bytes: &[u8],
        ctx: &ConvertContext,
    ) -> Result<(OutputDocument, ConvertStats)> {
        let extraction = PdfExtractor::new(self.options.extract.clone()).extract_bytes_with(
            bytes,
            &ctx.progress,
            &ctx.abort,
        )?;
        ctx.abort.check()?;

        let styled = self.classify(&extraction, ctx)?;
        ctx.abort.check()?;

        ctx.progress.start(Stage::Building);
        let links = extraction.all_links();
        let builder = DocumentBuilder::new(self.options.build.clone());
        let document = builder.build(&styled, &links, extraction.metadata.clone());
        ctx.progress.complete(Stage::Building);

        let stats = ConvertStats {
            pages: extraction.page_count(),
            runs: extraction.run_count(),
            lines: styled.len(),
            links: links.len(),
            paragraphs: document.len(),
        };
        Ok((document, stats))
    }

    /// Extract, group and classify without building.
    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<Vec<StyledLine>> {
        let ctx = ConvertContext::new();
        let extraction = PdfExtractor::new(self.options.extract.clone()).extract_bytes_with(
            bytes,
            &ctx.progress,
            &ctx.abort,
        )?;
        self.classify(&extraction, &ctx)
    }

    fn classify(&self, extraction: &Extraction, ctx: &ConvertContext) -> Result<Vec<StyledLine>> {
        ctx.progress.start(Stage::Classifying);
        let classifier = StyleClassifier::new(self.options.layout.style.clone())?;
        let total = extraction.pages.len();
        let mut styled = Vec::new();

        for (i, page) in extraction.pages.iter().enumerate() {
            ctx.abort.check()?;
            let lines = group_lines(&page.runs, &self.options.layout.grouping);
            log::debug!("Page {}: {} lines", page.number, lines.len());
            styled.extend(classifier.classify_lines(lines, page.number));
            ctx.progress.report_fraction(Stage::Classifying, i + 1, total);
        }

        ctx.progress.complete(Stage::Classifying);
        Ok(styled)
    }
}

impl DocumentConverter for PdfToDocxConverter {
    fn name(&self) -> &str {
        "pdf-to-docx"
    }

    fn output_extension(&self) -> &str {
        "docx"
    }

    fn mime_type(&self) -> &'static str {
        DOCX_MIME
    }

    fn convert_bytes(&self, bytes: &[u8], ctx: &ConvertContext) -> Result<ConvertResult> {
        let (document, stats) = self.to_document(bytes, ctx)?;
        ctx.abort.check()?;

        ctx.progress.start(Stage::Serializing);
        let output = to_docx(&document)?;
        ctx.progress.complete(Stage::Serializing);

        log::info!(
            "Converted {} pages into {} paragraphs ({} bytes)",
            stats.pages,
            stats.paragraphs,
            output.len()
        );

        Ok(ConvertResult {
            bytes: output,
            document,
            stats,
            mime_type: DOCX_MIME,
        })
    }
}
