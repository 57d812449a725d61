//! Styled lines to an in-memory Word document.

use super::BuildOptions;
use crate::model::{
    LineKind, Link, Metadata, OutputDocument, OutputParagraph, OutputRun, ParagraphKind,
    StyledLine,
};

/// Build a document with the given options.
pub fn build_document(
    lines: &[StyledLine],
    links: &[Link],
    metadata: Metadata,
    options: &BuildOptions,
) -> OutputDocument {
    DocumentBuilder::new(options.clone()).build(lines, links, metadata)
}

/// Builds [`OutputDocument`]s.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    options: BuildOptions,
}

impl DocumentBuilder {
    /// Create a builder.
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// The build options.
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// One paragraph per styled line, then the link list.
    pub fn build(&self, lines: &[StyledLine], links: &[Link], metadata: Metadata) -> OutputDocument {
        let mut doc = OutputDocument::new(metadata);
        let mut previous_page: Option<u32> = None;

        for styled in lines {
            let text = styled.text();
            if text.is_empty() {
                continue;
            }
            let new_page = previous_page.is_some_and(|p| p != styled.page);
            previous_page = Some(styled.page);
            let mut paragraph = self.line_paragraph(styled, text);
            paragraph.page_break_before = self.options.page_breaks && new_page;
            doc.paragraphs.push(paragraph);
        }

        if self.options.include_links && !links.is_empty() {
            self.push_links(&mut doc, links);
        }

        log::debug!(
            "Built {} paragraphs from {} lines and {} links",
            doc.len(),
            lines.len(),
            links.len()
        );
        doc
    }

    fn line_paragraph(&self, styled: &StyledLine, text: String) -> OutputParagraph {
        let style = &styled.style;
        let spacing = self.options.spacing_for(style.kind);
        let kind = match style.kind {
            LineKind::Heading1 => ParagraphKind::Heading1,
            LineKind::Heading2 => ParagraphKind::Heading2,
            LineKind::Bullet => ParagraphKind::Bullet,
            LineKind::Normal => ParagraphKind::Normal,
        };
        let run = OutputRun {
            text,
            size: style.size,
            bold: style.bold,
            italic: style.italic,
            color: style.color.clone(),
            underline: false,
        };
        OutputParagraph {
            kind,
            runs: vec![run],
            alignment: style.alignment,
            spacing_before: spacing.before,
            spacing_after: spacing.after,
            page_break_before: false,
        }
    }

    fn push_links(&self, doc: &mut OutputDocument, links: &[Link]) {
        let heading = OutputRun {
            bold: true,
            ..OutputRun::new(self.options.links_heading.clone(), self.options.links_heading_size)
        };
        doc.paragraphs.push(OutputParagraph {
            kind: ParagraphKind::LinksHeading,
            runs: vec![heading],
            alignment: Default::default(),
            spacing_before: self.options.links_heading_spacing.before,
            spacing_after: self.options.links_heading_spacing.after,
            page_break_before: false,
        });

        for link in links {
            let run = OutputRun {
                color: self.options.hyperlink_color.clone(),
                underline: true,
                ..OutputRun::new(link.display_text(), self.options.hyperlink_size)
            };
            doc.paragraphs.push(OutputParagraph {
                kind: ParagraphKind::Hyperlink {
                    url: link.url.clone(),
                },
                runs: vec![run],
                alignment: Default::default(),
                spacing_before: self.options.hyperlink_spacing.before,
                spacing_after: self.options.hyperlink_spacing.after,
                page_break_before: false,
            });
        }
    }
}
