//! Synthetic PDF fixtures shared by integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Font resource names available on every fixture page.
pub const REGULAR: &str = "F1";
pub const BOLD: &str = "F2";
pub const ITALIC: &str = "F3";

/// One `Tj` at an absolute position (PDF user space, origin bottom-left).
#[derive(Debug, Clone)]
pub struct TextItem {
    pub font: &'static str,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub rgb: Option<(f32, f32, f32)>,
}

impl TextItem {
    pub fn new(font: &'static str, size: f32, x: f32, y: f32, text: &str) -> Self {
        Self {
            font,
            size,
            x,
            y,
            text: text.to_string(),
            rgb: None,
        }
    }

    pub fn regular(size: f32, x: f32, y: f32, text: &str) -> Self {
        Self::new(REGULAR, size, x, y, text)
    }

    pub fn bold(size: f32, x: f32, y: f32, text: &str) -> Self {
        Self::new(BOLD, size, x, y, text)
    }

    pub fn italic(size: f32, x: f32, y: f32, text: &str) -> Self {
        Self::new(ITALIC, size, x, y, text)
    }

    pub fn colored(mut self, r: f32, g: f32, b: f32) -> Self {
        self.rgb = Some((r, g, b));
        self
    }
}

/// A URI link annotation, `rect` as `[x0, y0, x1, y1]` in PDF user space.
#[derive(Debug, Clone)]
pub struct LinkSpec {
    pub uri: String,
    pub rect: [f32; 4],
}

impl LinkSpec {
    pub fn new(uri: &str, rect: [f32; 4]) -> Self {
        Self {
            uri: uri.to_string(),
            rect,
        }
    }
}

/// One US Letter page.
#[derive(Debug, Clone, Default)]
pub struct PageSpec {
    pub items: Vec<TextItem>,
    pub links: Vec<LinkSpec>,
}

impl PageSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, item: TextItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn link(mut self, link: LinkSpec) -> Self {
        self.links.push(link);
        self
    }
}

/// Build a PDF from page specs, optionally with an Info title.
pub fn build_pdf_with_title(pages: &[PageSpec], title: Option<&str>) -> Vec<u8> {
    save(build_document(pages, title))
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save pdf");
    buffer
}

fn build_document(pages: &[PageSpec], title: Option<&str>) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font = |base: &str| {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base.to_string(),
            "Encoding" => "WinAnsiEncoding",
        }
    };
    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));
    let italic_id = doc.add_object(font("Helvetica-Oblique"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular_id,
            BOLD => bold_id,
            ITALIC => italic_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let mut operations = vec![Operation::new("BT", vec![])];
        for item in &page.items {
            let (r, g, b) = item.rgb.unwrap_or((0.0, 0.0, 0.0));
            operations.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(item.font.as_bytes().to_vec()), item.size.into()],
            ));
            operations.push(Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    item.x.into(),
                    item.y.into(),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(item.text.as_str())],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));

        let annots: Vec<Object> = page
            .links
            .iter()
            .map(|link| {
                let [x0, y0, x1, y1] = link.rect;
                Object::from(doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Link",
                    "Rect" => vec![x0.into(), y0.into(), x1.into(), y1.into()],
                    "A" => dictionary! {
                        "S" => "URI",
                        "URI" => Object::string_literal(link.uri.as_str()),
                    },
                }))
            })
            .collect();

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Annots" => annots,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal("resumekit tests"),
        });
        doc.trailer.set("Info", info_id);
    }

    doc
}

/// A one-page PDF behind a Standard security handler whose user password
/// is not empty, so it cannot be opened without the right password.
pub fn encrypted_pdf() -> Vec<u8> {
    let mut doc = build_document(
        &[PageSpec::new().text(TextItem::bold(16.0, 200.0, 700.0, "RESUME"))],
        None,
    );
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "P" => -4,
        "O" => Object::String(vec![0x5A; 32], lopdf::StringFormat::Hexadecimal),
        "U" => Object::String(vec![0x00; 32], lopdf::StringFormat::Hexadecimal),
    });
    doc.trailer.set("Encrypt", encrypt_id);
    let id = Object::String(vec![0x11; 16], lopdf::StringFormat::Hexadecimal);
    doc.trailer.set("ID", vec![id.clone(), id]);
    save(doc)
}

/// Build a PDF from page specs.
pub fn build_pdf(pages: &[PageSpec]) -> Vec<u8> {
    build_pdf_with_title(pages, None)
}

/// A one-page résumé with a name, two sections, a bullet and body text.
pub fn sample_resume() -> Vec<u8> {
    build_pdf_with_title(
        &[PageSpec::new()
            .text(TextItem::bold(20.0, 220.0, 740.0, "JANE DOE"))
            .text(TextItem::regular(10.0, 200.0, 715.0, "Backend engineer in Berlin"))
            .text(TextItem::bold(12.0, 72.0, 680.0, "EXPERIENCE"))
            .text(TextItem::bold(11.0, 72.0, 655.0, "Senior Engineer"))
            .text(TextItem::regular(10.0, 72.0, 635.0, "- Led a team of five"))
            .text(TextItem::regular(10.0, 72.0, 620.0, "1. Shipped the billing service"))
            .text(
                TextItem::italic(10.0, 72.0, 600.0, "Portfolio")
                    .colored(0.0, 0.0, 1.0),
            )
            .link(LinkSpec::new("https://jane.example.com", [70.0, 596.0, 130.0, 612.0]))
            .link(LinkSpec::new("mailto:jane@example.com", [300.0, 100.0, 400.0, 112.0]))],
        Some("Jane Doe Resume"),
    )
}
