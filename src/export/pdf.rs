//! Order document rendering.
//!
//! Builds a plain A4 PDF with `lopdf`: a bold title carrying the order
//! timestamp, then one line per order entry. Text uses the standard
//! Helvetica fonts with `WinAnsiEncoding`, so no font files are embedded and
//! everything goes through [`transliterate`](super::transliterate) first.
//!
//! Output depends only on the order lines and the timestamp. No document
//! IDs or wall-clock values are written, so the same input always yields the
//! same bytes.

use super::transliterate::encode_single_byte;
use crate::session::OrderLine;
use chrono::NaiveDateTime;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// A4 in PostScript points
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 57;
const TITLE_SIZE: i64 = 16;
const BODY_SIZE: i64 = 12;
/// Vertical advance per line.
const LINE_HEIGHT: i64 = 28;
/// Space between the title and the first item.
const TITLE_GAP: i64 = 28;

/// Helvetica-Bold advance widths for bytes 32..=126, in 1/1000 em.
const BOLD_WIDTHS: [i64; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];
/// Used for bytes outside the table.
const BOLD_DEFAULT_WIDTH: i64 = 556;

/// Width in points of `text` set in Helvetica-Bold at `size`.
fn bold_text_width(text: &str, size: i64) -> i64 {
    let units: i64 = encode_single_byte(text)
        .into_iter()
        .map(|b| match b {
            32..=126 => BOLD_WIDTHS[usize::from(b - 32)],
            _ => BOLD_DEFAULT_WIDTH,
        })
        .sum();
    units * size / 1000
}

/// Title line shown at the top of the first page.
pub fn document_title(timestamp: NaiveDateTime) -> String {
    format!("Order - {}", timestamp.format("%Y-%m-%d %H:%M"))
}

/// Text of one order line in the document.
pub fn format_order_line(line: &OrderLine) -> String {
    format!("{}: {} {}", line.name, line.quantity, line.unit)
        .trim_end()
        .to_string()
}

/// File name offered for download: `Order_<YYYYMMDD>_<HHMM>.pdf`.
pub fn document_filename(timestamp: NaiveDateTime) -> String {
    format!("Order_{}.pdf", timestamp.format("%Y%m%d_%H%M"))
}

/// One line of text placed on a page.
#[derive(Debug, Clone, PartialEq)]
struct PlacedText {
    font: &'static str,
    size: i64,
    x: i64,
    y: i64,
    text: String,
}

/// Lay out the title and lines into pages, top to bottom.
///
/// The title is centered horizontally; order lines start at the left margin.
fn layout_pages(title: &str, lines: &[String]) -> Vec<Vec<PlacedText>> {
    let top = PAGE_HEIGHT - MARGIN - TITLE_SIZE;
    let title_x = ((PAGE_WIDTH - bold_text_width(title, TITLE_SIZE)) / 2).max(MARGIN);
    let mut pages = vec![vec![PlacedText {
        font: "F2",
        size: TITLE_SIZE,
        x: title_x,
        y: top,
        text: title.to_string(),
    }]];
    let mut y = top - TITLE_GAP - LINE_HEIGHT;

    for line in lines {
        if y < MARGIN {
            pages.push(Vec::new());
            y = PAGE_HEIGHT - MARGIN - BODY_SIZE;
        }
        if let Some(page) = pages.last_mut() {
            page.push(PlacedText {
                font: "F1",
                size: BODY_SIZE,
                x: MARGIN,
                y,
                text: line.clone(),
            });
        }
        y -= LINE_HEIGHT;
    }
    pages
}

fn page_content(texts: &[PlacedText]) -> Content {
    let mut operations = Vec::with_capacity(texts.len() * 5);
    for placed in texts {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![placed.font.into(), placed.size.into()],
        ));
        operations.push(Operation::new("Td", vec![placed.x.into(), placed.y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_single_byte(&placed.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

fn standard_font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Render the order list as PDF bytes.
///
/// An empty list produces a one-page document with just the title.
pub fn render_document(
    order_lines: &[OrderLine],
    timestamp: NaiveDateTime,
) -> Result<Vec<u8>, ExportError> {
    let title = document_title(timestamp);
    let lines: Vec<String> = order_lines.iter().map(format_order_line).collect();
    let pages = layout_pages(&title, &lines);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = standard_font(&mut doc, "Helvetica");
    let bold = standard_font(&mut doc, "Helvetica-Bold");
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for texts in &pages {
        let content = page_content(texts);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_single_byte(&title)),
        "Producer" => Object::string_literal("stock-review"),
        "CreationDate" => Object::string_literal(
            timestamp.format("D:%Y%m%d%H%M%S").to_string(),
        ),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
