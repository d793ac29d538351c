use lopdf::content::Content;
use lopdf::{Document, Object};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("PDF reader unavailable: {0}")]
    Reader(#[from] lopdf::Error),
    #[error("document contains no extractable text")]
    NoText,
}

/// One positioned run of text from a content stream, in unscaled page
/// units. `width` is an estimate (average glyph advance), good enough
/// for the gap-based column inference downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

/// Average glyph advance as a fraction of the font size. Statement fonts
/// are close to this; exact metrics would require parsing font widths.
const AVG_GLYPH_EM: f32 = 0.5;

/// Extract positioned fragments per page, in page order.
pub fn extract_fragments(data: &[u8]) -> Result<Vec<Vec<Fragment>>, PdfError> {
    let doc = Document::load_mem(data)?;

    let mut pages = Vec::new();
    for (number, page_id) in doc.get_pages() {
        let content_bytes = doc.get_page_content(page_id)?;
        let content = Content::decode(&content_bytes)?;
        let fragments = fragments_from_content(&content);
        if fragments.is_empty() {
            tracing::debug!(page = number, "page produced no text fragments");
        }
        pages.push(fragments);
    }

    if pages.iter().all(|page| page.is_empty()) {
        return Err(PdfError::NoText);
    }
    Ok(pages)
}

/// Walk the text-positioning operators of one content stream. Only the
/// translation components of the text matrix are tracked; statement PDFs
/// do not rotate or shear their tables.
fn fragments_from_content(content: &Content) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    let mut font_size: f32 = 10.0;
    let mut leading: f32 = 12.0;
    let mut line_origin = (0.0f32, 0.0f32);
    let mut cursor = (0.0f32, 0.0f32);

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                line_origin = (0.0, 0.0);
                cursor = line_origin;
            }
            "Tf" => {
                if let Some(size) = number(op.operands.get(1)) {
                    font_size = size;
                }
            }
            "TL" => {
                if let Some(l) = number(op.operands.get(0)) {
                    leading = l;
                }
            }
            "Td" => {
                if let (Some(x), Some(y)) =
                    (number(op.operands.get(0)), number(op.operands.get(1)))
                {
                    line_origin.0 += x;
                    line_origin.1 += y;
                    cursor = line_origin;
                }
            }
            "TD" => {
                if let (Some(x), Some(y)) =
                    (number(op.operands.get(0)), number(op.operands.get(1)))
                {
                    line_origin.0 += x;
                    line_origin.1 += y;
                    leading = -y;
                    cursor = line_origin;
                }
            }
            "Tm" => {
                if let (Some(e), Some(f)) =
                    (number(op.operands.get(4)), number(op.operands.get(5)))
                {
                    line_origin = (e, f);
                    cursor = line_origin;
                }
            }
            "T*" => {
                line_origin.1 -= leading;
                cursor = line_origin;
            }
            "Tj" => emit(&mut fragments, op.operands.first(), &mut cursor, font_size),
            "'" => {
                line_origin.1 -= leading;
                cursor = line_origin;
                emit(&mut fragments, op.operands.first(), &mut cursor, font_size);
            }
            "\"" => {
                line_origin.1 -= leading;
                cursor = line_origin;
                emit(&mut fragments, op.operands.get(2), &mut cursor, font_size);
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    for item in items {
                        match item {
                            Object::String(..) => {
                                emit(&mut fragments, Some(item), &mut cursor, font_size)
                            }
                            _ => {
                                if let Some(adjust) = number(Some(item)) {
                                    // TJ adjustments are in thousandths of an em.
                                    cursor.0 -= adjust / 1000.0 * font_size;
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fragments
}

fn emit(fragments: &mut Vec<Fragment>, obj: Option<&Object>, cursor: &mut (f32, f32), font_size: f32) {
    let Some(Object::String(bytes, _)) = obj else {
        return;
    };
    let text = decode_string(bytes);
    let width = text.chars().count() as f32 * font_size * AVG_GLYPH_EM;
    if !text.trim().is_empty() {
        fragments.push(Fragment {
            text,
            x: cursor.0,
            y: cursor.1,
            width,
        });
    }
    cursor.0 += width;
}

fn number(obj: Option<&Object>) -> Option<f32> {
    match obj? {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Decode a content-stream string. UTF-16BE (BOM-prefixed) strings are
/// decoded properly; everything else is treated as Latin-1, which covers
/// the WinAnsi-encoded fonts Brazilian statements use.
fn decode_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}
