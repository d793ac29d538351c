//! Positioned text extraction and layout reconstruction for statement
//! PDFs. Glyph coordinates come from the page content streams; lines are
//! rebuilt by clustering fragments on the y axis and columns are inferred
//! from horizontal gaps. Both passes are heuristic — statement layouts
//! carry no structural table model, so tolerances are tuned per
//! institution rather than guaranteed.

pub mod fragment;
pub mod layout;

pub use fragment::{extract_fragments, Fragment, PdfError};
pub use layout::{lines_from_fragments, LayoutOptions, COLUMN_SEPARATOR};

/// Extract reconstructed text lines for the whole document, in page order.
pub fn extract_lines(data: &[u8], options: &LayoutOptions) -> Result<Vec<String>, PdfError> {
    let pages = extract_fragments(data)?;
    let mut lines = Vec::new();
    for page in pages {
        lines.extend(lines_from_fragments(page, options));
    }
    Ok(lines)
}
