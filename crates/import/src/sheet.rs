use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use thiserror::Error;

use concil_classify::fold;
use concil_core::{amount_from_f64, excel_serial_date};

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("failed to open workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),
    #[error("workbook has no sheets")]
    NoSheets,
}

/// Load the first worksheet of an in-memory XLSX file.
pub fn first_sheet(data: &[u8]) -> Result<Range<Data>, SheetError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data.to_vec()))?;
    workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoSheets)?
        .map_err(SheetError::from)
}

/// Render any cell into the text form the normalizer expects. Date cells
/// become ISO strings, numeric cells their plain decimal form.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        // Native numeric pass-through; non-finite floats become zero.
        Data::Float(f) => amount_from_f64(*f).normalize().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_date(dt.as_f64())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        _ => String::new(),
    }
}

/// One logical field and the folded header keywords that may label it.
pub type FieldSpec = (&'static str, &'static [&'static str]);

/// Explicit mapping from logical field name to column index, computed at
/// runtime from header text and passed around as a value.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    pub header_row: usize,
    columns: HashMap<&'static str, usize>,
}

impl FieldMap {
    pub fn from_positions(header_row: usize, positions: &[(&'static str, usize)]) -> Self {
        FieldMap {
            header_row,
            columns: positions.iter().copied().collect(),
        }
    }

    pub fn column(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }

    /// Text of the mapped cell, empty when the field or cell is absent.
    pub fn text(&self, row: &[Data], field: &str) -> String {
        self.column(field)
            .and_then(|col| row.get(col))
            .map(cell_text)
            .unwrap_or_default()
    }

    pub fn opt_text(&self, row: &[Data], field: &str) -> Option<String> {
        let text = self.text(row, field);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Scan the first `scan_cap` rows for one containing at least `quorum`
/// of the expected header keywords (folded comparison). Returns `None`
/// when the quorum is never met — callers fall back to a positional map
/// over row 0 rather than failing.
pub fn detect_header(
    range: &Range<Data>,
    fields: &[FieldSpec],
    quorum: usize,
    scan_cap: usize,
) -> Option<FieldMap> {
    for (row_idx, row) in range.rows().enumerate().take(scan_cap) {
        let mut columns = HashMap::new();
        for (col_idx, cell) in row.iter().enumerate() {
            let folded = fold(&cell_text(cell));
            if folded.is_empty() {
                continue;
            }
            for (field, keywords) in fields {
                if !columns.contains_key(field)
                    && keywords.iter().any(|kw| folded.contains(kw))
                {
                    columns.insert(*field, col_idx);
                }
            }
        }
        if columns.len() >= quorum {
            return Some(FieldMap {
                header_row: row_idx,
                columns,
            });
        }
    }
    None
}

pub fn resolve_field_map(
    range: &Range<Data>,
    fields: &[FieldSpec],
    quorum: usize,
    scan_cap: usize,
    fallback: &[(&'static str, usize)],
) -> FieldMap {
    match detect_header(range, fields, quorum, scan_cap) {
        Some(map) => map,
        None => {
            tracing::debug!("header quorum not met, falling back to row 0 positional map");
            FieldMap::from_positions(0, fallback)
        }
    }
}

pub fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|cell| cell_text(cell).is_empty())
}

/// Summary rows below the data ("TOTAL", "TOTAL GERAL") are markers, not
/// transactions.
pub fn is_total_row(row: &[Data]) -> bool {
    row.iter().any(|cell| {
        let folded = fold(&cell_text(cell));
        folded == "TOTAL" || folded.starts_with("TOTAL ")
    })
}
