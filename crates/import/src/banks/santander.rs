use calamine::{Data, Range};

use concil_classify::Classifier;
use concil_core::{Extraction, Transaction};

use crate::normalize::{normalize_row, RawRow, RowContext};
use crate::sheet::{self, FieldSpec};

const CODE: &str = "santander";
const LABEL: &str = "Santander";

const FIELDS: &[FieldSpec] = &[
    ("date", &["DATA"]),
    ("description", &["HISTORICO", "DESCRICAO"]),
    ("document", &["DOCUMENTO"]),
    ("amount", &["VALOR"]),
];

/// Columns when the export ships without a recognizable header row.
const FALLBACK: &[(&str, usize)] = &[
    ("date", 0),
    ("description", 1),
    ("document", 2),
    ("amount", 3),
];

pub fn extract_xlsx(classifier: &Classifier, data: &[u8]) -> Extraction {
    let range = match sheet::first_sheet(data) {
        Ok(range) => range,
        Err(e) => return Extraction::err(format!("{LABEL}: {e}")),
    };
    Extraction::ok(from_range(&range, classifier))
}

fn from_range(range: &Range<Data>, classifier: &Classifier) -> Vec<Transaction> {
    let map = sheet::resolve_field_map(range, FIELDS, 3, 20, FALLBACK);
    let ctx = RowContext {
        bank_label: LABEL,
        bank_code: CODE,
        classifier,
    };

    let mut transactions = Vec::new();
    for (seq, row) in range.rows().enumerate().skip(map.header_row + 1) {
        if sheet::is_blank_row(row) || sheet::is_total_row(row) {
            continue;
        }
        let amount = map.text(row, "amount");
        if amount.is_empty() {
            tracing::debug!(bank = CODE, seq, "row without value, skipped");
            continue;
        }

        let row = RawRow {
            id: map.opt_text(row, "document"),
            date: map.opt_text(row, "date"),
            description: map.text(row, "description"),
            document: map.text(row, "document"),
            amount: Some(amount),
            ..RawRow::default()
        };
        if let Some(tx) = normalize_row(row, seq, &ctx) {
            transactions.push(tx);
        }
    }
    transactions
}
