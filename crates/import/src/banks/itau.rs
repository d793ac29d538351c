use calamine::{Data, Range};

use concil_classify::{fold, Classifier};
use concil_core::{parse_date, Extraction};

use crate::normalize::{normalize_row, RawRow, RowContext};
use crate::ofx::{self, OfxBank};
use crate::sheet::{self, FieldMap};

const BANK: OfxBank = OfxBank {
    code: "itau",
    label: "Itaú",
};

pub fn extract_ofx(classifier: &Classifier, data: &[u8]) -> Extraction {
    ofx::extract(classifier, data, &BANK)
}

/// Itaú's spreadsheet export has no header row worth matching: columns
/// are fixed (date, history, document, value) and data rows are the ones
/// whose first column parses as a date.
const POSITIONS: &[(&str, usize)] = &[
    ("date", 0),
    ("description", 1),
    ("document", 2),
    ("amount", 3),
];

pub fn extract_xlsx(classifier: &Classifier, data: &[u8]) -> Extraction {
    let range = match sheet::first_sheet(data) {
        Ok(range) => range,
        Err(e) => return Extraction::err(format!("{}: {e}", BANK.label)),
    };
    Extraction::ok(from_range(&range, classifier))
}

fn from_range(range: &Range<Data>, classifier: &Classifier) -> Vec<concil_core::Transaction> {
    let map = FieldMap::from_positions(0, POSITIONS);
    let ctx = RowContext {
        bank_label: BANK.label,
        bank_code: BANK.code,
        classifier,
    };

    let mut transactions = Vec::new();
    for (seq, row) in range.rows().enumerate() {
        let date = map.text(row, "date");
        if parse_date(&date).is_none() {
            // Banner rows, blank spacers, column titles.
            continue;
        }
        let description = map.text(row, "description");
        if fold(&description).contains("SALDO") {
            continue;
        }
        let amount = map.text(row, "amount");
        if amount.is_empty() {
            tracing::debug!(bank = BANK.code, seq, "row without value, skipped");
            continue;
        }

        let row = RawRow {
            id: map.opt_text(row, "document"),
            date: Some(date),
            description,
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
