use calamine::{Data, Range};

use concil_classify::Classifier;
use concil_core::{Extraction, Transaction};

use crate::normalize::{normalize_row, RawRow, RowContext};
use crate::sheet::{self, FieldSpec};

const CODE: &str = "inter";
const LABEL: &str = "Banco Inter";

/// Inter's export is a three-column sheet preceded by a long banner
/// (account holder, period, balance summary), hence the deep scan.
const FIELDS: &[FieldSpec] = &[
    ("date", &["DATA"]),
    ("description", &["DESCRICAO", "HISTORICO", "LANCAMENTO"]),
    ("amount", &["VALOR"]),
];

const FALLBACK: &[(&str, usize)] = &[("date", 0), ("description", 1), ("amount", 2)];

pub fn extract_xlsx(classifier: &Classifier, data: &[u8]) -> Extraction {
    let range = match sheet::first_sheet(data) {
        Ok(range) => range,
        Err(e) => return Extraction::err(format!("{LABEL}: {e}")),
    };
    Extraction::ok(from_range(&range, classifier))
}

fn from_range(range: &Range<Data>, classifier: &Classifier) -> Vec<Transaction> {
    let map = sheet::resolve_field_map(range, FIELDS, 2, 25, FALLBACK);
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
            continue;
        }

        let row = RawRow {
            date: map.opt_text(row, "date"),
            description: map.text(row, "description"),
            amount: Some(amount),
            ..RawRow::default()
        };
        if let Some(tx) = normalize_row(row, seq, &ctx) {
            transactions.push(tx);
        }
    }
    transactions
}
