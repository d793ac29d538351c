use calamine::{Data, Range};

use concil_classify::Classifier;
use concil_core::{Extraction, Transaction};

use crate::normalize::{normalize_row, RawRow, RowContext};
use crate::sheet::{self, FieldSpec};

const CODE: &str = "cielo";
const LABEL: &str = "Cielo";

/// Acquirer sales report rather than a bank statement: rows carry the
/// card brand, gross and settled values, and an approval status instead
/// of a signed statement amount.
const FIELDS: &[FieldSpec] = &[
    ("date", &["DATA DA VENDA", "DATA"]),
    ("brand", &["BANDEIRA"]),
    ("gross", &["VALOR BRUTO"]),
    ("net", &["VALOR LIQUIDO"]),
    ("status", &["STATUS"]),
    ("document", &["NSU"]),
];

const FALLBACK: &[(&str, usize)] = &[
    ("date", 0),
    ("brand", 1),
    ("gross", 2),
    ("net", 3),
    ("status", 4),
    ("document", 5),
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
        let gross = map.opt_text(row, "gross");
        let net = map.opt_text(row, "net");
        if gross.is_none() && net.is_none() {
            tracing::debug!(bank = CODE, seq, "sale row without values, skipped");
            continue;
        }

        // The brand column doubles as the description so the same rule
        // table that reads statement text reads these rows too.
        let row = RawRow {
            id: map.opt_text(row, "document"),
            date: map.opt_text(row, "date"),
            description: map.text(row, "brand"),
            document: map.text(row, "document"),
            gross,
            net,
            status: map.opt_text(row, "status"),
            ..RawRow::default()
        };
        if let Some(tx) = normalize_row(row, seq, &ctx) {
            transactions.push(tx);
        }
    }
    transactions
}
