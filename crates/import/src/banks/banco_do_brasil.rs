use concil_classify::Classifier;
use concil_core::Extraction;

use crate::normalize::{normalize_row, RawRow, RowContext};
use crate::ofx::{self, OfxBank};
use crate::txt;

const BANK: OfxBank = OfxBank {
    code: "banco_do_brasil",
    label: "Banco do Brasil",
};

/// BB emits the no-closing-tag OFX grammar; the shared primitive handles
/// it unchanged.
pub fn extract_ofx(classifier: &Classifier, data: &[u8]) -> Extraction {
    ofx::extract(classifier, data, &BANK)
}

const TXT_LABELS: &[&str] = &["Data", "Histórico", "Documento", "Valor"];

/// The fixed-width "extrato.txt" export: column boundaries come from the
/// header label positions, the value column carries a trailing C/D
/// direction letter.
pub fn extract_txt(classifier: &Classifier, data: &[u8]) -> Extraction {
    let text = txt::decode_text(data);
    let mut lines = text.lines();

    let Some(offsets) = lines.find_map(|line| txt::column_offsets(line, TXT_LABELS)) else {
        return Extraction::err("Banco do Brasil TXT: header line not found");
    };

    let ctx = RowContext {
        bank_label: BANK.label,
        bank_code: BANK.code,
        classifier,
    };

    let mut transactions = Vec::new();
    for (seq, line) in lines.enumerate() {
        if line.trim().is_empty() || txt::is_separator_line(line) {
            continue;
        }
        let cols = txt::slice_columns(line, &offsets);
        let [date, description, document, value] = [&cols[0], &cols[1], &cols[2], &cols[3]];
        if date.is_empty() || value.is_empty() {
            tracing::debug!(seq, "TXT line without date or value, skipped");
            continue;
        }

        let (amount, debit) = split_direction_letter(value);
        let row = RawRow {
            id: (!document.is_empty()).then(|| document.clone()),
            date: Some(date.clone()),
            description: description.clone(),
            document: document.clone(),
            amount: Some(amount),
            debit,
            ..RawRow::default()
        };
        if let Some(tx) = normalize_row(row, seq, &ctx) {
            transactions.push(tx);
        }
    }

    Extraction::ok(transactions)
}

/// `"1.234,56 C"` → `("1.234,56", credit)`; a bare value keeps whatever
/// sign its text carries.
fn split_direction_letter(value: &str) -> (String, Option<bool>) {
    let trimmed = value.trim();
    match trimmed.to_ascii_uppercase().chars().last() {
        Some('D') => (trimmed[..trimmed.len() - 1].trim().to_string(), Some(true)),
        Some('C') => (trimmed[..trimmed.len() - 1].trim().to_string(), Some(false)),
        _ => (trimmed.to_string(), None),
    }
}
