use concil_classify::Classifier;
use concil_core::Extraction;
use concil_pdf::LayoutOptions;

use crate::pdf_text::{self, PdfStatementSpec};

/// Caixa prints tightly packed statement lines, so the line clustering
/// tolerance is kept low; every value carries an explicit C/D letter.
const SPEC: PdfStatementSpec = PdfStatementSpec {
    code: "caixa",
    label: "Caixa Econômica Federal",
    options: LayoutOptions {
        line_tolerance: 2.5,
        column_gap: 10.0,
    },
    exclude_keywords: &["SALDO", "EXTRATO POR PERIODO"],
    debit_letter: true,
};

pub fn extract_pdf(classifier: &Classifier, data: &[u8]) -> Extraction {
    pdf_text::extract(classifier, data, &SPEC)
}
