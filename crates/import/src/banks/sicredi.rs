use concil_classify::Classifier;
use concil_core::Extraction;
use concil_pdf::LayoutOptions;

use crate::pdf_text::{self, PdfStatementSpec};

/// Sicredi's layout spaces rows generously and wraps long descriptions,
/// so fragments further apart vertically still belong to one line. There
/// is no direction letter; debits carry a trailing minus.
const SPEC: PdfStatementSpec = PdfStatementSpec {
    code: "sicredi",
    label: "Sicredi",
    options: LayoutOptions {
        line_tolerance: 5.0,
        column_gap: 10.0,
    },
    exclude_keywords: &["SALDO", "RESUMO"],
    debit_letter: false,
};

pub fn extract_pdf(classifier: &Classifier, data: &[u8]) -> Extraction {
    pdf_text::extract(classifier, data, &SPEC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_document_names_the_institution() {
        let result = extract_pdf(&Classifier::default(), b"not a pdf");
        assert!(!result.is_ok());
        assert!(result.error().unwrap().contains("Sicredi"));
    }
}
