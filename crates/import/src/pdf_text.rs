use std::sync::OnceLock;

use regex::Regex;

use concil_classify::{fold, Classifier};
use concil_core::Extraction;
use concil_pdf::{LayoutOptions, COLUMN_SEPARATOR};

use crate::normalize::{normalize_row, RawRow, RowContext};

/// Per-institution tuning for the PDF statement walker.
pub struct PdfStatementSpec {
    pub code: &'static str,
    pub label: &'static str,
    pub options: LayoutOptions,
    /// Folded keywords that mark header/footer banners (opening balance,
    /// page totals) which must never become transactions.
    pub exclude_keywords: &'static [&'static str],
    /// Whether the layout prints an explicit C/D letter after the value.
    /// When it does, that letter is the primary direction signal; the
    /// trailing-minus heuristic is only a fallback.
    pub debit_letter: bool,
}

/// Brazilian currency-shaped token, optionally with a trailing minus:
/// `1.234,56`, `89,90-`.
fn amount_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,3}(?:\.\d{3})+,\d{2}-?|\d+,\d{2}-?").unwrap())
}

/// A leading `DD/MM/YYYY` token anchors a new logical transaction.
fn date_anchor_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2}/\d{2}/\d{4})\b").unwrap())
}

struct PendingTx {
    date: String,
    description: String,
    document: String,
    amount: Option<String>,
    debit: Option<bool>,
}

/// Walk reconstructed statement lines: a line starting with a date opens
/// a transaction, following lines without one are appended as detail.
/// Lines carrying any excluded keyword are dropped before anchoring.
pub fn extract(classifier: &Classifier, data: &[u8], spec: &PdfStatementSpec) -> Extraction {
    let lines = match concil_pdf::extract_lines(data, &spec.options) {
        Ok(lines) => lines,
        Err(e) => return Extraction::err(format!("{}: {e}", spec.label)),
    };

    Extraction::ok(walk_lines(&lines, classifier, spec))
}

/// The line walker proper, separated from PDF decoding so it can be
/// exercised against hand-built lines.
fn walk_lines(
    lines: &[String],
    classifier: &Classifier,
    spec: &PdfStatementSpec,
) -> Vec<concil_core::Transaction> {
    let ctx = RowContext {
        bank_label: spec.label,
        bank_code: spec.code,
        classifier,
    };

    let mut transactions = Vec::new();
    let mut pending: Option<PendingTx> = None;
    let mut seq = 0;

    for line in lines {
        if is_excluded(line, spec.exclude_keywords) {
            continue;
        }

        if let Some(m) = date_anchor_regex().find(line) {
            if let Some(tx) = pending.take() {
                flush(tx, &mut transactions, &mut seq, &ctx, spec.code);
            }
            pending = Some(open_transaction(m.as_str(), &line[m.end()..], spec));
        } else if let Some(tx) = pending.as_mut() {
            tx.description.push(' ');
            tx.description.push_str(&plain_text(line));
        }
    }
    if let Some(tx) = pending.take() {
        flush(tx, &mut transactions, &mut seq, &ctx, spec.code);
    }

    transactions
}

fn open_transaction(date: &str, rest: &str, spec: &PdfStatementSpec) -> PendingTx {
    let (amount, debit, amount_span) = match amount_regex().find_iter(rest).last() {
        Some(m) => {
            let token = m.as_str();
            let after = rest[m.end()..].trim_start_matches([' ', '/']);
            let debit = direction(token, after, spec.debit_letter);
            (Some(token.trim_end_matches('-').to_string()), debit, m.start())
        }
        None => (None, None, rest.len()),
    };

    let before_amount = &rest[..amount_span];
    let columns: Vec<&str> = before_amount
        .split(COLUMN_SEPARATOR)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    // A short, purely numeric leading column is the document number.
    let (document, description) = match columns.split_first() {
        Some((first, tail))
            if !tail.is_empty() && first.len() <= 12 && first.bytes().all(|b| b.is_ascii_digit()) =>
        {
            (first.to_string(), tail.join(" "))
        }
        _ => (String::new(), columns.join(" ")),
    };

    PendingTx {
        date: date.to_string(),
        description,
        document,
        amount,
        debit,
    }
}

fn direction(token: &str, after: &str, debit_letter: bool) -> Option<bool> {
    if debit_letter {
        match after.chars().next() {
            Some('D') => return Some(true),
            Some('C') => return Some(false),
            _ => {}
        }
    }
    // Fallback: a minus attached to, or spaced right after, the value.
    if token.ends_with('-') || after.starts_with('-') {
        Some(true)
    } else {
        None
    }
}

fn flush(
    tx: PendingTx,
    transactions: &mut Vec<concil_core::Transaction>,
    seq: &mut usize,
    ctx: &RowContext<'_>,
    code: &str,
) {
    let Some(amount) = tx.amount else {
        tracing::debug!(bank = code, date = %tx.date, "statement line without value, skipped");
        return;
    };
    let row = RawRow {
        date: Some(tx.date),
        description: tx.description,
        document: tx.document,
        amount: Some(amount),
        debit: tx.debit,
        ..RawRow::default()
    };
    if let Some(tx) = normalize_row(row, *seq, ctx) {
        transactions.push(tx);
        *seq += 1;
    }
}

fn is_excluded(line: &str, keywords: &[&str]) -> bool {
    let folded = fold(line);
    keywords.iter().any(|kw| folded.contains(kw))
}

fn plain_text(line: &str) -> String {
    line.replace(COLUMN_SEPARATOR, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

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

    fn run(lines: &[&str]) -> Vec<concil_core::Transaction> {
        let owned: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        walk_lines(&owned, &Classifier::default(), &SPEC)
    }

    #[test]
    fn anchored_line_becomes_transaction() {
        let txs = run(&["03/11/2025 / 000123 / CRED AZULZINHA / 1.234,56 C"]);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].document, "000123");
        assert_eq!(txs[0].description, "CRED AZULZINHA");
        assert_eq!(txs[0].amount, Decimal::from_str("1234.56").unwrap());
        assert_eq!(txs[0].acquirer, "CIELO");
    }

    #[test]
    fn debit_letter_negates() {
        let txs = run(&["04/11/2025 / TAR MANUTENCAO / 35,00 D"]);
        assert_eq!(txs[0].amount, Decimal::from_str("-35.00").unwrap());
    }

    #[test]
    fn trailing_minus_is_the_fallback_signal() {
        let txs = run(&["04/11/2025 / PAG FORNECEDOR / 120,00-"]);
        assert_eq!(txs[0].amount, Decimal::from_str("-120.00").unwrap());
    }

    #[test]
    fn continuation_lines_extend_description() {
        let txs = run(&[
            "03/11/2025 / CRED REDE / 500,00 C",
            "ESTABELECIMENTO 1234 LOJA CENTRO",
        ]);
        assert_eq!(txs.len(), 1);
        assert!(txs[0].description.contains("LOJA CENTRO"));
        assert_eq!(txs[0].acquirer, "REDE");
    }

    #[test]
    fn balance_banners_are_excluded() {
        let txs = run(&[
            "SALDO ANTERIOR / 10.000,00",
            "03/11/2025 / CRED CIELO / 500,00 C",
            "03/11/2025 / SALDO DIA / 10.500,00 C",
        ]);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "CRED CIELO");
    }

    #[test]
    fn line_without_value_is_skipped_silently() {
        let txs = run(&[
            "03/11/2025 / LANCAMENTO FUTURO",
            "04/11/2025 / CRED GETNET / 90,00 C",
        ]);
        assert_eq!(txs.len(), 1);
    }

    #[test]
    fn unreadable_pdf_is_a_reader_error_envelope() {
        let result = extract(&Classifier::default(), b"garbage", &SPEC);
        assert!(!result.is_ok());
        let message = result.error().unwrap();
        assert!(message.contains("Caixa"));
        assert!(message.contains("reader unavailable"));
    }
}
