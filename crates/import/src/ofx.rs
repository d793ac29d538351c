use concil_classify::Classifier;
use concil_core::Extraction;

use crate::normalize::{normalize_row, RawRow, RowContext};

/// Identity of the institution an OFX handler is bound to.
pub struct OfxBank {
    pub code: &'static str,
    pub label: &'static str,
}

/// Case-insensitive substring search, byte-offset based. OFX is ASCII in
/// its markup even when the payload is Latin-1.
fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() || from > h.len() - n.len() {
        return None;
    }
    (from..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

/// Split the statement body into `<STMTTRN>` blocks. A block runs until
/// its `</STMTTRN>` close or, in the no-closing-tag grammar, until the
/// next `<STMTTRN>` open (or end of input) — so both variants parse
/// without being told apart.
pub fn statement_blocks(text: &str) -> Vec<&str> {
    const OPEN: &str = "<STMTTRN>";
    const CLOSE: &str = "</STMTTRN>";

    let mut blocks = Vec::new();
    let mut pos = 0;
    while let Some(start) = find_ci(text, OPEN, pos) {
        let body_start = start + OPEN.len();
        let close = find_ci(text, CLOSE, body_start);
        let next_open = find_ci(text, OPEN, body_start);
        let end = match (close, next_open) {
            (Some(c), Some(n)) => c.min(n),
            (Some(c), None) => c,
            (None, Some(n)) => n,
            (None, None) => text.len(),
        };
        blocks.push(&text[body_start..end]);
        pos = end.max(body_start);
    }
    blocks
}

/// Read `<TAG>value`, stopping at the next `<` or the end of the block.
/// This single primitive covers both `<TAG>value</TAG>` and bare
/// `<TAG>value` fields.
pub fn tag_value(block: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let start = find_ci(block, &open, 0)? + open.len();
    let rest = &block[start..];
    let end = rest.find('<').unwrap_or(rest.len());
    let value = rest[..end].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Shared OFX extractor: the per-bank handlers only differ by identity
/// and classifier scope. Blocks missing `DTPOSTED` or `TRNAMT` are
/// dropped without aborting the rest of the file.
pub fn extract(classifier: &Classifier, data: &[u8], bank: &OfxBank) -> Extraction {
    let text = String::from_utf8_lossy(data);
    let blocks = statement_blocks(&text);
    if blocks.is_empty() {
        // A statement period with no movement is still a statement; only
        // a file without any OFX markup at all is an error.
        if find_ci(&text, "<OFX", 0).is_some() {
            return Extraction::ok(Vec::new());
        }
        return Extraction::err(format!("{}: no OFX content found", bank.label));
    }

    let ctx = RowContext {
        bank_label: bank.label,
        bank_code: bank.code,
        classifier,
    };

    let mut transactions = Vec::new();
    for (seq, block) in blocks.iter().enumerate() {
        let Some(date) = tag_value(block, "DTPOSTED") else {
            tracing::debug!(bank = bank.code, seq, "OFX block missing DTPOSTED, skipped");
            continue;
        };
        let Some(amount) = tag_value(block, "TRNAMT") else {
            tracing::debug!(bank = bank.code, seq, "OFX block missing TRNAMT, skipped");
            continue;
        };

        let description = tag_value(block, "MEMO")
            .or_else(|| tag_value(block, "NAME"))
            .unwrap_or_default();
        let document = tag_value(block, "CHECKNUM")
            .or_else(|| tag_value(block, "REFNUM"))
            .unwrap_or_default();

        let row = RawRow {
            id: tag_value(block, "FITID"),
            date: Some(date),
            description,
            document,
            amount: Some(amount),
            ..RawRow::default()
        };
        if let Some(tx) = normalize_row(row, seq, &ctx) {
            transactions.push(tx);
        }
    }

    Extraction::ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const BANK: OfxBank = OfxBank {
        code: "banco_do_brasil",
        label: "Banco do Brasil",
    };

    // ── primitives ────────────────────────────────────────────────────────────

    #[test]
    fn tag_value_with_closing_tag() {
        assert_eq!(
            tag_value("<TRNAMT>-49.99</TRNAMT>", "TRNAMT").as_deref(),
            Some("-49.99")
        );
    }

    #[test]
    fn tag_value_without_closing_tag() {
        let block = "<DTPOSTED>20251103\n<TRNAMT>150.00\n<MEMO>CR CPS VS ELECTRON";
        assert_eq!(tag_value(block, "DTPOSTED").as_deref(), Some("20251103"));
        assert_eq!(tag_value(block, "TRNAMT").as_deref(), Some("150.00"));
        assert_eq!(
            tag_value(block, "MEMO").as_deref(),
            Some("CR CPS VS ELECTRON")
        );
    }

    #[test]
    fn tag_value_missing_or_empty_is_none() {
        assert_eq!(tag_value("<MEMO>x", "TRNAMT"), None);
        assert_eq!(tag_value("<TRNAMT></TRNAMT>", "TRNAMT"), None);
    }

    #[test]
    fn blocks_split_in_unclosed_grammar() {
        let text = "<BANKTRANLIST>\n<STMTTRN>\n<TRNAMT>1.00\n<STMTTRN>\n<TRNAMT>2.00\n</BANKTRANLIST>";
        let blocks = statement_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("1.00"));
        assert!(blocks[1].contains("2.00"));
    }

    #[test]
    fn blocks_split_in_closed_grammar() {
        let text = "<STMTTRN><TRNAMT>1.00</TRNAMT></STMTTRN><STMTTRN><TRNAMT>2.00</TRNAMT></STMTTRN>";
        assert_eq!(statement_blocks(text).len(), 2);
    }

    // ── full extraction ───────────────────────────────────────────────────────

    const SAMPLE_BB_OFX: &str = r#"
OFXHEADER:100
DATA:OFXSGML
VERSION:102

<OFX>
<BANKMSGSRSV1>
<STMTTRNRS>
<STMTRS>
<CURDEF>BRL
<BANKTRANLIST>
<DTSTART>20251101
<DTEND>20251130
<STMTTRN>
<TRNTYPE>CREDIT
<DTPOSTED>20251103
<TRNAMT>1500.00
<FITID>2025110301
<CHECKNUM>885544
<MEMO>CR CPS VS ELECTRON
<STMTTRN>
<TRNTYPE>DEBIT
<DTPOSTED>20251104
<TRNAMT>-89.90
<FITID>2025110402
<MEMO>TAR PACOTE SERVICOS
<STMTTRN>
<TRNTYPE>CREDIT
<DTPOSTED>20251105
<FITID>2025110503
<MEMO>BLOCO SEM VALOR
</BANKTRANLIST>
</STMTRS>
</STMTTRNRS>
</BANKMSGSRSV1>
</OFX>
"#;

    #[test]
    fn extract_parses_blocks_and_classifies() {
        let result = extract(&Classifier::default(), SAMPLE_BB_OFX.as_bytes(), &BANK);
        assert!(result.is_ok());
        // Third block has no TRNAMT and is dropped.
        assert_eq!(result.total(), 2);

        let txs = result.transactions();
        assert_eq!(txs[0].id, "2025110301");
        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2025, 11, 3));
        assert_eq!(txs[0].amount, Decimal::from_str("1500.00").unwrap());
        assert_eq!(txs[0].document, "885544");
        assert_eq!(txs[0].acquirer, "SIPAG");
        assert_eq!(txs[0].bank_label, "Banco do Brasil");

        assert_eq!(txs[1].amount, Decimal::from_str("-89.90").unwrap());
        assert!(txs[1].is_debit());
        assert_eq!(txs[1].acquirer, "");
    }

    #[test]
    fn extract_missing_amount_does_not_abort_remaining_blocks() {
        // The dropped block sits between valid ones.
        let text = "<STMTTRN>\n<DTPOSTED>20251103\n<TRNAMT>10.00\n<STMTTRN>\n<DTPOSTED>20251104\n<MEMO>SEM VALOR\n<STMTTRN>\n<DTPOSTED>20251105\n<TRNAMT>30.00\n";
        let result = extract(&Classifier::default(), text.as_bytes(), &BANK);
        assert_eq!(result.total(), 2);
    }

    #[test]
    fn extract_without_ofx_markup_is_an_error() {
        let result = extract(&Classifier::default(), b"not ofx at all", &BANK);
        assert!(!result.is_ok());
        assert!(result.error().unwrap().contains("Banco do Brasil"));
    }

    #[test]
    fn empty_statement_period_is_ok_with_zero_rows() {
        let text = "OFXHEADER:100\n\n<OFX>\n<BANKTRANLIST>\n<DTSTART>20251101\n<DTEND>20251130\n</BANKTRANLIST>\n</OFX>\n";
        let result = extract(&Classifier::default(), text.as_bytes(), &BANK);
        assert!(result.is_ok());
        assert_eq!(result.total(), 0);
    }

    #[test]
    fn extract_is_idempotent() {
        let a = extract(&Classifier::default(), SAMPLE_BB_OFX.as_bytes(), &BANK);
        let b = extract(&Classifier::default(), SAMPLE_BB_OFX.as_bytes(), &BANK);
        assert_eq!(a.transactions(), b.transactions());
    }
}
