use rust_decimal::Decimal;

use concil_classify::{fold, Classifier};
use concil_core::{parse_amount, parse_date, Transaction};

/// Per-extractor context threaded into row normalization: the canonical
/// institution label, the bank code used to scope classifier rules, and
/// the shared classifier itself.
pub struct RowContext<'a> {
    pub bank_label: &'a str,
    pub bank_code: &'a str,
    pub classifier: &'a Classifier,
}

/// Raw field tuple produced by an extractor, before any locale-aware
/// parsing. Monetary and date fields stay in their source text form so
/// that every extractor funnels through the same parsing rules.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub id: Option<String>,
    pub date: Option<String>,
    pub description: String,
    pub document: String,
    pub amount: Option<String>,
    pub gross: Option<String>,
    pub net: Option<String>,
    pub fee: Option<String>,
    /// Explicit direction indicator from the source, when one exists.
    /// Takes precedence over any sign embedded in the amount text.
    pub debit: Option<bool>,
    pub status: Option<String>,
}

/// Map a raw row into the canonical record. Returns `None` when the row
/// is excluded outright (non-approved status). Unclassifiable acquirers
/// are left empty, not treated as an error.
pub fn normalize_row(row: RawRow, seq: usize, ctx: &RowContext<'_>) -> Option<Transaction> {
    if let Some(status) = &row.status {
        if !is_approved(status) {
            tracing::debug!(bank = ctx.bank_code, seq, status, "row not approved, excluded");
            return None;
        }
    }

    let date = row.date.as_deref().and_then(parse_date);

    let gross = row.gross.as_deref().map(parse_amount);
    let net = row.net.as_deref().map(parse_amount);

    let mut amount = match (&row.amount, net, gross) {
        (Some(raw), _, _) => parse_amount(raw),
        (None, Some(n), _) => n,
        (None, None, Some(g)) => g,
        (None, None, None) => Decimal::ZERO,
    };
    if let Some(debit) = row.debit {
        amount = if debit { -amount.abs() } else { amount.abs() };
    }

    let fee = match (gross, net) {
        (Some(g), Some(n)) => Some((g - n).max(Decimal::ZERO)),
        _ => row.fee.as_deref().map(parse_amount),
    };

    let id = row
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("{}-{}", ctx.bank_code, seq));

    let mut tx = Transaction::new(
        id,
        date,
        collapse_whitespace(&row.description),
        row.document.trim(),
        amount,
        ctx.bank_label,
    );
    tx.fee = fee;
    if let Some(outcome) = ctx.classifier.classify(&tx.description, Some(ctx.bank_code)) {
        tx.acquirer = outcome.name;
    }
    Some(tx)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_approved(status: &str) -> bool {
    let folded = fold(status);
    // An empty status column is treated as "no status at all".
    folded.is_empty()
        || matches!(
            folded.as_str(),
            "APROVADA" | "APROVADO" | "APPROVED" | "CONCLUIDA" | "CONCLUIDO" | "LIQUIDADA"
                | "LIQUIDADO"
        )
}
