use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::format_brl;

/// Canonical transaction record — the only shape that crosses the
/// extractor boundary. The sign of `amount` encodes direction: debits
/// are negative, credits positive. `amount_display` is presentation
/// only and is always derived from `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub description: String,
    #[serde(default)]
    pub document: String,
    pub amount: Decimal,
    pub amount_display: String,
    /// MDR fee, present when the source row exposes gross and net values.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fee: Option<Decimal>,
    pub bank_label: String,
    #[serde(default)]
    pub acquirer: String,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        date: Option<NaiveDate>,
        description: impl Into<String>,
        document: impl Into<String>,
        amount: Decimal,
        bank_label: impl Into<String>,
    ) -> Self {
        Transaction {
            id: id.into(),
            date,
            description: description.into(),
            document: document.into(),
            amount,
            amount_display: format_brl(amount),
            fee: None,
            bank_label: bank_label.into(),
            acquirer: String::new(),
        }
    }

    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}
