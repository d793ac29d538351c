use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Uniform result envelope returned by every extractor and by the router.
///
/// Extractors convert any internal failure into `Err` at their own
/// boundary; callers never see a panic or a bare error type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Extraction {
    Ok {
        transactions: Vec<Transaction>,
        total: usize,
    },
    Err {
        message: String,
    },
}

impl Extraction {
    pub fn ok(transactions: Vec<Transaction>) -> Self {
        let total = transactions.len();
        Extraction::Ok {
            transactions,
            total,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Extraction::Err {
            message: message.into(),
        }
    }

    /// Collapse a fallible extractor body into the envelope shape.
    pub fn from_result<E: std::fmt::Display>(result: Result<Vec<Transaction>, E>) -> Self {
        match result {
            Ok(transactions) => Extraction::ok(transactions),
            Err(e) => Extraction::err(e.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Extraction::Ok { .. })
    }

    pub fn transactions(&self) -> &[Transaction] {
        match self {
            Extraction::Ok { transactions, .. } => transactions,
            Extraction::Err { .. } => &[],
        }
    }

    pub fn total(&self) -> usize {
        match self {
            Extraction::Ok { total, .. } => *total,
            Extraction::Err { .. } => 0,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Extraction::Ok { .. } => None,
            Extraction::Err { message } => Some(message),
        }
    }
}
