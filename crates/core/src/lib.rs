pub mod amount;
pub mod date;
pub mod envelope;
pub mod transaction;

pub use amount::{amount_from_f64, format_brl, parse_amount};
pub use date::{excel_serial_date, parse_date};
pub use envelope::Extraction;
pub use transaction::Transaction;
