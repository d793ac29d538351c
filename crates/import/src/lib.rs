pub mod banks;
pub mod normalize;
pub mod ofx;
pub mod pdf_text;
pub mod router;
pub mod sheet;
pub mod txt;

pub use normalize::{normalize_row, RawRow, RowContext};
pub use router::{Format, Router};
