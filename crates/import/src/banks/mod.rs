//! One module per institution. Each handler is specialized to a single
//! (institution, format) pair and shares the format machinery from the
//! sibling modules; only identity, column layouts, and tolerances differ.

pub mod banco_do_brasil;
pub mod bradesco;
pub mod caixa;
pub mod cielo;
pub mod inter;
pub mod itau;
pub mod santander;
pub mod sicoob;
pub mod sicredi;
