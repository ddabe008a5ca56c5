//! Database entities for the parts catalog and purchase-order ledger.

pub mod client;
pub mod line_item;
pub mod part;
pub mod purchase_order;
