pub mod clients;
pub mod common;
pub mod parts;
pub mod purchase_orders;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
