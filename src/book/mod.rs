//! Book-maintenance engine: the L2 price-aggregated book, the L3 per-order
//! book, the Book Registry that routes messages to them by symbol, and the
//! shared error taxonomy and BBO invariant.
//!
//! # Error policy
//!
//! Per spec §7, only construction-time invariant violations
//! ([`BookError::ConstructionInvariant`]) are hard failures the caller must
//! handle. Every other error kind is reported (via `tracing`) and the
//! message is dropped; processing continues. Callers that want the
//! "report and continue" behavior at the stream level should use
//! [`registry::BookRegistry::process_stream`], which discards per-message
//! errors after they've been logged by the underlying book.

mod bbo;
mod error;
mod l2;
mod l3;
mod price_key;
pub mod registry;

pub use bbo::Bbo;
pub use error::BookError;
pub use l2::L2Book;
pub use l3::{L3Book, Order};
pub use registry::{BookRegistry, L3BookConfig, SymbolBooks};
