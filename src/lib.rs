//! # IEX-style L2/L3 Book Maintenance Engine
//!
//! A single-threaded, synchronous engine that consumes an ordered stream of
//! equity market-data messages from a single venue (IEX-style DEEP/TOPS
//! semantics) and maintains, per trading symbol, two live views of the
//! market:
//!
//! - A **price-aggregated (L2) book** ([`book::L2Book`]) reconstructed from
//!   price-level updates, with a derived Best Bid and Offer and a
//!   book-pressure metric.
//! - A **per-order (L3) book** ([`book::L3Book`]) reconstructed from
//!   add/modify/delete/execute/trade messages, where each resting order
//!   carries identity, size, price, and side.
//!
//! [`book::BookRegistry`] maps a symbol to its book instance(s) and routes
//! each inbound [`message::Message`] to the right book.
//!
//! ## What this crate does not do
//!
//! PCAP ingestion, wire decoding, CLI wrappers, CSV emission, and business-
//! date parsing are external collaborators described only at their
//! interface to this crate (an ordered iterator of [`message::Message`]).
//! Order matching/execution, multi-venue consolidation, persistence, and
//! network transport are out of scope entirely.
//!
//! ## Concurrency model
//!
//! Each book instance processes messages one at a time, in the order
//! delivered by the caller; there is no suspension, cancellation, or
//! internal synchronization. A hosting application that wants to
//! parallelize across symbols must shard by symbol itself — see
//! [`book::BookRegistry`] for details.

pub mod book;
pub mod message;
pub mod prelude;
