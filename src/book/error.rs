//! Book error taxonomy.
//!
//! Mirrors the policy table in the specification: construction-time
//! invariant violations are the only errors that propagate to the caller as
//! a hard failure; every other kind is reported and the offending message is
//! dropped, with processing continuing (see [`crate::book`] module docs).

use std::fmt;

use crate::message::{OrderId, Side};

/// Errors that can occur while constructing or operating a book.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum BookError {
    /// `price_increment <= 0`, or a BBO would be constructed with
    /// `bid_price > ask_price`.
    ConstructionInvariant {
        /// Human-readable description of the violated invariant.
        message: String,
    },

    /// An L3 operation referenced a price outside `[min_price, max_price]`.
    OutOfRange {
        /// The offending price.
        price: f64,
        /// Configured minimum price.
        min_price: f64,
        /// Configured maximum price.
        max_price: f64,
    },

    /// Modify/Delete/Execute referenced an order_id not present in the book.
    UnknownOrder {
        /// The order id that was not found.
        order_id: OrderId,
    },

    /// AddOrder referenced an order_id already present in the book.
    DuplicateOrder {
        /// The order id that already existed.
        order_id: OrderId,
    },

    /// An execution's price is on the wrong side of the resting order's price.
    SideInconsistentExecution {
        /// The order being executed against.
        order_id: OrderId,
        /// The resting order's side.
        side: Side,
        /// The resting order's price.
        order_price: f64,
        /// The execution price that violates side consistency.
        exec_price: f64,
    },

    /// An execution's size exceeds the resting order's remaining size.
    OverExecution {
        /// The order being executed against.
        order_id: OrderId,
        /// The resting order's size before this execution.
        order_size: u64,
        /// The execution size that would exceed it.
        exec_size: u64,
    },

    /// A protocol-level inconsistency: a mismatched symbol inside a buffered
    /// atomic sequence, or an unrecognized message tag.
    ProtocolViolation {
        /// Human-readable description of the violation.
        message: String,
    },

    /// The best bid exceeded the best ask after applying a terminal atomic
    /// batch; the published BBO was cleared rather than exposed crossed.
    CrossedPublishedBbo {
        /// The crossed best bid price.
        bid_price: f64,
        /// The crossed best ask price.
        ask_price: f64,
    },

    /// A `TradeReport` found no resting order able to absorb it fully.
    ///
    /// Distinct from [`BookError::ProtocolViolation`]: this is the ordinary
    /// "no order could absorb this trade" business outcome described by
    /// spec §4.C, not a stream/protocol-level breach.
    NoMatchingOrder {
        /// The trade's price.
        price: f64,
        /// The trade's size.
        size: u64,
    },
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::ConstructionInvariant { message } => {
                write!(f, "construction invariant violated: {message}")
            }
            BookError::OutOfRange {
                price,
                min_price,
                max_price,
            } => write!(
                f,
                "price {price} out of range [{min_price}, {max_price}]"
            ),
            BookError::UnknownOrder { order_id } => {
                write!(f, "unknown order: {order_id}")
            }
            BookError::DuplicateOrder { order_id } => {
                write!(f, "duplicate order: {order_id}")
            }
            BookError::SideInconsistentExecution {
                order_id,
                side,
                order_price,
                exec_price,
            } => write!(
                f,
                "side-inconsistent execution on order {order_id} ({side} at {order_price}): exec price {exec_price}"
            ),
            BookError::OverExecution {
                order_id,
                order_size,
                exec_size,
            } => write!(
                f,
                "over-execution on order {order_id}: size {order_size}, exec size {exec_size}"
            ),
            BookError::ProtocolViolation { message } => {
                write!(f, "protocol violation: {message}")
            }
            BookError::CrossedPublishedBbo {
                bid_price,
                ask_price,
            } => write!(
                f,
                "crossed published BBO suppressed: bid {bid_price} > ask {ask_price}"
            ),
            BookError::NoMatchingOrder { price, size } => {
                write!(f, "no matching order found for trade at {price} x {size}")
            }
        }
    }
}

impl std::error::Error for BookError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_order_id_for_unknown_order() {
        let err = BookError::UnknownOrder {
            order_id: OrderId(7),
        };
        assert_eq!(err.to_string(), "unknown order: 7");
    }
}
