//! Inbound market-data message model.
//!
//! A closed tagged variant carrying the common header (timestamp, symbol)
//! alongside per-kind fields, so a single dispatcher can inspect the kind
//! and reach type-specific fields without copying symbol or price data.

use std::fmt;

use bitflags::bitflags;

/// Maximum symbol length observed on IEX-style feeds; not enforced by the
/// type itself (the spec calls out "typically <= 8 chars", not a hard cap).
pub const TYPICAL_SYMBOL_LEN: usize = 8;

/// A trading symbol, stored as an owned ASCII string.
pub type Symbol = String;

/// Market side of a resting order or a price-level update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Buy side (bids).
    Buy,
    /// Sell side (asks).
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// Whether a modify preserves or resets time priority at its price level.
///
/// Recorded on [`OrderModify`] for completeness; the bucketed L3 model in
/// this crate does not track time priority, so this flag has no effect on
/// bucket membership (see spec §4.C / §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyFlags {
    /// The modify should reset the order's queue priority at its level.
    ResetPriority,
    /// The modify should preserve the order's existing queue priority.
    MaintainPriority,
}

bitflags! {
    /// Regulatory/market-structure flags attached to a [`TradeReport`].
    ///
    /// The core records these but never acts on them (spec §6).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SaleConditionFlags: u8 {
        /// Intermarket sweep order.
        const INTERMARKET_SWEEP = 0x80;
        /// Trade occurred during extended hours.
        const EXTENDED_HOURS = 0x40;
        /// Odd-lot trade.
        const ODD_LOT = 0x20;
        /// Trade is exempt from trade-through protections.
        const TRADE_THROUGH_EXEMPT = 0x10;
        /// Single-price cross trade (e.g. opening/closing auction).
        const SINGLE_PRICE_CROSS = 0x08;
    }
}

impl SaleConditionFlags {
    /// True if the intermarket-sweep bit is set.
    pub fn is_intermarket_sweep(self) -> bool {
        self.contains(Self::INTERMARKET_SWEEP)
    }

    /// True if the extended-hours bit is set.
    pub fn is_extended_hours(self) -> bool {
        self.contains(Self::EXTENDED_HOURS)
    }

    /// True if the odd-lot bit is set.
    pub fn is_odd_lot(self) -> bool {
        self.contains(Self::ODD_LOT)
    }

    /// True if the trade-through-exempt bit is set.
    pub fn is_trade_through_exempt(self) -> bool {
        self.contains(Self::TRADE_THROUGH_EXEMPT)
    }

    /// True if the single-price-cross bit is set.
    pub fn is_single_price_cross(self) -> bool {
        self.contains(Self::SINGLE_PRICE_CROSS)
    }
}

/// An opaque, stream-unique order identifier.
///
/// Modeled as a newtype over `u64` rather than the original decoder's
/// narrower wire width, since the spec describes it only as "opaque unique
/// identifier within the stream."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Common header present on every inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageHeader {
    /// Nanoseconds since the Unix epoch; monotonic per stream.
    pub timestamp: u64,
    /// The trading symbol this message concerns.
    pub symbol: Symbol,
}

/// Terminal bit of a [`PriceLevelUpdate`]'s flags field.
///
/// Bit 0 set means "event complete" (terminal); bit 0 clear means "more to
/// follow" (intermediate). Other bits are unspecified (spec §9 Open
/// Questions) and are preserved verbatim but otherwise ignored by this
/// crate.
pub fn is_terminal(flags: u8) -> bool {
    flags & 0x01 != 0
}

/// A single inbound market-data message.
///
/// Deliberately a closed enum rather than a trait-object hierarchy: the set
/// of message kinds is finite and known up front, so enum dispatch replaces
/// the `dynamic_cast`-based dispatch of the original decoder (spec §9).
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Aggregate price-level change (L2).
    PriceLevelUpdate {
        /// Common header.
        header: MessageHeader,
        /// Side this update applies to.
        side: Side,
        /// Price level affected.
        price: f64,
        /// New aggregate size at this level; zero means "remove this level".
        size: u64,
        /// Flags bitfield; bit 0 marks the terminal message of an atomic event.
        flags: u8,
    },
    /// A new resting order (L3).
    AddOrder {
        /// Common header.
        header: MessageHeader,
        /// Unique order identifier.
        order_id: OrderId,
        /// Side of the order.
        side: Side,
        /// Limit price.
        price: f64,
        /// Order size; must be positive.
        size: u64,
    },
    /// A change to a resting order's price and/or size (L3).
    OrderModify {
        /// Common header.
        header: MessageHeader,
        /// The order being modified.
        order_id_ref: OrderId,
        /// The order's new price.
        new_price: f64,
        /// The order's new size.
        new_size: u64,
        /// Priority handling requested by the modify.
        modify_flags: ModifyFlags,
    },
    /// Removal of a resting order (L3).
    OrderDelete {
        /// Common header.
        header: MessageHeader,
        /// The order being removed.
        order_id_ref: OrderId,
    },
    /// A (partial) execution against a resting order (L3).
    OrderExecuted {
        /// Common header.
        header: MessageHeader,
        /// The order being executed against.
        order_id_ref: OrderId,
        /// Execution price.
        exec_price: f64,
        /// Execution size.
        exec_size: u64,
    },
    /// A trade print not tied to a specific resting order identifier (L3).
    TradeReport {
        /// Common header.
        header: MessageHeader,
        /// Identifier of the trade print.
        trade_id: u64,
        /// Trade price.
        price: f64,
        /// Trade size.
        size: u64,
        /// Sale-condition bitfield.
        conditions: SaleConditionFlags,
    },
}

impl Message {
    /// The common header shared by every message kind.
    pub fn header(&self) -> &MessageHeader {
        match self {
            Message::PriceLevelUpdate { header, .. }
            | Message::AddOrder { header, .. }
            | Message::OrderModify { header, .. }
            | Message::OrderDelete { header, .. }
            | Message::OrderExecuted { header, .. }
            | Message::TradeReport { header, .. } => header,
        }
    }

    /// The symbol this message concerns.
    pub fn symbol(&self) -> &str {
        &self.header().symbol
    }

    /// The message's timestamp, nanoseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.header().timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_terminal_reads_bit_zero_only() {
        assert!(!is_terminal(0b0000_0000));
        assert!(is_terminal(0b0000_0001));
        assert!(is_terminal(0b1111_1111));
        assert!(!is_terminal(0b1111_1110));
    }

    #[test]
    fn sale_condition_predicates_match_bits() {
        let f = SaleConditionFlags::INTERMARKET_SWEEP | SaleConditionFlags::ODD_LOT;
        assert!(f.is_intermarket_sweep());
        assert!(f.is_odd_lot());
        assert!(!f.is_extended_hours());
        assert!(!f.is_trade_through_exempt());
        assert!(!f.is_single_price_cross());
    }

    #[test]
    fn header_accessor_reaches_common_fields_for_every_variant() {
        let header = MessageHeader {
            timestamp: 42,
            symbol: "AAPL".to_string(),
        };
        let msg = Message::OrderDelete {
            header: header.clone(),
            order_id_ref: OrderId(1),
        };
        assert_eq!(msg.symbol(), "AAPL");
        assert_eq!(msg.timestamp(), 42);
    }
}
