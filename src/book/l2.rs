//! Price-aggregated (L2) book: bid/ask ladders, atomic-update sequencing,
//! BBO publication, and book pressure.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::{trace, warn};

use crate::message::{Message, Side, is_terminal};

use super::bbo::Bbo;
use super::error::BookError;
use super::price_key::PriceKey;

/// Number of top-of-book levels summed for [`L2Book::book_pressure`].
const PRESSURE_DEPTH: usize = 5;

/// A single buffered `PriceLevelUpdate`, captured for atomic-event replay.
#[derive(Debug, Clone, PartialEq)]
struct BufferedUpdate {
    symbol: String,
    side: Side,
    price: f64,
    size: u64,
}

/// A price-aggregated order book for one symbol.
///
/// Bids are kept in ascending `PriceKey` order with the best bid at the
/// high end (`.last()`); asks ascend naturally with the best ask at the low
/// end (`.first()`) — mirroring the spec's "bids descend by price, asks
/// ascend by price" via a single ascending map read from the appropriate
/// end, the idiomatic `BTreeMap` rendition of two differently-ordered maps.
#[derive(Debug, Default)]
pub struct L2Book {
    bids: BTreeMap<PriceKey, u64>,
    asks: BTreeMap<PriceKey, u64>,
    atomic_buffer: Vec<BufferedUpdate>,
    published_bbo: Option<Bbo>,
}

impl L2Book {
    /// Construct an empty L2 book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one inbound message. Only [`Message::PriceLevelUpdate`] is
    /// meaningful to an L2 book; every other kind is silently ignored (L2 is
    /// not order-aware).
    pub fn process(&mut self, msg: &Message) -> Result<(), BookError> {
        let Message::PriceLevelUpdate {
            header,
            side,
            price,
            size,
            flags,
        } = msg
        else {
            return Ok(());
        };

        let terminal = is_terminal(*flags);

        if self.atomic_buffer.is_empty() {
            if terminal {
                self.apply_one(*side, *price, *size);
                self.republish_bbo()?;
            } else {
                trace!(symbol = %header.symbol, price, size, "beginning atomic price-level update buffer");
                self.atomic_buffer.push(BufferedUpdate {
                    symbol: header.symbol.clone(),
                    side: *side,
                    price: *price,
                    size: *size,
                });
            }
            return Ok(());
        }

        let buffered_symbol = &self.atomic_buffer[0].symbol;
        if buffered_symbol != &header.symbol {
            warn!(
                buffered_symbol,
                incoming_symbol = %header.symbol,
                "mismatched symbol inside atomic buffer; discarding buffer"
            );
            self.atomic_buffer.clear();
            return Err(BookError::ProtocolViolation {
                message: format!(
                    "mismatched symbol {} inside atomic buffer for {buffered_symbol}",
                    header.symbol
                ),
            });
        }

        self.atomic_buffer.push(BufferedUpdate {
            symbol: header.symbol.clone(),
            side: *side,
            price: *price,
            size: *size,
        });

        if terminal {
            let batch = std::mem::take(&mut self.atomic_buffer);
            for update in &batch {
                self.apply_one(update.side, update.price, update.size);
            }
            self.republish_bbo()?;
        }

        Ok(())
    }

    /// Apply a single price-level update to the appropriate ladder.
    fn apply_one(&mut self, side: Side, price: f64, size: u64) {
        let ladder = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let key = PriceKey(price);
        if size == 0 {
            ladder.remove(&key);
        } else {
            ladder.insert(key, size);
        }
    }

    /// Recompute and republish the BBO after an apply-batch, clearing it if
    /// either side is empty or the result would be crossed.
    fn republish_bbo(&mut self) -> Result<(), BookError> {
        let best_bid = self.bids.iter().next_back();
        let best_ask = self.asks.iter().next();

        let (bid, ask) = match (best_bid, best_ask) {
            (Some(bid), Some(ask)) => (bid, ask),
            _ => {
                self.published_bbo = None;
                return Ok(());
            }
        };

        let (bid_price, bid_size) = (bid.0.0, *bid.1);
        let (ask_price, ask_size) = (ask.0.0, *ask.1);

        match Bbo::new(bid_price, bid_size, ask_price, ask_size) {
            Ok(bbo) => {
                self.published_bbo = Some(bbo);
                Ok(())
            }
            Err(_) => {
                warn!(bid_price, ask_price, "crossed published BBO suppressed");
                self.published_bbo = None;
                Err(BookError::CrossedPublishedBbo {
                    bid_price,
                    ask_price,
                })
            }
        }
    }

    /// The most recently published BBO, or `None` if either side was empty
    /// at publication time.
    pub fn get_bbo(&self) -> Option<Bbo> {
        self.published_bbo
    }

    /// Normalized top-5 size imbalance in `[-1, 1]`; `0` when both sides'
    /// cumulative top-5 sizes are zero (or equal).
    pub fn book_pressure(&self) -> f64 {
        let bid_total: u64 = self.bids.values().rev().take(PRESSURE_DEPTH).sum();
        let ask_total: u64 = self.asks.values().take(PRESSURE_DEPTH).sum();
        let denom = bid_total + ask_total;
        if denom == 0 {
            return 0.0;
        }
        (bid_total as f64 - ask_total as f64) / denom as f64
    }

    /// Write a human-readable rendering of both ladders to `sink`.
    pub fn print_book(&self, sink: &mut impl std::fmt::Write) -> std::fmt::Result {
        writeln!(sink, "Bids:")?;
        for (price, size) in self.bids.iter().rev() {
            writeln!(sink, "Price: {}, Size: {}", price.0, size)?;
        }
        writeln!(sink, "Asks:")?;
        for (price, size) in self.asks.iter() {
            writeln!(sink, "Price: {}, Size: {}", price.0, size)?;
        }
        Ok(())
    }

    /// Write a human-readable rendering of the published BBO to `sink`.
    pub fn print_bbo(&self, sink: &mut impl std::fmt::Write) -> std::fmt::Result {
        match &self.published_bbo {
            Some(bbo) => writeln!(sink, "{bbo}"),
            None => writeln!(sink, "No Best Bid or Offer available."),
        }
    }

    /// Convenience form of [`L2Book::print_bbo`] that returns an owned
    /// `String` instead of writing to a caller-supplied sink.
    pub fn bbo_diagnostic(&self) -> String {
        let mut buf = String::new();
        let _ = self.print_bbo(&mut buf);
        buf
    }
}
