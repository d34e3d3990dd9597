//! Best Bid and Offer: the only place bid/ask ordering is enforced
//! structurally.
//!
//! Both construction and every setter validate `bid_price <= ask_price` and
//! fail with [`BookError::ConstructionInvariant`] if violated, so a broken
//! invariant fails loudly at the point of construction rather than silently
//! corrupting published state (spec §4.E).

use std::fmt;

use super::error::BookError;

/// The top-of-book pair: best bid and best ask, each with its resting size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbo {
    bid_price: f64,
    bid_size: u64,
    ask_price: f64,
    ask_size: u64,
}

impl Bbo {
    /// Construct a new BBO, enforcing `bid_price <= ask_price`.
    pub fn new(
        bid_price: f64,
        bid_size: u64,
        ask_price: f64,
        ask_size: u64,
    ) -> Result<Self, BookError> {
        if bid_price > ask_price {
            return Err(BookError::ConstructionInvariant {
                message: format!(
                    "bid_price {bid_price} cannot be greater than ask_price {ask_price}"
                ),
            });
        }
        Ok(Bbo {
            bid_price,
            bid_size,
            ask_price,
            ask_size,
        })
    }

    /// The best bid price.
    pub fn bid_price(&self) -> f64 {
        self.bid_price
    }

    /// The size resting at the best bid.
    pub fn bid_size(&self) -> u64 {
        self.bid_size
    }

    /// The best ask price.
    pub fn ask_price(&self) -> f64 {
        self.ask_price
    }

    /// The size resting at the best ask.
    pub fn ask_size(&self) -> u64 {
        self.ask_size
    }

    /// Replace the bid price, re-validating `bid_price <= ask_price`.
    pub fn set_bid_price(&mut self, new_bid_price: f64) -> Result<(), BookError> {
        if new_bid_price > self.ask_price {
            return Err(BookError::ConstructionInvariant {
                message: format!(
                    "bid_price {new_bid_price} cannot be greater than ask_price {}",
                    self.ask_price
                ),
            });
        }
        self.bid_price = new_bid_price;
        Ok(())
    }

    /// Replace the ask price, re-validating `bid_price <= ask_price`.
    pub fn set_ask_price(&mut self, new_ask_price: f64) -> Result<(), BookError> {
        if new_ask_price < self.bid_price {
            return Err(BookError::ConstructionInvariant {
                message: format!(
                    "ask_price {new_ask_price} cannot be less than bid_price {}",
                    self.bid_price
                ),
            });
        }
        self.ask_price = new_ask_price;
        Ok(())
    }
}

impl fmt::Display for Bbo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Best Bid: Price = {}, Size = {}\nBest Ask: Price = {}, Size = {}",
            self.bid_price, self.bid_size, self.ask_price, self.ask_size
        )
    }
}
