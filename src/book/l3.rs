//! Per-order (L3) book: order registry, price-bucket index, and the order
//! lifecycle state machine (add/modify/delete/execute/trade).

use std::collections::{HashMap, HashSet};

use tracing::{trace, warn};

use crate::message::{Message, ModifyFlags, OrderId, Side};

use super::error::BookError;

/// A resting order owned exclusively by the [`L3Book`] that contains it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Order {
    /// Unique identifier within the stream.
    pub order_id: OrderId,
    /// Current resting size.
    pub size: u64,
    /// Current resting price.
    pub price: f64,
    /// Side of the order; immutable for the order's lifetime.
    pub side: Side,
}

/// A per-order order book for one symbol.
///
/// Two indices are kept coherent on every mutation: `orders`, the
/// authoritative `order_id -> Order` map, and `buckets`, a fixed-size array
/// of unordered id sets keyed by `floor((price - min_price) / increment)`.
/// Only `order_id`s are stored in buckets; bucket lookups indirect through
/// `orders`, so there is exactly one owning copy of each `Order` (spec §9
/// Design Note: avoid owning aliases between the two indices).
#[derive(Debug)]
pub struct L3Book {
    orders: HashMap<OrderId, Order>,
    buckets: Vec<HashSet<OrderId>>,
    min_price: f64,
    max_price: f64,
    price_increment: f64,
}

impl L3Book {
    /// Construct a new L3 book with a fixed bucket count.
    ///
    /// # Errors
    /// Returns [`BookError::ConstructionInvariant`] if `price_increment <= 0`,
    /// or if `num_price_levels` is too small to cover
    /// `[min_price, max_price]` at `price_increment` — every price in range
    /// must map to a bucket that exists, never to a clamped, wrong one.
    pub fn new(
        num_price_levels: usize,
        min_price: f64,
        max_price: f64,
        price_increment: f64,
    ) -> Result<Self, BookError> {
        if price_increment <= 0.0 {
            return Err(BookError::ConstructionInvariant {
                message: format!("price_increment must be greater than zero, got {price_increment}"),
            });
        }
        let required_levels = ((max_price - min_price) / price_increment).floor() as usize + 1;
        if num_price_levels < required_levels {
            return Err(BookError::ConstructionInvariant {
                message: format!(
                    "num_price_levels {num_price_levels} is too small to cover [{min_price}, {max_price}] at increment {price_increment}; needs at least {required_levels}"
                ),
            });
        }
        Ok(L3Book {
            orders: HashMap::new(),
            buckets: vec![HashSet::new(); num_price_levels],
            min_price,
            max_price,
            price_increment,
        })
    }

    fn bucket_index(&self, price: f64) -> Result<usize, BookError> {
        if price < self.min_price || price > self.max_price {
            return Err(BookError::OutOfRange {
                price,
                min_price: self.min_price,
                max_price: self.max_price,
            });
        }
        let idx = ((price - self.min_price) / self.price_increment).floor() as usize;
        if idx >= self.buckets.len() {
            return Err(BookError::OutOfRange {
                price,
                min_price: self.min_price,
                max_price: self.max_price,
            });
        }
        Ok(idx)
    }

    /// Dispatch a single message to the appropriate handler. Messages that
    /// are not L3-relevant are ignored.
    pub fn process(&mut self, msg: &Message) -> Result<(), BookError> {
        match msg {
            Message::AddOrder {
                order_id,
                side,
                price,
                size,
                ..
            } => self.add_order(*order_id, *side, *price, *size),
            Message::OrderModify {
                order_id_ref,
                new_price,
                new_size,
                modify_flags,
                ..
            } => self.modify_order(*order_id_ref, *new_price, *new_size, *modify_flags),
            Message::OrderDelete { order_id_ref, .. } => self.delete_order(*order_id_ref),
            Message::OrderExecuted {
                order_id_ref,
                exec_price,
                exec_size,
                ..
            } => self.execute_order(*order_id_ref, *exec_price, *exec_size),
            Message::TradeReport { price, size, .. } => self.handle_trade(*price, *size),
            Message::PriceLevelUpdate { .. } => Ok(()),
        }
    }

    /// Insert a new resting order.
    ///
    /// # Errors
    /// [`BookError::DuplicateOrder`] if `order_id` is already present.
    /// [`BookError::OutOfRange`] if `price` is outside the configured range.
    pub fn add_order(
        &mut self,
        order_id: OrderId,
        side: Side,
        price: f64,
        size: u64,
    ) -> Result<(), BookError> {
        if self.orders.contains_key(&order_id) {
            warn!(%order_id, "duplicate order rejected");
            return Err(BookError::DuplicateOrder { order_id });
        }
        let index = self.bucket_index(price)?;
        let order = Order {
            order_id,
            size,
            price,
            side,
        };
        self.orders.insert(order_id, order);
        self.buckets[index].insert(order_id);
        trace!(%order_id, %side, price, size, "added order");
        Ok(())
    }

    /// Change a resting order's price and/or size. Side is immutable.
    ///
    /// `modify_flags` is recorded but does not affect bucket membership:
    /// this bucketed model does not track time priority (spec §4.C).
    pub fn modify_order(
        &mut self,
        order_id_ref: OrderId,
        new_price: f64,
        new_size: u64,
        _modify_flags: ModifyFlags,
    ) -> Result<(), BookError> {
        let Some(order) = self.orders.get(&order_id_ref).copied() else {
            warn!(order_id = %order_id_ref, "modify referenced unknown order");
            return Err(BookError::UnknownOrder {
                order_id: order_id_ref,
            });
        };

        let new_index = self.bucket_index(new_price)?;
        let old_index = self.bucket_index(order.price)?;

        self.buckets[old_index].remove(&order_id_ref);
        self.buckets[new_index].insert(order_id_ref);

        if let Some(stored) = self.orders.get_mut(&order_id_ref) {
            stored.price = new_price;
            stored.size = new_size;
        }
        trace!(order_id = %order_id_ref, new_price, new_size, "modified order");
        Ok(())
    }

    /// Remove a resting order from both indices.
    pub fn delete_order(&mut self, order_id_ref: OrderId) -> Result<(), BookError> {
        let Some(order) = self.orders.remove(&order_id_ref) else {
            warn!(order_id = %order_id_ref, "delete referenced unknown order");
            return Err(BookError::UnknownOrder {
                order_id: order_id_ref,
            });
        };
        if let Ok(index) = self.bucket_index(order.price) {
            self.buckets[index].remove(&order_id_ref);
        }
        trace!(order_id = %order_id_ref, "deleted order");
        Ok(())
    }

    /// Apply a (partial) execution against a resting order.
    ///
    /// # Errors
    /// - [`BookError::UnknownOrder`] if the order is absent.
    /// - [`BookError::SideInconsistentExecution`] if `exec_price` is on the
    ///   wrong side of the resting order's price.
    /// - [`BookError::OverExecution`] if `exec_size` exceeds the order's
    ///   remaining size.
    pub fn execute_order(
        &mut self,
        order_id_ref: OrderId,
        exec_price: f64,
        exec_size: u64,
    ) -> Result<(), BookError> {
        let Some(order) = self.orders.get(&order_id_ref).copied() else {
            warn!(order_id = %order_id_ref, "execute referenced unknown order");
            return Err(BookError::UnknownOrder {
                order_id: order_id_ref,
            });
        };

        let side_consistent = match order.side {
            Side::Buy => exec_price >= order.price,
            Side::Sell => exec_price <= order.price,
        };
        if !side_consistent {
            warn!(order_id = %order_id_ref, "side-inconsistent execution rejected");
            return Err(BookError::SideInconsistentExecution {
                order_id: order_id_ref,
                side: order.side,
                order_price: order.price,
                exec_price,
            });
        }

        if exec_size > order.size {
            warn!(order_id = %order_id_ref, "over-execution rejected");
            return Err(BookError::OverExecution {
                order_id: order_id_ref,
                order_size: order.size,
                exec_size,
            });
        }

        let remaining = order.size - exec_size;
        if remaining == 0 {
            self.delete_order(order_id_ref)?;
        } else if let Some(stored) = self.orders.get_mut(&order_id_ref) {
            stored.size = remaining;
            trace!(order_id = %order_id_ref, remaining, "partial execution");
        }
        Ok(())
    }

    /// Settle a trade report against the first qualifying resting order.
    ///
    /// A Buy order qualifies if `order.price <= price`; a Sell order
    /// qualifies if `order.price >= price`; either way the order must be
    /// able to absorb the full `size`. Only the first qualifying order is
    /// consumed (spec §4.C, §9: scan-linear matching is the source's
    /// choice and is preserved). Tie-breaking among multiple qualifying
    /// orders at the same price is unspecified.
    pub fn handle_trade(&mut self, price: f64, size: u64) -> Result<(), BookError> {
        let candidate = self.buckets.iter().flatten().find_map(|order_id| {
            let order = self.orders.get(order_id)?;
            let qualifies = match order.side {
                Side::Buy => order.price <= price,
                Side::Sell => order.price >= price,
            };
            (qualifies && order.size >= size).then_some(*order_id)
        });

        let Some(order_id) = candidate else {
            warn!(price, size, "no matching order found for trade report");
            return Err(BookError::NoMatchingOrder { price, size });
        };

        let order = *self.orders.get(&order_id).expect("candidate just found");
        let remaining = order.size - size;
        if remaining == 0 {
            self.delete_order(order_id)?;
        } else if let Some(stored) = self.orders.get_mut(&order_id) {
            stored.size = remaining;
        }
        trace!(%order_id, price, size, "trade settled");
        Ok(())
    }

    /// True if `order_id` currently rests in the book.
    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// A copy of the order currently stored under `order_id`, if present.
    pub fn get_order(&self, order_id: OrderId) -> Option<Order> {
        self.orders.get(&order_id).copied()
    }

    /// Number of resting orders.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// The set of order ids present in the order map (for invariant checks).
    pub fn order_ids(&self) -> HashSet<OrderId> {
        self.orders.keys().copied().collect()
    }

    /// The union of order ids across every bucket (for invariant checks).
    pub fn bucketed_order_ids(&self) -> HashSet<OrderId> {
        self.buckets.iter().flatten().copied().collect()
    }

    /// Write a human-readable rendering of non-empty price levels to `sink`.
    pub fn print_book(&self, sink: &mut impl std::fmt::Write) -> std::fmt::Result {
        writeln!(sink, "Current Order Book:")?;
        for (i, bucket) in self.buckets.iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let level_price = self.min_price + i as f64 * self.price_increment;
            write!(sink, "Price Level {level_price}: ")?;
            for order_id in bucket {
                if let Some(order) = self.orders.get(order_id) {
                    write!(
                        sink,
                        "[ID: {}, Size: {}, Side: {}] ",
                        order.order_id, order.size, order.side
                    )?;
                }
            }
            writeln!(sink)?;
        }
        Ok(())
    }
}
