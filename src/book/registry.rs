//! Book Registry: maps a symbol to its L2 and/or L3 book instance(s) and
//! routes each inbound message to the right book, creating books lazily on
//! first sight of a symbol.

use std::collections::HashMap;

use tracing::info;

use crate::message::Message;

use super::error::BookError;
use super::l2::L2Book;
use super::l3::L3Book;

/// Parameters used to lazily construct an [`L3Book`] the first time a
/// symbol needs one.
///
/// This resolves the open question left by the spec (§4.D): L3 construction
/// needs four parameters that have no natural per-message source, so the
/// registry is configured with one parameter set applied to every symbol it
/// creates an L3 book for, mirroring how a real deployment would configure
/// a single price-range/tick-size policy venue-wide rather than
/// per-symbol (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct L3BookConfig {
    /// Number of price-level buckets.
    pub num_price_levels: usize,
    /// Minimum valid price.
    pub min_price: f64,
    /// Maximum valid price.
    pub max_price: f64,
    /// Price increment between buckets.
    pub price_increment: f64,
}

/// The L2 and/or L3 book state held for one symbol.
///
/// A symbol carries only the book types it has actually needed messages
/// for: an L3-only feed never pays for an L2 book it never populates, and
/// vice versa.
#[derive(Debug, Default)]
pub struct SymbolBooks {
    /// The symbol's price-aggregated book, if any L2 message has been seen.
    pub l2: Option<L2Book>,
    /// The symbol's per-order book, if any L3 message has been seen.
    pub l3: Option<L3Book>,
}

/// Maps symbols to their book state and dispatches inbound messages.
///
/// Not thread-shared (spec §5): a hosting application that wants to
/// parallelize across symbols must shard by symbol itself.
#[derive(Debug)]
pub struct BookRegistry {
    books: HashMap<String, SymbolBooks>,
    l3_config: Option<L3BookConfig>,
}

impl BookRegistry {
    /// Construct a registry that only maintains L2 books; any `AddOrder`,
    /// `OrderModify`, `OrderDelete`, `OrderExecuted`, or `TradeReport`
    /// message is ignored for lack of an L3 configuration.
    pub fn new_l2_only() -> Self {
        BookRegistry {
            books: HashMap::new(),
            l3_config: None,
        }
    }

    /// Construct a registry that maintains both L2 and L3 books, creating
    /// L3 books with `l3_config` the first time a symbol needs one.
    pub fn new(l3_config: L3BookConfig) -> Self {
        BookRegistry {
            books: HashMap::new(),
            l3_config: Some(l3_config),
        }
    }

    /// Look up a symbol's book state, creating it on first sight.
    fn entry(&mut self, symbol: &str) -> &mut SymbolBooks {
        if !self.books.contains_key(symbol) {
            info!(symbol, "registering new symbol");
            self.books.insert(symbol.to_string(), SymbolBooks::default());
        }
        self.books.get_mut(symbol).expect("just inserted")
    }

    /// Route one message to the right book(s) for its symbol, creating
    /// book state on first sight of the symbol.
    pub fn process(&mut self, msg: &Message) -> Result<(), BookError> {
        let symbol = msg.symbol().to_string();
        let l3_config = self.l3_config;
        let entry = self.entry(&symbol);

        let is_price_level_update = matches!(msg, Message::PriceLevelUpdate { .. });

        let l2_result = if is_price_level_update {
            let book = entry.l2.get_or_insert_with(L2Book::new);
            Some(book.process(msg))
        } else {
            None
        };

        let l3_result = if !is_price_level_update {
            match (&mut entry.l3, l3_config) {
                (Some(book), _) => Some(book.process(msg)),
                (None, Some(config)) => {
                    let mut book = L3Book::new(
                        config.num_price_levels,
                        config.min_price,
                        config.max_price,
                        config.price_increment,
                    )?;
                    let result = book.process(msg);
                    entry.l3 = Some(book);
                    Some(result)
                }
                (None, None) => None,
            }
        } else {
            None
        };

        l2_result.transpose()?;
        l3_result.transpose()?;
        Ok(())
    }

    /// Consume an iterator of messages in order, processing each in turn.
    /// Errors on individual messages are logged by the underlying book and
    /// do not stop the stream; only the final message's result (if any) is
    /// discarded along with every prior per-message error, matching the
    /// "report, drop, continue" policy (spec §7) at the registry's own
    /// boundary.
    pub fn process_stream(&mut self, messages: impl IntoIterator<Item = Message>) {
        for msg in messages {
            let _ = self.process(&msg);
        }
    }

    /// Access the L2 book for a symbol, if one has been created.
    pub fn l2_book(&self, symbol: &str) -> Option<&L2Book> {
        self.books.get(symbol).and_then(|b| b.l2.as_ref())
    }

    /// Access the L3 book for a symbol, if one has been created.
    pub fn l3_book(&self, symbol: &str) -> Option<&L3Book> {
        self.books.get(symbol).and_then(|b| b.l3.as_ref())
    }

    /// True if a book (of either kind) exists for `symbol`.
    pub fn has_symbol(&self, symbol: &str) -> bool {
        self.books.contains_key(symbol)
    }

    /// The number of distinct symbols registered.
    pub fn symbol_count(&self) -> usize {
        self.books.len()
    }
}
