//! Prelude module that re-exports the commonly used types.
//!
//! ```rust
//! use iex_book_core::prelude::*;
//! ```

pub use crate::book::{Bbo, BookError, BookRegistry, L2Book, L3Book, L3BookConfig, Order};
pub use crate::message::{
    Message, MessageHeader, ModifyFlags, OrderId, SaleConditionFlags, Side, is_terminal,
};
