//! Minimal demonstration of driving a [`BookRegistry`] over a literal
//! in-memory message stream and printing the resulting BBO.
//!
//! A real deployment would source `Message`s from a PCAP/wire decoder
//! that sorts them by timestamp before handing them to the registry; that
//! decoder is outside this crate's scope, so this demo builds the stream
//! by hand.

use iex_book_core::prelude::*;

fn header(symbol: &str, timestamp: u64) -> MessageHeader {
    MessageHeader {
        timestamp,
        symbol: symbol.to_string(),
    }
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let mut registry = BookRegistry::new(L3BookConfig {
        num_price_levels: 100_010,
        min_price: 0.0,
        max_price: 1_000.0,
        price_increment: 0.01,
    });

    let messages = vec![
        Message::PriceLevelUpdate {
            header: header("AAPL", 1),
            side: Side::Buy,
            price: 150.0,
            size: 100,
            flags: 1,
        },
        Message::PriceLevelUpdate {
            header: header("AAPL", 2),
            side: Side::Sell,
            price: 155.0,
            size: 50,
            flags: 1,
        },
        Message::AddOrder {
            header: header("AAPL", 3),
            order_id: OrderId(1),
            side: Side::Buy,
            price: 150.0,
            size: 10,
        },
    ];

    registry.process_stream(messages);

    let mut out = String::new();
    if let Some(l2) = registry.l2_book("AAPL") {
        l2.print_bbo(&mut out).unwrap();
        println!("{out}");
        println!("book pressure: {:.4}", l2.book_pressure());
    }

    if let Some(l3) = registry.l3_book("AAPL") {
        println!("resting L3 orders: {}", l3.order_count());
    }
}
