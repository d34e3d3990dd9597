//! Scenario-level integration tests, drawn literally from the specification
//! (S1-S6) plus the universal invariants it lists alongside them.

use iex_book_core::prelude::*;

fn header(symbol: &str) -> MessageHeader {
    MessageHeader {
        timestamp: 0,
        symbol: symbol.to_string(),
    }
}

fn plu(side: Side, price: f64, size: u64, flags: u8) -> Message {
    Message::PriceLevelUpdate {
        header: header("TEST"),
        side,
        price,
        size,
        flags,
    }
}

/// S1 - Atomic transition hides intermediate cross.
#[test]
fn s1_atomic_transition_hides_intermediate_cross() {
    let mut book = L2Book::new();

    // Seed the initial ladders with standalone terminal updates.
    for (price, size) in [(25.00, 100u64), (24.90, 100)] {
        book.process(&plu(Side::Buy, price, size, 1)).unwrap();
    }
    for (price, size) in [(25.30, 100u64), (25.20, 100), (25.10, 100)] {
        book.process(&plu(Side::Sell, price, size, 1)).unwrap();
    }

    let initial = book.get_bbo().unwrap();
    assert_eq!(initial.bid_price(), 25.00);
    assert_eq!(initial.ask_price(), 25.10);

    // Intermediate: remove 25.10 but don't republish yet.
    book.process(&plu(Side::Sell, 25.10, 0, 0)).unwrap();
    let mid = book.get_bbo().unwrap();
    assert_eq!(mid.bid_price(), 25.00);
    assert_eq!(mid.ask_price(), 25.10);

    // Terminal: remove 25.20 too, then apply the whole batch and republish.
    book.process(&plu(Side::Sell, 25.20, 0, 1)).unwrap();
    let final_bbo = book.get_bbo().unwrap();
    assert_eq!(final_bbo.bid_price(), 25.00);
    assert_eq!(final_bbo.ask_price(), 25.30);
}

/// S2 - Pressure.
#[test]
fn s2_pressure() {
    let mut book = L2Book::new();
    book.process(&plu(Side::Buy, 150.0, 100, 1)).unwrap();
    book.process(&plu(Side::Sell, 155.0, 50, 1)).unwrap();

    let pressure = book.book_pressure();
    assert!((pressure - 1.0 / 3.0).abs() < 1e-9);
}

/// S3 - Empty BBO diagnostic.
#[test]
fn s3_empty_bbo_diagnostic() {
    let book = L2Book::new();
    let mut out = String::new();
    book.print_bbo(&mut out).unwrap();
    assert!(out.contains("No Best Bid or Offer available."));
}

/// S4 - Multiple sequential updates with zero-size deletion.
#[test]
fn s4_sequential_updates_with_zero_size_deletion() {
    let mut book = L2Book::new();
    book.process(&plu(Side::Buy, 150.0, 100, 1)).unwrap();
    book.process(&plu(Side::Sell, 155.0, 50, 1)).unwrap();
    book.process(&plu(Side::Buy, 148.0, 200, 1)).unwrap();
    book.process(&plu(Side::Sell, 157.0, 0, 1)).unwrap();

    let bbo = book.get_bbo().unwrap();
    assert_eq!(bbo.bid_price(), 150.0);
    assert_eq!(bbo.bid_size(), 100);
    assert_eq!(bbo.ask_price(), 155.0);
    assert_eq!(bbo.ask_size(), 50);

    let mut rendered = String::new();
    book.print_book(&mut rendered).unwrap();
    assert!(!rendered.contains("157"));
}

/// S5 - Same-level overwrite.
#[test]
fn s5_same_level_overwrite() {
    let mut book = L2Book::new();
    book.process(&plu(Side::Buy, 150.0, 100, 1)).unwrap();
    book.process(&plu(Side::Buy, 150.0, 150, 1)).unwrap();
    book.process(&plu(Side::Sell, 155.0, 50, 1)).unwrap();
    book.process(&plu(Side::Sell, 155.0, 60, 1)).unwrap();

    let bbo = book.get_bbo().unwrap();
    assert_eq!(bbo.bid_price(), 150.0);
    assert_eq!(bbo.bid_size(), 150);
    assert_eq!(bbo.ask_price(), 155.0);
    assert_eq!(bbo.ask_size(), 60);
}

/// S6 - L3 execution flow.
#[test]
fn s6_l3_execution_flow() {
    let mut book = L3Book::new(100_010, 0.0, 1000.0, 0.01).unwrap();
    book.add_order(OrderId(1), Side::Buy, 100.0, 10).unwrap();

    book.execute_order(OrderId(1), 100.0, 4).unwrap();
    assert_eq!(book.get_order(OrderId(1)).unwrap().size, 6);

    book.execute_order(OrderId(1), 100.0, 6).unwrap();
    assert!(!book.contains_order(OrderId(1)));

    let err = book.delete_order(OrderId(1)).unwrap_err();
    assert!(matches!(err, BookError::UnknownOrder { .. }));
}

/// Invariant 1: every published BBO satisfies bid_price <= ask_price.
#[test]
fn invariant_published_bbo_never_crossed() {
    let mut book = L2Book::new();
    for (side, price, size) in [
        (Side::Buy, 100.0, 10u64),
        (Side::Sell, 101.0, 10),
        (Side::Buy, 100.5, 20),
        (Side::Sell, 100.8, 5),
    ] {
        book.process(&plu(side, price, size, 1)).unwrap();
        if let Some(bbo) = book.get_bbo() {
            assert!(bbo.bid_price() <= bbo.ask_price());
        }
    }
}

/// Invariant 3: order map and bucket union agree, and stay that way, after
/// a mixed sequence of operations.
#[test]
fn invariant_order_and_bucket_indices_stay_coherent() {
    let mut book = L3Book::new(100_010, 0.0, 1000.0, 0.01).unwrap();
    book.add_order(OrderId(1), Side::Buy, 100.0, 10).unwrap();
    book.add_order(OrderId(2), Side::Sell, 105.0, 5).unwrap();
    book.add_order(OrderId(3), Side::Buy, 99.0, 15).unwrap();

    book.modify_order(OrderId(1), 101.0, 12, ModifyFlags::ResetPriority)
        .unwrap();
    book.execute_order(OrderId(2), 105.0, 2).unwrap();
    book.handle_trade(99.0, 15).ok();

    assert_eq!(book.order_ids(), book.bucketed_order_ids());
}

/// Invariant 4: book pressure stays within [-1, 1] and is zero exactly when
/// the top-5 cumulative sums are equal.
#[test]
fn invariant_book_pressure_bounds_and_zero_condition() {
    let empty = L2Book::new();
    assert_eq!(empty.book_pressure(), 0.0);

    let mut balanced = L2Book::new();
    balanced.process(&plu(Side::Buy, 100.0, 50, 1)).unwrap();
    balanced.process(&plu(Side::Sell, 101.0, 50, 1)).unwrap();
    assert_eq!(balanced.book_pressure(), 0.0);

    let mut skewed = L2Book::new();
    skewed.process(&plu(Side::Buy, 100.0, 90, 1)).unwrap();
    skewed.process(&plu(Side::Sell, 101.0, 10, 1)).unwrap();
    let pressure = skewed.book_pressure();
    assert!((-1.0..=1.0).contains(&pressure));
    assert!(pressure > 0.0);
}

/// Invariant 6: applying a zero-size update to an empty ladder is a no-op.
#[test]
fn invariant_zero_size_update_on_empty_ladder_is_noop() {
    let mut book = L2Book::new();
    book.process(&plu(Side::Buy, 100.0, 0, 1)).unwrap();
    assert!(book.get_bbo().is_none());
}

/// Invariant 7: (price, size) followed by (price, 0) restores the ladder to
/// its prior state at that level.
#[test]
fn invariant_size_then_zero_restores_prior_state() {
    let mut book = L2Book::new();
    book.process(&plu(Side::Buy, 100.0, 100, 1)).unwrap();
    book.process(&plu(Side::Sell, 200.0, 50, 1)).unwrap();

    let mut before = String::new();
    book.print_book(&mut before).unwrap();
    let bbo_before = book.get_bbo();

    book.process(&plu(Side::Buy, 150.0, 30, 1)).unwrap();
    book.process(&plu(Side::Buy, 150.0, 0, 1)).unwrap();

    let mut after = String::new();
    book.print_book(&mut after).unwrap();
    let bbo_after = book.get_bbo();

    assert_eq!(before, after);
    assert_eq!(bbo_before, bbo_after);
}
