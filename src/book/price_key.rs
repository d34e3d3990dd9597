//! Total-order key wrapper for `f64` prices.
//!
//! Prices in this crate are plain `f64` (the spec's literal scenario values
//! are written as decimals, e.g. `25.10`, `150.0`), but `f64` does not
//! implement `Ord`, so it cannot key a `BTreeMap` directly. `PriceKey` wraps
//! a price and implements total order via `f64::total_cmp`, which agrees
//! with numeric order for every finite, non-NaN price this crate ever
//! produces or accepts.

use std::cmp::Ordering;

/// An orderable wrapper around a price, for use as a `BTreeMap` key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceKey(pub f64);

impl Eq for PriceKey {}

impl PartialOrd for PriceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for PriceKey {
    fn from(price: f64) -> Self {
        PriceKey(price)
    }
}

impl From<PriceKey> for f64 {
    fn from(key: PriceKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_numerically_for_finite_prices() {
        let mut prices: Vec<PriceKey> = vec![25.30.into(), 25.10.into(), 25.20.into()];
        prices.sort();
        let values: Vec<f64> = prices.into_iter().map(f64::from).collect();
        assert_eq!(values, vec![25.10, 25.20, 25.30]);
    }
}
