//! Rank-tracking price arithmetic.

/// Listing prices deviating from the live price by more than this many
/// percent mean the listing has not caught up with the chain yet.
pub const STALENESS_TOLERANCE_PERCENT: f64 = 0.1;

/// Price multiplier per rank of distance to the target.
pub const RANK_STEP_FACTOR: f64 = 0.99;

/// Relative deviation of `reported` from `live`, in percent.
///
/// `500` vs `505` is roughly a 1% delta. A zero live price yields infinity.
#[must_use]
pub fn percentage_delta(reported: f64, live: f64) -> f64 {
    if live == 0.0 {
        return f64::INFINITY;
    }
    (1.0 - reported / live).abs() * 100.0
}

#[must_use]
pub fn is_stale(reported: f64, live: f64) -> bool {
    percentage_delta(reported, live) > STALENESS_TOLERANCE_PERCENT
}

/// New storage price and collateral, in coins per terabyte per month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceAdjustment {
    pub rank_delta: i64,
    pub price: f64,
    pub collateral: f64,
}

/// Move the price one step per rank towards the target.
///
/// A positive delta (target rank above the actual one) lowers the price,
/// a negative delta raises it. The price never drops below `minimum_price`.
#[must_use]
pub fn adjust_for_rank_delta(
    current_price: f64,
    rank_delta: i64,
    minimum_price: f64,
    collateral_factor: f64,
) -> PriceAdjustment {
    let exponent = i32::try_from(rank_delta).unwrap_or(if rank_delta > 0 { i32::MAX } else { i32::MIN });
    let price = (current_price * RANK_STEP_FACTOR.powi(exponent)).max(minimum_price);
    PriceAdjustment {
        rank_delta,
        price,
        collateral: price * collateral_factor,
    }
}
