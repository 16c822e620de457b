use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Number of decimal places every monetary value is stored with.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds a monetary value to 2 decimal places.
///
/// Midpoints round away from zero (`2.005` becomes `2.01`), which is what a
/// front end formatting with two fixed digits shows to the user.
pub fn normalize(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts an annual percentage (e.g. 3.8 for 3.8%) into the nominal monthly
/// rate as a decimal factor (`3.8 / 12 / 100`).
pub fn normalize_annual_rate(annual_percentage: Decimal) -> Decimal {
    annual_percentage / dec!(12) / dec!(100)
}
