use rust_decimal::Decimal;

use crate::extra_payment::ExtraPaymentMonth;
use crate::normalize::{normalize, normalize_annual_rate};

/// Projects the cumulative value of the invested share of each extra payment.
///
/// Every month's contribution (`amount * (1 - split_ratio)`) compounds monthly
/// from the month it is made. The value at month `n` is
/// `Σ contribution[k] * (1 + r)^(n - k)` for `k <= n`, evaluated with the
/// running recurrence `growth[n] = growth[n - 1] * (1 + r) + contribution[n]`.
///
/// The recurrence runs at full precision; only the returned values are
/// normalized. The output has one value per timeline entry.
///
/// A value that no longer fits in a `Decimal` saturates at `Decimal::MAX`.
pub fn project_investment_growth(
    investment_return_rate: Decimal,
    timeline: &[ExtraPaymentMonth],
) -> Vec<Decimal> {
    let growth_factor = Decimal::ONE + normalize_annual_rate(investment_return_rate);
    let mut value = Decimal::ZERO;

    timeline
        .iter()
        .map(|month| {
            value = value
                .checked_mul(growth_factor)
                .and_then(|grown| grown.checked_add(month.to_investment()))
                .unwrap_or(Decimal::MAX);
            normalize(value)
        })
        .collect()
}
