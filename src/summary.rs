use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationResult, MortgageTerms, PaymentScheduleRow};

/// First month in which the invested extra payments could pay off the remaining balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossoverPoint {
    pub payment_number: u32,
    /// One-based loan year.
    pub year: u32,
    /// One-based month within that year.
    pub month_of_year: u32,
}

/// Figures derived from a computed schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageSummary {
    /// Number of payments actually made.
    pub payoff_months: u32,
    /// Loan year in which the last payment falls.
    pub payoff_years: u32,
    /// Nominal payments that were never needed.
    pub months_saved: u32,
    /// Investment value at the last scheduled payment.
    pub investment_at_payoff: Decimal,
    /// Investment value over the nominal term minus total interest paid.
    pub net_profit: Decimal,
    pub crossover: Option<CrossoverPoint>,
}

/// Finds the first row where the investment value reaches the remaining balance.
///
/// Rows with nothing invested yet never count, so a loan without investment
/// has no crossover even though its final balance is zero.
pub fn crossover_point(schedule: &[PaymentScheduleRow]) -> Option<CrossoverPoint> {
    let row = schedule.iter().find(|row| {
        row.investment_growth > Decimal::ZERO && row.investment_growth >= row.remaining_balance
    })?;
    let index = row.payment_number.saturating_sub(1);

    Some(CrossoverPoint {
        payment_number: row.payment_number,
        year: index / 12 + 1,
        month_of_year: index % 12 + 1,
    })
}

/// Derives payoff horizon, net profit and crossover from a computed schedule.
pub fn summarize(terms: &MortgageTerms, result: &AmortizationResult) -> MortgageSummary {
    let payoff_months = result.schedule.len() as u32;

    MortgageSummary {
        payoff_months,
        payoff_years: payoff_months.div_ceil(12),
        months_saved: terms.number_of_payments().saturating_sub(payoff_months),
        investment_at_payoff: result
            .schedule
            .last()
            .map(|row| row.investment_growth)
            .unwrap_or_default(),
        net_profit: result.total_investment_earned - result.total_interest,
        crossover: crossover_point(&result.schedule),
    }
}
