//! Month-by-month amortization with extra payments and the parallel
//! investment projection merged into every row.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MortgageError;
use crate::extra_payment::{empty_timeline, ExtraPaymentMonth, ExtraPaymentSpec};
use crate::investment::project_investment_growth;
use crate::normalize::{normalize, normalize_annual_rate};

/// Loan terms for one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageTerms {
    /// The borrowed amount.
    pub principal_loan_amount: Decimal,
    /// Loan term in years; the schedule has `loan_term_years * 12` payments.
    pub loan_term_years: u32,
    /// Annual interest rate as a percentage (e.g., 3.8 for 3.8%).
    pub annual_interest_rate: Decimal,
    /// Annualized return on invested extra payments, as a percentage.
    #[serde(default)]
    pub investment_return_rate: Decimal,
    /// Absent means no extra payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_payment: Option<ExtraPaymentSpec>,
}

impl MortgageTerms {
    /// Parses terms from the JSON the web front end submits.
    pub fn from_json(json: &str) -> Result<Self, MortgageError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn number_of_payments(&self) -> u32 {
        self.loan_term_years.saturating_mul(12)
    }

    pub fn monthly_interest_rate(&self) -> Decimal {
        normalize_annual_rate(self.annual_interest_rate)
    }

    /// Expands the extra-payment specification, or an empty timeline when there is none.
    pub fn extra_payment_timeline(&self) -> Vec<ExtraPaymentMonth> {
        match &self.extra_payment {
            Some(spec) => spec.expand(self.number_of_payments()),
            None => empty_timeline(self.number_of_payments()),
        }
    }
}

/// One processed month of the schedule. All amounts are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentScheduleRow {
    /// One-based payment number.
    pub payment_number: u32,
    pub starting_balance: Decimal,
    /// The fixed monthly installment.
    pub payment_amount: Decimal,
    /// Scheduled principal portion of the installment.
    pub principal_paid: Decimal,
    /// Total extra payment for the month, before the split.
    pub extra_payment: Decimal,
    pub extra_payment_to_principal: Decimal,
    /// `principal_paid + extra_payment_to_principal`.
    pub total_principal_paid: Decimal,
    pub interest_paid: Decimal,
    pub remaining_balance: Decimal,
    /// This month's amount routed to investment.
    pub investment_contribution: Decimal,
    /// Cumulative compounded investment value through this month.
    pub investment_growth: Decimal,
}

/// Full schedule plus lifetime totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationResult {
    pub schedule: Vec<PaymentScheduleRow>,
    /// Principal plus total interest.
    pub total_paid: Decimal,
    pub total_interest: Decimal,
    /// Investment value at the end of the nominal term.
    pub total_investment_earned: Decimal,
}

/// Fixed monthly installment.
///
/// Annuity formula: PMT = P * [r(1 + r)^n] / [(1 + r)^n – 1]
///
/// A zero rate degenerates to straight-line `P / n`. If `(1 + r)^n` does not
/// fit in a `Decimal` the installment is the interest-only limit `P * r`.
pub fn monthly_installment(
    principal: Decimal,
    monthly_rate: Decimal,
    number_of_payments: u32,
) -> Decimal {
    if number_of_payments == 0 {
        return Decimal::ZERO;
    }
    let straight_line = principal / Decimal::from(number_of_payments);
    if monthly_rate.is_zero() {
        return straight_line;
    }

    let growth_factor = Decimal::ONE + monthly_rate;
    let Some(compound) = growth_factor.checked_powu(number_of_payments.into()) else {
        return principal * monthly_rate;
    };
    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return straight_line;
    }

    principal * monthly_rate * (compound / denominator)
}

/// Computes the amortization schedule for `terms` with the given extra-payment timeline.
///
/// The timeline is indexed by position: entry `m` applies to month `m`.
/// Missing trailing months count as no extra payment and entries past the
/// term are ignored. The schedule stops early once the balance reaches zero.
///
/// A zero principal or a zero-year term yields an empty schedule and zero totals.
pub fn compute_amortization_schedule(
    terms: &MortgageTerms,
    extra_payments: &[ExtraPaymentMonth],
) -> AmortizationResult {
    let number_of_payments = terms.number_of_payments();
    if number_of_payments == 0 || terms.principal_loan_amount <= Decimal::ZERO {
        debug!("degenerate loan terms, returning an empty schedule");
        return AmortizationResult::default();
    }

    let timeline: Vec<ExtraPaymentMonth> = (0..number_of_payments)
        .map(|month| {
            extra_payments
                .get(month as usize)
                .copied()
                .unwrap_or_else(|| ExtraPaymentMonth::empty(month))
        })
        .collect();
    let investment_growth = project_investment_growth(terms.investment_return_rate, &timeline);

    let monthly_rate = terms.monthly_interest_rate();
    let payment_amount =
        monthly_installment(terms.principal_loan_amount, monthly_rate, number_of_payments);

    debug!(
        principal = %terms.principal_loan_amount,
        annual_interest_rate = %terms.annual_interest_rate,
        number_of_payments,
        payment_amount = %payment_amount,
        "computing amortization schedule"
    );

    let mut remaining_balance = terms.principal_loan_amount;
    let mut total_interest = Decimal::ZERO;
    let mut schedule = Vec::with_capacity(number_of_payments as usize);

    let months = timeline.iter().zip(investment_growth.iter()).zip(1u32..);
    for ((extra, growth), payment_number) in months {
        if remaining_balance <= Decimal::ZERO {
            break;
        }

        let starting_balance = remaining_balance;
        let interest_paid = remaining_balance * monthly_rate;
        let principal_paid = (payment_amount - interest_paid)
            .max(Decimal::ZERO)
            .min(remaining_balance);

        // pay off exactly: the extra portion gives way before the scheduled one
        let mut extra_to_principal = extra.to_principal();
        if principal_paid + extra_to_principal > remaining_balance {
            extra_to_principal = remaining_balance - principal_paid;
        }
        let total_principal_paid = principal_paid + extra_to_principal;

        remaining_balance -= total_principal_paid;
        total_interest += interest_paid;

        schedule.push(PaymentScheduleRow {
            payment_number,
            starting_balance: normalize(starting_balance),
            payment_amount: normalize(payment_amount),
            principal_paid: normalize(principal_paid),
            extra_payment: normalize(extra.amount),
            extra_payment_to_principal: normalize(extra_to_principal),
            total_principal_paid: normalize(total_principal_paid),
            interest_paid: normalize(interest_paid),
            remaining_balance: normalize(remaining_balance),
            investment_contribution: normalize(extra.to_investment()),
            investment_growth: *growth,
        });
    }

    let total_interest = normalize(total_interest);
    let total_investment_earned = investment_growth.last().copied().unwrap_or_default();

    debug!(
        payments = schedule.len(),
        total_interest = %total_interest,
        "amortization schedule complete"
    );

    AmortizationResult {
        schedule,
        total_paid: normalize(terms.principal_loan_amount + total_interest),
        total_interest,
        total_investment_earned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use crate::extra_payment::{BasicExtraPayment, IncrementFrequency};

    fn terms(
        principal: Decimal,
        annual_interest_rate: Decimal,
        loan_term_years: u32,
    ) -> MortgageTerms {
        MortgageTerms {
            principal_loan_amount: principal,
            loan_term_years,
            annual_interest_rate,
            investment_return_rate: Decimal::ZERO,
            extra_payment: None,
        }
    }

    fn constant_extra(
        amount: Decimal,
        split_ratio: Decimal,
        months: u32,
    ) -> Vec<ExtraPaymentMonth> {
        (0..months)
            .map(|month| ExtraPaymentMonth { month, amount, split_ratio })
            .collect()
    }

    #[test]
    fn test_one_year_loan() {
        let result = compute_amortization_schedule(&terms(dec!(100000), dec!(6), 1), &[]);

        assert_eq!(result.schedule.len(), 12);
        assert_eq!(result.schedule[0].payment_amount, dec!(8606.64));
        assert_eq!(result.schedule[0].interest_paid, dec!(500.00));
        assert_eq!(result.schedule[0].principal_paid, dec!(8106.64));
        assert_eq!(result.schedule[0].remaining_balance, dec!(91893.36));
        assert_eq!(result.schedule[11].remaining_balance, dec!(0.00));
        assert_eq!(result.total_interest, dec!(3279.72));
        assert_eq!(result.total_paid, dec!(103279.72));
        assert_eq!(result.total_investment_earned, Decimal::ZERO);
    }

    #[test]
    fn test_long_loan_has_constant_installment() {
        let result = compute_amortization_schedule(&terms(dec!(480000), dec!(3.8), 35), &[]);

        assert_eq!(result.schedule.len(), 420);
        assert!(result.schedule.iter().all(|row| row.payment_amount == dec!(2068.12)));

        // independent PMT evaluation in floating point
        let r = 3.8_f64 / 12.0 / 100.0;
        let growth = (1.0 + r).powi(420);
        let pmt = 480000.0 * r * growth / (growth - 1.0);
        assert!((pmt - 2068.12).abs() < 0.005);

        assert_eq!(result.total_interest, dec!(388611.16));
        assert_eq!(result.schedule[419].remaining_balance, dec!(0.00));
    }

    #[test]
    fn test_zero_interest_rate() {
        let result = compute_amortization_schedule(&terms(dec!(120000), dec!(0), 10), &[]);

        assert_eq!(result.schedule.len(), 120);
        for row in &result.schedule {
            assert_eq!(row.payment_amount, dec!(1000.00));
            assert_eq!(row.interest_paid, Decimal::ZERO);
        }
        assert_eq!(result.total_interest, Decimal::ZERO);
        assert_eq!(result.total_paid, dec!(120000));
        assert_eq!(result.schedule[119].remaining_balance, Decimal::ZERO);
    }

    #[rstest]
    #[case(dec!(0), 30)]
    #[case(dec!(250000), 0)]
    fn test_degenerate_terms_are_empty(#[case] principal: Decimal, #[case] years: u32) {
        let result = compute_amortization_schedule(&terms(principal, dec!(5), years), &[]);

        assert_eq!(result, AmortizationResult::default());
    }

    #[test]
    fn test_extra_payments_pay_off_early() {
        let extras = constant_extra(dec!(500), dec!(1), 120);
        let result = compute_amortization_schedule(&terms(dec!(100000), dec!(6), 10), &extras);

        assert_eq!(result.schedule.len(), 75);
        let last = result.schedule.last().unwrap();
        assert_eq!(last.remaining_balance, Decimal::ZERO);
        assert_eq!(last.principal_paid, dec!(880.78));
        assert_eq!(last.extra_payment_to_principal, dec!(0.00));
        assert_eq!(result.total_interest, dec!(20040.36));
    }

    #[test]
    fn test_overshooting_extra_is_reduced() {
        // a single huge extra payment in month 0 clears the loan at once
        let mut extras = empty_timeline(12);
        extras[0] = ExtraPaymentMonth { month: 0, amount: dec!(50000), split_ratio: dec!(1) };
        let result = compute_amortization_schedule(&terms(dec!(10000), dec!(12), 1), &extras);

        assert_eq!(result.schedule.len(), 1);
        let row = &result.schedule[0];
        assert_eq!(row.total_principal_paid, dec!(10000.00));
        assert_eq!(row.principal_paid + row.extra_payment_to_principal, dec!(10000.00));
        assert_eq!(row.extra_payment, dec!(50000.00));
        assert_eq!(row.remaining_balance, Decimal::ZERO);
        assert_eq!(result.total_interest, dec!(100.00));
    }

    #[test]
    fn test_split_feeds_investment() {
        let mut loan = terms(dec!(200000), dec!(5), 30);
        loan.investment_return_rate = dec!(7);
        let extras = constant_extra(dec!(400), dec!(0.5), 360);
        let result = compute_amortization_schedule(&loan, &extras);

        let first = &result.schedule[0];
        assert_eq!(first.extra_payment_to_principal, dec!(200.00));
        assert_eq!(first.investment_contribution, dec!(200.00));
        assert_eq!(first.investment_growth, dec!(200.00));
        assert_eq!(first.total_principal_paid, first.principal_paid + dec!(200.00));

        assert_eq!(result.schedule.len(), 256);
        assert_eq!(result.schedule.last().unwrap().investment_growth, dec!(117690.41));
        assert_eq!(result.total_investment_earned, dec!(243994.20));
        assert_eq!(result.total_interest, dec!(125351.06));
    }

    #[test]
    fn test_short_timeline_is_padded() {
        let loan = terms(dec!(50000), dec!(4), 5);
        let padded = compute_amortization_schedule(&loan, &empty_timeline(60));
        let missing = compute_amortization_schedule(&loan, &[]);

        assert_eq!(padded, missing);
    }

    #[test]
    fn test_terms_expand_their_own_spec() {
        let mut loan = terms(dec!(100000), dec!(6), 10);
        loan.extra_payment = Some(ExtraPaymentSpec::Basic(BasicExtraPayment {
            amount: dec!(500),
            increment: Decimal::ZERO,
            increment_frequency: IncrementFrequency::Yearly,
            start_month: 0,
            end_month: None,
            split_ratio: dec!(1),
        }));
        let timeline = loan.extra_payment_timeline();

        assert_eq!(timeline.len(), 120);
        let result = compute_amortization_schedule(&loan, &timeline);
        assert_eq!(result.schedule.len(), 75);
    }

    #[test]
    fn test_monthly_installment() {
        assert_eq!(monthly_installment(dec!(1000), dec!(0.01), 0), Decimal::ZERO);
        assert_eq!(monthly_installment(dec!(1200), Decimal::ZERO, 12), dec!(100));
        assert_eq!(normalize(monthly_installment(dec!(12000), dec!(0.01), 12)), dec!(1066.19));
    }

    #[test]
    fn test_terms_from_json() {
        let loan = MortgageTerms::from_json(
            r#"{"principalLoanAmount":480000,"loanTermYears":35,"annualInterestRate":3.8,"investmentReturnRate":7}"#,
        )
        .unwrap();

        assert_eq!(loan.number_of_payments(), 420);
        assert_eq!(loan.extra_payment, None);
        assert!(matches!(
            MortgageTerms::from_json("{}"),
            Err(MortgageError::Serialization(_))
        ));
    }

    proptest! {
        #[test]
        fn balance_never_increases_or_goes_negative(
            principal in 1_000u32..2_000_000,
            rate_bps in 0u32..1_500,
            years in 1u32..40,
            extra in 0u32..3_000,
            split_pct in 0u32..=100,
        ) {
            let loan = terms(Decimal::from(principal), Decimal::new(rate_bps.into(), 2), years);
            let split_ratio = Decimal::new(split_pct.into(), 2);
            let extras = constant_extra(Decimal::from(extra), split_ratio, years * 12);
            let result = compute_amortization_schedule(&loan, &extras);

            let mut previous = loan.principal_loan_amount;
            for row in &result.schedule {
                prop_assert!(row.remaining_balance >= Decimal::ZERO);
                prop_assert!(row.remaining_balance <= previous);
                previous = row.remaining_balance;
            }
            let expected_total = normalize(loan.principal_loan_amount + result.total_interest);
            prop_assert_eq!(result.total_paid, expected_total);
        }

        #[test]
        fn schedule_length_without_extras(
            principal in 1_000u32..2_000_000,
            rate_bps in 0u32..1_500,
            years in 1u32..40,
        ) {
            let loan = terms(Decimal::from(principal), Decimal::new(rate_bps.into(), 2), years);
            let result = compute_amortization_schedule(&loan, &[]);
            let last = result.schedule.last().unwrap();

            prop_assert_eq!(result.schedule.len(), (years * 12) as usize);
            prop_assert_eq!(last.remaining_balance, Decimal::ZERO);
        }
    }
}
