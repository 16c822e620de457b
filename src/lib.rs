//! `mortgage_projection` is a Rust library for mortgage amortization with extra payments.
//!
//! Every extra payment is split between two goals:
//! - **Principal**: paid on top of the fixed installment, shortening the loan.
//! - **Investment**: set aside every month and compounded at an annual return rate,
//!   tracked in parallel with the loan balance.
//!
//! Extra payments are described either as a single **Basic** rule (amount, periodic
//! increment, active window, split ratio) or as an ordered list of **Advance** blocks.
//! Both are expanded into the same one-entry-per-month timeline before the schedule
//! is computed.
//!
//! ## Usage
//!
//! Add `mortgage_projection` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mortgage_projection = "0.1.0"
//! rust_decimal = "1.39.0"
//! rust_decimal_macros = "1.39.0"
//! ```
//!
//! Then, use the `calculate_mortgage_projection` function to get the schedule, its
//! totals and a summary:
//!
//! ```rust
//! use mortgage_projection::{
//!     calculate_mortgage_projection, BasicExtraPayment, ExtraPaymentSpec, IncrementFrequency,
//!     MortgageTerms,
//! };
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let terms = MortgageTerms {
//!         principal_loan_amount: dec!(480_000),
//!         loan_term_years: 35,
//!         annual_interest_rate: dec!(3.8),
//!         investment_return_rate: dec!(7),
//!         extra_payment: Some(ExtraPaymentSpec::Basic(BasicExtraPayment {
//!             amount: dec!(200),
//!             increment: dec!(50),
//!             increment_frequency: IncrementFrequency::Yearly,
//!             start_month: 0,
//!             end_month: Some(120),
//!             split_ratio: dec!(0.5),
//!         })),
//!     };
//!
//!     match calculate_mortgage_projection(&terms) {
//!         Ok(projection) => {
//!             let totals = &projection.amortization;
//!             println!("Monthly Payment:   {:.2}", totals.schedule[0].payment_amount);
//!             println!("Total Paid:        {:.2}", totals.total_paid);
//!             println!("Total Interest:    {:.2}", totals.total_interest);
//!             println!("Investment Earned: {:.2}", totals.total_investment_earned);
//!             println!("Paid off after {} months", projection.summary.payoff_months);
//!         }
//!         Err(e) => {
//!             eprintln!("Error calculating mortgage projection: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod amortization;
pub mod error;
pub mod extra_payment;
pub mod investment;
pub mod normalize;
pub mod summary;
pub mod validation;

use serde::{Deserialize, Serialize};

pub use amortization::{
    compute_amortization_schedule, monthly_installment, AmortizationResult, MortgageTerms,
    PaymentScheduleRow,
};
pub use error::MortgageError;
pub use extra_payment::{
    expand_extra_payments, AdvanceExtraPayment, AdvancePaymentBlock, BasicExtraPayment,
    ExtraPaymentMonth, ExtraPaymentSpec, IncrementFrequency,
};
pub use investment::project_investment_growth;
pub use normalize::normalize;
pub use summary::{crossover_point, summarize, CrossoverPoint, MortgageSummary};
pub use validation::validate_terms;

/// Everything computed for one set of terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageProjection {
    /// The expanded extra payment for every month of the nominal term.
    pub extra_payments: Vec<ExtraPaymentMonth>,
    pub amortization: AmortizationResult,
    pub summary: MortgageSummary,
}

/// Validates the terms, expands their extra payments and computes the schedule.
///
/// This is the main entry point of the library. Callers that validate input
/// themselves can use `expand_extra_payments` and `compute_amortization_schedule`
/// directly; neither of them fails.
///
/// # Errors
///
/// Returns an error if the terms fail validation (see `validation::validate_terms`).
pub fn calculate_mortgage_projection(
    terms: &MortgageTerms,
) -> Result<MortgageProjection, anyhow::Error> {
    validate_terms(terms)?;

    let extra_payments = terms.extra_payment_timeline();
    let amortization = compute_amortization_schedule(terms, &extra_payments);
    let summary = summarize(terms, &amortization);

    Ok(MortgageProjection {
        extra_payments,
        amortization,
        summary,
    })
}
