//! Input checks for callers that build `MortgageTerms` outside the web form.
//!
//! The calculation itself never rejects input; these are the same guards the
//! form applies before it calls into the engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use crate::amortization::MortgageTerms;
use crate::error::MortgageError;
use crate::extra_payment::{AdvancePaymentBlock, BasicExtraPayment, ExtraPaymentSpec};

/// Longest accepted loan term.
pub const MAX_LOAN_TERM_YEARS: u32 = 100;

/// Checks `terms` and returns the first violation found.
pub fn validate_terms(terms: &MortgageTerms) -> Result<(), MortgageError> {
    let checked = check_terms(terms);
    if let Err(error) = &checked {
        warn!(%error, "rejected mortgage terms");
    }
    checked
}

fn check_terms(terms: &MortgageTerms) -> Result<(), MortgageError> {
    if terms.principal_loan_amount <= Decimal::ZERO {
        return Err(MortgageError::invalid("principalLoanAmount", "must be greater than 0"));
    }
    if terms.loan_term_years == 0 || terms.loan_term_years > MAX_LOAN_TERM_YEARS {
        return Err(MortgageError::invalid(
            "loanTermYears",
            format!("must be between 1 and {MAX_LOAN_TERM_YEARS}"),
        ));
    }
    check_percentage("annualInterestRate", terms.annual_interest_rate)?;
    check_percentage("investmentReturnRate", terms.investment_return_rate)?;

    match &terms.extra_payment {
        None => Ok(()),
        Some(ExtraPaymentSpec::Basic(basic)) => check_basic(basic, terms.number_of_payments()),
        Some(ExtraPaymentSpec::Advance(advance)) => check_blocks(&advance.payment_blocks),
    }
}

fn check_percentage(field: &str, value: Decimal) -> Result<(), MortgageError> {
    if value < Decimal::ZERO || value > dec!(100) {
        return Err(MortgageError::invalid(field, "must be between 0 and 100"));
    }
    Ok(())
}

fn check_split_ratio(field: &str, value: Decimal) -> Result<(), MortgageError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(MortgageError::invalid(field, "must be between 0 and 1"));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: Decimal) -> Result<(), MortgageError> {
    if value < Decimal::ZERO {
        return Err(MortgageError::invalid(field, "must not be negative"));
    }
    Ok(())
}

fn check_basic(spec: &BasicExtraPayment, number_of_payments: u32) -> Result<(), MortgageError> {
    check_non_negative("extraPayment.amount", spec.amount)?;
    check_non_negative("extraPayment.increment", spec.increment)?;
    check_split_ratio("extraPayment.splitRatio", spec.split_ratio)?;

    if spec.start_month >= number_of_payments {
        return Err(MortgageError::invalid(
            "extraPayment.startMonth",
            format!("must be before month {number_of_payments}"),
        ));
    }
    if let Some(end_month) = spec.end_month {
        if end_month <= spec.start_month {
            return Err(MortgageError::invalid(
                "extraPayment.endMonth",
                "must be after the start month",
            ));
        }
    }
    Ok(())
}

fn check_blocks(blocks: &[AdvancePaymentBlock]) -> Result<(), MortgageError> {
    let mut previous_end: Option<u32> = None;

    for (index, block) in blocks.iter().enumerate() {
        let field = |name: &str| format!("extraPayment.paymentBlocks[{index}].{name}");

        check_non_negative(&field("amount"), block.amount)?;
        check_split_ratio(&field("splitRatio"), block.split_ratio)?;
        if block.end_month <= block.start_month {
            return Err(MortgageError::invalid(field("endMonth"), "must be after the start month"));
        }
        if let Some(previous_end) = previous_end {
            if block.start_month < previous_end {
                return Err(MortgageError::invalid(
                    field("startMonth"),
                    format!("overlaps the previous block ending at month {previous_end}"),
                ));
            }
        }
        previous_end = Some(block.end_month);
    }
    Ok(())
}
