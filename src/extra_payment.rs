//! Extra-payment specifications and their expansion into a dense, one entry
//! per month timeline.
//!
//! Two input encodings exist for the same concept:
//! - **Basic**: a single rule (amount, periodic increment, active window, split ratio).
//! - **Advance**: an ordered list of date-ranged blocks, each with its own amount
//!   and split ratio.
//!
//! Both expand into `Vec<ExtraPaymentMonth>` of exactly `number_of_payments`
//! entries. The amortization engine only ever sees that shared representation.
//! Month windows are half-open in both modes: `start_month` is inclusive and
//! `end_month` is exclusive.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Split ratio applied when the input does not provide one.
pub const DEFAULT_SPLIT_RATIO: Decimal = dec!(0.5);

fn default_split_ratio() -> Decimal {
    DEFAULT_SPLIT_RATIO
}

/// How often the Basic increment is added to the running extra payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementFrequency {
    Monthly,
    #[default]
    Yearly,
}

/// A single extra-payment rule applied over one active window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicExtraPayment {
    /// Base monthly extra payment.
    pub amount: Decimal,
    /// Amount added to the running extra payment at each increment.
    #[serde(default)]
    pub increment: Decimal,
    #[serde(default)]
    pub increment_frequency: IncrementFrequency,
    /// First active month (zero-based, inclusive).
    #[serde(default)]
    pub start_month: u32,
    /// End of the active window (zero-based, exclusive). `None` runs to the end of the term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_month: Option<u32>,
    /// Fraction of each extra payment directed to principal; the rest is invested.
    #[serde(default = "default_split_ratio", alias = "extraPaymentSplitRatio")]
    pub split_ratio: Decimal,
}

/// One block of an Advance specification, active over `[start_month, end_month)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancePaymentBlock {
    pub amount: Decimal,
    pub start_month: u32,
    pub end_month: u32,
    #[serde(default = "default_split_ratio")]
    pub split_ratio: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceExtraPayment {
    pub payment_blocks: Vec<AdvancePaymentBlock>,
}

/// Extra-payment specification as supplied by the caller.
///
/// Untagged on the wire: an object carrying `paymentBlocks` is Advance,
/// anything else is read as Basic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraPaymentSpec {
    Advance(AdvanceExtraPayment),
    Basic(BasicExtraPayment),
}

impl ExtraPaymentSpec {
    /// Expands this specification into a dense timeline of `number_of_payments` months.
    pub fn expand(&self, number_of_payments: u32) -> Vec<ExtraPaymentMonth> {
        expand_extra_payments(self, number_of_payments)
    }
}

/// Extra payment for one month of the loan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraPaymentMonth {
    /// Zero-based month index.
    pub month: u32,
    /// Total extra payment for the month, zero when inactive.
    pub amount: Decimal,
    /// Meaningless when `amount` is zero.
    pub split_ratio: Decimal,
}

impl ExtraPaymentMonth {
    /// Zero-amount placeholder for an inactive month.
    pub fn empty(month: u32) -> Self {
        ExtraPaymentMonth {
            month,
            amount: Decimal::ZERO,
            split_ratio: Decimal::ZERO,
        }
    }

    /// Portion of the month's extra payment directed to principal.
    pub fn to_principal(&self) -> Decimal {
        self.amount * self.split_ratio
    }

    /// Portion of the month's extra payment routed to investment.
    pub fn to_investment(&self) -> Decimal {
        self.amount * (Decimal::ONE - self.split_ratio)
    }
}

/// A timeline with no extra payment in any month.
pub fn empty_timeline(number_of_payments: u32) -> Vec<ExtraPaymentMonth> {
    (0..number_of_payments).map(ExtraPaymentMonth::empty).collect()
}

/// Expands either specification mode into the shared dense timeline.
pub fn expand_extra_payments(
    spec: &ExtraPaymentSpec,
    number_of_payments: u32,
) -> Vec<ExtraPaymentMonth> {
    match spec {
        ExtraPaymentSpec::Basic(basic) => expand_basic(basic, number_of_payments),
        ExtraPaymentSpec::Advance(advance) => {
            expand_advance(&advance.payment_blocks, number_of_payments)
        }
    }
}

/// Expands a Basic rule.
///
/// The running amount starts at `spec.amount` and grows by `spec.increment`
/// after every active month (monthly) or after every active month that closes
/// a 12-month year (yearly). A non-positive base amount yields no extra
/// payments at all.
pub fn expand_basic(spec: &BasicExtraPayment, number_of_payments: u32) -> Vec<ExtraPaymentMonth> {
    if spec.amount <= Decimal::ZERO {
        debug!("basic extra payment has no amount, expanding to an empty timeline");
        return empty_timeline(number_of_payments);
    }

    let end_month = spec.end_month.unwrap_or(number_of_payments);
    let mut timeline = Vec::with_capacity(number_of_payments as usize);
    let mut current_amount = spec.amount;

    for month in 0..number_of_payments {
        if month < spec.start_month || month >= end_month {
            timeline.push(ExtraPaymentMonth::empty(month));
            continue;
        }

        timeline.push(ExtraPaymentMonth {
            month,
            amount: current_amount,
            split_ratio: spec.split_ratio,
        });

        match spec.increment_frequency {
            IncrementFrequency::Monthly => current_amount += spec.increment,
            // the new amount applies from the first month of the next year
            IncrementFrequency::Yearly if (month + 1) % 12 == 0 => {
                current_amount += spec.increment
            }
            IncrementFrequency::Yearly => {}
        }
    }

    debug!(
        start_month = spec.start_month,
        end_month = end_month,
        number_of_payments,
        "expanded basic extra payment"
    );
    timeline
}

/// Expands an ordered list of Advance blocks.
///
/// Blocks are expected to be non-overlapping; this is not re-checked here.
/// Should two blocks cover the same month, the one listed first wins. Months
/// past the end of the term are dropped, gaps become placeholders.
pub fn expand_advance(
    blocks: &[AdvancePaymentBlock],
    number_of_payments: u32,
) -> Vec<ExtraPaymentMonth> {
    let mut slots: Vec<Option<ExtraPaymentMonth>> = vec![None; number_of_payments as usize];

    for block in blocks {
        let end_month = block.end_month.min(number_of_payments);
        for month in block.start_month..end_month {
            let slot = &mut slots[month as usize];
            if slot.is_none() {
                *slot = Some(ExtraPaymentMonth {
                    month,
                    amount: block.amount,
                    split_ratio: block.split_ratio,
                });
            }
        }
    }

    debug!(
        blocks = blocks.len(),
        number_of_payments, "expanded advance extra payment"
    );

    slots
        .into_iter()
        .zip(0..number_of_payments)
        .map(|(slot, month)| slot.unwrap_or_else(|| ExtraPaymentMonth::empty(month)))
        .collect()
}
