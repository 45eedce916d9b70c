//! Overflow-checked monetary arithmetic.
//!
//! Quantities and prices arrive from untrusted documents, so products and
//! sums can leave the range of [`Decimal`]. These helpers return `None`
//! instead of panicking; callers report the amount as out of range.

use rust_decimal::Decimal;

use super::types::{DocumentTotals, TaxTriple};

/// Quantity times unit price.
pub fn line_value(quantity: Decimal, unit_price: Decimal) -> Option<Decimal> {
    quantity.checked_mul(unit_price)
}

/// Quantity times unit price minus discount, rounded to cents.
pub fn line_gross(quantity: Decimal, unit_price: Decimal, discount: Decimal) -> Option<Decimal> {
    line_value(quantity, unit_price)?
        .checked_sub(discount)
        .map(|gross| gross.round_dp(2))
}

/// `rate` percent of `base`, rounded to cents.
pub fn percent_of(base: Decimal, rate: Decimal) -> Option<Decimal> {
    base.checked_mul(rate)?
        .checked_div(Decimal::ONE_HUNDRED)
        .map(|value| value.round_dp(2))
}

pub fn checked_sum<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, Decimal::checked_add)
}

impl TaxTriple {
    /// Base times rate, rounded to cents.
    pub fn computed_value(&self) -> Option<Decimal> {
        percent_of(self.base, self.rate)
    }
}

impl DocumentTotals {
    /// Products minus discount plus freight, insurance, other charges, and IPI.
    pub fn composed_total(&self) -> Option<Decimal> {
        checked_sum([
            self.products,
            -self.discount,
            self.freight,
            self.insurance,
            self.other,
            self.ipi,
        ])
    }
}
