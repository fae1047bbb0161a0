//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::discounts::decimal;

/// Errors that can occur while calculating an order total.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The total could not be represented.
    #[error("order total overflowed")]
    Overflow,
}

/// An order total at full precision, in major units of its currency.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrderTotal {
    amount: Decimal,
    currency: &'static Currency,
}

impl OrderTotal {
    /// Full-precision amount (e.g. `0.945`).
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Currency of the total.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The total rounded to the currency's minor unit, for display.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the rounded amount does not fit
    /// in minor units.
    pub fn rounded(&self) -> Result<Money<'static, Currency>, PricingError> {
        let minor = self
            .amount
            .checked_mul(Decimal::from(10_i64.pow(self.currency.exponent)))
            .and_then(|value| {
                value
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
                    .to_i64()
            })
            .ok_or(PricingError::Overflow)?;

        Ok(Money::from_minor(minor, self.currency))
    }
}

/// Calculates `unit_price * quantity * (1 - discount_rate)` without any
/// intermediate rounding.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the decimal arithmetic overflows.
pub fn total(
    unit_price: Money<'static, Currency>,
    quantity: u32,
    discount_rate: Percentage,
) -> Result<OrderTotal, PricingError> {
    let currency = unit_price.currency();
    let unit = Decimal::new(unit_price.to_minor_units(), currency.exponent);

    let gross = unit
        .checked_mul(Decimal::from(quantity))
        .ok_or(PricingError::Overflow)?;

    let amount = gross
        .checked_mul(Decimal::ONE - decimal(discount_rate))
        .ok_or(PricingError::Overflow)?;

    Ok(OrderTotal { amount, currency })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    fn rate(hundredths: i64) -> Percentage {
        Percentage::from(Decimal::new(hundredths, 2))
    }

    #[test]
    fn ten_boxes_at_twenty_percent() -> TestResult {
        let total = total(Money::from_minor(400, USD), 10, rate(20))?;

        assert_eq!(total.amount(), Decimal::from(32));
        assert_eq!(total.rounded()?, Money::from_minor(3200, USD));

        Ok(())
    }

    #[test]
    fn featured_slices_at_thirty_percent() -> TestResult {
        let total = total(Money::from_minor(800, USD), 8, rate(30))?;

        assert_eq!(total.amount(), Decimal::new(448, 1));

        Ok(())
    }

    #[test]
    fn no_discount_is_price_times_quantity() -> TestResult {
        let total = total(Money::from_minor(340, USD), 3, rate(0))?;

        assert_eq!(total.amount(), Decimal::new(1020, 2));
        assert_eq!(total.currency(), USD);

        Ok(())
    }

    #[test]
    fn amount_keeps_full_precision_until_rounded() -> TestResult {
        // 0.42 * 3 * 0.75 = 0.945
        let total = total(Money::from_minor(42, USD), 3, rate(25))?;

        assert_eq!(total.amount(), Decimal::new(945, 3));
        assert_eq!(total.rounded()?, Money::from_minor(94, USD));

        Ok(())
    }

    #[test]
    fn rounding_goes_to_nearest_cent() -> TestResult {
        // 0.56 * 9 * 0.95 = 4.788
        let total = total(Money::from_minor(56, USD), 9, rate(5))?;

        assert_eq!(total.rounded()?, Money::from_minor(479, USD));

        Ok(())
    }

    #[test]
    fn huge_orders_still_price() -> TestResult {
        let total = total(Money::from_minor(1200, USD), u32::MAX, rate(20))?;

        assert!(total.amount() > Decimal::ZERO);

        Ok(())
    }
}
