//! Discounts
//!
//! Quantity-tiered discount rules for box and slice orders, plus the flat
//! bonus for the Pizza of the Day. Rates from the tier table and the bonus
//! add together; they never compound.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the pizza is sold.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Whole boxes of eight slices.
    Box,

    /// Individual slices.
    Slice,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Box => f.write_str("Box"),
            OrderType::Slice => f.write_str("Slice"),
        }
    }
}

/// Reasons a quantity is refused. The kiosk reports these and asks again.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// Input was not a whole number.
    #[error("Please enter a valid number.")]
    NotANumber(String),

    /// Zero pizzas is not an order.
    #[error("Please order at least one.")]
    Zero,

    /// Slice orders are capped.
    #[error("Maximum of {max} slices per order. Please try again.")]
    TooManySlices {
        /// Largest accepted slice quantity
        max: u32,
    },
}

/// A discount tier: orders of at least `min_quantity` get `rate` off.
#[derive(Debug, Copy, Clone)]
pub struct QuantityTier {
    min_quantity: u32,
    rate: Percentage,
}

impl QuantityTier {
    /// Create a new tier.
    pub fn new(min_quantity: u32, rate: Percentage) -> Self {
        Self { min_quantity, rate }
    }
}

/// Discount rules for the kiosk.
#[derive(Debug, Clone)]
pub struct DiscountPolicy {
    box_tiers: Vec<QuantityTier>,
    slice_tiers: Vec<QuantityTier>,
    featured_bonus: Percentage,
    max_slices: u32,
}

impl Default for DiscountPolicy {
    /// Rushmore's house rules:
    ///
    /// - boxes: 10% off from 5 boxes, 20% off from 10
    /// - slices: 5% off from 8 slices, at most 16 slices per order
    /// - Pizza of the Day: a further 25% off either way
    fn default() -> Self {
        Self::new(
            vec![
                QuantityTier::new(5, Percentage::from(Decimal::new(10, 2))),
                QuantityTier::new(10, Percentage::from(Decimal::new(20, 2))),
            ],
            vec![QuantityTier::new(8, Percentage::from(Decimal::new(5, 2)))],
            Percentage::from(Decimal::new(25, 2)),
            16,
        )
    }
}

impl DiscountPolicy {
    /// Create a policy from tier tables, the Pizza of the Day bonus and the
    /// slice cap.
    pub fn new(
        box_tiers: Vec<QuantityTier>,
        slice_tiers: Vec<QuantityTier>,
        featured_bonus: Percentage,
        max_slices: u32,
    ) -> Self {
        Self {
            box_tiers,
            slice_tiers,
            featured_bonus,
            max_slices,
        }
    }

    /// Largest slice quantity accepted in one order.
    pub fn max_slices(&self) -> u32 {
        self.max_slices
    }

    /// Extra rate added for the Pizza of the Day.
    pub fn featured_bonus(&self) -> Percentage {
        self.featured_bonus
    }

    /// Parse and validate a quantity typed at a prompt.
    ///
    /// # Errors
    ///
    /// - [`QuantityError::NotANumber`]: input is not made of ASCII digits.
    /// - [`QuantityError::Zero`]: the quantity is zero.
    /// - [`QuantityError::TooManySlices`]: a slice order above the cap.
    pub fn validate_quantity(
        &self,
        order_type: OrderType,
        input: &str,
    ) -> Result<u32, QuantityError> {
        let input = input.trim();

        if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QuantityError::NotANumber(input.to_string()));
        }

        // All digits, so the only parse failure left is overflow; treat
        // that as an oversized order.
        let quantity = input.parse::<u32>().unwrap_or(u32::MAX);

        if quantity == 0 {
            return Err(QuantityError::Zero);
        }

        if order_type == OrderType::Slice && quantity > self.max_slices {
            return Err(QuantityError::TooManySlices {
                max: self.max_slices,
            });
        }

        Ok(quantity)
    }

    /// Work out the discount for an order.
    pub fn discount_for(
        &self,
        order_type: OrderType,
        quantity: u32,
        pizza_of_the_day: bool,
    ) -> AppliedDiscount {
        let tiers = match order_type {
            OrderType::Box => &self.box_tiers,
            OrderType::Slice => &self.slice_tiers,
        };

        let base = tiers
            .iter()
            .filter(|tier| quantity >= tier.min_quantity)
            .max_by_key(|tier| tier.min_quantity)
            .map_or(Decimal::ZERO, |tier| decimal(tier.rate));

        let bonus = if pizza_of_the_day {
            decimal(self.featured_bonus)
        } else {
            Decimal::ZERO
        };

        AppliedDiscount {
            base: Percentage::from(base),
            pizza_of_the_day,
            rate: Percentage::from(base + bonus),
        }
    }
}

/// The discount worked out for a single order.
#[derive(Debug, Copy, Clone)]
pub struct AppliedDiscount {
    base: Percentage,
    pizza_of_the_day: bool,
    rate: Percentage,
}

impl AppliedDiscount {
    /// Rate from the quantity tiers alone.
    pub fn base_rate(&self) -> Percentage {
        self.base
    }

    /// Whether the Pizza of the Day bonus is included.
    pub fn is_pizza_of_the_day(&self) -> bool {
        self.pizza_of_the_day
    }

    /// Combined rate charged against the order.
    pub fn rate(&self) -> Percentage {
        self.rate
    }

    /// Combined rate as a plain decimal fraction (e.g. `0.45`).
    pub fn fraction(&self) -> Decimal {
        decimal(self.rate)
    }

    /// True when any discount is taken off the order.
    pub fn is_applied(&self) -> bool {
        self.fraction() > Decimal::ZERO
    }

    /// Whole percent points for display, truncated (e.g. `45`).
    pub fn percent_points(&self) -> Decimal {
        percent_points(self.rate)
    }
}

/// Whole percent points of a percentage, truncated (0.45 -> 45).
pub fn percent_points(percentage: Percentage) -> Decimal {
    (decimal(percentage) * Decimal::ONE_HUNDRED).trunc()
}

/// Unwrap a percentage into its decimal fraction.
pub(crate) fn decimal(percentage: Percentage) -> Decimal {
    // `Percentage` does not expose its inner value; multiplying by one does.
    percentage * Decimal::ONE
}
