//! Orders
//!
//! Completed orders as they are written to the order log.

use std::fmt;

use jiff::{Zoned, civil::DateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::discounts::OrderType;

/// Format of `order_datetime` in the order log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

/// Local wall-clock time an order was placed, to the second.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderTimestamp(DateTime);

impl OrderTimestamp {
    /// The current local time.
    pub fn now() -> Self {
        Self::from(Zoned::now().datetime())
    }

    /// Parse a timestamp in the log format (`YYYY-MM-DD-HH:MM:SS`).
    ///
    /// # Errors
    ///
    /// Returns an error if the input does not match the log format.
    pub fn parse(input: &str) -> Result<Self, jiff::Error> {
        DateTime::strptime(TIMESTAMP_FORMAT, input).map(Self)
    }

    /// The civil date and time.
    pub fn datetime(&self) -> DateTime {
        self.0
    }
}

impl From<DateTime> for OrderTimestamp {
    fn from(datetime: DateTime) -> Self {
        // The log only keeps whole seconds.
        let whole_seconds = datetime.with().subsec_nanosecond(0).build();

        Self(whole_seconds.unwrap_or(datetime))
    }
}

impl fmt::Display for OrderTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.strftime(TIMESTAMP_FORMAT))
    }
}

impl Serialize for OrderTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OrderTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        Self::parse(&raw).map_err(de::Error::custom)
    }
}

/// A completed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(rename = "order_datetime")]
    ordered_at: OrderTimestamp,

    #[serde(rename = "pizza_type")]
    pizza_name: String,

    order_type: OrderType,

    quantity: u32,

    #[serde(with = "rust_decimal::serde::float")]
    total_price: Decimal,

    discount_applied: bool,
}

impl OrderRecord {
    /// Create a new order record.
    pub fn new(
        ordered_at: OrderTimestamp,
        pizza_name: impl Into<String>,
        order_type: OrderType,
        quantity: u32,
        total_price: Decimal,
        discount_applied: bool,
    ) -> Self {
        Self {
            ordered_at,
            pizza_name: pizza_name.into(),
            order_type,
            quantity,
            total_price,
            discount_applied,
        }
    }

    /// When the order was placed.
    pub fn ordered_at(&self) -> OrderTimestamp {
        self.ordered_at
    }

    /// Name of the pizza ordered.
    pub fn pizza_name(&self) -> &str {
        &self.pizza_name
    }

    /// Box or slice.
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Number of boxes or slices.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Amount charged, at full precision.
    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Whether any discount was taken off.
    pub fn discount_applied(&self) -> bool {
        self.discount_applied
    }
}
