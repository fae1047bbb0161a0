//! Rushmore prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    config::{Config, LogFormat},
    discounts::{AppliedDiscount, DiscountPolicy, OrderType, QuantityError, QuantityTier},
    kiosk::Kiosk,
    menu::{Menu, MenuError, MenuItem},
    orders::{OrderRecord, OrderTimestamp},
    pricing::{OrderTotal, PricingError, total},
    recorder::{JsonFileRecorder, OrderRecorder, RecorderError},
    session::{Session, SessionError},
};
