//! Rushmore
//!
//! A text-interface pizza ordering kiosk for Rushmore Pizzeria: browse the
//! menu, order by the box or by the slice, and get a price with any
//! quantity and Pizza of the Day discounts. Completed orders are appended
//! to a JSON order log.

pub mod config;
pub mod discounts;
pub mod kiosk;
pub mod logging;
pub mod menu;
pub mod orders;
pub mod pricing;
pub mod recorder;
pub mod session;

pub mod prelude;
