//! Kiosk
//!
//! Everything that is fixed for the lifetime of a kiosk process: the menu,
//! the discount rules and the Pizza of the Day.

use rand::Rng;
use tracing::info;

use crate::{
    discounts::DiscountPolicy,
    menu::{Menu, MenuError, MenuItem},
};

/// Process-wide kiosk configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Kiosk {
    menu: Menu,
    policy: DiscountPolicy,
    pizza_of_the_day: MenuItem,
}

impl Kiosk {
    /// Create a kiosk with an explicit Pizza of the Day.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::UnknownPizza`] if the pizza is not on the menu.
    pub fn new(
        menu: Menu,
        policy: DiscountPolicy,
        pizza_of_the_day: &str,
    ) -> Result<Self, MenuError> {
        let pizza_of_the_day = menu.lookup(pizza_of_the_day)?.clone();

        Ok(Self {
            menu,
            policy,
            pizza_of_the_day,
        })
    }

    /// Create a kiosk, drawing the Pizza of the Day from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Empty`] if the menu has no pizzas.
    pub fn open<R: Rng + ?Sized>(
        menu: Menu,
        policy: DiscountPolicy,
        rng: &mut R,
    ) -> Result<Self, MenuError> {
        let pizza_of_the_day = menu.draw_pizza_of_the_day(rng)?.clone();

        info!(pizza = pizza_of_the_day.name(), "pizza of the day drawn");

        Ok(Self {
            menu,
            policy,
            pizza_of_the_day,
        })
    }

    /// The menu.
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// The discount rules.
    pub fn policy(&self) -> &DiscountPolicy {
        &self.policy
    }

    /// Today's featured pizza.
    pub fn pizza_of_the_day(&self) -> &MenuItem {
        &self.pizza_of_the_day
    }

    /// Whether `item` is today's featured pizza.
    pub fn is_pizza_of_the_day(&self, item: &MenuItem) -> bool {
        item.id() == self.pizza_of_the_day.id()
    }
}
