//! Menu
//!
//! The fixed pizza catalog. The menu ships as a YAML fixture embedded in the
//! binary; every pizza is sold by the box, and slice prices are derived from
//! the box price rather than stored.

use std::io;

use rand::{Rng, seq::SliceRandom};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

/// Number of slices in a box.
pub const SLICES_PER_BOX: i64 = 8;

const RUSHMORE_MENU: &str = include_str!("../fixtures/menu.yml");

/// Menu Errors
#[derive(Debug, Error)]
pub enum MenuError {
    /// YAML parsing error
    #[error("Failed to parse menu: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between pizzas
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The same id was listed twice
    #[error("Duplicate pizza id: {0}")]
    DuplicateId(String),

    /// No pizza with the requested id
    #[error("No pizza with id {0:?} on the menu")]
    UnknownPizza(String),

    /// The menu has no pizzas
    #[error("menu has no pizzas")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct MenuFixture {
    pizzas: Vec<PizzaFixture>,
}

#[derive(Debug, Deserialize)]
struct PizzaFixture {
    id: String,
    name: String,
    /// Box price (e.g., "3.40 USD")
    price: String,
}

/// A pizza on the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    id: String,
    name: String,
    box_price: Money<'static, Currency>,
}

impl MenuItem {
    /// Create a new menu item.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        box_price: Money<'static, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            box_price,
        }
    }

    /// Menu id, as typed at the main menu prompt.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Pizza name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price of a whole box.
    pub fn box_price(&self) -> Money<'static, Currency> {
        self.box_price
    }

    /// Price of a single slice: the box price divided by eight, rounded to
    /// the nearest minor unit with ties going to the even cent.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::InvalidPrice`] if the division cannot be represented.
    pub fn slice_price(&self) -> Result<Money<'static, Currency>, MenuError> {
        let minor = Decimal::from(self.box_price.to_minor_units());

        let slice_minor = minor
            .checked_div(Decimal::from(SLICES_PER_BOX))
            .and_then(|value| {
                value
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
                    .to_i64()
            })
            .ok_or_else(|| MenuError::InvalidPrice(self.box_price.to_string()))?;

        Ok(Money::from_minor(slice_minor, self.box_price.currency()))
    }
}

/// The pizza catalog, in menu order.
#[derive(Debug, Clone)]
pub struct Menu {
    items: Vec<MenuItem>,

    /// Menu id -> index into `items`
    keys: FxHashMap<String, usize>,

    currency: &'static Currency,
}

impl Menu {
    /// Build a menu from items, rejecting empty menus, duplicate ids and
    /// mixed currencies.
    ///
    /// # Errors
    ///
    /// - [`MenuError::Empty`]: no items were given.
    /// - [`MenuError::DuplicateId`]: two items share an id.
    /// - [`MenuError::CurrencyMismatch`]: items are priced in different currencies.
    pub fn new(items: Vec<MenuItem>) -> Result<Self, MenuError> {
        let currency = items
            .first()
            .map(|item| item.box_price.currency())
            .ok_or(MenuError::Empty)?;

        let mut keys = FxHashMap::default();

        for (idx, item) in items.iter().enumerate() {
            let item_currency = item.box_price.currency();

            if item_currency != currency {
                return Err(MenuError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    item_currency.iso_alpha_code.to_string(),
                ));
            }

            if keys.insert(item.id.clone(), idx).is_some() {
                return Err(MenuError::DuplicateId(item.id.clone()));
            }
        }

        Ok(Self {
            items,
            keys,
            currency,
        })
    }

    /// The Rushmore Pizzeria menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded menu fixture is invalid.
    pub fn rushmore() -> Result<Self, MenuError> {
        Self::from_yaml(RUSHMORE_MENU)
    }

    /// Parse a menu from a YAML fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, a price is malformed,
    /// or the resulting menu is invalid (see [`Menu::new`]).
    pub fn from_yaml(contents: &str) -> Result<Self, MenuError> {
        let fixture: MenuFixture = serde_norway::from_str(contents)?;

        let items = fixture
            .pizzas
            .into_iter()
            .map(|pizza| -> Result<MenuItem, MenuError> {
                let (minor_units, currency) = parse_price(&pizza.price)?;

                Ok(MenuItem::new(
                    pizza.id,
                    pizza.name,
                    Money::from_minor(minor_units, currency),
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(items)
    }

    /// Look up a pizza by menu id.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::UnknownPizza`] if no pizza has this id.
    pub fn lookup(&self, id: &str) -> Result<&MenuItem, MenuError> {
        let id = id.trim();

        self.keys
            .get(id)
            .and_then(|&idx| self.items.get(idx))
            .ok_or_else(|| MenuError::UnknownPizza(id.to_string()))
    }

    /// Iterate pizzas in menu order.
    pub fn iter(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter()
    }

    /// Number of pizzas on the menu.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the menu is empty. Always false for a constructed menu.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency every price on this menu is quoted in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Pick the Pizza of the Day uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Empty`] if there is nothing to choose from.
    pub fn draw_pizza_of_the_day<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<&MenuItem, MenuError> {
        self.items.choose(rng).ok_or(MenuError::Empty)
    }

    /// Write the menu as a table, marking the Pizza of the Day.
    ///
    /// # Errors
    ///
    /// Returns an error if a slice price cannot be derived or the output
    /// cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        pizza_of_the_day: Option<&str>,
    ) -> Result<(), MenuWriteError> {
        let mut builder = Builder::default();

        builder.push_record(["#", "Pizza", "Box", "Slice"]);

        for item in self {
            let name = if pizza_of_the_day == Some(item.id()) {
                format!("{} *", item.name)
            } else {
                item.name.clone()
            };

            builder.push_record([
                item.id.clone(),
                name,
                item.box_price.to_string(),
                item.slice_price()?.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..4), Alignment::right());

        writeln!(out, "{table}")?;

        if pizza_of_the_day.is_some() {
            writeln!(out, "* Pizza of the Day")?;
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a Menu {
    type Item = &'a MenuItem;
    type IntoIter = std::slice::Iter<'a, MenuItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Errors raised while rendering the menu.
#[derive(Debug, Error)]
pub enum MenuWriteError {
    /// Price derivation failed.
    #[error(transparent)]
    Menu(#[from] MenuError),

    /// Output could not be written.
    #[error("failed to write menu: {0}")]
    Io(#[from] io::Error),
}

/// Parse price string (e.g., "3.40 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), MenuError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(MenuError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| MenuError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(MenuError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| MenuError::InvalidPrice(s.to_string()))?;

    let currency = match currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(MenuError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}
