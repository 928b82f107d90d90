//! Cart Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    cart::{Cart, CartLine},
    fixtures::{FixtureError, parse_amount},
};

/// Wrapper for carts in YAML
#[derive(Debug, Deserialize)]
pub struct CartsFixture {
    /// Currency every cart is priced in
    pub currency: String,

    /// Map of cart key -> cart lines
    pub carts: FxHashMap<String, Vec<CartLineFixture>>,
}

/// Cart line fixture from YAML
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Product identifier
    pub product_id: String,

    /// Product category
    pub category: String,

    /// Unit price as a decimal string
    pub unit_price: String,

    /// Number of units
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

impl TryFrom<CartLineFixture> for CartLine {
    type Error = FixtureError;

    fn try_from(fixture: CartLineFixture) -> Result<Self, Self::Error> {
        Ok(CartLine::new(
            fixture.product_id,
            fixture.category,
            parse_amount(&fixture.unit_price)?,
            fixture.quantity,
        ))
    }
}

/// Build a cart from its fixture lines.
///
/// # Errors
///
/// Returns an error if any unit price is not a decimal number.
pub fn cart_from_lines(lines: Vec<CartLineFixture>) -> Result<Cart, FixtureError> {
    lines.into_iter().map(CartLine::try_from).collect()
}
