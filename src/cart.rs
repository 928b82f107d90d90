//! Cart

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;

/// A single line of a shopping cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Product identifier
    pub product_id: String,

    /// Product category, used by category eligibility rules
    pub category: String,

    /// Price of one unit
    pub unit_price: Decimal,

    /// Number of units, at least one
    pub quantity: u32,
}

impl CartLine {
    /// Create a new cart line.
    pub fn new(
        product_id: impl Into<String>,
        category: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            category: category.into(),
            unit_price,
            quantity,
        }
    }

    /// Price of the line (`unit_price * quantity`), saturating at [`Decimal::MAX`].
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Shopping cart
///
/// The order of lines has no effect on any derived value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart from the given lines.
    pub fn with_lines(lines: impl Into<Vec<CartLine>>) -> Self {
        Self {
            lines: lines.into(),
        }
    }

    /// Add a line to the cart.
    pub fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    /// Lines in the cart.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Iterate over the cart lines.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total value of the cart. An empty cart is worth zero.
    pub fn value(&self) -> Decimal {
        cart_value(&self.lines)
    }

    /// Distinct categories present in the cart.
    pub fn categories(&self) -> FxHashSet<&str> {
        cart_categories(&self.lines)
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        cart_item_count(&self.lines)
    }

    /// Compute every derived cart value in one pass.
    pub fn summary(&self) -> CartSummary<'_> {
        CartSummary::from(self)
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }
}

impl FromIterator<CartLine> for Cart {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

/// Facts derived from a cart, computed once per evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary<'a> {
    /// Sum of line totals
    pub value: Decimal,

    /// Distinct categories
    pub categories: FxHashSet<&'a str>,

    /// Sum of quantities
    pub item_count: u64,
}

impl<'a> From<&'a Cart> for CartSummary<'a> {
    fn from(cart: &'a Cart) -> Self {
        let mut value = Decimal::ZERO;
        let mut item_count = 0_u64;
        let mut categories = FxHashSet::default();

        for line in cart.iter() {
            value = value.saturating_add(line.line_total());
            item_count = item_count.saturating_add(u64::from(line.quantity));
            categories.insert(line.category.as_str());
        }

        Self {
            value,
            categories,
            item_count,
        }
    }
}

/// Sum of `unit_price * quantity` over all lines, saturating at [`Decimal::MAX`].
pub fn cart_value(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(CartLine::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Set of distinct categories present in the lines.
pub fn cart_categories(lines: &[CartLine]) -> FxHashSet<&str> {
    lines.iter().map(|line| line.category.as_str()).collect()
}

/// Sum of quantities over all lines.
pub fn cart_item_count(lines: &[CartLine]) -> u64 {
    lines
        .iter()
        .map(|line| u64::from(line.quantity))
        .fold(0, u64::saturating_add)
}
