//! Best Coupon Requests

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{cart::Cart, coupons::eligibility::is_country_code, users::UserContext};

/// Errors raised when a best-coupon request is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The user id is blank.
    #[error("user id must not be empty")]
    MissingUserId,

    /// The user's country is not a two-letter code.
    #[error("country code '{0}' must be exactly 2 letters")]
    InvalidCountry(String),

    /// The user's lifetime spend is negative.
    #[error("lifetime spend must not be negative, got {0}")]
    NegativeLifetimeSpend(Decimal),

    /// The cart has no lines.
    #[error("cart must contain at least one item")]
    EmptyCart,

    /// A cart line has a blank product id.
    #[error("cart line {0} has no product id")]
    MissingProductId(usize),

    /// A cart line has a blank category.
    #[error("cart line {0} has no category")]
    MissingCategory(usize),

    /// A cart line has a non-positive unit price.
    #[error("cart line {0} has non-positive unit price {1}")]
    NonPositiveUnitPrice(usize, Decimal),

    /// A cart line has a zero quantity.
    #[error("cart line {0} has zero quantity")]
    ZeroQuantity(usize),
}

/// A request for the best coupon for a user's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestCouponRequest {
    /// Requesting user
    pub user: UserContext,

    /// Cart to discount
    pub cart: Cart,
}

impl BestCouponRequest {
    /// Create a request.
    pub fn new(user: UserContext, cart: Cart) -> Self {
        Self { user, cart }
    }

    /// Check the request is well formed.
    ///
    /// # Errors
    ///
    /// Returns the first [`RequestError`] found.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.user.user_id.trim().is_empty() {
            return Err(RequestError::MissingUserId);
        }

        if !is_country_code(&self.user.country) {
            return Err(RequestError::InvalidCountry(self.user.country.clone()));
        }

        if self.user.lifetime_spend < Decimal::ZERO {
            return Err(RequestError::NegativeLifetimeSpend(self.user.lifetime_spend));
        }

        if self.cart.is_empty() {
            return Err(RequestError::EmptyCart);
        }

        for (idx, line) in self.cart.iter().enumerate() {
            if line.product_id.trim().is_empty() {
                return Err(RequestError::MissingProductId(idx));
            }

            if line.category.trim().is_empty() {
                return Err(RequestError::MissingCategory(idx));
            }

            if line.unit_price <= Decimal::ZERO {
                return Err(RequestError::NonPositiveUnitPrice(idx, line.unit_price));
            }

            if line.quantity == 0 {
                return Err(RequestError::ZeroQuantity(idx));
            }
        }

        Ok(())
    }
}
