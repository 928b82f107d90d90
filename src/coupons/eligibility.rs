//! Coupon Eligibility Rules
//!
//! A coupon is eligible when every [`EligibilityCheck`] holds against one
//! [`EvaluationContext`]. A rule field that is absent (or an empty list)
//! places no constraint on the user or cart.

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    cart::CartSummary,
    coupons::{Coupon, CouponError},
    users::{UserContext, UserTier},
};

/// Eligibility rules embedded in a coupon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligibilityRules {
    /// Tiers allowed to use the coupon. Empty allows every tier.
    pub allowed_user_tiers: SmallVec<[UserTier; 4]>,

    /// Minimum lifetime spend
    pub min_lifetime_spend: Option<Decimal>,

    /// Minimum number of orders already placed
    pub min_orders_placed: Option<u32>,

    /// Only users who have never ordered may use the coupon
    pub first_order_only: bool,

    /// Two-letter country codes allowed to use the coupon. Empty allows every country.
    pub allowed_countries: SmallVec<[String; 4]>,

    /// Minimum cart value
    pub min_cart_value: Option<Decimal>,

    /// Categories of which the cart must contain at least one. Empty allows any cart.
    pub applicable_categories: SmallVec<[String; 4]>,

    /// Categories the cart must not contain. Empty excludes nothing.
    pub excluded_categories: SmallVec<[String; 4]>,

    /// Minimum number of units in the cart
    pub min_items_count: Option<u64>,
}

impl EligibilityRules {
    /// Check that every present minimum is positive and every country is two letters.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::NonPositiveMinimum`] or [`CouponError::InvalidCountry`].
    pub fn validate(&self) -> Result<(), CouponError> {
        if self.min_lifetime_spend.is_some_and(|min| min <= Decimal::ZERO) {
            return Err(CouponError::NonPositiveMinimum("min_lifetime_spend"));
        }

        if self.min_orders_placed == Some(0) {
            return Err(CouponError::NonPositiveMinimum("min_orders_placed"));
        }

        if self.min_cart_value.is_some_and(|min| min <= Decimal::ZERO) {
            return Err(CouponError::NonPositiveMinimum("min_cart_value"));
        }

        if self.min_items_count == Some(0) {
            return Err(CouponError::NonPositiveMinimum("min_items_count"));
        }

        if let Some(country) = self
            .allowed_countries
            .iter()
            .find(|country| !is_country_code(country))
        {
            return Err(CouponError::InvalidCountry(country.clone()));
        }

        Ok(())
    }
}

/// Whether `code` looks like a two-letter country code.
pub fn is_country_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Snapshot every check of one coupon is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Evaluation time
    pub now: Timestamp,

    /// Confirmed redemptions of the coupon by the user
    pub usage_count: u32,

    /// Requesting user
    pub user: &'a UserContext,

    /// Facts about the cart
    pub cart: &'a CartSummary<'a>,
}

/// A single eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EligibilityCheck {
    /// `start_date <= now <= end_date`
    DateRange,

    /// Usage count below the per-user limit
    UsageLimit,

    /// User tier in the allowed tiers
    UserTier,

    /// Lifetime spend at or above the minimum
    LifetimeSpend,

    /// Orders placed at or above the minimum
    OrdersPlaced,

    /// No orders placed, for first-order coupons
    FirstOrder,

    /// Country in the allowed countries
    Country,

    /// Cart value at or above the minimum
    CartValue,

    /// Cart hits an applicable category and no excluded one
    Categories,

    /// Cart unit count at or above the minimum
    ItemsCount,
}

impl EligibilityCheck {
    /// Every check, in evaluation order.
    pub const ALL: [EligibilityCheck; 10] = [
        EligibilityCheck::DateRange,
        EligibilityCheck::UsageLimit,
        EligibilityCheck::UserTier,
        EligibilityCheck::LifetimeSpend,
        EligibilityCheck::OrdersPlaced,
        EligibilityCheck::FirstOrder,
        EligibilityCheck::Country,
        EligibilityCheck::CartValue,
        EligibilityCheck::Categories,
        EligibilityCheck::ItemsCount,
    ];

    /// Evaluate this check for a coupon.
    pub fn holds(self, coupon: &Coupon, ctx: &EvaluationContext<'_>) -> bool {
        let rules = &coupon.eligibility;

        match self {
            EligibilityCheck::DateRange => coupon.is_live_at(ctx.now),
            EligibilityCheck::UsageLimit => coupon
                .usage_limit_per_user
                .is_none_or(|limit| ctx.usage_count < limit.get()),
            EligibilityCheck::UserTier => {
                rules.allowed_user_tiers.is_empty()
                    || rules.allowed_user_tiers.contains(&ctx.user.tier)
            }
            EligibilityCheck::LifetimeSpend => rules
                .min_lifetime_spend
                .is_none_or(|min| ctx.user.lifetime_spend >= min),
            EligibilityCheck::OrdersPlaced => rules
                .min_orders_placed
                .is_none_or(|min| ctx.user.orders_placed >= min),
            EligibilityCheck::FirstOrder => !rules.first_order_only || ctx.user.is_first_order(),
            EligibilityCheck::Country => {
                rules.allowed_countries.is_empty()
                    || rules
                        .allowed_countries
                        .iter()
                        .any(|country| country.eq_ignore_ascii_case(&ctx.user.country))
            }
            EligibilityCheck::CartValue => rules
                .min_cart_value
                .is_none_or(|min| ctx.cart.value >= min),
            EligibilityCheck::Categories => categories_hold(rules, ctx.cart),
            EligibilityCheck::ItemsCount => rules
                .min_items_count
                .is_none_or(|min| ctx.cart.item_count >= min),
        }
    }

    /// Short name of the check.
    pub fn as_str(self) -> &'static str {
        match self {
            EligibilityCheck::DateRange => "date_range",
            EligibilityCheck::UsageLimit => "usage_limit",
            EligibilityCheck::UserTier => "user_tier",
            EligibilityCheck::LifetimeSpend => "lifetime_spend",
            EligibilityCheck::OrdersPlaced => "orders_placed",
            EligibilityCheck::FirstOrder => "first_order",
            EligibilityCheck::Country => "country",
            EligibilityCheck::CartValue => "cart_value",
            EligibilityCheck::Categories => "categories",
            EligibilityCheck::ItemsCount => "items_count",
        }
    }
}

impl fmt::Display for EligibilityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn categories_hold(rules: &EligibilityRules, cart: &CartSummary<'_>) -> bool {
    let has_applicable = rules.applicable_categories.is_empty()
        || rules
            .applicable_categories
            .iter()
            .any(|category| cart.categories.contains(category.as_str()));

    let has_no_excluded = !rules
        .excluded_categories
        .iter()
        .any(|category| cart.categories.contains(category.as_str()));

    has_applicable && has_no_excluded
}

/// The first check the coupon fails, if any.
pub fn first_failure(coupon: &Coupon, ctx: &EvaluationContext<'_>) -> Option<EligibilityCheck> {
    EligibilityCheck::ALL
        .into_iter()
        .find(|check| !check.holds(coupon, ctx))
}

/// Whether every check holds for the coupon.
pub fn is_eligible(coupon: &Coupon, ctx: &EvaluationContext<'_>) -> bool {
    first_failure(coupon, ctx).is_none()
}
