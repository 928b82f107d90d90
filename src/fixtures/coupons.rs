//! Coupon Fixtures

use std::num::NonZeroU32;

use jiff::Timestamp;
use serde::Deserialize;
use smallvec::SmallVec;

use crate::{
    coupons::{Coupon, DiscountType, eligibility::EligibilityRules, normalize_code},
    fixtures::{FixtureError, parse_amount, parse_optional_amount},
    users::UserTier,
};

/// Wrapper for coupons in YAML
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Coupons, in catalog order
    pub coupons: Vec<CouponFixture>,
}

/// Coupon fixture from YAML
#[derive(Debug, Deserialize)]
pub struct CouponFixture {
    /// Coupon code
    pub code: String,

    /// Description
    pub description: String,

    /// Discount type (`FLAT` or `PERCENT`)
    pub discount_type: String,

    /// Discount value as a decimal string
    pub discount_value: String,

    /// Optional percentage cap as a decimal string
    #[serde(default)]
    pub max_discount_amount: Option<String>,

    /// Start of the validity window
    pub start_date: Timestamp,

    /// End of the validity window
    pub end_date: Timestamp,

    /// Optional per-user usage limit
    #[serde(default)]
    pub usage_limit_per_user: Option<NonZeroU32>,

    /// Eligibility rules
    #[serde(default)]
    pub eligibility: EligibilityFixture,

    /// Whether the coupon is active
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Eligibility rules fixture from YAML
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EligibilityFixture {
    /// Allowed user tiers
    pub allowed_user_tiers: Vec<UserTier>,

    /// Minimum lifetime spend
    pub min_lifetime_spend: Option<String>,

    /// Minimum orders placed
    pub min_orders_placed: Option<u32>,

    /// First order only
    pub first_order_only: bool,

    /// Allowed countries
    pub allowed_countries: Vec<String>,

    /// Minimum cart value
    pub min_cart_value: Option<String>,

    /// Applicable categories
    pub applicable_categories: Vec<String>,

    /// Excluded categories
    pub excluded_categories: Vec<String>,

    /// Minimum items count
    pub min_items_count: Option<u64>,
}

impl TryFrom<EligibilityFixture> for EligibilityRules {
    type Error = FixtureError;

    fn try_from(fixture: EligibilityFixture) -> Result<Self, Self::Error> {
        Ok(EligibilityRules {
            allowed_user_tiers: SmallVec::from_vec(fixture.allowed_user_tiers),
            min_lifetime_spend: parse_optional_amount(fixture.min_lifetime_spend.as_deref())?,
            min_orders_placed: fixture.min_orders_placed,
            first_order_only: fixture.first_order_only,
            allowed_countries: fixture
                .allowed_countries
                .iter()
                .map(|country| country.trim().to_ascii_uppercase())
                .collect(),
            min_cart_value: parse_optional_amount(fixture.min_cart_value.as_deref())?,
            applicable_categories: SmallVec::from_vec(fixture.applicable_categories),
            excluded_categories: SmallVec::from_vec(fixture.excluded_categories),
            min_items_count: fixture.min_items_count,
        })
    }
}

impl TryFrom<CouponFixture> for Coupon {
    type Error = FixtureError;

    fn try_from(fixture: CouponFixture) -> Result<Self, Self::Error> {
        let discount_type: DiscountType = fixture.discount_type.parse()?;

        Ok(Coupon {
            code: normalize_code(&fixture.code),
            description: fixture.description,
            discount_type,
            discount_value: parse_amount(&fixture.discount_value)?,
            max_discount_amount: parse_optional_amount(fixture.max_discount_amount.as_deref())?,
            start_date: fixture.start_date,
            end_date: fixture.end_date,
            usage_limit_per_user: fixture.usage_limit_per_user,
            eligibility: fixture.eligibility.try_into()?,
            is_active: fixture.is_active,
        })
    }
}
