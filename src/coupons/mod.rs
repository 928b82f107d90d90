//! Coupons

use std::{fmt, num::NonZeroU32, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

use crate::coupons::eligibility::EligibilityRules;

pub mod eligibility;

new_key_type! {
    /// Coupon Key
    pub struct CouponKey;
}

/// Shortest accepted coupon code, in characters.
pub const MIN_CODE_LEN: usize = 3;

/// Longest accepted coupon code, in characters.
pub const MAX_CODE_LEN: usize = 20;

/// Shortest accepted description, in characters.
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Errors raised when a coupon definition is invalid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponError {
    /// Code is too short or too long after normalisation.
    #[error("coupon code '{0}' must be between 3 and 20 characters")]
    InvalidCode(String),

    /// Description is too short or too long.
    #[error("coupon description must be between 10 and 200 characters, got {0}")]
    InvalidDescription(usize),

    /// Discount value must be strictly positive.
    #[error("discount value must be positive, got {0}")]
    NonPositiveDiscountValue(Decimal),

    /// Discount cap must be strictly positive when present.
    #[error("max discount amount must be positive, got {0}")]
    NonPositiveMaxDiscount(Decimal),

    /// The validity window ends on or before it starts.
    #[error("coupon end date {end} must be after start date {start}")]
    InvalidDateRange {
        /// Start of the window
        start: Timestamp,
        /// End of the window
        end: Timestamp,
    },

    /// An eligibility minimum was present but not positive.
    #[error("eligibility minimum '{0}' must be positive")]
    NonPositiveMinimum(&'static str),

    /// An allowed country is not a two-letter code.
    #[error("country code '{0}' must be exactly 2 letters")]
    InvalidCountry(String),
}

/// How a coupon's discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// Fixed amount off the cart value
    Flat,

    /// Percentage of the cart value, optionally capped
    Percent,
}

impl DiscountType {
    /// Upper-case name of the discount type.
    pub fn as_str(self) -> &'static str {
        match self {
            DiscountType::Flat => "FLAT",
            DiscountType::Percent => "PERCENT",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`DiscountType`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown discount type: {0}")]
pub struct UnknownDiscountType(pub String);

impl FromStr for DiscountType {
    type Err = UnknownDiscountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FLAT" => Ok(DiscountType::Flat),
            "PERCENT" => Ok(DiscountType::Percent),
            _ => Err(UnknownDiscountType(s.to_string())),
        }
    }
}

/// A time-bounded, rule-gated discount offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    /// Unique, upper-case code
    pub code: String,

    /// Human readable description
    pub description: String,

    /// How `discount_value` is applied
    pub discount_type: DiscountType,

    /// Flat amount or percentage points
    pub discount_value: Decimal,

    /// Cap on a percentage discount
    pub max_discount_amount: Option<Decimal>,

    /// Start of the validity window (inclusive)
    pub start_date: Timestamp,

    /// End of the validity window (inclusive)
    pub end_date: Timestamp,

    /// Redemptions allowed per user
    pub usage_limit_per_user: Option<NonZeroU32>,

    /// Eligibility rules
    pub eligibility: EligibilityRules,

    /// Whether the coupon may be offered at all
    pub is_active: bool,
}

impl Coupon {
    /// Create an active coupon with no eligibility rules, usage limit or cap.
    pub fn new(
        code: &str,
        description: impl Into<String>,
        discount_type: DiscountType,
        discount_value: Decimal,
        start_date: Timestamp,
        end_date: Timestamp,
    ) -> Self {
        Self {
            code: normalize_code(code),
            description: description.into(),
            discount_type,
            discount_value,
            max_discount_amount: None,
            start_date,
            end_date,
            usage_limit_per_user: None,
            eligibility: EligibilityRules::default(),
            is_active: true,
        }
    }

    /// Set the percentage cap.
    #[must_use]
    pub fn with_max_discount(mut self, max: Decimal) -> Self {
        self.max_discount_amount = Some(max);
        self
    }

    /// Set the per-user usage limit.
    #[must_use]
    pub fn with_usage_limit(mut self, limit: NonZeroU32) -> Self {
        self.usage_limit_per_user = Some(limit);
        self
    }

    /// Replace the eligibility rules.
    #[must_use]
    pub fn with_eligibility(mut self, eligibility: EligibilityRules) -> Self {
        self.eligibility = eligibility;
        self
    }

    /// Set whether the coupon is active.
    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Whether `now` falls inside the validity window, both ends inclusive.
    pub fn is_live_at(&self, now: Timestamp) -> bool {
        self.start_date <= now && now <= self.end_date
    }

    /// Fields exposed to callers of the selection engine.
    pub fn summary(&self) -> CouponSummary {
        CouponSummary {
            code: self.code.clone(),
            description: self.description.clone(),
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            max_discount_amount: self.max_discount_amount,
            end_date: self.end_date,
        }
    }

    /// Check the coupon definition.
    ///
    /// # Errors
    ///
    /// Returns the first [`CouponError`] found.
    pub fn validate(&self) -> Result<(), CouponError> {
        let code_len = self.code.chars().count();
        if !(MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code_len) {
            return Err(CouponError::InvalidCode(self.code.clone()));
        }

        let description_len = self.description.chars().count();
        if !(MIN_DESCRIPTION_LEN..=MAX_DESCRIPTION_LEN).contains(&description_len) {
            return Err(CouponError::InvalidDescription(description_len));
        }

        if self.discount_value <= Decimal::ZERO {
            return Err(CouponError::NonPositiveDiscountValue(self.discount_value));
        }

        if let Some(max) = self
            .max_discount_amount
            .filter(|max| *max <= Decimal::ZERO)
        {
            return Err(CouponError::NonPositiveMaxDiscount(max));
        }

        if self.end_date <= self.start_date {
            return Err(CouponError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }

        self.eligibility.validate()
    }
}

/// Trim and upper-case a coupon code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// The subset of a coupon returned alongside a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponSummary {
    /// Coupon code
    pub code: String,

    /// Coupon description
    pub description: String,

    /// Discount type
    pub discount_type: DiscountType,

    /// Discount value
    pub discount_value: Decimal,

    /// Percentage cap, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<Decimal>,

    /// End of the validity window
    pub end_date: Timestamp,
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use super::*;

    fn test_coupon() -> Result<Coupon, jiff::Error> {
        Ok(Coupon::new(
            " flat100 ",
            "Flat 100 off big carts",
            DiscountType::Flat,
            dec!(100),
            "2024-01-01T00:00:00Z".parse()?,
            "2024-12-31T23:59:59Z".parse()?,
        ))
    }

    #[test]
    fn new_normalizes_code() -> TestResult {
        assert_eq!(test_coupon()?.code, "FLAT100");

        Ok(())
    }

    #[test]
    fn valid_coupon_passes_validation() -> TestResult {
        test_coupon()?.validate()?;

        Ok(())
    }

    #[test]
    fn validate_rejects_short_code() -> TestResult {
        let mut coupon = test_coupon()?;
        coupon.code = "AB".to_string();

        assert_eq!(
            coupon.validate(),
            Err(CouponError::InvalidCode("AB".to_string()))
        );

        Ok(())
    }

    #[test]
    fn validate_rejects_short_description() -> TestResult {
        let mut coupon = test_coupon()?;
        coupon.description = "Too short".to_string();

        assert_eq!(coupon.validate(), Err(CouponError::InvalidDescription(9)));

        Ok(())
    }

    #[test]
    fn validate_rejects_non_positive_values() -> TestResult {
        let mut coupon = test_coupon()?;
        coupon.discount_value = Decimal::ZERO;

        assert_eq!(
            coupon.validate(),
            Err(CouponError::NonPositiveDiscountValue(Decimal::ZERO))
        );

        let coupon = test_coupon()?.with_max_discount(dec!(-1));

        assert_eq!(
            coupon.validate(),
            Err(CouponError::NonPositiveMaxDiscount(dec!(-1)))
        );

        Ok(())
    }

    #[test]
    fn validate_rejects_end_not_after_start() -> TestResult {
        let mut coupon = test_coupon()?;
        coupon.end_date = coupon.start_date;

        assert!(matches!(
            coupon.validate(),
            Err(CouponError::InvalidDateRange { .. })
        ));

        Ok(())
    }

    #[test]
    fn live_window_is_inclusive() -> TestResult {
        let coupon = test_coupon()?;

        assert!(coupon.is_live_at(coupon.start_date));
        assert!(coupon.is_live_at(coupon.end_date));
        assert!(!coupon.is_live_at("2025-01-01T00:00:00Z".parse()?));
        assert!(!coupon.is_live_at("2023-12-31T23:59:59Z".parse()?));

        Ok(())
    }

    #[test]
    fn discount_type_parses_known_names() -> TestResult {
        assert_eq!("flat".parse::<DiscountType>()?, DiscountType::Flat);
        assert_eq!("PERCENT".parse::<DiscountType>()?, DiscountType::Percent);
        assert_eq!(
            "BOGO".parse::<DiscountType>(),
            Err(UnknownDiscountType("BOGO".to_string()))
        );

        Ok(())
    }

    #[test]
    fn summary_serializes_camel_case_without_missing_cap() -> TestResult {
        let summary = test_coupon()?.summary();
        let json = serde_json::to_value(&summary)?;

        assert_eq!(json["code"], "FLAT100");
        assert_eq!(json["discountType"], "FLAT");
        assert!(json.get("maxDiscountAmount").is_none());
        assert!(json.get("endDate").is_some());

        Ok(())
    }
}
