//! Usage Fixtures

use jiff::Timestamp;
use serde::Deserialize;

use crate::{
    catalog::CouponCatalog,
    fixtures::{FixtureError, parse_amount},
    usage::CouponUsage,
};

/// Wrapper for redemptions in YAML
#[derive(Debug, Deserialize)]
pub struct UsageFixture {
    /// Recorded redemptions
    pub usage: Vec<CouponUsageFixture>,
}

/// Redemption fixture from YAML
#[derive(Debug, Deserialize)]
pub struct CouponUsageFixture {
    /// Redeemed coupon code
    pub coupon: String,

    /// Redeeming user
    pub user_id: String,

    /// Time of redemption
    pub used_at: Timestamp,

    /// Order identifier
    pub order_id: String,

    /// Discount given, as a decimal string
    pub discount_applied: String,
}

impl CouponUsageFixture {
    /// Resolve the coupon code against a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::CouponNotFound`] if the catalog has no such code,
    /// or [`FixtureError::InvalidAmount`] for a malformed discount.
    pub fn try_into_usage(self, catalog: &CouponCatalog) -> Result<CouponUsage, FixtureError> {
        let coupon = catalog
            .key_for_code(&self.coupon)
            .ok_or_else(|| FixtureError::CouponNotFound(self.coupon.clone()))?;

        Ok(CouponUsage {
            coupon,
            user_id: self.user_id,
            used_at: self.used_at,
            order_id: self.order_id,
            discount_applied: parse_amount(&self.discount_applied)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use crate::coupons::{Coupon, DiscountType};

    use super::*;

    fn catalog() -> TestResult<CouponCatalog> {
        let mut catalog = CouponCatalog::new();

        catalog.insert(Coupon::new(
            "WELCOME10",
            "Ten off your first order",
            DiscountType::Flat,
            dec!(10),
            "2024-01-01T00:00:00Z".parse()?,
            "2024-12-31T23:59:59Z".parse()?,
        ))?;

        Ok(catalog)
    }

    #[test]
    fn usage_resolves_against_catalog() -> TestResult {
        let catalog = catalog()?;
        let fixture = CouponUsageFixture {
            coupon: "welcome10".to_string(),
            user_id: "u-1".to_string(),
            used_at: "2024-03-01T12:00:00Z".parse()?,
            order_id: "o-1".to_string(),
            discount_applied: "10".to_string(),
        };

        let usage = fixture.try_into_usage(&catalog)?;

        assert_eq!(Some(usage.coupon), catalog.key_for_code("WELCOME10"));
        assert_eq!(usage.discount_applied, dec!(10));

        Ok(())
    }

    #[test]
    fn usage_for_unknown_coupon_is_rejected() -> TestResult {
        let catalog = catalog()?;
        let fixture = CouponUsageFixture {
            coupon: "GHOST".to_string(),
            user_id: "u-1".to_string(),
            used_at: "2024-03-01T12:00:00Z".parse()?,
            order_id: "o-1".to_string(),
            discount_applied: "10".to_string(),
        };

        assert!(matches!(
            fixture.try_into_usage(&catalog),
            Err(FixtureError::CouponNotFound(code)) if code == "GHOST"
        ));

        Ok(())
    }
}
