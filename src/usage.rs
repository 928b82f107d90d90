//! Coupon Usage
//!
//! Confirmed redemptions of coupons by users, and the per-user counts the
//! selection engine consumes.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::coupons::CouponKey;

/// Redemptions of each coupon by a single user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageCounts(FxHashMap<CouponKey, u32>);

impl UsageCounts {
    /// Create an empty set of counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Redemptions of the coupon. Coupons never redeemed count zero.
    pub fn get(&self, coupon: CouponKey) -> u32 {
        self.0.get(&coupon).copied().unwrap_or_default()
    }

    /// Set the count for a coupon.
    pub fn set(&mut self, coupon: CouponKey, count: u32) {
        self.0.insert(coupon, count);
    }

    /// Add one redemption of a coupon.
    pub fn increment(&mut self, coupon: CouponKey) {
        let count = self.0.entry(coupon).or_default();
        *count = count.saturating_add(1);
    }

    /// Number of coupons with at least one recorded redemption.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no redemptions are recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CouponKey, u32)> for UsageCounts {
    fn from_iter<I: IntoIterator<Item = (CouponKey, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A confirmed redemption of a coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponUsage {
    /// Redeemed coupon
    pub coupon: CouponKey,

    /// Redeeming user
    pub user_id: String,

    /// Time of redemption
    pub used_at: Timestamp,

    /// Order the coupon was redeemed on
    pub order_id: String,

    /// Discount given by the redemption
    pub discount_applied: Decimal,
}

/// Append-only record of coupon redemptions.
#[derive(Debug, Clone, Default)]
pub struct UsageLedger {
    records: Vec<CouponUsage>,
}

impl UsageLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a confirmed redemption.
    pub fn record(&mut self, usage: CouponUsage) {
        self.records.push(usage);
    }

    /// All recorded redemptions, oldest first.
    pub fn records(&self) -> &[CouponUsage] {
        &self.records
    }

    /// Number of recorded redemptions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count redemptions of every coupon by one user.
    pub fn counts_for(&self, user_id: &str) -> UsageCounts {
        let mut counts = UsageCounts::new();

        for usage in self.records.iter().filter(|usage| usage.user_id == user_id) {
            counts.increment(usage.coupon);
        }

        counts
    }
}

impl FromIterator<CouponUsage> for UsageLedger {
    fn from_iter<I: IntoIterator<Item = CouponUsage>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
