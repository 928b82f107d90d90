//! Coupon Catalog

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;

use crate::coupons::{Coupon, CouponError, CouponKey, normalize_code};

/// Errors raised when adding coupons to the catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A coupon with the same code already exists.
    #[error("coupon code '{0}' already exists")]
    DuplicateCode(String),

    /// The coupon definition is invalid.
    #[error(transparent)]
    Coupon(#[from] CouponError),
}

/// Keyed collection of coupons with a unique code index.
#[derive(Debug, Default)]
pub struct CouponCatalog {
    coupons: SlotMap<CouponKey, Coupon>,
    codes: FxHashMap<String, CouponKey>,
    order: Vec<CouponKey>,
}

impl CouponCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a coupon.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Coupon`] if the coupon is invalid, or
    /// [`CatalogError::DuplicateCode`] if its code is already taken.
    pub fn insert(&mut self, mut coupon: Coupon) -> Result<CouponKey, CatalogError> {
        coupon.code = normalize_code(&coupon.code);
        coupon.validate()?;

        if self.codes.contains_key(&coupon.code) {
            return Err(CatalogError::DuplicateCode(coupon.code));
        }

        let code = coupon.code.clone();
        let key = self.coupons.insert(coupon);

        self.codes.insert(code, key);
        self.order.push(key);

        Ok(key)
    }

    /// Get a coupon by key.
    pub fn get(&self, key: CouponKey) -> Option<&Coupon> {
        self.coupons.get(key)
    }

    /// Find a coupon key by code, ignoring case and surrounding whitespace.
    pub fn key_for_code(&self, code: &str) -> Option<CouponKey> {
        self.codes.get(&normalize_code(code)).copied()
    }

    /// Find a coupon by code, ignoring case and surrounding whitespace.
    pub fn find_by_code(&self, code: &str) -> Option<(CouponKey, &Coupon)> {
        let key = self.key_for_code(code)?;

        self.coupons.get(key).map(|coupon| (key, coupon))
    }

    /// Every coupon, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CouponKey, &Coupon)> {
        self.order
            .iter()
            .filter_map(|&key| self.coupons.get(key).map(|coupon| (key, coupon)))
    }

    /// Active coupons, in insertion order.
    pub fn active(&self) -> impl Iterator<Item = (CouponKey, &Coupon)> {
        self.iter().filter(|(_, coupon)| coupon.is_active)
    }

    /// Active coupons, most recently added first.
    pub fn newest_active(&self) -> impl Iterator<Item = (CouponKey, &Coupon)> {
        self.order
            .iter()
            .rev()
            .filter_map(|&key| self.coupons.get(key).map(|coupon| (key, coupon)))
            .filter(|(_, coupon)| coupon.is_active)
    }

    /// Active coupons whose validity window contains `now`.
    pub fn candidates(&self, now: Timestamp) -> impl Iterator<Item = (CouponKey, &Coupon)> {
        self.active().filter(move |(_, coupon)| coupon.is_live_at(now))
    }

    /// Number of coupons.
    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}
