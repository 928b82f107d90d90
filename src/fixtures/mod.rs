//! Fixtures
//!
//! YAML fixture sets describing coupons, users, carts and redemptions.
//!
//! A set named `default` lives in `<base>/coupons/default.yml`,
//! `<base>/users/default.yml`, `<base>/carts/default.yml` and, optionally,
//! `<base>/usage/default.yml`.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::{CatalogError, CouponCatalog},
    coupons::UnknownDiscountType,
    fixtures::{
        carts::CartsFixture, coupons::CouponsFixture, usage::UsageFixture, users::UsersFixture,
    },
    money::{MoneyFormatError, parse_currency},
    requests::BestCouponRequest,
    usage::UsageLedger,
    users::UserContext,
};

pub mod carts;
pub mod coupons;
pub mod usage;
pub mod users;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid amount format
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Unknown currency code
    #[error(transparent)]
    Currency(#[from] MoneyFormatError),

    /// Unknown discount type
    #[error(transparent)]
    DiscountType(#[from] UnknownDiscountType),

    /// Coupon rejected by the catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Coupon not found
    #[error("Coupon not found: {0}")]
    CouponNotFound(String),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Cart not found
    #[error("Cart not found: {0}")]
    CartNotFound(String),
}

/// Parse a decimal amount such as `"1200.50"`.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidAmount`] if the string is not a decimal number.
pub fn parse_amount(s: &str) -> Result<Decimal, FixtureError> {
    Decimal::from_str(s.trim()).map_err(|_err| FixtureError::InvalidAmount(s.to_string()))
}

/// Parse an optional decimal amount.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidAmount`] if the string is present but not a decimal number.
pub fn parse_optional_amount(s: Option<&str>) -> Result<Option<Decimal>, FixtureError> {
    s.map(parse_amount).transpose()
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Coupons loaded so far
    catalog: CouponCatalog,

    /// Users keyed by fixture name
    users: FxHashMap<String, UserContext>,

    /// Carts keyed by fixture name
    carts: FxHashMap<String, Cart>,

    /// Recorded redemptions
    ledger: UsageLedger,

    /// Currency carts are priced in
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: CouponCatalog::new(),
            users: FxHashMap::default(),
            carts: FxHashMap::default(),
            ledger: UsageLedger::new(),
            currency: None,
        }
    }

    fn path(&self, kind: &str, name: &str) -> PathBuf {
        self.base_path.join(kind).join(format!("{name}.yml"))
    }

    /// Load coupons from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a coupon is
    /// invalid or duplicates an existing code.
    pub fn load_coupons(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = fs::read_to_string(self.path("coupons", name))?;
        let fixture: CouponsFixture = serde_norway::from_str(&contents)?;

        for coupon_fixture in fixture.coupons {
            self.catalog.insert(coupon_fixture.try_into()?)?;
        }

        Ok(self)
    }

    /// Load users from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_users(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = fs::read_to_string(self.path("users", name))?;
        let fixture: UsersFixture = serde_norway::from_str(&contents)?;

        for (key, user_fixture) in fixture.users {
            self.users.insert(key, user_fixture.try_into()?);
        }

        Ok(self)
    }

    /// Load carts from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the currency is unknown.
    pub fn load_carts(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = fs::read_to_string(self.path("carts", name))?;
        let fixture: CartsFixture = serde_norway::from_str(&contents)?;

        self.currency = Some(parse_currency(&fixture.currency)?);

        for (key, lines) in fixture.carts {
            self.carts.insert(key, carts::cart_from_lines(lines)?);
        }

        Ok(self)
    }

    /// Load redemptions from a YAML fixture file. A missing file loads nothing.
    ///
    /// Coupons must be loaded first, since redemptions reference them by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or references an unknown coupon.
    pub fn load_usage(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = match fs::read_to_string(self.path("usage", name)) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(self),
            Err(err) => return Err(err.into()),
        };

        let fixture: UsageFixture = serde_norway::from_str(&contents)?;

        for usage_fixture in fixture.usage {
            let usage = usage_fixture.try_into_usage(&self.catalog)?;
            self.ledger.record(usage);
        }

        Ok(self)
    }

    /// Load a complete fixture set (coupons, users, carts and usage with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in(name, "./fixtures")
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(name: &str, base_path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path.as_ref());

        fixture
            .load_coupons(name)?
            .load_users(name)?
            .load_carts(name)?
            .load_usage(name)?;

        Ok(fixture)
    }

    /// Get a user by its fixture key
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::UserNotFound`] if no user has the key.
    pub fn user(&self, key: &str) -> Result<&UserContext, FixtureError> {
        self.users
            .get(key)
            .ok_or_else(|| FixtureError::UserNotFound(key.to_string()))
    }

    /// Get a cart by its fixture key
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::CartNotFound`] if no cart has the key.
    pub fn cart(&self, key: &str) -> Result<&Cart, FixtureError> {
        self.carts
            .get(key)
            .ok_or_else(|| FixtureError::CartNotFound(key.to_string()))
    }

    /// Build a best-coupon request from a user key and a cart key
    ///
    /// # Errors
    ///
    /// Returns an error if either key is unknown.
    pub fn request(&self, user: &str, cart: &str) -> Result<BestCouponRequest, FixtureError> {
        Ok(BestCouponRequest::new(
            self.user(user)?.clone(),
            self.cart(cart)?.clone(),
        ))
    }

    /// Coupon catalog
    pub fn catalog(&self) -> &CouponCatalog {
        &self.catalog
    }

    /// Redemption ledger
    pub fn ledger(&self) -> &UsageLedger {
        &self.ledger
    }

    /// Currency carts are priced in, if carts have been loaded
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
