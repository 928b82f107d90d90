//! Coupons
//!
//! Coupons is a coupon eligibility and best-coupon selection engine: given a
//! user, a cart and a catalog of coupons, it finds the single coupon that saves
//! the user the most, breaking ties by earliest expiry and then by code.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod coupons;
pub mod discounts;
pub mod fixtures;
pub mod money;
pub mod observability;
pub mod prelude;
pub mod receipt;
pub mod requests;
pub mod selection;
pub mod usage;
pub mod users;
