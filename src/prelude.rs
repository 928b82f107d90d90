//! Coupons prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLine, CartSummary},
    catalog::{CatalogError, CouponCatalog},
    coupons::{
        Coupon, CouponError, CouponKey, CouponSummary, DiscountType,
        eligibility::{EligibilityCheck, EligibilityRules, EvaluationContext, is_eligible},
    },
    discounts::{calculate_discount, round_discount},
    fixtures::{Fixture, FixtureError},
    money::{MoneyFormatError, format_amount},
    receipt::{ReceiptError, SelectionReceipt},
    requests::{BestCouponRequest, RequestError},
    selection::{Outcome, SelectionResult, Verdict, explain, find_best_coupon, select_best_coupon},
    usage::{CouponUsage, UsageCounts, UsageLedger},
    users::{UserContext, UserTier},
};
