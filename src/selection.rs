//! Coupon Selection
//!
//! Filters candidate coupons through the eligibility checks, ranks the
//! survivors and reports the winner with its discount.
//!
//! Ranking is a total order on `(Reverse(discount), end_date, code)`: the
//! largest discount wins, then the soonest-expiring coupon, then the
//! lexicographically smallest code.

use std::cmp::{Ordering, Reverse};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, debug_span};

use crate::{
    cart::{Cart, CartSummary},
    catalog::CouponCatalog,
    coupons::{
        Coupon, CouponKey, CouponSummary,
        eligibility::{EligibilityCheck, EvaluationContext, first_failure},
    },
    discounts::{calculate_discount, discount_on_value, round_discount},
    requests::{BestCouponRequest, RequestError},
    usage::{UsageCounts, UsageLedger},
    users::UserContext,
};

/// Winning coupon and the discount it yields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult {
    /// Catalog key of the winning coupon
    #[serde(skip)]
    pub coupon_key: CouponKey,

    /// Winning coupon
    pub coupon: CouponSummary,

    /// Discount, rounded to two decimal places
    pub discount_amount: Decimal,

    /// Cart value less the discount
    pub final_amount: Decimal,
}

/// An eligible coupon paired with the discount it would give.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedCoupon<'c> {
    /// Catalog key
    pub key: CouponKey,

    /// Coupon
    pub coupon: &'c Coupon,

    /// Unrounded discount on the cart
    pub discount: Decimal,
}

impl<'c> RankedCoupon<'c> {
    /// Sort key: highest discount, then earliest end date, then smallest code.
    pub fn rank_key(&self) -> (Reverse<Decimal>, Timestamp, &'c str) {
        (
            Reverse(self.discount),
            self.coupon.end_date,
            self.coupon.code.as_str(),
        )
    }
}

/// Order two ranked coupons; the preferred coupon sorts first.
pub fn compare_coupons(a: &RankedCoupon<'_>, b: &RankedCoupon<'_>) -> Ordering {
    a.rank_key().cmp(&b.rank_key())
}

/// Outcome of evaluating one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every check held; the coupon would give this (unrounded) discount.
    Eligible(Decimal),

    /// The first check that failed.
    Ineligible(EligibilityCheck),
}

/// Evaluation of a single candidate coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Catalog key
    pub key: CouponKey,

    /// Coupon code
    pub code: String,

    /// Outcome
    pub outcome: Outcome,
}

/// Candidates that pass every eligibility check, ranked best first.
pub fn rank_eligible<'c>(
    now: Timestamp,
    candidates: impl IntoIterator<Item = (CouponKey, &'c Coupon)>,
    usage: &UsageCounts,
    user: &UserContext,
    cart: &CartSummary<'_>,
) -> Vec<RankedCoupon<'c>> {
    let mut ranked: Vec<RankedCoupon<'c>> = candidates
        .into_iter()
        .filter_map(|(key, coupon)| {
            let ctx = EvaluationContext {
                now,
                usage_count: usage.get(key),
                user,
                cart,
            };

            if let Some(check) = first_failure(coupon, &ctx) {
                debug!(code = %coupon.code, %check, "coupon ineligible");

                return None;
            }

            Some(RankedCoupon {
                key,
                coupon,
                discount: discount_on_value(coupon, cart.value),
            })
        })
        .collect();

    ranked.sort_by(compare_coupons);

    ranked
}

/// Select the most advantageous eligible coupon for a cart.
///
/// `candidates` should already be limited to active coupons. Returns `None`
/// when no candidate is eligible.
pub fn select_best_coupon<'c>(
    now: Timestamp,
    candidates: impl IntoIterator<Item = (CouponKey, &'c Coupon)>,
    usage: &UsageCounts,
    user: &UserContext,
    cart: &Cart,
) -> Option<SelectionResult> {
    let summary = cart.summary();
    let _span = debug_span!(
        "select_best_coupon",
        user_id = %user.user_id,
        cart_value = %summary.value,
    )
    .entered();

    let ranked = rank_eligible(now, candidates, usage, user, &summary);
    let best = ranked.first()?;

    let discount = calculate_discount(best.coupon, cart);
    debug_assert_eq!(discount, best.discount, "ranking discount drifted");

    let discount_amount = round_discount(discount);
    let final_amount = summary.value - discount_amount;

    debug!(
        code = %best.coupon.code,
        %discount_amount,
        %final_amount,
        eligible = ranked.len(),
        "selected coupon"
    );

    Some(SelectionResult {
        coupon_key: best.key,
        coupon: best.coupon.summary(),
        discount_amount,
        final_amount,
    })
}

/// Evaluate every candidate and report why each is or is not eligible.
pub fn explain<'c>(
    now: Timestamp,
    candidates: impl IntoIterator<Item = (CouponKey, &'c Coupon)>,
    usage: &UsageCounts,
    user: &UserContext,
    cart: &Cart,
) -> Vec<Verdict> {
    let summary = cart.summary();

    candidates
        .into_iter()
        .map(|(key, coupon)| {
            let ctx = EvaluationContext {
                now,
                usage_count: usage.get(key),
                user,
                cart: &summary,
            };

            let outcome = match first_failure(coupon, &ctx) {
                Some(check) => Outcome::Ineligible(check),
                None => Outcome::Eligible(discount_on_value(coupon, summary.value)),
            };

            Verdict {
                key,
                code: coupon.code.clone(),
                outcome,
            }
        })
        .collect()
}

/// Find the best coupon in a catalog for a request at `now`.
///
/// Candidates are the catalog's active coupons live at `now`; usage counts are
/// the ledger's redemptions by the requesting user.
///
/// # Errors
///
/// Returns a [`RequestError`] if the request is malformed.
pub fn find_best_coupon(
    now: Timestamp,
    catalog: &CouponCatalog,
    ledger: &UsageLedger,
    request: &BestCouponRequest,
) -> Result<Option<SelectionResult>, RequestError> {
    request.validate()?;

    let usage = ledger.counts_for(&request.user.user_id);

    Ok(select_best_coupon(
        now,
        catalog.candidates(now),
        &usage,
        &request.user,
        &request.cart,
    ))
}
