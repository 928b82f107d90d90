//! Integration tests for the `default` and `ties` fixture sets.
//!
//! Every test evaluates at 2024-06-01T12:00:00Z, when `FLAT100`, `PREMIUM20`,
//! `WELCOME10`, `ELECTRO15`, `LOYAL5` and `FIRSTBUY` are live, `EXPIRED50` has
//! lapsed and `PAUSED25` is switched off.

use jiff::Timestamp;
use rust_decimal::dec;
use testresult::TestResult;

use coupons::{
    coupons::eligibility::EligibilityCheck,
    fixtures::Fixture,
    selection::{Outcome, explain, find_best_coupon},
};

fn now() -> TestResult<Timestamp> {
    Ok("2024-06-01T12:00:00Z".parse()?)
}

#[test]
fn flat_coupon_wins_for_silver_user_with_standard_cart() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let request = fixture.request("silver", "standard")?;

    let result = find_best_coupon(now()?, fixture.catalog(), fixture.ledger(), &request)?
        .ok_or("expected a coupon")?;

    assert_eq!(result.coupon.code, "FLAT100");
    assert_eq!(result.discount_amount, dec!(100));
    assert_eq!(result.final_amount, dec!(1100));

    Ok(())
}

#[test]
fn premium_coupon_is_capped_for_platinum_user() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let request = fixture.request("platinum", "big")?;

    let result = find_best_coupon(now()?, fixture.catalog(), fixture.ledger(), &request)?
        .ok_or("expected a coupon")?;

    assert_eq!(result.coupon.code, "PREMIUM20");
    assert_eq!(result.discount_amount, dec!(1000));
    assert_eq!(result.final_amount, dec!(9000));

    Ok(())
}

#[test]
fn premium_coupon_is_ineligible_for_silver_tier() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let request = fixture.request("silver", "big")?;
    let usage = fixture.ledger().counts_for(&request.user.user_id);

    let verdicts = explain(
        now()?,
        fixture.catalog().active(),
        &usage,
        &request.user,
        &request.cart,
    );

    let premium = verdicts
        .iter()
        .find(|verdict| verdict.code == "PREMIUM20")
        .ok_or("missing PREMIUM20 verdict")?;

    assert_eq!(
        premium.outcome,
        Outcome::Ineligible(EligibilityCheck::UserTier)
    );

    Ok(())
}

#[test]
fn exhausted_usage_leaves_no_coupon() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let request = fixture.request("returning", "small")?;

    let result = find_best_coupon(now()?, fixture.catalog(), fixture.ledger(), &request)?;

    assert!(result.is_none());

    Ok(())
}

#[test]
fn newcomer_gets_first_order_coupon() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let request = fixture.request("newcomer", "small")?;

    let result = find_best_coupon(now()?, fixture.catalog(), fixture.ledger(), &request)?
        .ok_or("expected a coupon")?;

    assert_eq!(result.coupon.code, "FIRSTBUY");
    assert_eq!(result.discount_amount, dec!(15));
    assert_eq!(result.final_amount, dec!(35));

    Ok(())
}

#[test]
fn explain_reports_first_failed_check_for_each_coupon() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let request = fixture.request("returning", "gifts")?;
    let usage = fixture.ledger().counts_for(&request.user.user_id);

    let verdicts = explain(
        now()?,
        fixture.catalog().active(),
        &usage,
        &request.user,
        &request.cart,
    );

    let outcomes: Vec<(&str, Outcome)> = verdicts
        .iter()
        .map(|verdict| (verdict.code.as_str(), verdict.outcome))
        .collect();

    assert_eq!(
        outcomes,
        vec![
            ("FLAT100", Outcome::Ineligible(EligibilityCheck::CartValue)),
            ("PREMIUM20", Outcome::Ineligible(EligibilityCheck::UserTier)),
            ("WELCOME10", Outcome::Ineligible(EligibilityCheck::UsageLimit)),
            ("ELECTRO15", Outcome::Ineligible(EligibilityCheck::Categories)),
            ("LOYAL5", Outcome::Ineligible(EligibilityCheck::OrdersPlaced)),
            ("FIRSTBUY", Outcome::Ineligible(EligibilityCheck::FirstOrder)),
            ("EXPIRED50", Outcome::Ineligible(EligibilityCheck::DateRange)),
        ]
    );

    Ok(())
}

#[test]
fn inactive_and_expired_coupons_are_never_candidates() -> TestResult {
    let fixture = Fixture::from_set("default")?;

    let codes: Vec<&str> = fixture
        .catalog()
        .candidates(now()?)
        .map(|(_, coupon)| coupon.code.as_str())
        .collect();

    assert!(!codes.contains(&"PAUSED25"));
    assert!(!codes.contains(&"EXPIRED50"));
    assert_eq!(codes.len(), 6);

    Ok(())
}

#[test]
fn equal_discounts_and_expiry_fall_back_to_code_order() -> TestResult {
    let fixture = Fixture::from_set("ties")?;
    let request = fixture.request("anyone", "standard")?;

    let result = find_best_coupon(now()?, fixture.catalog(), fixture.ledger(), &request)?
        .ok_or("expected a coupon")?;

    assert_eq!(result.coupon.code, "AAA10");
    assert_eq!(result.discount_amount, dec!(100));
    assert_eq!(result.final_amount, dec!(1100));

    Ok(())
}
