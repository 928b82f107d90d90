//! Discounts

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    cart::Cart,
    coupons::{Coupon, DiscountType},
};

/// Decimal places a reported discount is rounded to.
pub const DISCOUNT_DECIMAL_PLACES: u32 = 2;

/// Calculates the discount a coupon gives on a cart.
///
/// The result is never negative and never exceeds the cart value.
pub fn calculate_discount(coupon: &Coupon, cart: &Cart) -> Decimal {
    discount_on_value(coupon, cart.value())
}

/// Calculates the discount a coupon gives on an already aggregated cart value.
pub fn discount_on_value(coupon: &Coupon, cart_value: Decimal) -> Decimal {
    let discount = match coupon.discount_type {
        DiscountType::Flat => coupon.discount_value.min(cart_value),
        DiscountType::Percent => {
            let discount = percent_of(cart_value, coupon.discount_value);

            coupon
                .max_discount_amount
                .map_or(discount, |max| discount.min(max))
        }
    };

    discount.clamp(Decimal::ZERO, cart_value.max(Decimal::ZERO))
}

/// `value * percent / 100`, dividing first when the product would overflow.
fn percent_of(value: Decimal, percent: Decimal) -> Decimal {
    value.checked_mul(percent).map_or_else(
        || (value / Decimal::ONE_HUNDRED).saturating_mul(percent),
        |product| product / Decimal::ONE_HUNDRED,
    )
}

/// Round a discount to the reported precision, halves away from zero.
pub fn round_discount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        DISCOUNT_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use crate::cart::CartLine;

    use super::*;

    fn coupon(discount_type: DiscountType, value: Decimal) -> Result<Coupon, jiff::Error> {
        Ok(Coupon::new(
            "TEST",
            "Discount for testing",
            discount_type,
            value,
            "2024-01-01T00:00:00Z".parse()?,
            "2024-12-31T23:59:59Z".parse()?,
        ))
    }

    fn cart(value: Decimal) -> Cart {
        Cart::with_lines([CartLine::new("p-1", "general", value, 1)])
    }

    #[test]
    fn flat_discount_applies_full_value() -> TestResult {
        let coupon = coupon(DiscountType::Flat, dec!(100))?;

        assert_eq!(calculate_discount(&coupon, &cart(dec!(1200))), dec!(100));

        Ok(())
    }

    #[test]
    fn flat_discount_never_exceeds_cart_value() -> TestResult {
        let coupon = coupon(DiscountType::Flat, dec!(100))?;

        assert_eq!(calculate_discount(&coupon, &cart(dec!(40))), dec!(40));
        assert_eq!(calculate_discount(&coupon, &Cart::new()), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn percent_discount_without_cap() -> TestResult {
        let coupon = coupon(DiscountType::Percent, dec!(15))?;

        assert_eq!(calculate_discount(&coupon, &cart(dec!(200))), dec!(30));

        Ok(())
    }

    #[test]
    fn percent_discount_is_capped() -> TestResult {
        let coupon = coupon(DiscountType::Percent, dec!(20))?.with_max_discount(dec!(1000));

        assert_eq!(calculate_discount(&coupon, &cart(dec!(10000))), dec!(1000));
        assert_eq!(calculate_discount(&coupon, &cart(dec!(4000))), dec!(800));

        Ok(())
    }

    #[test]
    fn percent_over_one_hundred_is_bounded_by_cart_value() -> TestResult {
        let coupon = coupon(DiscountType::Percent, dec!(150))?;

        assert_eq!(calculate_discount(&coupon, &cart(dec!(80))), dec!(80));

        Ok(())
    }

    #[test]
    fn round_discount_rounds_half_away_from_zero() {
        assert_eq!(round_discount(dec!(10.005)), dec!(10.01));
        assert_eq!(round_discount(dec!(10.004)), dec!(10.00));
        assert_eq!(round_discount(dec!(33.3333)), dec!(33.33));
    }

    #[test]
    fn percent_discount_on_huge_cart_does_not_overflow() -> TestResult {
        let half_max = Decimal::MAX / Decimal::TWO;
        let full = coupon(DiscountType::Percent, dec!(100))?;
        let fifth = coupon(DiscountType::Percent, dec!(20))?;

        let discount = calculate_discount(&full, &cart(half_max));
        assert!(discount > Decimal::ZERO);
        assert!(discount <= half_max);

        let discount = calculate_discount(&fifth, &cart(half_max));
        assert!(discount > Decimal::ZERO);
        assert!(discount < half_max);

        Ok(())
    }

    #[test]
    fn discount_stays_within_bounds() -> TestResult {
        let values = [dec!(0), dec!(0.01), dec!(9.99), dec!(500), dec!(123456.78)];
        let coupons = [
            coupon(DiscountType::Flat, dec!(50))?,
            coupon(DiscountType::Flat, dec!(100000))?,
            coupon(DiscountType::Percent, dec!(7.5))?,
            coupon(DiscountType::Percent, dec!(100))?,
            coupon(DiscountType::Percent, dec!(30))?.with_max_discount(dec!(25)),
        ];

        for value in values {
            for coupon in &coupons {
                let discount = calculate_discount(coupon, &cart(value));

                assert!(discount >= Decimal::ZERO, "{} gave {discount}", coupon.code);
                assert!(discount <= value, "{} gave {discount} on {value}", coupon.code);
            }
        }

        Ok(())
    }
}
