//! Users

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Loyalty tier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserTier {
    /// Entry tier
    Bronze,

    /// Second tier
    Silver,

    /// Third tier
    Gold,

    /// Top tier
    Platinum,
}

impl UserTier {
    /// Every tier, lowest first.
    pub const ALL: [UserTier; 4] = [
        UserTier::Bronze,
        UserTier::Silver,
        UserTier::Gold,
        UserTier::Platinum,
    ];

    /// Upper-case name of the tier.
    pub fn as_str(self) -> &'static str {
        match self {
            UserTier::Bronze => "BRONZE",
            UserTier::Silver => "SILVER",
            UserTier::Gold => "GOLD",
            UserTier::Platinum => "PLATINUM",
        }
    }
}

impl fmt::Display for UserTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`UserTier`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown user tier: {0}")]
pub struct UnknownUserTier(pub String);

impl FromStr for UserTier {
    type Err = UnknownUserTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserTier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownUserTier(s.to_string()))
    }
}

/// Facts about the user requesting a coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    /// User identifier
    pub user_id: String,

    /// Loyalty tier
    pub tier: UserTier,

    /// Two-letter country code
    pub country: String,

    /// Total amount spent over the user's lifetime
    pub lifetime_spend: Decimal,

    /// Number of orders already placed
    pub orders_placed: u32,
}

impl UserContext {
    /// Create a user context. The country code is trimmed and upper-cased.
    pub fn new(
        user_id: impl Into<String>,
        tier: UserTier,
        country: impl Into<String>,
        lifetime_spend: Decimal,
        orders_placed: u32,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            tier,
            country: country.into().trim().to_ascii_uppercase(),
            lifetime_spend,
            orders_placed,
        }
    }

    /// Whether the user has never placed an order.
    pub fn is_first_order(&self) -> bool {
        self.orders_placed == 0
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn tier_parses_case_insensitively() -> TestResult {
        assert_eq!("gold".parse::<UserTier>()?, UserTier::Gold);
        assert_eq!(" PLATINUM ".parse::<UserTier>()?, UserTier::Platinum);

        Ok(())
    }

    #[test]
    fn tier_rejects_unknown_names() {
        assert_eq!(
            "diamond".parse::<UserTier>(),
            Err(UnknownUserTier("diamond".to_string()))
        );
    }

    #[test]
    fn tier_display_round_trips() -> TestResult {
        for tier in UserTier::ALL {
            assert_eq!(tier.to_string().parse::<UserTier>()?, tier);
        }

        Ok(())
    }

    #[test]
    fn new_normalizes_country() {
        let user = UserContext::new("u-1", UserTier::Silver, " in ", dec!(0), 0);

        assert_eq!(user.country, "IN");
    }

    #[test]
    fn first_order_only_when_no_orders_placed() {
        let mut user = UserContext::new("u-1", UserTier::Bronze, "GB", dec!(0), 0);

        assert!(user.is_first_order());

        user.orders_placed = 1;

        assert!(!user.is_first_order());
    }
}
