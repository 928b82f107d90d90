//! User Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, parse_amount},
    users::{UserContext, UserTier},
};

/// Wrapper for users in YAML
#[derive(Debug, Deserialize)]
pub struct UsersFixture {
    /// Map of user key -> user fixture
    pub users: FxHashMap<String, UserFixture>,
}

/// User fixture from YAML
#[derive(Debug, Deserialize)]
pub struct UserFixture {
    /// User identifier
    pub user_id: String,

    /// Loyalty tier
    pub tier: UserTier,

    /// Two-letter country code
    pub country: String,

    /// Lifetime spend as a decimal string
    #[serde(default = "zero")]
    pub lifetime_spend: String,

    /// Orders already placed
    #[serde(default)]
    pub orders_placed: u32,
}

fn zero() -> String {
    "0".to_string()
}

impl TryFrom<UserFixture> for UserContext {
    type Error = FixtureError;

    fn try_from(fixture: UserFixture) -> Result<Self, Self::Error> {
        Ok(UserContext::new(
            fixture.user_id,
            fixture.tier,
            fixture.country.trim().to_ascii_uppercase(),
            parse_amount(&fixture.lifetime_spend)?,
            fixture.orders_placed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn users_fixture_parses_map() -> TestResult {
        let yaml = r#"
users:
  loyal:
    user_id: u-42
    tier: GOLD
    country: in
    lifetime_spend: "12000.50"
    orders_placed: 17
  newcomer:
    user_id: u-1
    tier: BRONZE
    country: GB
"#;
        let fixture: UsersFixture = serde_norway::from_str(yaml)?;
        let mut users = fixture.users;

        let loyal = UserContext::try_from(users.remove("loyal").ok_or("missing loyal")?)?;
        assert_eq!(loyal.tier, UserTier::Gold);
        assert_eq!(loyal.country, "IN");
        assert_eq!(loyal.lifetime_spend, dec!(12000.50));
        assert_eq!(loyal.orders_placed, 17);

        let newcomer = UserContext::try_from(users.remove("newcomer").ok_or("missing newcomer")?)?;
        assert_eq!(newcomer.lifetime_spend, dec!(0));
        assert!(newcomer.is_first_order());

        Ok(())
    }

    #[test]
    fn user_fixture_rejects_unknown_tier() {
        let yaml = r#"
user_id: u-9
tier: DIAMOND
country: US
"#;
        let result: Result<UserFixture, _> = serde_norway::from_str(yaml);

        assert!(result.is_err());
    }
}
