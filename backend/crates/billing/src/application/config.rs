//! Application Configuration
//!
//! Configuration for the billing application layer, including the
//! plan catalog served publicly and consulted on payment approval.

use auth::models::premium_tier::PremiumTier;
use serde::Serialize;

/// A purchasable premium plan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub tier: &'static str,
    /// Price in minor currency units
    pub price: i64,
    pub duration_days: i64,
    pub features: &'static [&'static str],
}

/// Billing application configuration
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Transactions shown on the dashboard
    pub dashboard_transaction_limit: i64,
    /// Support contact surfaced on the dashboard
    pub support_contact: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            dashboard_transaction_limit: 10,
            support_contact: "support@localhost".to_string(),
        }
    }
}

impl BillingConfig {
    /// The fixed plan catalog
    pub fn plans(&self) -> [Plan; 3] {
        [
            Plan {
                tier: PremiumTier::Basic.code(),
                price: 500,
                duration_days: PremiumTier::Basic.duration_days(),
                features: &[
                    "Daily premium odds tips",
                    "Booking code access",
                ],
            },
            Plan {
                tier: PremiumTier::Standard.code(),
                price: 1500,
                duration_days: PremiumTier::Standard.duration_days(),
                features: &[
                    "Daily premium odds tips",
                    "Booking code access",
                    "Live session invitations",
                ],
            },
            Plan {
                tier: PremiumTier::Ultimate.code(),
                price: 3000,
                duration_days: PremiumTier::Ultimate.duration_days(),
                features: &[
                    "Daily premium odds tips",
                    "Booking code access",
                    "Live session invitations",
                    "Direct analyst support",
                ],
            },
        ]
    }

    /// The catalog entry for a tier, None for `PremiumTier::None`
    pub fn plan_for(&self, tier: PremiumTier) -> Option<Plan> {
        self.plans().into_iter().find(|p| p.tier == tier.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_prices_and_durations() {
        let config = BillingConfig::default();
        let plans = config.plans();
        assert_eq!(plans[0].price, 500);
        assert_eq!(plans[0].duration_days, 7);
        assert_eq!(plans[1].price, 1500);
        assert_eq!(plans[1].duration_days, 21);
        assert_eq!(plans[2].price, 3000);
        assert_eq!(plans[2].duration_days, 30);
    }

    #[test]
    fn test_plan_for_none_tier() {
        let config = BillingConfig::default();
        assert!(config.plan_for(PremiumTier::None).is_none());
        assert!(config.plan_for(PremiumTier::Ultimate).is_some());
    }
}
