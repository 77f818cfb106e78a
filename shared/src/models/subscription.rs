//! Subscription tiers and their entitlements
//!
//! Billing lives outside this service; the tier a user is on is read-only
//! here and only consulted for entitlement checks.

use serde::{Deserialize, Serialize};

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Basic,
    Standard,
    Premium,
}

/// What a tier entitles the user to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub max_products: i64,
    pub can_customize_banner: bool,
    pub can_remove_branding: bool,
}

impl SubscriptionTier {
    /// Database string form
    pub const fn as_db(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }

    /// Parse the database string form; unknown values fall back to Free
    pub fn from_db(s: &str) -> Self {
        match s {
            "basic" => Self::Basic,
            "standard" => Self::Standard,
            "premium" => Self::Premium,
            _ => Self::Free,
        }
    }

    /// Entitlements for this tier
    pub const fn limits(&self) -> TierLimits {
        match self {
            Self::Free => TierLimits {
                max_products: 1,
                can_customize_banner: false,
                can_remove_branding: false,
            },
            Self::Basic => TierLimits {
                max_products: 5,
                can_customize_banner: false,
                can_remove_branding: false,
            },
            Self::Standard => TierLimits {
                max_products: 30,
                can_customize_banner: true,
                can_remove_branding: false,
            },
            Self::Premium => TierLimits {
                max_products: 50,
                can_customize_banner: true,
                can_remove_branding: true,
            },
        }
    }
}
