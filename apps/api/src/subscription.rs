//! Subscription gating for paid features.

use tracing::debug;

use crate::errors::AppError;
use crate::models::user::{SubscriptionTier, User};

/// Capability check for tier-gated features. Swappable in tests.
pub trait Entitlements: Send + Sync {
    /// Fails with `Forbidden` unless the user is on Pro or Enterprise.
    fn check_pro_features(&self, user: &User, feature: &str) -> Result<(), AppError>;
}

/// Default checker: reads the tier straight off the user row.
pub struct SubscriptionChecker;

impl Entitlements for SubscriptionChecker {
    fn check_pro_features(&self, user: &User, feature: &str) -> Result<(), AppError> {
        match user.subscription_tier {
            SubscriptionTier::Pro | SubscriptionTier::Enterprise => Ok(()),
            SubscriptionTier::Free => {
                debug!("User {} denied '{feature}' on free tier", user.user_id);
                Err(AppError::Forbidden(format!(
                    "{feature} requires a Pro or Enterprise subscription"
                )))
            }
        }
    }
}
