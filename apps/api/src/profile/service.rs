//! Profile operations: phone verification lifecycle and SMS preferences.
//!
//! Phone state moves `NoPhone -> Pending (add) -> Verified (correct code)`,
//! and back to `NoPhone` on removal. `sms_enabled` may only be toggled while
//! the phone is verified. Every operation resolves the caller to a user row
//! first and commits at most once.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::auth::AuthUser;
use crate::config::SmsConfig;
use crate::errors::AppError;
use crate::models::user::{SubscriptionTier, User, SMS_VERIFICATION_KEY};
use crate::profile::validation::{normalize_phone_number, validate_verification_code};
use crate::sms::{mask_phone, CodeCheck, SmsRateLimiter, SmsSender, VerificationCodes};
use crate::subscription::Entitlements;
use crate::users::UserStore;

/// Feature name reported by the entitlement check.
pub const SMS_FEATURE: &str = "SMS integration";

/// Add-phone attempts allowed before the counter must be reset.
pub const MAX_VERIFICATION_ATTEMPTS: i32 = 5;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfileResponse {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub subscription_tier: SubscriptionTier,
    pub phone_number: Option<String>,
    pub phone_verified: bool,
    pub sms_enabled: bool,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        ProfileResponse {
            user_id: user.user_id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            subscription_tier: user.subscription_tier,
            phone_number: user.phone_number.clone(),
            phone_verified: user.is_phone_verified(),
            sms_enabled: user.is_sms_enabled(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddPhoneResponse {
    pub message: String,
    pub phone_number: String,
    pub expires_in_minutes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyPhoneResponse {
    pub message: String,
    pub phone_number: String,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmsSettingsResponse {
    pub message: String,
    pub sms_enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmsUsageResponse {
    pub daily_limit: u32,
    pub used_today: u32,
    pub remaining_today: u32,
    pub subscription_tier: SubscriptionTier,
    pub phone_verified: bool,
    pub sms_enabled: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Service
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserStore>,
    entitlements: Arc<dyn Entitlements>,
    codes: Arc<dyn VerificationCodes>,
    sender: Arc<dyn SmsSender>,
    rate_limiter: Arc<dyn SmsRateLimiter>,
    sms_config: SmsConfig,
}

impl ProfileService {
    pub fn new(
        users: Arc<dyn UserStore>,
        entitlements: Arc<dyn Entitlements>,
        codes: Arc<dyn VerificationCodes>,
        sender: Arc<dyn SmsSender>,
        rate_limiter: Arc<dyn SmsRateLimiter>,
        sms_config: SmsConfig,
    ) -> Self {
        Self {
            users,
            entitlements,
            codes,
            sender,
            rate_limiter,
            sms_config,
        }
    }

    async fn resolve_user(&self, caller: &AuthUser) -> Result<User, AppError> {
        Ok(self
            .users
            .get_or_create(&caller.sub, caller.email.as_deref())
            .await?)
    }

    /// Persists the row; the store rolls the transaction back on failure.
    async fn commit(&self, user: &User, action: &str) -> Result<(), AppError> {
        self.users.save(user).await.map_err(|e| {
            error!("Failed to {action} for user {}: {e}", user.id);
            AppError::Database(e)
        })
    }

    pub async fn get_profile(&self, caller: &AuthUser) -> Result<ProfileResponse, AppError> {
        let user = self.resolve_user(caller).await?;
        Ok(ProfileResponse::from(&user))
    }

    pub async fn add_phone_number(
        &self,
        caller: &AuthUser,
        phone_number: &str,
    ) -> Result<AddPhoneResponse, AppError> {
        let phone_number = normalize_phone_number(phone_number)?;
        let mut user = self.resolve_user(caller).await?;

        self.entitlements.check_pro_features(&user, SMS_FEATURE)?;

        if !self.sms_config.is_configured() {
            return Err(AppError::ServiceUnavailable(
                "SMS service is not available at this time".to_string(),
            ));
        }

        if user.verification_attempts() >= MAX_VERIFICATION_ATTEMPTS {
            warn!("User {} exceeded phone verification attempts", user.id);
            return Err(AppError::RateLimited(
                "Too many verification attempts. Please try again later.".to_string(),
            ));
        }

        if self
            .users
            .phone_number_taken(&phone_number, user.id)
            .await?
        {
            return Err(AppError::Conflict(
                "This phone number is already registered to another account".to_string(),
            ));
        }

        let code = self.codes.generate();
        self.codes
            .store(&mut user, &phone_number, &code)
            .await
            .map_err(|e| {
                error!("Failed to store verification code for user {}: {e}", user.id);
                AppError::Sms("Failed to store verification code".to_string())
            })?;

        self.sender
            .send_verification_code(&phone_number, &code)
            .await
            .map_err(|e| {
                error!(
                    "Failed to send verification code to {}: {e}",
                    mask_phone(&phone_number)
                );
                AppError::Sms("Failed to send verification code".to_string())
            })?;

        user.phone_number = Some(phone_number.clone());
        user.phone_verified = Some(false);
        user.phone_verification_attempts = Some(user.verification_attempts() + 1);
        self.commit(&user, "update user phone number").await?;

        info!(
            "Verification code sent to {} for user {} (attempt {})",
            mask_phone(&phone_number),
            user.id,
            user.verification_attempts()
        );

        Ok(AddPhoneResponse {
            message: "Verification code sent to your phone".to_string(),
            phone_number,
            expires_in_minutes: self.sms_config.expires_in_minutes(),
        })
    }

    pub async fn verify_phone_number(
        &self,
        caller: &AuthUser,
        verification_code: &str,
    ) -> Result<VerifyPhoneResponse, AppError> {
        let code = validate_verification_code(verification_code)?;
        let mut user = self.resolve_user(caller).await?;

        self.entitlements.check_pro_features(&user, SMS_FEATURE)?;

        let Some(phone_number) = user.phone_number.clone() else {
            return Err(AppError::BadRequest(
                "No phone number to verify. Please add a phone number first.".to_string(),
            ));
        };

        let metadata_before = user.metadata.clone();
        let outcome = self
            .codes
            .check(&mut user, code)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        if outcome == CodeCheck::Verified {
            user.phone_verification_attempts = Some(0);
            user.sms_enabled = Some(true);
            self.commit(&user, "mark phone verified").await?;

            info!("Phone {} verified for user {}", mask_phone(&phone_number), user.id);
            return Ok(VerifyPhoneResponse {
                message: "Phone number verified successfully".to_string(),
                phone_number,
                verified: true,
            });
        }

        // Keep the wrong-guess bookkeeping even though the request fails.
        if user.metadata != metadata_before {
            self.commit(&user, "record failed verification").await?;
        }
        info!("Verification for user {} failed: {outcome:?}", user.id);

        Err(AppError::BadRequest(
            "Invalid or expired verification code".to_string(),
        ))
    }

    pub async fn remove_phone_number(&self, caller: &AuthUser) -> Result<MessageResponse, AppError> {
        let mut user = self.resolve_user(caller).await?;

        user.phone_number = None;
        user.phone_verified = Some(false);
        user.phone_verification_attempts = Some(0);
        user.phone_verified_at = None;
        user.sms_enabled = Some(false);
        user.remove_metadata_entry(SMS_VERIFICATION_KEY);

        self.commit(&user, "remove phone number").await?;
        info!("Phone number removed for user {}", user.id);

        Ok(MessageResponse {
            message: "Phone number removed successfully".to_string(),
        })
    }

    pub async fn update_sms_settings(
        &self,
        caller: &AuthUser,
        sms_enabled: bool,
    ) -> Result<SmsSettingsResponse, AppError> {
        let mut user = self.resolve_user(caller).await?;

        if !user.is_phone_verified() {
            return Err(AppError::BadRequest(
                "Phone number must be verified before changing SMS settings".to_string(),
            ));
        }

        user.sms_enabled = Some(sms_enabled);
        self.commit(&user, "update SMS settings").await?;

        Ok(SmsSettingsResponse {
            message: "SMS settings updated successfully".to_string(),
            sms_enabled: user.is_sms_enabled(),
        })
    }

    pub async fn get_sms_usage(&self, caller: &AuthUser) -> Result<SmsUsageResponse, AppError> {
        let user = self.resolve_user(caller).await?;

        self.entitlements.check_pro_features(&user, SMS_FEATURE)?;

        let status = self
            .rate_limiter
            .check_rate_limit(&user)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        let daily_limit = self.sms_config.daily_limit(user.subscription_tier);
        let used_today = if status.allowed {
            daily_limit.saturating_sub(status.remaining)
        } else {
            daily_limit
        };

        Ok(SmsUsageResponse {
            daily_limit,
            used_today,
            remaining_today: status.remaining,
            subscription_tier: user.subscription_tier,
            phone_verified: user.is_phone_verified(),
            sms_enabled: user.is_sms_enabled(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::sms::rate_limit::RateLimitStatus;
    use crate::sms::verification::MAX_CODE_GUESSES;
    use crate::subscription::SubscriptionChecker;

    const PHONE: &str = "+15551234567";

    fn wrong_code(code: &str) -> String {
        let first = if code.starts_with('9') { '0' } else { '9' };
        format!("{first}{}", &code[1..])
    }

    async fn add_and_verify(h: &Harness, caller: &AuthUser) {
        h.service.add_phone_number(caller, PHONE).await.unwrap();
        let code = h.sender.last_code().unwrap();
        h.service.verify_phone_number(caller, &code).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_profile_provisions_user_with_defaults() {
        let h = Harness::new();
        let profile = h.service.get_profile(&caller("new-user")).await.unwrap();

        assert_eq!(profile.user_id, "new-user");
        assert_eq!(profile.email.as_deref(), Some("new-user@example.com"));
        assert_eq!(profile.subscription_tier, SubscriptionTier::Free);
        assert_eq!(profile.phone_number, None);
        assert!(!profile.phone_verified);
        assert!(profile.sms_enabled);
        assert!(h.users.get("new-user").is_some());
    }

    #[tokio::test]
    async fn test_add_phone_requires_pro_regardless_of_state() {
        let h = Harness::with(
            SmsConfig::default(),
            Arc::new(SubscriptionChecker),
            RateLimitStatus::from_usage(0, 0),
        );
        let mut user = h.users.seed("free", SubscriptionTier::Free);
        user.phone_verification_attempts = Some(MAX_VERIFICATION_ATTEMPTS);
        h.users.insert(user);

        let err = h
            .service
            .add_phone_number(&caller("free"), PHONE)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(h.sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_add_phone_rejects_malformed_number() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);

        let err = h
            .service
            .add_phone_number(&caller("pro"), "555-1234")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_add_phone_when_sms_unconfigured() {
        let h = Harness::with(
            SmsConfig::default(),
            Arc::new(SubscriptionChecker),
            RateLimitStatus::from_usage(50, 0),
        );
        h.users.seed("pro", SubscriptionTier::Pro);

        let err = h
            .service
            .add_phone_number(&caller("pro"), PHONE)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_add_phone_success_sets_pending_state() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);

        let response = h
            .service
            .add_phone_number(&caller("pro"), "(555) 123-4567")
            .await
            .unwrap();
        assert_eq!(response.phone_number, PHONE);
        assert_eq!(response.expires_in_minutes, 10);

        let user = h.users.get("pro").unwrap();
        assert_eq!(user.phone_number.as_deref(), Some(PHONE));
        assert_eq!(user.phone_verified, Some(false));
        assert_eq!(user.verification_attempts(), 1);
        assert!(user.metadata_entry(SMS_VERIFICATION_KEY).is_some());
        assert_eq!(h.sender.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_sixth_add_attempt_is_rate_limited() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);
        let pro = caller("pro");

        for _ in 0..MAX_VERIFICATION_ATTEMPTS {
            h.service.add_phone_number(&pro, PHONE).await.unwrap();
        }
        let err = h
            .service
            .add_phone_number(&pro, "+1 (202) 555-0143")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RateLimited(_)));
        assert_eq!(h.sender.sent_count(), MAX_VERIFICATION_ATTEMPTS as usize);
        assert_eq!(
            h.users.get("pro").unwrap().verification_attempts(),
            MAX_VERIFICATION_ATTEMPTS
        );
    }

    #[tokio::test]
    async fn test_add_phone_owned_by_other_user_conflicts() {
        let h = Harness::new();
        let mut owner = h.users.seed("owner", SubscriptionTier::Pro);
        owner.phone_number = Some(PHONE.to_string());
        h.users.insert(owner);
        h.users.seed("pro", SubscriptionTier::Pro);

        let err = h
            .service
            .add_phone_number(&caller("pro"), PHONE)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_re_adding_own_number_is_not_a_conflict() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);
        let pro = caller("pro");

        h.service.add_phone_number(&pro, PHONE).await.unwrap();
        h.service.add_phone_number(&pro, PHONE).await.unwrap();
        assert_eq!(h.users.get("pro").unwrap().verification_attempts(), 2);
    }

    #[tokio::test]
    async fn test_send_failure_persists_nothing() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);
        h.sender.fail(true);

        let err = h
            .service
            .add_phone_number(&caller("pro"), PHONE)
            .await
            .unwrap_err();
        match err {
            AppError::Sms(msg) => assert_eq!(msg, "Failed to send verification code"),
            other => panic!("expected Sms error, got {other:?}"),
        }

        let user = h.users.get("pro").unwrap();
        assert_eq!(user.phone_number, None);
        assert_eq!(user.verification_attempts(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_sends_nothing() {
        let h = Harness::with_codes(Arc::new(FailingCodes));
        h.users.seed("pro", SubscriptionTier::Pro);

        let err = h
            .service
            .add_phone_number(&caller("pro"), PHONE)
            .await
            .unwrap_err();
        match err {
            AppError::Sms(msg) => assert_eq!(msg, "Failed to store verification code"),
            other => panic!("expected Sms error, got {other:?}"),
        }
        assert_eq!(h.sender.sent_count(), 0);

        let user = h.users.get("pro").unwrap();
        assert_eq!(user.phone_number, None);
        assert_eq!(user.verification_attempts(), 0);
    }

    #[tokio::test]
    async fn test_commit_failure_surfaces_database_error() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);
        h.users.fail_saves(true);

        let err = h
            .service
            .add_phone_number(&caller("pro"), PHONE)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(h.users.get("pro").unwrap().phone_number, None);
    }

    #[tokio::test]
    async fn test_verify_success_resets_attempts_and_enables_sms() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);
        let pro = caller("pro");

        h.service.add_phone_number(&pro, PHONE).await.unwrap();
        let code = h.sender.last_code().unwrap();
        let response = h.service.verify_phone_number(&pro, &code).await.unwrap();
        assert!(response.verified);
        assert_eq!(response.phone_number, PHONE);

        let user = h.users.get("pro").unwrap();
        assert_eq!(user.verification_attempts(), 0);
        assert!(user.is_phone_verified());
        assert_eq!(user.sms_enabled, Some(true));
        assert!(user.phone_verified_at.is_some());
        assert!(user.metadata_entry(SMS_VERIFICATION_KEY).is_none());
    }

    #[tokio::test]
    async fn test_verify_without_phone_is_bad_request() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);

        let err = h
            .service
            .verify_phone_number(&caller("pro"), "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_verify_rejects_malformed_code() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);

        let err = h
            .service
            .verify_phone_number(&caller("pro"), "12-456")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_verify_requires_pro() {
        let h = Harness::new();
        let mut user = h.users.seed("free", SubscriptionTier::Free);
        user.phone_number = Some(PHONE.to_string());
        h.users.insert(user);

        let err = h
            .service
            .verify_phone_number(&caller("free"), "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_wrong_code_keeps_attempt_counter() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);
        let pro = caller("pro");

        h.service.add_phone_number(&pro, PHONE).await.unwrap();
        let code = h.sender.last_code().unwrap();

        let err = h
            .service
            .verify_phone_number(&pro, &wrong_code(&code))
            .await
            .unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Invalid or expired verification code"),
            other => panic!("expected BadRequest, got {other:?}"),
        }

        let user = h.users.get("pro").unwrap();
        assert_eq!(user.verification_attempts(), 1);
        assert!(!user.is_phone_verified());
        assert_eq!(
            user.metadata_entry(SMS_VERIFICATION_KEY).unwrap()["failed_attempts"],
            1
        );
    }

    #[tokio::test]
    async fn test_guessing_is_capped_per_code() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);
        let pro = caller("pro");

        h.service.add_phone_number(&pro, PHONE).await.unwrap();
        let code = h.sender.last_code().unwrap();
        for _ in 0..MAX_CODE_GUESSES {
            assert!(h
                .service
                .verify_phone_number(&pro, &wrong_code(&code))
                .await
                .is_err());
        }

        let err = h.service.verify_phone_number(&pro, &code).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(!h.users.get("pro").unwrap().is_phone_verified());
    }

    #[tokio::test]
    async fn test_sms_settings_require_verified_phone() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);
        let pro = caller("pro");

        let err = h.service.update_sms_settings(&pro, false).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        h.service.add_phone_number(&pro, PHONE).await.unwrap();
        let err = h.service.update_sms_settings(&pro, false).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_sms_toggle_reflected_in_profile() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);
        let pro = caller("pro");
        add_and_verify(&h, &pro).await;

        let response = h.service.update_sms_settings(&pro, false).await.unwrap();
        assert!(!response.sms_enabled);
        assert!(!h.service.get_profile(&pro).await.unwrap().sms_enabled);

        h.service.update_sms_settings(&pro, true).await.unwrap();
        assert!(h.service.get_profile(&pro).await.unwrap().sms_enabled);
    }

    #[tokio::test]
    async fn test_remove_phone_resets_everything() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);
        let pro = caller("pro");
        add_and_verify(&h, &pro).await;
        h.service.add_phone_number(&pro, "2025550143").await.unwrap();

        let response = h.service.remove_phone_number(&pro).await.unwrap();
        assert_eq!(response.message, "Phone number removed successfully");

        let user = h.users.get("pro").unwrap();
        assert_eq!(user.phone_number, None);
        assert_eq!(user.phone_verified, Some(false));
        assert_eq!(user.phone_verification_attempts, Some(0));
        assert_eq!(user.phone_verified_at, None);
        assert_eq!(user.sms_enabled, Some(false));
        assert!(user.metadata_entry(SMS_VERIFICATION_KEY).is_none());

        let profile = h.service.get_profile(&pro).await.unwrap();
        assert!(!profile.phone_verified);
        assert!(!profile.sms_enabled);
    }

    #[tokio::test]
    async fn test_remove_phone_rolls_back_on_failure() {
        let h = Harness::new();
        h.users.seed("pro", SubscriptionTier::Pro);
        let pro = caller("pro");
        add_and_verify(&h, &pro).await;
        h.users.fail_saves(true);

        let err = h.service.remove_phone_number(&pro).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(h.users.get("pro").unwrap().phone_number.as_deref(), Some(PHONE));
    }

    #[tokio::test]
    async fn test_usage_requires_pro() {
        let h = Harness::new();
        h.users.seed("free", SubscriptionTier::Free);

        let err = h.service.get_sms_usage(&caller("free")).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_usage_free_tier_has_zero_allowance() {
        let h = Harness::with(
            configured_sms(),
            Arc::new(AllowAll),
            RateLimitStatus::from_usage(0, 0),
        );
        h.users.seed("free", SubscriptionTier::Free);

        let usage = h.service.get_sms_usage(&caller("free")).await.unwrap();
        assert_eq!(usage.daily_limit, 0);
        assert_eq!(usage.remaining_today, 0);
        assert_eq!(usage.used_today, 0);
    }

    #[tokio::test]
    async fn test_usage_adds_up_when_allowed() {
        let h = Harness::with(
            configured_sms(),
            Arc::new(SubscriptionChecker),
            RateLimitStatus::from_usage(50, 12),
        );
        h.users.seed("pro", SubscriptionTier::Pro);

        let usage = h.service.get_sms_usage(&caller("pro")).await.unwrap();
        assert_eq!(usage.daily_limit, 50);
        assert_eq!(usage.used_today, 12);
        assert_eq!(usage.remaining_today, 38);
        assert_eq!(usage.used_today + usage.remaining_today, usage.daily_limit);
        assert_eq!(usage.subscription_tier, SubscriptionTier::Pro);
        assert!(usage.sms_enabled);
    }

    #[tokio::test]
    async fn test_usage_exhausted_reports_full_limit() {
        let h = Harness::with(
            configured_sms(),
            Arc::new(SubscriptionChecker),
            RateLimitStatus::from_usage(500, 500),
        );
        h.users.seed("ent", SubscriptionTier::Enterprise);

        let usage = h.service.get_sms_usage(&caller("ent")).await.unwrap();
        assert_eq!(usage.daily_limit, 500);
        assert_eq!(usage.used_today, 500);
        assert_eq!(usage.remaining_today, 0);
    }
}
