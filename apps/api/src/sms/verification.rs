//! Verification codes kept in the user's metadata map.
//!
//! A pending verification lives under `metadata["sms_verification"]`. Only a
//! SHA-256 of `"{user.id}:{code}"` is stored, together with the phone number
//! it was sent to, an expiry and a count of wrong guesses. Callers persist the
//! mutated row; nothing here touches the database.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::user::{User, SMS_VERIFICATION_KEY};

/// Wrong guesses tolerated before a pending code is discarded.
pub const MAX_CODE_GUESSES: u32 = 5;

const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    Verified,
    Mismatch,
    Expired,
    Missing,
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("failed to encode pending verification: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Code generation, storage and checking. Carried as `Arc<dyn VerificationCodes>`.
#[async_trait]
pub trait VerificationCodes: Send + Sync {
    fn generate(&self) -> String;

    /// Records `code` as pending for `phone_number` on the user row.
    async fn store(
        &self,
        user: &mut User,
        phone_number: &str,
        code: &str,
    ) -> Result<(), VerificationError>;

    /// Checks `code` against the pending entry. On success marks the phone verified.
    async fn check(&self, user: &mut User, code: &str) -> Result<CodeCheck, VerificationError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingVerification {
    pub code_hash: String,
    pub phone_number: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub failed_attempts: u32,
}

pub struct MetadataVerificationCodes {
    ttl: Duration,
}

impl MetadataVerificationCodes {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            ttl: Duration::seconds(timeout_secs.min(MAX_TTL_SECS) as i64),
        }
    }
}

fn hash_code(user_id: Uuid, code: &str) -> String {
    hex::encode(Sha256::digest(format!("{user_id}:{code}").as_bytes()))
}

fn pending_for(user: &User) -> Option<PendingVerification> {
    let raw = user.metadata_entry(SMS_VERIFICATION_KEY)?;
    match serde_json::from_value(raw.clone()) {
        Ok(pending) => Some(pending),
        Err(e) => {
            warn!("Discarding unreadable pending verification for {}: {e}", user.id);
            None
        }
    }
}

#[async_trait]
impl VerificationCodes for MetadataVerificationCodes {
    fn generate(&self) -> String {
        format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
    }

    async fn store(
        &self,
        user: &mut User,
        phone_number: &str,
        code: &str,
    ) -> Result<(), VerificationError> {
        let pending = PendingVerification {
            code_hash: hash_code(user.id, code),
            phone_number: phone_number.to_string(),
            expires_at: Utc::now() + self.ttl,
            failed_attempts: 0,
        };
        user.set_metadata_entry(SMS_VERIFICATION_KEY, serde_json::to_value(&pending)?);
        Ok(())
    }

    async fn check(&self, user: &mut User, code: &str) -> Result<CodeCheck, VerificationError> {
        let Some(mut pending) = pending_for(user) else {
            user.remove_metadata_entry(SMS_VERIFICATION_KEY);
            return Ok(CodeCheck::Missing);
        };

        if user.phone_number.as_deref() != Some(pending.phone_number.as_str()) {
            debug!("Pending verification for {} targets a different phone", user.id);
            return Ok(CodeCheck::Missing);
        }

        let now = Utc::now();
        if now >= pending.expires_at {
            user.remove_metadata_entry(SMS_VERIFICATION_KEY);
            return Ok(CodeCheck::Expired);
        }

        if pending.code_hash == hash_code(user.id, code) {
            user.remove_metadata_entry(SMS_VERIFICATION_KEY);
            user.phone_verified = Some(true);
            user.phone_verified_at = Some(now);
            return Ok(CodeCheck::Verified);
        }

        pending.failed_attempts += 1;
        if pending.failed_attempts >= MAX_CODE_GUESSES {
            warn!(
                "Discarding pending verification for {} after {} wrong codes",
                user.id, pending.failed_attempts
            );
            user.remove_metadata_entry(SMS_VERIFICATION_KEY);
        } else {
            user.set_metadata_entry(SMS_VERIFICATION_KEY, serde_json::to_value(&pending)?);
        }
        Ok(CodeCheck::Mismatch)
    }
}
