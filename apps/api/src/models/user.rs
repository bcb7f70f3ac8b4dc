use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata key holding a pending phone verification.
pub const SMS_VERIFICATION_KEY: &str = "sms_verification";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Pro,
    Enterprise,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Pro => "pro",
            SubscriptionTier::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown subscription tier '{0}'")]
pub struct UnknownTier(String);

impl FromStr for SubscriptionTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "free" => Ok(SubscriptionTier::Free),
            "pro" => Ok(SubscriptionTier::Pro),
            "enterprise" => Ok(SubscriptionTier::Enterprise),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

impl TryFrom<String> for SubscriptionTier {
    type Error = UnknownTier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    /// Subject of the external identity provider.
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    #[sqlx(try_from = "String")]
    pub subscription_tier: SubscriptionTier,
    pub phone_number: Option<String>,
    pub phone_verified: Option<bool>,
    pub phone_verification_attempts: Option<i32>,
    pub phone_verified_at: Option<DateTime<Utc>>,
    pub sms_enabled: Option<bool>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A fresh free-tier account for an identity seen for the first time.
    pub fn new(external_id: &str, email: Option<&str>) -> Self {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            user_id: external_id.to_string(),
            email: email.map(String::from),
            name: None,
            subscription_tier: SubscriptionTier::Free,
            phone_number: None,
            phone_verified: None,
            phone_verification_attempts: None,
            phone_verified_at: None,
            sms_enabled: None,
            metadata: Value::Object(Default::default()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_phone_verified(&self) -> bool {
        self.phone_verified.unwrap_or(false)
    }

    /// Unset means the user never opted out.
    pub fn is_sms_enabled(&self) -> bool {
        self.sms_enabled.unwrap_or(true)
    }

    pub fn verification_attempts(&self) -> i32 {
        self.phone_verification_attempts.unwrap_or(0)
    }

    pub fn metadata_entry(&self, key: &str) -> Option<&Value> {
        self.metadata.as_object().and_then(|m| m.get(key))
    }

    /// Inserts into the metadata map, replacing a non-object value if needed.
    pub fn set_metadata_entry(&mut self, key: &str, value: Value) {
        if !self.metadata.is_object() {
            self.metadata = Value::Object(Default::default());
        }
        if let Some(map) = self.metadata.as_object_mut() {
            map.insert(key.to_string(), value);
        }
    }

    pub fn remove_metadata_entry(&mut self, key: &str) -> Option<Value> {
        self.metadata.as_object_mut().and_then(|m| m.remove(key))
    }
}
