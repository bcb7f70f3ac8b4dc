use anyhow::{Context, Result};

use crate::models::user::SubscriptionTier;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    /// HS256 secret used by the identity provider to sign access tokens.
    pub jwt_secret: String,
    pub port: u16,
    pub rust_log: String,
    pub cors_origins: String,
    pub sms: SmsConfig,
}

/// SMS gateway settings and per-tier limits.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub gateway_url: Option<String>,
    pub api_key: Option<String>,
    pub from_number: Option<String>,
    /// Lifetime of a verification code, in seconds.
    pub verification_timeout_secs: u64,
    pub rate_limit_pro: u32,
    pub rate_limit_enterprise: u32,
}

impl Default for SmsConfig {
    fn default() -> Self {
        SmsConfig {
            gateway_url: None,
            api_key: None,
            from_number: None,
            verification_timeout_secs: 600,
            rate_limit_pro: 50,
            rate_limit_enterprise: 500,
        }
    }
}

impl SmsConfig {
    /// The gateway is usable only when all three credentials are present.
    pub fn is_configured(&self) -> bool {
        self.gateway_url.is_some() && self.api_key.is_some() && self.from_number.is_some()
    }

    /// Daily SMS allowance for a tier. Free accounts get none.
    pub fn daily_limit(&self, tier: SubscriptionTier) -> u32 {
        match tier {
            SubscriptionTier::Enterprise => self.rate_limit_enterprise,
            SubscriptionTier::Pro => self.rate_limit_pro,
            SubscriptionTier::Free => 0,
        }
    }

    pub fn expires_in_minutes(&self) -> u64 {
        self.verification_timeout_secs / 60
    }

    fn from_env() -> Result<Self> {
        let defaults = SmsConfig::default();
        Ok(SmsConfig {
            gateway_url: optional_env("SMS_GATEWAY_URL"),
            api_key: optional_env("SMS_API_KEY"),
            from_number: optional_env("SMS_FROM_NUMBER"),
            verification_timeout_secs: parse_env(
                "SMS_VERIFICATION_TIMEOUT",
                defaults.verification_timeout_secs,
            )?,
            rate_limit_pro: parse_env("SMS_RATE_LIMIT_PRO", defaults.rate_limit_pro)?,
            rate_limit_enterprise: parse_env(
                "SMS_RATE_LIMIT_ENTERPRISE",
                defaults.rate_limit_enterprise,
            )?,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            jwt_secret: require_env("SUPABASE_JWT_SECRET")?,
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            cors_origins: std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            sms: SmsConfig::from_env()?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and empty variables both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
