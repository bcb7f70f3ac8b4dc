use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use thiserror::Error;
use uuid::Uuid;

use crate::config::SmsConfig;
use crate::models::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub remaining: u32,
}

impl RateLimitStatus {
    pub fn from_usage(limit: u32, used: u32) -> Self {
        RateLimitStatus {
            allowed: used < limit,
            remaining: limit.saturating_sub(used),
        }
    }
}

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Daily SMS allowance lookup. Carried as `Arc<dyn SmsRateLimiter>`.
#[async_trait]
pub trait SmsRateLimiter: Send + Sync {
    async fn check_rate_limit(&self, user: &User) -> Result<RateLimitStatus, RateLimitError>;
}

/// Reads the per-day send counter that the notification sender increments in Redis.
/// Requests share one multiplexed connection; clones are cheap handles onto it.
pub struct RedisRateLimiter {
    conn: MultiplexedConnection,
    config: SmsConfig,
}

impl RedisRateLimiter {
    pub fn new(conn: MultiplexedConnection, config: SmsConfig) -> Self {
        Self { conn, config }
    }
}

/// Counter key for one user and one UTC day.
pub fn daily_key(user_id: Uuid, day: NaiveDate) -> String {
    format!("sms:daily:{user_id}:{}", day.format("%Y-%m-%d"))
}

#[async_trait]
impl SmsRateLimiter for RedisRateLimiter {
    async fn check_rate_limit(&self, user: &User) -> Result<RateLimitStatus, RateLimitError> {
        let limit = self.config.daily_limit(user.subscription_tier);
        let key = daily_key(user.id, Utc::now().date_naive());

        let mut conn = self.conn.clone();
        let used: Option<u32> = conn.get(&key).await?;

        Ok(RateLimitStatus::from_usage(limit, used.unwrap_or(0)))
    }
}
