use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::user::User;

/// Persistence seam for user rows. Carried in `ProfileService` as `Arc<dyn UserStore>`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetches the row for an external identity, creating a free-tier row on first sight.
    async fn get_or_create(&self, external_id: &str, email: Option<&str>)
        -> Result<User, sqlx::Error>;

    /// True when `phone_number` belongs to a user other than `excluding`.
    async fn phone_number_taken(&self, phone_number: &str, excluding: Uuid)
        -> Result<bool, sqlx::Error>;

    /// Writes every mutable column of `user` in a single transaction.
    async fn save(&self, user: &User) -> Result<(), sqlx::Error>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_or_create(
        &self,
        external_id: &str,
        email: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        let fresh = User::new(external_id, email);
        let inserted = sqlx::query(
            r#"
            INSERT INTO users
                (id, user_id, email, subscription_tier, metadata, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(fresh.id)
        .bind(&fresh.user_id)
        .bind(&fresh.email)
        .bind(fresh.subscription_tier.as_str())
        .bind(&fresh.metadata)
        .bind(fresh.created_at)
        .bind(fresh.updated_at)
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() > 0 {
            info!("Provisioned user row for {external_id}");
        }

        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(external_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn phone_number_taken(
        &self,
        phone_number: &str,
        excluding: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE phone_number = $1 AND id <> $2)",
        )
        .bind(phone_number)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await
    }

    async fn save(&self, user: &User) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                name = $3,
                phone_number = $4,
                phone_verified = $5,
                phone_verification_attempts = $6,
                phone_verified_at = $7,
                sms_enabled = $8,
                metadata = $9,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.phone_number)
        .bind(user.phone_verified)
        .bind(user.phone_verification_attempts)
        .bind(user.phone_verified_at)
        .bind(user.sms_enabled)
        .bind(&user.metadata)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => tx.commit().await,
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!("Rollback failed for user {}: {rollback_err}", user.id);
                }
                Err(e)
            }
        }
    }
}
