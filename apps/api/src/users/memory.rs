//! In-memory `UserStore` for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::user::{SubscriptionTier, User};
use crate::users::UserStore;

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, User>>,
    fail_saves: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.user_id.clone(), user);
    }

    /// Seeds a user with the given tier and returns its row.
    pub fn seed(&self, external_id: &str, tier: SubscriptionTier) -> User {
        let mut user = User::new(external_id, Some(&format!("{external_id}@example.com")));
        user.subscription_tier = tier;
        self.insert(user.clone());
        user
    }

    pub fn get(&self, external_id: &str) -> Option<User> {
        self.users.lock().unwrap().get(external_id).cloned()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_or_create(
        &self,
        external_id: &str,
        email: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        Ok(users
            .entry(external_id.to_string())
            .or_insert_with(|| User::new(external_id, email))
            .clone())
    }

    async fn phone_number_taken(
        &self,
        phone_number: &str,
        excluding: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .any(|u| u.id != excluding && u.phone_number.as_deref() == Some(phone_number)))
    }

    async fn save(&self, user: &User) -> Result<(), sqlx::Error> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        self.insert(user.clone());
        Ok(())
    }
}
