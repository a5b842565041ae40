//! User repository trait and its in-memory implementation.

use super::{
    errors::{AuthError, AuthResult},
    models::{User, UserRecord},
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Trait for user storage operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user, failing with `EmailTaken` on a duplicate email
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> AuthResult<User>;

    /// Find user by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<UserRecord>>;
}

/// Process-local user store
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    by_email: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.by_email.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> AuthResult<User> {
        let key = email_key(email);

        // Hold the write lock across the duplicate check and the insert
        let mut by_email = self.by_email.write().await;
        if by_email.contains_key(&key) {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: key.clone(),
            created_at: Utc::now(),
        };

        by_email.insert(
            key,
            UserRecord {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<UserRecord>> {
        Ok(self.by_email.read().await.get(&email_key(email)).cloned())
    }
}
