use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::RepositoryError;

/// Process-local user store keyed by exact email.
///
/// The write lock is held across the existence check and the insert, so
/// concurrent inserts for one email admit exactly one winner.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.users.read().await.contains_key(email))
    }

    async fn insert(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;

        match users.entry(user.email.as_str().to_string()) {
            Entry::Occupied(entry) => Err(RepositoryError::DuplicateEmail(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(user.clone());
                tracing::debug!(user_id = %user.id, "User stored in memory");
                Ok(user)
            }
        }
    }
}
