use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::RepositoryError;

/// Process-local user store.
///
/// Assigns sequential ids starting at 1 and enforces email uniqueness under
/// the write lock, like the unique index of the SQL store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    last_id: i64,
}

impl State {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| user.email == email && Some(user.id) != except)
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<UserId, RepositoryError> {
        let mut state = self.state.write().await;

        if state.email_taken(&user.email, None) {
            return Err(RepositoryError::DuplicateEmail(user.email.clone()));
        }

        state.last_id += 1;
        let id = UserId(state.last_id);
        state.users.insert(id, user.clone().with_id(id));

        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let state = self.state.read().await;

        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&user.id) {
            return Err(RepositoryError::NotFound(user.id.to_string()));
        }
        if state.email_taken(&user.email, Some(user.id)) {
            return Err(RepositoryError::DuplicateEmail(user.email.clone()));
        }

        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        self.state
            .write()
            .await
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn exists(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.state.read().await.email_taken(email, None))
    }
}
