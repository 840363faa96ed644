//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::MSG_USERNAME_IN_USE;
use crate::domain::{NewUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a user whose fields already passed validation.
    ///
    /// Fails with a `username` validation error when the name is taken.
    async fn signup(&self, new_user: NewUser) -> AppResult<User>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn signup(&self, new_user: NewUser) -> AppResult<User> {
        if self.repo.exists_by_username(&new_user.username).await? {
            tracing::debug!(username = %new_user.username, "Signup rejected: username in use");
            return Err(AppError::field("username", MSG_USERNAME_IN_USE));
        }

        let NewUser {
            username,
            display_name,
            password,
        } = new_user;
        let password = Password::hash_blocking(password).await?;

        let user = self
            .repo
            .save(username, display_name, password.into_string())
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");

        Ok(user)
    }
}
