use async_trait::async_trait;

use crate::domain::user::models::AuthResponse;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::user::errors::AuthError;
use crate::user::errors::RepositoryError;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and issue a token for it.
    ///
    /// # Arguments
    /// * `command` - Raw email, password, first and last name
    ///
    /// # Returns
    /// Token plus public view of the created user
    ///
    /// # Errors
    /// * `Validation` - Email shape, password policy or names rejected
    /// * `DuplicateEmail` - Email is already registered
    /// * `RepositoryUnavailable` - Store failed or timed out
    async fn register(&self, command: RegisterCommand) -> Result<AuthResponse, AuthError>;

    /// Check credentials and issue a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `RepositoryUnavailable` - Store failed or timed out
    async fn login(&self, command: LoginCommand) -> Result<AuthResponse, AuthError>;

    /// Resolve a bearer token to the user it was issued for.
    ///
    /// # Errors
    /// * `TokenInvalid` - Token is expired, forged or malformed
    /// * `InvalidCredentials` - Token subject no longer exists
    /// * `RepositoryUnavailable` - Store failed or timed out
    async fn authenticate_token(&self, token: &str) -> Result<PublicUser, AuthError>;
}

/// Persistence operations for the user aggregate.
///
/// `insert` is the source of truth for email uniqueness: when two inserts for
/// the same email race, at most one succeeds and the other fails with
/// `DuplicateEmail`.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by exact email.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Check whether a user with this exact email exists.
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError>;

    /// Persist a new user.
    ///
    /// # Returns
    /// Stored user entity
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Unavailable` - Store operation failed
    async fn insert(&self, user: User) -> Result<User, RepositoryError>;
}
