use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),

    #[error("Email domain must be dot-separated: {0}")]
    MissingDomainDot(String),
}

/// Error for Password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must include at least one special character")]
    MissingSpecialCharacter,
}

/// Error for PersonName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("Name must not be blank")]
    Blank,
}

/// Input shape errors, correctable by the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),

    #[error("Invalid name: {0}")]
    Name(#[from] NameError),
}

/// Failures reported by a user repository.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("Repository unavailable: {0}")]
    Unavailable(String),

    #[error("Stored record is invalid: {0}")]
    Corrupted(String),
}

/// Top-level error for register, login and token resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Email already registered")]
    DuplicateEmail,

    // Same message whether the account is missing or the password is wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Repository unavailable: {0}")]
    RepositoryUnavailable(String),

    #[error("Invalid token: {0}")]
    TokenInvalid(auth::TokenError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<EmailError> for AuthError {
    fn from(err: EmailError) -> Self {
        AuthError::Validation(err.into())
    }
}

impl From<PasswordPolicyError> for AuthError {
    fn from(err: PasswordPolicyError) -> Self {
        AuthError::Validation(err.into())
    }
}

impl From<NameError> for AuthError {
    fn from(err: NameError) -> Self {
        AuthError::Validation(err.into())
    }
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEmail(_) => AuthError::DuplicateEmail,
            RepositoryError::Unavailable(msg) => AuthError::RepositoryUnavailable(msg),
            RepositoryError::Corrupted(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<auth::TokenError> for AuthError {
    fn from(err: auth::TokenError) -> Self {
        match err {
            auth::TokenError::EncodingFailed(msg) => AuthError::Internal(msg),
            other => AuthError::TokenInvalid(other),
        }
    }
}
