use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::Utc;

use crate::domain::user::models::AuthResponse;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthError;
use crate::user::errors::RepositoryError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Deadline applied to every repository call unless configured otherwise.
pub const DEFAULT_REPOSITORY_TIMEOUT: Duration = Duration::from_secs(5);

/// Domain service implementation for registration and login.
///
/// Holds no mutable state of its own. Email uniqueness is guaranteed by the
/// repository's atomic insert, not by any lock held here.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: PasswordHasher,
    token_issuer: Arc<TokenIssuer>,
    token_ttl: chrono::Duration,
    repository_timeout: Duration,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `token_issuer` - Issuer holding the process-wide signing secret
    /// * `token_ttl` - Lifetime of tokens issued on register and login
    pub fn new(
        repository: Arc<UR>,
        token_issuer: Arc<TokenIssuer>,
        token_ttl: chrono::Duration,
    ) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
            token_issuer,
            token_ttl,
            repository_timeout: DEFAULT_REPOSITORY_TIMEOUT,
        }
    }

    /// Replace the password hasher (e.g. to change cost parameters).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    /// Set the deadline for each repository call.
    pub fn with_repository_timeout(mut self, timeout: Duration) -> Self {
        self.repository_timeout = timeout;
        self
    }

    /// Await a repository call, failing with `RepositoryUnavailable` once the
    /// deadline passes.
    async fn within_deadline<T, F>(&self, operation: &'static str, call: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, RepositoryError>>,
    {
        match tokio::time::timeout(self.repository_timeout, call).await {
            Ok(result) => result.map_err(|e| {
                if let RepositoryError::Unavailable(_) | RepositoryError::Corrupted(_) = &e {
                    tracing::error!(operation, error = %e, "Repository call failed");
                }
                AuthError::from(e)
            }),
            Err(_) => {
                tracing::error!(
                    operation,
                    timeout_ms = self.repository_timeout.as_millis() as u64,
                    "Repository call timed out"
                );
                Err(AuthError::RepositoryUnavailable(format!(
                    "{} timed out",
                    operation
                )))
            }
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, AuthError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Check `password` against `digest`. With no digest the account is
    /// unknown: the same hashing work is spent and the result is a mismatch.
    async fn verify_password(
        &self,
        password: String,
        digest: Option<String>,
    ) -> Result<bool, AuthError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || match digest {
            Some(digest) => hasher.verify(&password, &digest),
            None => {
                hasher.equalize(&password);
                false
            }
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))
    }

    fn respond(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let token = self
            .token_issuer
            .issue(user.email.as_str(), self.token_ttl)?;

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthResponse, AuthError> {
        let email = EmailAddress::new(command.email)?;
        let password = Password::new(command.password)?;
        let first_name = PersonName::new(command.first_name)?;
        let last_name = PersonName::new(command.last_name)?;

        // Pre-check only; the insert below decides races.
        if self
            .within_deadline(
                "exists_by_email",
                self.repository.exists_by_email(email.as_str()),
            )
            .await?
        {
            tracing::warn!(email = %email, "Registration rejected: email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hash_password(password).await?;

        let user = User {
            id: UserId::new(),
            email,
            password_hash,
            first_name,
            last_name,
            created_at: Utc::now(),
        };

        let created_user = self
            .within_deadline("insert", self.repository.insert(user))
            .await
            .inspect_err(|e| {
                if *e == AuthError::DuplicateEmail {
                    tracing::warn!("Registration lost insert race for an existing email");
                }
            })?;

        tracing::info!(user_id = %created_user.id, "User registered");

        self.respond(&created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthResponse, AuthError> {
        let user = self
            .within_deadline("find_by_email", self.repository.find_by_email(&command.email))
            .await?;

        let digest = user.as_ref().map(|user| user.password_hash.clone());
        let is_valid = self.verify_password(command.password, digest).await?;

        match user {
            Some(user) if is_valid => {
                tracing::info!(user_id = %user.id, "User logged in");
                self.respond(&user)
            }
            _ => {
                tracing::warn!("Login rejected: invalid credentials");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn authenticate_token(&self, token: &str) -> Result<PublicUser, AuthError> {
        let email = self.token_issuer.validate(token)?;

        self.within_deadline("find_by_email", self.repository.find_by_email(&email))
            .await?
            .map(|ref user| user.into())
            .ok_or(AuthError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::outbound::repositories::InMemoryUserRepository;
    use crate::user::errors::ValidationError;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
            async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError>;
            async fn insert(&self, user: User) -> Result<User, RepositoryError>;
        }
    }

    /// Repository whose calls never finish within a test deadline.
    struct StalledUserRepository;

    #[async_trait]
    impl UserRepository for StalledUserRepository {
        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, RepositoryError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }

        async fn exists_by_email(&self, _email: &str) -> Result<bool, RepositoryError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(false)
        }

        async fn insert(&self, user: User) -> Result<User, RepositoryError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(user)
        }
    }

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_params(8 * 1024, 1, 1).unwrap()
    }

    fn service_with<UR: UserRepository>(repository: UR) -> AuthService<UR> {
        AuthService::new(
            Arc::new(repository),
            Arc::new(TokenIssuer::new(SECRET)),
            chrono::Duration::hours(24),
        )
        .with_password_hasher(fast_hasher())
    }

    fn stored_user(email: &str, password: &str) -> User {
        User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: fast_hasher().hash(password).unwrap(),
            first_name: PersonName::new("Ben".to_string()).unwrap(),
            last_name: PersonName::new("Test".to_string()).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_email()
            .withf(|email| email == "alice@example.com")
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_insert()
            .withf(|user| {
                user.email.as_str() == "alice@example.com"
                    && user.first_name.as_str() == "Alice"
                    && user.last_name.as_str() == "Lee"
                    && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = service_with(repository);

        let response = service
            .register(RegisterCommand::new(
                "alice@example.com",
                "P@ssw0rd",
                "Alice",
                "Lee",
            ))
            .await
            .unwrap();

        assert_eq!(response.user.email, "alice@example.com");
        assert_eq!(response.user.first_name, "Alice");
        assert_eq!(response.user.last_name, "Lee");

        let subject = TokenIssuer::new(SECRET).validate(&response.token).unwrap();
        assert_eq!(subject, "alice@example.com");
    }

    #[tokio::test]
    async fn test_register_invalid_email_skips_repository() {
        // No expectations: any repository call panics.
        let service = service_with(MockTestUserRepository::new());

        let result = service
            .register(RegisterCommand::new("not-an-email", "Abc!234", "A", "B"))
            .await;

        assert!(matches!(
            result,
            Err(AuthError::Validation(ValidationError::Email(_)))
        ));
    }

    #[tokio::test]
    async fn test_register_weak_password_skips_repository() {
        let service = service_with(MockTestUserRepository::new());

        let result = service
            .register(RegisterCommand::new("x@y.com", "noSpecialChar1", "A", "B"))
            .await;

        assert!(matches!(
            result,
            Err(AuthError::Validation(ValidationError::Password(_)))
        ));
    }

    #[tokio::test]
    async fn test_register_blank_name_skips_repository() {
        let service = service_with(MockTestUserRepository::new());

        let result = service
            .register(RegisterCommand::new("x@y.com", "Abc!234", " ", "B"))
            .await;

        assert!(matches!(
            result,
            Err(AuthError::Validation(ValidationError::Name(_)))
        ));
    }

    #[tokio::test]
    async fn test_register_existing_email_is_rejected_before_insert() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(true));
        repository.expect_insert().times(0);

        let service = service_with(repository);

        let result = service
            .register(RegisterCommand::new("x@y.com", "Abc!234", "A", "B"))
            .await;

        assert_eq!(result.unwrap_err(), AuthError::DuplicateEmail);
    }

    #[tokio::test]
    async fn test_register_lost_insert_race() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_insert()
            .times(1)
            .returning(|user| Err(RepositoryError::DuplicateEmail(user.email.to_string())));

        let service = service_with(repository);

        let result = service
            .register(RegisterCommand::new("x@y.com", "Abc!234", "A", "B"))
            .await;

        assert_eq!(result.unwrap_err(), AuthError::DuplicateEmail);
    }

    #[tokio::test]
    async fn test_register_same_email_twice_keeps_first_record() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = AuthService::new(
            Arc::clone(&repository),
            Arc::new(TokenIssuer::new(SECRET)),
            chrono::Duration::hours(24),
        )
        .with_password_hasher(fast_hasher());

        let first = service
            .register(RegisterCommand::new("x@y.com", "First!1", "First", "User"))
            .await;
        assert!(first.is_ok());

        let second = service
            .register(RegisterCommand::new("x@y.com", "Second!2", "Second", "User"))
            .await;
        assert_eq!(second.unwrap_err(), AuthError::DuplicateEmail);

        let stored = repository.find_by_email("x@y.com").await.unwrap().unwrap();
        assert_eq!(stored.first_name.as_str(), "First");
        assert!(fast_hasher().verify("First!1", &stored.password_hash));
        assert!(!fast_hasher().verify("Second!2", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_concurrent_registrations_admit_one() {
        let service = Arc::new(service_with(InMemoryUserRepository::new()));

        let mut handles = Vec::new();
        for i in 0..8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .register(RegisterCommand::new(
                        "race@example.com",
                        format!("P@ss{}", i),
                        "Race",
                        "Runner",
                    ))
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert_eq!(e, AuthError::DuplicateEmail),
            }
        }

        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("ben@gmail.com", "bentest!");
        let user_id = user.id;

        repository
            .expect_find_by_email()
            .withf(|email| email == "ben@gmail.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service_with(repository);

        let response = service
            .login(LoginCommand::new("ben@gmail.com", "bentest!"))
            .await
            .unwrap();

        assert_eq!(response.user.id, user_id);
        assert_eq!(response.user.email, "ben@gmail.com");
        assert_eq!(
            TokenIssuer::new(SECRET).validate(&response.token).unwrap(),
            "ben@gmail.com"
        );
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("ben@gmail.com", "bentest!");

        repository
            .expect_find_by_email()
            .returning(move |email| {
                if email == "ben@gmail.com" {
                    Ok(Some(user.clone()))
                } else {
                    Ok(None)
                }
            });

        let service = service_with(repository);

        let wrong_password = service
            .login(LoginCommand::new("ben@gmail.com", "wrongpass"))
            .await
            .unwrap_err();
        let unknown_user = service
            .login(LoginCommand::new("nosuchuser@x.com", "anything"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(unknown_user, AuthError::InvalidCredentials);
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_login_is_case_sensitive() {
        let repository = InMemoryUserRepository::new();
        repository
            .insert(stored_user("ben@gmail.com", "bentest!"))
            .await
            .unwrap();

        let service = service_with(repository);

        let result = service
            .login(LoginCommand::new("Ben@gmail.com", "bentest!"))
            .await;

        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_repository_failure_is_reported() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(RepositoryError::Unavailable("connection refused".to_string())));

        let service = service_with(repository);

        let result = service
            .login(LoginCommand::new("ben@gmail.com", "bentest!"))
            .await;

        assert!(matches!(result, Err(AuthError::RepositoryUnavailable(_))));
    }

    #[tokio::test]
    async fn test_stalled_repository_times_out() {
        let service = service_with(StalledUserRepository)
            .with_repository_timeout(Duration::from_millis(50));

        let login = service
            .login(LoginCommand::new("ben@gmail.com", "bentest!"))
            .await;
        assert!(matches!(login, Err(AuthError::RepositoryUnavailable(_))));

        let register = service
            .register(RegisterCommand::new("x@y.com", "Abc!234", "A", "B"))
            .await;
        assert!(matches!(register, Err(AuthError::RepositoryUnavailable(_))));
    }

    #[tokio::test]
    async fn test_authenticate_token() {
        let repository = InMemoryUserRepository::new();
        repository
            .insert(stored_user("ben@gmail.com", "bentest!"))
            .await
            .unwrap();
        let service = service_with(repository);

        let response = service
            .login(LoginCommand::new("ben@gmail.com", "bentest!"))
            .await
            .unwrap();

        let user = service.authenticate_token(&response.token).await.unwrap();
        assert_eq!(user, response.user);
    }

    #[tokio::test]
    async fn test_authenticate_token_failures() {
        let service = service_with(InMemoryUserRepository::new());
        let issuer = TokenIssuer::new(SECRET);

        let expired = issuer
            .issue("ben@gmail.com", chrono::Duration::zero())
            .unwrap();
        assert_eq!(
            service.authenticate_token(&expired).await.unwrap_err(),
            AuthError::TokenInvalid(auth::TokenError::Expired)
        );

        let forged = TokenIssuer::new(b"another_secret_at_least_32_bytes!!")
            .issue("ben@gmail.com", chrono::Duration::hours(1))
            .unwrap();
        assert_eq!(
            service.authenticate_token(&forged).await.unwrap_err(),
            AuthError::TokenInvalid(auth::TokenError::InvalidSignature)
        );

        let orphan = issuer
            .issue("ghost@example.com", chrono::Duration::hours(1))
            .unwrap();
        assert_eq!(
            service.authenticate_token(&orphan).await.unwrap_err(),
            AuthError::InvalidCredentials
        );
    }
}
