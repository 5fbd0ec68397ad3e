use std::net::SocketAddr;
use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenIssuer;
use auth_service::config::AboutConfig;
use auth_service::config::CapabilityDescriptor;
use auth_service::config::ServiceDescriptor;
use auth_service::domain::user::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryUserRepository;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub token_issuer: TokenIssuer,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());

        // Cheap Argon2 parameters keep the suite fast.
        let password_hasher =
            PasswordHasher::with_params(8 * 1024, 1, 1).expect("Failed to build password hasher");

        let auth_service = Arc::new(
            AuthService::new(
                Arc::clone(&repository),
                Arc::new(TokenIssuer::new(TEST_SECRET)),
                chrono::Duration::hours(24),
            )
            .with_password_hasher(password_hasher),
        );

        let about = AboutConfig {
            services: vec![ServiceDescriptor {
                name: "auth".to_string(),
                description: "Account registration and login".to_string(),
                actions: vec![CapabilityDescriptor {
                    name: "user_registered".to_string(),
                    description: "A new user registers".to_string(),
                }],
                reactions: vec![],
            }],
        };

        let router = create_router(auth_service, about);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Server error");
        });

        Self {
            address,
            port,
            repository,
            api_client: reqwest::Client::new(),
            token_issuer: TokenIssuer::new(TEST_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user and return the raw response
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "firstName": first_name,
                "lastName": last_name
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the raw response
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
