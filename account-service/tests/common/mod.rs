use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::user::errors::AccountError;
use account_service::domain::user::gate::AuthGate;
use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::User;
use account_service::domain::user::models::UserId;
use account_service::domain::user::ports::UserRepository;
use account_service::domain::user::service::AuthService;
use account_service::inbound::http::handlers::ErrorTranslator;
use account_service::inbound::http::router::cors_layer;
use account_service::inbound::http::router::create_router;
use account_service::outbound::random::ThreadRandom;
use async_trait::async_trait;
use auth::Authenticator;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Credential store kept in process memory, keyed by user id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Flip an account to inactive, as an operator would.
    pub fn deactivate(&self, email: &str) {
        let mut users = self.users.lock().unwrap();
        for user in users.values_mut() {
            if user.email.as_str() == email {
                user.active = false;
            }
        }
    }

    pub fn find(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AccountError> {
        Ok(self.find(email.as_str()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, AccountError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|existing| existing.email == user.email) {
            return Err(AccountError::EmailAlreadyInUse);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryUserRepository>,
    pub authenticator: Arc<Authenticator>,
    pub api_client: reqwest::Client,
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

        let repository = Arc::new(InMemoryUserRepository::default());
        let authenticator = Arc::new(
            Authenticator::new(TEST_SECRET, chrono::Duration::hours(24))
                .expect("Failed to create authenticator"),
        );

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
            Arc::new(ThreadRandom),
        ));
        let auth_gate = Arc::new(AuthGate::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));

        let router = create_router(
            auth_service,
            auth_gate,
            ErrorTranslator::production(),
            cors_layer("http://localhost:3000").expect("Invalid CORS origin"),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            authenticator,
            api_client: reqwest::Client::new(),
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

    /// Register an account and fail the test on anything but 201.
    pub async fn register(&self, name: &str, email: &str, password: &str) {
        let response = self
            .post("/api/auth/register")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    }

    /// Log in and return the issued bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["token"].as_str().expect("token missing").to_string()
    }
}
