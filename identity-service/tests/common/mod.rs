use std::sync::Arc;

use identity_service::domain::user::service::IdentityService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::SqliteUserRepository;
use identity_service::outbound::security::Argon2CredentialHasher;
use identity_service::outbound::security::JwtTokenService;
use serde_json::json;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub api_client: reqwest::Client,
    pub tokens: JwtTokenService,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let pool = test_pool().await;

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let token_service = Arc::new(JwtTokenService::new(JWT_SECRET, 24));
        let identity_service = Arc::new(IdentityService::new(
            Arc::new(SqliteUserRepository::new(pool.clone())),
            Arc::new(Argon2CredentialHasher::new()),
            Arc::clone(&token_service),
        ));

        let router = create_router(identity_service, token_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            pool,
            api_client: reqwest::Client::new(),
            tokens: JwtTokenService::new(JWT_SECRET, 24),
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

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user with default profile fields
    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/register")
            .json(&json!({
                "email": email,
                "password": password,
                "firstname": "John",
                "lastname": "Doe",
                "phone": "0812345678",
                "birthday": "1990-01-01"
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the issued token
    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }
}

/// In-memory SQLite pool with migrations applied
pub async fn test_pool() -> SqlitePool {
    // One connection that is never recycled, otherwise the database vanishes
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}
