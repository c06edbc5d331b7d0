//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

use seatbook_api::AppState;
use seatbook_auth::{IdentityProvider, JwksIdentityProvider, StaticJwksSource};
use seatbook_core::config::{AppConfig, AuthConfig, CooldownPolicy, SeatingConfig};
use seatbook_database::{DocumentStore, MemoryStore};

/// Base64url HS256 key published under `TEST_KID`.
pub const SECRET: &str = "c2VhdGJvb2stdGVzdC1zaWduaW5nLWtleS0wMTIzNDU2";
/// Key id on every token minted by [`TestApp::token`].
pub const TEST_KID: &str = "test-key";
/// Issuer the test provider trusts.
pub const ISSUER: &str = "https://idp.test";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The store behind the router, for direct inspection
    pub store: Arc<dyn DocumentStore>,
    /// Shared state the router was built with
    pub state: AppState,
}

impl TestApp {
    /// Ten seats priced at 5, reset-on-release cooldown.
    pub async fn new() -> Self {
        Self::with_seating(seating(10, CooldownPolicy::ResetOnRelease)).await
    }

    /// Ten seats with the cooldown carried across releases.
    pub async fn carry_over() -> Self {
        Self::with_seating(seating(10, CooldownPolicy::CarryOver)).await
    }

    /// Create a test application with custom seating rules
    pub async fn with_seating(seating: SeatingConfig) -> Self {
        let config = AppConfig {
            seating,
            auth: auth_config(),
            ..Default::default()
        };
        config.validate().expect("Invalid test config");

        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());

        let keys = json!({
            "keys": [{ "kty": "oct", "kid": TEST_KID, "alg": "HS256", "k": SECRET }]
        });
        let source = StaticJwksSource::from_json(&keys.to_string()).expect("Invalid test JWKS");
        let identity: Arc<dyn IdentityProvider> = Arc::new(
            JwksIdentityProvider::with_source(&config.auth, Arc::new(source))
                .expect("Failed to build identity provider"),
        );

        let cors = config.server.cors.clone();
        let state = AppState::new(config, Arc::clone(&store), identity);
        state
            .coordinator
            .registry()
            .initialize(state.config.seating.seat_count, state.config.seating.seat_price)
            .await
            .expect("Failed to seed seats");

        let router = seatbook_api::build_app(state.clone(), &cors);

        Self {
            router,
            store,
            state,
        }
    }

    /// Mint a valid ID token for `employee`.
    pub fn token(&self, employee: &str) -> String {
        sign(
            TEST_KID,
            json!({
                "sub": format!("sub-{employee}"),
                "uid": employee,
                "name": employee.to_uppercase(),
                "email": format!("{employee}@example.com"),
                "iss": ISSUER,
                "exp": chrono::Utc::now().timestamp() + 600,
            }),
        )
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        send(self.router.clone(), method, path, body, token).await
    }

    /// POST /api/book as `token`
    pub async fn book(&self, token: &str, seat_id: u32) -> TestResponse {
        self.request(
            "POST",
            "/api/book",
            Some(json!({ "seat_id": seat_id })),
            Some(token),
        )
        .await
    }

    /// POST /api/release/{seat_id} as `token`
    pub async fn release(&self, token: &str, seat_id: u32) -> TestResponse {
        self.request("POST", &format!("/api/release/{seat_id}"), None, Some(token))
            .await
    }

    /// GET /api/me as `token`
    pub async fn me(&self, token: &str) -> TestResponse {
        self.request("GET", "/api/me", None, Some(token)).await
    }
}

/// Sign `claims` with the shared test key under `kid`.
pub fn sign(kid: &str, claims: Value) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_base64_secret(SECRET).expect("Invalid test secret");
    encode(&header, &claims, &key).expect("Failed to sign token")
}

/// Seating rules for a test pool of `count` seats.
pub fn seating(count: u32, cooldown_policy: CooldownPolicy) -> SeatingConfig {
    SeatingConfig {
        seat_count: count,
        seat_price: 5,
        cooldown_minutes: 45,
        cooldown_policy,
        max_transaction_retries: 3,
    }
}

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwks_url: format!("{ISSUER}/jwks"),
        issuer: ISSUER.to_string(),
        audience: None,
        algorithms: vec!["HS256".to_string()],
        ..Default::default()
    }
}

/// Send one request through `router`.
pub async fn send(
    router: Router,
    method: &str,
    path: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> TestResponse {
    let body_str = body
        .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
        .unwrap_or_default();

    let mut req = Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json");

    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {}", token));
    }

    let req = req
        .body(Body::from(body_str))
        .expect("Failed to build request");

    let response = router.oneshot(req).await.expect("Failed to send request");

    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");

    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` payload of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The error code of a failure envelope.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
