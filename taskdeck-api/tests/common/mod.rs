/// Common test utilities for integration tests
///
/// Shared infrastructure for driving the router end-to-end:
/// - Test database setup (skipped gracefully when DATABASE_URL is unset)
/// - Test user creation with ready-made session tokens
/// - Request/response helpers

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::{ApiConfig, Config, DatabaseConfig, SessionConfig};
use taskdeck_shared::auth::password;
use taskdeck_shared::auth::token::{create_token, Claims};
use taskdeck_shared::models::user::{CreateUser, User};
use uuid::Uuid;

/// Fixed signing secret for the test app
pub const TEST_SECRET: &str = "integration-test-secret-key-32-bytes!!";

/// Test context containing the database pool and a ready-to-call router
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a test context against the database in DATABASE_URL
    ///
    /// Returns `Ok(None)` when DATABASE_URL is not set so the suite can
    /// run (and trivially pass) on machines without a database.
    pub async fn try_new() -> anyhow::Result<Option<Self>> {
        dotenvy::dotenv().ok();

        let Ok(url) = std::env::var("DATABASE_URL") else {
            return Ok(None);
        };

        let db = PgPool::connect(&url).await?;

        // Migration path is relative to the crate manifest
        sqlx::migrate!("../migrations").run(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
            session: SessionConfig {
                secret: TEST_SECRET.to_string(),
                ttl_hours: 1,
            },
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(Some(TestContext { db, app }))
    }

    /// Creates a user directly in the store and mints a session token
    ///
    /// Email is randomized so tests don't collide on the unique index.
    pub async fn create_user(&self, password_plain: &str) -> anyhow::Result<(User, String)> {
        let user = User::create(
            &self.db,
            CreateUser {
                email: format!("test-{}@example.com", Uuid::new_v4()),
                username: "tester".to_string(),
                password_hash: password::hash_password(password_plain)?,
            },
        )
        .await?;

        let claims = Claims::new(user.id, chrono::Duration::hours(1));
        let token = create_token(&claims, TEST_SECRET)?;

        Ok((user, token))
    }

    /// Removes a test user; tasks go with it via cascade
    pub async fn cleanup_user(&self, id: Uuid) -> anyhow::Result<()> {
        User::delete(&self.db, id).await?;
        Ok(())
    }
}

/// Builds a JSON request, optionally authenticated via bearer token
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends a request through the router
pub async fn call(app: &axum::Router, request: Request<Body>) -> Response<axum::body::Body> {
    use tower::Service as _;

    app.clone().call(request).await.unwrap()
}

/// Reads a response body as JSON (Null for empty bodies)
pub async fn read_json(response: Response<axum::body::Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

/// Sends a request and returns status plus parsed JSON body
pub async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = call(app, req).await;
    let status = response.status();
    let body = read_json(response).await;
    (status, body)
}

/// Extracts the session token value from a Set-Cookie header, if any
pub fn session_cookie_value(response: &Response<axum::body::Body>) -> Option<String> {
    let header = response
        .headers()
        .get(axum::http::header::SET_COOKIE)?
        .to_str()
        .ok()?;

    let rest = header.strip_prefix("token=")?;
    let value = rest.split(';').next().unwrap_or("");

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
