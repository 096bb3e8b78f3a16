/// Integration tests for the Taskdeck API
///
/// These drive the full router end-to-end: session resolution, owner
/// scoping, validation, and the status-toggle semantics. They need a
/// PostgreSQL instance via DATABASE_URL and skip themselves when none is
/// configured.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use serde_json::json;
use uuid::Uuid;

/// Shorthand for the skip-without-database guard
macro_rules! test_context {
    () => {
        match TestContext::try_new().await.unwrap() {
            Some(ctx) => ctx,
            None => {
                eprintln!("DATABASE_URL not set; skipping integration test");
                return;
            }
        }
    };
}

#[tokio::test]
async fn test_register_login_me_roundtrip() {
    let ctx = test_context!();

    let email = format!("roundtrip-{}@example.com", Uuid::new_v4());

    // Register
    let response = common::call(
        &ctx.app,
        common::request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": "jane",
                "email": email,
                "password": "secret123"
            })),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    // Registration must not log the user in
    assert!(common::session_cookie_value(&response).is_none());

    let body = common::read_json(response).await;
    assert_eq!(body["user"]["email"], json!(email));
    assert_eq!(body["user"]["username"], json!("jane"));
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());

    let user_id: Uuid = body["user"]["id"].as_str().unwrap().parse().unwrap();

    // Login sets the session cookie
    let response = common::call(
        &ctx.app,
        common::request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": "secret123" })),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let session = common::session_cookie_value(&response).expect("login should set cookie");

    let body = common::read_json(response).await;
    assert_eq!(body["user"]["email"], json!(email));

    // The cookie resolves back to the same user via /auth/me
    let me_request = Request::builder()
        .method("GET")
        .uri("/auth/me")
        .header("cookie", format!("token={}", session))
        .body(Body::empty())
        .unwrap();

    let (status, body) = common::send(&ctx.app, me_request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], json!(user_id.to_string()));

    ctx.cleanup_user(user_id).await.unwrap();
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = test_context!();

    let (user, _token) = ctx.create_user("correct-password").await.unwrap();

    // Wrong password for a real account
    let (status_wrong, body_wrong) = common::send(
        &ctx.app,
        common::request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": user.email, "password": "wrong-password" })),
        ),
    )
    .await;

    // Account that does not exist at all
    let (status_unknown, body_unknown) = common::send(
        &ctx.app,
        common::request(
            "POST",
            "/auth/login",
            None,
            Some(json!({
                "email": format!("nobody-{}@example.com", Uuid::new_v4()),
                "password": "whatever-password"
            })),
        ),
    )
    .await;

    assert_eq!(status_wrong, StatusCode::UNAUTHORIZED);
    assert_eq!(status_unknown, StatusCode::UNAUTHORIZED);

    // Identical error shape, so responses cannot enumerate accounts
    assert_eq!(body_wrong, body_unknown);

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let ctx = test_context!();

    let email = format!("dup-{}@example.com", Uuid::new_v4());
    let register_body = json!({
        "username": "jane",
        "email": email,
        "password": "secret123"
    });

    let (status, body) = common::send(
        &ctx.app,
        common::request("POST", "/auth/register", None, Some(register_body.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id: Uuid = body["user"]["id"].as_str().unwrap().parse().unwrap();

    let (status, _body) = common::send(
        &ctx.app,
        common::request("POST", "/auth/register", None, Some(register_body)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    ctx.cleanup_user(user_id).await.unwrap();
}

#[tokio::test]
async fn test_register_validation() {
    let ctx = test_context!();

    // Password below six characters
    let (status, _) = common::send(
        &ctx.app,
        common::request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": "jane",
                "email": format!("short-{}@example.com", Uuid::new_v4()),
                "password": "12345"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Malformed email
    let (status, _) = common::send(
        &ctx.app,
        common::request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": "jane",
                "email": "not-an-email",
                "password": "secret123"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Username below three characters
    let (status, _) = common::send(
        &ctx.app,
        common::request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": "ab",
                "email": format!("tiny-{}@example.com", Uuid::new_v4()),
                "password": "secret123"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_task_routes_require_authentication() {
    let ctx = test_context!();

    let (status, _) = common::send(&ctx.app, common::request("GET", "/tasks", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = common::send(
        &ctx.app,
        common::request("GET", "/tasks", Some("garbage-token"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = common::send(
        &ctx.app,
        common::request("POST", "/tasks", None, Some(json!({ "title": "x" }))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_get_roundtrip() {
    let ctx = test_context!();
    let (user, token) = ctx.create_user("secret123").await.unwrap();

    let (status, created) = common::send(
        &ctx.app,
        common::request(
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({ "title": "Buy milk" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], json!("Buy milk"));
    assert_eq!(created["description"], json!(""));
    assert_eq!(created["status"], json!("pending"));

    let id = created["id"].as_str().unwrap();

    // A second task gets a distinct id
    let (_, other) = common::send(
        &ctx.app,
        common::request(
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({ "title": "Something else" })),
        ),
    )
    .await;
    assert_ne!(other["id"], created["id"]);

    let (status, fetched) = common::send(
        &ctx.app,
        common::request("GET", &format!("/tasks/{}", id), Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], json!("Buy milk"));
    assert_eq!(fetched["status"], json!("pending"));

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
async fn test_create_rejects_blank_title() {
    let ctx = test_context!();
    let (user, token) = ctx.create_user("secret123").await.unwrap();

    for body in [json!({ "title": "  " }), json!({ "title": "" }), json!({})] {
        let (status, _) = common::send(
            &ctx.app,
            common::request("POST", "/tasks", Some(&token), Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
async fn test_create_trims_fields() {
    let ctx = test_context!();
    let (user, token) = ctx.create_user("secret123").await.unwrap();

    let (status, created) = common::send(
        &ctx.app,
        common::request(
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({ "title": "  Trim me  ", "description": "  and me  " })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], json!("Trim me"));
    assert_eq!(created["description"], json!("and me"));

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
async fn test_list_orders_newest_first() {
    let ctx = test_context!();
    let (user, token) = ctx.create_user("secret123").await.unwrap();

    for title in ["first", "second", "third"] {
        let (status, _) = common::send(
            &ctx.app,
            common::request("POST", "/tasks", Some(&token), Some(json!({ "title": title }))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) =
        common::send(&ctx.app, common::request("GET", "/tasks", Some(&token), None)).await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
async fn test_update_is_partial() {
    let ctx = test_context!();
    let (user, token) = ctx.create_user("secret123").await.unwrap();

    let (_, created) = common::send(
        &ctx.app,
        common::request(
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({ "title": "Original", "description": "keep me" })),
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    // Title-only update leaves description and status alone
    let (status, updated) = common::send(
        &ctx.app,
        common::request(
            "PUT",
            &format!("/tasks/{}", id),
            Some(&token),
            Some(json!({ "title": "Renamed" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], json!("Renamed"));
    assert_eq!(updated["description"], json!("keep me"));
    assert_eq!(updated["status"], json!("pending"));

    // Explicit status set
    let (status, updated) = common::send(
        &ctx.app,
        common::request(
            "PUT",
            &format!("/tasks/{}", id),
            Some(&token),
            Some(json!({ "status": "completed" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], json!("completed"));

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
async fn test_update_validation() {
    let ctx = test_context!();
    let (user, token) = ctx.create_user("secret123").await.unwrap();

    let (_, created) = common::send(
        &ctx.app,
        common::request("POST", "/tasks", Some(&token), Some(json!({ "title": "t" }))),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    // Status outside the enum
    let (status, _) = common::send(
        &ctx.app,
        common::request(
            "PUT",
            &format!("/tasks/{}", id),
            Some(&token),
            Some(json!({ "status": "archived" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Explicit title that trims to empty
    let (status, _) = common::send(
        &ctx.app,
        common::request(
            "PUT",
            &format!("/tasks/{}", id),
            Some(&token),
            Some(json!({ "title": "   " })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
async fn test_toggle_flips_and_is_idempotent_over_two_calls() {
    let ctx = test_context!();
    let (user, token) = ctx.create_user("secret123").await.unwrap();

    let (_, created) = common::send(
        &ctx.app,
        common::request("POST", "/tasks", Some(&token), Some(json!({ "title": "t" }))),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], json!("pending"));

    let (status, toggled) = common::send(
        &ctx.app,
        common::request("PATCH", &format!("/tasks/{}/toggle", id), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["status"], json!("completed"));

    let (status, toggled) = common::send(
        &ctx.app,
        common::request("PATCH", &format!("/tasks/{}/toggle", id), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["status"], json!("pending"));

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
async fn test_delete_then_get_returns_404() {
    let ctx = test_context!();
    let (user, token) = ctx.create_user("secret123").await.unwrap();

    let (_, created) = common::send(
        &ctx.app,
        common::request("POST", "/tasks", Some(&token), Some(json!({ "title": "t" }))),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = common::send(
        &ctx.app,
        common::request("DELETE", &format!("/tasks/{}", id), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], json!(true));

    let (status, _) = common::send(
        &ctx.app,
        common::request("GET", &format!("/tasks/{}", id), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
async fn test_tasks_are_invisible_across_users() {
    let ctx = test_context!();
    let (owner, owner_token) = ctx.create_user("secret123").await.unwrap();
    let (intruder, intruder_token) = ctx.create_user("secret456").await.unwrap();

    let (_, created) = common::send(
        &ctx.app,
        common::request(
            "POST",
            "/tasks",
            Some(&owner_token),
            Some(json!({ "title": "private" })),
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    // Every operation answers 404, never 403 and never the task data
    let attempts = [
        ("GET", format!("/tasks/{}", id), None),
        (
            "PUT",
            format!("/tasks/{}", id),
            Some(json!({ "title": "stolen" })),
        ),
        ("DELETE", format!("/tasks/{}", id), None),
        ("PATCH", format!("/tasks/{}/toggle", id), None),
    ];

    for (method, uri, body) in attempts {
        let (status, response) = common::send(
            &ctx.app,
            common::request(method, &uri, Some(&intruder_token), body),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert!(response.get("title").is_none());
    }

    // The intruder's list is empty
    let (_, body) = common::send(
        &ctx.app,
        common::request("GET", "/tasks", Some(&intruder_token), None),
    )
    .await;
    assert_eq!(body["tasks"].as_array().unwrap().len(), 0);

    // And the owner's task is untouched
    let (status, task) = common::send(
        &ctx.app,
        common::request("GET", &format!("/tasks/{}", id), Some(&owner_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["title"], json!("private"));
    assert_eq!(task["status"], json!("pending"));

    ctx.cleanup_user(owner.id).await.unwrap();
    ctx.cleanup_user(intruder.id).await.unwrap();
}

#[tokio::test]
async fn test_logout_always_succeeds() {
    let ctx = test_context!();

    // No session at all
    let response = common::call(&ctx.app, common::request("POST", "/auth/logout", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Garbage session cookie still logs out cleanly
    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header("cookie", "token=definitely-not-a-valid-token")
        .body(Body::empty())
        .unwrap();

    let response = common::call(&ctx.app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The response clears the cookie
    let set_cookie = response
        .headers()
        .get(axum::http::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(set_cookie.starts_with("token="));
    assert!(common::session_cookie_value(&response).is_none());
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let ctx = test_context!();
    let (user, _token) = ctx.create_user("secret123").await.unwrap();

    let claims = taskdeck_shared::auth::token::Claims::new(user.id, chrono::Duration::seconds(-60));
    let expired = taskdeck_shared::auth::token::create_token(&claims, common::TEST_SECRET).unwrap();

    let (status, _) = common::send(
        &ctx.app,
        common::request("GET", "/tasks", Some(&expired), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup_user(user.id).await.unwrap();
}

#[tokio::test]
async fn test_token_for_deleted_user_rejected() {
    let ctx = test_context!();
    let (user, token) = ctx.create_user("secret123").await.unwrap();

    ctx.cleanup_user(user.id).await.unwrap();

    let (status, _) = common::send(
        &ctx.app,
        common::request("GET", "/tasks", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
