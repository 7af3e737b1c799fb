mod common;

use auth::Claims;
use chrono::Utc;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app.register("Alice", "a@x.com", "secret1").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["name"], "Alice");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"]["id"].is_string());
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_stores_only_a_hash() {
    let app = TestApp::spawn().await;

    app.register("Alice", "a@x.com", "secret1").await;

    let stored = app.users.password_hash_of("a@x.com").expect("user stored");
    assert_ne!(stored, "secret1");
    assert!(stored.starts_with("$argon2"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    app.register("Alice", "a@x.com", "secret1").await;
    let response = app.register("Alice Again", "a@x.com", "another1").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"].as_str().unwrap().contains("already exists"));
    assert_eq!(app.users.count_by_email("a@x.com"), 1);
}

#[tokio::test]
async fn test_register_duplicate_email_differing_in_case() {
    let app = TestApp::spawn().await;

    app.register("Alice", "a@x.com", "secret1").await;
    let response = app.register("Alice", "  A@X.COM ", "secret1").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(app.users.count_by_email("a@x.com"), 1);
}

#[tokio::test]
async fn test_concurrent_duplicate_registrations_have_one_winner() {
    let app = TestApp::spawn().await;

    let (first, second) = tokio::join!(
        app.register("Alice", "race@x.com", "secret1"),
        app.register("Alice", "race@x.com", "secret1"),
    );

    let mut statuses = vec![first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);
    assert_eq!(app.users.count_by_email("race@x.com"), 1);
}

#[tokio::test]
async fn test_register_missing_field() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({ "name": "Alice", "email": "a@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Missing required field: password");
    assert_eq!(app.users.count_by_email("a@x.com"), 0);
}

#[tokio::test]
async fn test_register_invalid_email_and_short_password() {
    let app = TestApp::spawn().await;

    let response = app.register("Alice", "not-an-email", "secret1").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.register("Alice", "a@x.com", "abc").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"].as_str().unwrap().starts_with("Invalid password"));
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .header("content-type", "application/json")
        .body("{\"name\": \"Alice\",")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_login_success_issues_token_for_user() {
    let app = TestApp::spawn().await;

    let registered: serde_json::Value = app
        .register("Alice", "a@x.com", "secret1")
        .await
        .json()
        .await
        .expect("Failed to parse response");

    let response = app.login("a@x.com", "secret1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let token = body["token"].as_str().expect("token present");

    let claims: Claims = app.jwt_handler.decode(token).expect("token verifies");
    assert_eq!(claims.sub, registered["user"]["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::spawn().await;

    app.register("Alice", "a@x.com", "secret1").await;
    let response = app.login("A@X.com", "secret1").await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;

    app.register("Alice", "a@x.com", "secret1").await;

    let wrong_password = app.login("a@x.com", "wrong-password").await;
    let unknown_email = app.login("nobody@x.com", "secret1").await;
    let invalid_email = app.login("not-an-email", "secret1").await;

    for response in [wrong_password, unknown_email, invalid_email] {
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body, json!({ "error": "Invalid credentials" }));
    }
}

#[tokio::test]
async fn test_login_missing_field() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/login")
        .json(&json!({ "email": "a@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_current_user_with_token() {
    let app = TestApp::spawn().await;
    let token = app.register_and_login("Alice", "a@x.com").await;

    let response = app
        .get_authenticated("/api/users/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], "a@x.com");
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_current_user_without_header() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/users/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Missing Authorization header" }));
}

#[tokio::test]
async fn test_current_user_with_garbage_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get_authenticated("/api/users/me", "not.a.jwt")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Malformed token" }));
}

#[tokio::test]
async fn test_current_user_with_foreign_signature() {
    let app = TestApp::spawn().await;
    let token = app.register_and_login("Alice", "a@x.com").await;

    let forged = auth::JwtHandler::new(b"some-other-secret-that-is-also-32-bytes!")
        .encode(&app.jwt_handler.decode::<Claims>(&token).unwrap())
        .unwrap();

    let response = app
        .get_authenticated("/api/users/me", &forged)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Invalid token signature" }));
}

#[tokio::test]
async fn test_current_user_with_expired_token() {
    let app = TestApp::spawn().await;
    let token = app.register_and_login("Alice", "a@x.com").await;
    let subject = app.jwt_handler.decode::<Claims>(&token).unwrap().sub;

    let now = Utc::now().timestamp();
    let expired = app
        .jwt_handler
        .encode(
            &Claims::for_subject(subject, None)
                .with_issued_at(now - 7200)
                .with_expiration(now - 60),
        )
        .unwrap();

    let response = app
        .get_authenticated("/api/users/me", &expired)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Token has expired" }));
}

#[tokio::test]
async fn test_current_user_for_unknown_subject() {
    let app = TestApp::spawn().await;

    let token = app
        .jwt_handler
        .encode(&Claims::for_subject(uuid::Uuid::new_v4(), None))
        .unwrap();

    let response = app
        .get_authenticated("/api/users/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
