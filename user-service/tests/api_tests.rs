mod common;

use auth::TokenCodec;
use common::TestApp;
use common::JWT_SECRET;
use common::SERVICE_USERNAME;
use reqwest::StatusCode;
use serde_json::json;
use user_service::domain::user::events::UserEventKind;

#[tokio::test]
async fn test_register_user_success() {
    let app = TestApp::spawn().await;

    let response = app.register_user("nicola", "nicola@example.com").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/api/users/nicola"
    );

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["email"], "nicola@example.com");
    assert_eq!(body["data"]["display_name"], "nicola Display");
    assert!(body["data"]["id"].is_string());
}

#[tokio::test]
async fn test_register_user_emits_created_event_from_persisted_state() {
    let app = TestApp::spawn().await;

    app.register_user("nicola", "nicola@example.com").await;

    let events = app.events.recorded();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, UserEventKind::Created);
    assert_eq!(events[0].username, "nicola");
    assert_eq!(events[0].email, "nicola@example.com");
    assert_eq!(events[0].old_profile_picture_url, None);
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = TestApp::spawn().await;

    app.register_user("nicola", "nicola@example.com").await;
    let response = app.register_user("nicola", "other@example.com").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));

    // Only the first registration produced a record and an event.
    let events = app.events.recorded();
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::spawn().await;

    app.register_user("nicola", "nicola@example.com").await;
    let response = app.register_user("nicola2", "nicola@example.com").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.events.recorded().len(), 1);
}

#[tokio::test]
async fn test_register_invalid_email_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/users")
        .json(&json!({
            "username": "nicola",
            "email": "not-an-email",
            "password": "pass_word!",
            "name": "Nicola"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.events.recorded().is_empty());
}

#[tokio::test]
async fn test_concurrent_registration_same_username_single_winner() {
    let app = TestApp::spawn().await;

    let (first, second) = tokio::join!(
        app.register_user("nicola", "first@example.com"),
        app.register_user("nicola", "second@example.com"),
    );

    let statuses = [first.status(), second.status()];
    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    let rejected = statuses
        .iter()
        .filter(|s| **s == StatusCode::BAD_REQUEST)
        .count();

    assert_eq!(created, 1);
    assert_eq!(rejected, 1);
    assert_eq!(app.events.recorded().len(), 1);
}

#[tokio::test]
async fn test_signin_returns_token_that_authenticates() {
    let app = TestApp::spawn().await;
    app.register_user("nicola", "nicola@example.com").await;

    let response = app
        .post("/api/auth/signin")
        .json(&json!({ "username": "nicola", "password": "pass_word!" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let token = body["data"]["token"].as_str().expect("token missing");
    assert_eq!(body["data"]["user"]["username"], "nicola");

    let me = app
        .get("/api/users/me")
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(me.status(), StatusCode::OK);
    let me_body: serde_json::Value = me.json().await.expect("Failed to parse response");
    assert_eq!(me_body["data"]["username"], "nicola");
    assert_eq!(me_body["data"]["name"], "nicola Display");
}

#[tokio::test]
async fn test_signin_wrong_password_unauthorized() {
    let app = TestApp::spawn().await;
    app.register_user("nicola", "nicola@example.com").await;

    let response = app
        .post("/api/auth/signin")
        .json(&json!({ "username": "nicola", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signin_unknown_user_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/signin")
        .json(&json!({ "username": "ghost", "password": "pass_word!" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_without_token_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/users/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mismatched_prefix_is_treated_as_no_token() {
    let app = TestApp::spawn().await;
    app.register_user("nicola", "nicola@example.com").await;

    let token = app
        .token_codec
        .issue("nicola")
        .expect("Failed to issue token");

    // Wrong scheme word and wrong case are both prefix mismatches; the
    // request proceeds unauthenticated and /me answers 401, not an error.
    for header in [format!("Token {}", token), format!("bearer {}", token)] {
        let response = app
            .get("/api/users/me")
            .header("Authorization", header)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_expired_token_is_unauthenticated_not_an_error() {
    let app = TestApp::spawn().await;
    app.register_user("nicola", "nicola@example.com").await;

    // Same secret, negative validity: already expired when issued.
    let expired_codec = TokenCodec::new(JWT_SECRET, -1);
    let token = expired_codec
        .issue("nicola")
        .expect("Failed to issue token");

    let response = app
        .get("/api/users/me")
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_unauthenticated() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/users/me")
        .header("Authorization", "Bearer not.a.token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_vanished_subject_is_unauthenticated() {
    let app = TestApp::spawn().await;

    // Valid signature, but the subject was never registered (or was deleted
    // after issuance). Must degrade to unauthenticated, not fault.
    let response = app
        .get("/api/users/me")
        .header("Authorization", app.bearer_for("ghostuser"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_service_token_authenticates_without_lookup_but_has_no_profile() {
    let app = TestApp::spawn().await;

    let token = app
        .token_codec
        .issue_with_authorities(SERVICE_USERNAME, vec!["ROLE_SERVICE".to_string()])
        .expect("Failed to issue token");

    // The service identity is resolved purely from the token; it reaches
    // handlers as an authenticated principal without any user profile.
    let response = app
        .get("/api/users/me")
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_profile_picture_emits_updated_event_with_old_url() {
    let app = TestApp::spawn().await;
    app.register_user("nicola", "nicola@example.com").await;
    let bearer = app.bearer_for("nicola");

    let response = app
        .put("/api/users/me/picture")
        .header("Authorization", &bearer)
        .body("https://cdn.example.com/first.png")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .put("/api/users/me/picture")
        .header("Authorization", &bearer)
        .body("https://cdn.example.com/second.png")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let events = app.events.recorded();
    assert_eq!(events.len(), 3); // CREATED + two UPDATED

    assert_eq!(events[1].kind, UserEventKind::Updated);
    assert_eq!(events[1].old_profile_picture_url, None);
    assert_eq!(
        events[1].profile_picture_url.as_deref(),
        Some("https://cdn.example.com/first.png")
    );

    assert_eq!(events[2].kind, UserEventKind::Updated);
    assert_eq!(
        events[2].old_profile_picture_url.as_deref(),
        Some("https://cdn.example.com/first.png")
    );
    assert_eq!(
        events[2].profile_picture_url.as_deref(),
        Some("https://cdn.example.com/second.png")
    );
}

#[tokio::test]
async fn test_update_profile_picture_requires_authentication() {
    let app = TestApp::spawn().await;

    let response = app
        .put("/api/users/me/picture")
        .body("https://cdn.example.com/pic.png")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.events.recorded().is_empty());
}

#[tokio::test]
async fn test_get_user_by_username() {
    let app = TestApp::spawn().await;
    app.register_user("nicola", "nicola@example.com").await;

    let response = app
        .get("/api/users/nicola")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["active"], true);
    assert_eq!(body["data"]["roles"], json!(["USER"]));

    let response = app
        .get("/api/users/missing")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users() {
    let app = TestApp::spawn().await;
    app.register_user("nicola", "nicola@example.com").await;
    app.register_user("martha", "martha@example.com").await;

    let response = app
        .get("/api/users")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_user_summary_endpoints() {
    let app = TestApp::spawn().await;
    app.register_user("nicola", "nicola@example.com").await;

    let response = app
        .get("/api/users/summary/nicola")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["name"], "nicola Display");

    let response = app
        .get("/api/users/summary/missing")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Missing usernames are silently omitted from the batch lookup.
    let response = app
        .post("/api/users/summary/in")
        .json(&json!(["nicola", "missing"]))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let summaries = body["data"].as_array().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["username"], "nicola");
}
