use imperial_core::TokenService;
use serde_json::Value;

use crate::helpers::{PASSWORD, TestApp, error_kind};

#[tokio::test]
async fn sign_in_returns_account_and_token_pair() {
    let app = TestApp::new().await;
    let signed_up: Value = app
        .sign_up("signin@example.com", PASSWORD)
        .await
        .json()
        .await
        .unwrap();

    let response = app.sign_in("signin@example.com", PASSWORD).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["id"], signed_up["id"]);

    let access_token = body["tokens"]["access_token"].as_str().unwrap();
    let refresh_token = body["tokens"]["refresh_token"].as_str().unwrap();
    let subject = app.token_service.validate_access_token(access_token).unwrap();
    assert_eq!(subject.value(), signed_up["id"].as_i64().unwrap());
    assert!(app.token_service.validate_refresh_token(refresh_token).is_ok());
}

#[tokio::test]
async fn unverified_account_can_sign_in() {
    let app = TestApp::new().await;
    app.sign_up("unverified@example.com", PASSWORD).await;

    let response = app.sign_in("unverified@example.com", PASSWORD).await;

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn wrong_password_returns_401() {
    let app = TestApp::new().await;
    app.sign_up("wrong@example.com", PASSWORD).await;

    let (status, kind) = error_kind(app.sign_in("wrong@example.com", "not the password").await).await;

    assert_eq!(status, 401);
    assert_eq!(kind, "UNAUTHORIZED");
}

#[tokio::test]
async fn unknown_account_returns_404() {
    let app = TestApp::new().await;

    let (status, kind) = error_kind(app.sign_in("ghost@example.com", PASSWORD).await).await;

    assert_eq!(status, 404);
    assert_eq!(kind, "NOT_FOUND");
}
