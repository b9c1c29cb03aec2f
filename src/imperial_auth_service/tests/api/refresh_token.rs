use chrono::Duration;
use imperial_core::TokenService;
use serde_json::Value;

use crate::helpers::{TestApp, error_kind};

#[tokio::test]
async fn refresh_returns_new_access_token_for_same_subject() {
    let app = TestApp::new().await;
    let signed_in = app.verified_account("refresh@example.com").await;
    let refresh_token = signed_in["tokens"]["refresh_token"].as_str().unwrap();

    let response = app.refresh_token(refresh_token).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let access_token = body["access_token"].as_str().unwrap();
    let subject = app.token_service.validate_access_token(access_token).unwrap();
    assert_eq!(subject.value(), signed_in["user"]["id"].as_i64().unwrap());

    // The refresh token is not rotated.
    assert_eq!(app.refresh_token(refresh_token).await.status().as_u16(), 200);
}

#[tokio::test]
async fn access_token_cannot_be_used_as_refresh_token() {
    let app = TestApp::new().await;
    let signed_in = app.verified_account("crossed@example.com").await;
    let access_token = signed_in["tokens"]["access_token"].as_str().unwrap();

    let (status, kind) = error_kind(app.refresh_token(access_token).await).await;

    assert_eq!(status, 401);
    assert_eq!(kind, "UNAUTHORIZED");
}

#[tokio::test]
async fn expired_refresh_token_returns_401() {
    let app = TestApp::new().await;
    let signed_in = app.verified_account("expired@example.com").await;
    let refresh_token = signed_in["tokens"]["refresh_token"].as_str().unwrap();

    app.clock.advance(Duration::days(7));

    let (status, kind) = error_kind(app.refresh_token(refresh_token).await).await;

    assert_eq!(status, 401);
    assert_eq!(kind, "UNAUTHORIZED");
}

#[tokio::test]
async fn refresh_after_access_expiry_issues_token_valid_now() {
    let app = TestApp::new().await;
    let signed_in = app.verified_account("later@example.com").await;
    let access_token = signed_in["tokens"]["access_token"].as_str().unwrap();
    let refresh_token = signed_in["tokens"]["refresh_token"].as_str().unwrap();

    app.clock.advance(Duration::hours(1));
    let (status, _) = error_kind(app.me(Some(access_token)).await).await;
    assert_eq!(status, 401);

    let body: Value = app.refresh_token(refresh_token).await.json().await.unwrap();
    let fresh = body["access_token"].as_str().unwrap();

    assert_eq!(app.me(Some(fresh)).await.status().as_u16(), 200);
}

#[tokio::test]
async fn garbage_refresh_token_returns_401() {
    let app = TestApp::new().await;

    let (status, _) = error_kind(app.refresh_token("not.a.jwt").await).await;

    assert_eq!(status, 401);
}
