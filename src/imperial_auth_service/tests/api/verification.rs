use chrono::Duration;
use imperial_core::CodeKind;
use serde_json::Value;

use crate::helpers::{PASSWORD, TestApp, error_kind};

#[tokio::test]
async fn sent_code_confirms_email_once() {
    let app = TestApp::new().await;
    let email = "confirm@example.com";
    app.sign_up(email, PASSWORD).await;

    assert_eq!(app.verify_email(email).await.status().as_u16(), 200);
    let code = app.last_code(email, CodeKind::EmailVerification);
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    assert_eq!(app.confirm_email(email, &code).await.status().as_u16(), 200);

    let (status, kind) = error_kind(app.confirm_email(email, &code).await).await;
    assert_eq!(status, 409);
    assert_eq!(kind, "CONFLICT");

    let body: Value = app.sign_in(email, PASSWORD).await.json().await.unwrap();
    assert_eq!(body["user"]["is_verified"], true);
}

#[tokio::test]
async fn expired_code_is_rejected_without_verifying() {
    let app = TestApp::new().await;
    let email = "late@example.com";
    app.sign_up(email, PASSWORD).await;
    app.verify_email(email).await;
    let code = app.last_code(email, CodeKind::EmailVerification);

    app.clock.advance(Duration::minutes(5));

    let (status, kind) = error_kind(app.confirm_email(email, &code).await).await;
    assert_eq!(status, 400);
    assert_eq!(kind, "VALIDATION_ERROR");

    let body: Value = app.sign_in(email, PASSWORD).await.json().await.unwrap();
    assert_eq!(body["user"]["is_verified"], false);
}

#[tokio::test]
async fn resend_supersedes_previous_code() {
    let app = TestApp::new().await;
    let email = "resend@example.com";
    app.sign_up(email, PASSWORD).await;

    app.verify_email(email).await;
    let first = app.last_code(email, CodeKind::EmailVerification);
    app.verify_email(email).await;
    let second = app.last_code(email, CodeKind::EmailVerification);

    if first != second {
        let (status, _) = error_kind(app.confirm_email(email, &first).await).await;
        assert_eq!(status, 404);
    }
    assert_eq!(app.confirm_email(email, &second).await.status().as_u16(), 200);
}

#[tokio::test]
async fn verify_email_for_unknown_account_returns_404() {
    let app = TestApp::new().await;

    let (status, kind) = error_kind(app.verify_email("nobody@example.com").await).await;

    assert_eq!(status, 404);
    assert_eq!(kind, "NOT_FOUND");
    assert!(app.email_client.sent().is_empty());
}

#[tokio::test]
async fn verify_email_for_verified_account_returns_400() {
    let app = TestApp::new().await;
    let email = "already@example.com";
    app.verified_account(email).await;

    let (status, kind) = error_kind(app.verify_email(email).await).await;

    assert_eq!(status, 400);
    assert_eq!(kind, "VALIDATION_ERROR");
}

#[tokio::test]
async fn malformed_code_returns_400() {
    let app = TestApp::new().await;
    let email = "malformed@example.com";
    app.sign_up(email, PASSWORD).await;

    let (status, kind) = error_kind(app.confirm_email(email, "12ab56").await).await;

    assert_eq!(status, 400);
    assert_eq!(kind, "VALIDATION_ERROR");
}
