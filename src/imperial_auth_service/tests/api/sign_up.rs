use serde_json::{Value, json};

use crate::helpers::{PASSWORD, TestApp, error_kind};

#[tokio::test]
async fn sign_up_returns_201_with_unverified_account() {
    let app = TestApp::new().await;

    let response = app.sign_up("new.user@example.com", PASSWORD).await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], "new.user@example.com");
    assert_eq!(body["is_verified"], false);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_sign_up_returns_409() {
    let app = TestApp::new().await;
    app.sign_up("twice@example.com", PASSWORD).await;

    let (status, kind) = error_kind(app.sign_up("twice@example.com", PASSWORD).await).await;

    assert_eq!(status, 409);
    assert_eq!(kind, "CONFLICT");
}

#[tokio::test]
async fn invalid_input_returns_400() {
    let app = TestApp::new().await;

    let cases = [
        json!({ "email": "not-an-email", "password": PASSWORD }),
        json!({ "email": "short@example.com", "password": "short" }),
        json!({ "email": "missing-password@example.com" }),
        json!({ "password": PASSWORD }),
    ];

    for body in cases {
        let (status, kind) = error_kind(app.post("/sign-up", &body).await).await;
        assert_eq!(status, 400, "body: {body}");
        assert_eq!(kind, "VALIDATION_ERROR", "body: {body}");
    }
}
