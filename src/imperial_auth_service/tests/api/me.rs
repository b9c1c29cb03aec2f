use serde_json::Value;

use crate::helpers::{TestApp, error_kind};

#[tokio::test]
async fn me_returns_authenticated_account() {
    let app = TestApp::new().await;
    let signed_in = app.verified_account("me@example.com").await;
    let access_token = signed_in["tokens"]["access_token"].as_str().unwrap();

    let response = app.me(Some(access_token)).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], signed_in["user"]["id"]);
    assert_eq!(body["email"], "me@example.com");
    assert_eq!(body["is_verified"], true);
}

#[tokio::test]
async fn me_without_bearer_returns_401() {
    let app = TestApp::new().await;

    let (status, kind) = error_kind(app.me(None).await).await;

    assert_eq!(status, 401);
    assert_eq!(kind, "UNAUTHORIZED");
}

#[tokio::test]
async fn me_rejects_invalid_and_refresh_tokens() {
    let app = TestApp::new().await;
    let signed_in = app.verified_account("gate@example.com").await;
    let refresh_token = signed_in["tokens"]["refresh_token"].as_str().unwrap();

    for token in ["garbage", refresh_token] {
        let (status, kind) = error_kind(app.me(Some(token)).await).await;
        assert_eq!(status, 401);
        assert_eq!(kind, "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn me_rejects_non_bearer_scheme() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .get(format!("{}/me", app.address))
        .basic_auth("user", Some("pass"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}
