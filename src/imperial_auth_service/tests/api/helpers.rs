use std::sync::Arc;

use chrono::{Duration, Utc};
use imperial_adapters::{
    Argon2PasswordHasher, HashMapCodeStore, HashMapCredentialStore, HashingParams,
    JwtTokenService, ManualClock, MockEmailClient, TokenConfig, config::test::APP_ADDRESS,
};
use imperial_application::AuthWorkflow;
use imperial_auth_service::AuthService;
use imperial_core::{CodeKind, Email};
use reqwest::Response;
use secrecy::Secret;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const ACCESS_SECRET: &str = "api-test-access-secret-of-32-bytes!";
pub const REFRESH_SECRET: &str = "api-test-refresh-secret-of-32-bytes";
pub const PASSWORD: &str = "correct horse battery";

pub fn token_config() -> TokenConfig {
    TokenConfig::new(
        Secret::new(ACCESS_SECRET.to_string()),
        Secret::new(REFRESH_SECRET.to_string()),
        Duration::minutes(15),
        Duration::days(7),
    )
    .unwrap()
}

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub email_client: MockEmailClient,
    pub clock: Arc<ManualClock>,
    pub token_service: Arc<JwtTokenService>,
}

impl TestApp {
    pub async fn new() -> Self {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let accounts = HashMapCredentialStore::with_clock(clock.clone());
        let codes = HashMapCodeStore::with_clock(accounts.clone(), clock.clone());
        let email_client = MockEmailClient::new();
        let token_service = Arc::new(JwtTokenService::with_clock(token_config(), clock.clone()));
        let password_hasher = Argon2PasswordHasher::new(HashingParams {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();

        let workflow = AuthWorkflow::new(
            Arc::new(accounts),
            Arc::new(codes),
            Arc::new(email_client.clone()),
            token_service.clone(),
            Arc::new(password_hasher),
            clock.clone(),
        );

        let listener = TcpListener::bind(APP_ADDRESS).await.unwrap();
        let address = format!("http://{}/auth", listener.local_addr().unwrap());

        tokio::spawn(AuthService::new(workflow).run_standalone(listener, None));

        Self {
            address,
            http_client: reqwest::Client::new(),
            email_client,
            clock,
            token_service,
        }
    }

    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.http_client
            .post(format!("{}{path}", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Response {
        self.post("/sign-up", &json!({ "email": email, "password": password }))
            .await
    }

    pub async fn verify_email(&self, email: &str) -> Response {
        self.post("/verify-email", &json!({ "email": email })).await
    }

    pub async fn confirm_email(&self, email: &str, code: &str) -> Response {
        self.post("/confirm-email", &json!({ "email": email, "code": code }))
            .await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Response {
        self.post("/sign-in", &json!({ "email": email, "password": password }))
            .await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Response {
        self.post("/refresh-token", &json!({ "refresh_token": refresh_token }))
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> Response {
        self.post("/forgot-password", &json!({ "email": email }))
            .await
    }

    pub async fn reset_password(&self, email: &str, code: &str, new_password: &str) -> Response {
        self.post(
            "/reset-password",
            &json!({ "email": email, "code": code, "new_password": new_password }),
        )
        .await
    }

    pub async fn me(&self, bearer: Option<&str>) -> Response {
        let mut request = self.http_client.get(format!("{}/me", self.address));
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    /// Most recent code of `kind` the service mailed to `email`.
    pub fn last_code(&self, email: &str, kind: CodeKind) -> String {
        self.email_client
            .last_code_for(&Email::parse(email).unwrap(), kind)
            .expect("no code was delivered")
            .as_str()
            .to_string()
    }

    /// Sign up and confirm `email`, returning the sign-in body.
    pub async fn verified_account(&self, email: &str) -> Value {
        assert_eq!(self.sign_up(email, PASSWORD).await.status().as_u16(), 201);
        assert_eq!(self.verify_email(email).await.status().as_u16(), 200);
        let code = self.last_code(email, CodeKind::EmailVerification);
        assert_eq!(self.confirm_email(email, &code).await.status().as_u16(), 200);

        let response = self.sign_in(email, PASSWORD).await;
        assert_eq!(response.status().as_u16(), 200);
        response.json().await.unwrap()
    }
}

/// Status and the `kind` field of an error payload.
pub async fn error_kind(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body: Value = response.json().await.unwrap();
    (status, body["kind"].as_str().unwrap_or_default().to_string())
}
