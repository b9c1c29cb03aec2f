use chrono::{Duration, Utc};
use imperial_adapters::{PostgresCodeStore, PostgresCredentialStore};
use imperial_auth_service::helpers::configure_postgresql;
use imperial_core::{
    CodeKind, CodeStore, CodeStoreError, CredentialStore, CredentialStoreError, Email,
    OneTimeCode, PasswordHash, Redemption,
};
use secrecy::Secret;
use testcontainers_modules::{postgres::Postgres, testcontainers::runners::AsyncRunner};

fn password_hash() -> PasswordHash {
    PasswordHash::parse(Secret::new(format!("$argon2id$v=19${}", "a".repeat(48)))).unwrap()
}

#[tokio::test]
#[ignore = "requires docker"]
async fn postgres_stores_round_trip_and_redeem_once() {
    let container = Postgres::default().start().await.unwrap();
    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = Secret::new(format!("postgresql://postgres:postgres@{host}:{port}/postgres"));

    let pool = configure_postgresql(&url, 5).await.unwrap();
    let accounts = PostgresCredentialStore::new(pool.clone());
    let codes = PostgresCodeStore::new(pool);

    let email = Email::parse("pg@example.com").unwrap();
    let account = accounts.create_account(&email, &password_hash()).await.unwrap();
    assert!(!account.is_verified());

    let duplicate = accounts.create_account(&email, &password_hash()).await;
    assert_eq!(duplicate.unwrap_err(), CredentialStoreError::AccountAlreadyExists);

    let now = Utc::now();
    let first = OneTimeCode::parse("111111").unwrap();
    codes
        .issue_code(&first, account.id(), CodeKind::EmailVerification, now + Duration::minutes(5))
        .await
        .unwrap();

    // Reissuing replaces the row for (user, kind).
    let second = OneTimeCode::parse("222222").unwrap();
    let issued = codes
        .issue_code(&second, account.id(), CodeKind::EmailVerification, now + Duration::minutes(5))
        .await
        .unwrap();
    assert!(
        codes
            .find_by_email_and_code(&email, &first, CodeKind::EmailVerification)
            .await
            .unwrap()
            .is_none()
    );

    let verified = codes
        .redeem(&issued, Redemption::VerifyEmail, Utc::now())
        .await
        .unwrap();
    assert!(verified.is_verified());

    let again = codes.redeem(&issued, Redemption::VerifyEmail, Utc::now()).await;
    assert!(matches!(again, Err(CodeStoreError::CodeAlreadyUsed)));

    let reloaded = accounts.get_by_id(account.id()).await.unwrap();
    assert!(reloaded.is_verified());
}
