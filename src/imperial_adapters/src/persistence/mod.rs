pub mod hashmap_code_store;
pub mod hashmap_credential_store;
pub mod postgres_code_store;
pub mod postgres_credential_store;

pub use hashmap_code_store::HashMapCodeStore;
pub use hashmap_credential_store::HashMapCredentialStore;
pub use postgres_code_store::PostgresCodeStore;
pub use postgres_credential_store::PostgresCredentialStore;
