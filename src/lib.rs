//! # Imperial - identity and credential verification
//!
//! Facade crate re-exporting the public APIs of the service components.
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `UserAccount`, `VerificationCode`, ...
//! - **Ports**: `CredentialStore`, `CodeStore`, `EmailClient`, `TokenService`, ...
//! - **Workflow**: `AuthWorkflow`, the entry point for every auth operation
//! - **Adapters**: Postgres and in-memory stores, Argon2, JWT, email clients, settings
//! - **Service**: `AuthService`, the axum router and standalone server

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use imperial_core::*;
}

pub use imperial_core::{
    AccountId, AuthError, CodeKind, Email, ErrorKind, OneTimeCode, Password, PasswordHash,
    TokenPair, UserAccount, VerificationCode,
};

// ============================================================================
// Ports
// ============================================================================

/// Repository traits
pub mod repositories {
    pub use imperial_core::{
        CodeStore, CodeStoreError, CredentialStore, CredentialStoreError, Redemption,
    };
}

pub use imperial_core::{
    Clock, CodeStore, CredentialStore, EmailClient, PasswordHasher, TokenService,
};

// ============================================================================
// Application Layer
// ============================================================================

/// Use cases and the workflow facade
pub mod use_cases {
    pub use imperial_application::use_cases::*;
}

pub use imperial_application::{AuthWorkflow, SignInOutcome};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP handlers, DTOs and the request gate
    pub mod http {
        pub use imperial_axum::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use imperial_adapters::persistence::*;
    }

    /// Email client implementations
    pub mod email {
        pub use imperial_adapters::email::*;
    }

    /// Token signing and bearer validation
    pub mod auth {
        pub use imperial_adapters::auth_validation::*;
        pub use imperial_adapters::authentication::*;
    }

    /// Configuration
    pub mod config {
        pub use imperial_adapters::config::*;
    }
}

pub use imperial_adapters::{
    Argon2PasswordHasher, JwtTokenService, LogEmailClient, ManualClock, MockEmailClient,
    PostmarkEmailClient, SystemClock, TokenConfig,
    persistence::{
        HashMapCodeStore, HashMapCredentialStore, PostgresCodeStore, PostgresCredentialStore,
    },
};

// ============================================================================
// Auth Service (Main Entry Point)
// ============================================================================

pub use imperial_auth_service::{
    AUTH_PATH_PREFIX, AuthService,
    helpers::{configure_postgresql, get_postgres_pool},
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
