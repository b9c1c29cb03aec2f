pub mod env {
    pub const APP_ENVIRONMENT_ENV_VAR: &str = "APP_ENVIRONMENT";
    pub const JWT_ACCESS_SECRET_ENV_VAR: &str = "JWT_ACCESS_SECRET";
    pub const JWT_REFRESH_SECRET_ENV_VAR: &str = "JWT_REFRESH_SECRET";
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    pub const POSTMARK_AUTH_TOKEN_ENV_VAR: &str = "POSTMARK_AUTH_TOKEN";

    /// Prefix for layered overrides, e.g. `IMPERIAL__APPLICATION__PORT=8080`.
    pub const SETTINGS_ENV_PREFIX: &str = "IMPERIAL";
    pub const SETTINGS_ENV_SEPARATOR: &str = "__";
}

pub const CONFIG_DIR: &str = "config";
pub const DEFAULT_ENVIRONMENT: &str = "local";

pub mod prod {
    pub const APP_HOST: &str = "0.0.0.0";
    pub const APP_PORT: u16 = 3000;
    pub mod email_client {
        pub const BASE_URL: &str = "https://api.postmarkapp.com/";
        pub const SENDER: &str = "no-reply@imperial.rent";
        pub const TIMEOUT_MILLIS: u64 = 10_000;
    }
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub mod email_client {
        use std::time::Duration;

        pub const SENDER: &str = "test@email.com";
        pub const TIMEOUT: Duration = std::time::Duration::from_millis(200);
    }
}
