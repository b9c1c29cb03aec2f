pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    AllowedOrigins, ApplicationSettings, AuthSettings, DatabaseSettings, EmailClientSettings,
    EmailProvider, InvalidCodeTtl, Settings,
};
