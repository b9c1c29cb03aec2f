//! Route handlers. Each one takes [`AuthWorkflow`](imperial_application::AuthWorkflow)
//! as state.

pub mod confirm_email;
pub mod forgot_password;
pub mod me;
pub mod refresh_token;
pub mod reset_password;
pub mod sign_in;
pub mod sign_up;
pub mod verify_email;

pub use confirm_email::confirm_email;
pub use forgot_password::forgot_password;
pub use me::me;
pub use refresh_token::refresh_token;
pub use reset_password::reset_password;
pub use sign_in::sign_in;
pub use sign_up::sign_up;
pub use verify_email::verify_email;
