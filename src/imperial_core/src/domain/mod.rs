pub mod account_id;
pub mod email;
pub mod one_time_code;
pub mod password;
pub mod password_hash;
pub mod tokens;
pub mod user_account;
pub mod verification_code;
