pub mod confirm_verification;
pub mod get_account;
pub mod refresh_token;
pub mod request_password_reset;
pub mod reset_password;
pub mod send_verification;
pub mod sign_in;
pub mod sign_up;

pub use confirm_verification::ConfirmVerificationUseCase;
pub use get_account::GetAccountUseCase;
pub use refresh_token::RefreshTokenUseCase;
pub use request_password_reset::RequestPasswordResetUseCase;
pub use reset_password::ResetPasswordUseCase;
pub use send_verification::SendVerificationUseCase;
pub use sign_in::{SignInOutcome, SignInUseCase};
pub use sign_up::SignUpUseCase;
