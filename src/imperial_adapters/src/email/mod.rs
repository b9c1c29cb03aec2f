pub mod log_email_client;
pub mod mock_email_client;
pub mod postmark_email_client;

pub use log_email_client::LogEmailClient;
pub use mock_email_client::{MockEmailClient, SentCode};
pub use postmark_email_client::PostmarkEmailClient;
