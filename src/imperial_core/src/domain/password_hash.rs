use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

/// Shortest string accepted as a stored hash. Any real salted hash
/// (Argon2 PHC, bcrypt) is well beyond this; anything shorter is almost
/// certainly a plaintext password that slipped through.
pub const MIN_HASH_LENGTH: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidPasswordHash {
    #[error("Password hash must not be empty")]
    Empty,
    #[error("Password hash is too short")]
    TooShort,
}

/// Output of a slow, salted one-way password hash.
#[derive(Debug, Clone)]
pub struct PasswordHash(Secret<String>);

impl PasswordHash {
    pub fn parse(raw: Secret<String>) -> Result<Self, InvalidPasswordHash> {
        let len = raw.expose_secret().len();
        if len == 0 {
            return Err(InvalidPasswordHash::Empty);
        }
        if len < MIN_HASH_LENGTH {
            return Err(InvalidPasswordHash::TooShort);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.expose_secret()
    }
}

impl AsRef<Secret<String>> for PasswordHash {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
