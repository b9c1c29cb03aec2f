use std::fmt;

use rand::Rng;
use thiserror::Error;

pub const CODE_LENGTH: usize = 6;

// Largest multiple of 10 that fits in a byte. Bytes at or above it are
// redrawn so every digit keeps probability exactly 1/10.
const REJECTION_BOUND: u8 = 250;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OneTimeCodeError {
    #[error("Verification code must be exactly 6 digits")]
    InvalidFormat,
}

/// Six ASCII digits sent to the user for email confirmation or password reset.
#[derive(Clone, PartialEq, Eq)]
pub struct OneTimeCode(String);

impl OneTimeCode {
    /// Draw a fresh code from the thread-local CSPRNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..CODE_LENGTH)
            .map(|_| char::from(b'0' + uniform_digit(rng)))
            .collect();
        Self(code)
    }

    pub fn parse(raw: &str) -> Result<Self, OneTimeCodeError> {
        let raw = raw.trim();
        if raw.len() != CODE_LENGTH || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OneTimeCodeError::InvalidFormat);
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn uniform_digit<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    loop {
        let byte: u8 = rng.random();
        if byte < REJECTION_BOUND {
            return byte % 10;
        }
    }
}

impl fmt::Debug for OneTimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OneTimeCode(******)")
    }
}
