//! Admin gate
//!
//! Admin commands are unlocked by a single shared password. There are no
//! sessions or tokens: every admin invocation presents the password again.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Admin password required (use --password or GURU_PASSWORD)")]
    MissingPassword,

    #[error("Invalid admin password")]
    InvalidPassword,
}

/// Boolean gate in front of the admin console
#[derive(Debug, Clone)]
pub struct AdminGate {
    password: String,
}

impl AdminGate {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// Check a supplied credential
    pub fn verify(&self, supplied: Option<&str>) -> Result<(), AuthError> {
        let supplied = supplied
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingPassword)?;
        if constant_time_eq(supplied.as_bytes(), self.password.as_bytes()) {
            Ok(())
        } else {
            Err(AuthError::InvalidPassword)
        }
    }

    pub fn is_unlocked(&self, supplied: Option<&str>) -> bool {
        self.verify(supplied).is_ok()
    }
}

/// Compare secrets without short-circuiting on the first differing byte
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
