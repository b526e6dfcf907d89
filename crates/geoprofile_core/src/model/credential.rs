//! Map SDK credential value.
//!
//! # Invariants
//! - A `Credential` always holds trimmed text longer than 20 characters.
//! - `Debug` never prints the secret itself.

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Credentials of this length or shorter are rejected as placeholders.
const MIN_EXCLUSIVE_CREDENTIAL_LEN: usize = 20;

/// Validated map SDK credential (API key or access token).
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trims and validates raw user input.
    ///
    /// This is a placeholder plausibility check, not a provider format check.
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CredentialError::Empty);
        }
        let len = trimmed.chars().count();
        if len <= MIN_EXCLUSIVE_CREDENTIAL_LEN {
            return Err(CredentialError::TooShort { len });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the secret for handing to the SDK loader.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential(len={})", self.len())
    }
}

/// Returns whether `raw` would be accepted by [`Credential::parse`].
pub fn is_valid_credential(raw: &str) -> bool {
    Credential::parse(raw).is_ok()
}

/// Credential input rejection reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    Empty,
    TooShort { len: usize },
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "map credential must not be empty"),
            Self::TooShort { len } => write!(
                f,
                "map credential is too short ({len} chars); expected more than {MIN_EXCLUSIVE_CREDENTIAL_LEN}"
            ),
        }
    }
}

impl Error for CredentialError {}
