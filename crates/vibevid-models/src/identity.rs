//! Contact identity models.
//!
//! An account handle is exactly one of email or phone. Forms collect both
//! fields free-form; [`ContactIdentity::resolve`] picks one at submission
//! time, preferring a non-empty email over any phone content.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Result type for identity resolution.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Errors raised when resolving a contact identity from form input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Provide an email address or a phone number")]
    Missing,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

/// The email-or-phone value used as a login handle.
///
/// Serializes flat into request bodies as either `{"email": ...}` or
/// `{"phone": ...}`, never both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContactIdentity {
    Email { email: String },
    Phone { phone: String },
}

impl ContactIdentity {
    /// Resolve an identity from a pair of free-form fields.
    ///
    /// A non-empty email wins regardless of phone content; otherwise a
    /// non-empty phone is used. Both empty is a validation error.
    pub fn resolve(email: &str, phone: &str) -> IdentityResult<Self> {
        let email = email.trim();
        let phone = phone.trim();

        if !email.is_empty() {
            if !email.validate_email() {
                return Err(IdentityError::InvalidEmail(email.to_string()));
            }
            return Ok(Self::Email {
                email: email.to_string(),
            });
        }

        if !phone.is_empty() {
            return Ok(Self::Phone {
                phone: phone.to_string(),
            });
        }

        Err(IdentityError::Missing)
    }

    /// Create an email identity, validating syntax.
    pub fn email(email: impl Into<String>) -> IdentityResult<Self> {
        let email = email.into();
        if !email.validate_email() {
            return Err(IdentityError::InvalidEmail(email));
        }
        Ok(Self::Email { email })
    }

    /// Create a phone identity.
    pub fn phone(phone: impl Into<String>) -> IdentityResult<Self> {
        let phone = phone.into();
        if phone.trim().is_empty() {
            return Err(IdentityError::Missing);
        }
        Ok(Self::Phone { phone })
    }

    /// The raw handle value (email address or phone number).
    pub fn handle(&self) -> &str {
        match self {
            Self::Email { email } => email,
            Self::Phone { phone } => phone,
        }
    }

    pub fn is_email(&self) -> bool {
        matches!(self, Self::Email { .. })
    }
}

impl fmt::Display for ContactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.handle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_wins_over_phone() {
        let id = ContactIdentity::resolve("a@x.com", "+15550100").unwrap();
        assert!(id.is_email());
        assert_eq!(id.handle(), "a@x.com");
    }

    #[test]
    fn phone_used_when_email_empty() {
        let id = ContactIdentity::resolve("   ", "+15550100").unwrap();
        assert!(!id.is_email());
        assert_eq!(id.handle(), "+15550100");
    }

    #[test]
    fn both_empty_is_missing() {
        assert_eq!(
            ContactIdentity::resolve("", "").unwrap_err(),
            IdentityError::Missing
        );
    }

    #[test]
    fn bad_email_rejected_even_with_phone_present() {
        let err = ContactIdentity::resolve("not-an-email", "+15550100").unwrap_err();
        assert!(matches!(err, IdentityError::InvalidEmail(_)));
    }

    #[test]
    fn serializes_single_field() {
        let email = ContactIdentity::resolve("a@x.com", "").unwrap();
        assert_eq!(
            serde_json::to_value(&email).unwrap(),
            serde_json::json!({"email": "a@x.com"})
        );

        let phone = ContactIdentity::resolve("", "+15550100").unwrap();
        assert_eq!(
            serde_json::to_value(&phone).unwrap(),
            serde_json::json!({"phone": "+15550100"})
        );
    }
}
