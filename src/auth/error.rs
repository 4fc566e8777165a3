use thiserror::Error;

use crate::auth::validation::{Field, FormValidation};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(FormValidation),
    #[error("This email address is already registered")]
    DuplicateEmail,
    /// Shared by "no such user" and "wrong password".
    #[error("Incorrect email address or password")]
    InvalidCredentials,
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Form field the error belongs to, if it is not a form-level error.
    pub fn field(&self) -> Option<Field> {
        match self {
            AuthError::DuplicateEmail => Some(Field::Email),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_email_is_an_email_field_error() {
        assert_eq!(AuthError::DuplicateEmail.field(), Some(Field::Email));
        assert_eq!(AuthError::InvalidCredentials.field(), None);
    }

    #[test]
    fn storage_error_keeps_context_chain() {
        let err: AuthError = anyhow::anyhow!("disk full").context("write users").into();
        let msg = err.to_string();
        assert!(msg.contains("write users"));
        assert!(msg.contains("disk full"));
    }
}
