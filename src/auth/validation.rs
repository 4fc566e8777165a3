//! Field- and form-level checks for the registration and login forms.
//!
//! Every check is pure. Form validators run all of their field checks and
//! report each failing field, so a form can show every problem at once.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::auth::dto::{LoginForm, RegistrationForm};

pub const NICKNAME_MAX_CHARS: usize = 50;
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Why a single field was rejected. `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Nickname is required")]
    NicknameRequired,
    #[error("Nickname must be at most 50 characters")]
    NicknameTooLong,
    #[error("Email is required")]
    EmailRequired,
    #[error("Enter a valid email address")]
    EmailInvalid,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Password must contain both letters and numbers")]
    PasswordNeedsLetterAndDigit,
    #[error("Password confirmation is required")]
    PasswordConfirmationRequired,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Nickname,
    Email,
    Password,
    PasswordConfirmation,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Nickname => "nickname",
            Field::Email => "email",
            Field::Password => "password",
            Field::PasswordConfirmation => "passwordConfirmation",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a form check: one entry per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidation {
    errors: BTreeMap<Field, ValidationError>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<Field, ValidationError> {
        &self.errors
    }

    pub fn get(&self, field: Field) -> Option<ValidationError> {
        self.errors.get(&field).copied()
    }

    fn check(&mut self, field: Field, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            self.errors.insert(field, e);
        }
    }
}

impl std::fmt::Display for FormValidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, err) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, err)?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for FormValidation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("FormValidation", 2)?;
        s.serialize_field("isValid", &self.is_valid())?;
        s.serialize_field("errors", &self.errors)?;
        s.end()
    }
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::NicknameRequired);
    }
    if trimmed.chars().count() > NICKNAME_MAX_CHARS {
        return Err(ValidationError::NicknameTooLong);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !is_valid_email(trimmed) {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(())
}

/// Length and character-class rules; whitespace counts and is not trimmed.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(ValidationError::PasswordNeedsLetterAndDigit);
    }
    Ok(())
}

pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    if confirmation.is_empty() {
        return Err(ValidationError::PasswordConfirmationRequired);
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_registration_form(form: &RegistrationForm) -> FormValidation {
    let mut v = FormValidation::default();
    v.check(Field::Nickname, validate_nickname(&form.nickname));
    v.check(Field::Email, validate_email(&form.email));
    v.check(Field::Password, validate_password(&form.password));
    v.check(
        Field::PasswordConfirmation,
        validate_password_confirmation(&form.password, &form.password_confirmation),
    );
    v
}

/// Login only checks that a password was typed; strength rules apply at registration.
pub fn validate_login_form(form: &LoginForm) -> FormValidation {
    let mut v = FormValidation::default();
    v.check(Field::Email, validate_email(&form.email));
    if form.password.is_empty() {
        v.check(Field::Password, Err(ValidationError::PasswordRequired));
    }
    v
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// `local@label(.label)*.tld` built only from the allowed character sets.
    fn well_formed_email() -> impl Strategy<Value = String> {
        (
            "[a-zA-Z0-9._%+-]{1,16}",
            prop::collection::vec("[a-zA-Z0-9-]{1,10}", 1..4),
            "[a-zA-Z]{2,6}",
        )
            .prop_map(|(local, labels, tld)| format!("{}@{}.{}", local, labels.join("."), tld))
    }

    proptest! {
        #[test]
        fn well_formed_emails_pass(email in well_formed_email()) {
            prop_assert_eq!(validate_email(&email), Ok(()));
        }

        #[test]
        fn emails_without_at_sign_fail(email in "[a-zA-Z0-9._%+ -]{0,30}") {
            prop_assert!(validate_email(&email).is_err());
        }

        #[test]
        fn emails_with_numeric_tld_fail(
            local in "[a-z0-9]{1,10}",
            domain in "[a-z0-9]{1,10}",
            tld in "[0-9]{2,4}",
        ) {
            let email = format!("{}@{}.{}", local, domain, tld);
            prop_assert_eq!(validate_email(&email), Err(ValidationError::EmailInvalid));
        }

        #[test]
        fn long_passwords_with_letter_and_digit_pass(
            filler in "[a-zA-Z0-9!@#$ ]{6,24}",
            letter in "[a-zA-Z]",
            digit in "[0-9]",
            letter_first in any::<bool>(),
        ) {
            let password = if letter_first {
                format!("{}{}{}", letter, filler, digit)
            } else {
                format!("{}{}{}", digit, filler, letter)
            };
            prop_assert_eq!(validate_password(&password), Ok(()));
        }

        #[test]
        fn short_passwords_fail(password in ".{1,7}") {
            prop_assert_eq!(validate_password(&password), Err(ValidationError::PasswordTooShort));
        }

        #[test]
        fn letter_only_passwords_fail(password in "[a-zA-Z]{8,30}") {
            prop_assert_eq!(
                validate_password(&password),
                Err(ValidationError::PasswordNeedsLetterAndDigit)
            );
        }

        #[test]
        fn digit_only_passwords_fail(password in "[0-9]{8,30}") {
            prop_assert_eq!(
                validate_password(&password),
                Err(ValidationError::PasswordNeedsLetterAndDigit)
            );
        }

        #[test]
        fn confirmation_valid_iff_non_empty_and_equal(
            password in "[ab1]{0,3}",
            confirmation in "[ab1]{0,3}",
        ) {
            let expected = !confirmation.is_empty() && confirmation == password;
            prop_assert_eq!(
                validate_password_confirmation(&password, &confirmation).is_ok(),
                expected
            );
        }
    }
}
