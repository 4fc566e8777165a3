use serde::{Deserialize, Serialize};

/// Input to `CredentialStore::register_user`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationInput {
    pub nickname: String,
    pub email: String,
    pub password: String,
}

/// Input to `CredentialStore::login_user`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Registration fields as collected by a form, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub nickname: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegistrationForm {
    /// Trimmed nickname and email, password as typed.
    ///
    /// Validation runs on the trimmed values, so trimming here keeps the
    /// stored email identical to the one that passed `validate_email`.
    /// Untrimmed input would otherwise be stored with its whitespace and
    /// never match a trimmed login.
    pub fn to_input(&self) -> RegistrationInput {
        RegistrationInput {
            nickname: self.nickname.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Login fields as collected by a form, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Email trimmed the same way as at registration.
    pub fn to_input(&self) -> LoginInput {
        LoginInput {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Public part of the user returned to callers and kept as the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: u64,
    pub nickname: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_input_is_trimmed_except_password() {
        let input = RegistrationForm {
            nickname: "  Taro ".into(),
            email: "\ttaro@example.com ".into(),
            password: " abc12345 ".into(),
            password_confirmation: " abc12345 ".into(),
        }
        .to_input();
        assert_eq!(input.nickname, "Taro");
        assert_eq!(input.email, "taro@example.com");
        assert_eq!(input.password, " abc12345 ");
    }

    #[test]
    fn login_input_trims_email_only() {
        let input = LoginForm {
            email: " taro@example.com".into(),
            password: "abc12345 ".into(),
        }
        .to_input();
        assert_eq!(input.email, "taro@example.com");
        assert_eq!(input.password, "abc12345 ");
    }
}
