use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::auth::{
    dto::{AuthenticatedUser, LoginInput, RegistrationInput},
    error::AuthError,
    password::{hash_password_blocking, verify_password_blocking},
    repo_types::UserRecord,
};
use crate::storage::KeyValueStorage;

const USERS_SLOT: &str = "users";
const CURRENT_USER_SLOT: &str = "current_user";

/// Mock credential store: every user record in one JSON slot, plus the
/// current-session slot.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
    users_key: String,
    current_user_key: String,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key_prefix: &str) -> Self {
        Self {
            storage,
            users_key: format!("{}{}", key_prefix, USERS_SLOT),
            current_user_key: format!("{}{}", key_prefix, CURRENT_USER_SLOT),
        }
    }

    pub fn users_key(&self) -> &str {
        &self.users_key
    }

    pub fn current_user_key(&self) -> &str {
        &self.current_user_key
    }

    /// All stored records. A missing or unreadable slot is an empty store.
    async fn load_users(&self) -> Result<Vec<UserRecord>, AuthError> {
        let Some(text) = self.storage.get_item(&self.users_key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&text) {
            Ok(users) => Ok(users),
            Err(e) => {
                warn!(key = %self.users_key, error = %e, "stored users are malformed; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn save_users(&self, users: &[UserRecord]) -> Result<(), AuthError> {
        let text = serde_json::to_string(users).map_err(anyhow::Error::from)?;
        self.storage.set_item(&self.users_key, &text).await?;
        Ok(())
    }

    pub async fn user_count(&self) -> Result<usize, AuthError> {
        Ok(self.load_users().await?.len())
    }

    pub async fn is_email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let users = self.load_users().await?;
        Ok(users.iter().any(|u| u.email == email))
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register_user(
        &self,
        input: &RegistrationInput,
    ) -> Result<AuthenticatedUser, AuthError> {
        if self.is_email_exists(&input.email).await? {
            warn!("email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = hash_password_blocking(input.password.clone())
            .await
            .map_err(|e| {
                error!(error = %e, "hash_password failed");
                AuthError::Hashing(e.to_string())
            })?;

        // Re-read after the hash await; ids are max + 1 so gaps never get reused.
        let mut users = self.load_users().await?;
        if users.iter().any(|u| u.email == input.email) {
            warn!("email registered while hashing");
            return Err(AuthError::DuplicateEmail);
        }
        let id = match users.iter().map(|u| u.id).max() {
            None => 1,
            Some(max) => max.checked_add(1).ok_or_else(|| {
                error!(max_id = max, "user id space exhausted");
                anyhow::anyhow!("user id space exhausted")
            })?,
        };

        let now = OffsetDateTime::now_utc();
        let record = UserRecord {
            id,
            nickname: input.nickname.clone(),
            email: input.email.clone(),
            password_hash,
            created_at: now,
            updated_at: now,
        };
        let user = record.to_authenticated();
        users.push(record);
        self.save_users(&users).await?;

        info!(user_id = user.id, "user registered");
        Ok(user)
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login_user(&self, input: &LoginInput) -> Result<AuthenticatedUser, AuthError> {
        let users = self.load_users().await?;
        let Some(record) = users.into_iter().find(|u| u.email == input.email) else {
            warn!("login unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let ok = match verify_password_blocking(input.password.clone(), record.password_hash.clone())
            .await
        {
            Ok(v) => v,
            Err(e) => {
                error!(error = %e, user_id = record.id, "verify_password failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !ok {
            warn!(user_id = record.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = record.id, "user logged in");
        Ok(record.to_authenticated())
    }

    pub async fn save_current_user(&self, user: &AuthenticatedUser) -> Result<(), AuthError> {
        let text = serde_json::to_string(user).map_err(anyhow::Error::from)?;
        self.storage.set_item(&self.current_user_key, &text).await?;
        Ok(())
    }

    /// `None` when nobody is logged in or the slot does not hold a user.
    pub async fn get_current_user(&self) -> Result<Option<AuthenticatedUser>, AuthError> {
        let Some(text) = self.storage.get_item(&self.current_user_key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(key = %self.current_user_key, error = %e, "stored current user is malformed");
                Ok(None)
            }
        }
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.storage.remove_item(&self.current_user_key).await?;
        info!("current user cleared");
        Ok(())
    }
}
