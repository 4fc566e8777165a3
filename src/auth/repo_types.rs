use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::dto::AuthenticatedUser;

/// User record as persisted in the `users` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub nickname: String,
    pub email: String,                // exact-match key, case-sensitive
    pub password_hash: String,        // Argon2 PHC string
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl UserRecord {
    pub fn to_authenticated(&self) -> AuthenticatedUser {
        AuthenticatedUser {
            id: self.id,
            nickname: self.nickname.clone(),
            email: self.email.clone(),
        }
    }
}
