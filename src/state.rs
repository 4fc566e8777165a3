use crate::auth::repo::CredentialStore;
use crate::config::AppConfig;
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: CredentialStore,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let storage = Arc::new(FileStorage::new(config.data_dir.clone())) as Arc<dyn KeyValueStorage>;
        tracing::debug!(dir = %config.data_dir.display(), "file storage ready");
        Ok(Self::from_parts(config, storage))
    }

    pub fn from_parts(config: Arc<AppConfig>, storage: Arc<dyn KeyValueStorage>) -> Self {
        let store = CredentialStore::new(storage, &config.key_prefix);
        Self { config, store }
    }

    /// In-memory state for tests.
    pub fn fake() -> Self {
        let storage = Arc::new(MemoryStorage::new()) as Arc<dyn KeyValueStorage>;
        Self::from_parts(Arc::new(AppConfig::default()), storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_state_uses_prefixed_slots() {
        let state = AppState::fake();
        assert_eq!(state.config.key_prefix, "simple_member_app_");
        assert_eq!(state.store.users_key(), "simple_member_app_users");
        assert_eq!(state.store.current_user_key(), "simple_member_app_current_user");
        assert_eq!(state.store.get_current_user().await.unwrap(), None);
    }
}
