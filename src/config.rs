use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_DATA_DIR: &str = ".member-data";
pub const DEFAULT_KEY_PREFIX: &str = "simple_member_app_";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory backing the file storage.
    pub data_dir: PathBuf,
    /// Prepended to the `users` and `current_user` slot names.
    pub key_prefix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            key_prefix: DEFAULT_KEY_PREFIX.into(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("MEMBER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let key_prefix = lookup("MEMBER_KEY_PREFIX").unwrap_or_else(|| DEFAULT_KEY_PREFIX.into());
        anyhow::ensure!(
            !key_prefix.contains(['/', '\\']),
            "MEMBER_KEY_PREFIX must not contain path separators"
        );
        Ok(Self {
            data_dir,
            key_prefix,
        })
    }
}
