pub mod dto;
pub mod error;
pub mod password;
pub mod repo;
mod repo_types;
pub mod session;
pub mod validation;

pub use repo_types::UserRecord;
