//! Membership core: form validation, a mock credential store over an
//! injectable key-value medium, and the session flow that ties them together.

pub mod auth;
pub mod cli;
pub mod config;
pub mod state;
pub mod storage;

pub use auth::dto::{AuthenticatedUser, LoginForm, LoginInput, RegistrationForm, RegistrationInput};
pub use auth::error::AuthError;
pub use auth::repo::CredentialStore;
pub use auth::session::AuthSession;
pub use auth::validation::{Field, FormValidation, ValidationError};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
