use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{AuthenticatedUser, LoginForm, RegistrationForm},
    error::AuthError,
    repo::CredentialStore,
    validation::{validate_login_form, validate_registration_form},
};

/// Caller-side auth flow: validate, hit the store, keep the current user.
pub struct AuthSession {
    store: CredentialStore,
    user: Option<AuthenticatedUser>,
}

impl AuthSession {
    /// Picks up whoever is saved in the current-session slot.
    pub async fn restore(store: CredentialStore) -> Result<Self, AuthError> {
        let user = store.get_current_user().await?;
        if let Some(u) = &user {
            info!(user_id = u.id, "session restored");
        }
        Ok(Self { store, user })
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[instrument(skip(self, form))]
    pub async fn register(
        &mut self,
        form: &RegistrationForm,
    ) -> Result<AuthenticatedUser, AuthError> {
        let validation = validate_registration_form(form);
        if !validation.is_valid() {
            warn!(errors = %validation, "registration form rejected");
            return Err(AuthError::Validation(validation));
        }

        let input = form.to_input();
        if self.store.is_email_exists(&input.email).await? {
            warn!(email = %input.email, "email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let user = self.store.register_user(&input).await?;
        self.store.save_current_user(&user).await?;
        self.user = Some(user.clone());
        Ok(user)
    }

    #[instrument(skip(self, form))]
    pub async fn login(&mut self, form: &LoginForm) -> Result<AuthenticatedUser, AuthError> {
        let validation = validate_login_form(form);
        if !validation.is_valid() {
            warn!(errors = %validation, "login form rejected");
            return Err(AuthError::Validation(validation));
        }

        let user = self.store.login_user(&form.to_input()).await?;
        self.store.save_current_user(&user).await?;
        self.user = Some(user.clone());
        Ok(user)
    }

    pub async fn logout(&mut self) -> Result<(), AuthError> {
        self.store.logout().await?;
        self.user = None;
        Ok(())
    }
}
