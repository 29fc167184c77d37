//! User account administration.
//!
//! Unlike conferences, user changes are never applied locally: every
//! successful mutation is followed by a full reload of the list from the API.

use std::sync::Arc;

use tracing::info;

use super::forms::UserForm;
use super::ports::ConferenceApi;
use super::{AccessToken, Error, UserAccount, UserId, UserRole};

/// Server-first user management for the admin users screen.
pub struct UserAdminService<A> {
    api: Arc<A>,
}

impl<A> UserAdminService<A>
where
    A: ConferenceApi,
{
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Load the full account list.
    ///
    /// # Errors
    ///
    /// Returns the API failure mapped to a domain [`Error`].
    pub async fn load(&self, token: &AccessToken) -> Result<Vec<UserAccount>, Error> {
        self.api.list_users(token).await.map_err(Error::from)
    }

    /// Validate the form, create the account, then reload.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error carrying per-field messages when the
    /// form fails validation (the API is not called), or the API failure.
    pub async fn create(
        &self,
        token: &AccessToken,
        form: &UserForm,
    ) -> Result<Vec<UserAccount>, Error> {
        let account = form.validate().map_err(Error::from)?;
        self.api.create_user(&account).await.map_err(Error::from)?;
        info!(id = %account.id(), role = %account.role(), "user created");
        self.load(token).await
    }

    /// Change an account's role, then reload.
    ///
    /// # Errors
    ///
    /// Returns the API failure mapped to a domain [`Error`].
    pub async fn change_role(
        &self,
        token: &AccessToken,
        id: &UserId,
        role: UserRole,
    ) -> Result<Vec<UserAccount>, Error> {
        self.api
            .change_user_role(token, id, role)
            .await
            .map_err(Error::from)?;
        info!(id = %id, role = %role, "user role changed");
        self.load(token).await
    }

    /// Delete an account, then reload.
    ///
    /// # Errors
    ///
    /// Returns the API failure mapped to a domain [`Error`].
    pub async fn delete(&self, token: &AccessToken, id: &UserId) -> Result<Vec<UserAccount>, Error> {
        self.api.delete_user(token, id).await.map_err(Error::from)?;
        info!(id = %id, "user deleted");
        self.load(token).await
    }
}
