//! Driven port for the remote conference-management API.
//!
//! One method per endpoint. The domain owns the request and response types so
//! stores and services stay adapter-agnostic; the reqwest adapter lives in
//! `outbound::http`.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{
    AccessToken, Conference, ConferenceId, LoginCredentials, NewUserAccount, UserAccount, UserId,
    UserRole,
};

define_port_error! {
    /// Errors surfaced while calling the conference API.
    pub enum ApiError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "conference API transport failed: {message}",
        /// The API answered with a non-success status.
        Http { status: u16, body: String } =>
            "HTTP error: {status} - {body}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "conference API response decode failed: {message}",
    }
}

impl ApiError {
    /// HTTP status for [`ApiError::Http`] failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Port for the conference-management REST API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConferenceApi: Send + Sync {
    /// `GET /conferences`.
    async fn list_conferences(&self) -> Result<Vec<Conference>, ApiError>;

    /// `GET /conference/{id}`.
    async fn get_conference(&self, id: &ConferenceId) -> Result<Conference, ApiError>;

    /// `POST /login`; exchanges credentials for a bearer token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, ApiError>;

    /// `GET /isadmin`; reports whether the token belongs to an administrator.
    async fn is_admin(&self, token: &AccessToken) -> Result<bool, ApiError>;

    /// `POST /conference`; returns the submitted record carrying the
    /// identifier assigned by the server.
    async fn create_conference(
        &self,
        token: &AccessToken,
        conference: &Conference,
    ) -> Result<Conference, ApiError>;

    /// `PATCH /conference/{id}`; returns the submitted record under `id`.
    async fn update_conference(
        &self,
        token: &AccessToken,
        id: &ConferenceId,
        conference: &Conference,
    ) -> Result<Conference, ApiError>;

    /// `DELETE /conference/{id}`.
    async fn delete_conference(&self, token: &AccessToken, id: &ConferenceId)
    -> Result<(), ApiError>;

    /// `GET /users`.
    async fn list_users(&self, token: &AccessToken) -> Result<Vec<UserAccount>, ApiError>;

    /// `POST /signup` or `POST /signupadmin` depending on the requested role.
    async fn create_user(&self, account: &NewUserAccount) -> Result<(), ApiError>;

    /// `DELETE /user/{id}`.
    async fn delete_user(&self, token: &AccessToken, id: &UserId) -> Result<(), ApiError>;

    /// `PATCH /usertype/{id}`.
    async fn change_user_role(
        &self,
        token: &AccessToken,
        id: &UserId,
        role: UserRole,
    ) -> Result<(), ApiError>;
}
