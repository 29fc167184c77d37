//! Reqwest-backed conference API adapter.
//!
//! This adapter owns transport details only: URL building with
//! percent-encoded identifiers, bearer authentication, HTTP error mapping and
//! JSON decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{
    CreatedDto, CredentialsDto, IsAdminDto, LoginResponseDto, RoleChangeDto, UserAccountDto,
};
use crate::domain::ports::{ApiError, ConferenceApi};
use crate::domain::{
    AccessToken, Conference, ConferenceId, LoginCredentials, NewUserAccount, UserAccount, UserId,
    UserRole,
};

/// Conference API client bound to one base URL.
#[derive(Debug, Clone)]
pub struct HttpConferenceApi {
    client: Client,
    base_url: Url,
}

impl HttpConferenceApi {
    /// Build an adapter; `timeout` of `None` leaves requests unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        endpoint_url(&self.base_url, segments)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&AccessToken>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        debug!(method = %method, url = %url, "conference API request");
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        Ok(match token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_status_error(status, body.as_ref());
            warn!(
                url = %url,
                status = status.as_u16(),
                kind = error.kind(),
                body = %body_preview(body.as_ref()),
                "conference API error"
            );
            return Err(error);
        }
        Ok(body.to_vec())
    }
}

fn endpoint_url(base_url: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| ApiError::transport(format!("base URL {base_url} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|error| ApiError::decode(format!("invalid {what} payload: {error}")))
}

/// Merge the create response into the submitted record.
///
/// A response without an identifier leaves the client-generated one in place.
fn created_conference(submitted: &Conference, body: &[u8]) -> Result<Conference, ApiError> {
    let created: CreatedDto = decode(body, "created conference")?;
    match created.into_id().map_err(ApiError::decode)? {
        Some(id) => Ok(submitted.clone().with_id(id)),
        None => {
            debug!(id = %submitted.id, "create response carried no id; keeping client id");
            Ok(submitted.clone())
        }
    }
}

#[async_trait]
impl ConferenceApi for HttpConferenceApi {
    async fn list_conferences(&self) -> Result<Vec<Conference>, ApiError> {
        let body = self
            .send(self.request(Method::GET, &["conferences"], None)?)
            .await?;
        decode(&body, "conference list")
    }

    async fn get_conference(&self, id: &ConferenceId) -> Result<Conference, ApiError> {
        let body = self
            .send(self.request(Method::GET, &["conference", id.as_ref()], None)?)
            .await?;
        decode(&body, "conference")
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, ApiError> {
        let request = self
            .request(Method::POST, &["login"], None)?
            .json(&CredentialsDto {
                id: credentials.id(),
                password: credentials.password(),
            });
        let body = self.send(request).await?;
        let response: LoginResponseDto = decode(&body, "login")?;
        AccessToken::new(response.into_token())
            .map_err(|error| ApiError::decode(format!("invalid login payload: {error}")))
    }

    async fn is_admin(&self, token: &AccessToken) -> Result<bool, ApiError> {
        let body = self
            .send(self.request(Method::GET, &["isadmin"], Some(token))?)
            .await?;
        let response: IsAdminDto = decode(&body, "admin check")?;
        Ok(response.is_admin)
    }

    async fn create_conference(
        &self,
        token: &AccessToken,
        conference: &Conference,
    ) -> Result<Conference, ApiError> {
        let request = self
            .request(Method::POST, &["conference"], Some(token))?
            .json(conference);
        let body = self.send(request).await?;
        created_conference(conference, &body)
    }

    async fn update_conference(
        &self,
        token: &AccessToken,
        id: &ConferenceId,
        conference: &Conference,
    ) -> Result<Conference, ApiError> {
        let request = self
            .request(Method::PATCH, &["conference", id.as_ref()], Some(token))?
            .json(conference);
        self.send(request).await?;
        Ok(conference.clone().with_id(id.clone()))
    }

    async fn delete_conference(
        &self,
        token: &AccessToken,
        id: &ConferenceId,
    ) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &["conference", id.as_ref()], Some(token))?)
            .await?;
        Ok(())
    }

    async fn list_users(&self, token: &AccessToken) -> Result<Vec<UserAccount>, ApiError> {
        let body = self
            .send(self.request(Method::GET, &["users"], Some(token))?)
            .await?;
        let rows: Vec<UserAccountDto> = decode(&body, "user list")?;
        Ok(user_accounts(rows))
    }

    async fn create_user(&self, account: &NewUserAccount) -> Result<(), ApiError> {
        let endpoint = match account.role() {
            UserRole::Administrator => "signupadmin",
            UserRole::Standard => "signup",
        };
        let request = self
            .request(Method::POST, &[endpoint], None)?
            .json(&CredentialsDto {
                id: account.id().as_ref(),
                password: account.password(),
            });
        self.send(request).await?;
        Ok(())
    }

    async fn delete_user(&self, token: &AccessToken, id: &UserId) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &["user", id.as_ref()], Some(token))?)
            .await?;
        Ok(())
    }

    async fn change_user_role(
        &self,
        token: &AccessToken,
        id: &UserId,
        role: UserRole,
    ) -> Result<(), ApiError> {
        let request = self
            .request(Method::PATCH, &["usertype", id.as_ref()], Some(token))?
            .json(&RoleChangeDto {
                new_type: role.as_wire(),
            });
        self.send(request).await?;
        Ok(())
    }
}

fn user_accounts(rows: Vec<UserAccountDto>) -> Vec<UserAccount> {
    let total = rows.len();
    let accounts: Vec<UserAccount> = rows
        .into_iter()
        .filter_map(UserAccountDto::into_account)
        .collect();
    if accounts.len() < total {
        warn!(skipped = total - accounts.len(), "user rows without an id were skipped");
    }
    accounts
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::transport(format!("request timed out: {error}"))
    } else if error.is_decode() {
        ApiError::decode(error.to_string())
    } else {
        ApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    ApiError::http(status.as_u16(), String::from_utf8_lossy(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
