//! Wire payloads of the conference API that have no domain counterpart.
//!
//! Conference records decode straight into domain types; these DTOs cover
//! request bodies, the user listing and the loosely shaped login and create
//! responses.

use serde::{Deserialize, Serialize};

use crate::domain::{ConferenceId, UserAccount, UserId};

/// Body of `POST /login`, `POST /signup` and `POST /signupadmin`.
#[derive(Serialize)]
pub(super) struct CredentialsDto<'a> {
    pub(super) id: &'a str,
    pub(super) password: &'a str,
}

/// Body of `PATCH /usertype/{id}`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RoleChangeDto {
    pub(super) new_type: &'static str,
}

/// Response of `GET /isadmin`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IsAdminDto {
    pub(super) is_admin: bool,
}

/// Response of `POST /login`: a bare JSON string, or an object wrapping it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum LoginResponseDto {
    Bare(String),
    Wrapped {
        #[serde(alias = "Token")]
        token: String,
    },
}

impl LoginResponseDto {
    pub(super) fn into_token(self) -> String {
        match self {
            Self::Bare(token) | Self::Wrapped { token } => token,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum IdValueDto {
    Text(String),
    Number(serde_json::Number),
}

impl IdValueDto {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Row of `GET /users`.
#[derive(Debug, Deserialize)]
pub(super) struct UserAccountDto {
    #[serde(default)]
    id: Option<IdValueDto>,
    #[serde(rename = "type", default)]
    role: Option<serde_json::Value>,
}

impl UserAccountDto {
    /// `None` when the row has no usable identifier. A missing or unknown
    /// role reads as standard.
    pub(super) fn into_account(self) -> Option<UserAccount> {
        let id = UserId::new(self.id?.into_text()).ok()?;
        let role = self
            .role
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        Some(UserAccount { id, role })
    }
}

/// Response of `POST /conference`: the new identifier, either bare or inside
/// an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum CreatedDto {
    Bare(IdValueDto),
    Object { id: Option<IdValueDto> },
}

impl CreatedDto {
    /// Server-assigned identifier, if the response carried one.
    pub(super) fn into_id(self) -> Result<Option<ConferenceId>, String> {
        let value = match self {
            Self::Bare(value) | Self::Object { id: Some(value) } => value,
            Self::Object { id: None } => return Ok(None),
        };
        ConferenceId::new(value.into_text())
            .map(Some)
            .map_err(|error| format!("created conference id invalid: {error}"))
    }
}
