//! User account model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Validation errors for user account values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    UnknownRole(String),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::UnknownRole(raw) => write!(
                f,
                "unknown role '{raw}': expected 'standard' or 'administrator'",
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Unique account identifier chosen at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Account role. Serialised with the API's `user` / `admin` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    #[serde(rename = "user")]
    Standard,
    #[serde(rename = "admin")]
    Administrator,
}

impl UserRole {
    /// Value sent to and received from the API.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Standard => "user",
            Self::Administrator => "admin",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Administrator => "administrator",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UserRole {
    type Err = UserValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "standard" | "user" => Ok(Self::Standard),
            "administrator" | "admin" => Ok(Self::Administrator),
            _ => Err(UserValidationError::UnknownRole(raw.to_owned())),
        }
    }
}

/// Account as listed by the API. Passwords are never read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    #[serde(rename = "type", default)]
    pub role: UserRole,
}

/// Account creation request produced by the user form.
///
/// ## Invariants
/// - Only constructed from a validated form; the password confirmation has
///   already been checked and dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    id: UserId,
    password: Zeroizing<String>,
    role: UserRole,
}

impl NewUserAccount {
    pub(crate) fn new(id: UserId, password: String, role: UserRole) -> Self {
        Self {
            id,
            password: Zeroizing::new(password),
            role,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn role(&self) -> UserRole {
        self.role
    }
}

impl fmt::Debug for NewUserAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUserAccount")
            .field("id", &self.id)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Per-role totals shown above the user table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub administrators: usize,
    pub standard: usize,
}

impl UserStats {
    /// Count accounts per role.
    pub fn from_accounts(accounts: &[UserAccount]) -> Self {
        accounts.iter().fold(Self::default(), |mut stats, account| {
            stats.total += 1;
            match account.role {
                UserRole::Administrator => stats.administrators += 1,
                UserRole::Standard => stats.standard += 1,
            }
            stats
        })
    }
}
