//! Authentication primitives: login credentials and the bearer token.
//!
//! Keep raw form input parsing in these constructors so the login flow only
//! ever talks to the API with non-empty values.

use std::fmt;

use zeroize::Zeroizing;

const TOKEN_PREVIEW_CHARS: usize = 20;

/// Domain error returned when login values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Identifier was missing or blank once trimmed.
    EmptyId,
    /// Password was blank.
    EmptyPassword,
    /// The API answered with an empty token.
    EmptyToken,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "identifier must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyToken => write!(f, "authentication token must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials sent to `POST /login`.
///
/// ## Invariants
/// - `id` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace.
///
/// # Examples
/// ```
/// use conference_frontend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "password").unwrap();
/// assert_eq!(creds.id(), "admin");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    id: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw identifier/password inputs.
    pub fn try_from_parts(id: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = id.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyId);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            id: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Account identifier.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("id", &self.id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque bearer token issued by `POST /login`.
///
/// No expiry is tracked: a token stays usable client-side until logout.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a token string.
    pub fn new(raw: impl Into<String>) -> Result<Self, LoginValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(LoginValidationError::EmptyToken);
        }
        Ok(Self(Zeroizing::new(raw)))
    }

    /// Raw token for the `Authorization` header and session storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// First characters of the token, safe to log.
    pub fn preview(&self) -> String {
        let head: String = self.0.chars().take(TOKEN_PREVIEW_CHARS).collect();
        format!("{head}...")
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&self.preview()).finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyId)]
    #[case("   ", "pw", LoginValidationError::EmptyId)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] id: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(id, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin  ", "secret")]
    #[case("alice", " spaced password ")]
    fn valid_credentials_trim_id_only(#[case] id: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(id, password).expect("valid inputs");
        assert_eq!(creds.id(), id.trim());
        assert_eq!(creds.password(), password);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let creds = LoginCredentials::try_from_parts("alice", "hunter22").expect("valid");
        assert!(!format!("{creds:?}").contains("hunter22"));

        let token = AccessToken::new("abcdefghijklmnopqrstuvwxyz0123456789").expect("token");
        let rendered = format!("{token:?}");
        assert!(rendered.contains("abcdefghijklmnopqrst..."));
        assert!(!rendered.contains("uvwxyz"));
    }

    #[test]
    fn blank_tokens_are_rejected() {
        assert_eq!(AccessToken::new("  "), Err(LoginValidationError::EmptyToken));
    }
}
