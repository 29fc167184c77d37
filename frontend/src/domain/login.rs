//! Login flow: credential exchange, admin check, session persistence.

use std::sync::Arc;

use tracing::{info, warn};

use super::ports::{ConferenceApi, SessionStorage};
use super::session::{SessionState, SessionStore};
use super::{Error, LoginCredentials};

/// Orchestrates `POST /login` followed by `GET /isadmin`.
pub struct LoginService<A, S> {
    api: Arc<A>,
    session: Arc<SessionStore<S>>,
}

impl<A, S> LoginService<A, S>
where
    A: ConferenceApi,
    S: SessionStorage,
{
    pub fn new(api: Arc<A>, session: Arc<SessionStore<S>>) -> Self {
        Self { api, session }
    }

    /// Exchange credentials for a token and store the resulting session.
    ///
    /// A failing admin check does not fail the login: the session is stored
    /// with `is_admin = false` instead.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::Unauthorized`] when the API rejects
    /// the credentials, the mapped API error for other failures, and an
    /// internal error when the session cannot be persisted.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<SessionState, Error> {
        let token = self.api.login(credentials).await.map_err(|error| {
            warn!(id = credentials.id(), error = %error, "login rejected");
            match error.status() {
                Some(400..=499) => Error::unauthorized("invalid credentials"),
                _ => Error::from(error),
            }
        })?;

        let is_admin = match self.api.is_admin(&token).await {
            Ok(is_admin) => is_admin,
            Err(error) => {
                warn!(
                    token = %token.preview(),
                    error = %error,
                    "admin check failed; continuing without admin rights"
                );
                false
            }
        };

        self.session
            .login(token, is_admin)
            .map_err(|error| Error::internal(format!("failed to store session: {error}")))?;
        info!(id = credentials.id(), is_admin, "logged in");
        Ok(self.session.state())
    }

    /// Drop the stored session.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the persisted entries cannot be removed.
    pub fn logout(&self) -> Result<(), Error> {
        self.session
            .logout()
            .map_err(|error| Error::internal(format!("failed to clear session: {error}")))?;
        info!("logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Login flow coverage against a mocked API.
    use super::*;
    use crate::domain::ports::{ApiError, IS_ADMIN_KEY, MockConferenceApi};
    use crate::domain::{AccessToken, ErrorCode};
    use crate::outbound::session_storage::InMemorySessionStorage;
    use rstest::{fixture, rstest};

    type Service = LoginService<MockConferenceApi, InMemorySessionStorage>;

    #[fixture]
    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("alice", "s3cret!").expect("fixture credentials")
    }

    fn service(api: MockConferenceApi) -> (Service, Arc<InMemorySessionStorage>) {
        let storage = Arc::new(InMemorySessionStorage::default());
        let session = Arc::new(SessionStore::new(Arc::clone(&storage)));
        (LoginService::new(Arc::new(api), session), storage)
    }

    fn token() -> AccessToken {
        AccessToken::new("tok-alice").expect("token")
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn stores_admin_flag_reported_by_api(
        credentials: LoginCredentials,
        #[case] is_admin: bool,
    ) {
        let mut api = MockConferenceApi::new();
        api.expect_login().times(1).return_once(|_| Ok(token()));
        api.expect_is_admin()
            .times(1)
            .return_once(move |_| Ok(is_admin));
        let (service, storage) = service(api);

        let state = service.login(&credentials).await.expect("login");

        assert!(state.is_authenticated());
        assert_eq!(state.is_admin(), is_admin);
        assert_eq!(
            storage.get(IS_ADMIN_KEY).expect("read"),
            Some(is_admin.to_string())
        );
    }

    #[rstest]
    #[tokio::test]
    async fn admin_check_failure_downgrades_to_standard(credentials: LoginCredentials) {
        let mut api = MockConferenceApi::new();
        api.expect_login().times(1).return_once(|_| Ok(token()));
        api.expect_is_admin()
            .times(1)
            .return_once(|_| Err(ApiError::http(500_u16, "isadmin exploded")));
        let (service, _) = service(api);

        let state = service.login(&credentials).await.expect("login still succeeds");

        assert!(state.is_authenticated());
        assert!(!state.is_admin());
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_credentials_do_not_touch_the_session(credentials: LoginCredentials) {
        let mut api = MockConferenceApi::new();
        api.expect_login()
            .times(1)
            .return_once(|_| Err(ApiError::http(401_u16, "bad password")));
        api.expect_is_admin().times(0);
        let (service, storage) = service(api);

        let err = service.login(&credentials).await.expect_err("login fails");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(storage.get(IS_ADMIN_KEY).expect("read"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_api_is_reported_as_unavailable(credentials: LoginCredentials) {
        let mut api = MockConferenceApi::new();
        api.expect_login()
            .times(1)
            .return_once(|_| Err(ApiError::transport("connection refused")));
        let (service, _) = service(api);

        let err = service.login(&credentials).await.expect_err("login fails");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
