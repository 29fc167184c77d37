//! Session store: the client's belief about authentication and admin rights.
//!
//! The store is built once in the composition root and handed to screens.
//! Every read of the persisted flags goes through [`SessionStore::check_status`];
//! every write goes through [`SessionStore::login`] or [`SessionStore::logout`].

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::AccessToken;
use super::ports::{AUTH_TOKEN_KEY, IS_ADMIN_KEY, SessionStorage, SessionStorageError};

/// Snapshot of the session flags.
///
/// ## Invariants
/// - `is_authenticated` is true exactly when `token` is present.
/// - `is_admin` implies `is_authenticated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    token: Option<AccessToken>,
    is_admin: bool,
    loading: bool,
}

impl SessionState {
    /// State before the persisted flags have been read.
    pub fn initial() -> Self {
        Self {
            token: None,
            is_admin: false,
            loading: true,
        }
    }

    fn signed_out() -> Self {
        Self {
            token: None,
            is_admin: false,
            loading: false,
        }
    }

    fn signed_in(token: AccessToken, is_admin: bool) -> Self {
        Self {
            token: Some(token),
            is_admin,
            loading: false,
        }
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin && self.is_authenticated()
    }

    /// True until the persisted flags have been read once.
    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Session state container backed by a [`SessionStorage`] port.
pub struct SessionStore<S> {
    storage: Arc<S>,
    state: watch::Sender<SessionState>,
}

impl<S> SessionStore<S>
where
    S: SessionStorage,
{
    /// Create a store in the initial (loading) state.
    pub fn new(storage: Arc<S>) -> Self {
        let (state, _) = watch::channel(SessionState::initial());
        Self { storage, state }
    }

    /// Current snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Observe every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Persist a fresh session and flip the flags.
    ///
    /// # Errors
    ///
    /// Returns the storage error when either entry cannot be written; the
    /// in-memory flags are left unchanged in that case.
    pub fn login(&self, token: AccessToken, is_admin: bool) -> Result<(), SessionStorageError> {
        self.storage.set(AUTH_TOKEN_KEY, token.as_str())?;
        self.storage
            .set(IS_ADMIN_KEY, if is_admin { "true" } else { "false" })?;
        debug!(token = %token.preview(), is_admin, "session stored");
        self.state.send_replace(SessionState::signed_in(token, is_admin));
        Ok(())
    }

    /// Forget the persisted session and clear the flags.
    ///
    /// # Errors
    ///
    /// Returns the storage error when an entry cannot be removed. The
    /// in-memory flags are cleared regardless so the current process stops
    /// sending the token.
    pub fn logout(&self) -> Result<(), SessionStorageError> {
        self.state.send_replace(SessionState::signed_out());
        self.storage.remove(AUTH_TOKEN_KEY)?;
        self.storage.remove(IS_ADMIN_KEY)?;
        debug!("session cleared");
        Ok(())
    }

    /// Re-derive the flags from persisted storage.
    ///
    /// Unreadable storage is treated as an absent session, which sends the
    /// user back to the login screen rather than failing the navigation.
    pub fn check_status(&self) -> SessionState {
        let next = match self.read_persisted() {
            Ok(state) => state,
            Err(error) => {
                warn!(
                    kind = error.kind(),
                    error = %error,
                    "session storage unreadable; treating as signed out"
                );
                SessionState::signed_out()
            }
        };
        self.state.send_replace(next.clone());
        next
    }

    fn read_persisted(&self) -> Result<SessionState, SessionStorageError> {
        let token = self
            .storage
            .get(AUTH_TOKEN_KEY)?
            .and_then(|raw| AccessToken::new(raw).ok());
        let Some(token) = token else {
            return Ok(SessionState::signed_out());
        };
        let is_admin = self.storage.get(IS_ADMIN_KEY)?.as_deref() == Some("true");
        Ok(SessionState::signed_in(token, is_admin))
    }
}
