//! In-memory conference cache and its synchronisation contract with the API.
//!
//! [`ConferenceState`] is a plain value with a pure transition function,
//! [`ConferenceState::apply`]. [`ConferenceStore`] drives the transitions from
//! API calls and publishes every new state through a `watch` channel.
//!
//! Overlapping fetches are tagged with increasing sequence numbers; a response
//! older than the newest one already applied is dropped so a slow request can
//! never overwrite fresher data.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::ports::ConferenceApi;
use super::{AccessToken, Conference, ConferenceId, Error};

/// Progress of the last store operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch or mutation is in flight.
    Loading,
    /// The list reflects the last successful operation.
    Ready,
    /// The last operation failed with this message.
    Failed(String),
}

/// Sequence number attached to one `fetch_all` call.
pub type FetchSeq = u64;

/// Transitions accepted by [`ConferenceState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConferenceAction {
    /// A fetch or mutation started.
    Started,
    /// A fetch completed with the full list.
    Fetched {
        seq: FetchSeq,
        conferences: Vec<Conference>,
    },
    /// A fetch failed.
    FetchFailed { seq: FetchSeq, message: String },
    /// The API confirmed a creation.
    Added(Conference),
    /// The API confirmed an update.
    Replaced(Conference),
    /// The API confirmed a deletion.
    Removed(ConferenceId),
    /// A mutation failed; the list is kept as it was.
    MutationFailed(String),
    /// Dismiss the current error.
    ClearError,
}

/// Cached conference list plus load status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConferenceState {
    conferences: Vec<Conference>,
    status: LoadStatus,
    applied_fetch: FetchSeq,
}

impl ConferenceState {
    pub fn conferences(&self) -> &[Conference] {
        &self.conferences
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// Message of the last failure, if the store is in the failed state.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Look up a cached record.
    pub fn find(&self, id: &ConferenceId) -> Option<&Conference> {
        self.conferences.iter().find(|conference| &conference.id == id)
    }

    /// Newest fetch sequence number whose outcome has been applied.
    pub fn applied_fetch(&self) -> FetchSeq {
        self.applied_fetch
    }

    /// Pure transition function.
    #[must_use]
    pub fn apply(mut self, action: ConferenceAction) -> Self {
        match action {
            ConferenceAction::Started => {
                self.status = LoadStatus::Loading;
            }
            ConferenceAction::Fetched { seq, conferences } => {
                if seq < self.applied_fetch {
                    return self;
                }
                self.applied_fetch = seq;
                self.conferences = conferences;
                self.status = LoadStatus::Ready;
            }
            ConferenceAction::FetchFailed { seq, message } => {
                if seq < self.applied_fetch {
                    return self;
                }
                self.applied_fetch = seq;
                self.status = LoadStatus::Failed(message);
            }
            ConferenceAction::Added(conference) => {
                self.conferences.push(conference);
                self.status = LoadStatus::Ready;
            }
            ConferenceAction::Replaced(conference) => {
                if let Some(slot) = self
                    .conferences
                    .iter_mut()
                    .find(|existing| existing.id == conference.id)
                {
                    *slot = conference;
                }
                self.status = LoadStatus::Ready;
            }
            ConferenceAction::Removed(id) => {
                self.conferences.retain(|conference| conference.id != id);
                self.status = LoadStatus::Ready;
            }
            ConferenceAction::MutationFailed(message) => {
                self.status = LoadStatus::Failed(message);
            }
            ConferenceAction::ClearError => {
                if matches!(self.status, LoadStatus::Failed(_)) {
                    self.status = if self.applied_fetch == 0 && self.conferences.is_empty() {
                        LoadStatus::Idle
                    } else {
                        LoadStatus::Ready
                    };
                }
            }
        }
        self
    }
}

/// Conference cache wired to a [`ConferenceApi`].
pub struct ConferenceStore<A> {
    api: Arc<A>,
    state: watch::Sender<ConferenceState>,
    next_fetch: AtomicU64,
}

impl<A> ConferenceStore<A>
where
    A: ConferenceApi,
{
    /// Create an idle store.
    pub fn new(api: Arc<A>) -> Self {
        let (state, _) = watch::channel(ConferenceState::default());
        Self {
            api,
            state,
            next_fetch: AtomicU64::new(0),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> ConferenceState {
        self.state.borrow().clone()
    }

    /// Observe every state change.
    pub fn subscribe(&self) -> watch::Receiver<ConferenceState> {
        self.state.subscribe()
    }

    fn dispatch(&self, action: ConferenceAction) {
        self.state
            .send_modify(|state| *state = std::mem::take(state).apply(action));
    }

    /// Replace the cached list with the server's.
    ///
    /// Failures are recorded in the state and not returned; callers render
    /// the state afterwards.
    pub async fn fetch_all(&self) {
        let seq = self.next_fetch.fetch_add(1, Ordering::Relaxed) + 1;
        self.dispatch(ConferenceAction::Started);
        match self.api.list_conferences().await {
            Ok(conferences) => {
                debug!(seq, count = conferences.len(), "conferences fetched");
                self.dispatch(ConferenceAction::Fetched { seq, conferences });
            }
            Err(error) => {
                warn!(seq, kind = error.kind(), error = %error, "conference fetch failed");
                self.dispatch(ConferenceAction::FetchFailed {
                    seq,
                    message: error.to_string(),
                });
            }
        }
    }

    /// Load one record for the detail view without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns the API failure mapped to a domain [`Error`].
    pub async fn fetch_one(&self, id: &ConferenceId) -> Result<Conference, Error> {
        self.api.get_conference(id).await.map_err(Error::from)
    }

    /// Create a record and append the server-confirmed version.
    ///
    /// # Errors
    ///
    /// Records the failure in the state and returns it; the cached list is
    /// left untouched.
    pub async fn create(
        &self,
        token: &AccessToken,
        conference: &Conference,
    ) -> Result<Conference, Error> {
        self.dispatch(ConferenceAction::Started);
        match self.api.create_conference(token, conference).await {
            Ok(created) => {
                info!(id = %created.id, "conference created");
                self.dispatch(ConferenceAction::Added(created.clone()));
                Ok(created)
            }
            Err(error) => Err(self.mutation_failed(error.into())),
        }
    }

    /// Update a record and replace the cached copy by identifier.
    ///
    /// # Errors
    ///
    /// Records the failure in the state and returns it; the cached list is
    /// left untouched.
    pub async fn update(
        &self,
        token: &AccessToken,
        id: &ConferenceId,
        conference: &Conference,
    ) -> Result<Conference, Error> {
        self.dispatch(ConferenceAction::Started);
        match self.api.update_conference(token, id, conference).await {
            Ok(updated) => {
                info!(id = %updated.id, "conference updated");
                self.dispatch(ConferenceAction::Replaced(updated.clone()));
                Ok(updated)
            }
            Err(error) => Err(self.mutation_failed(error.into())),
        }
    }

    /// Delete a record and drop it from the cache once the API confirms.
    ///
    /// # Errors
    ///
    /// Records the failure in the state and returns it; the cached list is
    /// left untouched.
    pub async fn delete(&self, token: &AccessToken, id: &ConferenceId) -> Result<(), Error> {
        self.dispatch(ConferenceAction::Started);
        match self.api.delete_conference(token, id).await {
            Ok(()) => {
                info!(id = %id, "conference deleted");
                self.dispatch(ConferenceAction::Removed(id.clone()));
                Ok(())
            }
            Err(error) => Err(self.mutation_failed(error.into())),
        }
    }

    /// Dismiss the current error, if any.
    pub fn clear_error(&self) {
        self.dispatch(ConferenceAction::ClearError);
    }

    fn mutation_failed(&self, error: Error) -> Error {
        warn!(error = %error, "conference mutation failed");
        self.dispatch(ConferenceAction::MutationFailed(error.message().to_owned()));
        error
    }
}
