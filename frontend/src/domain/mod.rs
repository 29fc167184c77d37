//! Domain primitives, stores and services of the conference client.
//!
//! Purpose: model conferences, users and the session independently of the
//! HTTP adapter and the terminal screens. Driven ports live in [`ports`].
//!
//! Public surface:
//! - Conference, ConferenceId: the cached event records.
//! - ConferenceStore: cache synchronised with the API after each mutation.
//! - SessionStore: token and admin flag, persisted through a port.
//! - route_guard: admin route guard and navigation menu.
//! - forms: local validation of the editor forms.

pub mod auth;
pub mod conference;
pub mod conference_store;
pub mod error;
pub mod forms;
pub mod login;
pub mod ports;
pub mod route_guard;
pub mod session;
pub mod user;
pub mod user_admin;

pub use self::auth::{AccessToken, LoginCredentials, LoginValidationError};
pub use self::conference::{
    Conference, ConferenceId, ConferenceIdError, DEFAULT_MAIN_COLOR, DEFAULT_SECOND_COLOR, Design,
    Location, Speaker, Stakeholder,
};
pub use self::conference_store::{ConferenceAction, ConferenceState, ConferenceStore, LoadStatus};
pub use self::error::{Error, ErrorCode};
pub use self::forms::{ConferenceForm, FormErrors, UserForm};
pub use self::login::LoginService;
pub use self::route_guard::{GuardDecision, NavItem, Route};
pub use self::session::{SessionState, SessionStore};
pub use self::user::{NewUserAccount, UserAccount, UserId, UserRole, UserStats, UserValidationError};
pub use self::user_admin::UserAdminService;
