//! Screens: one async entry point per command.
//!
//! Each screen re-reads the session, runs the route guard, performs its API
//! work through the domain stores and services, then prints the result. A
//! screen never returns domain errors; it renders them and reports
//! [`Outcome::Failed`] so the binary can pick the exit status.

use std::io::{self, Write};
use std::sync::Arc;

use tracing::debug;

use super::render;
use crate::domain::ports::{ConferenceApi, SessionStorage};
use crate::domain::route_guard::navigation_items;
use crate::domain::{
    AccessToken, ConferenceForm, ConferenceId, ConferenceStore, Error, FormErrors,
    LoginCredentials, LoginService, Route, SessionState, SessionStore, UserAdminService, UserForm,
    UserId, UserRole, UserStats,
};

/// Result of running one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The screen rendered its content.
    Rendered,
    /// The route guard sent the user elsewhere.
    Redirected(Route),
    /// The screen rendered an error panel.
    Failed,
}

impl Outcome {
    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Rendered => 0,
            Self::Failed => 1,
            Self::Redirected(_) => 2,
        }
    }
}

/// Screen set sharing one session store and one conference store.
pub struct Screens<A, S> {
    session: Arc<SessionStore<S>>,
    conferences: ConferenceStore<A>,
    users: UserAdminService<A>,
    login: LoginService<A, S>,
}

impl<A, S> Screens<A, S>
where
    A: ConferenceApi,
    S: SessionStorage,
{
    pub fn new(api: Arc<A>, session: Arc<SessionStore<S>>) -> Self {
        Self {
            conferences: ConferenceStore::new(Arc::clone(&api)),
            users: UserAdminService::new(Arc::clone(&api)),
            login: LoginService::new(api, Arc::clone(&session)),
            session,
        }
    }

    /// Conference store backing the screens.
    pub fn conference_store(&self) -> &ConferenceStore<A> {
        &self.conferences
    }

    /// Re-read the session and run the guard for `route`.
    fn enter(&self, route: &Route, out: &mut dyn Write) -> io::Result<Result<SessionState, Outcome>> {
        let session = self.session.check_status();
        let decision = route.decide(&session);
        debug!(route = %route, ?decision, "navigation");
        match decision.redirect() {
            None => Ok(Ok(session)),
            Some(target) => {
                let hint = match target {
                    Route::Login => "Sign in with `conference-admin login --id <id> --password <password>`.",
                    _ => "This area is reserved to administrators.",
                };
                writeln!(out, "Redirected from {route} to {target}. {hint}")?;
                Ok(Err(Outcome::Redirected(target)))
            }
        }
    }

    /// Enter an admin route and return its bearer token.
    fn enter_admin(
        &self,
        route: &Route,
        out: &mut dyn Write,
    ) -> io::Result<Result<AccessToken, Outcome>> {
        Ok(match self.enter(route, out)? {
            Ok(session) => session.token().cloned().ok_or(Outcome::Redirected(Route::Login)),
            Err(outcome) => Err(outcome),
        })
    }

    fn failed(out: &mut dyn Write, context: &str, error: &Error) -> io::Result<Outcome> {
        write!(out, "{}", render::operation_error(context, error))?;
        Ok(Outcome::Failed)
    }

    fn invalid_form(out: &mut dyn Write, errors: &FormErrors) -> io::Result<Outcome> {
        write!(out, "{}", render::form_errors(errors))?;
        Ok(Outcome::Failed)
    }

    /// `/`: conference cards.
    pub async fn home(&self, out: &mut dyn Write) -> io::Result<Outcome> {
        if let Err(outcome) = self.enter(&Route::Home, out)? {
            return Ok(outcome);
        }
        self.conferences.fetch_all().await;
        let state = self.conferences.snapshot();
        write!(out, "{}", render::conference_list(&state))?;
        Ok(if state.error().is_some() {
            Outcome::Failed
        } else {
            Outcome::Rendered
        })
    }

    /// `/conference/{id}`: one conference in full.
    pub async fn detail(&self, id: &ConferenceId, out: &mut dyn Write) -> io::Result<Outcome> {
        let route = Route::ConferenceDetail(id.clone());
        if let Err(outcome) = self.enter(&route, out)? {
            return Ok(outcome);
        }
        match self.conferences.fetch_one(id).await {
            Ok(conference) => {
                write!(out, "{}", render::conference_detail(&conference))?;
                Ok(Outcome::Rendered)
            }
            Err(error) => {
                write!(
                    out,
                    "{}",
                    render::error_panel(
                        "Conference not found.",
                        error.message(),
                        &format!("conference-admin show {id}"),
                    )
                )?;
                Ok(Outcome::Failed)
            }
        }
    }

    /// `/login`: exchange credentials for a session.
    pub async fn login(&self, id: &str, password: &str, out: &mut dyn Write) -> io::Result<Outcome> {
        if let Err(outcome) = self.enter(&Route::Login, out)? {
            return Ok(outcome);
        }
        let credentials = match LoginCredentials::try_from_parts(id, password) {
            Ok(credentials) => credentials,
            Err(error) => return Self::invalid_form(out, &FormErrors::from(error)),
        };
        match self.login.login(&credentials).await {
            Ok(session) => {
                let role = if session.is_admin() {
                    UserRole::Administrator
                } else {
                    UserRole::Standard
                };
                writeln!(out, "Signed in as {} ({role}).", credentials.id())?;
                write!(out, "{}", render::navigation(&navigation_items(&session)))?;
                Ok(Outcome::Rendered)
            }
            Err(error) => Self::failed(out, "Login failed", &error),
        }
    }

    /// Drop the stored session.
    pub fn logout(&self, out: &mut dyn Write) -> io::Result<Outcome> {
        match self.login.logout() {
            Ok(()) => {
                writeln!(out, "Signed out.")?;
                Ok(Outcome::Rendered)
            }
            Err(error) => Self::failed(out, "Logout failed", &error),
        }
    }

    /// Navigation menu for the current session.
    pub fn menu(&self, out: &mut dyn Write) -> io::Result<Outcome> {
        let session = self.session.check_status();
        write!(out, "{}", render::navigation(&navigation_items(&session)))?;
        Ok(Outcome::Rendered)
    }

    /// `/admin`: hub with quick totals.
    pub async fn admin_dashboard(&self, out: &mut dyn Write) -> io::Result<Outcome> {
        let token = match self.enter_admin(&Route::AdminDashboard, out)? {
            Ok(token) => token,
            Err(outcome) => return Ok(outcome),
        };
        self.conferences.fetch_all().await;
        let state = self.conferences.snapshot();
        let conferences = match state.error() {
            Some(_) => "-".to_owned(),
            None => state.conferences().len().to_string(),
        };
        let (users, administrators) = match self.users.load(&token).await {
            Ok(accounts) => {
                let stats = UserStats::from_accounts(&accounts);
                (stats.total.to_string(), stats.administrators.to_string())
            }
            Err(error) => {
                debug!(error = %error, "user totals unavailable");
                ("-".to_owned(), "-".to_owned())
            }
        };
        writeln!(out, "Administration")?;
        writeln!(
            out,
            "  Conferences: create, edit and delete ({})",
            Route::AdminConferences
        )?;
        writeln!(out, "  Users: review and promote ({})", Route::AdminUsers)?;
        writeln!(
            out,
            "Overview: {conferences} conference(s), {users} user(s), {administrators} administrator(s)"
        )?;
        Ok(Outcome::Rendered)
    }

    async fn load_conference_table(&self, out: &mut dyn Write) -> io::Result<bool> {
        self.conferences.fetch_all().await;
        let state = self.conferences.snapshot();
        if let Some(message) = state.error() {
            write!(
                out,
                "{}",
                render::error_panel(
                    "Could not load conferences.",
                    message,
                    "conference-admin admin conferences list",
                )
            )?;
            return Ok(false);
        }
        Ok(true)
    }

    fn print_conference_table(&self, out: &mut dyn Write) -> io::Result<()> {
        let state = self.conferences.snapshot();
        write!(out, "{}", render::conference_table(state.conferences()))
    }

    /// `/admin/conferences`: management table.
    pub async fn admin_conferences(&self, out: &mut dyn Write) -> io::Result<Outcome> {
        if let Err(outcome) = self.enter_admin(&Route::AdminConferences, out)? {
            return Ok(outcome);
        }
        if !self.load_conference_table(out).await? {
            return Ok(Outcome::Failed);
        }
        self.print_conference_table(out)?;
        Ok(Outcome::Rendered)
    }

    /// Print the editable form of a cached conference as JSON.
    pub async fn export_conference(
        &self,
        id: &ConferenceId,
        out: &mut dyn Write,
    ) -> io::Result<Outcome> {
        if let Err(outcome) = self.enter_admin(&Route::AdminConferences, out)? {
            return Ok(outcome);
        }
        if !self.load_conference_table(out).await? {
            return Ok(Outcome::Failed);
        }
        let state = self.conferences.snapshot();
        let Some(conference) = state.find(id) else {
            return Self::failed(
                out,
                "Export failed",
                &Error::not_found(format!("no conference with id {id}")),
            );
        };
        let form = ConferenceForm::from(conference);
        let json = serde_json::to_string_pretty(&form).map_err(io::Error::other)?;
        writeln!(out, "{json}")?;
        Ok(Outcome::Rendered)
    }

    /// Create a conference from a submitted form.
    pub async fn create_conference(
        &self,
        form: &ConferenceForm,
        out: &mut dyn Write,
    ) -> io::Result<Outcome> {
        let token = match self.enter_admin(&Route::AdminConferences, out)? {
            Ok(token) => token,
            Err(outcome) => return Ok(outcome),
        };
        let conference = match form.validate() {
            Ok(conference) => conference,
            Err(errors) => return Self::invalid_form(out, &errors),
        };
        if !self.load_conference_table(out).await? {
            return Ok(Outcome::Failed);
        }
        match self.conferences.create(&token, &conference).await {
            Ok(created) => {
                writeln!(out, "Created conference {} ({}).", created.title, created.id)?;
                self.print_conference_table(out)?;
                Ok(Outcome::Rendered)
            }
            Err(error) => Self::failed(out, "Create failed", &error),
        }
    }

    /// Replace a conference with a submitted form.
    pub async fn update_conference(
        &self,
        id: &ConferenceId,
        form: &ConferenceForm,
        out: &mut dyn Write,
    ) -> io::Result<Outcome> {
        let token = match self.enter_admin(&Route::AdminConferences, out)? {
            Ok(token) => token,
            Err(outcome) => return Ok(outcome),
        };
        let mut form = form.clone();
        form.id = Some(id.to_string());
        let conference = match form.validate() {
            Ok(conference) => conference,
            Err(errors) => return Self::invalid_form(out, &errors),
        };
        if !self.load_conference_table(out).await? {
            return Ok(Outcome::Failed);
        }
        match self.conferences.update(&token, id, &conference).await {
            Ok(updated) => {
                writeln!(out, "Updated conference {} ({}).", updated.title, updated.id)?;
                self.print_conference_table(out)?;
                Ok(Outcome::Rendered)
            }
            Err(error) => Self::failed(out, "Update failed", &error),
        }
    }

    /// Delete a conference once confirmed.
    pub async fn delete_conference(
        &self,
        id: &ConferenceId,
        confirmed: bool,
        out: &mut dyn Write,
    ) -> io::Result<Outcome> {
        let token = match self.enter_admin(&Route::AdminConferences, out)? {
            Ok(token) => token,
            Err(outcome) => return Ok(outcome),
        };
        if !confirmed {
            writeln!(out, "Delete conference {id}? Re-run with --yes to confirm.")?;
            return Ok(Outcome::Failed);
        }
        if !self.load_conference_table(out).await? {
            return Ok(Outcome::Failed);
        }
        match self.conferences.delete(&token, id).await {
            Ok(()) => {
                writeln!(out, "Deleted conference {id}.")?;
                self.print_conference_table(out)?;
                Ok(Outcome::Rendered)
            }
            Err(error) => Self::failed(out, "Delete failed", &error),
        }
    }

    /// `/admin/users`: account table.
    pub async fn admin_users(&self, out: &mut dyn Write) -> io::Result<Outcome> {
        let token = match self.enter_admin(&Route::AdminUsers, out)? {
            Ok(token) => token,
            Err(outcome) => return Ok(outcome),
        };
        match self.users.load(&token).await {
            Ok(accounts) => {
                write!(out, "{}", render::user_table(&accounts))?;
                Ok(Outcome::Rendered)
            }
            Err(error) => {
                write!(
                    out,
                    "{}",
                    render::error_panel(
                        "Could not load users.",
                        error.message(),
                        "conference-admin admin users list",
                    )
                )?;
                Ok(Outcome::Failed)
            }
        }
    }

    /// Create an account from the user form.
    pub async fn create_user(&self, form: &UserForm, out: &mut dyn Write) -> io::Result<Outcome> {
        let token = match self.enter_admin(&Route::AdminUsers, out)? {
            Ok(token) => token,
            Err(outcome) => return Ok(outcome),
        };
        match self.users.create(&token, form).await {
            Ok(accounts) => {
                writeln!(out, "Created user {} ({}).", form.id.trim(), form.role)?;
                write!(out, "{}", render::user_table(&accounts))?;
                Ok(Outcome::Rendered)
            }
            Err(error) => Self::failed(out, "Create user failed", &error),
        }
    }

    /// Delete an account once confirmed.
    pub async fn delete_user(
        &self,
        id: &UserId,
        confirmed: bool,
        out: &mut dyn Write,
    ) -> io::Result<Outcome> {
        let token = match self.enter_admin(&Route::AdminUsers, out)? {
            Ok(token) => token,
            Err(outcome) => return Ok(outcome),
        };
        if !confirmed {
            writeln!(out, "Delete user {id}? Re-run with --yes to confirm.")?;
            return Ok(Outcome::Failed);
        }
        match self.users.delete(&token, id).await {
            Ok(accounts) => {
                writeln!(out, "Deleted user {id}.")?;
                write!(out, "{}", render::user_table(&accounts))?;
                Ok(Outcome::Rendered)
            }
            Err(error) => Self::failed(out, "Delete user failed", &error),
        }
    }

    /// Promote or demote an account.
    pub async fn set_user_role(
        &self,
        id: &UserId,
        role: UserRole,
        out: &mut dyn Write,
    ) -> io::Result<Outcome> {
        let token = match self.enter_admin(&Route::AdminUsers, out)? {
            Ok(token) => token,
            Err(outcome) => return Ok(outcome),
        };
        match self.users.change_role(&token, id, role).await {
            Ok(accounts) => {
                writeln!(out, "User {id} is now {role}.")?;
                write!(out, "{}", render::user_table(&accounts))?;
                Ok(Outcome::Rendered)
            }
            Err(error) => Self::failed(out, "Role change failed", &error),
        }
    }
}

#[cfg(test)]
mod tests;
