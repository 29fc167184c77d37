//! Command-line surface: argument parsing and dispatch onto the screens.

pub mod render;
mod screens;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use clap::{Args, Parser, Subcommand};

pub use screens::{Outcome, Screens};

use crate::domain::ports::{ConferenceApi, SessionStorage};
use crate::domain::{ConferenceForm, ConferenceId, Error, UserForm, UserId, UserRole};

/// `conference-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "conference-admin",
    about = "Browse conferences and administer them through the conference API",
    version
)]
pub struct Cli {
    /// Conference API base URL; overrides `CONFERENCE_API_BASE_URL`.
    #[arg(long = "api-base-url", value_name = "url", global = true)]
    pub api_base_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level screens.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every conference (home screen).
    List,
    /// Show one conference in full.
    Show {
        /// Conference identifier.
        id: String,
    },
    /// Sign in and store the session.
    Login {
        #[arg(long, value_name = "id")]
        id: String,
        #[arg(long, value_name = "password")]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Print the navigation menu for the current session.
    Menu,
    /// Administration area (administrators only).
    Admin {
        #[command(subcommand)]
        area: Option<AdminArea>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum AdminArea {
    /// Manage conferences.
    Conferences {
        #[command(subcommand)]
        action: Option<ConferenceAdminCommand>,
    },
    /// Manage user accounts.
    Users {
        #[command(subcommand)]
        action: Option<UserAdminCommand>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConferenceAdminCommand {
    /// Table of all conferences.
    List,
    /// Print the editable JSON form of a conference.
    Export { id: String },
    /// Create a conference from a JSON form file.
    Create {
        #[arg(long, value_name = "path")]
        file: PathBuf,
    },
    /// Replace a conference with a JSON form file.
    Update {
        id: String,
        #[arg(long, value_name = "path")]
        file: PathBuf,
    },
    /// Delete a conference.
    Delete {
        id: String,
        #[command(flatten)]
        confirm: Confirm,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum UserAdminCommand {
    /// Table of all accounts with per-role totals.
    List,
    /// Create an account.
    Create {
        #[arg(long, value_name = "id")]
        id: String,
        #[arg(long, value_name = "password")]
        password: String,
        #[arg(long = "confirm-password", value_name = "password")]
        confirm_password: String,
        /// `standard` or `administrator`.
        #[arg(long, value_name = "role", default_value = "standard", value_parser = parse_role)]
        role: UserRole,
    },
    /// Delete an account.
    Delete {
        id: String,
        #[command(flatten)]
        confirm: Confirm,
    },
    /// Promote or demote an account.
    SetRole {
        id: String,
        #[arg(value_parser = parse_role)]
        role: UserRole,
    },
}

/// Confirmation flag for destructive actions.
#[derive(Debug, Clone, Copy, Args)]
pub struct Confirm {
    /// Confirm the deletion.
    #[arg(long)]
    pub yes: bool,
}

fn parse_role(raw: &str) -> Result<UserRole, String> {
    raw.parse().map_err(|error: crate::domain::UserValidationError| error.to_string())
}

/// Read a conference form from a JSON file.
///
/// # Errors
///
/// Returns an invalid-request error when the file cannot be read or is not
/// a conference form.
pub fn read_conference_form(path: &Path) -> Result<ConferenceForm, Error> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::invalid_request(format!("{} is not a file", path.display())))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        Error::invalid_request(format!("open form directory '{}': {error}", parent.display()))
    })?;
    let raw = directory.read_to_string(Path::new(file_name)).map_err(|error| {
        Error::invalid_request(format!("read form file '{}': {error}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|error| {
        Error::invalid_request(format!("parse form file '{}': {error}", path.display()))
    })
}

fn conference_id(raw: &str) -> Result<ConferenceId, Error> {
    ConferenceId::new(raw).map_err(|error| Error::invalid_request(error.to_string()))
}

fn user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|error| Error::invalid_request(error.to_string()))
}

/// Run one command against the screens, printing to `out`.
///
/// # Errors
///
/// Returns an error only when writing to `out` fails.
pub async fn run<A, S>(
    command: &Command,
    screens: &Screens<A, S>,
    out: &mut dyn Write,
) -> io::Result<Outcome>
where
    A: ConferenceApi,
    S: SessionStorage,
{
    match dispatch(command, screens, out).await? {
        Ok(outcome) => Ok(outcome),
        Err(error) => {
            write!(out, "{}", render::operation_error("Invalid arguments", &error))?;
            Ok(Outcome::Failed)
        }
    }
}

async fn dispatch<A, S>(
    command: &Command,
    screens: &Screens<A, S>,
    out: &mut dyn Write,
) -> io::Result<Result<Outcome, Error>>
where
    A: ConferenceApi,
    S: SessionStorage,
{
    let outcome = match command {
        Command::List => screens.home(out).await?,
        Command::Show { id } => match conference_id(id) {
            Ok(id) => screens.detail(&id, out).await?,
            Err(error) => return Ok(Err(error)),
        },
        Command::Login { id, password } => screens.login(id, password, out).await?,
        Command::Logout => screens.logout(out)?,
        Command::Menu => screens.menu(out)?,
        Command::Admin { area: None } => screens.admin_dashboard(out).await?,
        Command::Admin {
            area: Some(AdminArea::Conferences { action }),
        } => return dispatch_conferences(action.as_ref(), screens, out).await,
        Command::Admin {
            area: Some(AdminArea::Users { action }),
        } => return dispatch_users(action.as_ref(), screens, out).await,
    };
    Ok(Ok(outcome))
}

async fn dispatch_conferences<A, S>(
    action: Option<&ConferenceAdminCommand>,
    screens: &Screens<A, S>,
    out: &mut dyn Write,
) -> io::Result<Result<Outcome, Error>>
where
    A: ConferenceApi,
    S: SessionStorage,
{
    let outcome = match action {
        None | Some(ConferenceAdminCommand::List) => screens.admin_conferences(out).await?,
        Some(ConferenceAdminCommand::Export { id }) => match conference_id(id) {
            Ok(id) => screens.export_conference(&id, out).await?,
            Err(error) => return Ok(Err(error)),
        },
        Some(ConferenceAdminCommand::Create { file }) => match read_conference_form(file) {
            Ok(form) => screens.create_conference(&form, out).await?,
            Err(error) => return Ok(Err(error)),
        },
        Some(ConferenceAdminCommand::Update { id, file }) => {
            match conference_id(id).and_then(|id| Ok((id, read_conference_form(file)?))) {
                Ok((id, form)) => screens.update_conference(&id, &form, out).await?,
                Err(error) => return Ok(Err(error)),
            }
        }
        Some(ConferenceAdminCommand::Delete { id, confirm }) => match conference_id(id) {
            Ok(id) => screens.delete_conference(&id, confirm.yes, out).await?,
            Err(error) => return Ok(Err(error)),
        },
    };
    Ok(Ok(outcome))
}

async fn dispatch_users<A, S>(
    action: Option<&UserAdminCommand>,
    screens: &Screens<A, S>,
    out: &mut dyn Write,
) -> io::Result<Result<Outcome, Error>>
where
    A: ConferenceApi,
    S: SessionStorage,
{
    let outcome = match action {
        None | Some(UserAdminCommand::List) => screens.admin_users(out).await?,
        Some(UserAdminCommand::Create {
            id,
            password,
            confirm_password,
            role,
        }) => {
            let form = UserForm {
                id: id.clone(),
                password: password.clone(),
                confirm_password: confirm_password.clone(),
                role: *role,
            };
            screens.create_user(&form, out).await?
        }
        Some(UserAdminCommand::Delete { id, confirm }) => match user_id(id) {
            Ok(id) => screens.delete_user(&id, confirm.yes, out).await?,
            Err(error) => return Ok(Err(error)),
        },
        Some(UserAdminCommand::SetRole { id, role }) => match user_id(id) {
            Ok(id) => screens.set_user_role(&id, *role, out).await?,
            Err(error) => return Ok(Err(error)),
        },
    };
    Ok(Ok(outcome))
}
