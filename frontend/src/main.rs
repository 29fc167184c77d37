//! `conference-admin` entry-point: wires settings, adapters and screens.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use conference_frontend::config::ClientSettings;
use conference_frontend::domain::SessionStore;
use conference_frontend::inbound::cli::{self, Cli, Screens};
use conference_frontend::outbound::http::HttpConferenceApi;
use conference_frontend::outbound::session_storage::FileSessionStorage;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = Cli::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(args))
}

fn load_settings() -> Result<ClientSettings> {
    ClientSettings::load_from_iter([OsString::from("conference-admin")])
        .wrap_err("load client settings")
}

async fn async_main(args: Cli) -> Result<ExitCode> {
    let settings = load_settings()?;
    let base_url = match &args.api_base_url {
        Some(raw) => url::Url::parse(raw).wrap_err_with(|| format!("parse --api-base-url {raw}"))?,
        None => settings
            .api_base_url()
            .wrap_err("parse CONFERENCE_API_BASE_URL")?,
    };
    let session_dir = settings.session_dir();

    let api = Arc::new(
        HttpConferenceApi::new(base_url, settings.request_timeout())
            .wrap_err("build HTTP client")?,
    );
    let storage = Arc::new(
        FileSessionStorage::open(&session_dir)
            .wrap_err_with(|| format!("open session storage in {}", session_dir.display()))?,
    );
    let session = Arc::new(SessionStore::new(storage));
    let state = session.check_status();
    info!(
        api = %api.base_url(),
        authenticated = state.is_authenticated(),
        is_admin = state.is_admin(),
        "session loaded"
    );

    let screens = Screens::new(api, session);
    let mut stdout = io::stdout().lock();
    let outcome = cli::run(&args.command, &screens, &mut stdout)
        .await
        .wrap_err("write screen output")?;
    stdout.flush().wrap_err("flush screen output")?;
    Ok(ExitCode::from(outcome.exit_code()))
}
