//! Plain-text rendering of the screens.
//!
//! Every function here is pure: it turns domain values into the text printed
//! on stdout. Dates are shown in English.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::domain::forms::DATE_INPUT_FORMAT;
use crate::domain::{
    Conference, ConferenceState, Error, FormErrors, LoadStatus, NavItem, UserAccount, UserRole,
    UserStats,
};

/// Breadcrumb titles longer than this are cut and suffixed with `...`.
pub const BREADCRUMB_TITLE_MAX: usize = 50;

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, DATE_INPUT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|zoned| zoned.with_timezone(&Utc).naive_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
        })
}

fn format_or_raw(raw: &str, pattern: &str) -> String {
    parse_timestamp(raw).map_or_else(|| raw.to_owned(), |at| at.format(pattern).to_string())
}

/// `1 May 2025`, as shown on the cards.
pub fn card_date(raw: &str) -> String {
    format_or_raw(raw, "%-d %B %Y")
}

/// `Thursday 1 May 2025, 10:00`, as shown on the detail page.
pub fn long_date(raw: &str) -> String {
    format_or_raw(raw, "%A %-d %B %Y, %H:%M")
}

/// `1 May 2025` with an abbreviated month, for tables.
pub fn short_date(raw: &str) -> String {
    format_or_raw(raw, "%-d %b %Y")
}

/// Title cut to [`BREADCRUMB_TITLE_MAX`] characters.
pub fn breadcrumb_title(title: &str) -> String {
    if title.chars().count() > BREADCRUMB_TITLE_MAX {
        let head: String = title.chars().take(BREADCRUMB_TITLE_MAX).collect();
        format!("{head}...")
    } else {
        title.to_owned()
    }
}

fn speaker_names(conference: &Conference) -> String {
    conference
        .speakers
        .iter()
        .map(|speaker| speaker.full_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One card of the home list.
pub fn conference_card(conference: &Conference) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {}  ({})",
        conference.design.main_color_or_default(),
        conference.title,
        conference.id
    );
    let _ = writeln!(out, "  Date: {}", card_date(&conference.date));
    if !conference.duration.is_empty() {
        let _ = writeln!(out, "  Duration: {}", conference.duration);
    }
    let _ = writeln!(out, "  {}", conference.description);
    if !conference.speakers.is_empty() {
        let _ = writeln!(out, "  Speakers: {}", speaker_names(conference));
    }
    if !conference.location.city.is_empty() {
        let _ = writeln!(out, "  City: {}", conference.location.city);
    }
    out
}

/// Error panel with the command to re-run.
pub fn error_panel(title: &str, message: &str, retry: &str) -> String {
    format!("{title}\n  {message}\n  Retry with `{retry}`.\n")
}

/// Home screen body for the current store state.
pub fn conference_list(state: &ConferenceState) -> String {
    match state.status() {
        LoadStatus::Idle | LoadStatus::Loading => "Loading conferences...\n".to_owned(),
        LoadStatus::Failed(message) => error_panel(
            "Could not load conferences.",
            message,
            "conference-admin list",
        ),
        LoadStatus::Ready if state.conferences().is_empty() => {
            "No conferences available.\n  Refresh with `conference-admin list`.\n".to_owned()
        }
        LoadStatus::Ready => state
            .conferences()
            .iter()
            .map(conference_card)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Detail page of one conference.
pub fn conference_detail(conference: &Conference) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Home > {}", breadcrumb_title(&conference.title));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", conference.title);
    let _ = writeln!(out, "Date: {}", long_date(&conference.date));
    if !conference.duration.is_empty() {
        let _ = writeln!(out, "Duration: {}", conference.duration);
    }
    let _ = writeln!(
        out,
        "Colours: {} / {}",
        conference.design.main_color_or_default(),
        conference.design.second_color_or_default()
    );
    if !conference.image_url.is_empty() {
        let _ = writeln!(out, "Image: {}", conference.image_url);
    }

    let _ = writeln!(out, "\nDescription\n  {}", conference.description);
    if !conference.content.is_empty() {
        let _ = writeln!(out, "\nDetails\n  {}", conference.content);
    }

    let location = &conference.location;
    let address: Vec<&str> = [
        location.address_line1.as_str(),
        location.address_line2.as_str(),
        location.postal_code.as_str(),
        location.city.as_str(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect();
    if !address.is_empty() {
        let _ = writeln!(out, "\nLocation\n  {}", address.join(", "));
        let _ = writeln!(
            out,
            "  Coordinates: {}, {}",
            location.coordinates[0], location.coordinates[1]
        );
    }

    if !conference.speakers.is_empty() {
        let _ = writeln!(out, "\nSpeakers");
        for speaker in &conference.speakers {
            let _ = writeln!(out, "  - {}", speaker.full_name());
        }
    }
    if !conference.stakeholders.is_empty() {
        let _ = writeln!(out, "\nStakeholders");
        for stakeholder in &conference.stakeholders {
            let _ = write!(out, "  - {}", stakeholder.full_name());
            if !stakeholder.job.is_empty() {
                let _ = write!(out, " ({})", stakeholder.job);
            }
            let _ = writeln!(out);
        }
    }
    out
}

/// Admin conference table.
pub fn conference_table(conferences: &[Conference]) -> String {
    if conferences.is_empty() {
        return "No conferences yet. Create one with `conference-admin admin conferences create`.\n"
            .to_owned();
    }
    let mut out = format!("{} conference(s)\n", conferences.len());
    for conference in conferences {
        let _ = writeln!(
            out,
            "  {:<28} {:<12} {:<3} {}",
            conference.id,
            short_date(&conference.date),
            conference.speakers.len(),
            conference.title
        );
    }
    out
}

/// Admin user table with per-role totals.
pub fn user_table(accounts: &[UserAccount]) -> String {
    let stats = UserStats::from_accounts(accounts);
    let mut out = format!(
        "Users: {} total, {} administrator(s), {} standard\n",
        stats.total, stats.administrators, stats.standard
    );
    if accounts.is_empty() {
        out.push_str("  No users found.\n");
        return out;
    }
    for account in accounts {
        let marker = match account.role {
            UserRole::Administrator => "*",
            UserRole::Standard => " ",
        };
        let _ = writeln!(out, " {marker} {:<24} {}", account.id, account.role);
    }
    out
}

/// Navigation menu entries.
pub fn navigation(items: &[NavItem]) -> String {
    items
        .iter()
        .map(|item| match item {
            NavItem::Link { label, route } => format!("{label} ({route})"),
            NavItem::Logout => format!("{} (conference-admin logout)", item.label()),
        })
        .collect::<Vec<_>>()
        .join(" | ")
        + "\n"
}

/// Field annotations of a rejected form.
pub fn form_errors(errors: &FormErrors) -> String {
    let mut out = "The form has errors:\n".to_owned();
    for (field, message) in errors.iter() {
        let _ = writeln!(out, "  {field}: {message}");
    }
    out
}

/// Error line for a failed operation, with field annotations when present.
pub fn operation_error(context: &str, error: &Error) -> String {
    let mut out = format!("{context}: {}\n", error.message());
    if let Some(fields) = error.details().and_then(|details| details.as_object()) {
        for (field, message) in fields {
            let text = message.as_str().map_or_else(|| message.to_string(), str::to_owned);
            let _ = writeln!(out, "  {field}: {text}");
        }
    }
    out
}
