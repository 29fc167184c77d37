//! Local form validation for the user, conference and login forms.
//!
//! Validation never talks to the API. Failures are collected per field in a
//! [`FormErrors`] map so screens can annotate every offending input at once.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    Conference, ConferenceId, Design, Error, Location, LoginValidationError, NewUserAccount,
    Speaker, Stakeholder, UserId, UserRole,
};

/// Minimum length of a new account identifier.
pub const USER_ID_MIN: usize = 3;
/// Minimum length of a new account password.
pub const PASSWORD_MIN: usize = 6;

/// Format of the datetime input values, minute precision.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

static USER_ID_RE: OnceLock<Regex> = OnceLock::new();

fn user_id_regex() -> &'static Regex {
    USER_ID_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[A-Za-z0-9_-]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("user id regex failed to compile: {error}"))
    })
}

/// Per-field validation messages keyed by the API field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, String>);

impl FormErrors {
    /// Record a message for `field`; the first message for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Iterate `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

impl From<FormErrors> for Error {
    fn from(value: FormErrors) -> Self {
        let details: Map<String, Value> = value
            .iter()
            .map(|(field, message)| (field.to_owned(), Value::String(message.to_owned())))
            .collect();
        Error::invalid_request(format!("form has invalid fields: {value}"))
            .with_details(Value::Object(details))
    }
}

impl From<LoginValidationError> for FormErrors {
    fn from(value: LoginValidationError) -> Self {
        let mut errors = Self::default();
        match value {
            LoginValidationError::EmptyId => errors.add("id", "identifier is required"),
            LoginValidationError::EmptyPassword => errors.add("password", "password is required"),
            LoginValidationError::EmptyToken => errors.add("token", value.to_string()),
        }
        errors
    }
}

/// Raw input of the "new user" form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub id: String,
    pub password: String,
    pub confirm_password: String,
    pub role: UserRole,
}

impl fmt::Debug for UserForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserForm")
            .field("id", &self.id)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

impl UserForm {
    /// Check every field and build the account creation request.
    ///
    /// # Errors
    ///
    /// Returns one message per invalid field: `id`, `password`,
    /// `confirmPassword`.
    pub fn validate(&self) -> Result<NewUserAccount, FormErrors> {
        let mut errors = FormErrors::default();

        let trimmed_id = self.id.trim();
        if trimmed_id.is_empty() {
            errors.add("id", "identifier is required");
        } else if self.id.chars().count() < USER_ID_MIN {
            errors.add(
                "id",
                format!("identifier must be at least {USER_ID_MIN} characters"),
            );
        } else if !user_id_regex().is_match(&self.id) {
            errors.add(
                "id",
                "identifier may only contain letters, digits, '_' and '-'",
            );
        }

        if self.password.is_empty() {
            errors.add("password", "password is required");
        } else if self.password.chars().count() < PASSWORD_MIN {
            errors.add(
                "password",
                format!("password must be at least {PASSWORD_MIN} characters"),
            );
        }

        if self.confirm_password.is_empty() {
            errors.add("confirmPassword", "password confirmation is required");
        } else if self.confirm_password != self.password {
            errors.add("confirmPassword", "passwords do not match");
        }

        let id = UserId::new(trimmed_id);
        match id {
            Ok(id) if errors.is_empty() => Ok(NewUserAccount::new(
                id,
                self.password.clone(),
                self.role,
            )),
            Ok(_) => Err(errors),
            Err(error) => {
                errors.add("id", error.to_string());
                Err(errors)
            }
        }
    }
}

/// Raw input of the conference editor.
///
/// Deserialises from the same JSON layout as a conference record so an
/// exported record can be edited and submitted back. `id` is optional; a
/// fresh client-side identifier is generated when it is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConferenceForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub date: String,
    pub description: String,
    #[serde(rename = "img")]
    pub image_url: String,
    pub content: String,
    pub duration: String,
    pub design: Design,
    #[serde(rename = "osMap")]
    pub location: Location,
    pub speakers: Vec<Speaker>,
    pub stakeholders: Vec<Stakeholder>,
}

impl From<&Conference> for ConferenceForm {
    fn from(conference: &Conference) -> Self {
        Self {
            id: Some(conference.id.to_string()),
            title: conference.title.clone(),
            date: normalize_date_input(&conference.date),
            description: conference.description.clone(),
            image_url: conference.image_url.clone(),
            content: conference.content.clone(),
            duration: conference.duration.clone(),
            design: conference.design.clone(),
            location: conference.location.clone(),
            speakers: conference.speakers.clone(),
            stakeholders: conference.stakeholders.clone(),
        }
    }
}

fn is_named(first: &str, last: &str) -> bool {
    !first.trim().is_empty() && !last.trim().is_empty()
}

impl ConferenceForm {
    /// Check required fields and produce the cleaned record to submit.
    ///
    /// Cleaning trims every text field, normalises the date to
    /// [`DATE_INPUT_FORMAT`], restores blank theme colours to their defaults
    /// and drops speakers and stakeholders without both names.
    ///
    /// # Errors
    ///
    /// Returns one message per invalid field: `title`, `date`,
    /// `description`, `img`, `content`, `speakers`, `id`.
    pub fn validate(&self) -> Result<Conference, FormErrors> {
        let mut errors = FormErrors::default();
        let required = [
            ("title", &self.title, "title is required"),
            ("description", &self.description, "description is required"),
            ("img", &self.image_url, "image URL is required"),
            ("content", &self.content, "content is required"),
        ];
        for (field, value, message) in required {
            if value.trim().is_empty() {
                errors.add(field, message);
            }
        }

        let date = normalize_date_input(&self.date);
        if self.date.trim().is_empty() {
            errors.add("date", "date is required");
        } else if date.is_empty() {
            errors.add("date", format!("unrecognised date '{}'", self.date.trim()));
        }

        let speakers: Vec<Speaker> = self
            .speakers
            .iter()
            .filter(|speaker| is_named(&speaker.first_name, &speaker.last_name))
            .map(|speaker| Speaker::new(speaker.first_name.trim(), speaker.last_name.trim()))
            .collect();
        if speakers.is_empty() {
            errors.add(
                "speakers",
                "at least one speaker with a first and last name is required",
            );
        }

        let id = match self.id.as_deref().map(str::trim) {
            None | Some("") => Some(ConferenceId::generate()),
            Some(raw) => match ConferenceId::new(raw) {
                Ok(id) => Some(id),
                Err(error) => {
                    errors.add("id", error.to_string());
                    None
                }
            },
        };

        let stakeholders = self
            .stakeholders
            .iter()
            .filter(|person| is_named(&person.first_name, &person.last_name))
            .map(|person| Stakeholder {
                first_name: person.first_name.trim().to_owned(),
                last_name: person.last_name.trim().to_owned(),
                job: person.job.trim().to_owned(),
                photo_url: person.photo_url.trim().to_owned(),
            })
            .collect();

        let Some(id) = id else {
            return Err(errors);
        };
        errors.into_result(|| Conference {
            id,
            title: self.title.trim().to_owned(),
            date,
            description: self.description.trim().to_owned(),
            content: self.content.trim().to_owned(),
            image_url: self.image_url.trim().to_owned(),
            duration: self.duration.trim().to_owned(),
            design: Design {
                main_color: self.design.main_color_or_default().trim().to_owned(),
                second_color: self.design.second_color_or_default().trim().to_owned(),
            },
            location: Location {
                address_line1: self.location.address_line1.trim().to_owned(),
                address_line2: self.location.address_line2.trim().to_owned(),
                postal_code: self.location.postal_code.trim().to_owned(),
                city: self.location.city.trim().to_owned(),
                coordinates: self
                    .location
                    .coordinates
                    .clone()
                    .map(|value| value.trim().to_owned()),
            },
            speakers,
            stakeholders,
        })
    }
}

/// Convert a stored timestamp into the editor's `YYYY-MM-DDTHH:MM` form.
///
/// RFC 3339 values are converted to UTC and bare dates become midnight.
/// Unparseable input yields an empty string.
///
/// # Examples
/// ```
/// use conference_frontend::domain::forms::normalize_date_input;
///
/// assert_eq!(normalize_date_input("2025-05-01T10:00"), "2025-05-01T10:00");
/// assert_eq!(normalize_date_input("2025-05-01T12:30:00+02:00"), "2025-05-01T10:30");
/// assert_eq!(normalize_date_input("soon"), "");
/// ```
pub fn normalize_date_input(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(local) = NaiveDateTime::parse_from_str(raw, DATE_INPUT_FORMAT) {
        return local.format(DATE_INPUT_FORMAT).to_string();
    }
    if let Ok(local) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return local.format(DATE_INPUT_FORMAT).to_string();
    }
    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return zoned
            .with_timezone(&Utc)
            .format(DATE_INPUT_FORMAT)
            .to_string();
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return format!("{}T00:00", day.format("%Y-%m-%d"));
    }
    String::new()
}
