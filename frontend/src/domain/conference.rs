//! Conference record model.
//!
//! The serde layout mirrors the conference API payloads (`img`, `osMap`,
//! `addressl1`, ...). Records are replaced wholesale on edit, so the nested
//! sections are plain data with public fields. Optional fields decode a
//! missing key and an explicit `null` alike, as their default.

use std::fmt;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

/// Main theme colour used when a record carries none.
pub const DEFAULT_MAIN_COLOR: &str = "#007bff";
/// Secondary theme colour used when a record carries none.
pub const DEFAULT_SECOND_COLOR: &str = "#e9ecef";

const ID_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Validation errors returned by [`ConferenceId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConferenceIdError {
    Empty,
}

impl fmt::Display for ConferenceIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "conference id must not be empty"),
        }
    }
}

impl std::error::Error for ConferenceIdError {}

/// Conference identifier.
///
/// Freshly created records carry a client-generated identifier which the API
/// response then replaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConferenceId(String);

impl ConferenceId {
    /// Validate and construct an identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, ConferenceIdError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ConferenceIdError::Empty);
        }
        Ok(Self(id))
    }

    /// Generate a client-side identifier of the form
    /// `conf-<epoch millis>-<9 base-36 characters>`.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| char::from(ID_SUFFIX_ALPHABET[rng.gen_range(0..ID_SUFFIX_ALPHABET.len())]))
            .collect();
        Self(format!("conf-{}-{suffix}", Utc::now().timestamp_millis()))
    }
}

impl AsRef<str> for ConferenceId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ConferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ConferenceId> for String {
    fn from(value: ConferenceId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ConferenceId {
    type Error = ConferenceIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Theme colours of a conference page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    #[serde(default = "default_main_color", deserialize_with = "null_as_default")]
    pub main_color: String,
    #[serde(default = "default_second_color", deserialize_with = "null_as_default")]
    pub second_color: String,
}

fn default_main_color() -> String {
    DEFAULT_MAIN_COLOR.to_owned()
}

fn default_second_color() -> String {
    DEFAULT_SECOND_COLOR.to_owned()
}

impl Design {
    /// Main colour, falling back to [`DEFAULT_MAIN_COLOR`] when blank.
    pub fn main_color_or_default(&self) -> &str {
        non_blank_or(&self.main_color, DEFAULT_MAIN_COLOR)
    }

    /// Secondary colour, falling back to [`DEFAULT_SECOND_COLOR`] when blank.
    pub fn second_color_or_default(&self) -> &str {
        non_blank_or(&self.second_color, DEFAULT_SECOND_COLOR)
    }
}

impl Default for Design {
    fn default() -> Self {
        Self {
            main_color: default_main_color(),
            second_color: default_second_color(),
        }
    }
}

/// Decode `null` as `T::default()`. Pair with `#[serde(default)]` so a
/// missing key is accepted too.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

/// Venue of a conference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, rename = "addressl1", deserialize_with = "null_as_default")]
    pub address_line1: String,
    #[serde(default, rename = "addressl2", deserialize_with = "null_as_default")]
    pub address_line2: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    /// Coordinates pair as sent by the API, kept as text.
    #[serde(default = "default_coordinates", deserialize_with = "coordinates_as_text")]
    pub coordinates: [String; 2],
}

fn default_coordinates() -> [String; 2] {
    ["0".to_owned(), "0".to_owned()]
}

impl Default for Location {
    fn default() -> Self {
        Self {
            address_line1: String::new(),
            address_line2: String::new(),
            postal_code: String::new(),
            city: String::new(),
            coordinates: default_coordinates(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CoordinateValue {
    Text(String),
    Number(serde_json::Number),
}

impl From<CoordinateValue> for String {
    fn from(value: CoordinateValue) -> Self {
        match value {
            CoordinateValue::Text(text) => text,
            CoordinateValue::Number(number) => number.to_string(),
        }
    }
}

// The API stores coordinates as strings but older records carry numbers.
fn coordinates_as_text<'de, D>(deserializer: D) -> Result<[String; 2], D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<[CoordinateValue; 2]>::deserialize(deserializer)? {
        Some([first, second]) => [first.into(), second.into()],
        None => default_coordinates(),
    })
}

/// Person presenting at a conference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    #[serde(default, rename = "firstname", deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, rename = "lastname", deserialize_with = "null_as_default")]
    pub last_name: String,
}

impl Speaker {
    /// Build a speaker from first and last names.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Organiser or partner shown on a conference page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stakeholder {
    #[serde(default, rename = "firstname", deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, rename = "lastname", deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job: String,
    #[serde(default, rename = "img", deserialize_with = "null_as_default")]
    pub photo_url: String,
}

impl Stakeholder {
    /// `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One conference event.
///
/// ## Invariants
/// - `id` is non-empty.
/// - `speakers` and `stakeholders` keep the order chosen by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conference {
    pub id: ConferenceId,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Timestamp string, usually `YYYY-MM-DDTHH:MM` or RFC 3339.
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, rename = "img", deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub design: Design,
    #[serde(default, rename = "osMap", deserialize_with = "null_as_default")]
    pub location: Location,
    #[serde(default, deserialize_with = "null_as_default")]
    pub speakers: Vec<Speaker>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stakeholders: Vec<Stakeholder>,
}

impl Conference {
    /// Return a copy of this record carrying `id`.
    #[must_use]
    pub fn with_id(mut self, id: ConferenceId) -> Self {
        self.id = id;
        self
    }
}
