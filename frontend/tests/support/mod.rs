//! Shared helpers for the HTTP integration suites.

#![allow(dead_code, reason = "each suite uses a different subset of helpers")]

mod fake_api;

use conference_frontend::domain::{Conference, ConferenceForm, Design, Location, Speaker};
use conference_frontend::outbound::http::HttpConferenceApi;
use reqwest::Url;
use serde_json::{Value, json};

pub use fake_api::{FakeApi, FakeState, FakeUser, unreachable_base_url};

pub const ADMIN_ID: &str = "admin";
pub const ADMIN_PASSWORD: &str = "adminpw";
pub const MEMBER_ID: &str = "alice";
pub const MEMBER_PASSWORD: &str = "alicepw";

/// Seed state with one administrator, one standard member and one record.
pub fn seeded_state() -> FakeState {
    FakeState::default()
        .with_user(ADMIN_ID, ADMIN_PASSWORD, true)
        .with_user(MEMBER_ID, MEMBER_PASSWORD, false)
        .with_conference(rustconf_payload())
}

pub fn rustconf_payload() -> Value {
    json!({
        "id": "rustconf-2025",
        "title": "RustConf",
        "date": "2025-09-02T09:00",
        "description": "Systems programming",
        "content": "Two days of talks",
        "img": "https://img.example/rustconf.png",
        "duration": "2 days",
        "design": { "mainColor": "#b7410e", "secondColor": "#f5f5f5" },
        "osMap": {
            "addressl1": "1 Main St",
            "addressl2": "",
            "postalCode": "98101",
            "city": "Seattle",
            "coordinates": [47.6, "-122.3"]
        },
        "speakers": [{ "firstname": "Ada", "lastname": "Lovelace" }],
        "stakeholders": []
    })
}

/// A valid DevCon form with no identifier.
pub fn devcon_form() -> ConferenceForm {
    ConferenceForm {
        id: None,
        title: "DevCon".to_owned(),
        date: "2025-05-01T10:00".to_owned(),
        description: "Intro".to_owned(),
        image_url: "https://img.example/devcon.png".to_owned(),
        content: "Talks and workshops".to_owned(),
        duration: "1 day".to_owned(),
        design: Design::default(),
        location: Location {
            city: "Lyon".to_owned(),
            ..Location::default()
        },
        speakers: vec![Speaker::new("Ada", "Lovelace")],
        stakeholders: Vec::new(),
    }
}

pub fn devcon() -> Conference {
    devcon_form().validate().expect("DevCon form is valid")
}

pub fn client_for(base_url: Url) -> HttpConferenceApi {
    HttpConferenceApi::new(base_url, None).expect("build HTTP client")
}
