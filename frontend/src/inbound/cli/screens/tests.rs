//! Screen behaviour against a mocked API and in-memory session storage.

use super::*;
use crate::domain::ports::{
    ApiError, AUTH_TOKEN_KEY, IS_ADMIN_KEY, MockConferenceApi,
};
use crate::domain::{Conference, Design, Location, Speaker};
use crate::outbound::session_storage::InMemorySessionStorage;
use rstest::rstest;

type TestScreens = Screens<MockConferenceApi, InMemorySessionStorage>;

enum Visitor {
    Anonymous,
    Standard,
    Admin,
}

fn screens(api: MockConferenceApi, visitor: Visitor) -> TestScreens {
    let storage = InMemorySessionStorage::default();
    match visitor {
        Visitor::Anonymous => {}
        Visitor::Standard => {
            storage.set(AUTH_TOKEN_KEY, "tok-user").expect("seed token");
            storage.set(IS_ADMIN_KEY, "false").expect("seed flag");
        }
        Visitor::Admin => {
            storage.set(AUTH_TOKEN_KEY, "tok-admin").expect("seed token");
            storage.set(IS_ADMIN_KEY, "true").expect("seed flag");
        }
    }
    let session = Arc::new(SessionStore::new(Arc::new(storage)));
    Screens::new(Arc::new(api), session)
}

fn conference(id: &str, title: &str) -> Conference {
    Conference {
        id: ConferenceId::new(id).expect("id"),
        title: title.to_owned(),
        date: "2025-05-01T10:00".to_owned(),
        description: "Intro".to_owned(),
        content: "Body".to_owned(),
        image_url: "img.png".to_owned(),
        duration: String::new(),
        design: Design::default(),
        location: Location::default(),
        speakers: vec![Speaker::new("Ada", "Lovelace")],
        stakeholders: Vec::new(),
    }
}

fn text(out: Vec<u8>) -> String {
    String::from_utf8(out).expect("utf-8 output")
}

#[rstest]
#[case::anonymous(Visitor::Anonymous, Route::Login)]
#[case::standard(Visitor::Standard, Route::Home)]
#[tokio::test]
async fn admin_screens_redirect_without_rights(#[case] visitor: Visitor, #[case] target: Route) {
    let mut api = MockConferenceApi::new();
    api.expect_list_users().times(0);
    api.expect_list_conferences().times(0);
    let screens = screens(api, visitor);
    let mut out = Vec::new();

    let outcome = screens.admin_users(&mut out).await.expect("render");

    assert_eq!(outcome, Outcome::Redirected(target.clone()));
    assert!(text(out).contains(&format!("Redirected from /admin/users to {target}")));
}

#[tokio::test]
async fn home_renders_cards_for_anonymous_visitors() {
    let mut api = MockConferenceApi::new();
    api.expect_list_conferences()
        .times(1)
        .return_once(|| Ok(vec![conference("c1", "RustConf"), conference("c2", "DevCon")]));
    let screens = screens(api, Visitor::Anonymous);
    let mut out = Vec::new();

    let outcome = screens.home(&mut out).await.expect("render");

    assert_eq!(outcome, Outcome::Rendered);
    let rendered = text(out);
    assert!(rendered.contains("RustConf"));
    assert!(rendered.contains("DevCon"));
}

#[tokio::test]
async fn home_failure_shows_retry_hint() {
    let mut api = MockConferenceApi::new();
    api.expect_list_conferences()
        .times(1)
        .return_once(|| Err(ApiError::transport("connection refused")));
    let screens = screens(api, Visitor::Anonymous);
    let mut out = Vec::new();

    let outcome = screens.home(&mut out).await.expect("render");

    assert_eq!(outcome, Outcome::Failed);
    let rendered = text(out);
    assert!(rendered.contains("connection refused"));
    assert!(rendered.contains("Retry with `conference-admin list`"));
}

#[tokio::test]
async fn detail_not_found_renders_panel() {
    let mut api = MockConferenceApi::new();
    api.expect_get_conference()
        .times(1)
        .return_once(|_| Err(ApiError::http(404_u16, "Conference not found")));
    let screens = screens(api, Visitor::Anonymous);
    let mut out = Vec::new();

    let id = ConferenceId::new("ghost").expect("id");
    let outcome = screens.detail(&id, &mut out).await.expect("render");

    assert_eq!(outcome, Outcome::Failed);
    assert!(text(out).contains("conference-admin show ghost"));
}

#[tokio::test]
async fn login_survives_admin_check_failure() {
    let mut api = MockConferenceApi::new();
    api.expect_login()
        .times(1)
        .return_once(|_| Ok(AccessToken::new("tok-new").expect("token")));
    api.expect_is_admin()
        .times(1)
        .return_once(|_| Err(ApiError::transport("timeout")));
    let screens = screens(api, Visitor::Anonymous);
    let mut out = Vec::new();

    let outcome = screens
        .login("alice", "secret1", &mut out)
        .await
        .expect("render");

    assert_eq!(outcome, Outcome::Rendered);
    let rendered = text(out);
    assert!(rendered.contains("Signed in as alice (standard)."));
    assert!(rendered.contains("Logout"));
    assert!(!rendered.contains("Administration"));
}

#[tokio::test]
async fn blank_login_fields_are_annotated_locally() {
    let mut api = MockConferenceApi::new();
    api.expect_login().times(0);
    let screens = screens(api, Visitor::Anonymous);
    let mut out = Vec::new();

    let outcome = screens.login("  ", "pw", &mut out).await.expect("render");

    assert_eq!(outcome, Outcome::Failed);
    assert!(text(out).contains("id: identifier is required"));
}

#[tokio::test]
async fn invalid_conference_form_never_reaches_the_api() {
    let mut api = MockConferenceApi::new();
    api.expect_list_conferences().times(0);
    api.expect_create_conference().times(0);
    let screens = screens(api, Visitor::Admin);
    let mut out = Vec::new();

    let form = ConferenceForm {
        title: "DevCon".to_owned(),
        ..ConferenceForm::default()
    };
    let outcome = screens
        .create_conference(&form, &mut out)
        .await
        .expect("render");

    assert_eq!(outcome, Outcome::Failed);
    let rendered = text(out);
    assert!(rendered.contains("speakers:"));
    assert!(rendered.contains("date: date is required"));
}

#[tokio::test]
async fn failed_create_keeps_the_cached_list() {
    let mut api = MockConferenceApi::new();
    api.expect_list_conferences()
        .times(1)
        .return_once(|| Ok(vec![conference("c1", "RustConf")]));
    api.expect_create_conference()
        .times(1)
        .return_once(|_, _| Err(ApiError::http(403_u16, "Forbidden")));
    let screens = screens(api, Visitor::Admin);
    let mut out = Vec::new();

    let form = ConferenceForm::from(&conference("c9", "DevCon"));
    let outcome = screens
        .create_conference(&form, &mut out)
        .await
        .expect("render");

    assert_eq!(outcome, Outcome::Failed);
    let state = screens.conference_store().snapshot();
    assert_eq!(state.conferences(), &[conference("c1", "RustConf")]);
    assert!(state.error().is_some_and(|message| !message.is_empty()));
    assert!(text(out).contains("Create failed: HTTP error: 403 - Forbidden"));
}

#[tokio::test]
async fn deleting_requires_confirmation() {
    let mut api = MockConferenceApi::new();
    api.expect_delete_conference().times(0);
    api.expect_delete_user().times(0);
    let screens = screens(api, Visitor::Admin);
    let mut out = Vec::new();

    let conference_id = ConferenceId::new("c1").expect("id");
    let user_id = UserId::new("bob").expect("id");
    let first = screens
        .delete_conference(&conference_id, false, &mut out)
        .await
        .expect("render");
    let second = screens
        .delete_user(&user_id, false, &mut out)
        .await
        .expect("render");

    assert_eq!((first, second), (Outcome::Failed, Outcome::Failed));
    assert!(text(out).contains("Re-run with --yes"));
}

#[tokio::test]
async fn dashboard_degrades_to_placeholders() {
    let mut api = MockConferenceApi::new();
    api.expect_list_conferences()
        .times(1)
        .return_once(|| Ok(vec![conference("c1", "RustConf")]));
    api.expect_list_users()
        .times(1)
        .return_once(|_| Err(ApiError::http(500_u16, "db down")));
    let screens = screens(api, Visitor::Admin);
    let mut out = Vec::new();

    let outcome = screens.admin_dashboard(&mut out).await.expect("render");

    assert_eq!(outcome, Outcome::Rendered);
    assert!(text(out).contains("Overview: 1 conference(s), - user(s), - administrator(s)"));
}

#[rstest]
#[case(Outcome::Rendered, 0)]
#[case(Outcome::Failed, 1)]
#[case(Outcome::Redirected(Route::Login), 2)]
fn outcomes_map_to_exit_codes(#[case] outcome: Outcome, #[case] code: u8) {
    assert_eq!(outcome.exit_code(), code);
}
