//! In-process fake of the conference API.
//!
//! Serves the same routes as the real service from an in-memory state so the
//! reqwest adapter can be exercised over a real socket. Conferences are kept
//! as raw JSON to avoid echoing the client's own decoding rules.

use std::net::TcpListener;
use std::sync::{Mutex, MutexGuard};

use actix_web::dev::ServerHandle;
use actix_web::http::header;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct FakeUser {
    pub id: String,
    pub password: String,
    pub admin: bool,
}

/// Server-side data plus fault switches.
#[derive(Debug, Default)]
pub struct FakeState {
    pub conferences: Vec<Value>,
    pub users: Vec<FakeUser>,
    pub fail_admin_check: bool,
    pub requests: Vec<String>,
    next_conference: u32,
}

impl FakeState {
    pub fn with_user(mut self, id: &str, password: &str, admin: bool) -> Self {
        self.users.push(FakeUser {
            id: id.to_owned(),
            password: password.to_owned(),
            admin,
        });
        self
    }

    pub fn with_conference(mut self, conference: Value) -> Self {
        self.conferences.push(conference);
        self
    }

    pub fn failing_admin_check(mut self) -> Self {
        self.fail_admin_check = true;
        self
    }

    fn user_for_token(&self, token: &str) -> Option<&FakeUser> {
        let id = token.strip_prefix("token-")?;
        self.users.iter().find(|user| user.id == id)
    }

    fn conference_index(&self, id: &str) -> Option<usize> {
        self.conferences
            .iter()
            .position(|conference| conference["id"] == id)
    }
}

type Shared = web::Data<Mutex<FakeState>>;

fn lock(state: &Shared) -> MutexGuard<'_, FakeState> {
    state.lock().expect("fake API state lock")
}

fn record(state: &mut FakeState, req: &HttpRequest) {
    state
        .requests
        .push(format!("{} {}", req.method(), req.uri().path()));
}

fn bearer(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned)
}

fn require_admin(state: &FakeState, req: &HttpRequest) -> Result<(), HttpResponse> {
    let Some(token) = bearer(req) else {
        return Err(HttpResponse::Unauthorized().body("Missing token"));
    };
    match state.user_for_token(&token) {
        None => Err(HttpResponse::Unauthorized().body("Invalid token")),
        Some(user) if !user.admin => Err(HttpResponse::Forbidden().body("Admins only")),
        Some(_) => Ok(()),
    }
}

#[derive(Deserialize)]
struct Credentials {
    id: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoleChange {
    new_type: String,
}

async fn list_conferences(state: Shared, req: HttpRequest) -> HttpResponse {
    let mut state = lock(&state);
    record(&mut state, &req);
    HttpResponse::Ok().json(&state.conferences)
}

async fn get_conference(state: Shared, req: HttpRequest, id: web::Path<String>) -> HttpResponse {
    let mut state = lock(&state);
    record(&mut state, &req);
    match state.conference_index(&id) {
        Some(index) => HttpResponse::Ok().json(&state.conferences[index]),
        None => HttpResponse::NotFound().body("Conference not found"),
    }
}

async fn login(state: Shared, req: HttpRequest, body: web::Json<Credentials>) -> HttpResponse {
    let mut state = lock(&state);
    record(&mut state, &req);
    let known = state
        .users
        .iter()
        .any(|user| user.id == body.id && user.password == body.password);
    if known {
        HttpResponse::Ok().json(format!("token-{}", body.id))
    } else {
        HttpResponse::Unauthorized().body("Invalid credentials")
    }
}

async fn is_admin(state: Shared, req: HttpRequest) -> HttpResponse {
    let mut state = lock(&state);
    record(&mut state, &req);
    if state.fail_admin_check {
        return HttpResponse::InternalServerError().body("admin check unavailable");
    }
    let admin = bearer(&req)
        .and_then(|token| state.user_for_token(&token).map(|user| user.admin));
    match admin {
        Some(admin) => HttpResponse::Ok().json(json!({ "isAdmin": admin })),
        None => HttpResponse::Unauthorized().body("Invalid token"),
    }
}

async fn create_conference(
    state: Shared,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    let mut state = lock(&state);
    record(&mut state, &req);
    if let Err(response) = require_admin(&state, &req) {
        return response;
    }
    state.next_conference += 1;
    let id = format!("srv-{}", state.next_conference);
    let mut conference = body.into_inner();
    conference["id"] = Value::String(id.clone());
    state.conferences.push(conference);
    HttpResponse::Created().json(json!({ "id": id }))
}

async fn update_conference(
    state: Shared,
    req: HttpRequest,
    id: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    let mut state = lock(&state);
    record(&mut state, &req);
    if let Err(response) = require_admin(&state, &req) {
        return response;
    }
    let Some(index) = state.conference_index(&id) else {
        return HttpResponse::NotFound().body("Conference not found");
    };
    let mut conference = body.into_inner();
    conference["id"] = Value::String(id.into_inner());
    state.conferences[index] = conference;
    HttpResponse::Ok().json(json!({ "ok": true }))
}

async fn delete_conference(
    state: Shared,
    req: HttpRequest,
    id: web::Path<String>,
) -> HttpResponse {
    let mut state = lock(&state);
    record(&mut state, &req);
    if let Err(response) = require_admin(&state, &req) {
        return response;
    }
    match state.conference_index(&id) {
        Some(index) => {
            state.conferences.remove(index);
            HttpResponse::Ok().finish()
        }
        None => HttpResponse::NotFound().body("Conference not found"),
    }
}

async fn list_users(state: Shared, req: HttpRequest) -> HttpResponse {
    let mut state = lock(&state);
    record(&mut state, &req);
    if let Err(response) = require_admin(&state, &req) {
        return response;
    }
    let users: Vec<Value> = state
        .users
        .iter()
        .map(|user| json!({ "id": user.id, "type": if user.admin { "admin" } else { "user" } }))
        .collect();
    HttpResponse::Ok().json(users)
}

fn signup_as(state: &Shared, req: &HttpRequest, body: Credentials, admin: bool) -> HttpResponse {
    let mut state = lock(state);
    record(&mut state, req);
    if state.users.iter().any(|user| user.id == body.id) {
        return HttpResponse::Conflict().body("User already exists");
    }
    state.users.push(FakeUser {
        id: body.id.clone(),
        password: body.password,
        admin,
    });
    HttpResponse::Created().json(json!({ "id": body.id }))
}

async fn signup(state: Shared, req: HttpRequest, body: web::Json<Credentials>) -> HttpResponse {
    signup_as(&state, &req, body.into_inner(), false)
}

async fn signup_admin(state: Shared, req: HttpRequest, body: web::Json<Credentials>) -> HttpResponse {
    signup_as(&state, &req, body.into_inner(), true)
}

async fn delete_user(state: Shared, req: HttpRequest, id: web::Path<String>) -> HttpResponse {
    let mut state = lock(&state);
    record(&mut state, &req);
    if let Err(response) = require_admin(&state, &req) {
        return response;
    }
    let before = state.users.len();
    state.users.retain(|user| user.id != *id);
    if state.users.len() == before {
        HttpResponse::NotFound().body("User not found")
    } else {
        HttpResponse::Ok().finish()
    }
}

async fn change_role(
    state: Shared,
    req: HttpRequest,
    id: web::Path<String>,
    body: web::Json<RoleChange>,
) -> HttpResponse {
    let mut state = lock(&state);
    record(&mut state, &req);
    if let Err(response) = require_admin(&state, &req) {
        return response;
    }
    let admin = match body.new_type.as_str() {
        "admin" => true,
        "user" => false,
        other => return HttpResponse::BadRequest().body(format!("unknown type {other}")),
    };
    match state.users.iter_mut().find(|user| user.id == *id) {
        Some(user) => {
            user.admin = admin;
            HttpResponse::Ok().json(json!({ "id": user.id, "type": body.new_type }))
        }
        None => HttpResponse::NotFound().body("User not found"),
    }
}

fn routes(config: &mut web::ServiceConfig) {
    config
        .route("/conferences", web::get().to(list_conferences))
        .route("/conference", web::post().to(create_conference))
        .route("/conference/{id}", web::get().to(get_conference))
        .route("/conference/{id}", web::patch().to(update_conference))
        .route("/conference/{id}", web::delete().to(delete_conference))
        .route("/login", web::post().to(login))
        .route("/isadmin", web::get().to(is_admin))
        .route("/users", web::get().to(list_users))
        .route("/signup", web::post().to(signup))
        .route("/signupadmin", web::post().to(signup_admin))
        .route("/user/{id}", web::delete().to(delete_user))
        .route("/usertype/{id}", web::patch().to(change_role));
}

/// Running fake server. Must be started inside an actix system.
pub struct FakeApi {
    base_url: Url,
    handle: ServerHandle,
    state: Shared,
}

impl FakeApi {
    pub fn start(state: FakeState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake API listener");
        let port = listener.local_addr().expect("listener address").port();
        let state: Shared = web::Data::new(Mutex::new(state));
        let app_state = state.clone();
        let server = HttpServer::new(move || App::new().app_data(app_state.clone()).configure(routes))
            .workers(1)
            .disable_signals()
            .listen(listener)
            .expect("listen on fake API socket")
            .run();
        let handle = server.handle();
        actix_rt::spawn(server);
        Self {
            base_url: Url::parse(&format!("http://127.0.0.1:{port}")).expect("fake API url"),
            handle,
            state,
        }
    }

    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// Inspect the server-side state.
    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        lock(&self.state)
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

/// Base URL of a port nothing listens on.
pub fn unreachable_base_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind throwaway listener");
    let port = listener.local_addr().expect("throwaway address").port();
    drop(listener);
    Url::parse(&format!("http://127.0.0.1:{port}")).expect("unreachable url")
}
