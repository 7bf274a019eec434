#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use innohub_admin::auth::{TokenCipher, TokenDecoder};
use innohub_admin::config::{AppConfig, DEFAULT_CIPHER_KEY};

pub const PASSWORD: &str = "correct-horse";
pub const LOGIN_PERMISSIONS: [u32; 3] = [2001, 4201, 4205];

pub fn cipher() -> TokenCipher {
    TokenCipher::with_zero_iv(DEFAULT_CIPHER_KEY).expect("default key is valid")
}

pub fn decoder() -> TokenDecoder {
    TokenDecoder::new(cipher())
}

/// JWT as the backend would issue it, signed with a key the client never sees
pub fn signed_jwt(user_id: i64, permissions: &[u32]) -> String {
    let claims = json!({
        "userId": user_id,
        "Permissions": permissions,
        "unique_name": format!("user{}", user_id),
        "exp": 4102444800i64,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-only-secret"))
        .expect("jwt encodes")
}

/// Seal an arbitrary claim set, for tokens the backend shapes unusually
pub fn sealed_claims(claims: &Value) -> String {
    let jwt = encode(&Header::default(), claims, &EncodingKey::from_secret(b"backend-only-secret"))
        .expect("jwt encodes");
    cipher().seal(&jwt).expect("token seals")
}

pub fn sealed_token(user_id: i64, permissions: &[u32]) -> String {
    cipher().seal(&signed_jwt(user_id, permissions)).expect("token seals")
}

pub fn config_for(base_url: &str) -> AppConfig {
    let mut config = AppConfig::from_env();
    config.api.base_url = base_url.to_string();
    config.api.timeout_secs = 5;
    config.token = Default::default();
    config.routes = Default::default();
    config.paths = Default::default();
    config.paths.login = "/session/login".to_string();
    config
}

#[derive(Clone, Default)]
pub struct MockState {
    /// `METHOD path auth-header` of every request that reached the backend
    pub requests: Arc<Mutex<Vec<String>>>,
    pub issued_token: Arc<Mutex<Option<String>>>,
}

impl MockState {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, line: String) {
        self.requests.lock().unwrap().push(line);
    }

    fn authorized(&self, method: &str, path: &str, headers: &HeaderMap) -> bool {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        self.record(format!("{} {} {}", method, path, auth));

        match self.issued_token.lock().unwrap().as_deref() {
            Some(token) => auth == format!("Bearer {}", token),
            None => false,
        }
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: MockState,
}

/// Start a fake console API on a free port inside the current runtime
pub async fn spawn_backend() -> Result<MockBackend> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);
    let state = MockState::default();

    let app = Router::new()
        .route("/session/login", post(login))
        .route("/api/:resource", get(list).post(create))
        .route("/api/:resource/:id", get(show).put(update).delete(remove))
        .route("/api/:resource/:id/:action", patch(item_action).put(item_action))
        .route("/files/:name", get(file))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind mock backend")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(MockBackend { base_url, state })
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Token missing or invalid" }))).into_response()
}

async fn login(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.record(format!("POST /session/login {}", body["username"].as_str().unwrap_or("-")));

    if body["password"] != PASSWORD {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid username or password" })))
            .into_response();
    }

    let token = sealed_token(7, &LOGIN_PERMISSIONS);
    *state.issued_token.lock().unwrap() = Some(token.clone());
    (StatusCode::OK, Json(json!({ "data": { "token": token } }))).into_response()
}

async fn list(State(state): State<MockState>, Path(resource): Path<String>, headers: HeaderMap) -> Response {
    if !state.authorized("GET", &format!("/api/{}", resource), &headers) {
        return unauthorized();
    }
    Json(json!([{ "id": 1, "title": format!("first {}", resource) }, { "id": 2, "title": "second" }]))
        .into_response()
}

async fn create(
    State(state): State<MockState>,
    Path(resource): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if !state.authorized("POST", &format!("/api/{}", resource), &headers) {
        return unauthorized();
    }
    body["id"] = json!(99);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn show(
    State(state): State<MockState>,
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if !state.authorized("GET", &format!("/api/{}/{}", resource, id), &headers) {
        return unauthorized();
    }
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "title": "Not Found", "status": 404 }))).into_response();
    }
    Json(json!({ "id": id, "resource": resource })).into_response()
}

async fn update(
    State(state): State<MockState>,
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.authorized("PUT", &format!("/api/{}/{}", resource, id), &headers) {
        return unauthorized();
    }
    Json(json!({ "id": id, "changes": body })).into_response()
}

async fn remove(
    State(state): State<MockState>,
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if !state.authorized("DELETE", &format!("/api/{}/{}", resource, id), &headers) {
        return unauthorized();
    }
    if resource == "roles" {
        return (StatusCode::CONFLICT, "Role is still assigned to users").into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn item_action(
    State(state): State<MockState>,
    method: Method,
    Path((resource, id, action)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let path = format!("/api/{}/{}/{}", resource, id, action);
    if !state.authorized(method.as_str(), &path, &headers) {
        return unauthorized();
    }
    if method == Method::PATCH && action == "status" {
        Json(json!({ "id": id, "status": body["status"] })).into_response()
    } else if method == Method::PUT && action == "password" && resource == "users" {
        Json(json!({ "updated": true })).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn file(State(state): State<MockState>, Path(name): Path<String>, headers: HeaderMap) -> Response {
    if !state.authorized("GET", &format!("/files/{}", name), &headers) {
        return unauthorized();
    }
    (
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}.pdf\"", name)),
        ],
        b"%PDF-1.7\n%mock\n".to_vec(),
    )
        .into_response()
}
