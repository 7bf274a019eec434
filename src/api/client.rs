use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Method, RequestBuilder, Response};
use serde_json::{json, Value};
use url::Url;

use super::attachment::Attachment;
use super::resource::Resource;
use super::validation::{confirm_matches, require_fields};
use crate::auth::{Claims, TokenDecoder};
use crate::config::{ApiConfig, PathConfig};
use crate::error::ApiError;
use crate::store::CredentialStore;

/// REST client for the console backend.
///
/// Authenticated calls read the stored credential on every request and send
/// it as a bearer token. Nothing is retried or cancelled.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    paths: PathConfig,
    store: Arc<dyn CredentialStore>,
}

impl ApiClient {
    pub fn new(
        api: &ApiConfig,
        paths: PathConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent(api.user_agent.clone())
            .build()?;

        let base_url = Url::parse(&api.base_url)?;

        Ok(Self {
            http,
            base_url,
            paths,
            store,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Resolve `path` against the base URL; other origins never get the token
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let url = self.base_url.join(path)?;
        if url.origin() != self.base_url.origin() {
            tracing::warn!(path, "refusing request outside the configured API origin");
            return Err(ApiError::transport(format!(
                "Refusing to send request to {} outside {}",
                url.origin().ascii_serialization(),
                self.base_url.origin().ascii_serialization()
            )));
        }
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(%method, path, "api request");
        Ok(self.http.request(method, url))
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.store.get().ok_or(ApiError::MissingCredential)?;
        Ok(self.request(method, path)?.bearer_auth(token))
    }

    // Session management

    /// Exchange credentials for a token and store it.
    ///
    /// Returns the decoded claims when `decoder` can open the new token; a
    /// token that stores but does not decode still counts as logged in.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        decoder: &TokenDecoder,
    ) -> Result<Option<Claims>, ApiError> {
        if username.trim().is_empty() || password.is_empty() {
            let mut field_errors = std::collections::HashMap::new();
            if username.trim().is_empty() {
                field_errors.insert("username".to_string(), "This field is required".to_string());
            }
            if password.is_empty() {
                field_errors.insert("password".to_string(), "This field is required".to_string());
            }
            return Err(ApiError::validation_error("Missing required fields", Some(field_errors)));
        }

        let body = json!({ "username": username, "password": password });
        let response = self
            .request(Method::POST, &self.paths.login)?
            .json(&body)
            .send()
            .await?;
        let payload = read_json(response).await?;

        let token = extract_token(&payload)
            .ok_or_else(|| ApiError::transport("Login response did not contain a token"))?;

        self.store
            .set(&token)
            .map_err(|e| ApiError::transport(format!("Could not store credential: {}", e)))?;
        tracing::info!("Logged in as {}", username);

        match decoder.decode(&token) {
            Ok(claims) => Ok(Some(claims)),
            Err(e) => {
                tracing::warn!("Login token stored but could not be decoded: {}", e);
                Ok(None)
            }
        }
    }

    /// Drop the stored credential
    pub fn logout(&self) -> Result<(), ApiError> {
        self.store
            .clear()
            .map_err(|e| ApiError::transport(format!("Could not clear credential: {}", e)))?;
        tracing::info!("Logged out");
        Ok(())
    }

    // Resource operations

    pub async fn list(&self, resource: Resource, query: &[(String, String)]) -> Result<Value, ApiError> {
        let response = self
            .authed(Method::GET, &resource.collection_path(&self.paths))?
            .query(query)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn get(&self, resource: Resource, id: &str) -> Result<Value, ApiError> {
        let response = self
            .authed(Method::GET, &resource.item_path(&self.paths, id))?
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn create(&self, resource: Resource, body: &Value) -> Result<Value, ApiError> {
        require_fields(body, resource.required_fields())?;

        let response = self
            .authed(Method::POST, &resource.collection_path(&self.paths))?
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn update(&self, resource: Resource, id: &str, body: &Value) -> Result<Value, ApiError> {
        require_fields(body, &[])?;

        let response = self
            .authed(Method::PUT, &resource.item_path(&self.paths, id))?
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn delete(&self, resource: Resource, id: &str) -> Result<Value, ApiError> {
        let response = self
            .authed(Method::DELETE, &resource.item_path(&self.paths, id))?
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn set_status(&self, resource: Resource, id: &str, status: &str) -> Result<Value, ApiError> {
        require_fields(&json!({ "status": status }), &["status"])?;

        let response = self
            .authed(Method::PATCH, &resource.status_path(&self.paths, id))?
            .json(&json!({ "status": status }))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<Value, ApiError> {
        confirm_matches("password", new_password, confirmation)?;

        let path = self.paths.user_password.replace("{id}", user_id);
        let response = self
            .authed(Method::PUT, &path)?
            .json(&json!({ "password": new_password, "confirmPassword": confirmation }))
            .send()
            .await?;
        read_json(response).await
    }

    /// Fetch a file; `path` is relative to the base URL
    pub async fn download_attachment(&self, path: &str) -> Result<Attachment, ApiError> {
        let response = check_status(self.authed(Method::GET, path)?.send().await?).await?;

        let content_type = header_string(&response, header::CONTENT_TYPE);
        let disposition = header_string(&response, header::CONTENT_DISPOSITION);
        let bytes = response.bytes().await?.to_vec();

        Ok(Attachment::new(bytes, content_type.as_deref(), disposition.as_deref()))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn header_string(response: &Response, name: header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = error_message(&text)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
    tracing::debug!(status = status.as_u16(), "api error: {}", message);
    Err(ApiError::from_status(status.as_u16(), message))
}

/// Success body as JSON; empty bodies read as `null`
async fn read_json(response: Response) -> Result<Value, ApiError> {
    let response = check_status(response).await?;
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(_) => Ok(Value::String(text)),
    }
}

/// Server message from an error body
pub fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => ["message", "error", "title", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .or_else(|| Some(trimmed.to_string())),
        Ok(Value::String(s)) => Some(s),
        _ => Some(trimmed.to_string()),
    }
}

/// Token from a login response body
pub fn extract_token(payload: &Value) -> Option<String> {
    match payload {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(map) => ["token", "accessToken", "access_token"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().to_string())
            .or_else(|| map.get("data").and_then(extract_token)),
        _ => None,
    }
}
