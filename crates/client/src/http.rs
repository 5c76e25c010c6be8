//! Shared HTTP client for the rounds service.
//!
//! Every API call goes through [`ApiClient`], which owns the base URL, the
//! bearer-token policy and the response envelope handling. There are no
//! retries: a failed call surfaces to the caller as an [`AppError`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client as HttpClient, Method, RequestBuilder, StatusCode};
use rounds_shared::config::ApiConfig;
use rounds_shared::{AppError, AppResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::session::SessionManager;

/// Business code the service uses for success inside the envelope.
const SUCCESS_CODE: i64 = 200;

/// Whether a request carries the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Send `Authorization: Bearer <token>` when logged in.
    Bearer,
    /// Never send credentials (login).
    Anonymous,
}

/// How the response body is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `{code, message, data}`; `code` other than 200 is a business error.
    Wrapped,
    /// The payload itself (login, profile).
    Bare,
}

/// The service's standard response wrapper.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    /// Business status code; 200 means success.
    pub code: i64,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Payload.
    #[serde(default)]
    pub data: Value,
    /// Server timestamp.
    #[serde(default)]
    pub timestamp: Option<Value>,
    /// Request id for support.
    #[serde(default)]
    pub request_id: Option<String>,
}

/// HTTP client bound to one service and one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http_client: HttpClient,
    session: Arc<SessionManager>,
}

impl ApiClient {
    /// Creates a client from the API configuration.
    pub fn new(config: &ApiConfig, session: Arc<SessionManager>) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            session,
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Absolute URL for a service path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET` with optional query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        auth: AuthPolicy,
        envelope: Envelope,
    ) -> AppResult<T> {
        let request = self.http_client.get(self.url(path)).query(query);
        self.send(Method::GET, path, request, auth, envelope).await
    }

    /// `POST` with a JSON body.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        auth: AuthPolicy,
        envelope: Envelope,
    ) -> AppResult<T> {
        let request = self.http_client.post(self.url(path)).json(body);
        self.send(Method::POST, path, request, auth, envelope).await
    }

    /// `PUT` with a JSON body.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        auth: AuthPolicy,
        envelope: Envelope,
    ) -> AppResult<T> {
        let request = self.http_client.put(self.url(path)).json(body);
        self.send(Method::PUT, path, request, auth, envelope).await
    }

    /// `DELETE`.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: AuthPolicy,
        envelope: Envelope,
    ) -> AppResult<T> {
        let request = self.http_client.delete(self.url(path));
        self.send(Method::DELETE, path, request, auth, envelope).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        mut request: RequestBuilder,
        auth: AuthPolicy,
        envelope: Envelope,
    ) -> AppResult<T> {
        if auth == AuthPolicy::Bearer
            && let Some(token) = self.session.token().await
        {
            request = request.bearer_auth(token);
        }

        debug!(%method, path, "Sending request");
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        debug!(%method, path, status = status.as_u16(), "Received response");

        if status == StatusCode::UNAUTHORIZED {
            warn!(path, "Session rejected by the service; logging out");
            self.session.clear().await?;
        }

        decode_response(status, &body, envelope)
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::ExternalService(format!("request timed out: {err}"))
    } else {
        AppError::ExternalService(format!("network request failed: {err}"))
    }
}

/// Turns a status and body into a payload or an error.
///
/// Non-success statuses map through [`AppError::from_status`]. An empty
/// body decodes as JSON `null` under either envelope, so action endpoints
/// that answer with a bare `200` can be read as `()`.
pub fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    envelope: Envelope,
) -> AppResult<T> {
    if !status.is_success() {
        return Err(AppError::from_status(status.as_u16(), error_message(status, body)));
    }

    if body.trim().is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    match envelope {
        Envelope::Bare => Ok(serde_json::from_str(body)?),
        Envelope::Wrapped => {
            let wrapped: ApiResponse = serde_json::from_str(body)?;
            if wrapped.code != SUCCESS_CODE {
                return Err(AppError::BusinessRule(
                    wrapped
                        .message
                        .unwrap_or_else(|| format!("request failed with code {}", wrapped.code)),
                ));
            }
            Ok(serde_json::from_value(wrapped.data)?)
        }
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}
