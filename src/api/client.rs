//! Shared HTTP client for the admin backend.
//!
//! DESIGN
//! ======
//! One `reqwest::Client` per process, cloned cheaply into every view. Each
//! clone carries the cancellation token of the view that owns it; every
//! request races that token so tearing a view down resolves its in-flight
//! calls to [`ApiError::Cancelled`] instead of letting them land on state
//! nobody renders anymore.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses are transport errors. 2xx responses go through
//! [`parse_envelope`], which turns `status != "success"` into an
//! application error. No retries: the operator re-triggers.

use std::future::Future;
use std::sync::Arc;

use reqwest::multipart::Form;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::envelope::{Envelope, parse_envelope};
use crate::config::AdminConfig;
use crate::error::ApiError;

/// Name of the backend script a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Admin,
    Notifications,
    ServeImage,
}

impl Script {
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Admin => "admin.php",
            Self::Notifications => "notifications.php",
            Self::ServeImage => "serve-image.php",
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: &AdminConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeouts.request())
            .connect_timeout(config.timeouts.connect())
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: Arc::from(config.api_base_url.trim_end_matches('/')),
            cancel: CancellationToken::new(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Clone bound to a child of `parent`: cancelling `parent` (or the
    /// returned client's own token) cancels only this scope's requests.
    #[must_use]
    pub fn scoped(&self, parent: &CancellationToken) -> Self {
        Self { http: self.http.clone(), base_url: Arc::clone(&self.base_url), cancel: parent.child_token() }
    }

    #[must_use]
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    #[must_use]
    pub fn script_url(&self, script: Script) -> String {
        format!("{}/{}", self.base_url, script.file_name())
    }

    /// `GET {script}?{query}` and parse the envelope.
    ///
    /// # Errors
    ///
    /// Transport, status, decode, application, or cancellation errors.
    pub async fn get(&self, script: Script, query: &[(&str, String)]) -> Result<Envelope, ApiError> {
        let operation = operation_of(query);
        let request = self.http.get(self.script_url(script)).query(query);
        let body = self.send_text(request, script, operation).await?;
        parse_logged(&body, script, operation)
    }

    /// `POST {script}?operation={operation}` with a JSON body.
    ///
    /// # Errors
    ///
    /// Transport, status, decode, application, or cancellation errors.
    pub async fn post_json(&self, script: Script, operation: &str, body: &Value) -> Result<Envelope, ApiError> {
        let request = self
            .http
            .post(self.script_url(script))
            .query(&[("operation", operation)])
            .json(body);
        let text = self.send_text(request, script, operation).await?;
        parse_logged(&text, script, operation)
    }

    /// `POST {script}?operation={operation}` with a multipart form.
    ///
    /// # Errors
    ///
    /// Transport, status, decode, application, or cancellation errors.
    pub async fn post_multipart(&self, script: Script, operation: &str, form: Form) -> Result<Envelope, ApiError> {
        let request = self
            .http
            .post(self.script_url(script))
            .query(&[("operation", operation)])
            .multipart(form);
        let text = self.send_text(request, script, operation).await?;
        parse_logged(&text, script, operation)
    }

    /// `GET {script}?{query}` returning the raw body.
    ///
    /// A JSON body on a binary endpoint is an error envelope and is surfaced
    /// as such.
    ///
    /// # Errors
    ///
    /// Transport, status, application, or cancellation errors.
    pub async fn get_bytes(&self, script: Script, query: &[(&str, String)]) -> Result<Vec<u8>, ApiError> {
        let request = self.http.get(self.script_url(script)).query(query);
        let response = self
            .guarded(async {
                let response = request.send().await?;
                check_status(response).await
            })
            .await?;

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));
        let bytes = self.guarded(async { Ok(response.bytes().await?) }).await?;
        if is_json {
            let body = String::from_utf8_lossy(&bytes);
            parse_envelope(&body)?;
            return Err(ApiError::Decode("expected binary body, got JSON".to_owned()));
        }
        Ok(bytes.to_vec())
    }

    async fn send_text(
        &self,
        request: reqwest::RequestBuilder,
        script: Script,
        operation: &str,
    ) -> Result<String, ApiError> {
        debug!(script = script.file_name(), operation, "api request");
        let result = self
            .guarded(async {
                let response = request.send().await?;
                let response = check_status(response).await?;
                Ok(response.text().await?)
            })
            .await;
        if let Err(e) = &result {
            if !matches!(e, ApiError::Cancelled) {
                warn!(script = script.file_name(), operation, error = %e, "api request failed");
            }
        }
        result
    }

    /// Race a request future against this client's cancellation token.
    async fn guarded<T, F>(&self, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if self.cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(ApiError::Cancelled),
            result = fut => result,
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::HttpStatus { status: status.as_u16(), body })
}

fn parse_logged(body: &str, script: Script, operation: &str) -> Result<Envelope, ApiError> {
    let result = parse_envelope(body);
    if let Err(e) = &result {
        warn!(script = script.file_name(), operation, error = %e, "api returned failure");
    }
    result
}

fn operation_of<'a>(query: &'a [(&str, String)]) -> &'a str {
    query
        .iter()
        .find(|(k, _)| *k == "operation")
        .map_or("", |(_, v)| v.as_str())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
