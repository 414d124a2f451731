//! Error taxonomy and user-visible notices.
//!
//! DESIGN
//! ======
//! Every failure the admin client can hit collapses into one of three
//! categories: the request never completed (transport), the backend said no
//! (application), or the input was rejected before a request was sent
//! (validation). Views never show raw errors; they show a [`Notice`] derived
//! from the error with the best message available.

use crate::validation::ValidationError;

const GENERIC_TRANSPORT_MESSAGE: &str = "Could not reach the server. Please try again.";
const GENERIC_APPLICATION_MESSAGE: &str = "The server rejected the request.";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by remote calls and list-controller operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request failed before a response arrived.
    #[error("request failed: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The backend answered with a non-success HTTP status.
    #[error("unexpected HTTP status {status}")]
    HttpStatus { status: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The backend answered `status != "success"`.
    #[error("{message}")]
    Application { message: String },

    /// Input was rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The owning view was torn down while the call was in flight.
    #[error("request cancelled")]
    Cancelled,

    /// A row action is already in flight.
    #[error("another action is already in progress for record {pending}")]
    Busy { pending: i64 },

    /// The view has no filter registered under this key.
    #[error("unknown filter `{0}`")]
    UnknownFilter(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Coarse classification used for logging and notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Application,
    Validation,
    Lifecycle,
}

impl ApiError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) | Self::Timeout | Self::HttpStatus { .. } | Self::Decode(_) | Self::HttpClientBuild(_) => {
                ErrorCategory::Transport
            }
            Self::Application { .. } => ErrorCategory::Application,
            Self::Validation(_) | Self::UnknownFilter(_) => ErrorCategory::Validation,
            Self::Cancelled | Self::Busy { .. } => ErrorCategory::Lifecycle,
        }
    }

    /// Build the user-visible notice for this error.
    ///
    /// Returns `None` for cancellation: a torn-down view has nobody to tell.
    #[must_use]
    pub fn notice(&self, title: impl Into<String>) -> Option<Notice> {
        let description = match self {
            Self::Cancelled => return None,
            Self::Application { message } if message.trim().is_empty() => GENERIC_APPLICATION_MESSAGE.to_owned(),
            Self::Application { message } => message.clone(),
            Self::Validation(err) => err.to_string(),
            Self::UnknownFilter(_) | Self::Busy { .. } => self.to_string(),
            Self::Transport(_) | Self::Timeout | Self::HttpStatus { .. } | Self::Decode(_) | Self::HttpClientBuild(_) => {
                GENERIC_TRANSPORT_MESSAGE.to_owned()
            }
        };
        Some(Notice::destructive(title, description))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

// =============================================================================
// NOTICES
// =============================================================================

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Destructive,
}

/// A transient message shown to the operator (toast in the dashboard,
/// a stderr line in the CLI).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), severity: Severity::Info }
    }

    #[must_use]
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), severity: Severity::Destructive }
    }
}

/// Sink for notices raised by controllers and pollers.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only logs. Used when no UI surface is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Info => tracing::info!(title = %notice.title, "{}", notice.description),
            Severity::Destructive => tracing::warn!(title = %notice.title, "{}", notice.description),
        }
    }
}

/// Notifier that records every notice; cloned handles share the log.
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    inner: std::sync::Arc<std::sync::Mutex<Vec<Notice>>>,
}

impl NoticeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return all recorded notices.
    #[must_use]
    pub fn drain(&self) -> Vec<Notice> {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        std::mem::take(&mut *inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Notice> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notice);
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
