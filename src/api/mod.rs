//! Remote collaborator: the PHP admin backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend owns all persistent state. This module is the only place
//! that knows script names, operation names, and the response envelope;
//! everything above it works with typed records and [`ApiError`].
//!
//! [`ApiError`]: crate::error::ApiError

pub mod admin;
pub mod client;
pub mod envelope;
pub mod images;
pub mod notifications;

pub use admin::{AdminApi, Entity, ListParams, Listing};
pub use client::{ApiClient, Script};
pub use envelope::{Envelope, parse_envelope};
pub use notifications::NotificationsApi;
