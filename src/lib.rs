//! eventdesk: admin client core for the events-booking backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! The PHP backend (`admin.php`, `notifications.php`, `serve-image.php`)
//! owns every record. This crate mirrors what it returns, lets an operator
//! filter, page, select and mutate it, and reflects the backend's state
//! after each round trip.
//!
//! LAYOUT
//! ======
//! - [`api`]: HTTP client, response envelope, typed operations.
//! - [`models`]: records, closed status enums, badge table.
//! - [`list`]: the generic list-state controller every view uses.
//! - [`views`]: per-entity controller configuration.
//! - [`notifications`]: watermark poller.
//! - [`debounce`]: settled search input.
//! - [`config`], [`error`], [`validation`]: ambient concerns.

pub mod api;
pub mod config;
pub mod debounce;
pub mod error;
pub mod list;
pub mod models;
pub mod notifications;
pub mod validation;
pub mod views;

pub use config::AdminConfig;
pub use error::{ApiError, Notice, Notifier};
