//! Records mirrored from the admin backend.
//!
//! DESIGN
//! ======
//! Each record declares the fields the client reads and keeps everything
//! else verbatim in a flattened `extra` map, so a record written back or
//! printed carries every field the server sent. Derived fields (payment
//! totals, percentages) are never recomputed client-side.

pub(crate) mod de;

pub mod booking;
pub mod notification;
pub mod organizer;
pub mod payment;
pub mod report;
pub mod staff;
pub mod status;
pub mod supplier;
pub mod venue;

pub use booking::Booking;
pub use notification::{Notification, NotificationCounts};
pub use organizer::Organizer;
pub use payment::{EventPaymentSummary, Payment, PaymentDraft};
pub use report::{ActivityItem, SessionAnalytics, SessionLog};
pub use staff::Staff;
pub use status::{BookingStatus, DomainStatus, OnboardingStatus, PaymentStatus, SessionStatus, StatusBadge, Tone};
pub use supplier::Supplier;
pub use venue::Venue;

/// Backend primary key. PHP rows use auto-increment integers.
pub type RecordId = i64;

/// A row the list controller can select, delete, and patch.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> RecordId;

    /// Optimistically set the row's status from a wire value.
    ///
    /// Returns `false` when the record has no status or the value does not
    /// parse; the row is left unchanged in that case.
    fn apply_status(&mut self, _wire: &str) -> bool {
        false
    }
}
