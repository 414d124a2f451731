//! Closed status enums and the badge lookup table.
//!
//! DESIGN
//! ======
//! The backend sends statuses as lowercase strings. Each domain gets one
//! enum with an `Unknown` catch-all so a new server-side value degrades to a
//! neutral badge instead of a decode failure. Labels and tones live in
//! [`BADGES`], the only place a status is mapped to presentation.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

// =============================================================================
// PRESENTATION
// =============================================================================

/// Visual tone of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Destructive,
}

impl Tone {
    /// Hex color used when rendering the badge.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Neutral => "#6B7280",
            Self::Info => "#2563EB",
            Self::Success => "#16A34A",
            Self::Warning => "#D97706",
            Self::Destructive => "#DC2626",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: &'static str,
    pub tone: Tone,
}

/// Which status family a wire value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Booking,
    Payment,
    Onboarding,
    Session,
}

const UNKNOWN_BADGE: StatusBadge = StatusBadge { label: "Unknown", tone: Tone::Neutral };

const fn badge(label: &'static str, tone: Tone) -> StatusBadge {
    StatusBadge { label, tone }
}

/// Every known (kind, wire value) pair and its badge.
pub const BADGES: &[(StatusKind, &str, StatusBadge)] = &[
    (StatusKind::Booking, "pending", badge("Pending", Tone::Warning)),
    (StatusKind::Booking, "confirmed", badge("Confirmed", Tone::Success)),
    (StatusKind::Booking, "cancelled", badge("Cancelled", Tone::Destructive)),
    (StatusKind::Booking, "completed", badge("Completed", Tone::Info)),
    (StatusKind::Booking, "converted", badge("Converted to Event", Tone::Info)),
    (StatusKind::Payment, "unpaid", badge("Unpaid", Tone::Destructive)),
    (StatusKind::Payment, "pending", badge("Pending", Tone::Warning)),
    (StatusKind::Payment, "partial", badge("Partially Paid", Tone::Warning)),
    (StatusKind::Payment, "paid", badge("Paid", Tone::Success)),
    (StatusKind::Payment, "overdue", badge("Overdue", Tone::Destructive)),
    (StatusKind::Payment, "failed", badge("Failed", Tone::Destructive)),
    (StatusKind::Payment, "refunded", badge("Refunded", Tone::Neutral)),
    (StatusKind::Onboarding, "pending", badge("Pending Review", Tone::Warning)),
    (StatusKind::Onboarding, "approved", badge("Approved", Tone::Info)),
    (StatusKind::Onboarding, "active", badge("Active", Tone::Success)),
    (StatusKind::Onboarding, "inactive", badge("Inactive", Tone::Neutral)),
    (StatusKind::Onboarding, "rejected", badge("Rejected", Tone::Destructive)),
    (StatusKind::Onboarding, "suspended", badge("Suspended", Tone::Destructive)),
    (StatusKind::Session, "active", badge("Active", Tone::Success)),
    (StatusKind::Session, "ended", badge("Ended", Tone::Neutral)),
    (StatusKind::Session, "expired", badge("Expired", Tone::Warning)),
    (StatusKind::Session, "terminated", badge("Terminated", Tone::Destructive)),
];

/// Look up the badge for a wire value; unknown values get a neutral badge.
#[must_use]
pub fn lookup_badge(kind: StatusKind, wire: &str) -> StatusBadge {
    BADGES
        .iter()
        .find(|(k, w, _)| *k == kind && *w == wire)
        .map_or(UNKNOWN_BADGE, |(_, _, b)| *b)
}

/// Shared behavior of the status enums.
pub trait DomainStatus: Sized + Copy + 'static {
    const KIND: StatusKind;
    const NAME: &'static str;

    /// Wire value as the backend spells it.
    fn as_str(self) -> &'static str;

    /// Every known variant, excluding `Unknown`.
    fn known() -> &'static [Self];

    fn badge(self) -> StatusBadge {
        lookup_badge(Self::KIND, self.as_str())
    }

    /// Parse operator input (case-insensitive). `Unknown` is never produced.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the status family.
    fn parse(raw: &str) -> Result<Self, ValidationError> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::known()
            .iter()
            .copied()
            .find(|s| s.as_str() == needle)
            .ok_or(ValidationError::UnknownVariant { kind: Self::NAME, value: raw.to_owned() })
    }
}

// =============================================================================
// BOOKING
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Converted,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DomainStatus for BookingStatus {
    const KIND: StatusKind = StatusKind::Booking;
    const NAME: &'static str = "booking status";

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Converted => "converted",
            Self::Unknown => "unknown",
        }
    }

    fn known() -> &'static [Self] {
        &[Self::Pending, Self::Confirmed, Self::Cancelled, Self::Completed, Self::Converted]
    }
}

// =============================================================================
// PAYMENT
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Pending,
    Partial,
    Paid,
    Overdue,
    Failed,
    Refunded,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DomainStatus for PaymentStatus {
    const KIND: StatusKind = StatusKind::Payment;
    const NAME: &'static str = "payment status";

    fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
            Self::Unknown => "unknown",
        }
    }

    fn known() -> &'static [Self] {
        &[
            Self::Unpaid,
            Self::Pending,
            Self::Partial,
            Self::Paid,
            Self::Overdue,
            Self::Failed,
            Self::Refunded,
        ]
    }
}

// =============================================================================
// ONBOARDING (organizers, staff, suppliers, venues)
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnboardingStatus {
    Pending,
    Approved,
    Active,
    Inactive,
    Rejected,
    Suspended,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DomainStatus for OnboardingStatus {
    const KIND: StatusKind = StatusKind::Onboarding;
    const NAME: &'static str = "onboarding status";

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Rejected => "rejected",
            Self::Suspended => "suspended",
            Self::Unknown => "unknown",
        }
    }

    fn known() -> &'static [Self] {
        &[
            Self::Pending,
            Self::Approved,
            Self::Active,
            Self::Inactive,
            Self::Rejected,
            Self::Suspended,
        ]
    }
}

// =============================================================================
// SESSION
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Ended,
    Expired,
    Terminated,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DomainStatus for SessionStatus {
    const KIND: StatusKind = StatusKind::Session;
    const NAME: &'static str = "session status";

    fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ended => "ended",
            Self::Expired => "expired",
            Self::Terminated => "terminated",
            Self::Unknown => "unknown",
        }
    }

    fn known() -> &'static [Self] {
        &[Self::Active, Self::Ended, Self::Expired, Self::Terminated]
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
