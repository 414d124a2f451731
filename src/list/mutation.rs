//! Remote writes and their lifecycle.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::RecordId;

/// A remote write a list view can issue.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create { payload: Map<String, Value> },
    Update { id: RecordId, payload: Map<String, Value> },
    Delete { id: RecordId },
    SetStatus { id: RecordId, status: String },
    /// Entity-specific row action (`convert`, `terminate`, ...).
    Action { name: &'static str, id: RecordId },
}

impl Mutation {
    /// The row this write targets, if any.
    #[must_use]
    pub fn target(&self) -> Option<RecordId> {
        match self {
            Self::Create { .. } => None,
            Self::Update { id, .. } | Self::Delete { id } | Self::SetStatus { id, .. } | Self::Action { id, .. } => {
                Some(*id)
            }
        }
    }

    /// Short past-tense description for the success notice.
    #[must_use]
    pub fn done_message(&self) -> String {
        match self {
            Self::Create { .. } => "Record created".to_owned(),
            Self::Update { id, .. } => format!("Record {id} updated"),
            Self::Delete { id } => format!("Record {id} deleted"),
            Self::SetStatus { id, status } => format!("Record {id} marked {status}"),
            Self::Action { name, id } => format!("Record {id}: {name} completed"),
        }
    }
}

/// Lifecycle of the latest mutation issued by a controller.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationState {
    InFlight { ticket: Uuid, mutation: Mutation },
    Committed { ticket: Uuid, mutation: Mutation },
    Failed { ticket: Uuid, mutation: Mutation, error: String },
}

impl MutationState {
    #[must_use]
    pub fn ticket(&self) -> Uuid {
        match self {
            Self::InFlight { ticket, .. } | Self::Committed { ticket, .. } | Self::Failed { ticket, .. } => *ticket,
        }
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }
}
