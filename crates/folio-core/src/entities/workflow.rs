use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AssignmentStatus, WorkflowStatus};

/// One authorized move: a caller whose role is named `required_role` may move
/// an entry from `from_status` to `to_status`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct WorkflowTransition {
    pub from_status: WorkflowStatus,
    pub to_status: WorkflowStatus,
    pub required_role: String,
}

impl WorkflowTransition {
    #[must_use]
    pub fn new(from: WorkflowStatus, to: WorkflowStatus, role: &str) -> Self {
        Self {
            from_status: from,
            to_status: to,
            required_role: role.to_string(),
        }
    }
}

/// Append-only record of a status change.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WorkflowHistory {
    pub id: String,
    pub entry_id: String,
    pub from_status: WorkflowStatus,
    pub to_status: WorkflowStatus,
    pub changed_by: String,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WorkflowComment {
    pub id: String,
    pub entry_id: String,
    pub user_id: String,
    pub text: String,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

/// A request for a user to review an entry. `completed` is terminal.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WorkflowAssignment {
    pub id: String,
    pub entry_id: String,
    pub assigned_to: String,
    pub assigned_by: String,
    pub status: AssignmentStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
