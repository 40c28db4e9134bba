//! Closed enums for Folio: field types, workflow statuses, permission
//! modules/actions/scopes and assignment statuses.
//!
//! Enums serialize as `snake_case` except [`Module`], which keeps the
//! capitalised names stored in permission rows (`ContentEntry`, `Media`, `SEO`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// Declared type of a field definition.
///
/// The set is closed so that the validator's dispatch is checked for
/// exhaustiveness; constraints on a field are interpreted per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Text,
    Email,
    Url,
    Number,
    Boolean,
    Date,
    Media,
}

impl FieldType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Email => "email",
            Self::Url => "url",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Media => "media",
        }
    }

    /// Whether `min_length`, `max_length` and `pattern` apply to this type.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::String | Self::Text)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// WorkflowStatus
// ---------------------------------------------------------------------------

/// Editorial status of a content entry.
///
/// ```text
/// draft → in_review → ready_for_approval → approved → published
///           ↓  ↑               ↓
///        rejected ←────────────┘
///           ↓
///         draft
/// ```
///
/// Which moves are legal, and for whom, is decided by
/// [`crate::workflow::TransitionTable`], not by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Draft,
    InReview,
    ReadyForApproval,
    Approved,
    Published,
    Rejected,
}

impl WorkflowStatus {
    /// Every status, in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::Draft,
        Self::InReview,
        Self::ReadyForApproval,
        Self::Approved,
        Self::Published,
        Self::Rejected,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InReview => "in_review",
            Self::ReadyForApproval => "ready_for_approval",
            Self::Approved => "approved",
            Self::Published => "published",
            Self::Rejected => "rejected",
        }
    }

    /// Entries in this status accept content edits.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        !matches!(self, Self::Published)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Module
// ---------------------------------------------------------------------------

/// Resource area a permission applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Module {
    #[serde(rename = "ContentEntry")]
    ContentEntry,
    #[serde(rename = "Media")]
    Media,
    #[serde(rename = "SEO")]
    Seo,
}

impl Module {
    pub const ALL: [Self; 3] = [Self::ContentEntry, Self::Media, Self::Seo];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContentEntry => "ContentEntry",
            Self::Media => "Media",
            Self::Seo => "SEO",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Operation a permission grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Approve,
}

impl Action {
    /// The four CRUD actions, as used by the full-access check.
    pub const CRUD: [Self; 4] = [Self::Create, Self::Read, Self::Update, Self::Delete];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Approve => "approve",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FieldScope
// ---------------------------------------------------------------------------

/// Which fields of a payload a permission lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldScope {
    #[default]
    All,
    SeoOnly,
    NonSeoOnly,
    Custom,
}

impl FieldScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::SeoOnly => "seo_only",
            Self::NonSeoOnly => "non_seo_only",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for FieldScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AssignmentStatus
// ---------------------------------------------------------------------------

/// Status of a reviewer assignment.
///
/// ```text
/// pending → completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    Completed,
}

impl AssignmentStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Completed],
            Self::Completed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
