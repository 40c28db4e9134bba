//! Role-gated workflow transition table.
//!
//! The table is data: rows are seeded into storage and loaded back for every
//! check, so the pipeline can be changed without a rebuild. Several rows may
//! share a `(from, to)` pair, one per role allowed to make the move.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::WorkflowTransition;
use crate::enums::WorkflowStatus;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TransitionTable {
    pub rows: Vec<WorkflowTransition>,
}

impl TransitionTable {
    #[must_use]
    pub const fn new(rows: Vec<WorkflowTransition>) -> Self {
        Self { rows }
    }

    /// The default editorial pipeline: editors move drafts through review,
    /// managers approve and publish, admins can do both.
    #[must_use]
    pub fn default_rows() -> Vec<WorkflowTransition> {
        use WorkflowStatus::{Approved, Draft, InReview, Published, ReadyForApproval, Rejected};

        let pairs: [(WorkflowStatus, WorkflowStatus, &str); 8] = [
            (Draft, InReview, "editor"),
            (InReview, ReadyForApproval, "editor"),
            (InReview, Rejected, "editor"),
            (InReview, Draft, "editor"),
            (ReadyForApproval, Approved, "manager"),
            (ReadyForApproval, Rejected, "manager"),
            (Approved, Published, "manager"),
            (Rejected, Draft, "editor"),
        ];
        pairs
            .into_iter()
            .flat_map(|(from, to, role)| {
                [
                    WorkflowTransition::new(from, to, role),
                    WorkflowTransition::new(from, to, "admin"),
                ]
            })
            .collect()
    }

    /// Whether a caller holding `role` may move an entry from `from` to `to`.
    #[must_use]
    pub fn permits(&self, from: WorkflowStatus, to: WorkflowStatus, role: &str) -> bool {
        self.rows
            .iter()
            .any(|t| t.from_status == from && t.to_status == to && t.required_role == role)
    }

    /// Targets reachable from `from` for `role`.
    #[must_use]
    pub fn targets(&self, from: WorkflowStatus, role: &str) -> Vec<WorkflowStatus> {
        self.rows
            .iter()
            .filter(|t| t.from_status == from && t.required_role == role)
            .map(|t| t.to_status)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::enums::WorkflowStatus::{Approved, Draft, InReview, Published, ReadyForApproval, Rejected};

    fn table() -> TransitionTable {
        TransitionTable::new(TransitionTable::default_rows())
    }

    #[test]
    fn sixteen_default_rows() {
        assert_eq!(TransitionTable::default_rows().len(), 16);
    }

    #[rstest]
    #[case(Draft, InReview, "editor", true)]
    #[case(Draft, InReview, "admin", true)]
    #[case(Draft, InReview, "manager", false)]
    #[case(Draft, Approved, "manager", false)]
    #[case(Draft, Published, "admin", false)]
    #[case(ReadyForApproval, Approved, "manager", true)]
    #[case(ReadyForApproval, Approved, "editor", false)]
    #[case(Approved, Published, "manager", true)]
    #[case(Published, Draft, "admin", false)]
    #[case(Rejected, Draft, "editor", true)]
    #[case(Rejected, InReview, "editor", false)]
    #[case(InReview, Draft, "viewer", false)]
    fn permits_matches_table(
        #[case] from: WorkflowStatus,
        #[case] to: WorkflowStatus,
        #[case] role: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(table().permits(from, to, role), expected);
    }

    #[test]
    fn published_is_a_dead_end() {
        for role in ["editor", "manager", "admin"] {
            assert!(table().targets(Published, role).is_empty());
        }
    }

    #[test]
    fn every_triple_outside_the_table_is_refused() {
        let t = table();
        for from in WorkflowStatus::ALL {
            for to in WorkflowStatus::ALL {
                for role in ["editor", "manager", "admin", "viewer"] {
                    let listed = t
                        .rows
                        .iter()
                        .any(|r| r.from_status == from && r.to_status == to && r.required_role == role);
                    assert_eq!(t.permits(from, to, role), listed);
                }
            }
        }
    }

    #[test]
    fn editor_targets_from_review() {
        let mut targets = table().targets(InReview, "editor");
        targets.sort_by_key(|s| s.as_str());
        assert_eq!(targets, vec![Draft, ReadyForApproval, Rejected]);
    }
}
