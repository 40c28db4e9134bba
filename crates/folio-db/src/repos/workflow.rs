//! Workflow engine storage: the transition table, role-gated status changes
//! with their audit history, comments, assignments and statistics.

use chrono::{DateTime, Utc};
use folio_core::entities::{
    ContentEntry, WorkflowAssignment, WorkflowComment, WorkflowHistory, WorkflowTransition,
};
use folio_core::enums::{AssignmentStatus, WorkflowStatus};
use folio_core::errors::CoreError;
use folio_core::ids::{PREFIX_ASSIGNMENT, PREFIX_COMMENT, PREFIX_HISTORY, PREFIX_TRANSITION};
use folio_core::responses::WorkflowStatistics;
use folio_core::workflow::TransitionTable;
use tracing::{debug, info, warn};

use crate::error::{DatabaseError, ServiceError, or_not_found};
use crate::helpers::{get_bool, get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::service::FolioService;

const HISTORY_COLS: &str = "id, entry_id, from_status, to_status, changed_by, comment, created_at";

const COMMENT_COLS: &str = "id, entry_id, user_id, text, is_private, created_at";

const ASSIGNMENT_COLS: &str =
    "id, entry_id, assigned_to, assigned_by, status, due_date, created_at, updated_at";

fn row_to_transition(row: &libsql::Row) -> Result<WorkflowTransition, DatabaseError> {
    Ok(WorkflowTransition {
        from_status: parse_enum(&row.get::<String>(0)?)?,
        to_status: parse_enum(&row.get::<String>(1)?)?,
        required_role: row.get(2)?,
    })
}

fn row_to_history(row: &libsql::Row) -> Result<WorkflowHistory, DatabaseError> {
    Ok(WorkflowHistory {
        id: row.get(0)?,
        entry_id: row.get(1)?,
        from_status: parse_enum(&row.get::<String>(2)?)?,
        to_status: parse_enum(&row.get::<String>(3)?)?,
        changed_by: row.get(4)?,
        comment: get_opt_string(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

fn row_to_comment(row: &libsql::Row) -> Result<WorkflowComment, DatabaseError> {
    Ok(WorkflowComment {
        id: row.get(0)?,
        entry_id: row.get(1)?,
        user_id: row.get(2)?,
        text: row.get(3)?,
        is_private: get_bool(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

fn row_to_assignment(row: &libsql::Row) -> Result<WorkflowAssignment, DatabaseError> {
    Ok(WorkflowAssignment {
        id: row.get(0)?,
        entry_id: row.get(1)?,
        assigned_to: row.get(2)?,
        assigned_by: row.get(3)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        due_date: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl FolioService {
    // -----------------------------------------------------------------------
    // Transition table
    // -----------------------------------------------------------------------

    /// Insert the default transition rows that are not present yet. Returns
    /// how many were added.
    pub async fn seed_default_transitions(&self) -> Result<usize, DatabaseError> {
        let mut created = 0;
        for t in TransitionTable::default_rows() {
            if self.insert_transition(&t).await? {
                created += 1;
            }
        }
        if created > 0 {
            info!(created, "seeded default workflow transitions");
        }
        Ok(created)
    }

    /// Allow `role` to move entries from `from` to `to`.
    pub async fn add_transition(
        &self,
        from: WorkflowStatus,
        to: WorkflowStatus,
        role: &str,
    ) -> Result<WorkflowTransition, ServiceError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(ServiceError::invalid("transition role is required"));
        }
        if from == to {
            return Err(ServiceError::invalid(format!("transition from {from} to itself")));
        }
        let transition = WorkflowTransition::new(from, to, role);
        if !self.insert_transition(&transition).await? {
            return Err(ServiceError::conflict(format!(
                "transition {from} -> {to} for {role} already exists"
            )));
        }
        Ok(transition)
    }

    pub async fn list_transitions(&self) -> Result<Vec<WorkflowTransition>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT from_status, to_status, required_role FROM workflow_transitions
                 ORDER BY rowid",
                (),
            )
            .await?;
        let mut transitions = Vec::new();
        while let Some(row) = rows.next().await? {
            transitions.push(row_to_transition(&row)?);
        }
        Ok(transitions)
    }

    /// The stored transition table, read fresh on every call.
    pub async fn transition_table(&self) -> Result<TransitionTable, DatabaseError> {
        Ok(TransitionTable::new(self.list_transitions().await?))
    }

    async fn insert_transition(&self, t: &WorkflowTransition) -> Result<bool, DatabaseError> {
        let id = self.db().generate_id(PREFIX_TRANSITION).await?;
        let changed = self
            .db()
            .conn()
            .execute(
                "INSERT OR IGNORE INTO workflow_transitions (id, from_status, to_status, required_role)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    id.as_str(),
                    t.from_status.as_str(),
                    t.to_status.as_str(),
                    t.required_role.as_str()
                ],
            )
            .await?;
        Ok(changed > 0)
    }

    // -----------------------------------------------------------------------
    // Status changes
    // -----------------------------------------------------------------------

    /// Move an entry to `to` on behalf of `user_id`.
    ///
    /// The `(current, to, role)` triple must be a row of the transition
    /// table, otherwise nothing is written. On success the status change and
    /// its history row are committed together. `published_at` is stamped on
    /// the first move into `published` and kept afterwards.
    pub async fn change_status(
        &self,
        entry_id: &str,
        user_id: &str,
        to: WorkflowStatus,
        comment: Option<&str>,
    ) -> Result<ContentEntry, ServiceError> {
        let mut entry = self.get_entry(entry_id).await?;
        let role = self.role_for_user(user_id).await?;
        let from = entry.status;

        let table = self.transition_table().await?;
        debug!(entry = %entry_id, %from, %to, role = %role.name, "checking transition");
        if !table.permits(from, to, &role.name) {
            warn!(entry = %entry_id, %from, %to, role = %role.name, "transition refused");
            return Err(CoreError::InvalidTransition {
                entity_type: "entry".to_string(),
                id: entry_id.to_string(),
                from: from.to_string(),
                to: to.to_string(),
                role: role.name,
            }
            .into());
        }

        let comment = comment.map(str::trim).filter(|c| !c.is_empty());
        let now = Utc::now();
        let history_id = self.db().generate_id(PREFIX_HISTORY).await?;

        // Runs on the shared connection; see the note on `FolioService`.
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "UPDATE content_entries
             SET status = ?1, updated_by = ?2, updated_at = ?3,
                 published_at = CASE WHEN ?1 = 'published' THEN COALESCE(published_at, ?3)
                                     ELSE published_at END
             WHERE id = ?4",
            libsql::params![to.as_str(), user_id, now.to_rfc3339(), entry_id],
        )
        .await?;
        tx.execute(
            &format!("INSERT INTO workflow_history ({HISTORY_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            libsql::params![
                history_id.as_str(),
                entry_id,
                from.as_str(),
                to.as_str(),
                user_id,
                comment,
                now.to_rfc3339()
            ],
        )
        .await?;
        tx.commit().await?;
        info!(entry = %entry_id, %from, %to, by = %user_id, "status changed");

        entry.status = to;
        entry.updated_by = Some(user_id.to_string());
        entry.updated_at = now;
        if to == WorkflowStatus::Published && entry.published_at.is_none() {
            entry.published_at = Some(now);
        }
        Ok(entry)
    }

    /// Submit a draft for review.
    pub async fn request_review(
        &self,
        entry_id: &str,
        user_id: &str,
        comment: Option<&str>,
    ) -> Result<ContentEntry, ServiceError> {
        let entry = self.get_entry(entry_id).await?;
        if entry.status != WorkflowStatus::Draft {
            let role = self.role_for_user(user_id).await?;
            return Err(CoreError::InvalidTransition {
                entity_type: "entry".to_string(),
                id: entry_id.to_string(),
                from: entry.status.to_string(),
                to: WorkflowStatus::InReview.to_string(),
                role: role.name,
            }
            .into());
        }
        self.change_status(entry_id, user_id, WorkflowStatus::InReview, comment)
            .await
    }

    pub async fn approve_entry(
        &self,
        entry_id: &str,
        user_id: &str,
        comment: Option<&str>,
    ) -> Result<ContentEntry, ServiceError> {
        self.change_status(entry_id, user_id, WorkflowStatus::Approved, comment)
            .await
    }

    pub async fn reject_entry(
        &self,
        entry_id: &str,
        user_id: &str,
        comment: Option<&str>,
    ) -> Result<ContentEntry, ServiceError> {
        self.change_status(entry_id, user_id, WorkflowStatus::Rejected, comment)
            .await
    }

    pub async fn publish_entry(
        &self,
        entry_id: &str,
        user_id: &str,
        comment: Option<&str>,
    ) -> Result<ContentEntry, ServiceError> {
        self.change_status(entry_id, user_id, WorkflowStatus::Published, comment)
            .await
    }

    /// Statuses `user_id` could move the entry to right now.
    pub async fn available_transitions(
        &self,
        entry_id: &str,
        user_id: &str,
    ) -> Result<Vec<WorkflowStatus>, ServiceError> {
        let entry = self.get_entry(entry_id).await?;
        let role = self.role_for_user(user_id).await?;
        Ok(self.transition_table().await?.targets(entry.status, &role.name))
    }

    /// Status history of an entry, oldest first.
    pub async fn history(&self, entry_id: &str) -> Result<Vec<WorkflowHistory>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {HISTORY_COLS} FROM workflow_history WHERE entry_id = ?1
                     ORDER BY created_at, rowid"
                ),
                [entry_id],
            )
            .await?;
        let mut history = Vec::new();
        while let Some(row) = rows.next().await? {
            history.push(row_to_history(&row)?);
        }
        Ok(history)
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    pub async fn add_comment(
        &self,
        entry_id: &str,
        user_id: &str,
        text: &str,
        is_private: bool,
    ) -> Result<WorkflowComment, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::invalid("comment text is required"));
        }
        self.get_entry(entry_id).await?;
        self.get_user(user_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_COMMENT).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO workflow_comments ({COMMENT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                libsql::params![
                    id.as_str(),
                    entry_id,
                    user_id,
                    text,
                    i64::from(is_private),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(WorkflowComment {
            id,
            entry_id: entry_id.to_string(),
            user_id: user_id.to_string(),
            text: text.to_string(),
            is_private,
            created_at: now,
        })
    }

    /// Comments on an entry, oldest first. Private ones only when asked for.
    pub async fn list_comments(
        &self,
        entry_id: &str,
        include_private: bool,
    ) -> Result<Vec<WorkflowComment>, DatabaseError> {
        let filter = if include_private { "" } else { " AND is_private = 0" };
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {COMMENT_COLS} FROM workflow_comments WHERE entry_id = ?1{filter}
                     ORDER BY created_at, rowid"
                ),
                [entry_id],
            )
            .await?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next().await? {
            comments.push(row_to_comment(&row)?);
        }
        Ok(comments)
    }

    // -----------------------------------------------------------------------
    // Assignments
    // -----------------------------------------------------------------------

    /// Create a pending assignment. Earlier assignments of the entry are
    /// left as they are.
    pub async fn assign_entry(
        &self,
        entry_id: &str,
        assigned_to: &str,
        assigned_by: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<WorkflowAssignment, ServiceError> {
        self.get_entry(entry_id).await?;
        self.get_user(assigned_to).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ASSIGNMENT).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO workflow_assignments ({ASSIGNMENT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                libsql::params![
                    id.as_str(),
                    entry_id,
                    assigned_to,
                    assigned_by,
                    AssignmentStatus::Pending.as_str(),
                    due_date.map(|d| d.to_rfc3339()),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;
        info!(assignment = %id, entry = %entry_id, to = %assigned_to, "entry assigned");

        Ok(WorkflowAssignment {
            id,
            entry_id: entry_id.to_string(),
            assigned_to: assigned_to.to_string(),
            assigned_by: assigned_by.to_string(),
            status: AssignmentStatus::Pending,
            due_date,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_assignment(&self, id: &str) -> Result<WorkflowAssignment, ServiceError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {ASSIGNMENT_COLS} FROM workflow_assignments WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or(DatabaseError::NoResult)
            .map_err(or_not_found("assignment", id))?;
        Ok(row_to_assignment(&row)?)
    }

    /// Mark an assignment completed. Completing it again changes nothing.
    pub async fn complete_assignment(&self, id: &str) -> Result<WorkflowAssignment, ServiceError> {
        let mut assignment = self.get_assignment(id).await?;
        if !assignment.status.can_transition_to(AssignmentStatus::Completed) {
            debug!(assignment = %id, status = %assignment.status, "assignment already completed");
            return Ok(assignment);
        }
        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE workflow_assignments SET status = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![AssignmentStatus::Completed.as_str(), now.to_rfc3339(), id],
            )
            .await?;
        assignment.status = AssignmentStatus::Completed;
        assignment.updated_at = now;
        Ok(assignment)
    }

    /// Assignments given to `user_id`, soonest due first.
    pub async fn my_assignments(
        &self,
        user_id: &str,
        status: Option<AssignmentStatus>,
    ) -> Result<Vec<WorkflowAssignment>, DatabaseError> {
        let mut sql = format!("SELECT {ASSIGNMENT_COLS} FROM workflow_assignments WHERE assigned_to = ?1");
        let mut params: Vec<libsql::Value> = vec![user_id.into()];
        if let Some(status) = status {
            params.push(status.as_str().into());
            sql.push_str(" AND status = ?2");
        }
        sql.push_str(" ORDER BY due_date IS NULL, due_date, created_at");

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next().await? {
            assignments.push(row_to_assignment(&row)?);
        }
        Ok(assignments)
    }

    // -----------------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------------

    /// Live entry counts per status for one content type.
    pub async fn workflow_statistics(
        &self,
        content_type_id: &str,
    ) -> Result<WorkflowStatistics, ServiceError> {
        self.get_content_type(content_type_id).await?;
        Ok(WorkflowStatistics {
            draft: self.count_by_status(content_type_id, WorkflowStatus::Draft).await?,
            in_review: self.count_by_status(content_type_id, WorkflowStatus::InReview).await?,
            ready_for_approval: self
                .count_by_status(content_type_id, WorkflowStatus::ReadyForApproval)
                .await?,
            approved: self.count_by_status(content_type_id, WorkflowStatus::Approved).await?,
            published: self.count_by_status(content_type_id, WorkflowStatus::Published).await?,
            rejected: self.count_by_status(content_type_id, WorkflowStatus::Rejected).await?,
            total: self.count_live_entries(content_type_id).await?,
        })
    }

    async fn count_by_status(
        &self,
        content_type_id: &str,
        status: WorkflowStatus,
    ) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(*) FROM content_entries
                 WHERE content_type_id = ?1 AND status = ?2 AND deleted_at IS NULL",
                libsql::params![content_type_id, status.as_str()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        u64::try_from(row.get::<i64>(0)?).map_err(|e| DatabaseError::InvalidState(e.to_string()))
    }
}
