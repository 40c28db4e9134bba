use folio_core::enums::{AssignmentStatus, WorkflowStatus};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::WorkflowCommands;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::{parse_enum, parse_timestamp};
use crate::context::AppContext;
use crate::output::output;

/// Handle `folio workflow`.
pub async fn handle(
    action: &WorkflowCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        WorkflowCommands::Transition {
            entry,
            to,
            as_user,
            comment,
        } => {
            let to: WorkflowStatus = parse_enum(to, "status")?;
            let entry = svc
                .change_status(entry, as_user, to, comment.as_deref())
                .await?;
            output(&entry, flags.format)
        }
        WorkflowCommands::Review {
            entry,
            as_user,
            comment,
        } => output(
            &svc.request_review(entry, as_user, comment.as_deref()).await?,
            flags.format,
        ),
        WorkflowCommands::Approve {
            entry,
            as_user,
            comment,
        } => output(
            &svc.approve_entry(entry, as_user, comment.as_deref()).await?,
            flags.format,
        ),
        WorkflowCommands::Reject {
            entry,
            as_user,
            comment,
        } => output(
            &svc.reject_entry(entry, as_user, comment.as_deref()).await?,
            flags.format,
        ),
        WorkflowCommands::Publish {
            entry,
            as_user,
            comment,
        } => output(
            &svc.publish_entry(entry, as_user, comment.as_deref()).await?,
            flags.format,
        ),
        WorkflowCommands::Next { entry, as_user } => {
            output(&svc.available_transitions(entry, as_user).await?, flags.format)
        }
        WorkflowCommands::History { entry } => output(&svc.history(entry).await?, flags.format),
        WorkflowCommands::Comment {
            entry,
            text,
            as_user,
            private,
        } => output(
            &svc.add_comment(entry, as_user, text, *private).await?,
            flags.format,
        ),
        WorkflowCommands::Comments {
            entry,
            include_private,
        } => output(&svc.list_comments(entry, *include_private).await?, flags.format),
        WorkflowCommands::Assign {
            entry,
            to,
            as_user,
            due,
        } => {
            let due = due.as_deref().map(|d| parse_timestamp(d, "due")).transpose()?;
            output(&svc.assign_entry(entry, to, as_user, due).await?, flags.format)
        }
        WorkflowCommands::Assignments { as_user, status } => {
            let status = status
                .as_deref()
                .map(|s| parse_enum::<AssignmentStatus>(s, "status"))
                .transpose()?;
            output(&svc.my_assignments(as_user, status).await?, flags.format)
        }
        WorkflowCommands::Complete { id } => {
            output(&svc.complete_assignment(id).await?, flags.format)
        }
        WorkflowCommands::ByStatus {
            status,
            content_type,
        } => {
            let status: WorkflowStatus = parse_enum(status, "status")?;
            let ct_id = match content_type {
                Some(raw) => Some(lookup::content_type(svc, raw).await?.id),
                None => None,
            };
            output(&svc.entries_by_status(status, ct_id.as_deref()).await?, flags.format)
        }
        WorkflowCommands::Stats { content_type } => {
            let ct = lookup::content_type(svc, content_type).await?;
            output(&svc.workflow_statistics(&ct.id).await?, flags.format)
        }
        WorkflowCommands::Transitions => output(&svc.list_transitions().await?, flags.format),
        WorkflowCommands::AddTransition { from, to, role } => {
            let from: WorkflowStatus = parse_enum(from, "from status")?;
            let to: WorkflowStatus = parse_enum(to, "to status")?;
            output(&svc.add_transition(from, to, role).await?, flags.format)
        }
    }
}
