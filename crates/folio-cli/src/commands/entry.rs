use folio_core::FieldMap;
use folio_core::enums::WorkflowStatus;
use folio_db::repos::entry::EntryFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EntryCommands;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::{parse_enum, parse_field_map, parse_timestamp};
use crate::context::AppContext;
use crate::output::output;

/// Handle `folio entry`.
pub async fn handle(action: &EntryCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        EntryCommands::Create {
            content_type,
            as_user,
            data,
        } => {
            let ct = lookup::content_type(svc, content_type).await?;
            let data = match data {
                Some(raw) => parse_field_map(raw)?,
                None => FieldMap::new(),
            };
            output(&svc.create_entry(&ct.id, as_user, data).await?, flags.format)
        }
        EntryCommands::Update { id, as_user, data } => {
            let partial = parse_field_map(data)?;
            output(&svc.update_entry(id, as_user, partial).await?, flags.format)
        }
        EntryCommands::Get { id } => output(&svc.get_entry(id).await?, flags.format),
        EntryCommands::Read { id, as_user } => {
            output(&svc.read_entry(id, as_user).await?, flags.format)
        }
        EntryCommands::List {
            content_type,
            status,
            created_by,
            from,
            to,
            page,
            limit,
        } => {
            let ct = lookup::content_type(svc, content_type).await?;
            let filter = EntryFilter {
                status: status
                    .as_deref()
                    .map(|s| parse_enum::<WorkflowStatus>(s, "status"))
                    .transpose()?,
                created_by: created_by.clone(),
                created_from: from.as_deref().map(|s| parse_timestamp(s, "from")).transpose()?,
                created_to: to.as_deref().map(|s| parse_timestamp(s, "to")).transpose()?,
                page: *page,
                limit: *limit,
            };
            output(&svc.list_entries(&ct.id, &filter).await?, flags.format)
        }
        EntryCommands::Delete { id, as_user } => {
            svc.delete_entry(id, as_user).await?;
            output(&serde_json::json!({ "deleted": id }), flags.format)
        }
        EntryCommands::Seo { id } => output(&svc.seo_preview(id).await?, flags.format),
    }
}
