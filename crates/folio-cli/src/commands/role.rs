use folio_core::entities::Permission;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RoleCommands;
use crate::commands::shared::lookup;
use crate::commands::shared::parse::parse_json_arg;
use crate::context::AppContext;
use crate::output::output;

/// Handle `folio role`.
pub async fn handle(action: &RoleCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        RoleCommands::List => output(&svc.list_roles().await?, flags.format),
        RoleCommands::Get { role } => output(&lookup::role(svc, role).await?, flags.format),
        RoleCommands::Create {
            name,
            description,
            permissions,
        } => {
            let permissions: Vec<Permission> = match permissions {
                Some(raw) => parse_json_arg(raw, "permissions")?,
                None => Vec::new(),
            };
            let role = svc.create_role(name, description, &permissions).await?;
            output(&role, flags.format)
        }
        RoleCommands::Grant { role, permissions } => {
            let permissions: Vec<Permission> = parse_json_arg(permissions, "permissions")?;
            let role = lookup::role(svc, role).await?;
            output(&svc.add_permissions(&role.id, &permissions).await?, flags.format)
        }
    }
}
