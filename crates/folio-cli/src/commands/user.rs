use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::commands::shared::lookup;
use crate::context::AppContext;
use crate::output::output;

/// Handle `folio user`.
pub async fn handle(action: &UserCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        UserCommands::Create { name, email, role } => {
            let role_id = match role {
                Some(raw) => Some(lookup::role(svc, raw).await?.id),
                None => None,
            };
            let user = svc.create_user(name, email, role_id.as_deref()).await?;
            output(&user, flags.format)
        }
        UserCommands::List => output(&svc.list_users().await?, flags.format),
        UserCommands::Get { id } => output(&svc.get_user(id).await?, flags.format),
        UserCommands::AssignRole { id, role } => {
            let role_id = match role {
                Some(raw) => Some(lookup::role(svc, raw).await?.id),
                None => None,
            };
            let user = svc.assign_role(id, role_id.as_deref()).await?;
            output(&user, flags.format)
        }
    }
}
