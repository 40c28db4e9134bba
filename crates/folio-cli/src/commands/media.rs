use crate::cli::GlobalFlags;
use crate::cli::subcommands::MediaCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `folio media`.
pub async fn handle(action: &MediaCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        MediaCommands::Register {
            file_name,
            url,
            mime_type,
            size,
            as_user,
        } => {
            let media = svc
                .register_media(file_name, url, mime_type, *size, as_user)
                .await?;
            output(&media, flags.format)
        }
        MediaCommands::Get { id } => output(&svc.get_media(id).await?, flags.format),
        MediaCommands::List { limit } => output(&svc.list_media(*limit).await?, flags.format),
    }
}
