use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Init => commands::init::handle(ctx, flags).await,
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
        Commands::Role { action } => commands::role::handle(&action, ctx, flags).await,
        Commands::Type { action } => commands::content_type::handle(&action, ctx, flags).await,
        Commands::Entry { action } => commands::entry::handle(&action, ctx, flags).await,
        Commands::Media { action } => commands::media::handle(&action, ctx, flags).await,
        Commands::Workflow { action } => commands::workflow::handle(&action, ctx, flags).await,
    }
}
