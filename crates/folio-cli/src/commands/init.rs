use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    database: String,
    roles: Vec<String>,
    transitions: usize,
}

/// Handle `folio init`. Seeding is idempotent, so this is safe to re-run.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.service.bootstrap().await?;
    let roles = ctx
        .service
        .list_roles()
        .await?
        .into_iter()
        .map(|r| r.name)
        .collect();
    let transitions = ctx.service.list_transitions().await?.len();
    output(
        &InitResponse {
            database: ctx.config.database.path.clone(),
            roles,
            transitions,
        },
        flags.format,
    )
}
