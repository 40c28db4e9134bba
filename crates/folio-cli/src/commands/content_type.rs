use folio_core::entities::NewField;
use folio_core::enums::FieldType;
use folio_db::updates::content_type::ContentTypeUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{FieldArgs, TypeCommands};
use crate::commands::shared::lookup;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `folio type`.
pub async fn handle(action: &TypeCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        TypeCommands::Create { name, slug, seo } => {
            output(&svc.create_content_type(name, slug, *seo).await?, flags.format)
        }
        TypeCommands::List => output(&svc.list_content_types().await?, flags.format),
        TypeCommands::Get { content_type } => {
            let ct = lookup::content_type(svc, content_type).await?;
            output(&svc.load_schema(&ct.id).await?, flags.format)
        }
        TypeCommands::Update { id, name, slug, seo } => {
            let mut builder = ContentTypeUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(slug) = slug {
                builder = builder.slug(slug);
            }
            if let Some(seo) = seo {
                builder = builder.enable_seo(*seo);
            }
            output(&svc.update_content_type(id, builder.build()).await?, flags.format)
        }
        TypeCommands::Delete { id } => {
            svc.delete_content_type(id).await?;
            output(&serde_json::json!({ "deleted": id }), flags.format)
        }
        TypeCommands::AddField {
            content_type,
            field,
        } => {
            let ct = lookup::content_type(svc, content_type).await?;
            let new_field = to_new_field(field)?;
            output(&svc.add_field(&ct.id, &new_field).await?, flags.format)
        }
        TypeCommands::UpdateField { id, field } => {
            let new_field = to_new_field(field)?;
            output(&svc.update_field(id, &new_field).await?, flags.format)
        }
        TypeCommands::DeleteField { id } => {
            svc.delete_field(id).await?;
            output(&serde_json::json!({ "deleted": id }), flags.format)
        }
        TypeCommands::Rules { content_type } => {
            let ct = lookup::content_type(svc, content_type).await?;
            output(&svc.load_schema(&ct.id).await?.validation_rules(), flags.format)
        }
    }
}

fn to_new_field(args: &FieldArgs) -> anyhow::Result<NewField> {
    let field_type: FieldType = parse_enum(&args.field_type, "field type")?;
    Ok(NewField {
        required: args.required,
        unique: args.unique,
        is_seo: args.seo,
        min_length: args.min_length,
        max_length: args.max_length,
        pattern: args.pattern.clone(),
        min_value: args.min_value,
        max_value: args.max_value,
        default_value: args.default.clone(),
        placeholder: args.placeholder.clone(),
        help_text: args.help_text.clone(),
        ..NewField::new(&args.name, field_type)
    })
}
