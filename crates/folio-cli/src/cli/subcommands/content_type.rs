use clap::{Args, Subcommand};

/// Content type commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TypeCommands {
    /// Create a content type.
    Create {
        name: String,
        slug: String,
        #[arg(long)]
        seo: bool,
    },
    /// List content types.
    List,
    /// Get a content type with its fields, by slug or ID.
    Get { content_type: String },
    /// Update a content type.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        seo: Option<bool>,
    },
    /// Delete a content type that has no entries.
    Delete { id: String },
    /// Add a field to a content type.
    AddField {
        content_type: String,
        #[command(flatten)]
        field: FieldArgs,
    },
    /// Replace a field's definition.
    UpdateField {
        id: String,
        #[command(flatten)]
        field: FieldArgs,
    },
    /// Delete a field.
    DeleteField { id: String },
    /// Show per-field validation rules.
    Rules { content_type: String },
}

/// A field definition as given on the command line.
#[derive(Clone, Debug, Args)]
pub struct FieldArgs {
    pub name: String,
    /// string, text, email, url, number, boolean, date, media
    #[arg(long = "type")]
    pub field_type: String,
    #[arg(long)]
    pub required: bool,
    #[arg(long)]
    pub unique: bool,
    #[arg(long)]
    pub seo: bool,
    #[arg(long)]
    pub min_length: Option<u32>,
    #[arg(long)]
    pub max_length: Option<u32>,
    #[arg(long)]
    pub pattern: Option<String>,
    #[arg(long)]
    pub min_value: Option<f64>,
    #[arg(long)]
    pub max_value: Option<f64>,
    #[arg(long)]
    pub default: Option<String>,
    #[arg(long)]
    pub placeholder: Option<String>,
    #[arg(long)]
    pub help_text: Option<String>,
}
