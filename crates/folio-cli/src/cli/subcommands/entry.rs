use clap::Subcommand;

/// Content entry commands. `--as` names the acting user.
#[derive(Clone, Debug, Subcommand)]
pub enum EntryCommands {
    /// Create an entry.
    Create {
        content_type: String,
        #[arg(long = "as")]
        as_user: String,
        /// JSON object of field values, or `@path`.
        #[arg(long)]
        data: Option<String>,
    },
    /// Merge field values into an entry. `null` or `""` clears a field.
    Update {
        id: String,
        #[arg(long = "as")]
        as_user: String,
        /// JSON object of field values, or `@path`.
        #[arg(long)]
        data: String,
    },
    /// Get an entry with all of its data.
    Get { id: String },
    /// Get an entry as a user sees it.
    Read {
        id: String,
        #[arg(long = "as")]
        as_user: String,
    },
    /// List entries of a content type.
    List {
        content_type: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        created_by: Option<String>,
        /// RFC 3339 timestamp or YYYY-MM-DD.
        #[arg(long)]
        from: Option<String>,
        /// RFC 3339 timestamp or YYYY-MM-DD.
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Soft-delete an entry.
    Delete {
        id: String,
        #[arg(long = "as")]
        as_user: String,
    },
    /// Show an entry's SEO fields.
    Seo { id: String },
}
