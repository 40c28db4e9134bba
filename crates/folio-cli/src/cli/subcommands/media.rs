use clap::Subcommand;

/// Media registry commands.
#[derive(Clone, Debug, Subcommand)]
pub enum MediaCommands {
    /// Record an uploaded file.
    Register {
        file_name: String,
        url: String,
        #[arg(long, default_value = "application/octet-stream")]
        mime_type: String,
        #[arg(long, default_value_t = 0)]
        size: i64,
        #[arg(long = "as")]
        as_user: String,
    },
    /// Get a media file by ID.
    Get { id: String },
    /// List recent media files.
    List {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}
