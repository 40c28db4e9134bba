use clap::Subcommand;

/// Role commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RoleCommands {
    /// List roles with their permissions.
    List,
    /// Get a role by name or ID.
    Get { role: String },
    /// Create a role.
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// JSON array of permissions, or `@path` to a file containing one.
        #[arg(long)]
        permissions: Option<String>,
    },
    /// Append permissions to a role.
    Grant {
        /// Role name or ID.
        role: String,
        /// JSON array of permissions, or `@path` to a file containing one.
        #[arg(long)]
        permissions: String,
    },
}
