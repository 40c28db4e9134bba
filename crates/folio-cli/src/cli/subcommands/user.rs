use clap::Subcommand;

/// User commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Create a user.
    Create {
        name: String,
        email: String,
        /// Role name or ID.
        #[arg(long)]
        role: Option<String>,
    },
    /// List users.
    List,
    /// Get a user by ID.
    Get { id: String },
    /// Give a user another role, or none.
    AssignRole {
        id: String,
        /// Role name or ID. Omit to clear.
        #[arg(long)]
        role: Option<String>,
    },
}
