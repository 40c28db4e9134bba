use clap::Subcommand;

use crate::cli::subcommands::{
    EntryCommands, MediaCommands, RoleCommands, TypeCommands, UserCommands, WorkflowCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the database and install default roles and transitions.
    Init,
    /// Users and their roles.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Roles and permissions.
    Role {
        #[command(subcommand)]
        action: RoleCommands,
    },
    /// Content types and their fields.
    Type {
        #[command(subcommand)]
        action: TypeCommands,
    },
    /// Content entries.
    Entry {
        #[command(subcommand)]
        action: EntryCommands,
    },
    /// Media file registry.
    Media {
        #[command(subcommand)]
        action: MediaCommands,
    },
    /// Editorial workflow.
    Workflow {
        #[command(subcommand)]
        action: WorkflowCommands,
    },
}
