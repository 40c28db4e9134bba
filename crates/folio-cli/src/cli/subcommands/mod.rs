mod content_type;
mod entry;
mod media;
mod role;
mod user;
mod workflow;

pub use content_type::{FieldArgs, TypeCommands};
pub use entry::EntryCommands;
pub use media::MediaCommands;
pub use role::RoleCommands;
pub use user::UserCommands;
pub use workflow::WorkflowCommands;
