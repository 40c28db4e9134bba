//! Entity structs for all Folio domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `folio-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON roundtrip and schema validation.

mod content_type;
mod entry;
mod media;
mod role;
mod user;
mod workflow;

pub use content_type::{ContentType, FieldDefinition, NewField};
pub use entry::ContentEntry;
pub use media::MediaFile;
pub use role::{Permission, Role};
pub use user::User;
pub use workflow::{WorkflowAssignment, WorkflowComment, WorkflowHistory, WorkflowTransition};
