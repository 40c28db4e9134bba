//! Repository modules implementing storage operations for all Folio entities.
//!
//! Each module adds methods to `FolioService` via `impl FolioService` blocks.

pub mod content_type;
pub mod entry;
pub mod media;
pub mod role;
pub mod user;
pub mod workflow;
