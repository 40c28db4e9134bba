pub mod content_type;
pub mod dispatch;
pub mod entry;
pub mod init;
pub mod media;
pub mod role;
pub mod shared;
pub mod user;
pub mod workflow;
