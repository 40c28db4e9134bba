//! ID prefix constants.
//!
//! Every stored row gets an ID of the form `{prefix}-{8 hex chars}`, e.g.
//! `ent-a3f8b2c1`. The random part is generated by the database.

pub const PREFIX_CONTENT_TYPE: &str = "cty";
pub const PREFIX_FIELD: &str = "fld";
pub const PREFIX_ENTRY: &str = "ent";
pub const PREFIX_ROLE: &str = "rol";
pub const PREFIX_PERMISSION: &str = "prm";
pub const PREFIX_USER: &str = "usr";
pub const PREFIX_MEDIA: &str = "med";
pub const PREFIX_TRANSITION: &str = "wft";
pub const PREFIX_HISTORY: &str = "wfh";
pub const PREFIX_COMMENT: &str = "wfc";
pub const PREFIX_ASSIGNMENT: &str = "wfa";

/// All prefixes, for exhaustive ID tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_CONTENT_TYPE,
    PREFIX_FIELD,
    PREFIX_ENTRY,
    PREFIX_ROLE,
    PREFIX_PERMISSION,
    PREFIX_USER,
    PREFIX_MEDIA,
    PREFIX_TRANSITION,
    PREFIX_HISTORY,
    PREFIX_COMMENT,
    PREFIX_ASSIGNMENT,
];
