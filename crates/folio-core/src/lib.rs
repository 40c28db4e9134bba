//! # folio-core
//!
//! Core types and rules for Folio, a headless content backend.
//!
//! This crate provides everything that does not touch storage:
//! - Entity structs for content types, entries, roles, users and workflow rows
//! - Closed enums for field types, workflow statuses, modules and actions
//! - ID prefix constants
//! - The runtime schema view (`schema`) over a content type and its fields
//! - The dynamic field validator (`validation`)
//! - The field-level permission resolver (`permission`)
//! - The role-gated workflow transition table (`workflow`)
//! - Default role seeds and response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod permission;
pub mod responses;
pub mod schema;
pub mod seed;
pub mod validation;
pub mod workflow;

/// Open value map carried by a content entry.
///
/// Keys are field names of the owning content type; values are arbitrary JSON.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;
