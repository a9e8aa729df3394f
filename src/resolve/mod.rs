//! # Resolution Engine
//!
//! Pure functions that turn one configured entity plus the API description
//! into what the templates need:
//!
//! - [`operations`]: effective path and method per CRUD operation, through
//!   the entity override → provider default → structural fallback cascade
//! - [`types`]: JSON-schema `type` lists to plugin attribute kinds
//! - [`properties`]: the merged, ordered attribute set of an entity, each
//!   attribute tagged with the bodies it appeared in
//!
//! Nothing here performs I/O; bodies are read through
//! [`SchemaSource`](crate::openapi::SchemaSource).

pub mod operations;
pub mod properties;
pub mod types;

pub use operations::{
    resolve_id_attribute, resolve_method, resolve_operation, resolve_path, OperationKind,
    ResolvedOperation,
};
pub use properties::{
    fetch_bodies, merge_bodies, resolve_properties, BodyRole, Membership, OperationBodies,
    PropertyDescriptor, PropertySet,
};
pub use types::{classify, AttributeKind, TypeClassification};
