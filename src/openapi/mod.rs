//! # API Description
//!
//! Loading of the OpenAPI document and the [`SchemaSource`] seam the
//! resolution engine reads request/response bodies through.
//!
//! Lookups work on the document's JSON tree (with `serde_json`'s
//! `preserve_order`), so property order matches the order in the file.
//! Local `$ref` pointers are followed for path items, bodies, responses and
//! property schemas.

mod load;
mod source;

pub use load::{ApiDescription, DocumentFormat};
pub use source::{schema_types, BodySchema, PropertySchema, SchemaSource, JSON_CONTENT_TYPE};
