use serde::Serialize;
use std::fmt;

use crate::config::{EntityDescriptor, ProviderDefaults};

/// The four CRUD operations an entity maps onto HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Create,
    Read,
    Update,
    Delete,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Create,
        OperationKind::Read,
        OperationKind::Update,
        OperationKind::Delete,
    ];

    /// Key of this operation in the provider configuration.
    pub fn config_key(&self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Read => "read",
            OperationKind::Update => "update",
            OperationKind::Delete => "destroy",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationKind::Create => "create",
            OperationKind::Read => "read",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        })
    }
}

/// Effective path and method of one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedOperation {
    pub path: String,
    /// Empty when neither the entity nor the provider configures one
    pub method: String,
}

/// Entity override, else the provider default, else empty.
pub fn resolve_method(
    entity: &EntityDescriptor,
    defaults: &ProviderDefaults,
    operation: OperationKind,
) -> String {
    entity
        .operation_override(operation)
        .and_then(|o| o.method())
        .or_else(|| defaults.method_for(operation))
        .unwrap_or_default()
        .to_string()
}

/// Entity id attribute, else the provider default, else empty.
pub fn resolve_id_attribute(entity: &EntityDescriptor, defaults: &ProviderDefaults) -> String {
    entity
        .id_attribute()
        .or_else(|| defaults.id_attribute())
        .unwrap_or_default()
        .to_string()
}

/// Entity override, else the base path for Create, else `{base}/{<id attribute>}`.
pub fn resolve_path(
    entity: &EntityDescriptor,
    defaults: &ProviderDefaults,
    operation: OperationKind,
) -> String {
    if let Some(path) = entity
        .operation_override(operation)
        .and_then(|o| o.path())
    {
        return path.to_string();
    }
    match operation {
        OperationKind::Create => entity.path.clone(),
        OperationKind::Read | OperationKind::Update | OperationKind::Delete => format!(
            "{}/{{{}}}",
            entity.path,
            resolve_id_attribute(entity, defaults)
        ),
    }
}

pub fn resolve_operation(
    entity: &EntityDescriptor,
    defaults: &ProviderDefaults,
    operation: OperationKind,
) -> ResolvedOperation {
    ResolvedOperation {
        path: resolve_path(entity, defaults, operation),
        method: resolve_method(entity, defaults, operation),
    }
}
