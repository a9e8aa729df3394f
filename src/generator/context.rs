//! Serializable view models handed to templates.
//!
//! Every template sees a single root variable, `ctx`, holding one of the
//! [`RenderContext`] variants. All values are precomputed (Go identifiers,
//! quoted literals, boolean flags) so templates need no filters and stay
//! within the syntax shared by askama and minijinja.

use serde::Serialize;

use crate::config::{EntityDescriptor, ProviderDefaults, ProviderSettings};
use crate::naming::{sanitize_identifier, to_kebab_case, to_lower_camel_case, to_pascal_case, to_snake_case};
use crate::resolve::{
    resolve_id_attribute, resolve_operation, AttributeKind, BodyRole, OperationKind, PropertyDescriptor,
    ResolvedOperation,
};

use super::plan::EntityKind;

/// Provider identity in the forms the generated tree needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderView {
    pub name: String,
    pub name_snake: String,
    pub name_kebab: String,
    pub name_pascal: String,
    /// Upper snake case, used for environment variable names
    pub name_upper: String,
    pub author: String,
    /// `github.com/<author>/terraform-provider-<kebab name>`
    pub module_path: String,
    /// `registry.terraform.io/<author>/<kebab name>`
    pub registry_address: String,
}

impl ProviderView {
    /// Configured name and author, falling back to the API title slug and `example`.
    pub fn new(settings: &ProviderSettings, api_slug: &str) -> Self {
        let name = settings
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| Some(api_slug.to_string()).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "provider".to_string());
        let author = settings
            .author
            .clone()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| "example".to_string());
        let name_kebab = to_kebab_case(&name);
        Self {
            name_snake: to_snake_case(&name),
            name_pascal: to_pascal_case(&name),
            name_upper: to_snake_case(&name).to_ascii_uppercase(),
            module_path: format!("github.com/{author}/terraform-provider-{name_kebab}"),
            registry_address: format!("registry.terraform.io/{author}/{name_kebab}"),
            name_kebab,
            author,
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    /// Go string literal of the header name
    pub name_literal: String,
    /// Go string literal of the header value
    pub value_literal: String,
}

/// HTTP client settings rendered into the shared helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientView {
    pub base_uri_literal: String,
    pub headers: Vec<HeaderView>,
    /// Request timeout in milliseconds, 0 for none
    pub timeout_ms: u64,
    pub insecure: bool,
    pub debug: bool,
    pub username_literal: String,
    pub password_literal: String,
    pub use_cookies: bool,
    pub xssi_prefix_literal: String,
    /// Go string literals of the keys copied into update bodies
    pub copy_keys: Vec<String>,
    pub test_path_literal: String,
    /// Uppercase method used for the test path, the global read method or `GET`
    pub test_method: String,
}

impl ClientView {
    pub fn new(defaults: &ProviderDefaults) -> Self {
        let text = |value: &Option<String>| go_quote(value.as_deref().unwrap_or_default());
        Self {
            base_uri_literal: go_quote(&defaults.uri),
            headers: defaults
                .headers
                .iter()
                .map(|(name, value)| HeaderView {
                    name_literal: go_quote(name),
                    value_literal: go_quote(value),
                })
                .collect(),
            timeout_ms: timeout_millis(defaults.timeout),
            insecure: defaults.insecure,
            debug: defaults.debug,
            username_literal: text(&defaults.username),
            password_literal: text(&defaults.password),
            use_cookies: defaults.use_cookies,
            xssi_prefix_literal: text(&defaults.xssi_prefix),
            copy_keys: defaults.copy_keys.iter().map(|k| go_quote(k)).collect(),
            test_path_literal: text(&defaults.test_path),
            test_method: defaults
                .method_for(OperationKind::Read)
                .unwrap_or("GET")
                .to_ascii_uppercase(),
        }
    }
}

fn timeout_millis(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

/// Context of the build file, entry point, manifest and shared helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectContext {
    pub provider: ProviderView,
    pub client: ClientView,
}

/// Name forms of a registered entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    pub name_snake: String,
    pub name_pascal: String,
}

impl EntityRef {
    pub fn new(entity: &EntityDescriptor) -> Self {
        Self {
            name_snake: to_snake_case(&entity.name),
            name_pascal: to_pascal_case(&entity.name),
        }
    }
}

/// Context of the provider aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryContext {
    pub provider: ProviderView,
    pub resources: Vec<EntityRef>,
    pub data_sources: Vec<EntityRef>,
}

/// Context of the verbatim API description copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentContext {
    pub document: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityView {
    pub name: String,
    pub name_snake: String,
    pub name_pascal: String,
    /// Go identifier prefix for unexported types, e.g. `storeOrder`
    pub name_camel: String,
    pub description_literal: String,
    pub id_attribute: String,
    pub force_recreate: bool,
    /// Whether an attribute named like the id attribute exists
    pub has_id_property: bool,
    /// No attributes could be resolved
    pub degraded: bool,
    /// Go string literal of the query string appended to every request
    pub query_literal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationView {
    pub path: String,
    pub method: String,
}

impl From<ResolvedOperation> for OperationView {
    fn from(op: ResolvedOperation) -> Self {
        Self {
            path: op.path,
            method: op.method.to_ascii_uppercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationsView {
    pub create: OperationView,
    pub read: OperationView,
    pub update: OperationView,
    pub delete: OperationView,
}

/// One attribute as the Go templates consume it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyView {
    /// JSON property name
    pub name: String,
    /// Terraform attribute name (snake case)
    pub attribute_name: String,
    /// Go struct field name
    pub field_name: String,
    /// `Bool`, `Int64`, `Float64`, `String` or `Dynamic`
    pub kind: String,
    /// Lowercase prefix of the shared conversion helpers, e.g. `int64`
    pub helper: String,
    /// Schema attribute type, e.g. `StringAttribute`
    pub attr_type: String,
    /// Model field type, e.g. `types.String`
    pub value_type: String,
    pub description_literal: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub requires_replace: bool,
    pub nullable: bool,
    pub is_id: bool,
    /// Read copies the remote value into state
    pub track_server_changes: bool,
    pub in_create_request: bool,
    pub in_create_response: bool,
    pub in_update_request: bool,
    pub in_update_response: bool,
}

impl PropertyView {
    pub fn new(
        property: &PropertyDescriptor,
        entity: &EntityDescriptor,
        id_attribute: &str,
        kind: EntityKind,
    ) -> Self {
        let membership = property.membership;
        let in_create_request = membership.contains(BodyRole::CreateRequest);
        let in_create_response = membership.contains(BodyRole::CreateResponse);
        let is_id = property.name == id_attribute;

        let (required, optional, computed) = match kind {
            EntityKind::Resource => {
                let required = in_create_request && property.required && !property.nullable;
                let optional = in_create_request && !required;
                let computed = !in_create_request || (in_create_response && !required);
                (required, optional, computed)
            }
            EntityKind::DataSource => (is_id, false, !is_id),
        };
        let requires_replace = kind == EntityKind::Resource
            && (entity.force_recreate || entity.force_new.iter().any(|n| n == &property.name));

        let (helper, attr_type, value_type) = match property.kind {
            AttributeKind::Bool => ("bool", "BoolAttribute", "types.Bool"),
            AttributeKind::Int64 => ("int64", "Int64Attribute", "types.Int64"),
            AttributeKind::Float64 => ("float64", "Float64Attribute", "types.Float64"),
            AttributeKind::String => ("string", "StringAttribute", "types.String"),
            AttributeKind::Dynamic => ("dynamic", "DynamicAttribute", "types.Dynamic"),
        };
        let description = property.description.clone().unwrap_or_default();

        Self {
            name: property.name.clone(),
            attribute_name: sanitize_identifier(&to_snake_case(&property.name)),
            field_name: sanitize_identifier(&to_pascal_case(&property.name)),
            kind: property.kind.as_str().to_string(),
            helper: helper.to_string(),
            attr_type: attr_type.to_string(),
            value_type: value_type.to_string(),
            description_literal: go_quote(&description),
            required,
            optional,
            computed,
            requires_replace,
            nullable: property.nullable,
            is_id,
            track_server_changes: !entity.ignores_server_changes(&property.name),
            in_create_request,
            in_create_response,
            in_update_request: membership.contains(BodyRole::UpdateRequest),
            in_update_response: membership.contains(BodyRole::UpdateResponse),
        }
    }
}

/// Context of a resource or data-source artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityContext {
    pub provider: ProviderView,
    pub entity: EntityView,
    pub operations: OperationsView,
    pub properties: Vec<PropertyView>,
}

impl EntityContext {
    pub fn new<'a>(
        provider: &ProviderView,
        entity: &EntityDescriptor,
        defaults: &ProviderDefaults,
        kind: EntityKind,
        properties: impl IntoIterator<Item = &'a PropertyDescriptor>,
    ) -> Self {
        let id_attribute = resolve_id_attribute(entity, defaults);
        let properties: Vec<PropertyView> = properties
            .into_iter()
            .map(|p| PropertyView::new(p, entity, &id_attribute, kind))
            .collect();
        let operation = |op: OperationKind| OperationView::from(resolve_operation(entity, defaults, op));

        Self {
            provider: provider.clone(),
            entity: EntityView {
                name: entity.name.clone(),
                name_snake: to_snake_case(&entity.name),
                name_pascal: to_pascal_case(&entity.name),
                name_camel: to_lower_camel_case(&entity.name),
                description_literal: go_quote(
                    entity
                        .description
                        .as_deref()
                        .unwrap_or(&format!("Manages a {} object.", entity.name)),
                ),
                has_id_property: properties.iter().any(|p| p.is_id),
                degraded: properties.is_empty(),
                force_recreate: entity.force_recreate,
                query_literal: go_quote(entity.query_string().unwrap_or_default()),
                id_attribute,
            },
            operations: OperationsView {
                create: operation(OperationKind::Create),
                read: operation(OperationKind::Read),
                update: operation(OperationKind::Update),
                delete: operation(OperationKind::Delete),
            },
            properties,
        }
    }
}

/// Context passed to a template, one variant per artifact family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RenderContext {
    Project(ProjectContext),
    Registry(RegistryContext),
    Document(DocumentContext),
    Entity(EntityContext),
}

impl RenderContext {
    /// Variant name, used in mismatch errors.
    pub fn variant(&self) -> &'static str {
        match self {
            RenderContext::Project(_) => "project",
            RenderContext::Registry(_) => "registry",
            RenderContext::Document(_) => "document",
            RenderContext::Entity(_) => "entity",
        }
    }
}

/// Quote a string as a Go interpreted string literal.
pub fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
