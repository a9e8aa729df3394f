use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::resolve::OperationKind;

/// Search settings of a read override. Accepted, not used by generated code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSettings {
    pub search_key: String,
    pub search_value: String,
    #[serde(default)]
    pub search_path: Option<String>,
    #[serde(default)]
    pub results_key: Option<String>,
    #[serde(default)]
    pub query_string: Option<String>,
}

/// Path/method override for a single operation of an entity.
///
/// An empty string counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationOverride {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    /// Only valid under `read`
    #[serde(default)]
    pub search: Option<SearchSettings>,
}

impl OperationOverride {
    pub fn path(&self) -> Option<&str> {
        non_empty(self.path.as_deref())
    }

    pub fn method(&self) -> Option<&str> {
        non_empty(self.method.as_deref())
    }
}

/// Provider-wide fallbacks (the `global` section).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderDefaults {
    /// Base URI of the remote API
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub create_method: Option<String>,
    #[serde(default)]
    pub read_method: Option<String>,
    #[serde(default)]
    pub update_method: Option<String>,
    #[serde(default, alias = "delete_method")]
    pub destroy_method: Option<String>,
    /// Default identifier attribute for the `{id}` path segment
    #[serde(default)]
    pub id_attribute: Option<String>,
    /// Headers sent with every request, sorted by name
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Request timeout in seconds for the generated client (0 = no timeout)
    #[serde(default)]
    pub timeout: f64,
    #[serde(default)]
    pub insecure: bool,
    #[serde(default)]
    pub debug: bool,
    /// Basic auth credentials; take precedence over an `Authorization` header
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Keep a cookie jar across requests
    #[serde(default)]
    pub use_cookies: bool,
    /// Prefix stripped from response bodies before decoding
    #[serde(default)]
    pub xssi_prefix: Option<String>,
    /// Keys copied from the known state into every update body
    #[serde(default)]
    pub copy_keys: Vec<String>,
    /// Path requested with the read method when the provider is configured
    #[serde(default)]
    pub test_path: Option<String>,
    #[serde(default)]
    pub rate_limit: Option<f64>,
    #[serde(default)]
    pub create_returns_object: Option<bool>,
    #[serde(default)]
    pub write_returns_object: Option<bool>,
    #[serde(default)]
    pub cert_file: Option<String>,
    #[serde(default)]
    pub cert_string: Option<String>,
    #[serde(default)]
    pub key_file: Option<String>,
    #[serde(default)]
    pub key_string: Option<String>,
    #[serde(default)]
    pub root_ca_file: Option<String>,
    #[serde(default)]
    pub root_ca_string: Option<String>,
    #[serde(default)]
    pub oauth_client_credentials: Vec<OAuthClientCredentials>,
}

/// One entry of `global.oauth_client_credentials`. Accepted, not used by generated code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OAuthClientCredentials {
    #[serde(default)]
    pub oauth_client_id: Option<String>,
    #[serde(default)]
    pub oauth_client_secret: Option<String>,
    #[serde(default)]
    pub oauth_token_endpoint: Option<String>,
    #[serde(default)]
    pub oauth_scopes: Vec<String>,
    #[serde(default)]
    pub endpoint_params: serde_json::Map<String, serde_json::Value>,
}

impl ProviderDefaults {
    /// Global default method for an operation kind, if configured.
    pub fn method_for(&self, operation: OperationKind) -> Option<&str> {
        let method = match operation {
            OperationKind::Create => &self.create_method,
            OperationKind::Read => &self.read_method,
            OperationKind::Update => &self.update_method,
            OperationKind::Delete => &self.destroy_method,
        };
        non_empty(method.as_deref())
    }

    pub fn id_attribute(&self) -> Option<&str> {
        non_empty(self.id_attribute.as_deref())
    }

    /// Settings that are accepted but have no effect on the generated code.
    pub fn ignored_settings(&self) -> Vec<&'static str> {
        let set = [
            ("rate_limit", self.rate_limit.is_some()),
            ("create_returns_object", self.create_returns_object.is_some()),
            ("write_returns_object", self.write_returns_object.is_some()),
            ("cert_file", self.cert_file.is_some()),
            ("cert_string", self.cert_string.is_some()),
            ("key_file", self.key_file.is_some()),
            ("key_string", self.key_string.is_some()),
            ("root_ca_file", self.root_ca_file.is_some()),
            ("root_ca_string", self.root_ca_string.is_some()),
            ("oauth_client_credentials", !self.oauth_client_credentials.is_empty()),
        ];
        set.into_iter().filter(|(_, on)| *on).map(|(name, _)| name).collect()
    }
}

/// One API entity exposed by the provider (an entry under `resources`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDescriptor {
    /// Configuration key; filled in by the loader
    #[serde(skip)]
    pub name: String,
    /// Base path, e.g. `/pet`
    pub path: String,
    #[serde(default)]
    pub create: Option<OperationOverride>,
    #[serde(default)]
    pub read: Option<OperationOverride>,
    #[serde(default)]
    pub update: Option<OperationOverride>,
    #[serde(default, alias = "delete")]
    pub destroy: Option<OperationOverride>,
    #[serde(default)]
    pub id_attribute: Option<String>,
    /// Every change replaces the object; no Update operation is used
    #[serde(default)]
    pub force_recreate: bool,
    #[serde(default)]
    pub generate_resource: Option<bool>,
    #[serde(default)]
    pub generate_data_source: Option<bool>,
    /// Properties whose change forces replacement
    #[serde(default)]
    pub force_new: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Query string appended to every request of this entity
    #[serde(default)]
    pub query_string: Option<String>,
    /// Attributes whose remote changes are not copied into state
    #[serde(default)]
    pub ignore_changes_to: Vec<String>,
    /// No remote change is copied into state
    #[serde(default)]
    pub ignore_all_server_changes: bool,
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub debug: Option<bool>,
}

impl EntityDescriptor {
    /// Convenience constructor used by tests and programmatic callers.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn operation_override(&self, operation: OperationKind) -> Option<&OperationOverride> {
        match operation {
            OperationKind::Create => self.create.as_ref(),
            OperationKind::Read => self.read.as_ref(),
            OperationKind::Update => self.update.as_ref(),
            OperationKind::Delete => self.destroy.as_ref(),
        }
    }

    pub fn id_attribute(&self) -> Option<&str> {
        non_empty(self.id_attribute.as_deref())
    }

    pub fn query_string(&self) -> Option<&str> {
        non_empty(self.query_string.as_deref())
    }

    /// Whether Read keeps the prior state value of `property`.
    pub fn ignores_server_changes(&self, property: &str) -> bool {
        self.ignore_all_server_changes || self.ignore_changes_to.iter().any(|p| p == property)
    }

    /// Settings that are accepted but have no effect on the generated code.
    pub fn ignored_settings(&self) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        if self.object_id.is_some() {
            ignored.push("object_id");
        }
        if self.debug.is_some() {
            ignored.push("debug");
        }
        if self.read.as_ref().is_some_and(|r| r.search.is_some()) {
            ignored.push("read.search");
        }
        ignored
    }

    pub fn wants_resource(&self) -> bool {
        self.generate_resource.unwrap_or(true)
    }

    pub fn wants_data_source(&self) -> bool {
        self.generate_data_source.unwrap_or(true)
    }

    /// Operations whose method must resolve for this entity.
    ///
    /// Attribute resolution reads the Create bodies, and the Update bodies
    /// unless force-recreate, for every artifact. The resource also calls
    /// Read and Delete; the data source calls Read.
    pub fn required_operations(&self) -> Vec<OperationKind> {
        let (resource, data_source) = (self.wants_resource(), self.wants_data_source());
        if !resource && !data_source {
            return Vec::new();
        }
        OperationKind::ALL
            .into_iter()
            .filter(|op| match op {
                OperationKind::Create | OperationKind::Read => true,
                OperationKind::Update => !self.force_recreate,
                OperationKind::Delete => resource,
            })
            .collect()
    }
}

/// Provider identity (the optional `provider` section).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    /// Provider name; falls back to the API title slug
    #[serde(default)]
    pub name: Option<String>,
    /// Go module owner; defaults to `example`
    #[serde(default)]
    pub author: Option<String>,
}

/// Which body's property list each merge pass enumerates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertySource {
    /// Each pass walks the properties of its own body
    #[default]
    OwnBody,
    /// Every pass walks the create-request properties (legacy behaviour)
    CreateRequest,
}

/// Generator knobs (the optional `generator` section).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorSettings {
    #[serde(default)]
    pub property_source: PropertySource,
}

/// Fully loaded and validated provider configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderConfiguration {
    pub provider: ProviderSettings,
    pub generator: GeneratorSettings,
    pub global: ProviderDefaults,
    /// Entities in declaration order
    pub resources: Vec<EntityDescriptor>,
}

impl ProviderConfiguration {
    /// Dotted keys of every set option the generated provider does not honour.
    ///
    /// Nested `ignore_changes_to` entries are listed too: only top-level
    /// attribute names are matched.
    pub fn ignored_settings(&self) -> Vec<String> {
        let mut ignored: Vec<String> = self
            .global
            .ignored_settings()
            .into_iter()
            .map(|key| format!("global.{key}"))
            .collect();
        for entity in &self.resources {
            let name = &entity.name;
            ignored.extend(
                entity
                    .ignored_settings()
                    .into_iter()
                    .map(|key| format!("resources.{name}.{key}")),
            );
            ignored.extend(
                entity
                    .ignore_changes_to
                    .iter()
                    .filter(|field| field.contains('.'))
                    .map(|field| format!("resources.{name}.ignore_changes_to[{field}]")),
            );
        }
        ignored
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
