use anyhow::Context;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use super::types::{
    EntityDescriptor, GeneratorSettings, ProviderConfiguration, ProviderDefaults, ProviderSettings,
};
use crate::error::GenError;
use crate::naming::to_snake_case;
use crate::resolve::{resolve_operation, OperationKind};

const PROVIDER_SCHEMA: &str = include_str!("provider_schema.json");

#[derive(Deserialize)]
struct RawConfiguration {
    #[serde(default)]
    provider: ProviderSettings,
    #[serde(default)]
    generator: GeneratorSettings,
    #[serde(default)]
    global: ProviderDefaults,
    #[serde(default)]
    resources: Map<String, Value>,
}

/// Read and validate a provider configuration file.
pub fn load_provider_config(path: &Path) -> anyhow::Result<ProviderConfiguration> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read provider configuration {}", path.display()))?;
    let config = parse_provider_config(&content)
        .with_context(|| format!("Failed to load provider configuration {}", path.display()))?;
    for setting in config.ignored_settings() {
        warn!(
            path = %path.display(),
            setting = %setting,
            "setting is accepted but has no effect on the generated provider"
        );
    }
    debug!(
        path = %path.display(),
        entities = config.resources.len(),
        "loaded provider configuration"
    );
    Ok(config)
}

/// Parse a YAML provider configuration and run every validation step.
///
/// Steps: YAML decode, JSON-Schema check, typed decode, semantic checks.
/// Schema and semantic issues are collected and returned together.
pub fn parse_provider_config(content: &str) -> Result<ProviderConfiguration, GenError> {
    let value: Value = serde_yaml::from_str(content)
        .map_err(|e| GenError::config([format!("invalid YAML: {e}")]))?;

    let issues = schema_issues(&value)?;
    if !issues.is_empty() {
        return Err(GenError::ConfigValidation { issues });
    }

    let config = from_value(value)?;
    let issues = semantic_issues(&config);
    if !issues.is_empty() {
        return Err(GenError::ConfigValidation { issues });
    }
    Ok(config)
}

fn schema_issues(value: &Value) -> Result<Vec<String>, GenError> {
    let schema: Value = serde_json::from_str(PROVIDER_SCHEMA)
        .map_err(|e| GenError::config([format!("embedded configuration schema is invalid: {e}")]))?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| GenError::config([format!("embedded configuration schema is invalid: {e}")]))?;
    Ok(validator
        .iter_errors(value)
        .map(|e| e.to_string())
        .collect())
}

/// Keys of the `resources` mapping that hold defaults instead of an entity.
const RESOURCE_TOGGLES: [&str; 2] = ["generate_resource", "generate_data_source"];

fn from_value(value: Value) -> Result<ProviderConfiguration, GenError> {
    let mut raw: RawConfiguration =
        serde_json::from_value(value).map_err(|e| GenError::config([e.to_string()]))?;

    let [default_resource, default_data_source] =
        RESOURCE_TOGGLES.map(|key| raw.resources.shift_remove(key).as_ref().and_then(Value::as_bool));

    let mut resources = Vec::with_capacity(raw.resources.len());
    let mut issues = Vec::new();
    for (name, entry) in raw.resources {
        match serde_json::from_value::<EntityDescriptor>(entry) {
            Ok(mut entity) => {
                entity.name = name;
                entity.generate_resource = entity.generate_resource.or(default_resource);
                entity.generate_data_source = entity.generate_data_source.or(default_data_source);
                resources.push(entity);
            }
            Err(e) => issues.push(format!("resources.{name}: {e}")),
        }
    }
    if !issues.is_empty() {
        return Err(GenError::ConfigValidation { issues });
    }

    Ok(ProviderConfiguration {
        provider: raw.provider,
        generator: raw.generator,
        global: raw.global,
        resources,
    })
}

fn semantic_issues(config: &ProviderConfiguration) -> Vec<String> {
    let mut issues = Vec::new();
    let global = &config.global;

    if !global.uri.is_empty() {
        if let Err(e) = url::Url::parse(&global.uri) {
            issues.push(format!("global.uri '{}' is not a valid URI: {e}", global.uri));
        }
    }
    for op in OperationKind::ALL {
        if let Some(method) = global.method_for(op) {
            check_method(&mut issues, &format!("global.{}_method", op.config_key()), method);
        }
    }

    let mut file_names: HashMap<String, &str> = HashMap::new();
    for entity in &config.resources {
        let name = entity.name.as_str();
        let snake = to_snake_case(name);
        if snake.is_empty() {
            issues.push(format!("resources.{name}: name has no usable characters"));
        } else if let Some(previous) = file_names.insert(snake.clone(), name) {
            issues.push(format!(
                "resources.{name}: generates the same files as resources.{previous} ({snake})"
            ));
        }
        if !entity.path.starts_with('/') {
            issues.push(format!("resources.{name}.path '{}' must start with '/'", entity.path));
        }
        if let Some(query) = entity.query_string() {
            if query.starts_with('?') {
                issues.push(format!(
                    "resources.{name}.query_string '{query}' must not start with '?'"
                ));
            }
        }
        for op in OperationKind::ALL {
            let Some(ov) = entity.operation_override(op) else {
                continue;
            };
            let key = format!("resources.{name}.{}", op.config_key());
            if let Some(path) = ov.path() {
                if !path.starts_with('/') {
                    issues.push(format!("{key}.path '{path}' must start with '/'"));
                }
            }
            if let Some(method) = ov.method() {
                check_method(&mut issues, &format!("{key}.method"), method);
            }
        }
        for op in entity.required_operations() {
            if resolve_operation(entity, global, op).method.is_empty() {
                issues.push(format!(
                    "resources.{name}: no HTTP method for {op}; set resources.{name}.{}.method or global.{}_method",
                    op.config_key(),
                    op.config_key()
                ));
            }
        }
    }
    issues
}

fn check_method(issues: &mut Vec<String>, key: &str, method: &str) {
    if http::Method::from_bytes(method.as_bytes()).is_err() {
        issues.push(format!("{key} '{method}' is not a valid HTTP method"));
    }
}
