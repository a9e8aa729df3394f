use anyhow::{bail, Context};
use oas3::OpenApiV3Spec;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Serialization format of the API description file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a file extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(DocumentFormat::Json),
            Some("yaml") | Some("yml") => Ok(DocumentFormat::Yaml),
            _ => bail!(
                "unsupported API description format for {} (expected .json, .yaml or .yml)",
                path.display()
            ),
        }
    }

    /// File extension used for the verbatim copy in the generated tree.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Yaml => "yaml",
        }
    }
}

/// A loaded OpenAPI document.
///
/// Keeps the raw text for the verbatim copy and an order-preserving JSON tree
/// for schema lookups. Construction checks the document against the `oas3`
/// model so malformed descriptions fail early.
#[derive(Debug, Clone)]
pub struct ApiDescription {
    pub(crate) document: Value,
    raw: String,
    format: DocumentFormat,
    title: String,
}

/// Drop path item keys that are neither HTTP verbs nor documented fields.
///
/// `oas3` rejects unknown verbs; lookups only ever need the standard ones.
fn strip_unknown_verbs(val: &mut Value) {
    const METHODS: [&str; 8] = ["get", "post", "put", "delete", "patch", "options", "head", "trace"];

    let Some(Value::Object(paths)) = val.get_mut("paths") else {
        return;
    };
    for item in paths.values_mut() {
        if let Value::Object(obj) = item {
            obj.retain(|k, _| {
                let lk = k.to_ascii_lowercase();
                match lk.as_str() {
                    "summary" | "description" | "servers" | "parameters" | "$ref" => true,
                    m if METHODS.contains(&m) => true,
                    _ => k.starts_with("x-"),
                }
            });
        }
    }
}

impl ApiDescription {
    /// Load from disk, detecting the format from the extension.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let format = DocumentFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read API description {}", path.display()))?;
        let description = Self::parse(&content, format)
            .with_context(|| format!("Failed to load API description {}", path.display()))?;
        debug!(
            path = %path.display(),
            title = %description.title,
            "loaded API description"
        );
        Ok(description)
    }

    /// Parse document text in the given format.
    pub fn parse(content: &str, format: DocumentFormat) -> anyhow::Result<Self> {
        let document: Value = match format {
            DocumentFormat::Yaml => serde_yaml::from_str(content).context("invalid YAML")?,
            DocumentFormat::Json => serde_json::from_str(content).context("invalid JSON")?,
        };
        if !document.is_object() {
            bail!("API description must be a mapping at the top level");
        }

        let mut checked = document.clone();
        strip_unknown_verbs(&mut checked);
        let spec: OpenApiV3Spec = serde_json::from_value(checked)
            .context("document is not a valid OpenAPI 3 description")?;

        Ok(Self {
            document,
            raw: content.to_string(),
            format,
            title: spec.info.title,
        })
    }

    /// `info.title` as written.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Lowercase, underscore-separated form of the title.
    pub fn slug(&self) -> String {
        self.title
            .to_lowercase()
            .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
            .split('_')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Original file contents, byte for byte.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Order-preserving JSON tree of the document.
    pub fn document(&self) -> &Value {
        &self.document
    }
}
