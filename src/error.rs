//! Error types shared by the resolution engine, the planner and the orchestrator.
//!
//! File loading and the CLI wrap these in `anyhow` with context; the library
//! itself always returns [`GenError`] so callers can match on the failure kind.

use std::fmt;
use std::path::PathBuf;

use crate::resolve::{BodyRole, OperationKind};

/// Why a schema lookup against the API description failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// `paths` has no entry for the requested path
    MissingPath,
    /// The path item has no operation for the requested method
    MissingOperation,
    /// The operation declares no request body
    MissingRequestBody,
    /// The operation declares no usable (2xx or default) response
    MissingResponse,
    /// The body has no entry for the requested content type
    MissingContentType {
        /// Content type that was looked up
        content_type: String,
    },
    /// The media type entry carries no schema
    MissingSchema,
    /// A `$ref` could not be followed
    UnresolvableRef {
        /// The reference string as written in the document
        reference: String,
    },
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupFailure::MissingPath => write!(f, "path not found"),
            LookupFailure::MissingOperation => write!(f, "operation not found"),
            LookupFailure::MissingRequestBody => write!(f, "operation has no request body"),
            LookupFailure::MissingResponse => write!(f, "operation has no 2xx or default response"),
            LookupFailure::MissingContentType { content_type } => {
                write!(f, "no '{content_type}' content")
            }
            LookupFailure::MissingSchema => write!(f, "media type has no schema"),
            LookupFailure::UnresolvableRef { reference } => {
                write!(f, "cannot resolve reference '{reference}'")
            }
        }
    }
}

/// A failed request/response body lookup, carrying the coordinates that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaLookupError {
    /// Path string used for the lookup
    pub path: String,
    /// HTTP method used for the lookup (lowercase)
    pub method: String,
    /// What was missing
    pub failure: LookupFailure,
}

impl fmt::Display for SchemaLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = if self.method.is_empty() {
            "<none>"
        } else {
            self.method.as_str()
        };
        write!(f, "{} {}: {}", method, self.path, self.failure)
    }
}

impl std::error::Error for SchemaLookupError {}

/// Template parse or execution failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    /// Identifier (file name) of the template that failed
    pub template: String,
    /// Engine error message
    pub message: String,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template '{}' failed: {}", self.template, self.message)
    }
}

impl std::error::Error for RenderError {}

/// Errors produced while turning a configuration and API description into artifacts.
#[derive(Debug)]
pub enum GenError {
    /// Provider configuration failed structural or semantic validation
    ///
    /// Every issue found is listed; nothing has been planned or written yet.
    ConfigValidation {
        /// Human readable issues, one per violation
        issues: Vec<String>,
    },
    /// A path, operation, body or content type referenced by an entity is absent
    SchemaLookup {
        /// Entity being resolved
        entity: String,
        /// Operation whose bodies were looked up
        operation: OperationKind,
        /// Underlying lookup failure
        error: SchemaLookupError,
    },
    /// A resolved body is not object-shaped
    UnsupportedSchemaShape {
        /// Entity being resolved
        entity: String,
        /// Which body had the wrong shape
        body: BodyRole,
        /// The body's root type list
        types: Vec<String>,
    },
    /// A template failed to parse or execute
    Render {
        /// Output path of the artifact being rendered
        artifact: PathBuf,
        /// Engine failure
        error: RenderError,
    },
    /// The writer could not persist an artifact
    Write {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl GenError {
    /// Shorthand for a configuration error with the given issues.
    pub fn config<I, S>(issues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GenError::ConfigValidation {
            issues: issues.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::ConfigValidation { issues } => {
                write!(f, "invalid provider configuration: {}", issues.join("; "))
            }
            GenError::SchemaLookup {
                entity,
                operation,
                error,
            } => write!(
                f,
                "could not get request/response bodies for {} of '{}': {}",
                operation, entity, error
            ),
            GenError::UnsupportedSchemaShape {
                entity,
                body,
                types,
            } => write!(
                f,
                "{} body of '{}' must be an object, found type {:?}",
                body, entity, types
            ),
            GenError::Render { artifact, error } => {
                write!(f, "rendering {}: {}", artifact.display(), error)
            }
            GenError::Write { path, source } => {
                write!(f, "writing {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for GenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenError::SchemaLookup { error, .. } => Some(error),
            GenError::Render { error, .. } => Some(error),
            GenError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_lists_every_issue() {
        let err = GenError::config(["global.uri is not a URL", "resources.pet.path is empty"]);
        let msg = err.to_string();
        assert!(msg.contains("global.uri is not a URL"));
        assert!(msg.contains("resources.pet.path is empty"));
    }

    #[test]
    fn test_lookup_error_names_coordinates() {
        let err = GenError::SchemaLookup {
            entity: "pet".into(),
            operation: OperationKind::Create,
            error: SchemaLookupError {
                path: "/pet".into(),
                method: "post".into(),
                failure: LookupFailure::MissingContentType {
                    content_type: "application/json".into(),
                },
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("create"));
        assert!(msg.contains("post /pet"));
        assert!(msg.contains("application/json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_lookup_error_names_missing_method() {
        let err = GenError::SchemaLookup {
            entity: "inventory".into(),
            operation: OperationKind::Create,
            error: SchemaLookupError {
                path: "/inventory".into(),
                method: String::new(),
                failure: LookupFailure::MissingOperation,
            },
        };
        assert_eq!(
            err.to_string(),
            "could not get request/response bodies for create of 'inventory': <none> /inventory: operation not found"
        );
    }
}
