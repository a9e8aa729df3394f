use serde::Serialize;

/// Attribute kinds the plugin host's type system can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeKind {
    Bool,
    Int64,
    Float64,
    String,
    /// Anything else: objects, arrays, unknown or missing types
    Dynamic,
}

impl AttributeKind {
    /// Kind of a single JSON-schema type name.
    pub fn from_json_type(name: &str) -> Self {
        match name {
            "boolean" => AttributeKind::Bool,
            "integer" => AttributeKind::Int64,
            "number" => AttributeKind::Float64,
            "string" => AttributeKind::String,
            _ => AttributeKind::Dynamic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Bool => "Bool",
            AttributeKind::Int64 => "Int64",
            AttributeKind::Float64 => "Float64",
            AttributeKind::String => "String",
            AttributeKind::Dynamic => "Dynamic",
        }
    }
}

/// Result of classifying a property's type list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeClassification {
    pub kind: AttributeKind,
    pub nullable: bool,
}

/// Classify a JSON-schema `type` list into an attribute kind and nullability.
///
/// A list containing `"null"` is nullable and classified by its other entry
/// when it has exactly two; without `"null"` a single entry is classified and
/// nullability comes from the explicit flag. Every other shape is `Dynamic`.
pub fn classify<S: AsRef<str>>(types: &[S], explicit_nullable: Option<bool>) -> TypeClassification {
    let has_null = types.iter().any(|t| t.as_ref() == "null");
    if has_null {
        let kind = if types.len() == 2 {
            types
                .iter()
                .map(AsRef::as_ref)
                .find(|t| *t != "null")
                .map(AttributeKind::from_json_type)
                .unwrap_or(AttributeKind::Dynamic)
        } else {
            AttributeKind::Dynamic
        };
        return TypeClassification {
            kind,
            nullable: true,
        };
    }

    let kind = match types {
        [only] => AttributeKind::from_json_type(only.as_ref()),
        _ => AttributeKind::Dynamic,
    };
    TypeClassification {
        kind,
        nullable: explicit_nullable.unwrap_or(false),
    }
}
