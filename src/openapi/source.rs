use serde_json::{Map, Value};

use super::load::ApiDescription;
use crate::error::{LookupFailure, SchemaLookupError};

/// The only content type bodies are looked up for.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Upper bound on `$ref` hops before a reference is treated as cyclic.
const MAX_REF_HOPS: usize = 32;

/// A property as declared inside a body schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySchema {
    /// Normalised `type` list; empty when the schema declares none
    pub types: Vec<String>,
    /// Explicit OpenAPI 3.0 `nullable` flag
    pub nullable: Option<bool>,
    pub description: Option<String>,
}

/// The root schema of a request or response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodySchema {
    pub types: Vec<String>,
    pub nullable: Option<bool>,
    /// Properties in declaration order
    pub properties: Vec<(String, PropertySchema)>,
    /// Names listed in the schema's `required` array
    pub required: Vec<String>,
}

impl BodySchema {
    /// Whether the type list mentions `object` at all.
    pub fn is_object_like(&self) -> bool {
        self.types.iter().any(|t| t == "object")
    }

    /// Whether the type list is exactly `["object"]`.
    pub fn is_plain_object(&self) -> bool {
        self.types.len() == 1 && self.types[0] == "object"
    }
}

/// Read access to operation bodies of an API description.
///
/// Lookups are keyed by path string and HTTP method; the method is matched
/// case-insensitively.
pub trait SchemaSource {
    fn request_body(
        &self,
        path: &str,
        method: &str,
        content_type: &str,
    ) -> Result<BodySchema, SchemaLookupError>;

    fn response_body(
        &self,
        path: &str,
        method: &str,
        content_type: &str,
    ) -> Result<BodySchema, SchemaLookupError>;
}

impl SchemaSource for ApiDescription {
    fn request_body(
        &self,
        path: &str,
        method: &str,
        content_type: &str,
    ) -> Result<BodySchema, SchemaLookupError> {
        let fail = |failure| lookup_error(path, method, failure);
        let operation = self.operation(path, method).map_err(fail)?;
        let body = operation
            .get("requestBody")
            .ok_or(LookupFailure::MissingRequestBody)
            .and_then(|b| self.resolve(b))
            .map_err(fail)?;
        self.media_schema(body, content_type).map_err(fail)
    }

    fn response_body(
        &self,
        path: &str,
        method: &str,
        content_type: &str,
    ) -> Result<BodySchema, SchemaLookupError> {
        let fail = |failure| lookup_error(path, method, failure);
        let operation = self.operation(path, method).map_err(fail)?;
        let responses = operation
            .get("responses")
            .and_then(Value::as_object)
            .ok_or(LookupFailure::MissingResponse)
            .map_err(fail)?;
        let response = select_success_response(responses)
            .ok_or(LookupFailure::MissingResponse)
            .and_then(|r| self.resolve(r))
            .map_err(fail)?;
        self.media_schema(response, content_type).map_err(fail)
    }
}

impl ApiDescription {
    fn operation(&self, path: &str, method: &str) -> Result<&Value, LookupFailure> {
        let item = self
            .document
            .get("paths")
            .and_then(|p| p.get(path))
            .ok_or(LookupFailure::MissingPath)?;
        let item = self.resolve(item)?;
        item.get(method.to_ascii_lowercase().as_str())
            .filter(|op| op.is_object())
            .ok_or(LookupFailure::MissingOperation)
    }

    /// `content[content_type].schema` of a request body or response object.
    fn media_schema(&self, body: &Value, content_type: &str) -> Result<BodySchema, LookupFailure> {
        let media = body
            .get("content")
            .and_then(|c| c.get(content_type))
            .ok_or_else(|| LookupFailure::MissingContentType {
                content_type: content_type.to_string(),
            })?;
        let schema = media.get("schema").ok_or(LookupFailure::MissingSchema)?;
        self.body_schema(self.resolve(schema)?)
    }

    fn body_schema(&self, schema: &Value) -> Result<BodySchema, LookupFailure> {
        let mut properties = Vec::new();
        if let Some(Value::Object(props)) = schema.get("properties") {
            properties.reserve(props.len());
            for (name, referrer) in props {
                let prop = self.resolve(referrer)?;
                // siblings of a `$ref` override the target's annotations
                let nullable = |node: &Value| node.get("nullable").and_then(Value::as_bool);
                let description = |node: &Value| {
                    node.get("description")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                };
                properties.push((
                    name.clone(),
                    PropertySchema {
                        types: schema_types(prop),
                        nullable: nullable(referrer).or_else(|| nullable(prop)),
                        description: description(referrer).or_else(|| description(prop)),
                    },
                ));
            }
        }
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(BodySchema {
            types: schema_types(schema),
            nullable: schema.get("nullable").and_then(Value::as_bool),
            properties,
            required,
        })
    }

    /// Follow local `$ref` pointers until a concrete node is reached.
    fn resolve<'a>(&'a self, mut node: &'a Value) -> Result<&'a Value, LookupFailure> {
        for _ in 0..MAX_REF_HOPS {
            let Some(reference) = node.get("$ref").and_then(Value::as_str) else {
                return Ok(node);
            };
            let unresolvable = || LookupFailure::UnresolvableRef {
                reference: reference.to_string(),
            };
            let pointer = reference.strip_prefix('#').ok_or_else(unresolvable)?;
            node = self.document.pointer(pointer).ok_or_else(unresolvable)?;
        }
        Err(LookupFailure::UnresolvableRef {
            reference: node
                .get("$ref")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

fn lookup_error(path: &str, method: &str, failure: LookupFailure) -> SchemaLookupError {
    SchemaLookupError {
        path: path.to_string(),
        method: method.to_ascii_lowercase(),
        failure,
    }
}

/// Normalise a schema's `type` keyword to an ordered list.
pub fn schema_types(schema: &Value) -> Vec<String> {
    match schema.get("type") {
        Some(Value::String(t)) => vec![t.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Pick the response describing a successful call.
///
/// Lowest explicit 2xx code first, then the `2XX` range, then `default`.
fn select_success_response(responses: &Map<String, Value>) -> Option<&Value> {
    responses
        .iter()
        .filter_map(|(code, resp)| {
            code.parse::<u16>()
                .ok()
                .filter(|c| (200..300).contains(c))
                .map(|c| (c, resp))
        })
        .min_by_key(|(code, _)| *code)
        .map(|(_, resp)| resp)
        .or_else(|| {
            responses
                .iter()
                .find(|(code, _)| code.eq_ignore_ascii_case("2xx"))
                .map(|(_, resp)| resp)
        })
        .or_else(|| responses.get("default"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::openapi::DocumentFormat;

    const DOC: &str = r##"
openapi: 3.1.0
info:
  title: Lookup
  version: 1.0.0
paths:
  /widget:
    post:
      requestBody:
        $ref: '#/components/requestBodies/Widget'
      responses:
        '201':
          description: created
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Widget'
        '200':
          description: ok
          content:
            application/json:
              schema:
                type: object
                properties:
                  fromTwoHundred: { type: string }
  /widget/{id}:
    $ref: '#/components/pathItems/WidgetById'
  /gadget:
    post:
      requestBody:
        content:
          text/plain:
            schema: { type: string }
      responses:
        2XX:
          description: ok
          content:
            application/json:
              schema:
                type: [object, 'null']
  /loop:
    post:
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/A'
      responses:
        default:
          description: fallback
          content:
            application/json:
              schema:
                $ref: 'other.yaml#/Thing'
components:
  pathItems:
    WidgetById:
      put:
        requestBody:
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Widget'
        responses:
          '204':
            description: no content
  requestBodies:
    Widget:
      content:
        application/json:
          schema:
            $ref: '#/components/schemas/Widget'
  schemas:
    A:
      $ref: '#/components/schemas/B'
    B:
      $ref: '#/components/schemas/A'
    Widget:
      type: object
      required: [name]
      properties:
        name:
          type: string
          description: Display name
        size:
          type: [integer, 'null']
        legacy:
          type: number
          nullable: true
        owner:
          $ref: '#/components/schemas/Owner'
          description: Account owning the widget
          nullable: true
        maker:
          $ref: '#/components/schemas/Owner'
        anything: {}
    Owner:
      type: object
      description: An account
      properties:
        id: { type: string }
"##;

    fn api() -> ApiDescription {
        ApiDescription::parse(DOC, DocumentFormat::Yaml).unwrap()
    }

    #[test]
    fn test_request_body_follows_refs_and_keeps_order() {
        let body = api()
            .request_body("/widget", "POST", JSON_CONTENT_TYPE)
            .unwrap();
        assert!(body.is_plain_object());
        let names: Vec<&str> = body.properties.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["name", "size", "legacy", "owner", "maker", "anything"]);
        assert_eq!(body.required, vec!["name".to_string()]);

        let (_, size) = &body.properties[1];
        assert_eq!(size.types, vec!["integer", "null"]);
        let (_, legacy) = &body.properties[2];
        assert_eq!(legacy.nullable, Some(true));
        let (_, owner) = &body.properties[3];
        assert_eq!(owner.types, vec!["object"]);
        let (_, anything) = &body.properties[5];
        assert!(anything.types.is_empty());
        assert_eq!(
            body.properties[0].1.description.as_deref(),
            Some("Display name")
        );
    }

    #[test]
    fn test_ref_siblings_override_target_annotations() {
        let body = api()
            .request_body("/widget", "post", JSON_CONTENT_TYPE)
            .unwrap();
        let (_, owner) = &body.properties[3];
        assert_eq!(owner.description.as_deref(), Some("Account owning the widget"));
        assert_eq!(owner.nullable, Some(true));
        assert_eq!(owner.types, vec!["object"]);

        let (_, maker) = &body.properties[4];
        assert_eq!(maker.description.as_deref(), Some("An account"));
        assert_eq!(maker.nullable, None);
    }

    #[test]
    fn test_response_prefers_lowest_success_code() {
        let body = api()
            .response_body("/widget", "post", JSON_CONTENT_TYPE)
            .unwrap();
        assert_eq!(body.properties[0].0, "fromTwoHundred");
    }

    #[test]
    fn test_range_response_is_used_without_explicit_codes() {
        let api = api();
        let body = api
            .response_body("/gadget", "Post", JSON_CONTENT_TYPE)
            .unwrap();
        assert_eq!(body.types, vec!["object", "null"]);
        assert!(body.is_object_like());
        assert!(!body.is_plain_object());

        let err = api
            .request_body("/gadget", "post", JSON_CONTENT_TYPE)
            .unwrap_err();
        assert!(matches!(
            err.failure,
            LookupFailure::MissingContentType { .. }
        ));
    }

    #[test]
    fn test_path_item_ref_and_missing_content() {
        let api = api();
        let body = api
            .request_body("/widget/{id}", "put", JSON_CONTENT_TYPE)
            .unwrap();
        assert_eq!(body.properties.len(), 6);

        let err = api
            .response_body("/widget/{id}", "put", JSON_CONTENT_TYPE)
            .unwrap_err();
        assert_eq!(
            err.failure,
            LookupFailure::MissingContentType {
                content_type: JSON_CONTENT_TYPE.to_string()
            }
        );
        assert_eq!(err.method, "put");
        assert_eq!(err.path, "/widget/{id}");
    }

    #[test]
    fn test_missing_path_and_operation() {
        let api = api();
        let err = api
            .request_body("/nope", "post", JSON_CONTENT_TYPE)
            .unwrap_err();
        assert_eq!(err.failure, LookupFailure::MissingPath);
        let err = api
            .request_body("/widget", "delete", JSON_CONTENT_TYPE)
            .unwrap_err();
        assert_eq!(err.failure, LookupFailure::MissingOperation);
        let err = api.request_body("/widget", "", JSON_CONTENT_TYPE).unwrap_err();
        assert_eq!(err.failure, LookupFailure::MissingOperation);
    }

    #[test]
    fn test_cyclic_and_external_refs_fail() {
        let api = api();
        let err = api
            .request_body("/loop", "post", JSON_CONTENT_TYPE)
            .unwrap_err();
        assert!(matches!(err.failure, LookupFailure::UnresolvableRef { .. }));
        let err = api
            .response_body("/loop", "post", JSON_CONTENT_TYPE)
            .unwrap_err();
        assert_eq!(
            err.failure,
            LookupFailure::UnresolvableRef {
                reference: "other.yaml#/Thing".to_string()
            }
        );
    }

    #[test]
    fn test_schema_types_normalisation() {
        assert_eq!(schema_types(&serde_json::json!({"type": "string"})), vec!["string"]);
        assert_eq!(
            schema_types(&serde_json::json!({"type": ["null", "object"]})),
            vec!["null", "object"]
        );
        assert!(schema_types(&serde_json::json!({})).is_empty());
    }
}
