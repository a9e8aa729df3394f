//! Merging of body schemas into one attribute set per entity.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use super::operations::{resolve_operation, OperationKind};
use super::types::{classify, AttributeKind};
use crate::config::{EntityDescriptor, PropertySource, ProviderDefaults};
use crate::error::GenError;
use crate::openapi::{BodySchema, PropertySchema, SchemaSource, JSON_CONTENT_TYPE};

/// One of the four bodies a property can appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRole {
    CreateRequest,
    CreateResponse,
    UpdateRequest,
    UpdateResponse,
}

impl BodyRole {
    pub const ALL: [BodyRole; 4] = [
        BodyRole::CreateRequest,
        BodyRole::CreateResponse,
        BodyRole::UpdateRequest,
        BodyRole::UpdateResponse,
    ];

    const fn bit(self) -> u8 {
        match self {
            BodyRole::CreateRequest => 1,
            BodyRole::CreateResponse => 1 << 1,
            BodyRole::UpdateRequest => 1 << 2,
            BodyRole::UpdateResponse => 1 << 3,
        }
    }
}

impl fmt::Display for BodyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BodyRole::CreateRequest => "create request",
            BodyRole::CreateResponse => "create response",
            BodyRole::UpdateRequest => "update request",
            BodyRole::UpdateResponse => "update response",
        })
    }
}

/// Set of [`BodyRole`]s a property was found in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Membership(u8);

impl Membership {
    pub const fn empty() -> Self {
        Membership(0)
    }

    pub fn insert(&mut self, role: BodyRole) {
        self.0 |= role.bit();
    }

    pub fn contains(&self, role: BodyRole) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: Membership) -> Membership {
        Membership(self.0 | other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = BodyRole> + '_ {
        BodyRole::ALL.into_iter().filter(|r| self.contains(*r))
    }
}

impl FromIterator<BodyRole> for Membership {
    fn from_iter<I: IntoIterator<Item = BodyRole>>(iter: I) -> Self {
        let mut m = Membership::empty();
        for role in iter {
            m.insert(role);
        }
        m
    }
}

/// A merged attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: AttributeKind,
    pub nullable: bool,
    pub membership: Membership,
    pub description: Option<String>,
    /// Listed as required by the create-request body
    pub required: bool,
}

/// Ordered, name-unique collection of [`PropertyDescriptor`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    entries: Vec<PropertyDescriptor>,
    index: HashMap<String, usize>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertyDescriptor> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|p| p.name.as_str()).collect()
    }

    /// Record that `properties` appeared in the body playing `role`.
    ///
    /// Unseen names are classified and appended; every name gets the role
    /// added to its membership.
    pub fn merge(&mut self, role: BodyRole, properties: &[(String, PropertySchema)], required: &[String]) {
        for (name, schema) in properties {
            let idx = match self.index.get(name) {
                Some(&idx) => idx,
                None => {
                    let class = classify(&schema.types, schema.nullable);
                    self.entries.push(PropertyDescriptor {
                        name: name.clone(),
                        kind: class.kind,
                        nullable: class.nullable,
                        membership: Membership::empty(),
                        description: schema.description.clone(),
                        required: required.contains(name),
                    });
                    self.index.insert(name.clone(), self.entries.len() - 1);
                    self.entries.len() - 1
                }
            };
            self.entries[idx].membership.insert(role);
        }
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = &'a PropertyDescriptor;
    type IntoIter = std::slice::Iter<'a, PropertyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Request/response bodies of the operations that feed an entity's attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationBodies {
    pub create_request: BodySchema,
    pub create_response: BodySchema,
    /// `None` for force-recreate entities
    pub update: Option<(BodySchema, BodySchema)>,
}

impl OperationBodies {
    /// Bodies in merge order, paired with their role.
    pub fn passes(&self) -> Vec<(BodyRole, &BodySchema)> {
        let mut passes = vec![
            (BodyRole::CreateRequest, &self.create_request),
            (BodyRole::CreateResponse, &self.create_response),
        ];
        if let Some((request, response)) = &self.update {
            passes.push((BodyRole::UpdateRequest, request));
            passes.push((BodyRole::UpdateResponse, response));
        }
        passes
    }
}

/// Look up the create (and, unless force-recreate, update) bodies of an entity.
///
/// Every body must be object-shaped; a missing path, operation or content
/// type fails the lookup.
pub fn fetch_bodies(
    entity: &EntityDescriptor,
    defaults: &ProviderDefaults,
    source: &dyn SchemaSource,
) -> Result<OperationBodies, GenError> {
    let (create_request, create_response) = fetch_pair(
        entity,
        defaults,
        source,
        OperationKind::Create,
        (BodyRole::CreateRequest, BodyRole::CreateResponse),
    )?;

    let update = if entity.force_recreate {
        None
    } else {
        Some(fetch_pair(
            entity,
            defaults,
            source,
            OperationKind::Update,
            (BodyRole::UpdateRequest, BodyRole::UpdateResponse),
        )?)
    };

    Ok(OperationBodies {
        create_request,
        create_response,
        update,
    })
}

fn fetch_pair(
    entity: &EntityDescriptor,
    defaults: &ProviderDefaults,
    source: &dyn SchemaSource,
    operation: OperationKind,
    roles: (BodyRole, BodyRole),
) -> Result<(BodySchema, BodySchema), GenError> {
    let resolved = resolve_operation(entity, defaults, operation);
    debug!(
        entity = %entity.name,
        operation = %operation,
        path = %resolved.path,
        method = %resolved.method,
        "looking up operation bodies"
    );
    let wrap = |error| GenError::SchemaLookup {
        entity: entity.name.clone(),
        operation,
        error,
    };
    let request = source
        .request_body(&resolved.path, &resolved.method, JSON_CONTENT_TYPE)
        .map_err(wrap)?;
    let response = source
        .response_body(&resolved.path, &resolved.method, JSON_CONTENT_TYPE)
        .map_err(wrap)?;

    for (role, body) in [(roles.0, &request), (roles.1, &response)] {
        if !body.is_object_like() {
            return Err(GenError::UnsupportedSchemaShape {
                entity: entity.name.clone(),
                body: role,
                types: body.types.clone(),
            });
        }
    }
    Ok((request, response))
}

/// Merge already fetched bodies into a [`PropertySet`].
///
/// Returns an empty set when any body's root type is not exactly `["object"]`.
pub fn merge_bodies(entity: &str, bodies: &OperationBodies, source: PropertySource) -> PropertySet {
    let passes = bodies.passes();
    if let Some((role, body)) = passes.iter().find(|(_, b)| !b.is_plain_object()) {
        warn!(
            entity = %entity,
            body = %role,
            types = ?body.types,
            "body type is not exactly [\"object\"]; entity gets no attributes"
        );
        return PropertySet::new();
    }

    let required = &bodies.create_request.required;
    let mut set = PropertySet::new();
    for (role, body) in passes {
        let properties = match source {
            PropertySource::OwnBody => &body.properties,
            PropertySource::CreateRequest => &bodies.create_request.properties,
        };
        set.merge(role, properties, required);
    }
    set
}

/// Fetch and merge the attribute set of one entity.
pub fn resolve_properties(
    entity: &EntityDescriptor,
    defaults: &ProviderDefaults,
    source: &dyn SchemaSource,
    property_source: PropertySource,
) -> Result<PropertySet, GenError> {
    let bodies = fetch_bodies(entity, defaults, source)?;
    let set = merge_bodies(&entity.name, &bodies, property_source);
    debug!(
        entity = %entity.name,
        properties = set.len(),
        "resolved entity properties"
    );
    Ok(set)
}
