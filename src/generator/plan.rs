use once_cell::unsync::OnceCell;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::context::{
    ClientView, DocumentContext, EntityContext, EntityRef, ProjectContext, ProviderView, RegistryContext,
    RenderContext,
};
use crate::config::{EntityDescriptor, PropertySource, ProviderConfiguration, ProviderDefaults};
use crate::error::GenError;
use crate::naming::to_snake_case;
use crate::openapi::{ApiDescription, SchemaSource};
use crate::resolve::{resolve_properties, PropertySet};

/// Number of artifacts every plan starts with.
pub const FIXED_ARTIFACT_COUNT: usize = 6;

/// Directory holding the provider package in the generated tree.
const PROVIDER_DIR: &str = "internal/provider";

/// Template an artifact is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateId {
    Makefile,
    MainGo,
    GoMod,
    SharedGo,
    ApiDocument,
    ProviderGo,
    Resource,
    DataSource,
}

impl TemplateId {
    pub const ALL: [TemplateId; 8] = [
        TemplateId::Makefile,
        TemplateId::MainGo,
        TemplateId::GoMod,
        TemplateId::SharedGo,
        TemplateId::ApiDocument,
        TemplateId::ProviderGo,
        TemplateId::Resource,
        TemplateId::DataSource,
    ];

    /// File name of the template, also its name in an override directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            TemplateId::Makefile => "Makefile.txt",
            TemplateId::MainGo => "main.go.txt",
            TemplateId::GoMod => "go.mod.txt",
            TemplateId::SharedGo => "shared.go.txt",
            TemplateId::ApiDocument => "openapi.txt",
            TemplateId::ProviderGo => "provider.go.txt",
            TemplateId::Resource => "resource.go.txt",
            TemplateId::DataSource => "data_source.go.txt",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Whether an entity artifact is a managed resource or a read-only data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Resource,
    DataSource,
}

impl EntityKind {
    pub fn file_prefix(&self) -> &'static str {
        match self {
            EntityKind::Resource => "resource",
            EntityKind::DataSource => "data_source",
        }
    }

    pub fn template(&self) -> TemplateId {
        match self {
            EntityKind::Resource => TemplateId::Resource,
            EntityKind::DataSource => TemplateId::DataSource,
        }
    }
}

/// Context of one resource or data-source artifact.
///
/// The property set is computed on first use and cached for this artifact
/// only; the resource and data source of an entity resolve independently.
#[derive(Debug)]
pub struct EntityArtifactContext {
    pub kind: EntityKind,
    pub provider: ProviderView,
    pub entity: Arc<EntityDescriptor>,
    pub defaults: Arc<ProviderDefaults>,
    pub property_source: PropertySource,
    properties: OnceCell<PropertySet>,
}

impl EntityArtifactContext {
    pub fn new(
        kind: EntityKind,
        provider: ProviderView,
        entity: Arc<EntityDescriptor>,
        defaults: Arc<ProviderDefaults>,
        property_source: PropertySource,
    ) -> Self {
        Self {
            kind,
            provider,
            entity,
            defaults,
            property_source,
            properties: OnceCell::new(),
        }
    }

    /// The entity's attribute set, resolved at most once.
    pub fn properties(&self, source: &dyn SchemaSource) -> Result<&PropertySet, GenError> {
        self.properties.get_or_try_init(|| {
            resolve_properties(&self.entity, &self.defaults, source, self.property_source)
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.properties.get().is_some()
    }

    pub fn render_context(&self, source: &dyn SchemaSource) -> Result<EntityContext, GenError> {
        let properties = self.properties(source)?;
        Ok(EntityContext::new(
            &self.provider,
            &self.entity,
            &self.defaults,
            self.kind,
            properties,
        ))
    }
}

/// What an artifact is rendered from.
#[derive(Debug)]
pub enum ArtifactContext {
    Project(ProjectContext),
    Registry(RegistryContext),
    Document(DocumentContext),
    Entity(EntityArtifactContext),
}

impl ArtifactContext {
    /// Produce the template context, resolving entity properties if needed.
    pub fn resolve(&self, source: &dyn SchemaSource) -> Result<RenderContext, GenError> {
        match self {
            ArtifactContext::Project(ctx) => Ok(RenderContext::Project(ctx.clone())),
            ArtifactContext::Registry(ctx) => Ok(RenderContext::Registry(ctx.clone())),
            ArtifactContext::Document(ctx) => Ok(RenderContext::Document(ctx.clone())),
            ArtifactContext::Entity(ctx) => ctx.render_context(source).map(RenderContext::Entity),
        }
    }
}

/// One planned output file.
#[derive(Debug)]
pub struct Artifact {
    /// Path relative to the output directory
    pub path: PathBuf,
    pub template: TemplateId,
    pub context: ArtifactContext,
}

/// Ordered artifacts of one run.
#[derive(Debug, Default)]
pub struct GenerationPlan {
    pub artifacts: Vec<Artifact>,
}

impl GenerationPlan {
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.artifacts.iter()
    }

    pub fn paths(&self) -> Vec<&PathBuf> {
        self.artifacts.iter().map(|a| &a.path).collect()
    }
}

/// Computes the artifacts of a run from the configured entities.
#[derive(Debug, Clone)]
pub struct ArtifactPlanner {
    provider: ProviderView,
    property_source: PropertySource,
    document: DocumentContext,
    document_extension: &'static str,
}

impl ArtifactPlanner {
    pub fn new(
        provider: ProviderView,
        property_source: PropertySource,
        document: &ApiDescription,
    ) -> Self {
        Self {
            provider,
            property_source,
            document: DocumentContext {
                document: document.raw().to_string(),
            },
            document_extension: document.format().extension(),
        }
    }

    /// Planner for a loaded configuration and API description.
    pub fn from_config(config: &ProviderConfiguration, api: &ApiDescription) -> Self {
        Self::new(
            ProviderView::new(&config.provider, &api.slug()),
            config.generator.property_source,
            api,
        )
    }

    pub fn provider(&self) -> &ProviderView {
        &self.provider
    }

    /// Fixed artifacts first, then each entity's resource and data source in
    /// declaration order.
    pub fn plan(&self, entities: &[EntityDescriptor], defaults: &ProviderDefaults) -> GenerationPlan {
        let defaults = Arc::new(defaults.clone());
        let project = ProjectContext {
            provider: self.provider.clone(),
            client: ClientView::new(&defaults),
        };
        let registry = RegistryContext {
            provider: self.provider.clone(),
            resources: entities
                .iter()
                .filter(|e| e.wants_resource())
                .map(EntityRef::new)
                .collect(),
            data_sources: entities
                .iter()
                .filter(|e| e.wants_data_source())
                .map(EntityRef::new)
                .collect(),
        };

        let provider_dir = PathBuf::from(PROVIDER_DIR);
        let mut artifacts = Vec::with_capacity(FIXED_ARTIFACT_COUNT + 2 * entities.len());
        artifacts.push(Artifact {
            path: PathBuf::from("Makefile"),
            template: TemplateId::Makefile,
            context: ArtifactContext::Project(project.clone()),
        });
        artifacts.push(Artifact {
            path: PathBuf::from("main.go"),
            template: TemplateId::MainGo,
            context: ArtifactContext::Project(project.clone()),
        });
        artifacts.push(Artifact {
            path: PathBuf::from("go.mod"),
            template: TemplateId::GoMod,
            context: ArtifactContext::Project(project.clone()),
        });
        artifacts.push(Artifact {
            path: provider_dir.join("shared.go"),
            template: TemplateId::SharedGo,
            context: ArtifactContext::Project(project),
        });
        artifacts.push(Artifact {
            path: provider_dir.join(format!("openapi.{}", self.document_extension)),
            template: TemplateId::ApiDocument,
            context: ArtifactContext::Document(self.document.clone()),
        });
        artifacts.push(Artifact {
            path: provider_dir.join("provider.go"),
            template: TemplateId::ProviderGo,
            context: ArtifactContext::Registry(registry),
        });

        for entity in entities {
            let shared = Arc::new(entity.clone());
            let kinds = [
                (EntityKind::Resource, entity.wants_resource()),
                (EntityKind::DataSource, entity.wants_data_source()),
            ];
            for (kind, wanted) in kinds {
                if !wanted {
                    continue;
                }
                artifacts.push(Artifact {
                    path: provider_dir.join(format!(
                        "{}_{}.go",
                        kind.file_prefix(),
                        to_snake_case(&entity.name)
                    )),
                    template: kind.template(),
                    context: ArtifactContext::Entity(EntityArtifactContext::new(
                        kind,
                        self.provider.clone(),
                        Arc::clone(&shared),
                        Arc::clone(&defaults),
                        self.property_source,
                    )),
                });
            }
        }

        GenerationPlan { artifacts }
    }
}
