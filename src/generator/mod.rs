//! # Generator Module
//!
//! Plans, renders and writes the Terraform provider source tree.
//!
//! ## Flow
//!
//! 1. [`ArtifactPlanner`] lays out the fixed artifacts (`Makefile`, `main.go`,
//!    `go.mod`, shared helpers, API description copy, provider aggregator)
//!    followed by a resource and/or data source per configured entity.
//! 2. [`execute_plan`] resolves each artifact's context (entity attribute sets
//!    are computed lazily, once per artifact), renders it through a
//!    [`TemplateRenderer`] and hands the bytes to an [`ArtifactWriter`].
//! 3. The first failure stops the run. Files already written are left as is.
//!
//! ## Templates
//!
//! Built-in templates live in `templates/` and are compiled in with askama.
//! [`TemplateDirRenderer`] swaps any of them for a minijinja template from a
//! directory; every template sees one root variable, `ctx`.
//!
//! ## Output Layout
//!
//! ```text
//! Makefile
//! main.go
//! go.mod
//! internal/provider/shared.go
//! internal/provider/openapi.yaml
//! internal/provider/provider.go
//! internal/provider/resource_<entity>.go
//! internal/provider/data_source_<entity>.go
//! ```

mod context;
mod generate;
mod plan;
mod template_dir;
mod templates;
mod writer;


pub use context::{
    go_quote, ClientView, DocumentContext, EntityContext, EntityRef, EntityView, HeaderView, OperationView,
    OperationsView, ProjectContext, PropertyView, ProviderView, RegistryContext, RenderContext,
};
pub use generate::{
    execute_plan, generate_provider, render_artifact, sha256_hex, ArtifactSummary, GenerateOptions,
    GenerationReport, GeneratorInputs,
};
pub use plan::{
    Artifact, ArtifactContext, ArtifactPlanner, EntityArtifactContext, EntityKind, GenerationPlan, TemplateId,
    FIXED_ARTIFACT_COUNT,
};
pub use template_dir::TemplateDirRenderer;
pub use templates::{BuiltinTemplates, TemplateRenderer};
pub use writer::{ArtifactWriter, FsWriter, MemoryWriter};
