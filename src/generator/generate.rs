use anyhow::Context;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span};

use super::plan::{Artifact, ArtifactContext, ArtifactPlanner, GenerationPlan, TemplateId};
use super::template_dir::TemplateDirRenderer;
use super::templates::{BuiltinTemplates, TemplateRenderer};
use super::writer::{ArtifactWriter, FsWriter, MemoryWriter};
use crate::config::{load_provider_config, ProviderConfiguration};
use crate::error::GenError;
use crate::openapi::{ApiDescription, SchemaSource};

/// One written artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub path: PathBuf,
    pub template: TemplateId,
    pub bytes: usize,
    /// Hex SHA-256 of the contents
    pub sha256: String,
}

/// Outcome of a run, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub artifacts: Vec<ArtifactSummary>,
}

impl GenerationReport {
    pub fn total_bytes(&self) -> usize {
        self.artifacts.iter().map(|a| a.bytes).sum()
    }
}

/// Hex SHA-256 digest of `contents`.
pub fn sha256_hex(contents: &[u8]) -> String {
    Sha256::digest(contents)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Resolve and render a single artifact.
pub fn render_artifact(
    artifact: &Artifact,
    source: &dyn SchemaSource,
    renderer: &dyn TemplateRenderer,
) -> Result<Vec<u8>, GenError> {
    let ctx = artifact.context.resolve(source)?;
    renderer
        .render(artifact.template, &ctx)
        .map_err(|error| GenError::Render {
            artifact: artifact.path.clone(),
            error,
        })
}

/// Render and write every artifact of `plan` in order.
///
/// The first failure stops the run; artifacts written before it stay written.
pub fn execute_plan(
    plan: &GenerationPlan,
    source: &dyn SchemaSource,
    renderer: &dyn TemplateRenderer,
    writer: &mut dyn ArtifactWriter,
) -> Result<GenerationReport, GenError> {
    let mut report = GenerationReport::default();
    for artifact in plan.iter() {
        let span = info_span!("artifact", path = %artifact.path.display(), template = %artifact.template);
        let _enter = span.enter();

        let contents = render_artifact(artifact, source, renderer)?;
        writer.write(&artifact.path, &contents)?;
        let summary = ArtifactSummary {
            path: artifact.path.clone(),
            template: artifact.template,
            bytes: contents.len(),
            sha256: sha256_hex(&contents),
        };
        info!(bytes = summary.bytes, sha256 = %summary.sha256, "wrote artifact");
        report.artifacts.push(summary);
    }
    Ok(report)
}

/// Both loaded inputs of a run.
#[derive(Debug, Clone)]
pub struct GeneratorInputs {
    pub config: ProviderConfiguration,
    pub api: ApiDescription,
}

impl GeneratorInputs {
    /// Load and validate the API description and the provider configuration.
    pub fn load(open_api: &Path, provider_spec: &Path) -> anyhow::Result<Self> {
        let config = load_provider_config(provider_spec)?;
        let api = ApiDescription::load(open_api)?;
        Ok(Self { config, api })
    }

    pub fn planner(&self) -> ArtifactPlanner {
        ArtifactPlanner::from_config(&self.config, &self.api)
    }

    pub fn plan(&self) -> GenerationPlan {
        self.planner()
            .plan(&self.config.resources, &self.config.global)
    }

    /// Resolve the properties of every planned entity artifact without rendering.
    ///
    /// Returns `(artifact path, attribute count)` pairs.
    pub fn check(&self) -> Result<Vec<(PathBuf, usize)>, GenError> {
        let plan = self.plan();
        let mut counts = Vec::new();
        for artifact in plan.iter() {
            if let ArtifactContext::Entity(entity) = &artifact.context {
                let properties = entity.properties(&self.api)?;
                debug!(path = %artifact.path.display(), properties = properties.len(), "entity resolved");
                counts.push((artifact.path.clone(), properties.len()));
            }
        }
        Ok(counts)
    }
}

/// Options of a `generate` run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub open_api: PathBuf,
    pub provider_spec: PathBuf,
    pub output_directory: PathBuf,
    /// Directory with template overrides
    pub template_dir: Option<PathBuf>,
    /// Render everything but write nothing
    pub dry_run: bool,
}

/// Load inputs, plan, render and write the provider source tree.
pub fn generate_provider(options: &GenerateOptions) -> anyhow::Result<GenerationReport> {
    let inputs = GeneratorInputs::load(&options.open_api, &options.provider_spec)?;
    let plan = inputs.plan();
    info!(
        artifacts = plan.len(),
        entities = inputs.config.resources.len(),
        output = %options.output_directory.display(),
        dry_run = options.dry_run,
        "generating provider"
    );

    let renderer: Box<dyn TemplateRenderer> = match &options.template_dir {
        Some(dir) => Box::new(TemplateDirRenderer::load(dir)?),
        None => Box::new(BuiltinTemplates),
    };

    let report = if options.dry_run {
        let mut writer = MemoryWriter::new();
        execute_plan(&plan, &inputs.api, renderer.as_ref(), &mut writer)
    } else {
        let mut writer = FsWriter::new(&options.output_directory);
        execute_plan(&plan, &inputs.api, renderer.as_ref(), &mut writer)
    }
    .with_context(|| {
        format!(
            "Failed to generate provider into {}",
            options.output_directory.display()
        )
    })?;

    info!(
        artifacts = report.artifacts.len(),
        bytes = report.total_bytes(),
        "generation finished"
    );
    Ok(report)
}
