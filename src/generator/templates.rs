use askama::Template;

use super::context::{DocumentContext, EntityContext, ProjectContext, RegistryContext, RenderContext};
use super::plan::TemplateId;
use crate::error::RenderError;

/// Turns a template identifier and a context into file contents.
///
/// Implementations must be referentially transparent: the same inputs always
/// yield the same bytes.
pub trait TemplateRenderer {
    fn render(&self, template: TemplateId, context: &RenderContext) -> Result<Vec<u8>, RenderError>;
}

/// Template data for the generated `Makefile`
#[derive(Template)]
#[template(path = "Makefile.txt", escape = "none")]
pub struct MakefileTemplate<'a> {
    pub ctx: &'a ProjectContext,
}

/// Template data for the generated `main.go`
#[derive(Template)]
#[template(path = "main.go.txt", escape = "none")]
pub struct MainGoTemplate<'a> {
    pub ctx: &'a ProjectContext,
}

/// Template data for the generated `go.mod`
#[derive(Template)]
#[template(path = "go.mod.txt", escape = "none")]
pub struct GoModTemplate<'a> {
    pub ctx: &'a ProjectContext,
}

/// Template data for the shared HTTP and conversion helpers
#[derive(Template)]
#[template(path = "shared.go.txt", escape = "none")]
pub struct SharedGoTemplate<'a> {
    pub ctx: &'a ProjectContext,
}

/// Verbatim copy of the API description
#[derive(Template)]
#[template(source = "{{ ctx.document }}", ext = "txt", escape = "none")]
pub struct ApiDocumentTemplate<'a> {
    pub ctx: &'a DocumentContext,
}

/// Template data for the provider aggregator
#[derive(Template)]
#[template(path = "provider.go.txt", escape = "none")]
pub struct ProviderGoTemplate<'a> {
    pub ctx: &'a RegistryContext,
}

/// Template data for one managed resource
#[derive(Template)]
#[template(path = "resource.go.txt", escape = "none")]
pub struct ResourceTemplate<'a> {
    pub ctx: &'a EntityContext,
}

/// Template data for one data source
#[derive(Template)]
#[template(path = "data_source.go.txt", escape = "none")]
pub struct DataSourceTemplate<'a> {
    pub ctx: &'a EntityContext,
}

/// Renderer backed by the askama templates compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl TemplateRenderer for BuiltinTemplates {
    fn render(&self, template: TemplateId, context: &RenderContext) -> Result<Vec<u8>, RenderError> {
        let rendered = match (template, context) {
            (TemplateId::Makefile, RenderContext::Project(ctx)) => MakefileTemplate { ctx }.render(),
            (TemplateId::MainGo, RenderContext::Project(ctx)) => MainGoTemplate { ctx }.render(),
            (TemplateId::GoMod, RenderContext::Project(ctx)) => GoModTemplate { ctx }.render(),
            (TemplateId::SharedGo, RenderContext::Project(ctx)) => SharedGoTemplate { ctx }.render(),
            (TemplateId::ApiDocument, RenderContext::Document(ctx)) => {
                ApiDocumentTemplate { ctx }.render()
            }
            (TemplateId::ProviderGo, RenderContext::Registry(ctx)) => {
                ProviderGoTemplate { ctx }.render()
            }
            (TemplateId::Resource, RenderContext::Entity(ctx)) => ResourceTemplate { ctx }.render(),
            (TemplateId::DataSource, RenderContext::Entity(ctx)) => {
                DataSourceTemplate { ctx }.render()
            }
            (template, context) => {
                return Err(RenderError {
                    template: template.file_name().to_string(),
                    message: format!(
                        "template cannot be rendered with a {} context",
                        context.variant()
                    ),
                })
            }
        };
        rendered.map(String::into_bytes).map_err(|e| RenderError {
            template: template.file_name().to_string(),
            message: e.to_string(),
        })
    }
}
