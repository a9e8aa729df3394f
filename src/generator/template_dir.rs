use anyhow::Context;
use minijinja::{context, Environment, UndefinedBehavior};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use super::context::RenderContext;
use super::plan::TemplateId;
use super::templates::{BuiltinTemplates, TemplateRenderer};
use crate::error::RenderError;

/// Renderer that prefers user templates from a directory.
///
/// A file named after [`TemplateId::file_name`] in the directory replaces the
/// built-in template of that id and is rendered with minijinja. Sources are
/// parsed at render time, so syntax errors surface as [`RenderError`] for the
/// artifact that uses them. Undefined variables are errors.
#[derive(Debug, Clone, Default)]
pub struct TemplateDirRenderer {
    dir: PathBuf,
    overrides: BTreeMap<TemplateId, String>,
    fallback: BuiltinTemplates,
}

impl TemplateDirRenderer {
    /// Read every override present in `dir`.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        if !dir.is_dir() {
            anyhow::bail!("template directory {} does not exist", dir.display());
        }
        let mut overrides = BTreeMap::new();
        for id in TemplateId::ALL {
            let path = dir.join(id.file_name());
            if path.is_file() {
                let source = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read template {}", path.display()))?;
                info!(template = %id, path = %path.display(), "using template override");
                overrides.insert(id, source);
            }
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            overrides,
            fallback: BuiltinTemplates,
        })
    }

    /// Renderer with in-memory overrides.
    pub fn from_sources(overrides: impl IntoIterator<Item = (TemplateId, String)>) -> Self {
        Self {
            dir: PathBuf::new(),
            overrides: overrides.into_iter().collect(),
            fallback: BuiltinTemplates,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ids that have an override.
    pub fn overridden(&self) -> Vec<TemplateId> {
        self.overrides.keys().copied().collect()
    }
}

impl TemplateRenderer for TemplateDirRenderer {
    fn render(&self, template: TemplateId, ctx: &RenderContext) -> Result<Vec<u8>, RenderError> {
        let Some(source) = self.overrides.get(&template) else {
            return self.fallback.render(template, ctx);
        };
        let fail = |e: minijinja::Error| RenderError {
            template: template.file_name().to_string(),
            message: e.to_string(),
        };

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.add_template(template.file_name(), source).map_err(fail)?;
        let rendered = env
            .get_template(template.file_name())
            .and_then(|t| t.render(context! { ctx => ctx }))
            .map_err(fail)?;
        Ok(rendered.into_bytes())
    }
}
