use std::path::Path;

use anyhow::Context;
use minijinja::{path_loader, Environment, Value};

/// Renders named templates with a context value.
pub trait Renderer: Send + Sync {
    fn render(&self, template: &str, ctx: Value) -> anyhow::Result<String>;
}

const INDEX_HTML: &str = include_str!("../templates/index.html");

pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Templates come from `dir` when given, otherwise the bundled set is used.
    pub fn new(dir: Option<&Path>) -> anyhow::Result<Self> {
        let mut env = Environment::new();
        match dir {
            Some(dir) => {
                anyhow::ensure!(dir.is_dir(), "templates dir {} not found", dir.display());
                env.set_loader(path_loader(dir));
            }
            None => env
                .add_template("index.html", INDEX_HTML)
                .context("load bundled index.html")?,
        }
        Ok(Self { env })
    }
}

impl Renderer for TemplateEngine {
    fn render(&self, template: &str, ctx: Value) -> anyhow::Result<String> {
        let tmpl = self
            .env
            .get_template(template)
            .with_context(|| format!("template {}", template))?;
        let out = tmpl
            .render(ctx)
            .with_context(|| format!("render {}", template))?;
        Ok(out)
    }
}
