//! Template engine: inline partials once, then bind and collapse per render

use tracing::debug;

use crate::binding::{collapse, Binder};
use crate::config::TempleConfig;
use crate::dom::{CssMatcher, Fragment, SelectorMatcher};
use crate::template::{ResolutionContext, TemplateDefinition, TemplateError, TemplateRegistry};
use crate::value::Value;
use crate::RenderError;

/// Renders one template against data, any number of times
///
/// The engine keeps a working copy of the template. Partials are inlined into
/// it on the first render; each render then binds a fresh copy, so the
/// working copy is never touched by data.
///
/// # Example
///
/// ```rust
/// use temple::{TemplateEngine, TemplateRegistry, Value};
///
/// let registry = TemplateRegistry::from_markup(
///     r#"<template id="hello"><p data-id="name"></p></template>"#,
/// ).unwrap();
/// let mut engine = TemplateEngine::new(&registry, "hello").unwrap();
/// let data = Value::from_json(r#"{"name": "Ann"}"#).unwrap();
///
/// let output = engine.render(&data).unwrap();
/// assert_eq!(output.to_html(), r#"<p data-id="name">Ann</p>"#);
/// ```
#[derive(Debug)]
pub struct TemplateEngine<'r, M: SelectorMatcher = CssMatcher> {
    registry: &'r TemplateRegistry,
    id: String,
    template: Fragment,
    ready: bool,
    config: TempleConfig,
    matcher: M,
    output: Option<Fragment>,
}

impl<'r> TemplateEngine<'r, CssMatcher> {
    /// Engine for the registered template with the given id
    pub fn new(registry: &'r TemplateRegistry, id: &str) -> Result<Self, TemplateError> {
        let definition = registry.get(id).ok_or_else(|| TemplateError::NotFound {
            id: id.to_string(),
        })?;
        Ok(Self::from_definition(registry, definition))
    }

    /// Engine for a definition; partials still resolve through `registry`
    pub fn from_definition(registry: &'r TemplateRegistry, definition: &TemplateDefinition) -> Self {
        debug!(template = %definition.id, "creating engine");
        Self {
            registry,
            id: definition.id.clone(),
            template: definition.content.deep_clone(),
            ready: false,
            config: TempleConfig::default(),
            matcher: CssMatcher,
            output: None,
        }
    }
}

impl<'r, M: SelectorMatcher> TemplateEngine<'r, M> {
    /// Use different binding attribute names
    pub fn with_config(mut self, config: TempleConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a different selector matcher
    pub fn with_matcher<N: SelectorMatcher>(self, matcher: N) -> TemplateEngine<'r, N> {
        TemplateEngine {
            registry: self.registry,
            id: self.id,
            template: self.template,
            ready: self.ready,
            config: self.config,
            matcher,
            output: self.output,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &TempleConfig {
        &self.config
    }

    /// Working copy of the template (with partials once prepared)
    pub fn template(&self) -> &Fragment {
        &self.template
    }

    /// Whether partials have been inlined
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Result of the last successful render
    pub fn last_output(&self) -> Option<&Fragment> {
        self.output.as_ref()
    }

    /// Inline partials into the working copy, at most once
    ///
    /// On failure the working copy is left as it was.
    pub fn prepare(&mut self) -> Result<(), TemplateError> {
        if self.ready {
            return Ok(());
        }

        let mut working = self.template.clone();
        let root = working.root();
        let inlined = ResolutionContext::rooted(self.id.clone()).inline(
            &mut working,
            root,
            self.registry,
            &self.config,
            &self.matcher,
        )?;

        debug!(template = %self.id, inlined, "partials inlined");
        self.template = working.deep_clone();
        self.ready = true;
        Ok(())
    }

    /// Render the template against `data`
    ///
    /// The returned fragment belongs to the caller; a copy is kept for
    /// [`TemplateEngine::last_output`].
    pub fn render(&mut self, data: &Value) -> Result<Fragment, RenderError> {
        self.prepare()?;

        let mut output = self.template.clone();
        let root = output.root();
        Binder::new(&self.config, &self.matcher).bind(&mut output, root, data)?;

        if !self.config.leave_conditional_wrapper {
            collapse(&mut output, root, &self.config, &self.matcher);
        }

        let output = output.deep_clone();
        debug!(template = %self.id, nodes = output.arena_len(), "rendered");
        self.output = Some(output.clone());
        Ok(output)
    }
}
