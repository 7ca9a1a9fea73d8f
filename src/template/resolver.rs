//! Partial inlining: replaces placeholder elements by template content

use tracing::trace;

use crate::config::TempleConfig;
use crate::dom::{Fragment, NodeId, Selector, SelectorMatcher};

use super::registry::{TemplateError, TemplateRegistry};

/// Chain of templates being inlined, for cycle detection
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    chain: Vec<String>,
}

impl ResolutionContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for inlining into the template with the given id
    pub fn rooted(id: impl Into<String>) -> Self {
        Self {
            chain: vec![id.into()],
        }
    }

    /// Check if a template is currently being inlined
    pub fn is_resolving(&self, id: &str) -> bool {
        self.chain.iter().any(|entry| entry == id)
    }

    /// Templates being inlined, outermost first
    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    fn enter(&mut self, id: &str) -> Result<(), TemplateError> {
        if self.is_resolving(id) {
            let mut chain = self.chain.clone();
            chain.push(id.to_string());
            return Err(TemplateError::CircularReference {
                chain: chain.join(" -> "),
            });
        }
        self.chain.push(id.to_string());
        Ok(())
    }

    fn leave(&mut self) {
        self.chain.pop();
    }

    /// Inline every placeholder under `scope`, returning how many were replaced
    pub fn inline<M: SelectorMatcher + ?Sized>(
        &mut self,
        fragment: &mut Fragment,
        scope: NodeId,
        registry: &TemplateRegistry,
        config: &TempleConfig,
        matcher: &M,
    ) -> Result<usize, TemplateError> {
        let selector = config.partial_selector();
        self.inline_within(fragment, scope, registry, config, &selector, matcher)
    }

    fn inline_within<M: SelectorMatcher + ?Sized>(
        &mut self,
        fragment: &mut Fragment,
        scope: NodeId,
        registry: &TemplateRegistry,
        config: &TempleConfig,
        selector: &Selector,
        matcher: &M,
    ) -> Result<usize, TemplateError> {
        let mut inlined = 0;

        for placeholder in fragment.query_all(scope, selector, matcher) {
            // Gone with an outer placeholder that was already replaced
            if !fragment.is_inclusive_ancestor(scope, placeholder) {
                continue;
            }

            let reference = fragment
                .attribute(placeholder, &config.partial_attribute)
                .unwrap_or_default()
                .to_string();
            let definition = registry
                .get(&reference)
                .ok_or_else(|| TemplateError::NotFound {
                    id: reference.clone(),
                })?;

            self.enter(&reference)?;
            trace!(template = %reference, depth = self.chain.len(), "inlining partial");

            // Resolve the copied content before grafting it
            let holder = fragment.create_element("template", Vec::new());
            for child in fragment.import_children(&definition.content, definition.content.root()) {
                fragment.append_child(holder, child);
            }
            inlined += self.inline_within(fragment, holder, registry, config, selector, matcher)?;
            self.leave();

            let content = fragment.children(holder).to_vec();
            fragment.replace_with(placeholder, &content);
            inlined += 1;
        }

        Ok(inlined)
    }
}

/// Replace every placeholder under `scope` by the content it references
///
/// Placeholders inside inlined content are resolved too. A reference to an
/// unknown template fails with [`TemplateError::NotFound`]; a template that
/// ends up including itself fails with [`TemplateError::CircularReference`].
pub fn inline_partials<M: SelectorMatcher + ?Sized>(
    fragment: &mut Fragment,
    scope: NodeId,
    registry: &TemplateRegistry,
    config: &TempleConfig,
    matcher: &M,
) -> Result<usize, TemplateError> {
    ResolutionContext::new().inline(fragment, scope, registry, config, matcher)
}
