//! Template registry for storing and retrieving template definitions

use std::path::Path;

use indexmap::IndexMap;
use thiserror::Error;

use crate::dom::{Fragment, NodeId, NodeKind};
use crate::error::ParseError;

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found in registry
    #[error("template not found: {id:?}")]
    NotFound { id: String },

    /// Duplicate template definition
    #[error("duplicate template definition: {id}")]
    Duplicate { id: String },

    /// Circular partial reference
    #[error("circular template reference detected: {chain}")]
    CircularReference { chain: String },

    /// A `<template>` element without an id
    #[error("template element has no id attribute")]
    MissingId,

    /// Template markup failed to parse
    #[error("parse errors: {}", crate::format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error reading a template file
    #[error("failed to read template file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Vec<ParseError>> for TemplateError {
    fn from(errors: Vec<ParseError>) -> Self {
        TemplateError::Parse(errors)
    }
}

/// A stored template definition
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDefinition {
    /// Identifier placeholders refer to
    pub id: String,
    /// Template body; never mutated once registered
    pub content: Fragment,
}

impl TemplateDefinition {
    pub fn new(id: impl Into<String>, content: Fragment) -> Self {
        Self {
            id: id.into(),
            content,
        }
    }

    /// Parse a definition body from markup
    pub fn from_markup(id: impl Into<String>, source: &str) -> Result<Self, TemplateError> {
        Ok(Self::new(id, Fragment::from_markup(source)?))
    }
}

/// Registry for storing template definitions, in registration order
#[derive(Debug, Default, Clone)]
pub struct TemplateRegistry {
    templates: IndexMap<String, TemplateDefinition>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every `<template id>` element from a markup document
    pub fn from_markup(source: &str) -> Result<Self, TemplateError> {
        let fragment = Fragment::from_markup(source)?;
        let mut registry = Self::new();
        registry.collect_from_fragment(&fragment)?;
        Ok(registry)
    }

    /// Load a markup file and collect its templates
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_markup(&content)
    }

    /// Register every outermost `<template>` element of a fragment
    ///
    /// Templates nested in another template's body are part of that body
    /// and are not registered on their own.
    pub fn collect_from_fragment(&mut self, fragment: &Fragment) -> Result<usize, TemplateError> {
        let mut count = 0;
        for id in fragment.descendants(fragment.root()) {
            if !is_template(fragment, id) {
                continue;
            }
            let name = match fragment.attribute(id, "id") {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => return Err(TemplateError::MissingId),
            };

            let mut content = Fragment::new();
            let root = content.root();
            for child in content.import_children(fragment, id) {
                content.append_child(root, child);
            }
            self.register(TemplateDefinition::new(name, content))?;
            count += 1;
        }
        Ok(count)
    }

    /// Register a template definition
    pub fn register(&mut self, def: TemplateDefinition) -> Result<(), TemplateError> {
        if self.templates.contains_key(&def.id) {
            return Err(TemplateError::Duplicate { id: def.id });
        }
        self.templates.insert(def.id.clone(), def);
        Ok(())
    }

    /// Get a template by id
    pub fn get(&self, id: &str) -> Option<&TemplateDefinition> {
        self.templates.get(id)
    }

    /// Check if a template exists
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Registered ids, in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn is_template(fragment: &Fragment, id: NodeId) -> bool {
    matches!(fragment.kind(id), NodeKind::Element(data) if data.name == "template")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collect_templates() {
        let registry = TemplateRegistry::from_markup(
            r#"<body>
<template id="a"><p data-id="x"></p></template>
<div><template id="b">text</template></div>
</body>"#,
        )
        .expect("Should collect");

        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(
            registry.get("a").map(|d| d.content.to_html()),
            Some(r#"<p data-id="x"></p>"#.to_string())
        );
        assert_eq!(
            registry.get("b").map(|d| d.content.to_html()),
            Some("text".to_string())
        );
    }

    #[test]
    fn test_nested_template_stays_in_body() {
        let registry =
            TemplateRegistry::from_markup(r#"<template id="outer"><template id="inner"></template></template>"#)
                .expect("Should collect");
        assert!(registry.contains("outer"));
        assert!(!registry.contains("inner"));
    }

    #[test]
    fn test_duplicate_id() {
        let result = TemplateRegistry::from_markup(
            r#"<template id="a"></template><template id="a"></template>"#,
        );
        assert!(matches!(result, Err(TemplateError::Duplicate { id }) if id == "a"));
    }

    #[test]
    fn test_missing_id() {
        let result = TemplateRegistry::from_markup("<template></template>");
        assert!(matches!(result, Err(TemplateError::MissingId)));
    }

    #[test]
    fn test_parse_error_propagates() {
        let result = TemplateRegistry::from_markup("<template id=\"a\"><div></template>");
        assert!(matches!(result, Err(TemplateError::Parse(_))));
    }

    #[test]
    fn test_register_definition() {
        let mut registry = TemplateRegistry::new();
        registry
            .register(TemplateDefinition::from_markup("greeting", "<b>hi</b>").expect("Should parse"))
            .expect("Should register");
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("greeting"));
        assert!(registry.get("missing").is_none());
    }
}
