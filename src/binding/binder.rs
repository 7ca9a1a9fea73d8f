//! Binds data values onto a fragment in place

use tracing::trace;

use crate::config::TempleConfig;
use crate::dom::{Fragment, NodeId, Selector, SelectorMatcher};
use crate::value::{lookup, Value};
use crate::RenderError;

use super::scope::top_level_bindings;

/// Reserved object key holding attribute values
pub const ATTRIBUTES_KEY: &str = "@";
/// Reserved object key holding markup content
pub const CONTENT_KEY: &str = "html";

/// Walks binding elements and rewrites them from data
///
/// Each call to [`Binder::bind`] handles the bindings of one scope; nested
/// bindings are reached when an object value recurses into its element.
pub struct Binder<'a, M: SelectorMatcher + ?Sized> {
    config: &'a TempleConfig,
    matcher: &'a M,
    selector: Selector,
}

impl<'a, M: SelectorMatcher + ?Sized> Binder<'a, M> {
    pub fn new(config: &'a TempleConfig, matcher: &'a M) -> Self {
        Self {
            config,
            matcher,
            selector: config.binding_selector(),
        }
    }

    /// Resolve the bindings of `parent`'s scope against `data`
    pub fn bind(
        &self,
        fragment: &mut Fragment,
        parent: NodeId,
        data: &Value,
    ) -> Result<(), RenderError> {
        for element in top_level_bindings(fragment, parent, &self.selector, self.matcher) {
            self.bind_element(fragment, element, data)?;
        }
        Ok(())
    }

    /// Whether the element is kept when its key is present
    fn wants_truth(&self, fragment: &Fragment, element: NodeId) -> bool {
        !fragment.has_attribute(element, &self.config.false_attribute)
    }

    fn key(&self, fragment: &Fragment, element: NodeId, wants_truth: bool) -> String {
        let key = if wants_truth {
            fragment
                .attribute(element, &self.config.true_attribute)
                .or_else(|| fragment.attribute(element, &self.config.id_attribute))
        } else {
            fragment.attribute(element, &self.config.false_attribute)
        };
        key.unwrap_or_default().to_string()
    }

    /// Only id bindings have their text replaced; guards keep their markup
    fn fills_text(&self, fragment: &Fragment, element: NodeId) -> bool {
        fragment.has_attribute(element, &self.config.id_attribute)
    }

    fn bind_element(
        &self,
        fragment: &mut Fragment,
        element: NodeId,
        data: &Value,
    ) -> Result<(), RenderError> {
        let wants_truth = self.wants_truth(fragment, element);
        let key = self.key(fragment, element, wants_truth);

        match (lookup(data, &key), wants_truth) {
            (Some(_), false) | (None, true) => {
                trace!(%key, wants_truth, "removing unmatched binding");
                fragment.remove(element);
                Ok(())
            }
            (None, false) => {
                trace!(%key, "keeping guard for absent key");
                self.bind(fragment, element, data)
            }
            (Some(present), true) => {
                trace!(%key, kind = %present.kind, "binding value");
                match present.value {
                    Value::Array(items) if self.fills_text(fragment, element) => {
                        self.expand(fragment, element, items, data)
                    }
                    Value::Object(_) => self.bind_object(fragment, element, present.value),
                    // Guards are never repeated
                    Value::Array(_) => self.bind(fragment, element, data),
                    scalar => self.bind_scalar(fragment, element, scalar, data),
                }
            }
        }
    }

    /// Replace the element by one copy per item, in item order
    fn expand(
        &self,
        fragment: &mut Fragment,
        element: NodeId,
        items: &[Value],
        data: &Value,
    ) -> Result<(), RenderError> {
        let Some(parent) = fragment.parent(element) else {
            return Ok(());
        };

        for item in items {
            let copy = fragment.clone_node(element);
            fragment.insert_before(parent, copy, element);
            match item {
                Value::Object(_) => self.bind_object(fragment, copy, item)?,
                scalar => self.bind_scalar(fragment, copy, scalar, data)?,
            }
        }
        trace!(count = items.len(), "expanded array binding");

        fragment.remove(element);
        Ok(())
    }

    fn bind_scalar(
        &self,
        fragment: &mut Fragment,
        element: NodeId,
        value: &Value,
        data: &Value,
    ) -> Result<(), RenderError> {
        if self.fills_text(fragment, element) {
            fragment.set_text_content(element, &value.to_text());
            Ok(())
        } else {
            self.bind(fragment, element, data)
        }
    }

    /// Apply `@` attributes and `html` content, then bind nested keys
    fn bind_object(
        &self,
        fragment: &mut Fragment,
        element: NodeId,
        value: &Value,
    ) -> Result<(), RenderError> {
        if let Some(Value::Object(attributes)) = value.get(ATTRIBUTES_KEY) {
            for (name, attr_value) in attributes {
                fragment.set_attribute(element, name, attr_value.to_text());
            }
        }

        if let Some(content) = value.get(CONTENT_KEY) {
            let markup = Fragment::from_markup(&content.to_text()).map_err(RenderError::Content)?;
            fragment.clear_children(element);
            for child in fragment.import_children(&markup, markup.root()) {
                fragment.append_child(element, child);
            }
        }

        self.bind(fragment, element, value)
    }
}
