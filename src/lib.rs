//! Temple - declarative HTML templates bound to data
//!
//! Templates are plain markup annotated with binding attributes:
//!
//! - `data-id="key"` fills an element from `data[key]`
//! - `data-true="key"` keeps an element only when `key` is present
//! - `data-false="key"` keeps an element only when `key` is absent
//! - `data-template="id"` is replaced by the template with that id
//!
//! Arrays repeat the bound element once per item and objects open a nested
//! scope, so the shape of the data drives the shape of the output.
//!
//! # Example
//!
//! ```rust
//! use temple::render;
//!
//! let html = render(
//!     r#"<template id="repos"><ul><li data-id="repo"></li></ul></template>"#,
//!     "repos",
//!     r#"{"repo": ["resque", "hub", "rip"]}"#,
//! ).unwrap();
//! assert_eq!(
//!     html,
//!     r#"<ul><li data-id="repo">resque</li><li data-id="repo">hub</li><li data-id="repo">rip</li></ul>"#
//! );
//! ```

pub mod binding;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod parser;
pub mod renderer;
pub mod template;
pub mod value;

pub use config::{ConfigError, TempleConfig};
pub use dom::{CssMatcher, Fragment, NodeId, Selector, SelectorMatcher};
pub use engine::TemplateEngine;
pub use error::ParseError;
pub use renderer::{render_html, HtmlConfig};
pub use template::{TemplateDefinition, TemplateError, TemplateRegistry};
pub use value::{classify, lookup, DataError, Value, ValueKind};

use thiserror::Error;

/// Errors that can occur while rendering a template
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template lookup or partial inlining failed
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// An `html` value did not parse as markup
    #[error("invalid html content: {}", format_parse_errors(.0))]
    Content(Vec<ParseError>),

    /// Data could not be read
    #[error(transparent)]
    Data(#[from] DataError),
}

pub(crate) fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Render a template from a markup document against JSON data
///
/// `markup` is scanned for `<template id>` elements, `template_id` picks the
/// one to render, and the result is serialized with default settings.
pub fn render(markup: &str, template_id: &str, json: &str) -> Result<String, RenderError> {
    render_with_config(markup, template_id, json, TempleConfig::default())
}

/// Render with custom binding attribute names
///
/// # Example
///
/// ```rust
/// use temple::{render_with_config, TempleConfig};
///
/// let config = TempleConfig::new().with_id_attribute("x-text");
/// let html = render_with_config(
///     r#"<template id="t"><b x-text="name"></b></template>"#,
///     "t",
///     r#"{"name": "Ann"}"#,
///     config,
/// ).unwrap();
/// assert_eq!(html, r#"<b x-text="name">Ann</b>"#);
/// ```
pub fn render_with_config(
    markup: &str,
    template_id: &str,
    json: &str,
    config: TempleConfig,
) -> Result<String, RenderError> {
    let registry = TemplateRegistry::from_markup(markup)?;
    let data = Value::from_json(json)?;
    let mut engine = TemplateEngine::new(&registry, template_id)?.with_config(config);
    let output = engine.render(&data)?;
    Ok(output.to_html())
}
