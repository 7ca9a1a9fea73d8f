//! Template definitions and partial inlining
//!
//! Templates are collected from `<template id="...">` elements. A template
//! may pull in other templates through placeholder elements:
//!
//! ```text
//! <template id="names">
//!   <ul><li data-id="names"><div data-template="name"></div></li></ul>
//! </template>
//! <template id="name">
//!   <span data-id="name"><b data-id="pass"></b></span>
//! </template>
//! ```
//!
//! Placeholders are replaced by the referenced content, recursively, before
//! any data is bound.

mod registry;
mod resolver;

pub use registry::{TemplateDefinition, TemplateError, TemplateRegistry};
pub use resolver::{inline_partials, ResolutionContext};
