//! HTML serializer for rendered fragments
//!
//! This module takes a Fragment and produces an HTML string.

pub mod config;
pub mod html;

pub use config::HtmlConfig;
pub use html::render_html;
