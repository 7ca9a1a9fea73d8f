//! HTML generation from fragments

use crate::dom::{Fragment, NodeId, NodeKind};
use crate::parser::ast::{is_raw_text_element, is_void_element};

use super::HtmlConfig;

/// Serialize a fragment to HTML
pub fn render_html(fragment: &Fragment, config: &HtmlConfig) -> String {
    let mut writer = HtmlWriter::new(config);
    writer.write_children(fragment, fragment.root(), 0, false);
    writer.finish()
}

/// Escape text content
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

struct HtmlWriter<'c> {
    config: &'c HtmlConfig,
    out: String,
}

impl<'c> HtmlWriter<'c> {
    fn new(config: &'c HtmlConfig) -> Self {
        Self {
            config,
            out: String::new(),
        }
    }

    fn finish(self) -> String {
        if self.config.pretty_print {
            self.out.trim_end().to_string()
        } else {
            self.out
        }
    }

    fn skip(&self, fragment: &Fragment, id: NodeId) -> bool {
        match fragment.kind(id) {
            NodeKind::Text(text) => {
                (self.config.trim_whitespace_text || self.config.pretty_print)
                    && text.trim().is_empty()
            }
            _ => false,
        }
    }

    fn indent(&mut self, depth: usize) {
        if self.config.pretty_print {
            for _ in 0..depth {
                self.out.push_str(self.config.indent_unit());
            }
        }
    }

    fn newline(&mut self) {
        if self.config.pretty_print {
            self.out.push('\n');
        }
    }

    fn write_children(&mut self, fragment: &Fragment, parent: NodeId, depth: usize, raw: bool) {
        for &child in fragment.children(parent) {
            if self.skip(fragment, child) {
                continue;
            }
            self.indent(depth);
            self.write_node(fragment, child, depth, raw);
            self.newline();
        }
    }

    fn write_node(&mut self, fragment: &Fragment, id: NodeId, depth: usize, raw: bool) {
        match fragment.kind(id) {
            NodeKind::Fragment => self.write_children(fragment, id, depth, raw),
            NodeKind::Text(text) => {
                let text = if self.config.pretty_print {
                    text.trim()
                } else {
                    text.as_str()
                };
                if raw {
                    self.out.push_str(text);
                } else {
                    self.out.push_str(&escape_text(text));
                }
            }
            NodeKind::Comment(text) => {
                self.out.push_str("<!--");
                self.out.push_str(text);
                self.out.push_str("-->");
            }
            NodeKind::Element(data) => {
                self.out.push('<');
                self.out.push_str(&data.name);
                for attr in &data.attributes {
                    self.out.push(' ');
                    self.out.push_str(&attr.name);
                    self.out.push_str("=\"");
                    self.out.push_str(&escape_attribute(&attr.value));
                    self.out.push('"');
                }
                self.out.push('>');

                if is_void_element(&data.name) {
                    return;
                }

                let raw = is_raw_text_element(&data.name);
                let children = fragment.children(id);
                let inline = !self.config.pretty_print
                    || (children.len() <= 1
                        && children
                            .iter()
                            .all(|&c| matches!(fragment.kind(c), NodeKind::Text(_))));

                if inline {
                    for &child in children {
                        if !self.skip(fragment, child) {
                            self.write_node(fragment, child, depth, raw);
                        }
                    }
                } else {
                    self.newline();
                    self.write_children(fragment, id, depth + 1, raw);
                    self.indent(depth);
                }

                self.out.push_str("</");
                self.out.push_str(&data.name);
                self.out.push('>');
            }
        }
    }
}
