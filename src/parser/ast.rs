//! Syntax tree types for template markup

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A single `name="value"` pair on an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parsed contents of an opening tag: `<div class="a">` or `<br/>`
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// Lower-cased tag name
    pub name: String,
    /// Attributes in source order, names lower-cased
    pub attributes: Vec<Attribute>,
    /// Whether the tag was written as `<name ... />`
    pub self_closing: bool,
}

/// HTML void elements, which never have children or a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Check whether a tag name is an HTML void element
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Elements whose content is character data up to the closing tag
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name)
}

impl Tag {
    /// A tag that opens no content: void elements and `<x/>`
    pub fn is_leaf(&self) -> bool {
        self.self_closing || is_void_element(&self.name)
    }
}

/// An element with its children
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Spanned<MarkupNode>>,
}

impl ElementNode {
    /// Look up an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

/// A node of parsed markup
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    /// `<name attr="v">...</name>`
    Element(ElementNode),
    /// Character data with entities already decoded
    Text(String),
    /// `<!-- ... -->`, stored without the delimiters
    Comment(String),
}
