//! Arena-backed markup tree
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`].
//! Each node owns the list of its children and records its parent, so a
//! subtree can be moved, cloned, or detached without shared ownership.
//! Detached nodes stay in the arena until the fragment is compacted with
//! [`Fragment::deep_clone`].

use crate::parser::ast::{Attribute, MarkupNode, Spanned};
use crate::parser::parse;
use crate::ParseError;

use super::selector::{Selector, SelectorMatcher};

/// Handle to a node inside a [`Fragment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Tag name and attributes of an element node
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl ElementData {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(pos).value)
    }
}

/// What a node is
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Container for a list of top-level nodes (the arena root)
    Fragment,
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Borrowed view of an element node
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    fragment: &'a Fragment,
    id: NodeId,
    data: &'a ElementData,
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.data.name
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.data.attribute(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.data.has_attribute(name)
    }

    pub fn attributes(&self) -> &'a [Attribute] {
        &self.data.attributes
    }

    /// The enclosing element, if the parent is an element
    pub fn parent_element(&self) -> Option<ElementRef<'a>> {
        self.fragment
            .parent(self.id)
            .and_then(|p| self.fragment.element(p))
    }

    pub fn fragment(&self) -> &'a Fragment {
        self.fragment
    }
}

/// An owned, mutable tree of markup nodes
#[derive(Debug, Clone)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Default for Fragment {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural equality of the trees reachable from the roots
impl PartialEq for Fragment {
    fn eq(&self, other: &Self) -> bool {
        self.same_subtree(self.root(), other, other.root())
    }
}

impl Fragment {
    /// Create an empty fragment containing only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Fragment)],
        }
    }

    /// Parse markup into a fragment
    pub fn from_markup(source: &str) -> Result<Self, Vec<ParseError>> {
        let nodes = parse(source)?;
        Ok(Self::from_nodes(&nodes))
    }

    /// Build a fragment from parsed markup nodes
    pub fn from_nodes(nodes: &[Spanned<MarkupNode>]) -> Self {
        let mut fragment = Self::new();
        let root = fragment.root();
        for node in nodes {
            fragment.append_markup(root, &node.node);
        }
        fragment
    }

    fn append_markup(&mut self, parent: NodeId, node: &MarkupNode) {
        let id = match node {
            MarkupNode::Element(el) => {
                let id = self.create_element(&el.name, el.attributes.clone());
                for child in &el.children {
                    self.append_markup(id, &child.node);
                }
                id
            }
            MarkupNode::Text(text) => self.create_text(text.clone()),
            MarkupNode::Comment(text) => self.push(NodeKind::Comment(text.clone())),
        };
        self.append_child(parent, id);
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    /// The fragment root; never an element and never detached
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena, including detached ones
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// View a node as an element
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(ElementRef {
                fragment: self,
                id,
                data,
            }),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(data) => data.attribute(name),
            _ => None,
        }
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set an attribute on an element; other node kinds are left alone
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(data) = self.element_mut(id) {
            data.set_attribute(name, value);
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)?.remove_attribute(name)
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str, attributes: Vec<Attribute>) -> NodeId {
        self.push(NodeKind::Element(ElementData {
            name: name.to_string(),
            attributes,
        }))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    /// Whether `id` is `ancestor` or lies inside it
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Whether the node is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root(), id)
    }

    /// Remove a node (with its subtree) from its parent
    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(!self.is_inclusive_ancestor(child, parent));
        self.remove(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `new` into `parent` right before `reference`
    ///
    /// Appends when `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, new: NodeId, reference: NodeId) {
        debug_assert!(!self.is_inclusive_ancestor(new, parent));
        self.remove(new);
        let children = &mut self.nodes[parent.0].children;
        let index = children
            .iter()
            .position(|&c| c == reference)
            .unwrap_or(children.len());
        children.insert(index, new);
        self.nodes[new.0].parent = Some(parent);
    }

    /// Replace a node by a sequence of nodes, in order
    ///
    /// A detached node is left as is.
    pub fn replace_with(&mut self, id: NodeId, replacements: &[NodeId]) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        for &new in replacements {
            self.insert_before(parent, new, id);
        }
        self.remove(id);
    }

    /// Splice a node's children into its place and drop the node itself
    pub fn replace_with_children(&mut self, id: NodeId) {
        let children = self.nodes[id.0].children.clone();
        self.replace_with(id, &children);
    }

    /// Detach every child of a node
    pub fn clear_children(&mut self, id: NodeId) {
        for child in std::mem::take(&mut self.nodes[id.0].children) {
            self.nodes[child.0].parent = None;
        }
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Comment(_) => {}
            NodeKind::Element(_) | NodeKind::Fragment => {
                for &child in &self.nodes[id.0].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Replace all children with a single text node (none for empty text)
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if let NodeKind::Text(existing) | NodeKind::Comment(existing) = &mut self.nodes[id.0].kind
        {
            *existing = text.to_string();
            return;
        }
        self.clear_children(id);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(id, text_node);
        }
    }

    /// Deep-copy a node into this arena; the copy is detached
    pub fn clone_node(&mut self, id: NodeId) -> NodeId {
        let kind = self.nodes[id.0].kind.clone();
        let copy = self.push(kind);
        let children = self.nodes[id.0].children.clone();
        for child in children {
            let child_copy = self.clone_node(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Deep-copy a node from another fragment into this arena, detached
    pub fn import(&mut self, other: &Fragment, id: NodeId) -> NodeId {
        let copy = self.push(other.kind(id).clone());
        for &child in other.children(id) {
            let child_copy = self.import(other, child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Deep-copy the children of a node in another fragment, detached
    pub fn import_children(&mut self, other: &Fragment, id: NodeId) -> Vec<NodeId> {
        other
            .children(id)
            .iter()
            .map(|&child| self.import(other, child))
            .collect()
    }

    /// Copy of everything reachable from the root, without detached nodes
    pub fn deep_clone(&self) -> Fragment {
        let mut copy = Fragment::new();
        let root = copy.root();
        for child in copy.import_children(self, self.root()) {
            copy.append_child(root, child);
        }
        copy
    }

    /// Descendants of `scope` in document order, excluding `scope` itself
    ///
    /// The content of a nested `<template>` element is inert and is not
    /// visited; the template element itself is.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if !matches!(self.kind(id), NodeKind::Element(data) if data.name == "template") {
                stack.extend(self.children(id).iter().rev());
            }
        }
        out
    }

    /// Descendant elements of `scope` matching `selector`, in document order
    pub fn query_all<M: SelectorMatcher + ?Sized>(
        &self,
        scope: NodeId,
        selector: &Selector,
        matcher: &M,
    ) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| {
                self.element(id)
                    .is_some_and(|el| matcher.matches(el, selector))
            })
            .collect()
    }

    /// First descendant element of `scope` matching `selector`
    pub fn query_first<M: SelectorMatcher + ?Sized>(
        &self,
        scope: NodeId,
        selector: &Selector,
        matcher: &M,
    ) -> Option<NodeId> {
        self.descendants(scope).into_iter().find(|&id| {
            self.element(id)
                .is_some_and(|el| matcher.matches(el, selector))
        })
    }

    fn same_subtree(&self, id: NodeId, other: &Fragment, other_id: NodeId) -> bool {
        let (children, other_children) = (self.children(id), other.children(other_id));
        self.kind(id) == other.kind(other_id)
            && children.len() == other_children.len()
            && children
                .iter()
                .zip(other_children)
                .all(|(&a, &b)| self.same_subtree(a, other, b))
    }

    /// Serialize with the default HTML settings
    pub fn to_html(&self) -> String {
        crate::renderer::render_html(self, &crate::renderer::HtmlConfig::default())
    }
}
