//! Owned markup tree and selector matching
//!
//! [`Fragment`] stands in for a browser document fragment: it can be parsed
//! from markup, cloned, queried with a [`Selector`], and rewritten in place.

pub mod selector;
mod tree;

pub use selector::{CssMatcher, Selector, SelectorError, SelectorMatcher};
pub use tree::{ElementData, ElementRef, Fragment, NodeId, NodeKind};
