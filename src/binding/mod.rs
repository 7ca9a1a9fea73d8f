//! Data binding passes
//!
//! The binder resolves bindings scope by scope, the scope filter decides
//! which bindings belong to a scope, and the collapser removes guard markup
//! once binding is done.

mod binder;
mod collapse;
pub mod scope;

pub use binder::{Binder, ATTRIBUTES_KEY, CONTENT_KEY};
pub use collapse::collapse;
