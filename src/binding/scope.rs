//! Scope filter: which binding elements belong to the current scope

use crate::dom::{Fragment, NodeId, Selector, SelectorMatcher};

/// Candidates that sit inside another matching element below `scope_root`
///
/// The walk starts at each candidate's parent and stops at `scope_root` or
/// at the top of the tree.
pub fn nested_elements<M: SelectorMatcher + ?Sized>(
    fragment: &Fragment,
    candidates: &[NodeId],
    selector: &Selector,
    scope_root: NodeId,
    matcher: &M,
) -> Vec<NodeId> {
    candidates
        .iter()
        .copied()
        .filter(|&candidate| {
            let mut current = fragment.parent(candidate);
            while let Some(ancestor) = current {
                if ancestor == scope_root {
                    return false;
                }
                if fragment
                    .element(ancestor)
                    .is_some_and(|el| matcher.matches(el, selector))
                {
                    return true;
                }
                current = fragment.parent(ancestor);
            }
            false
        })
        .collect()
}

/// `all` without the nodes in `excluded`, order preserved
pub fn complement(all: &[NodeId], excluded: &[NodeId]) -> Vec<NodeId> {
    all.iter()
        .copied()
        .filter(|id| !excluded.contains(id))
        .collect()
}

/// Bindings under `scope_root` whose nearest enclosing binding is the root
pub fn top_level_bindings<M: SelectorMatcher + ?Sized>(
    fragment: &Fragment,
    scope_root: NodeId,
    selector: &Selector,
    matcher: &M,
) -> Vec<NodeId> {
    let all = fragment.query_all(scope_root, selector, matcher);
    let nested = nested_elements(fragment, &all, selector, scope_root, matcher);
    complement(&all, &nested)
}
