//! Strips guard elements that survived binding

use tracing::trace;

use crate::config::TempleConfig;
use crate::dom::{Fragment, NodeId, SelectorMatcher};

/// Unwrap every remaining true/false guard under `root`, keeping children
///
/// Returns the number of guards removed.
pub fn collapse<M: SelectorMatcher + ?Sized>(
    fragment: &mut Fragment,
    root: NodeId,
    config: &TempleConfig,
    matcher: &M,
) -> usize {
    let selector = config.conditional_selector();
    let mut count = 0;
    while let Some(guard) = fragment.query_first(root, &selector, matcher) {
        fragment.replace_with_children(guard);
        count += 1;
    }
    trace!(count, "collapsed conditional wrappers");
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::CssMatcher;
    use pretty_assertions::assert_eq;

    fn collapsed(source: &str) -> (String, usize) {
        let mut fragment = Fragment::from_markup(source).expect("Should parse");
        let root = fragment.root();
        let count = collapse(&mut fragment, root, &TempleConfig::default(), &CssMatcher);
        (fragment.to_html(), count)
    }

    #[test]
    fn test_unwraps_keeping_text_and_elements() {
        assert_eq!(
            collapsed(r#"<p>a</p><div data-true="x">one <b>two</b> three</div><p>z</p>"#),
            ("<p>a</p>one <b>two</b> three<p>z</p>".to_string(), 1)
        );
    }

    #[test]
    fn test_nested_guards() {
        assert_eq!(
            collapsed(r#"<div data-true="a"><span data-false="b"><i data-id="c">c</i></span></div>"#),
            (r#"<i data-id="c">c</i>"#.to_string(), 2)
        );
    }

    #[test]
    fn test_no_guards() {
        assert_eq!(
            collapsed(r#"<b data-id="x">x</b>"#),
            (r#"<b data-id="x">x</b>"#.to_string(), 0)
        );
    }
}
