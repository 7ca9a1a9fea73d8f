//! Markup tree parser using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parse template markup into a list of top-level nodes
pub fn parse(input: &str) -> Result<Vec<Spanned<MarkupNode>>, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    markup_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn markup_parser<'a, I>(
) -> impl Parser<'a, I, Vec<Spanned<MarkupNode>>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let node = recursive(|node| {
        // Consecutive text tokens (e.g. around a stray `<`) form one node
        let text = select! { Token::Text(s) => s }
            .repeated()
            .at_least(1)
            .collect::<Vec<_>>()
            .map_with(|parts, e| {
                Spanned::new(MarkupNode::Text(parts.concat()), span_range(&e.span()))
            });

        let comment = select! { Token::Comment(s) => MarkupNode::Comment(s) }
            .map_with(|n, e| Spanned::new(n, span_range(&e.span())));

        let leaf = select! { Token::OpenTag(tag) if tag.is_leaf() => tag }.map_with(|tag, e| {
            Spanned::new(
                MarkupNode::Element(ElementNode {
                    name: tag.name,
                    attributes: tag.attributes,
                    children: Vec::new(),
                }),
                span_range(&e.span()),
            )
        });

        let container = select! { Token::OpenTag(tag) if !tag.is_leaf() => tag }
            .then(node.repeated().collect::<Vec<_>>())
            .then(select! { Token::CloseTag(name) => name })
            .try_map(|((tag, children), close), span: SimpleSpan| {
                if tag.name == close {
                    Ok(Spanned::new(
                        MarkupNode::Element(ElementNode {
                            name: tag.name,
                            attributes: tag.attributes,
                            children,
                        }),
                        span_range(&span),
                    ))
                } else {
                    Err(Rich::custom(
                        span,
                        format!("closing tag </{}> does not match <{}>", close, tag.name),
                    ))
                }
            });

        choice((text, comment, leaf, container))
    });

    node.repeated().collect::<Vec<_>>().then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn element(node: &Spanned<MarkupNode>) -> &ElementNode {
        match &node.node {
            MarkupNode::Element(e) => e,
            other => panic!("Expected Element, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_elements() {
        let nodes = parse(r#"<ul data-id="list"><li>a</li><li>b</li></ul>"#).expect("Should parse");
        assert_eq!(nodes.len(), 1);

        let ul = element(&nodes[0]);
        assert_eq!(ul.name, "ul");
        assert_eq!(ul.attribute("data-id"), Some("list"));
        assert_eq!(ul.children.len(), 2);
        assert_eq!(
            element(&ul.children[1]).children[0].node,
            MarkupNode::Text("b".to_string())
        );
    }

    #[test]
    fn test_parse_void_and_self_closing() {
        let nodes = parse("<p>a<br>b<span/></p>").expect("Should parse");
        let p = element(&nodes[0]);
        assert_eq!(p.children.len(), 4);
        assert_eq!(element(&p.children[1]).name, "br");
        assert_eq!(element(&p.children[3]).name, "span");
        assert!(element(&p.children[3]).children.is_empty());
    }

    #[test]
    fn test_parse_text_and_comments_at_top_level() {
        let nodes = parse("before<!--c--><i>x</i>after").expect("Should parse");
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].node, MarkupNode::Text("before".to_string()));
        assert_eq!(nodes[1].node, MarkupNode::Comment("c".to_string()));
        assert_eq!(nodes[3].node, MarkupNode::Text("after".to_string()));
    }

    #[test]
    fn test_adjacent_text_merges() {
        let nodes = parse("<b>1 < 2</b>").expect("Should parse");
        let b = element(&nodes[0]);
        assert_eq!(b.children.len(), 1);
        assert_eq!(b.children[0].node, MarkupNode::Text("1 < 2".to_string()));
    }

    #[test]
    fn test_spans_cover_elements() {
        let source = "<a></a><b></b>";
        let nodes = parse(source).expect("Should parse");
        assert_eq!(nodes[0].span, 0..7);
        assert_eq!(nodes[1].span, 7..14);
    }

    #[test]
    fn test_mismatched_close_tag_error() {
        let result = parse("<div><span></div></span>");
        assert!(result.is_err());
    }

    #[test]
    fn test_unclosed_element_error() {
        let errors = parse("<div><p>text</p>").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_stray_close_tag_error() {
        assert!(parse("text</p>").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse("").expect("Should parse"), vec![]);
    }
}
