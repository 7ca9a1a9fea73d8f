//! Selector parsing and element matching
//!
//! Supports selector lists of compound selectors: an optional tag name or
//! `*`, followed by `#id`, `.class`, and attribute conditions
//! (`[a]`, `[a=v]`, `[a~=v]`, `[a|=v]`, `[a^=v]`, `[a$=v]`, `[a*=v]`).
//! Combinators are rejected.

use std::fmt;

use chumsky::error::RichReason;
use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;
use logos::Logos;
use thiserror::Error;

use super::tree::ElementRef;

/// Errors produced while parsing a selector
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SelectorError {
    /// Empty selector or empty entry in a selector list
    #[error("empty selector in '{selector}'")]
    Empty { selector: String },

    /// Token that does not fit the grammar
    #[error("unexpected {found} at offset {offset} in selector '{selector}'")]
    Unexpected {
        selector: String,
        offset: usize,
        found: String,
    },

    /// Descendant or child combinators
    #[error("combinators are not supported in selector '{selector}'")]
    Combinator { selector: String },
}

#[derive(Logos, Debug, Clone, PartialEq)]
enum SelectorToken {
    #[regex(r"[ \t\n\r]+")]
    Whitespace,

    #[regex(r"[a-zA-Z0-9_\-]+", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r#""[^"]*""#, |lex| { let s = lex.slice(); s[1..s.len() - 1].to_string() })]
    #[regex(r"'[^']*'", |lex| { let s = lex.slice(); s[1..s.len() - 1].to_string() })]
    Quoted(String),

    #[token("*")]
    Star,
    #[token("#")]
    Hash,
    #[token(".")]
    Dot,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token(",")]
    Comma,
    #[token(">")]
    Child,
    #[token("+")]
    Adjacent,

    // Attribute operators
    #[token("=")]
    Equals,
    #[token("~=")]
    Includes,
    #[token("|=")]
    DashMatch,
    #[token("^=")]
    Prefix,
    #[token("$=")]
    Suffix,
    #[token("*=")]
    Substring,
}

/// Comparison used by an attribute condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[a=v]` exact match
    Equals,
    /// `[a~=v]` whitespace-separated word
    Includes,
    /// `[a|=v]` exact or `v-` prefix
    DashMatch,
    /// `[a^=v]`
    Prefix,
    /// `[a$=v]`
    Suffix,
    /// `[a*=v]`
    Substring,
}

impl AttributeOperator {
    fn test(self, actual: &str, expected: &str) -> bool {
        match self {
            AttributeOperator::Equals => actual == expected,
            AttributeOperator::Includes => actual.split_whitespace().any(|w| w == expected),
            AttributeOperator::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttributeOperator::Prefix => !expected.is_empty() && actual.starts_with(expected),
            AttributeOperator::Suffix => !expected.is_empty() && actual.ends_with(expected),
            AttributeOperator::Substring => !expected.is_empty() && actual.contains(expected),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            AttributeOperator::Equals => "=",
            AttributeOperator::Includes => "~=",
            AttributeOperator::DashMatch => "|=",
            AttributeOperator::Prefix => "^=",
            AttributeOperator::Suffix => "$=",
            AttributeOperator::Substring => "*=",
        }
    }
}

/// A single condition inside a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Id(String),
    Class(String),
    Attribute {
        name: String,
        test: Option<(AttributeOperator, String)>,
    },
}

impl Condition {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        match self {
            Condition::Id(id) => element.attribute("id") == Some(id.as_str()),
            Condition::Class(class) => element
                .attribute("class")
                .is_some_and(|c| c.split_whitespace().any(|w| w == class)),
            Condition::Attribute { name, test } => match (element.attribute(name), test) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some((op, expected))) => op.test(actual, expected),
            },
        }
    }
}

/// Tag name (or universal) plus conditions, e.g. `li.even[data-id]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    pub tag: Option<String>,
    pub conditions: Vec<Condition>,
}

impl Compound {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        self.tag.as_deref().map_or(true, |t| t == element.name())
            && self.conditions.iter().all(|c| c.matches(element))
    }
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Parse a selector list such as `[data-id], [data-true]`
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        parse_selector(source)
    }

    /// Selector matching elements that carry any of the given attributes
    pub fn any_attribute<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            alternatives: names
                .iter()
                .map(|n| Compound {
                    tag: None,
                    conditions: vec![Condition::Attribute {
                        name: n.as_ref().to_ascii_lowercase(),
                        test: None,
                    }],
                })
                .collect(),
        }
    }

    pub fn alternatives(&self) -> &[Compound] {
        &self.alternatives
    }

    /// Whether the element matches any alternative of the list
    pub fn matches(&self, element: ElementRef<'_>) -> bool {
        self.alternatives.iter().any(|c| c.matches(&element))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, compound) in self.alternatives.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match &compound.tag {
                Some(tag) => f.write_str(tag)?,
                None if compound.conditions.is_empty() => f.write_str("*")?,
                None => {}
            }
            for condition in &compound.conditions {
                match condition {
                    Condition::Id(id) => write!(f, "#{}", id)?,
                    Condition::Class(class) => write!(f, ".{}", class)?,
                    Condition::Attribute { name, test: None } => write!(f, "[{}]", name)?,
                    Condition::Attribute {
                        name,
                        test: Some((op, value)),
                    } => write!(f, "[{}{}\"{}\"]", name, op.as_str(), value)?,
                }
            }
        }
        Ok(())
    }
}

/// Predicate deciding whether an element matches a selector
///
/// The engine only ever asks this question, so hosts with their own
/// selector engine can plug it in here.
pub trait SelectorMatcher {
    fn matches(&self, element: ElementRef<'_>, selector: &Selector) -> bool;
}

/// Matcher backed by [`Selector::matches`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CssMatcher;

impl SelectorMatcher for CssMatcher {
    fn matches(&self, element: ElementRef<'_>, selector: &Selector) -> bool {
        selector.matches(element)
    }
}

/// Lex, check for empty entries, then run the grammar
fn parse_selector(source: &str) -> Result<Selector, SelectorError> {
    let mut tokens = Vec::new();
    for (tok, span) in SelectorToken::lexer(source).spanned() {
        match tok {
            Ok(t) => tokens.push((t, SimpleSpan::from(span))),
            Err(()) => {
                return Err(SelectorError::Unexpected {
                    selector: source.to_string(),
                    offset: span.start,
                    found: format!("'{}'", &source[span]),
                })
            }
        }
    }

    let blank_entry = tokens
        .split(|(t, _)| *t == SelectorToken::Comma)
        .any(|entry| entry.iter().all(|(t, _)| *t == SelectorToken::Whitespace));
    if blank_entry {
        return Err(SelectorError::Empty {
            selector: source.to_string(),
        });
    }

    let len = source.len();
    let token_stream =
        Stream::from_iter(tokens.into_iter()).map((len..len).into(), |(t, s): (_, _)| (t, s));

    let complexes = selector_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| unexpected(source, errs.first()))?;

    if complexes.iter().any(|(_, combined)| *combined) {
        return Err(SelectorError::Combinator {
            selector: source.to_string(),
        });
    }
    Ok(Selector {
        alternatives: complexes.into_iter().map(|(compound, _)| compound).collect(),
    })
}

fn unexpected(source: &str, error: Option<&Rich<'_, SelectorToken>>) -> SelectorError {
    let (offset, found) = match error {
        Some(err) => {
            let found = match err.reason() {
                RichReason::ExpectedFound {
                    found: Some(tok), ..
                } => format!("{:?}", &**tok),
                RichReason::ExpectedFound { found: None, .. } => "end of selector".to_string(),
                RichReason::Custom(msg) => msg.to_string(),
            };
            (err.span().into_range().start, found)
        }
        None => (source.len(), "end of selector".to_string()),
    };
    SelectorError::Unexpected {
        selector: source.to_string(),
        offset,
        found,
    }
}

/// Selector list grammar
///
/// Each entry is a compound selector plus whether a combinator followed it,
/// so combinators parse and are rejected afterwards with their own error.
fn selector_parser<'a, I>(
) -> impl Parser<'a, I, Vec<(Compound, bool)>, extra::Err<Rich<'a, SelectorToken>>> + Clone
where
    I: ValueInput<'a, Token = SelectorToken, Span = SimpleSpan>,
{
    let ws = just(SelectorToken::Whitespace).repeated();
    let ident = select! { SelectorToken::Ident(s) => s };

    let operator = select! {
        SelectorToken::Equals => AttributeOperator::Equals,
        SelectorToken::Includes => AttributeOperator::Includes,
        SelectorToken::DashMatch => AttributeOperator::DashMatch,
        SelectorToken::Prefix => AttributeOperator::Prefix,
        SelectorToken::Suffix => AttributeOperator::Suffix,
        SelectorToken::Substring => AttributeOperator::Substring,
    };
    let value = select! {
        SelectorToken::Ident(v) => v,
        SelectorToken::Quoted(v) => v,
    };

    // [name], [name op value]; whitespace allowed around each part
    let attribute = ident
        .clone()
        .map(|name| name.to_ascii_lowercase())
        .padded_by(ws.clone())
        .then(operator.then(value.padded_by(ws.clone())).or_not())
        .delimited_by(
            just(SelectorToken::BracketOpen),
            just(SelectorToken::BracketClose),
        )
        .map(|(name, test)| Condition::Attribute { name, test });

    let condition = choice((
        just(SelectorToken::Hash).ignore_then(ident.clone()).map(Condition::Id),
        just(SelectorToken::Dot).ignore_then(ident.clone()).map(Condition::Class),
        attribute,
    ));

    let tag = choice((
        ident.map(|name| Some(name.to_ascii_lowercase())),
        just(SelectorToken::Star).to(None::<String>),
    ));

    let compound = choice((
        tag.then(condition.clone().repeated().collect::<Vec<_>>()),
        condition
            .repeated()
            .at_least(1)
            .collect::<Vec<_>>()
            .map(|conditions| (None, conditions)),
    ))
    .map(|(tag, conditions)| Compound { tag, conditions });

    let combinator = choice((
        ws.clone()
            .ignore_then(select! {
                SelectorToken::Child => (),
                SelectorToken::Adjacent => (),
            })
            .then_ignore(ws.clone()),
        just(SelectorToken::Whitespace)
            .repeated()
            .at_least(1)
            .ignored(),
    ));

    let complex = compound
        .clone()
        .then(
            combinator
                .ignore_then(compound)
                .repeated()
                .collect::<Vec<_>>(),
        )
        .map(|(first, rest)| (first, !rest.is_empty()));

    complex
        .separated_by(just(SelectorToken::Comma).padded_by(ws.clone()))
        .at_least(1)
        .collect::<Vec<_>>()
        .padded_by(ws)
        .then_ignore(end())
}
