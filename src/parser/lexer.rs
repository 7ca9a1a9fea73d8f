//! Lexer for template markup using logos

use logos::{Lexer, Logos};

use super::ast::{is_raw_text_element, Attribute, Tag};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Markup declarations and processing instructions carry no content
    #[regex(r"<![a-zA-Z][^>]*>", logos::skip)]
    #[regex(r"<\?[^>]*>", logos::skip)]
    Declaration,

    #[token("<!--", comment)]
    Comment(String),

    #[regex(r#"<[a-zA-Z][a-zA-Z0-9:_\-]*([^>"']|"[^"]*"|'[^']*')*>"#, open_tag)]
    OpenTag(Tag),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9:_\-]*[ \t\r\n]*>", |lex| {
        let s = lex.slice();
        s[2..s.len() - 1].trim_end().to_ascii_lowercase()
    })]
    CloseTag(String),

    // A lone `<` that does not start a tag is ordinary text
    #[regex(r"[^<]+", |lex| decode_entities(lex.slice()))]
    #[token("<", |_| String::from("<"))]
    Text(String),
}

/// Tokens inside an opening tag, after the tag name
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
enum AttrToken {
    #[regex(r#"[^ \t\n\r\f"'>/=]+"#, |lex| lex.slice().to_string())]
    Word(String),

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, unquote)]
    #[regex(r"'[^']*'", unquote)]
    Quoted(String),

    #[token("/")]
    Slash,
}

/// Everything up to the first `-->`; unterminated comments are rejected
fn comment(lex: &mut Lexer<Token>) -> Option<String> {
    let end = lex.remainder().find("-->")?;
    let text = lex.remainder()[..end].to_string();
    lex.bump(end + 3);
    Some(text)
}

fn unquote(lex: &mut Lexer<AttrToken>) -> String {
    let s = lex.slice();
    decode_entities(&s[1..s.len() - 1])
}

fn open_tag(lex: &mut Lexer<Token>) -> Option<Tag> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let name_len = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-')))
        .unwrap_or(inner.len());
    let (name, rest) = inner.split_at(name_len);

    Some(Tag {
        name: name.to_ascii_lowercase(),
        attributes: parse_attributes(rest)?,
        self_closing: rest.trim_end().ends_with('/'),
    })
}

/// Parse the attribute list of an opening tag
///
/// Returns None for malformed lists such as `= "x"` without a name.
/// Repeated attribute names keep the first value.
fn parse_attributes(source: &str) -> Option<Vec<Attribute>> {
    let mut tokens = AttrToken::lexer(source).peekable();
    let mut attributes: Vec<Attribute> = Vec::new();

    while let Some(tok) = tokens.next() {
        match tok.ok()? {
            AttrToken::Word(name) => {
                let value = if tokens.peek() == Some(&Ok(AttrToken::Equals)) {
                    tokens.next();
                    match tokens.next() {
                        Some(Ok(AttrToken::Quoted(v))) => v,
                        Some(Ok(AttrToken::Word(v))) => decode_entities(&v),
                        _ => return None,
                    }
                } else {
                    String::new()
                };

                let name = name.to_ascii_lowercase();
                if !attributes.iter().any(|a| a.name == name) {
                    attributes.push(Attribute { name, value });
                }
            }
            AttrToken::Slash => {}
            AttrToken::Equals | AttrToken::Quoted(_) => return None,
        }
    }

    Some(attributes)
}

/// Decode character references in text and attribute values
///
/// Handles the XML entities, `&nbsp;`, and numeric references.
/// Unknown references are kept verbatim.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let decoded = candidate
            .find(';')
            .filter(|&end| end <= 12)
            .and_then(|end| decode_reference(&candidate[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Lex input string into tokens with spans
///
/// Input the lexer rejects (for example an opening tag with a dangling `=`)
/// is passed through as literal text. The content of `<script>` and
/// `<style>` is one undecoded text token.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    let mut lexer = Token::lexer(input);
    let mut pending: Option<(Token, Span)> = None;

    std::iter::from_fn(move || {
        if let Some(raw) = pending.take() {
            return Some(raw);
        }

        let next = lexer.next().map(|tok| (tok, lexer.span()))?;
        let (tok, span) = match next {
            (Ok(t), span) => (t, span),
            (Err(()), span) => (Token::Text(input[span.clone()].to_string()), span),
        };

        if let Token::OpenTag(tag) = &tok {
            if !tag.self_closing && is_raw_text_element(&tag.name) {
                pending = raw_text(&mut lexer, &tag.name);
            }
        }
        Some((tok, span))
    })
}

/// Consume raw text up to the matching close tag, if there is one
fn raw_text(lexer: &mut Lexer<'_, Token>, name: &str) -> Option<(Token, Span)> {
    let rest = lexer.remainder();
    let end = rest.to_ascii_lowercase().find(&format!("</{}", name))?;
    if end == 0 {
        return None;
    }

    let start = lexer.span().end;
    lexer.bump(end);
    Some((Token::Text(rest[..end].to_string()), start..start + end))
}
