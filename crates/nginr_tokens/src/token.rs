//! A lexical token from a source file, along with streams for said token

use crate::spanned::{Span, Spanned};
use std::collections::VecDeque;
use std::fmt::{Debug, Formatter};
use std::iter;

/// A lexical token from a source file.
///
/// Every token carries its raw source text inside its [TokenKind], so a
/// token stream is lossless: concatenating [Token::text] over a whole scan
/// reproduces the input exactly.
#[derive(Clone)]
pub struct Token {
    span: Span,
    kind: TokenKind,
}

impl Token {
    /// Creates a new token
    pub fn new(span: Span, kind: TokenKind) -> Self {
        Self { span, kind }
    }

    /// Gets the kind for this token
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// The raw source text of this token
    pub fn text(&self) -> &str {
        self.kind.text()
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// The kind for a token.
///
/// Each variant owns the raw text of its span. String and comment interiors
/// are opaque: the scanner never splits them, and the rewriter never looks
/// inside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier(String),
    Keyword(String),
    StringLiteral(String),
    /// An f-string literal; `has_interpolation` is set when the literal
    /// contains at least one unescaped `{...}` expression region
    FStringLiteral {
        raw: String,
        has_interpolation: bool,
    },
    Comment(String),
    Operator(String),
    Newline(String),
    /// Whitespace at the start of a physical line
    Indent(String),
    /// Whitespace anywhere else
    Whitespace(String),
    Other(String),
}

impl TokenKind {
    /// The raw source text behind this kind
    pub fn text(&self) -> &str {
        match self {
            TokenKind::Identifier(s)
            | TokenKind::Keyword(s)
            | TokenKind::StringLiteral(s)
            | TokenKind::Comment(s)
            | TokenKind::Operator(s)
            | TokenKind::Newline(s)
            | TokenKind::Indent(s)
            | TokenKind::Whitespace(s)
            | TokenKind::Other(s) => s,
            TokenKind::FStringLiteral { raw, .. } => raw,
        }
    }

    /// Whether this token is intra-line blank space
    pub fn is_blank(&self) -> bool {
        matches!(self, TokenKind::Indent(_) | TokenKind::Whitespace(_))
    }
}

/// A stream of tokens
pub struct TokenStream(VecDeque<Token>);

impl FromIterator<Token> for TokenStream {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_front()
    }
}

impl Default for TokenStream {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStream {
    #[inline]
    pub fn new() -> Self {
        TokenStream::from_iter(iter::empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An iterator over the tokens without consuming the stream
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.0.iter()
    }
}

impl Debug for TokenStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_create_token_stream() {
        let vec: Vec<Token> = vec![];
        let mut stream = TokenStream::from_iter(vec);
        assert!(stream.next().is_none())
    }

    #[test]
    fn test_kind_text_roundtrip() {
        let kinds = [
            TokenKind::Identifier("fn_result".to_string()),
            TokenKind::Keyword("def".to_string()),
            TokenKind::StringLiteral("'fn'".to_string()),
            TokenKind::FStringLiteral {
                raw: "f\"{x}\"".to_string(),
                has_interpolation: true,
            },
            TokenKind::Comment("# fn".to_string()),
            TokenKind::Operator("->".to_string()),
            TokenKind::Newline("\r\n".to_string()),
            TokenKind::Indent("    ".to_string()),
            TokenKind::Whitespace(" ".to_string()),
            TokenKind::Other("$".to_string()),
        ];
        let joined = kinds.iter().map(|k| k.text()).join("");
        assert_eq!(joined, "fn_resultdef'fn'f\"{x}\"# fn->\r\n     $");
    }

    #[test]
    fn test_blank_kinds() {
        assert!(TokenKind::Indent("  ".to_string()).is_blank());
        assert!(TokenKind::Whitespace("\t".to_string()).is_blank());
        assert!(!TokenKind::Newline("\n".to_string()).is_blank());
    }
}
