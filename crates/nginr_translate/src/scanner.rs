//! Responsible for converting source text into a lossless token stream.
//!
//! The scanner is total: every byte of the input lands in exactly one
//! token, and concatenating the raw text of every token reproduces the
//! input. It only understands enough structure (string and comment
//! boundaries, line starts) to make the rewriter's definition-site
//! predicate decidable; no expression grammar is involved.

use crate::scanner::token_parsing::{parse_token, TokenIssue};
use nginr_tokens::spanned::{Span, Spanned};
use nginr_tokens::token::{Token, TokenKind, TokenStream};
use thiserror::Error;
use tracing::trace;

pub(crate) mod token_parsing;

/// Converts source text into a stream of lossless [Token]s
#[derive(Debug)]
pub struct Scanner<'s> {
    source: &'s str,
    offset: usize,
    at_line_start: bool,
}

impl<'s> Scanner<'s> {
    /// Creates a new scanner over an in-memory source buffer
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            offset: 0,
            at_line_start: true,
        }
    }

    /// Scans the whole input, failing on the first malformed literal
    pub fn scan_all(self) -> Result<TokenStream, ScanError> {
        self.collect()
    }

    fn next_token(&mut self) -> ScanResult<Option<Token>> {
        let rest = &self.source[self.offset..];
        let kind = parse_token(rest, self.at_line_start).map_err(|issue| match issue {
            TokenIssue::UnterminatedString {
                quote_offset,
                quote_len,
            } => ScanError::new(
                ScanErrorKind::UnterminatedString,
                Span::new(self.offset + quote_offset, quote_len),
            ),
        })?;
        let Some(kind) = kind else {
            return Ok(None);
        };
        let len = kind.text().len();
        let span = Span::new(self.offset, len);
        self.offset += len;
        self.at_line_start = matches!(kind, TokenKind::Newline(_));
        trace!("scanned {:?} at {:?}", kind, span);
        Ok(Some(Token::new(span, kind)))
    }
}

impl<'s> Iterator for Scanner<'s> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(option) => option.map(Ok),
            Err(e) => Some(Err(e)),
        }
    }
}

type ScanResult<T> = Result<T, ScanError>;

/// A malformed literal; translation of the file aborts with no output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ScanError {
    kind: ScanErrorKind,
    span: Span,
}

impl ScanError {
    /// Creates a new error
    pub fn new(kind: ScanErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Gets the kind for this error
    pub fn kind(&self) -> &ScanErrorKind {
        &self.kind
    }
}

impl Spanned for ScanError {
    fn span(&self) -> Span {
        self.span
    }
}

/// [ScanError] kind
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn scan(src: &str) -> Vec<Token> {
        Scanner::new(src)
            .scan_all()
            .unwrap_or_else(|e| panic!("{src:?} should scan: {e}"))
            .collect()
    }

    #[test]
    fn test_scan_is_lossless() {
        let src = "@cached\nfn greet(name: str) -> str:  # says hello\n    return f\"hi {name}\"\r\n\nclass A:\n    fn __init__(self):\n        self.d = {'fn': \"\"\"x\ny\"\"\"}\n";
        let tokens = scan(src);
        let rebuilt: String = tokens.iter().map(|t| t.text()).collect();
        assert_eq!(rebuilt, src);
    }

    #[test]
    fn test_spans_are_contiguous() {
        let src = "fn f(x):\n    return x ** 2\n";
        let mut cursor = 0;
        for token in scan(src) {
            assert_eq!(token.span().offset(), cursor);
            cursor = token.span().end();
        }
        assert_eq!(cursor, src.len());
    }

    #[test]
    fn test_indent_only_at_line_start() {
        let src = "  a b\n";
        let tokens = scan(src);
        assert_eq!(*tokens[0].kind(), TokenKind::Indent("  ".to_string()));
        assert_eq!(*tokens[2].kind(), TokenKind::Whitespace(" ".to_string()));
    }

    #[test]
    fn test_identifier_containing_keyword_is_never_split() {
        let tokens = scan("fn_result = fnord\n");
        assert_eq!(
            *tokens[0].kind(),
            TokenKind::Identifier("fn_result".to_string())
        );
        assert_eq!(*tokens[4].kind(), TokenKind::Identifier("fnord".to_string()));
    }

    #[test]
    fn test_unterminated_triple_reports_opening_quote() {
        let src = "x = \"\"\"abc\ndef\n";
        let err = Scanner::new(src).scan_all().expect_err("should not scan");
        assert_eq!(*err.kind(), ScanErrorKind::UnterminatedString);
        assert_eq!(err.span(), Span::new(4, 3));
    }

    #[test]
    fn test_iterator_surfaces_error_once() {
        let mut scanner = Scanner::new("'open");
        assert!(matches!(scanner.next(), Some(Err(_))));
    }
}
