//! Rewrites `fn` tokens in definition position to `def`, leaving every
//! other token untouched.
//!
//! A candidate qualifies only when scanning backward over blank tokens
//! reaches a line start (or the start of the stream), and scanning forward
//! finds the function name followed by an opening parenthesis. A single
//! `async` keyword may sit between the line start and the candidate, since
//! Python requires `async def` in that position. Indentation alone decides
//! candidacy, so methods inside class bodies need no special casing.

use crate::scanner::token_parsing::embedded_expressions;
use crate::scanner::Scanner;
use crate::{STANDARD_KEYWORD, SURFACE_KEYWORD};
use nginr_tokens::spanned::{Span, Spanned};
use nginr_tokens::token::{Token, TokenKind, TokenStream};
use thiserror::Error;
use tracing::{debug, trace};

/// Replaces definition-site `fn` tokens with `def` keyword tokens.
///
/// Pass-through tokens are moved, not copied: the stream that comes out
/// holds the same tokens that went in except at rewritten sites, which keep
/// their original spans.
pub fn rewrite(stream: TokenStream) -> Result<TokenStream, AmbiguousKeywordError> {
    let mut tokens: Vec<Token> = stream.collect();
    let mut rewrites = 0usize;
    for idx in 0..tokens.len() {
        if !is_candidate(&tokens[idx]) {
            check_embedded(&tokens[idx])?;
            continue;
        }
        if !followed_by_signature(&tokens, idx) {
            trace!(
                "`{}` at {:?} is not followed by `name(`, leaving as identifier",
                SURFACE_KEYWORD,
                tokens[idx].span()
            );
            continue;
        }
        if !at_definition_anchor(&tokens, idx) {
            // `fn name(` away from a line start is neither a valid
            // definition nor a valid expression; refuse rather than guess
            return Err(AmbiguousKeywordError::new(tokens[idx].span()));
        }
        let span = tokens[idx].span();
        tokens[idx] = Token::new(span, TokenKind::Keyword(STANDARD_KEYWORD.to_string()));
        rewrites += 1;
        trace!("rewrote definition site at {span:?}");
    }
    debug!("rewrote {rewrites} definition site(s)");
    Ok(tokens.into_iter().collect())
}

fn is_candidate(token: &Token) -> bool {
    matches!(token.kind(), TokenKind::Identifier(text) if text == SURFACE_KEYWORD)
}

/// Backward scan: blanks only until a newline or the start of the stream,
/// with at most one intervening `async` keyword
fn at_definition_anchor(tokens: &[Token], mut idx: usize) -> bool {
    let mut allow_async = true;
    loop {
        if idx == 0 {
            return true;
        }
        idx -= 1;
        match tokens[idx].kind() {
            kind if kind.is_blank() => continue,
            TokenKind::Newline(_) => return true,
            TokenKind::Keyword(word) if word == "async" && allow_async => {
                allow_async = false;
                continue;
            }
            _ => return false,
        }
    }
}

/// Forward scan: an identifier (the function name), then an opening
/// parenthesis after optional whitespace
fn followed_by_signature(tokens: &[Token], idx: usize) -> bool {
    let mut i = idx + 1;
    while matches!(tokens.get(i), Some(t) if t.kind().is_blank()) {
        i += 1;
    }
    if !matches!(tokens.get(i), Some(t) if matches!(t.kind(), TokenKind::Identifier(_))) {
        return false;
    }
    i += 1;
    while matches!(tokens.get(i), Some(t) if t.kind().is_blank()) {
        i += 1;
    }
    matches!(tokens.get(i), Some(t) if matches!(t.kind(), TokenKind::Operator(op) if op == "("))
}

/// Tokenizes the `{...}` expression regions of an f-string and applies the
/// same keyword treatment there.
///
/// Python only allows expressions inside those regions, never statements,
/// so no definition site can exist in one; the text always passes through
/// unchanged. A `fn name(` pattern in a region is therefore surfaced as
/// ambiguous instead of silently kept.
fn check_embedded(token: &Token) -> Result<(), AmbiguousKeywordError> {
    let TokenKind::FStringLiteral {
        raw,
        has_interpolation: true,
    } = token.kind()
    else {
        return Ok(());
    };
    for region in embedded_expressions(raw) {
        let Ok(stream) = Scanner::new(&raw[region.clone()]).scan_all() else {
            // outer scan already validated the literal
            continue;
        };
        let embedded: Vec<Token> = stream.collect();
        for (idx, tok) in embedded.iter().enumerate() {
            if is_candidate(tok) && followed_by_signature(&embedded, idx) {
                let offset = token.span().offset() + region.start + tok.span().offset();
                return Err(AmbiguousKeywordError::new(Span::new(
                    offset,
                    tok.span().len(),
                )));
            }
        }
    }
    Ok(())
}

/// A `fn name(` pattern the translator cannot resolve to either a
/// definition or a call; surfaced as a hard defect, never silently fixed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ambiguous `fn`: keyword pattern outside definition position")]
pub struct AmbiguousKeywordError {
    span: Span,
}

impl AmbiguousKeywordError {
    /// Creates a new error
    pub fn new(span: Span) -> Self {
        Self { span }
    }
}

impl Spanned for AmbiguousKeywordError {
    fn span(&self) -> Span {
        self.span
    }
}
