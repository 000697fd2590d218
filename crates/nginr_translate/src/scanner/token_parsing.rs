//! Parsers for individual raw tokens.
//!
//! Every parser here recognizes the raw text of exactly one token, so the
//! scanner can build spans from the consumed length alone. The regular
//! token classes go through nom; the stateful string-literal forms are
//! scanned by hand because their error positions (the opening quote) and
//! f-string brace tracking do not map well onto combinators.

use nginr_tokens::token::TokenKind;
use nom::branch::alt;
use nom::bytes::complete::{is_a, tag, take_till, take_while, take_while_m_n};
use nom::character::complete::char;
use nom::combinator::recognize;
use nom::sequence::{pair, preceded};
use nom::IResult;
use std::ops::Range;

/// Python's reserved words. `fn` is deliberately absent: the surface
/// keyword stays an [TokenKind::Identifier] until the rewriter proves it
/// sits at a definition site.
const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
    "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield",
];

/// Operator and punctuation spellings, longest first so multi-character
/// operators win over their prefixes
const OPERATORS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "...", "->", ":=", "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=",
    "%=", "@=", "&=", "|=", "^=", "**", "//", "<<", ">>", "+", "-", "*", "/", "%", "@", "&", "|",
    "^", "~", "<", ">", "=", "(", ")", "[", "]", "{", "}", ",", ":", ".", ";",
];

const STRING_PREFIX_CHARS: &[u8] = b"rRbBuUfF";

/// A problem found while scanning a single token, positioned relative to
/// the token's first byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenIssue {
    UnterminatedString {
        quote_offset: usize,
        quote_len: usize,
    },
}

/// Parses the next raw token off the front of `src`.
///
/// Returns `Ok(None)` at end of input. The consumed length is always
/// `kind.text().len()`.
pub(crate) fn parse_token(src: &str, at_line_start: bool) -> Result<Option<TokenKind>, TokenIssue> {
    if src.is_empty() {
        return Ok(None);
    }
    if let Some(string) = scan_string(src) {
        return string.map(Some);
    }
    if let Ok((_, nl)) = parse_newline(src) {
        return Ok(Some(TokenKind::Newline(nl.to_string())));
    }
    if let Ok((_, blank)) = parse_blank(src) {
        let text = blank.to_string();
        return Ok(Some(if at_line_start {
            TokenKind::Indent(text)
        } else {
            TokenKind::Whitespace(text)
        }));
    }
    if let Ok((_, comment)) = parse_comment(src) {
        return Ok(Some(TokenKind::Comment(comment.to_string())));
    }
    if let Ok((_, word)) = recognize_word(src) {
        return Ok(Some(classify_word(word)));
    }
    if let Some(op) = recognize_operator(src) {
        return Ok(Some(TokenKind::Operator(op.to_string())));
    }
    // anything else passes through one character at a time, opaquely
    Ok(src.chars().next().map(|ch| TokenKind::Other(ch.to_string())))
}

fn parse_newline(src: &str) -> IResult<&str, &str> {
    alt((tag("\r\n"), tag("\n"), tag("\r")))(src)
}

fn parse_blank(src: &str) -> IResult<&str, &str> {
    is_a(" \t\u{c}")(src)
}

fn parse_comment(src: &str) -> IResult<&str, &str> {
    recognize(preceded(char('#'), take_till(|c| c == '\n' || c == '\r')))(src)
}

fn recognize_word(src: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while_m_n(1, 1, |c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(src)
}

fn classify_word(word: &str) -> TokenKind {
    if KEYWORDS.contains(&word) {
        TokenKind::Keyword(word.to_string())
    } else {
        TokenKind::Identifier(word.to_string())
    }
}

fn recognize_operator(src: &str) -> Option<&'static str> {
    OPERATORS.iter().find(|op| src.starts_with(**op)).copied()
}

/// Detects a string-literal opening at the front of `src`.
///
/// Returns the byte index of the opening quote, the quote run length
/// (1 or 3), and whether the prefix marks an f-string.
fn string_open(src: &str) -> Option<(usize, usize, bool)> {
    let bytes = src.as_bytes();
    let mut prefix_end = 0;
    while prefix_end < 2
        && matches!(bytes.get(prefix_end), Some(b) if STRING_PREFIX_CHARS.contains(b))
    {
        prefix_end += 1;
    }
    let quote_at = (0..=prefix_end)
        .rev()
        .find(|&idx| matches!(bytes.get(idx).copied(), Some(b'"') | Some(b'\'')))?;
    let quote_byte = bytes[quote_at];
    let quote_len = if bytes.get(quote_at + 1) == Some(&quote_byte)
        && bytes.get(quote_at + 2) == Some(&quote_byte)
    {
        3
    } else {
        1
    };
    let is_fstring = src[..quote_at].bytes().any(|b| b == b'f' || b == b'F');
    Some((quote_at, quote_len, is_fstring))
}

/// Scans a complete string literal (any prefix and quote form) off the
/// front of `src`, or returns `None` when `src` does not open one.
///
/// A backslash never terminates a literal: it guards the following
/// character even in raw strings, matching Python's tokenizer. Unterminated
/// literals report the opening quote's position, not end of input.
pub(crate) fn scan_string(src: &str) -> Option<Result<TokenKind, TokenIssue>> {
    let (quote_at, quote_len, is_fstring) = string_open(src)?;
    let quote_str = &src[quote_at..quote_at + quote_len];
    let triple = quote_len == 3;
    let unterminated = || TokenIssue::UnterminatedString {
        quote_offset: quote_at,
        quote_len,
    };

    let mut pos = quote_at + quote_len;
    let mut has_interpolation = false;
    loop {
        let Some(ch) = src[pos..].chars().next() else {
            return Some(Err(unterminated()));
        };
        if ch == '\\' {
            match src[pos + 1..].chars().next() {
                Some(escaped) => {
                    pos += 1 + escaped.len_utf8();
                    continue;
                }
                None => return Some(Err(unterminated())),
            }
        }
        if src[pos..].starts_with(quote_str) {
            pos += quote_len;
            break;
        }
        if !triple && (ch == '\n' || ch == '\r') {
            return Some(Err(unterminated()));
        }
        if is_fstring && ch == '{' {
            if src[pos..].starts_with("{{") {
                pos += 2;
                continue;
            }
            match scan_embedded_expr(src, pos) {
                Some((_, after)) => {
                    has_interpolation = true;
                    pos = after;
                    continue;
                }
                None => return Some(Err(unterminated())),
            }
        }
        if is_fstring && ch == '}' && src[pos..].starts_with("}}") {
            pos += 2;
            continue;
        }
        pos += ch.len_utf8();
    }

    let raw = src[..pos].to_string();
    Some(Ok(if is_fstring {
        TokenKind::FStringLiteral {
            raw,
            has_interpolation,
        }
    } else {
        TokenKind::StringLiteral(raw)
    }))
}

/// Walks a `{...}` region opened at `open_pos`.
///
/// Python splits the region at the first `:` outside nested brackets: what
/// comes before is an expression, what comes after is a format spec —
/// arbitrary text where only `{`/`}` nesting matters, never quotes or
/// code structure. Returns the end of the expression portion and the
/// position just past the matching `}`.
fn scan_embedded_expr(src: &str, open_pos: usize) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut pos = open_pos + 1;
    loop {
        let ch = src[pos..].chars().next()?;
        match ch {
            '(' | '[' | '{' => {
                depth += 1;
                pos += 1;
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                pos += 1;
            }
            '}' if depth == 0 => return Some((pos, pos + 1)),
            '}' => {
                depth -= 1;
                pos += 1;
            }
            ':' if depth == 0 => {
                let after = scan_format_spec(src, pos + 1)?;
                return Some((pos, after));
            }
            '\'' | '"' => match scan_string(&src[pos..]) {
                Some(Ok(kind)) => pos += kind.text().len(),
                _ => return None,
            },
            _ => pos += ch.len_utf8(),
        }
    }
}

/// Skips a format spec starting at `spec_pos`, honoring only brace nesting
/// (nested replacement fields). Returns the position just past the `}`
/// that closes the enclosing region.
fn scan_format_spec(src: &str, spec_pos: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = spec_pos;
    loop {
        let ch = src[pos..].chars().next()?;
        match ch {
            '{' => {
                depth += 1;
                pos += 1;
            }
            '}' if depth == 0 => return Some(pos + 1),
            '}' => {
                depth -= 1;
                pos += 1;
            }
            _ => pos += ch.len_utf8(),
        }
    }
}

/// Byte ranges of the expression portions of a well-formed f-string
/// token's raw text, excluding the braces and any format spec after a
/// top-level `:`
pub(crate) fn embedded_expressions(raw: &str) -> Vec<Range<usize>> {
    let Some((quote_at, quote_len, _)) = string_open(raw) else {
        return vec![];
    };
    let mut regions = vec![];
    let end = raw.len().saturating_sub(quote_len);
    let mut pos = quote_at + quote_len;
    while pos < end {
        let Some(ch) = raw[pos..].chars().next() else {
            break;
        };
        if ch == '\\' {
            match raw[pos + 1..].chars().next() {
                Some(escaped) => {
                    pos += 1 + escaped.len_utf8();
                    continue;
                }
                None => break,
            }
        }
        if raw[pos..].starts_with("{{") || raw[pos..].starts_with("}}") {
            pos += 2;
            continue;
        }
        if ch == '{' {
            match scan_embedded_expr(raw, pos) {
                Some((expr_end, after)) => {
                    regions.push(pos + 1..expr_end);
                    pos = after;
                    continue;
                }
                None => break,
            }
        }
        pos += ch.len_utf8();
    }
    regions
}
