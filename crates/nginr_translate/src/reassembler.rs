//! Reconstructs output text from a rewritten token stream.
//!
//! The reassembler is a consistency gate as much as a printer: token spans
//! must tile the original input with no gaps or overlaps, and the output
//! length must obey the rewrite length law. A violation of either is a
//! defect in an earlier stage, never a user error.

use crate::{SourceMapEntry, TranslationUnit, STANDARD_KEYWORD, SURFACE_KEYWORD};
use nginr_tokens::spanned::{Span, Spanned};
use nginr_tokens::token::TokenStream;
use thiserror::Error;
use tracing::trace;

/// Concatenates token text in input order, recording a source-map entry
/// for every rewritten span
pub fn reassemble(
    source: &str,
    stream: TokenStream,
) -> Result<TranslationUnit, InternalConsistencyError> {
    let mut output = String::with_capacity(source.len() + 16);
    let mut source_map = Vec::new();
    let mut cursor = 0usize;
    for token in stream {
        let span = token.span();
        if span.offset() != cursor {
            return Err(InternalConsistencyError::Gap {
                expected: cursor,
                found: span.offset(),
            });
        }
        let original =
            source
                .get(span.offset()..span.end())
                .ok_or(InternalConsistencyError::Truncated {
                    end: span.end(),
                    len: source.len(),
                })?;
        let text = token.text();
        if text != original {
            trace!("span {span:?} rewritten: {original:?} -> {text:?}");
            source_map.push(SourceMapEntry {
                input: span,
                output: Span::new(output.len(), text.len()),
            });
        }
        output.push_str(text);
        cursor = span.end();
    }
    if cursor != source.len() {
        return Err(InternalConsistencyError::Truncated {
            end: cursor,
            len: source.len(),
        });
    }
    let rewrites = source_map.len();
    let expected = source.len() + rewrites * (STANDARD_KEYWORD.len() - SURFACE_KEYWORD.len());
    if output.len() != expected {
        return Err(InternalConsistencyError::LengthLaw {
            input: source.len(),
            output: output.len(),
            rewrites,
        });
    }
    Ok(TranslationUnit::new(output, source_map))
}

/// A defect in the scanner or rewriter, never caused by user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalConsistencyError {
    #[error("token stream gap: expected offset {expected}, found {found}")]
    Gap { expected: usize, found: usize },
    #[error("token stream covers {end} bytes of a {len}-byte input")]
    Truncated { end: usize, len: usize },
    #[error("output length {output} violates the length law for input {input} with {rewrites} rewrite(s)")]
    LengthLaw {
        input: usize,
        output: usize,
        rewrites: usize,
    },
}
