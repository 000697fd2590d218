use crate::reassembler::InternalConsistencyError;
use crate::rewriter::AmbiguousKeywordError;
use crate::scanner::ScanError;
use nginr_tokens::spanned::{Span, Spanned};
use thiserror::Error;

/// Any failure of the translation entry point.
///
/// Errors are returned as values, never thrown across the component
/// boundary; the caller decides whether to report and skip execution.
/// Translation either fully succeeds or fully fails: no partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    AmbiguousKeyword(#[from] AmbiguousKeywordError),
    #[error(transparent)]
    InternalConsistency(#[from] InternalConsistencyError),
}

impl TranslateError {
    /// Best-effort source location for this error
    pub fn span(&self) -> Option<Span> {
        match self {
            TranslateError::Scan(e) => Some(e.span()),
            TranslateError::AmbiguousKeyword(e) => Some(e.span()),
            TranslateError::InternalConsistency(e) => match *e {
                InternalConsistencyError::Gap { found, .. } => Some(Span::new(found, 0)),
                InternalConsistencyError::Truncated { end, .. } => Some(Span::new(end, 0)),
                InternalConsistencyError::LengthLaw { .. } => None,
            },
        }
    }
}
