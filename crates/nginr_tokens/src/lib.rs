//! The lossless token data model shared by every stage of the Nginr
//! translator.
//!
//! Tokens carry their raw source text, so concatenating every token of a
//! scan in order reproduces the input byte for byte. Spans are plain byte
//! ranges into the source buffer of a single translation unit.

pub mod spanned;
pub mod token;

pub use spanned::{Span, Spanned};
pub use token::{Token, TokenKind, TokenStream};
