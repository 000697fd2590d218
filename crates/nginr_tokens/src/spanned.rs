//! Byte spans into a translation unit's source buffer, plus helpers for
//! mapping spans back to human-readable lines and columns.

use itertools::Itertools;
use std::fmt::{Debug, Formatter};

/// A byte range into the source text of a single translation unit
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    offset: usize,
    len: usize,
}

impl Span {
    /// Creates a new span
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Byte offset of the first byte covered by this span
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes covered by this span
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte covered by this span
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Gets the smallest span covering both this span and `other`
    pub fn join(self, other: Span) -> Span {
        let offset = self.offset.min(other.offset);
        let end = self.end().max(other.end());
        Span::new(offset, end - offset)
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.offset, self.end())
    }
}

/// A trait for anything with a [Span]
pub trait Spanned {
    fn span(&self) -> Span;
}

/// Gets the 1-based line and column (in characters) of a byte offset.
///
/// Offsets past the end of the source are clamped to the last position.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
    let line_start = before.rfind('\n').map(|idx| idx + 1).unwrap_or(0);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

/// A single source line overlapping a reported span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number
    pub line: usize,
    /// 0-based column (in characters) where the span starts, only meaningful
    /// on the base line
    pub col: usize,
    /// The raw line text, without its trailing newline
    pub src: &'a str,
}

/// Extracts the lines surrounding a span for diagnostics rendering
#[derive(Debug, Clone, Copy)]
pub struct LineReader {
    before: usize,
    after: usize,
}

impl LineReader {
    /// Creates a reader keeping `before` lines of context above the span and
    /// `after` lines below it
    pub fn new(before: usize, after: usize) -> Self {
        Self { before, after }
    }

    /// Returns the context lines around `span` and the 1-based line the span
    /// starts on
    pub fn lines<'a>(&self, source: &'a str, span: Span) -> (Vec<Line<'a>>, usize) {
        let (base_line, base_col) = line_col(source, span.offset());
        let first = base_line.saturating_sub(self.before).max(1);
        let last = base_line + self.after;
        let lines = source
            .split('\n')
            .enumerate()
            .map(|(idx, src)| (idx + 1, src.strip_suffix('\r').unwrap_or(src)))
            .skip_while(|(no, _)| *no < first)
            .take_while(|(no, _)| *no <= last)
            .map(|(no, src)| Line {
                line: no,
                col: if no == base_line { base_col - 1 } else { 0 },
                src,
            })
            .collect_vec();
        (lines, base_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_covers_both() {
        let a = Span::new(2, 3);
        let b = Span::new(10, 4);
        assert_eq!(a.join(b), Span::new(2, 12));
        assert_eq!(b.join(a), Span::new(2, 12));
    }

    #[test]
    fn test_line_col_is_one_based() {
        let src = "abc\ndef\nghi\n";
        assert_eq!(line_col(src, 0), (1, 1));
        assert_eq!(line_col(src, 4), (2, 1));
        assert_eq!(line_col(src, 6), (2, 3));
    }

    #[test]
    fn test_line_col_counts_chars_not_bytes() {
        let src = "é = 1\n";
        // 'é' is two bytes but one column
        assert_eq!(line_col(src, 2), (1, 2));
    }

    #[test]
    fn test_line_reader_window() {
        let src = "one\ntwo\nthree\nfour\nfive\n";
        let span = Span::new(8, 5); // "three"
        let (lines, base) = LineReader::new(1, 1).lines(src, span);
        assert_eq!(base, 3);
        assert_eq!(
            lines.iter().map(|l| l.src).collect_vec(),
            vec!["two", "three", "four"]
        );
        assert_eq!(lines[1].col, 0);
    }
}
