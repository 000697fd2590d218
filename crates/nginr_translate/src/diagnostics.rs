//! Converts translation errors into user-facing reports with 1-based
//! positions and a source excerpt.
//!
//! Reporting never fails: any [TranslateError] maps to a [Diagnostic],
//! which the caller renders (or inspects) to decide whether to proceed to
//! interpretation.

use crate::TranslateError;
use nginr_tokens::spanned::{line_col, LineReader, Span};
use std::fmt::{Display, Formatter};

/// The kind of a reported diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnterminatedString,
    AmbiguousKeyword,
    InternalConsistency,
}

/// A user-facing report for one translation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    /// 1-based line of the offending span
    line: usize,
    /// 1-based column (in characters) of the offending span
    column: usize,
    message: String,
    rendered: String,
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "error: {}", self.message)?;
        writeln!(f, "  --> {}:{}", self.line, self.column)?;
        write!(f, "{}", self.rendered)
    }
}

/// Builds the report for `error` against the source text it arose from
pub fn report(source: &str, error: &TranslateError) -> Diagnostic {
    let kind = match error {
        TranslateError::Scan(_) => DiagnosticKind::UnterminatedString,
        TranslateError::AmbiguousKeyword(_) => DiagnosticKind::AmbiguousKeyword,
        TranslateError::InternalConsistency(_) => DiagnosticKind::InternalConsistency,
    };
    let span = error.span().unwrap_or_default();
    let (line, column) = line_col(source, span.offset());
    Diagnostic {
        kind,
        line,
        column,
        message: error.to_string(),
        rendered: render_excerpt(source, span),
    }
}

fn render_excerpt(source: &str, span: Span) -> String {
    let (lines, base_line) = LineReader::new(1, 1).lines(source, span);
    let width = lines
        .iter()
        .map(|line| line.line)
        .max()
        .unwrap_or(1)
        .to_string()
        .len();
    let mut out = String::new();
    for line in &lines {
        out.push_str(&format!("{:width$} | {}\n", line.line, line.src.trim_end()));
        if line.line == base_line {
            if span.len() > 0 {
                out.push_str(&format!(
                    "{}{}{}\n",
                    " ".repeat(width + 3),
                    " ".repeat(line.col),
                    "~".repeat(span.len())
                ));
            } else {
                out.push_str(&format!("{}{}^\n", " ".repeat(width + 3), "-".repeat(line.col)));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate;
    use test_log::test;

    #[test]
    fn test_unterminated_string_position() {
        let src = "x = 1\ny = \"\"\"abc\nz = 2\n";
        let err = translate(src).expect_err("should fail");
        let diagnostic = report(src, &err);
        assert_eq!(diagnostic.kind(), DiagnosticKind::UnterminatedString);
        assert_eq!((diagnostic.line(), diagnostic.column()), (2, 5));
        assert_eq!(diagnostic.message(), "unterminated string literal");
    }

    #[test]
    fn test_rendered_excerpt_marks_span() {
        let src = "y = \"\"\"abc\n";
        let err = translate(src).expect_err("should fail");
        let rendered = report(src, &err).to_string();
        assert!(rendered.contains("--> 1:5"), "{rendered}");
        assert!(rendered.contains("y = \"\"\"abc"), "{rendered}");
        assert!(rendered.contains("~~~"), "{rendered}");
    }

    #[test]
    fn test_gutter_width_stays_aligned_past_line_ninety_nine() {
        let src = format!("{}y = \"abc\n", "x = 1\n".repeat(99));
        let err = translate(&src).expect_err("should fail");
        let diagnostic = report(&src, &err);
        assert_eq!((diagnostic.line(), diagnostic.column()), (100, 5));
        let rendered = diagnostic.to_string();
        // three-digit gutter: two-digit context lines get one pad space
        assert!(rendered.contains("\n 99 | x = 1\n"), "{rendered}");
        assert!(rendered.contains("100 | y = \"abc"), "{rendered}");
    }

    #[test]
    fn test_ambiguous_keyword_diagnostic() {
        let src = "x = 1; fn add(2, 3)\n";
        let err = translate(src).expect_err("should fail");
        let diagnostic = report(src, &err);
        assert_eq!(diagnostic.kind(), DiagnosticKind::AmbiguousKeyword);
        assert_eq!((diagnostic.line(), diagnostic.column()), (1, 8));
    }
}
