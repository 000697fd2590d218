//! Source-to-source translator for the Nginr surface syntax.
//!
//! Nginr is standard Python with one lexical difference: function
//! definitions open with `fn` instead of `def`. The translator turns a
//! `.xr` buffer into standard Python text that an unmodified interpreter
//! can run, changing nothing but the definition-site keyword.
//!
//! The pipeline is a single pass per translation unit:
//!
//! ```text
//! text -> Scanner -> token stream -> Rewriter -> Reassembler -> text
//! ```
//!
//! Each stage consumes only the previous stage's output, and the whole
//! translation is a pure function of its input: no state survives between
//! files, so callers may translate many files in parallel.

use nginr_tokens::spanned::Span;
use tracing::debug;

pub mod diagnostics;
mod error;
pub mod reassembler;
pub mod rewriter;
pub mod scanner;

pub use error::TranslateError;
pub use reassembler::InternalConsistencyError;
pub use rewriter::AmbiguousKeywordError;
pub use scanner::{ScanError, ScanErrorKind, Scanner};

/// The surface definition keyword accepted in `.xr` sources
pub const SURFACE_KEYWORD: &str = "fn";
/// The standard keyword emitted at definition sites
pub const STANDARD_KEYWORD: &str = "def";

/// Association between an output byte range and the originating input byte
/// range; recorded only for rewritten spans, used only for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMapEntry {
    pub input: Span,
    pub output: Span,
}

/// The result of translating one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    output: String,
    source_map: Vec<SourceMapEntry>,
}

impl TranslationUnit {
    pub(crate) fn new(output: String, source_map: Vec<SourceMapEntry>) -> Self {
        Self { output, source_map }
    }

    /// The translated text
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Consumes the unit, returning the translated text
    pub fn into_output(self) -> String {
        self.output
    }

    /// How many definition sites were rewritten
    pub fn rewrite_count(&self) -> usize {
        self.source_map.len()
    }

    /// The rewritten spans, in input order
    pub fn source_map(&self) -> &[SourceMapEntry] {
        &self.source_map
    }
}

/// Translates one Nginr source buffer into standard Python text.
///
/// Either fully succeeds or fully fails; there is no partial output.
pub fn translate(source: &str) -> Result<TranslationUnit, TranslateError> {
    let tokens = Scanner::new(source).scan_all()?;
    let rewritten = rewriter::rewrite(tokens)?;
    let unit = reassembler::reassemble(source, rewritten)?;
    debug!(
        "translated {} bytes with {} rewrite(s)",
        source.len(),
        unit.rewrite_count()
    );
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_simple_definition() {
        let unit = translate("fn add(a: int, b: int) -> int:\n    return a + b\n").unwrap();
        assert_eq!(unit.output(), "def add(a: int, b: int) -> int:\n    return a + b\n");
        assert_eq!(unit.rewrite_count(), 1);
    }

    #[test]
    fn test_string_content_unchanged() {
        let src = "x = \"fn test\"";
        let unit = translate(src).unwrap();
        assert_eq!(unit.output(), src);
        assert_eq!(unit.rewrite_count(), 0);
    }

    #[test]
    fn test_indented_method_preserves_indentation() {
        let src = "class C:\n    fn __init__(self) -> None:\n        self.x = 0\n";
        let unit = translate(src).unwrap();
        assert_eq!(
            unit.output(),
            "class C:\n    def __init__(self) -> None:\n        self.x = 0\n"
        );
    }

    #[test]
    fn test_fstring_with_keyword_prefix_identifier() {
        let src = "print(f\"{fn_result}\")\n";
        let unit = translate(src).unwrap();
        assert_eq!(unit.output(), src);
        assert_eq!(unit.rewrite_count(), 0);
    }

    #[test]
    fn test_unterminated_triple_quote_fails_at_opening() {
        let src = "fn f():\n    s = \"\"\"abc\n";
        let err = translate(src).expect_err("should fail");
        let TranslateError::Scan(scan) = &err else {
            panic!("expected scan error, got {err:?}");
        };
        assert_eq!(*scan.kind(), ScanErrorKind::UnterminatedString);
        assert_eq!(err.span(), Some(Span::new(16, 3)));
    }

    #[test]
    fn test_fstring_format_specs_pass_through() {
        for src in [
            "print(f'{3:\"<5}')\n",
            "x = f'{3:fn y(}'\n",
            "w = 5\nprint(f'{3:>{w}}')\n",
        ] {
            let unit = translate(src).unwrap_or_else(|e| panic!("{src:?} should translate: {e}"));
            assert_eq!(unit.output(), src);
            assert_eq!(unit.rewrite_count(), 0);
        }
    }

    #[test]
    fn test_pass_through_is_idempotent() {
        let src = "def add(a, b):\n    return a + b\n\nprint(add(1, 2))\n";
        let unit = translate(src).unwrap();
        assert_eq!(unit.output(), src);
        assert_eq!(unit.rewrite_count(), 0);
    }

    #[test]
    fn test_length_law() {
        let src = "@deco\nfn a():\n    fn b():\n        return '''fn c():'''\n";
        let unit = translate(src).unwrap();
        assert_eq!(
            unit.output().len(),
            src.len() + unit.rewrite_count() * (STANDARD_KEYWORD.len() - SURFACE_KEYWORD.len())
        );
        assert_eq!(unit.rewrite_count(), 2);
    }

    #[test]
    fn test_translating_twice_is_stable() {
        let src = "fn greet(name):\n    return f\"hi {name}\"\n";
        let once = translate(src).unwrap().into_output();
        let twice = translate(&once).unwrap().into_output();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_crlf_preserved() {
        let src = "fn f():\r\n    pass\r\n";
        let unit = translate(src).unwrap();
        assert_eq!(unit.output(), "def f():\r\n    pass\r\n");
    }

    #[test]
    fn test_source_map_points_both_ways() {
        let src = "x = 1\nfn f():\n    pass\n";
        let unit = translate(src).unwrap();
        let entry = unit.source_map()[0];
        assert_eq!(&src[entry.input.offset()..entry.input.end()], "fn");
        assert_eq!(
            &unit.output()[entry.output.offset()..entry.output.end()],
            "def"
        );
    }
}
