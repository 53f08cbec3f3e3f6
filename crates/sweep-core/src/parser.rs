//! Parser module for JavaScript/TypeScript source code
//!
//! Integrates with SWC for parsing source files into a [`SyntaxTree`].

use std::sync::OnceLock;

use swc_common::sync::Lrc;
use swc_common::{BytePos, FileName, SourceMap, Span, Spanned};
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax, parse_file_as_module};

use crate::rewrite::EditLog;

pub use swc_ecma_ast::{EsVersion, Module};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,
        _ => Language::JavaScript,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// A parsed source file: the SWC module, the text it came from, and the
/// textual edits the rewriter has applied to it so far.
pub struct SyntaxTree {
    filename: String,
    language: Language,
    source: String,
    base: BytePos,
    module: Module,
    edits: EditLog,
    /// Byte offset of the first character of every line, built on first use.
    line_starts: OnceLock<Vec<usize>>,
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("filename", &self.filename)
            .field("language", &self.language)
            .field("items", &self.module.body.len())
            .field("edits", &self.edits.len())
            .finish()
    }
}

impl SyntaxTree {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn edits(&self) -> &EditLog {
        &self.edits
    }

    /// Whether the rewriter has touched this tree.
    pub fn is_modified(&self) -> bool {
        !self.edits.is_empty()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Module, &mut EditLog) {
        (&mut self.module, &mut self.edits)
    }

    /// Byte offset of `pos` within [`SyntaxTree::source`].
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0.saturating_sub(self.base.0) as usize).min(self.source.len())
    }

    pub fn text(&self, span: Span) -> &str {
        let lo = self.offset(span.lo);
        let hi = self.offset(span.hi);
        if lo <= hi { &self.source[lo..hi] } else { "" }
    }

    fn line_starts(&self) -> &[usize] {
        self.line_starts.get_or_init(|| {
            std::iter::once(0)
                .chain(self.source.match_indices('\n').map(|(i, _)| i + 1))
                .collect()
        })
    }

    /// 1-based line and column of `pos`. The column counts characters.
    pub fn location(&self, pos: BytePos) -> (usize, usize) {
        let lo = self.offset(pos);
        let starts = self.line_starts();
        let line = starts.partition_point(|&start| start <= lo);
        let line_start = starts[line - 1];
        let column = self.source[line_start..lo].chars().count() + 1;

        (line, column)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    jsx: bool,
    typescript: bool,
    decorators: bool,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = enabled;
        self
    }

    pub fn decorators(mut self, enabled: bool) -> Self {
        self.decorators = enabled;
        self
    }

    pub fn build(self) -> Parser {
        let syntax = if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        };

        Parser { syntax }
    }
}

#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
}

impl Parser {
    /// Plain JavaScript parser. JSX is accepted in `.js` files as well.
    pub fn new() -> Self {
        Self::builder().jsx(true).decorators(true).build()
    }

    pub fn for_file(filename: &str) -> Self {
        match detect_language(filename) {
            Language::JavaScript | Language::Jsx => Self::new(),
            Language::TypeScript => Self::builder().typescript(true).decorators(true).build(),
            Language::Tsx => Self::builder()
                .typescript(true)
                .jsx(true)
                .decorators(true)
                .build(),
        }
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Parses `code` as an ES module. Any syntax error, including ones the
    /// SWC parser could recover from, fails the parse.
    pub fn parse(&self, filename: &str, code: &str) -> Result<SyntaxTree, ParseError> {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map.new_source_file(
            FileName::Custom(filename.to_string()).into(),
            code.to_string(),
        );

        let mut recovered_errors = Vec::new();
        let result = parse_file_as_module(
            &fm,
            self.syntax,
            EsVersion::latest(),
            None,
            &mut recovered_errors,
        );

        let to_parse_error = |e: swc_ecma_parser::error::Error| {
            let span = e.span();
            let loc = source_map.lookup_char_pos(span.lo);
            ParseError {
                line: loc.line,
                column: loc.col_display + 1,
                message: e.kind().msg().to_string(),
            }
        };

        let module = result.map_err(to_parse_error)?;
        if let Some(first) = recovered_errors.into_iter().next() {
            return Err(to_parse_error(first));
        }

        Ok(SyntaxTree {
            filename: filename.to_string(),
            language: detect_language(filename),
            source: code.to_string(),
            base: fm.start_pos,
            module,
            edits: EditLog::default(),
            line_starts: OnceLock::new(),
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses `code` with the dialect implied by `filename`'s extension.
pub fn parse(filename: &str, code: &str) -> Result<SyntaxTree, ParseError> {
    Parser::for_file(filename).parse(filename, code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_variable_declaration() {
        let tree = parse("test.js", "const x = 1;").unwrap();

        assert_eq!(tree.module().body.len(), 1);
        assert_eq!(tree.language(), Language::JavaScript);
        assert!(!tree.is_modified());
    }

    #[test]
    fn parse_invalid_syntax_returns_error() {
        let error = parse("test.js", "const = ;").unwrap_err();

        assert_eq!(error.line, 1);
        assert!(error.column > 0);
        assert!(!error.message.is_empty());
    }

    #[test]
    fn parse_incomplete_code_is_an_error() {
        assert!(parse("test.js", "function foo() {\n  const x = 1;\n").is_err());
    }

    #[test]
    fn parse_module_with_imports_and_exports() {
        let tree = parse("test.js", "import x from 'y';\nexport const z = x;").unwrap();

        assert_eq!(tree.module().body.len(), 2);
    }

    #[test]
    fn plain_js_accepts_jsx() {
        assert!(parse("component.js", "const element = <div>Hello</div>;").is_ok());
    }

    #[test]
    fn typescript_accepts_type_annotations() {
        let code = "interface User { id: number }\nconst x: number = 1;";
        assert!(parse("types.ts", code).is_ok());
    }

    #[test]
    fn tsx_accepts_jsx_and_types() {
        let code = "const App = (): JSX.Element => <div />;";
        assert!(parse("component.tsx", code).is_ok());
    }

    #[test]
    fn detect_language_from_extension() {
        assert_eq!(detect_language("file.js"), Language::JavaScript);
        assert_eq!(detect_language("file.mjs"), Language::JavaScript);
        assert_eq!(detect_language("file.jsx"), Language::Jsx);
        assert_eq!(detect_language("file.ts"), Language::TypeScript);
        assert_eq!(detect_language("file.cts"), Language::TypeScript);
        assert_eq!(detect_language("file.tsx"), Language::Tsx);
        assert_eq!(detect_language("unknown"), Language::JavaScript);
    }

    #[test]
    fn text_and_location_use_source_offsets() {
        let tree = parse("test.js", "const a = 1;\nconst bee = 2;").unwrap();
        let swc_ecma_ast::ModuleItem::Stmt(stmt) = &tree.module().body[1] else {
            panic!("expected statement");
        };

        assert!(tree.text(stmt.span()).starts_with("const bee = 2"));
        assert_eq!(tree.location(stmt.span().lo), (2, 1));
    }

    #[test]
    fn location_counts_characters_on_later_lines() {
        let code = "// héllo\n\nlet ünïcode = 1;\nconst tail = ünïcode;";
        let tree = parse("test.js", code).unwrap();
        let base = tree.base;
        let at = |needle: &str, nth: usize| {
            let offset = code.match_indices(needle).nth(nth).unwrap().0;
            tree.location(base + BytePos(offset as u32))
        };

        assert_eq!(at("let", 0), (3, 1));
        assert_eq!(at("ünïcode", 0), (3, 5));
        assert_eq!(at("ünïcode", 1), (4, 14));
        assert_eq!(tree.location(base), (1, 1));
        assert_eq!(tree.location(base + BytePos(code.len() as u32)), (4, 22));
    }
}
