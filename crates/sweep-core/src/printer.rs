//! Serializes a rewritten tree back to text
//!
//! Untouched regions are copied byte for byte from the original source; the
//! tree's edit log supplies everything else.

use crate::parser::SyntaxTree;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrintError {
    #[error("source text does not match the text '{filename}' was parsed from")]
    SourceMismatch { filename: String },
    #[error("edit {start}..{end} is outside the source or splits a character")]
    InvalidRange { start: usize, end: usize },
}

pub fn print(tree: &SyntaxTree, original: &str) -> Result<String, PrintError> {
    if tree.source() != original {
        return Err(PrintError::SourceMismatch {
            filename: tree.filename().to_string(),
        });
    }

    let mut output = String::with_capacity(original.len());
    let mut cursor = 0;

    for edit in tree.edits().sorted() {
        if edit.start < cursor
            || edit.end < edit.start
            || !original.is_char_boundary(edit.start)
            || !original.is_char_boundary(edit.end)
        {
            return Err(PrintError::InvalidRange {
                start: edit.start,
                end: edit.end,
            });
        }

        output.push_str(&original[cursor..edit.start]);
        output.push_str(&edit.replacement);
        cursor = edit.end;
    }

    output.push_str(&original[cursor..]);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::rewrite::TextEdit;

    #[test]
    fn untouched_tree_prints_verbatim() {
        let code = "const a = 1;   // spacing kept\n\n\nexport { a };\n";
        let tree = parse("test.js", code).unwrap();

        assert_eq!(print(&tree, code).unwrap(), code);
    }

    #[test]
    fn edits_are_spliced_in_order() {
        let code = "let a = 1; let b = 2; let c = 3;";
        let mut tree = parse("test.js", code).unwrap();
        {
            let (_, log) = tree.parts_mut();
            log.push(TextEdit::delete(22, 32));
            log.push(TextEdit::replace(0, 10, "/* a */"));
        }

        assert_eq!(print(&tree, code).unwrap(), "/* a */ let b = 2; ");
    }

    #[test]
    fn mismatched_source_is_rejected() {
        let tree = parse("test.js", "const a = 1;").unwrap();

        assert_eq!(
            print(&tree, "const a = 2;"),
            Err(PrintError::SourceMismatch {
                filename: "test.js".to_string()
            })
        );
    }

    #[test]
    fn out_of_bounds_edit_is_rejected() {
        let code = "const a = 1;";
        let mut tree = parse("test.js", code).unwrap();
        tree.parts_mut().1.push(TextEdit::delete(5, 99));

        assert!(matches!(
            print(&tree, code),
            Err(PrintError::InvalidRange { start: 5, end: 99 })
        ));
    }
}
