//! Parse failures. Any of these aborts generation for the file.

/// Errors from turning source text into a declaration tree.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to load Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("parser produced no syntax tree")]
    NoTree,
    #[error("syntax error at line {line}, column {column}: unexpected `{snippet}`")]
    Syntax {
        line: usize,
        column: usize,
        snippet: String,
    },
    #[error("missing package clause")]
    MissingPackage,
}
