//! Errors for a single grade. None of them stop the run; the grade is reported as empty instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("could not find the `{0}Kanji` declaration")]
    NotFound(String),
    #[error("could not find a matching closing bracket for `{0}Kanji`")]
    Unbalanced(String),
    #[error("failed to decode `{group}Kanji`: {source}")]
    Decode {
        group: String,
        #[source]
        source: DecodeError,
    },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("unresolved identifier `{name}` at {line}:{column}")]
    UnresolvedIdentifier {
        name: String,
        line: usize,
        column: usize,
    },
    #[error("expected a declaration of `{expected}` but found `{found}`")]
    UnexpectedDeclaration { expected: String, found: String },
    #[error("invalid kanji record: {0}")]
    Record(#[from] serde_json::Error),
    #[error("record {index} has an empty character")]
    EmptyCharacter { index: usize },
}
