//! Error Module
//!
//! Errors raised while loading a template AST or lowering it to source.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Error, Debug)]
pub enum CompileError {
    /// The traversal met an AST kind it has no visitor for.
    #[error("{kind} not implemented!")]
    UnhandledNode { kind: String },

    #[error("Invalid template AST: {0}")]
    InvalidAst(#[source] serde_json::Error),

    #[error("Invalid output options: {0}")]
    InvalidOptions(#[source] serde_json::Error),

    #[error("No AST was supplied for '{filename}' and no parser is configured")]
    MissingAst { filename: String },

    /// Failure reported by the external parser collaborator.
    #[error("Failed to parse '{filename}': {source}")]
    Parse {
        filename: String,
        #[source]
        source: anyhow::Error,
    },
}

impl CompileError {
    pub fn unhandled(kind: impl Into<String>) -> Self {
        CompileError::UnhandledNode { kind: kind.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unhandled_node_names_the_kind() {
        let err = CompileError::unhandled("Comment");
        assert_eq!(err.to_string(), "Comment not implemented!");
    }
}
