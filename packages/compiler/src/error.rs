//! Compiler Errors
//!
//! One error type for the whole binding compiler. Binding path syntax errors keep
//! their typed `ParseError`; semantic failures name the type or member that did
//! not resolve.

use thiserror::Error;

use crate::binding_path::ParseError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilerError {
    #[error("binding path error: {0}")]
    BindingPath(#[from] ParseError),

    #[error("unresolved type '{0}'")]
    UnresolvedType(String),

    #[error("type '{owner}' has no property '{name}'")]
    UnknownProperty { owner: String, name: String },

    #[error("type '{owner}' has no attached property '{name}'")]
    UnknownAttachedProperty { owner: String, name: String },

    #[error("type '{owner}' has no indexer taking ({parameters})")]
    UnknownIndexer { owner: String, parameters: String },

    #[error("unsupported binding: {0}")]
    UnsupportedBinding(String),

    #[error("element '{0}' referenced by ElementName was not found")]
    ElementNotFound(String),

    #[error("invalid markup extension: {0}")]
    MarkupExtension(String),

    #[error("xml error at {line}:{col}: {message}")]
    Xml {
        message: String,
        line: usize,
        col: usize,
    },
}

impl CompilerError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        CompilerError::UnsupportedBinding(message.into())
    }

    /// Structural errors abort the whole document rather than a single binding.
    pub fn is_structural(&self) -> bool {
        matches!(self, CompilerError::ElementNotFound(_) | CompilerError::Xml { .. })
    }
}

pub type Result<T> = std::result::Result<T, CompilerError>;
