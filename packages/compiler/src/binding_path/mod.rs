//! Binding Path Module
//!
//! Lexer, parser and tree for the binding path mini-language used inside
//! `{Binding Path=...}` markup extensions.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod serializer;

pub use ast::*;
pub use lexer::{Lexeme, Lexemes, Lexer, TokenKind};
pub use parser::{BindingPathError, BindingPathParser, ParseError};
pub use serializer::serialize;
