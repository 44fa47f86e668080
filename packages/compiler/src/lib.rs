#![deny(clippy::all)]

/**
 * Xaml Binding Compiler
 *
 * Compiles `{Binding ...}` markup extensions into strongly typed binding
 * statements, grouped into one generated container per typed data context.
 */

// Core modules
pub mod chars;
pub mod compiler;
pub mod error;
pub mod modification;
pub mod settings;

// Parser modules
pub mod binding_path;
pub mod xaml;

// Compilation modules
pub mod codegen;
pub mod type_info;

// Re-exports
pub use compiler::{BindingCompiler, CompileOutput, GeneratedContainer, UnconvertedBinding};
pub use error::{CompilerError, Result};
pub use modification::{
    BindingXamlModification, BindingXamlModifications, XamlModificationCollection, XamlModificationInfo,
};
pub use settings::BindingsOptimizerSettings;
pub use type_info::{QualifiedProperty, QualifiedType, TypeCatalog, TypeResolver};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
