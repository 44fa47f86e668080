//! Code Generation Module
//!
//! Turns binding path expressions into runtime binding statements and
//! assembles them into container classes.

pub mod accessor;
pub mod binding_path;
pub mod binding_source;
pub mod code_builder;
pub mod container;
pub mod target_value;

pub use accessor::AccessorCodeGenerator;
pub use binding_path::{BindingPathCodeGenerator, CodeInfo, Context, Parameters};
pub use binding_source::{BindingSource, BindingSourceProvider};
pub use code_builder::CodeBuilder;
pub use container::BindingContainer;
pub use target_value::{target_expression, TargetValueCodeGenerator};
