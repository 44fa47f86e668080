//! Xaml Module
//!
//! Markup document model, binding markup extension parsing and the binding
//! tree parser that groups bindings under typed data context roots.

pub mod binding_tree;
pub mod document;
pub mod element_names;
pub mod markup_extension;
pub mod platform;
pub mod reader;
pub mod tree_parser;

pub use binding_tree::{
    BindingNode, BindingRootNode, BindingTree, BindingTreeNode, CastDataContextBindingSourceNode,
    DataContextTargetBindingNode, ElementBindingSourceNode, SkippedBinding,
};
pub use document::{ElementId, XName, XamlAttribute, XamlDocument, XamlElement};
pub use element_names::{ElementName, XamlElementNameResolver};
pub use markup_extension::{
    BindingAssignment, BindingMarkupExtension, BindingMarkupExtensionParser, BindingMode, UpdateSourceTrigger,
};
pub use platform::BindingXamlPlatformInfo;
pub use reader::parse_document;
pub use tree_parser::BindingTreeParser;
