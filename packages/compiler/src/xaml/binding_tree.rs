/**
 * Binding Tree
 *
 * Bindings found in a markup document, grouped under the binding roots that
 * establish a typed data context. Each root becomes one generated container.
 */
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::document::ElementId;
use super::markup_extension::BindingAssignment;
use crate::type_info::QualifiedType;

/// A binding markup extension on a target element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingNode {
    pub target_element: ElementId,
    pub element_name: String,
    pub assignment: BindingAssignment,
    /// Per element id for bindings carrying additional values, else -1
    pub id: i32,
    pub is_optimizing: bool,
}

/// `DataContext="{Binding ...}"`: the binding itself plus the bindings that
/// read from the new data context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataContextTargetBindingNode {
    pub binding: BindingNode,
    pub bindings: Vec<BindingTreeNode>,
}

/// Bindings using `ElementName=` grouped by source element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBindingSourceNode {
    pub source_element: ElementId,
    pub element_name: String,
    pub bindings: Vec<BindingTreeNode>,
}

/// Data context cast to a declared type (`d:DataContext`, `DataType`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastDataContextBindingSourceNode {
    pub element: ElementId,
    pub element_name: String,
    /// `x:Class` of a view or `x:Key` of a template
    pub name: String,
    pub cast_type: QualifiedType,
    pub content_element: Option<ElementId>,
    pub bindings: Vec<BindingTreeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum BindingTreeNode {
    DataContextTarget(DataContextTargetBindingNode),
    Binding(BindingNode),
    ElementBindingSource(ElementBindingSourceNode),
    CastDataContextBindingSource(CastDataContextBindingSourceNode),
    DataTemplateCastDataContextBindingSource(CastDataContextBindingSourceNode),
    ControlTemplateCastDataContextBindingSource(CastDataContextBindingSourceNode),
}

impl BindingTreeNode {
    /// Child bindings of scope nodes; empty for plain bindings.
    pub fn bindings(&self) -> &[BindingTreeNode] {
        match self {
            BindingTreeNode::DataContextTarget(node) => &node.bindings,
            BindingTreeNode::Binding(_) => &[],
            BindingTreeNode::ElementBindingSource(node) => &node.bindings,
            BindingTreeNode::CastDataContextBindingSource(node)
            | BindingTreeNode::DataTemplateCastDataContextBindingSource(node)
            | BindingTreeNode::ControlTemplateCastDataContextBindingSource(node) => &node.bindings,
        }
    }

    /// Every `BindingNode` below (and including) this node, depth first.
    pub fn binding_nodes(&self) -> Vec<&BindingNode> {
        let mut nodes = Vec::new();
        collect_binding_nodes(self, &mut nodes);
        nodes
    }
}

fn collect_binding_nodes<'a>(node: &'a BindingTreeNode, nodes: &mut Vec<&'a BindingNode>) {
    match node {
        BindingTreeNode::Binding(binding) => nodes.push(binding),
        BindingTreeNode::DataContextTarget(data_context) => {
            nodes.push(&data_context.binding);
            for child in &data_context.bindings {
                collect_binding_nodes(child, nodes);
            }
        }
        _ => {
            for child in node.bindings() {
                collect_binding_nodes(child, nodes);
            }
        }
    }
}

/// One typed data context scope, compiled into one container type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingRootNode {
    pub element: ElementId,
    /// Element whose subtree the generated container is attached to
    pub modifications_root: ElementId,
    /// Namespace qualified type of `modifications_root`
    pub root_type: String,
    pub name: String,
    pub bindings: Vec<BindingTreeNode>,
    pub has_code_behind: bool,
}

/// A binding markup extension that was recognised but cannot be compiled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedBinding {
    pub element: ElementId,
    pub attribute: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingTree {
    pub roots: Vec<BindingRootNode>,
    pub skipped: Vec<SkippedBinding>,
}

/// Per-root state while walking the markup tree
#[derive(Debug, Default)]
pub(crate) struct BindingRootContext {
    pub has_code_behind: bool,
    pub element_sources: IndexMap<String, ElementBindingSourceNode>,
}

impl BindingRootContext {
    pub fn new(has_code_behind: bool) -> Self {
        BindingRootContext {
            has_code_behind,
            element_sources: IndexMap::new(),
        }
    }
}
