/**
 * Markup Modifications
 *
 * What the markup rewriter has to change once the generated containers are
 * written: per binding root the container type, and per touched element the
 * binding attributes that were compiled away.
 */
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::type_info::QualifiedType;
use crate::xaml::document::ElementId;
use crate::xaml::element_names::ElementName;
use crate::xaml::markup_extension::BindingAssignment;

/// One compiled binding attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingXamlModification {
    pub binding_id: i32,
    pub assignment: BindingAssignment,
}

/// Compiled bindings of one element, in attribute order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingXamlModifications {
    pub element: ElementId,
    /// When generated, the rewriter adds the name to the element.
    pub element_name: ElementName,
    pub modifications: Vec<BindingXamlModification>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XamlModificationInfo {
    pub container_type: QualifiedType,
    /// Element the container is attached to
    pub root_element: ElementId,
    pub elements: Vec<BindingXamlModifications>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XamlModificationCollection {
    pub infos: Vec<XamlModificationInfo>,
}

impl XamlModificationCollection {
    pub fn new() -> Self {
        XamlModificationCollection::default()
    }

    pub fn push(&mut self, info: XamlModificationInfo) {
        self.infos.push(info);
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Number of binding attributes to rewrite across all roots.
    pub fn binding_count(&self) -> usize {
        self.infos
            .iter()
            .flat_map(|i| &i.elements)
            .map(|e| e.modifications.len())
            .sum()
    }
}

/// Collects modifications for one binding root while it is compiled
#[derive(Debug, Default)]
pub struct XamlModificationTracker {
    elements: IndexMap<ElementId, BindingXamlModifications>,
}

impl XamlModificationTracker {
    pub fn new() -> Self {
        XamlModificationTracker::default()
    }

    pub fn add(&mut self, element: ElementId, element_name: &ElementName, modification: BindingXamlModification) {
        self.elements
            .entry(element)
            .or_insert_with(|| BindingXamlModifications {
                element,
                element_name: element_name.clone(),
                modifications: Vec::new(),
            })
            .modifications
            .push(modification);
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn into_info(self, container_type: QualifiedType, root_element: ElementId) -> XamlModificationInfo {
        XamlModificationInfo {
            container_type,
            root_element,
            elements: self.elements.into_values().collect(),
        }
    }
}
