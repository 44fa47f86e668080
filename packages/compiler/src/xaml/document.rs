/**
 * Markup Document
 *
 * Arena of elements produced by the reader. Elements refer to each other by
 * `ElementId` (index into the arena); the root is always present.
 */
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type ElementId = usize;

pub const XMLNS: &str = "xmlns";

/// Namespace qualified name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XName {
    pub namespace: String,
    pub local_name: String,
}

impl XName {
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        XName {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }

    /// Name without namespace; unprefixed attributes use these.
    pub fn local(local_name: impl Into<String>) -> Self {
        XName::new("", local_name)
    }

    /// Split a dotted member name: `Grid.Row` -> `Some(("Grid", "Row"))`.
    pub fn split_member(&self) -> Option<(&str, &str)> {
        self.local_name.rsplit_once('.')
    }
}

impl fmt::Display for XName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.local_name)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local_name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XamlAttribute {
    pub name: XName,
    pub prefix: String,
    pub value: String,
    pub line: usize,
    pub col: usize,
}

impl XamlAttribute {
    /// The attribute as written in markup, `prefix:Local` or `Local`.
    pub fn qualified_name(&self) -> String {
        if self.prefix.is_empty() {
            self.name.local_name.clone()
        } else {
            format!("{}:{}", self.prefix, self.name.local_name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XamlElement {
    pub id: ElementId,
    pub name: XName,
    pub prefix: String,
    pub attributes: Vec<XamlAttribute>,
    /// `xmlns` declarations on this element: prefix ("" for default) -> uri
    pub namespaces: IndexMap<String, String>,
    pub children: Vec<ElementId>,
    pub parent: Option<ElementId>,
    pub text: String,
    pub line: usize,
    pub col: usize,
}

impl XamlElement {
    pub fn attribute(&self, name: &XName) -> Option<&XamlAttribute> {
        self.attributes.iter().find(|a| &a.name == name)
    }

    pub fn attribute_value(&self, name: &XName) -> Option<&str> {
        self.attribute(name).map(|a| a.value.as_str())
    }

    /// Property elements such as `<Grid.Resources>` carry a dotted name.
    pub fn is_property_element(&self) -> bool {
        self.name.local_name.contains('.')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XamlDocument {
    elements: Vec<XamlElement>,
    root: ElementId,
}

impl XamlDocument {
    pub fn new(elements: Vec<XamlElement>, root: ElementId) -> Self {
        XamlDocument { elements, root }
    }

    pub fn root(&self) -> &XamlElement {
        &self.elements[self.root]
    }

    pub fn root_id(&self) -> ElementId {
        self.root
    }

    pub fn element(&self, id: ElementId) -> &XamlElement {
        &self.elements[id]
    }

    pub fn elements(&self) -> impl Iterator<Item = &XamlElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn children(&self, id: ElementId) -> impl Iterator<Item = &XamlElement> {
        self.elements[id].children.iter().map(move |child| &self.elements[*child])
    }

    /// Pre-order walk starting at (and including) `id`.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.elements[current].children.iter().rev());
        }
        order
    }

    /// Prefix -> namespace uri mappings visible at `id`; inner declarations win.
    pub fn namespaces_in_scope(&self, id: ElementId) -> IndexMap<String, String> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(element_id) = current {
            chain.push(element_id);
            current = self.elements[element_id].parent;
        }

        let mut namespaces = IndexMap::new();
        for element_id in chain.into_iter().rev() {
            for (prefix, uri) in &self.elements[element_id].namespaces {
                namespaces.insert(prefix.clone(), uri.clone());
            }
        }
        namespaces
    }

    /// Prefix currently bound to `uri` at `id`, if any.
    pub fn prefix_of_namespace(&self, id: ElementId, uri: &str) -> Option<String> {
        self.namespaces_in_scope(id)
            .into_iter()
            .rev()
            .find(|(_, namespace)| namespace == uri)
            .map(|(prefix, _)| prefix)
    }
}
