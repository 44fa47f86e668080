//! Element Names
//!
//! Stable, collision free names for markup elements. Declared `x:Name`/`Name`
//! values are kept, other elements get `{LocalName}{n}` with one counter per
//! document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::document::{ElementId, XamlDocument};
use super::platform::BindingXamlPlatformInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementName {
    pub name: String,
    /// The markup does not declare this name; the rewriter has to add it.
    pub is_generated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct XamlElementNameResolver {
    names: IndexMap<ElementId, ElementName>,
    declared: IndexMap<String, ElementId>,
    counter: usize,
}

impl XamlElementNameResolver {
    /// Collects every declared name up front so `ElementName` may refer to
    /// elements that appear later in the document.
    pub fn new(document: &XamlDocument, platform: &BindingXamlPlatformInfo) -> Self {
        let mut resolver = XamlElementNameResolver::default();
        for element in document.elements() {
            let declared = element
                .attributes
                .iter()
                .find(|a| platform.is_name_attribute(&a.name))
                .map(|a| a.value.trim());
            if let Some(name) = declared.filter(|n| !n.is_empty()) {
                resolver.declared.entry(name.to_string()).or_insert(element.id);
                resolver.names.insert(
                    element.id,
                    ElementName {
                        name: name.to_string(),
                        is_generated: false,
                    },
                );
            }
        }
        resolver
    }

    /// Name of `id`, generating one on first request.
    pub fn try_register_name(&mut self, document: &XamlDocument, id: ElementId) -> String {
        if let Some(existing) = self.names.get(&id) {
            return existing.name.clone();
        }

        let local_name = &document.element(id).name.local_name;
        let name = loop {
            self.counter += 1;
            let candidate = format!("{}{}", local_name.replace('.', "_"), self.counter);
            if !self.declared.contains_key(&candidate) {
                break candidate;
            }
        };

        self.declared.insert(name.clone(), id);
        self.names.insert(
            id,
            ElementName {
                name: name.clone(),
                is_generated: true,
            },
        );
        name
    }

    /// Element declaring (or assigned) `name`.
    pub fn resolve(&self, name: &str) -> Option<ElementId> {
        self.declared.get(name).copied()
    }

    pub fn name_of(&self, id: ElementId) -> Option<&ElementName> {
        self.names.get(&id)
    }
}
