//! JSON Type Catalog
//!
//! Host type information exported as JSON:
//!
//! ```json
//! { "types": [ { "assembly": "PresentationFramework",
//!                "namespace": "System.Windows.Controls", "name": "TextBlock",
//!                "baseType": "System.Windows.FrameworkElement",
//!                "properties": [ { "name": "Text", "type": "System.String",
//!                                  "dependency": true } ] } ] }
//! ```
//!
//! Types are referenced by full name. Referenced types missing from the catalog
//! still resolve to a `QualifiedType` (with an unknown assembly) so that
//! property types such as `System.Double` need not be listed.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{PropertyFlags, QualifiedProperty, QualifiedType, TypeResolver, TypeSymbol, GLOBAL_ALIAS};
use crate::error::{CompilerError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCatalogFile {
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeEntry {
    pub alias: Option<String>,
    pub assembly: String,
    pub namespace: String,
    pub name: String,
    pub base_type: Option<String>,
    pub interfaces: Vec<String>,
    pub properties: Vec<PropertyEntry>,
    pub attached_properties: Vec<PropertyEntry>,
    pub indexers: Vec<IndexerEntry>,
    pub events: Vec<String>,
}

impl TypeEntry {
    fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub read_only: bool,
    pub dependency: bool,
    pub binds_two_way_by_default: bool,
}

impl PropertyEntry {
    fn flags(&self) -> PropertyFlags {
        let mut flags = PropertyFlags::empty();
        flags.set(PropertyFlags::READ_ONLY, self.read_only);
        flags.set(PropertyFlags::DEPENDENCY, self.dependency);
        flags.set(PropertyFlags::BINDS_TWO_WAY_BY_DEFAULT, self.binds_two_way_by_default);
        flags
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexerEntry {
    pub parameters: Vec<String>,
    #[serde(rename = "type")]
    pub property_type: String,
    pub read_only: bool,
}

/// `TypeResolver` over a JSON catalog, types indexed by full name
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: IndexMap<String, TypeEntry>,
}

impl TypeCatalog {
    pub fn new(types: impl IntoIterator<Item = TypeEntry>) -> Self {
        TypeCatalog {
            types: types.into_iter().map(|t| (t.full_name(), t)).collect(),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let file: TypeCatalogFile = serde_json::from_str(json)?;
        Ok(TypeCatalog::new(file.types))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(TypeCatalog::from_json(&content)?)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn entry(&self, qualified_type: &QualifiedType) -> Option<&TypeEntry> {
        self.types.get(&qualified_type.full_name())
    }

    fn qualified_type(&self, full_name: &str) -> QualifiedType {
        match self.types.get(full_name) {
            Some(entry) => to_qualified_type(entry),
            None => QualifiedType::from_full_name(full_name),
        }
    }

    /// The entry for `qualified_type` followed by its base types.
    fn hierarchy<'a>(&'a self, qualified_type: &QualifiedType) -> impl Iterator<Item = &'a TypeEntry> + 'a {
        let mut next = self.entry(qualified_type);
        let mut depth = 0;
        std::iter::from_fn(move || {
            let current = next?;
            depth += 1;
            next = if depth < self.types.len() {
                current.base_type.as_ref().and_then(|base| self.types.get(base))
            } else {
                None
            };
            Some(current)
        })
    }
}

fn to_qualified_type(entry: &TypeEntry) -> QualifiedType {
    QualifiedType::new(
        entry.alias.as_deref().unwrap_or(GLOBAL_ALIAS),
        entry.assembly.clone(),
        entry.namespace.clone(),
        entry.name.clone(),
    )
}

impl TypeResolver for TypeCatalog {
    fn find_type(&self, namespace: &str, name: &str) -> Option<QualifiedType> {
        let full_name = if namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", namespace, name)
        };
        self.types.get(&full_name).map(to_qualified_type)
    }

    fn get_type_symbol(&self, qualified_type: &QualifiedType) -> Option<TypeSymbol> {
        let entry = self.entry(qualified_type)?;
        Some(TypeSymbol {
            qualified_type: to_qualified_type(entry),
            base_type: entry.base_type.as_deref().map(|base| self.qualified_type(base)),
            interfaces: entry.interfaces.iter().map(|i| self.qualified_type(i)).collect(),
            events: entry.events.clone(),
        })
    }

    fn get_property(&self, qualified_type: &QualifiedType, name: &str) -> Result<QualifiedProperty> {
        for entry in self.hierarchy(qualified_type) {
            if let Some(property) = entry.properties.iter().find(|p| p.name == name) {
                return Ok(QualifiedProperty::new(
                    to_qualified_type(entry),
                    property.name.clone(),
                    self.qualified_type(&property.property_type),
                    property.flags(),
                ));
            }
        }

        Err(CompilerError::UnknownProperty {
            owner: qualified_type.full_name(),
            name: name.to_string(),
        })
    }

    fn get_attached_dependency_property(&self, owner: &QualifiedType, name: &str) -> Result<QualifiedProperty> {
        for entry in self.hierarchy(owner) {
            if let Some(property) = entry.attached_properties.iter().find(|p| p.name == name) {
                return Ok(QualifiedProperty::new(
                    to_qualified_type(entry),
                    property.name.clone(),
                    self.qualified_type(&property.property_type),
                    property.flags() | PropertyFlags::ATTACHED | PropertyFlags::DEPENDENCY,
                ));
            }
        }

        Err(CompilerError::UnknownAttachedProperty {
            owner: owner.full_name(),
            name: name.to_string(),
        })
    }

    fn get_indexer(&self, qualified_type: &QualifiedType, parameters: &[QualifiedType]) -> Result<QualifiedProperty> {
        for entry in self.hierarchy(qualified_type) {
            let matching = entry.indexers.iter().find(|indexer| {
                indexer.parameters.len() == parameters.len()
                    && indexer
                        .parameters
                        .iter()
                        .zip(parameters)
                        .all(|(declared, given)| *declared == given.full_name() || declared == super::OBJECT_TYPE)
            });

            if let Some(indexer) = matching {
                let mut flags = PropertyFlags::empty();
                flags.set(PropertyFlags::READ_ONLY, indexer.read_only);
                return Ok(QualifiedProperty::indexer(
                    to_qualified_type(entry),
                    indexer.parameters.iter().map(|p| self.qualified_type(p)).collect(),
                    self.qualified_type(&indexer.property_type),
                    flags,
                ));
            }
        }

        Err(CompilerError::UnknownIndexer {
            owner: qualified_type.full_name(),
            parameters: parameters.iter().map(|p| p.full_name()).collect::<Vec<_>>().join(", "),
        })
    }
}
