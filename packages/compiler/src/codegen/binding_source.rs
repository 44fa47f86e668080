/**
 * Binding Sources
 *
 * Every generated `var` in a container is a binding source: the root data
 * context, an element referenced through `ElementName`, or an intermediate
 * part of a multi segment path. The provider hands out unique local names and
 * lets bindings that walk the same path prefix share the part variables.
 */
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::type_info::{QualifiedProperty, QualifiedType};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingSource {
    pub source_type: QualifiedType,
    /// Local variable name in the generated code
    pub name: String,
}

impl BindingSource {
    pub fn new(source_type: QualifiedType, name: impl Into<String>) -> Self {
        BindingSource {
            source_type,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BindingSourceProvider {
    shared: IndexMap<BindingSource, IndexMap<String, BindingSource>>,
    name_ids: IndexMap<String, usize>,
    issued_names: IndexSet<String>,
}

impl BindingSourceProvider {
    pub fn new() -> Self {
        BindingSourceProvider::default()
    }

    /// Source for the value of `property` read from `source`.
    ///
    /// `Ok` is a new source whose declaration the caller must emit. `Err`
    /// carries an existing shared source that is already declared.
    pub fn get_or_add_property(
        &mut self,
        source: &BindingSource,
        property: &QualifiedProperty,
        accepts_shared_source: bool,
    ) -> Result<BindingSource, BindingSource> {
        if accepts_shared_source {
            if let Some(existing) = self.shared.get(source).and_then(|p| p.get(&sharing_key(property))) {
                return Err(existing.clone());
            }
        }

        let suggested_name = format!(
            "{}{}",
            uncapitalize(&source.source_type.type_name),
            capitalize(&property.name)
        );
        let created = BindingSource::new(property.property_type.clone(), self.unique_name(&suggested_name));
        if accepts_shared_source {
            self.shared
                .entry(source.clone())
                .or_default()
                .insert(sharing_key(property), created.clone());
        }

        Ok(created)
    }

    /// Indexer parts are never shared, each call declares a new source.
    pub fn get_or_add_indexer(
        &mut self,
        source: &BindingSource,
        indexer: &QualifiedProperty,
    ) -> Result<BindingSource, BindingSource> {
        let suggested_name = format!("{}Indexer", uncapitalize(&source.source_type.type_name));
        Ok(BindingSource::new(
            indexer.property_type.clone(),
            self.unique_name(&suggested_name),
        ))
    }

    /// Source for an element referenced by name.
    pub fn add_element(&mut self, element_type: &QualifiedType, element_name: &str) -> BindingSource {
        let suggested_name = format!("{}{}", uncapitalize(&element_type.type_name), capitalize(element_name));
        BindingSource::new(element_type.clone(), self.unique_name(&suggested_name))
    }

    pub fn add_data_context(&mut self, data_context_type: &QualifiedType) -> BindingSource {
        let suggested_name = uncapitalize(&data_context_type.type_name);
        BindingSource::new(data_context_type.clone(), self.unique_name(&suggested_name))
    }

    /// `person` and `person1` must not both end up as `person11`.
    fn unique_name(&mut self, suggested_name: &str) -> String {
        let base = sanitize_identifier(suggested_name);
        let id = self.name_ids.entry(base.clone()).or_insert(0);
        loop {
            *id += 1;
            let candidate = format!("{}{}", base, id);
            if self.issued_names.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Attached properties are keyed by their owner so `(A.Info)` and `(B.Info)`
/// read from one source stay distinct parts.
fn sharing_key(property: &QualifiedProperty) -> String {
    if property.is_attached() {
        format!("({}.{})", property.owner.full_name(), property.name)
    } else {
        property.name.clone()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn uncapitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Generic arity markers and other non identifier characters are dropped.
fn sanitize_identifier(name: &str) -> String {
    let sanitized: String = name.chars().filter(|c| c.is_alphanumeric() || *c == '_').collect();
    if sanitized.is_empty() {
        "source".to_string()
    } else {
        sanitized
    }
}
