//! Resolves markup type references (`local:Person`, element names) onto
//! `QualifiedType`s through the xmlns declarations in scope.

use indexmap::IndexMap;

use super::{QualifiedType, TypeResolver};
use crate::binding_path::XamlType;
use crate::error::{CompilerError, Result};
use crate::xaml::document::XName;
use crate::xaml::platform::BindingXamlPlatformInfo;

#[derive(Clone, Copy)]
pub struct XamlTypeResolver<'a> {
    namespaces: &'a IndexMap<String, String>,
    platform: &'a BindingXamlPlatformInfo,
    type_resolver: &'a dyn TypeResolver,
}

impl<'a> XamlTypeResolver<'a> {
    pub fn new(
        namespaces: &'a IndexMap<String, String>,
        platform: &'a BindingXamlPlatformInfo,
        type_resolver: &'a dyn TypeResolver,
    ) -> Self {
        XamlTypeResolver {
            namespaces,
            platform,
            type_resolver,
        }
    }

    pub fn type_resolver(&self) -> &'a dyn TypeResolver {
        self.type_resolver
    }

    pub fn platform(&self) -> &'a BindingXamlPlatformInfo {
        self.platform
    }

    /// Resolve an element or attribute owner name (namespace uri + local name).
    pub fn resolve_name(&self, name: &XName) -> Result<QualifiedType> {
        let candidates = self.platform.clr_namespaces(&name.namespace);
        for (namespace, _) in &candidates {
            if let Some(found) = self.type_resolver.find_type(namespace, &name.local_name) {
                return Ok(found);
            }
        }

        // clr-namespace uris fully name the type even when it is not catalogued
        if name.namespace.starts_with("clr-namespace:") || name.namespace.starts_with("using:") {
            if let Some((namespace, assembly)) = candidates.into_iter().next() {
                return Ok(QualifiedType::global(assembly, namespace, name.local_name.clone()));
            }
        }

        Err(CompilerError::UnresolvedType(name.to_string()))
    }

    pub fn resolve(&self, xaml_type: &XamlType) -> Result<QualifiedType> {
        let uri = self
            .namespaces
            .get(&xaml_type.namespace_prefix)
            .ok_or_else(|| CompilerError::UnresolvedType(xaml_type.to_string()))?;
        self.resolve_name(&XName::new(uri.clone(), xaml_type.local_name.clone()))
            .map_err(|_| CompilerError::UnresolvedType(xaml_type.to_string()))
    }

    /// Resolve `prefix:Type` text, e.g. an attribute value.
    pub fn parse(&self, text: &str) -> Result<QualifiedType> {
        self.resolve(&XamlType::parse(text))
    }
}
