/**
 * Type Information
 *
 * Resolved type and property identities plus the `TypeResolver` contract the
 * code generator consults. `TypeCatalog` is a JSON backed implementation,
 * `XamlTypeResolver` maps markup prefixes/namespaces onto resolved types.
 */
pub mod catalog;
pub mod notification_events;
pub mod xaml_type_resolver;

use std::collections::HashSet;
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use catalog::TypeCatalog;
pub use notification_events::{NotificationEvent, ReadOnlyPropertyNotificationEventResolver};
pub use xaml_type_resolver::XamlTypeResolver;

pub const GLOBAL_ALIAS: &str = "global";
pub const OBJECT_TYPE: &str = "System.Object";

/// A resolved type: extern alias, assembly, namespace and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedType {
    pub alias: String,
    pub assembly_name: String,
    pub namespace: String,
    pub type_name: String,
}

impl QualifiedType {
    pub fn new(
        alias: impl Into<String>,
        assembly_name: impl Into<String>,
        namespace: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        QualifiedType {
            alias: alias.into(),
            assembly_name: assembly_name.into(),
            namespace: namespace.into(),
            type_name: type_name.into(),
        }
    }

    pub fn global(
        assembly_name: impl Into<String>,
        namespace: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        QualifiedType::new(GLOBAL_ALIAS, assembly_name, namespace, type_name)
    }

    /// Split a `Namespace.Type` full name; the assembly is unknown.
    pub fn from_full_name(full_name: &str) -> Self {
        match full_name.rsplit_once('.') {
            Some((namespace, type_name)) => QualifiedType::global("", namespace, type_name),
            None => QualifiedType::global("", "", full_name),
        }
    }

    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}.{}", self.namespace, self.type_name)
        }
    }

    /// `global::Namespace.Type` (or `alias::Namespace.Type`)
    pub fn to_alias_qualified_type(&self) -> String {
        format!("{}::{}", self.alias, self.full_name())
    }

    pub fn to_namespace_qualified_type(&self) -> String {
        self.full_name()
    }

    pub fn is_extern_alias(&self) -> bool {
        self.alias != GLOBAL_ALIAS
    }

    pub fn is_object(&self) -> bool {
        self.full_name() == OBJECT_TYPE
    }

    /// Identity ignoring the alias, which only matters for emitted code.
    pub fn same_type(&self, other: &QualifiedType) -> bool {
        self.namespace == other.namespace && self.type_name == other.type_name
    }
}

impl fmt::Display for QualifiedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

bitflags! {
    /// Property traits relevant to binding code generation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PropertyFlags: u8 {
        const READ_ONLY = 0b0000_0001;
        const DEPENDENCY = 0b0000_0010;
        const ATTACHED = 0b0000_0100;
        const INDEXER = 0b0000_1000;
        const BINDS_TWO_WAY_BY_DEFAULT = 0b0001_0000;
    }
}

/// A resolved property, attached property or indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedProperty {
    pub owner: QualifiedType,
    pub name: String,
    pub property_type: QualifiedType,
    pub flags: PropertyFlags,
    pub parameters: Vec<QualifiedType>,
}

impl QualifiedProperty {
    pub fn new(
        owner: QualifiedType,
        name: impl Into<String>,
        property_type: QualifiedType,
        flags: PropertyFlags,
    ) -> Self {
        QualifiedProperty {
            owner,
            name: name.into(),
            property_type,
            flags,
            parameters: Vec::new(),
        }
    }

    pub fn indexer(owner: QualifiedType, parameters: Vec<QualifiedType>, property_type: QualifiedType, flags: PropertyFlags) -> Self {
        QualifiedProperty {
            owner,
            name: "Item".to_string(),
            property_type,
            flags: flags | PropertyFlags::INDEXER,
            parameters,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.flags.contains(PropertyFlags::READ_ONLY)
    }

    pub fn is_dependency_property(&self) -> bool {
        self.flags.contains(PropertyFlags::DEPENDENCY)
    }

    pub fn is_attached(&self) -> bool {
        self.flags.contains(PropertyFlags::ATTACHED)
    }

    pub fn binds_two_way_by_default(&self) -> bool {
        self.flags.contains(PropertyFlags::BINDS_TWO_WAY_BY_DEFAULT)
    }
}

/// Inheritance information for a resolved type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    pub qualified_type: QualifiedType,
    pub base_type: Option<QualifiedType>,
    pub interfaces: Vec<QualifiedType>,
    pub events: Vec<String>,
}

/// Host type information consumed by the binding code generator
pub trait TypeResolver: Send + Sync {
    /// Look up `name` in the CLR `namespace`.
    fn find_type(&self, namespace: &str, name: &str) -> Option<QualifiedType>;

    fn get_type_symbol(&self, qualified_type: &QualifiedType) -> Option<TypeSymbol>;

    /// Instance property (CLR or dependency), including inherited ones.
    fn get_property(&self, qualified_type: &QualifiedType, name: &str) -> Result<QualifiedProperty>;

    fn get_attached_dependency_property(&self, owner: &QualifiedType, name: &str) -> Result<QualifiedProperty>;

    fn get_indexer(&self, qualified_type: &QualifiedType, parameters: &[QualifiedType]) -> Result<QualifiedProperty>;
}

/// Can a value of `source` be assigned to a property of type `target` without
/// conversion. Walks base types and interfaces of `source`.
pub fn is_assignable(type_resolver: &dyn TypeResolver, source: &QualifiedType, target: &QualifiedType) -> bool {
    if target.is_object() || source.same_type(target) {
        return true;
    }

    let mut visited = HashSet::new();
    let mut pending = vec![source.clone()];
    while let Some(current) = pending.pop() {
        if !visited.insert(current.full_name()) {
            continue;
        }

        if current.same_type(target) {
            return true;
        }

        if let Some(symbol) = type_resolver.get_type_symbol(&current) {
            pending.extend(symbol.interfaces);
            pending.extend(symbol.base_type);
        }
    }

    false
}
