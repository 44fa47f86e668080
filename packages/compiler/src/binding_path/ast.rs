/**
 * Binding Path AST
 *
 * Expression tree produced by the binding path parser. Terminal variants
 * (`Property`, `Indexer`, `AttachedDependencyProperty`) end a path, `...Part`
 * variants are followed by further accessors.
 */

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Unresolved markup type reference (`prefix:LocalName`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XamlType {
    pub namespace_prefix: String,
    pub local_name: String,
}

impl XamlType {
    pub fn new(namespace_prefix: impl Into<String>, local_name: impl Into<String>) -> Self {
        XamlType {
            namespace_prefix: namespace_prefix.into(),
            local_name: local_name.into(),
        }
    }

    /// Parse `prefix:Name` or `Name`.
    pub fn parse(text: &str) -> Self {
        match text.trim().split_once(':') {
            Some((prefix, name)) => XamlType::new(prefix.trim(), name.trim()),
            None => XamlType::new("", text.trim()),
        }
    }
}

impl fmt::Display for XamlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_prefix.is_empty() {
            write!(f, "{}", self.local_name)
        } else {
            write!(f, "{}:{}", self.namespace_prefix, self.local_name)
        }
    }
}

/// Indexer argument, optionally cast: `(sys:Int32)42`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub cast_type: Option<XamlType>,
    pub value: String,
}

impl Literal {
    pub fn new(cast_type: Option<XamlType>, value: impl Into<String>) -> Self {
        Literal {
            cast_type,
            value: value.into(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cast_type {
            Some(cast_type) => write!(f, "({}){}", cast_type, self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

pub type Literals = SmallVec<[Literal; 2]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
}

impl Property {
    pub fn new(name: impl Into<String>) -> Self {
        Property { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indexer {
    pub literals: Literals,
}

impl Indexer {
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self {
        Indexer {
            literals: literals.into_iter().collect(),
        }
    }
}

impl fmt::Display for Indexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, literal) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", literal)?;
        }
        write!(f, "]")
    }
}

/// `(Owner.Property)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedDependencyProperty {
    pub owner: XamlType,
    pub name: String,
}

impl AttachedDependencyProperty {
    pub fn new(owner: XamlType, name: impl Into<String>) -> Self {
        AttachedDependencyProperty {
            owner,
            name: name.into(),
        }
    }
}

impl fmt::Display for AttachedDependencyProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}.{})", self.owner, self.name)
    }
}

/// `source.property`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAccessor {
    pub source: Box<BindingPathExpression>,
    pub property: Box<BindingPathExpression>,
}

/// `source[indexer]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerAccessor {
    pub source: Box<BindingPathExpression>,
    pub indexer: Box<BindingPathExpression>,
}

impl PropertyAccessor {
    pub const OPERATOR: &'static str = ".";
}

impl IndexerAccessor {
    pub const OPERATOR: &'static str = "";
}

/// Binding path expression tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BindingPathExpression {
    DataContextSource,
    Property(Property),
    PropertyPart(Property),
    Indexer(Indexer),
    IndexerPart(Indexer),
    AttachedDependencyProperty(AttachedDependencyProperty),
    AttachedDependencyPropertyPart(AttachedDependencyProperty),
    PropertyAccessor(PropertyAccessor),
    IndexerAccessor(IndexerAccessor),
}

impl BindingPathExpression {
    pub fn property_accessor(source: BindingPathExpression, property: BindingPathExpression) -> Self {
        BindingPathExpression::PropertyAccessor(PropertyAccessor {
            source: Box::new(source),
            property: Box::new(property),
        })
    }

    pub fn indexer_accessor(source: BindingPathExpression, indexer: BindingPathExpression) -> Self {
        BindingPathExpression::IndexerAccessor(IndexerAccessor {
            source: Box::new(source),
            indexer: Box::new(indexer),
        })
    }

    /// True for the variants that bind directly to the target.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BindingPathExpression::DataContextSource
                | BindingPathExpression::Property(_)
                | BindingPathExpression::Indexer(_)
                | BindingPathExpression::AttachedDependencyProperty(_)
        )
    }

    pub fn is_part(&self) -> bool {
        matches!(
            self,
            BindingPathExpression::PropertyPart(_)
                | BindingPathExpression::IndexerPart(_)
                | BindingPathExpression::AttachedDependencyPropertyPart(_)
        )
    }

    pub fn visit<V: BindingPathVisitor>(&self, visitor: &mut V, context: &mut V::Context) -> V::Result {
        match self {
            BindingPathExpression::DataContextSource => visitor.visit_data_context_source(context),
            BindingPathExpression::Property(p) => visitor.visit_property(p, context),
            BindingPathExpression::PropertyPart(p) => visitor.visit_property_part(p, context),
            BindingPathExpression::Indexer(i) => visitor.visit_indexer(i, context),
            BindingPathExpression::IndexerPart(i) => visitor.visit_indexer_part(i, context),
            BindingPathExpression::AttachedDependencyProperty(a) => {
                visitor.visit_attached_dependency_property(a, context)
            }
            BindingPathExpression::AttachedDependencyPropertyPart(a) => {
                visitor.visit_attached_dependency_property_part(a, context)
            }
            BindingPathExpression::PropertyAccessor(a) => visitor.visit_property_accessor(a, context),
            BindingPathExpression::IndexerAccessor(a) => visitor.visit_indexer_accessor(a, context),
        }
    }
}

/// Visitor over the closed set of binding path nodes
pub trait BindingPathVisitor {
    type Context;
    type Result;

    fn visit_data_context_source(&mut self, context: &mut Self::Context) -> Self::Result;
    fn visit_property(&mut self, property: &Property, context: &mut Self::Context) -> Self::Result;
    fn visit_property_part(&mut self, property: &Property, context: &mut Self::Context) -> Self::Result;
    fn visit_indexer(&mut self, indexer: &Indexer, context: &mut Self::Context) -> Self::Result;
    fn visit_indexer_part(&mut self, indexer: &Indexer, context: &mut Self::Context) -> Self::Result;
    fn visit_attached_dependency_property(
        &mut self,
        property: &AttachedDependencyProperty,
        context: &mut Self::Context,
    ) -> Self::Result;
    fn visit_attached_dependency_property_part(
        &mut self,
        property: &AttachedDependencyProperty,
        context: &mut Self::Context,
    ) -> Self::Result;
    fn visit_property_accessor(&mut self, accessor: &PropertyAccessor, context: &mut Self::Context) -> Self::Result;
    fn visit_indexer_accessor(&mut self, accessor: &IndexerAccessor, context: &mut Self::Context) -> Self::Result;
}
