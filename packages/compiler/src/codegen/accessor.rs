/**
 * Accessor Code Generators
 *
 * Source side expressions for one path segment read from a binding source:
 * the runtime source property descriptor, the getter lambda and, when the
 * member is writable, the setter lambda.
 */
use crate::binding_path::Literal;
use crate::error::Result;
use crate::type_info::{QualifiedProperty, QualifiedType, XamlTypeResolver};

use super::binding_source::{BindingSource, BindingSourceProvider};

const INT32_TYPE: (&str, &str) = ("System", "Int32");
const STRING_TYPE: (&str, &str) = ("System", "String");
const CHAR_TYPE: (&str, &str) = ("System", "Char");
const INDEXER_SOURCE_PROPERTY: &str = "Item[]";

pub trait AccessorCodeGenerator {
    fn source(&self) -> &BindingSource;

    fn accessor(&self) -> &QualifiedProperty;

    /// Source holding the value of this segment when it is a path part.
    fn binding_source(
        &self,
        provider: &mut BindingSourceProvider,
        accepts_shared_source: bool,
    ) -> std::result::Result<BindingSource, BindingSource>;

    /// `src.CreateSourceProperty(...)`
    fn source_property(&self) -> String;

    fn getter(&self) -> String;

    /// `None` for read-only members.
    fn setter(&self) -> Option<String>;

    fn value_type(&self) -> &QualifiedType {
        &self.accessor().property_type
    }

    /// Types named by the emitted expressions.
    fn referenced_types(&self) -> Vec<&QualifiedType> {
        vec![&self.source().source_type, &self.accessor().owner, &self.accessor().property_type]
    }
}

/// `s.Name`
#[derive(Debug, Clone)]
pub struct PropertyAccessorCodeGenerator {
    source: BindingSource,
    property: QualifiedProperty,
}

impl PropertyAccessorCodeGenerator {
    pub fn new(source: BindingSource, property: QualifiedProperty) -> Self {
        PropertyAccessorCodeGenerator { source, property }
    }
}

impl AccessorCodeGenerator for PropertyAccessorCodeGenerator {
    fn source(&self) -> &BindingSource {
        &self.source
    }

    fn accessor(&self) -> &QualifiedProperty {
        &self.property
    }

    fn binding_source(
        &self,
        provider: &mut BindingSourceProvider,
        accepts_shared_source: bool,
    ) -> std::result::Result<BindingSource, BindingSource> {
        provider.get_or_add_property(&self.source, &self.property, accepts_shared_source)
    }

    fn source_property(&self) -> String {
        format!(
            "{}.CreateSourceProperty(nameof({}.{}))",
            self.source.name,
            self.source.source_type.to_alias_qualified_type(),
            self.property.name
        )
    }

    fn getter(&self) -> String {
        format!("s => s.{}", self.property.name)
    }

    fn setter(&self) -> Option<String> {
        if self.property.is_read_only() {
            return None;
        }
        Some(format!("(s, v) => s.{} = v", self.property.name))
    }
}

/// `Owner.GetName(s)` / `Owner.SetName(s, v)`
#[derive(Debug, Clone)]
pub struct AttachedPropertyAccessorCodeGenerator {
    source: BindingSource,
    property: QualifiedProperty,
}

impl AttachedPropertyAccessorCodeGenerator {
    pub fn new(source: BindingSource, property: QualifiedProperty) -> Self {
        AttachedPropertyAccessorCodeGenerator { source, property }
    }

    fn owner(&self) -> String {
        self.property.owner.to_alias_qualified_type()
    }
}

impl AccessorCodeGenerator for AttachedPropertyAccessorCodeGenerator {
    fn source(&self) -> &BindingSource {
        &self.source
    }

    fn accessor(&self) -> &QualifiedProperty {
        &self.property
    }

    fn binding_source(
        &self,
        provider: &mut BindingSourceProvider,
        accepts_shared_source: bool,
    ) -> std::result::Result<BindingSource, BindingSource> {
        provider.get_or_add_property(&self.source, &self.property, accepts_shared_source)
    }

    fn source_property(&self) -> String {
        format!(
            "{}.CreateSourceProperty({}.{}Property)",
            self.source.name,
            self.owner(),
            self.property.name
        )
    }

    fn getter(&self) -> String {
        format!("s => {}.Get{}(s)", self.owner(), self.property.name)
    }

    fn setter(&self) -> Option<String> {
        if self.property.is_read_only() {
            return None;
        }
        Some(format!("(s, v) => {}.Set{}(s, v)", self.owner(), self.property.name))
    }
}

/// `s[0]`, `s["key"]`
#[derive(Debug, Clone)]
pub struct IndexerAccessorCodeGenerator {
    source: BindingSource,
    indexer: QualifiedProperty,
    arguments: Vec<String>,
}

impl IndexerAccessorCodeGenerator {
    /// `arguments` pairs each literal with the type it was resolved as.
    pub fn new(source: BindingSource, indexer: QualifiedProperty, arguments: &[(Literal, QualifiedType)]) -> Self {
        IndexerAccessorCodeGenerator {
            source,
            indexer,
            arguments: arguments
                .iter()
                .map(|(literal, literal_type)| literal_expression(&literal.value, literal_type))
                .collect(),
        }
    }

    fn arguments(&self) -> String {
        self.arguments.join(", ")
    }
}

impl AccessorCodeGenerator for IndexerAccessorCodeGenerator {
    fn source(&self) -> &BindingSource {
        &self.source
    }

    fn accessor(&self) -> &QualifiedProperty {
        &self.indexer
    }

    fn binding_source(
        &self,
        provider: &mut BindingSourceProvider,
        _accepts_shared_source: bool,
    ) -> std::result::Result<BindingSource, BindingSource> {
        provider.get_or_add_indexer(&self.source, &self.indexer)
    }

    fn source_property(&self) -> String {
        format!("{}.CreateSourceProperty(\"{}\")", self.source.name, INDEXER_SOURCE_PROPERTY)
    }

    fn getter(&self) -> String {
        format!("s => s[{}]", self.arguments())
    }

    fn setter(&self) -> Option<String> {
        if self.indexer.is_read_only() {
            return None;
        }
        Some(format!("(s, v) => s[{}] = v", self.arguments()))
    }
}

/// Type of an indexer literal: the cast type when given, else `Int32` for
/// integers and `String` for anything else.
pub fn literal_type(literal: &Literal, xaml_types: &XamlTypeResolver) -> Result<QualifiedType> {
    if let Some(cast_type) = &literal.cast_type {
        return xaml_types.resolve(cast_type);
    }

    let (namespace, name) = if literal.value.parse::<i32>().is_ok() {
        INT32_TYPE
    } else {
        STRING_TYPE
    };
    Ok(xaml_types
        .type_resolver()
        .find_type(namespace, name)
        .unwrap_or_else(|| QualifiedType::global("System.Runtime", namespace, name)))
}

/// C# literal for `value` typed as `literal_type`.
pub fn literal_expression(value: &str, literal_type: &QualifiedType) -> String {
    let type_name = (literal_type.namespace.as_str(), literal_type.type_name.as_str());
    if type_name == STRING_TYPE {
        format!("\"{}\"", escape_string(value))
    } else if type_name == CHAR_TYPE {
        format!("'{}'", escape_string(value))
    } else if type_name == INT32_TYPE || literal_type.namespace == "System" {
        value.to_string()
    } else {
        format!("({}){}", literal_type.to_alias_qualified_type(), value)
    }
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}
