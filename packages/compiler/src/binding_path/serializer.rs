/**
 * Binding Path Serializer
 *
 * Serializes a binding path expression back to path text.
 */
use super::ast::*;

/// Serialize a binding path expression to string
pub fn serialize(expression: &BindingPathExpression) -> String {
    let mut visitor = SerializeBindingPathVisitor;
    expression.visit(&mut visitor, &mut ())
}

struct SerializeBindingPathVisitor;

impl BindingPathVisitor for SerializeBindingPathVisitor {
    type Context = ();
    type Result = String;

    fn visit_data_context_source(&mut self, _context: &mut ()) -> String {
        ".".to_string()
    }

    fn visit_property(&mut self, property: &Property, _context: &mut ()) -> String {
        property.name.clone()
    }

    fn visit_property_part(&mut self, property: &Property, _context: &mut ()) -> String {
        property.name.clone()
    }

    fn visit_indexer(&mut self, indexer: &Indexer, _context: &mut ()) -> String {
        indexer.to_string()
    }

    fn visit_indexer_part(&mut self, indexer: &Indexer, _context: &mut ()) -> String {
        indexer.to_string()
    }

    fn visit_attached_dependency_property(
        &mut self,
        property: &AttachedDependencyProperty,
        _context: &mut (),
    ) -> String {
        property.to_string()
    }

    fn visit_attached_dependency_property_part(
        &mut self,
        property: &AttachedDependencyProperty,
        _context: &mut (),
    ) -> String {
        property.to_string()
    }

    fn visit_property_accessor(&mut self, accessor: &PropertyAccessor, context: &mut ()) -> String {
        format!(
            "{}{}{}",
            accessor.source.visit(self, context),
            PropertyAccessor::OPERATOR,
            accessor.property.visit(self, context)
        )
    }

    fn visit_indexer_accessor(&mut self, accessor: &IndexerAccessor, context: &mut ()) -> String {
        format!(
            "{}{}{}",
            accessor.source.visit(self, context),
            IndexerAccessor::OPERATOR,
            accessor.indexer.visit(self, context)
        )
    }
}
