/**
 * Binding Path Code Generator
 *
 * Visits a binding path expression and emits the runtime calls wiring it to
 * the target property:
 *
 * - terminal nodes emit one `Bind...` statement on the current binding source
 * - part nodes declare (or reuse) an intermediate source with `BindPart`
 * - accessor nodes visit their source first and continue from the binding
 *   source it produced
 *
 * Nothing is written to the caller's buffer here; statements go to the
 * `Context` buffer which the caller discards when generation fails.
 */
use indexmap::IndexSet;

use crate::binding_path::{
    AttachedDependencyProperty, BindingPathExpression, BindingPathVisitor, Indexer, IndexerAccessor, Property,
    PropertyAccessor,
};
use crate::error::{CompilerError, Result};
use crate::type_info::{is_assignable, QualifiedType, ReadOnlyPropertyNotificationEventResolver, XamlTypeResolver};
use crate::xaml::binding_tree::BindingNode;
use crate::xaml::markup_extension::BindingMode;

use super::accessor::{
    literal_type, AccessorCodeGenerator, AttachedPropertyAccessorCodeGenerator, IndexerAccessorCodeGenerator,
    PropertyAccessorCodeGenerator,
};
use super::binding_source::{BindingSource, BindingSourceProvider};
use super::code_builder::CodeBuilder;
use super::target_value::TargetValueCodeGenerator;

/// Fixed inputs for generating one binding
pub struct Parameters<'a> {
    pub binding: &'a BindingNode,
    /// Expression reaching the target element from the container
    pub target_expression: String,
    pub xaml_types: XamlTypeResolver<'a>,
    pub notification_events: &'a ReadOnlyPropertyNotificationEventResolver,
}

/// Mutable state threaded through the visit
pub struct Context<'c> {
    pub binding_source: BindingSource,
    pub builder: CodeBuilder,
    pub provider: &'c mut BindingSourceProvider,
    pub extern_aliases: IndexSet<String>,
    /// Cleared once the path passes an indexer
    pub accepts_shared_source: bool,
}

impl<'c> Context<'c> {
    pub fn new(binding_source: BindingSource, provider: &'c mut BindingSourceProvider) -> Self {
        Context {
            binding_source,
            builder: CodeBuilder::create_root(),
            provider,
            extern_aliases: IndexSet::new(),
            accepts_shared_source: true,
        }
    }

    pub fn use_type(&mut self, qualified_type: &QualifiedType) {
        if qualified_type.is_extern_alias() {
            self.extern_aliases.insert(qualified_type.alias.clone());
        }
    }
}

/// Result of a successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeInfo {
    /// Source the terminal statement was emitted on
    pub binding_source: BindingSource,
    /// Type of the bound source value
    pub value_type: QualifiedType,
}

pub struct BindingPathCodeGenerator<'a> {
    parameters: Parameters<'a>,
    target: TargetValueCodeGenerator,
    mode: BindingMode,
    value_type: Option<QualifiedType>,
}

impl<'a> BindingPathCodeGenerator<'a> {
    pub fn new(parameters: Parameters<'a>, target: TargetValueCodeGenerator) -> Self {
        let mode = resolve_binding_mode(parameters.binding.assignment.mode(), &target);
        BindingPathCodeGenerator {
            parameters,
            target,
            mode,
            value_type: None,
        }
    }

    /// The binding mode after resolving `Default` against the target property.
    pub fn mode(&self) -> BindingMode {
        self.mode
    }

    pub fn generate(&mut self, expression: &BindingPathExpression, context: &mut Context<'a>) -> Result<CodeInfo> {
        context.use_type(&self.target.target_type);
        let binding_source = expression.visit(self, context)?;
        let value_type = self
            .value_type
            .clone()
            .unwrap_or_else(|| binding_source.source_type.clone());
        Ok(CodeInfo {
            binding_source,
            value_type,
        })
    }

    fn binding_mode_expression(&self, mode: BindingMode) -> String {
        format!(
            "{}.{}",
            self.parameters.xaml_types.platform().binding_mode_type,
            mode.as_str()
        )
    }

    fn update_source_trigger_expression(&self) -> String {
        format!(
            "{}.{}",
            self.parameters.xaml_types.platform().update_source_trigger_type,
            self.parameters.binding.assignment.binding.update_source_trigger.as_str()
        )
    }

    fn track_types(&self, accessor: &dyn AccessorCodeGenerator, context: &mut Context) {
        for referenced_type in accessor.referenced_types() {
            context.use_type(referenced_type);
        }
    }

    /// Terminal statement binding `accessor` to the target property.
    fn generate_binding(&mut self, accessor: &dyn AccessorCodeGenerator, context: &mut Context) -> Result<BindingSource> {
        self.track_types(accessor, context);
        let type_resolver = self.parameters.xaml_types.type_resolver();
        let is_invariant = is_assignable(type_resolver, accessor.value_type(), self.target.property_type());
        let mut arguments = vec![
            self.parameters.binding.id.to_string(),
            self.parameters.target_expression.clone(),
            accessor.source_property(),
            accessor.getter(),
            self.target.dependency_property(),
            self.target.property_getter(),
        ];

        let method = match self.mode {
            BindingMode::OneWay | BindingMode::OneTime | BindingMode::Default => {
                if self.target.target_property.is_read_only() {
                    return Err(CompilerError::UnsupportedBinding(format!(
                        "target property '{}' is read-only",
                        self.target.target_property.name
                    )));
                }
                arguments.push(self.binding_mode_expression(self.mode));
                if is_invariant {
                    "BindInvariantOneWay"
                } else {
                    "BindOneWay"
                }
            }
            BindingMode::TwoWay | BindingMode::OneWayToSource => {
                let setter = accessor.setter().ok_or_else(|| {
                    CompilerError::UnsupportedBinding(format!(
                        "source property '{}' is read-only and cannot be updated by a {} binding",
                        accessor.accessor().name,
                        self.mode
                    ))
                })?;
                arguments.push(setter);
                arguments.push(self.update_source_trigger_expression());
                arguments.push(self.binding_mode_expression(self.mode));

                if self.target.target_property.is_read_only() {
                    if self.mode == BindingMode::TwoWay {
                        return Err(CompilerError::UnsupportedBinding(format!(
                            "target property '{}' is read-only and cannot be bound two way",
                            self.target.target_property.name
                        )));
                    }

                    let element_type = &self.target.target_property.owner;
                    let event = self
                        .parameters
                        .notification_events
                        .resolve(type_resolver, element_type, &self.target.target_property.name)
                        .ok_or_else(|| {
                            CompilerError::UnsupportedBinding(format!(
                                "no change notification event known for read-only property '{}'",
                                self.target.target_property.name
                            ))
                        })?;
                    context.use_type(&event.owner);
                    arguments.push(format!(
                        "nameof({}.{})",
                        event.owner.to_alias_qualified_type(),
                        event.event_name
                    ));
                }

                if is_invariant {
                    "BindInvariant"
                } else {
                    "Bind"
                }
            }
        };

        let callee = format!("{}.{}", accessor.source().name, method);
        context.builder.print_call(None, &callee, &arguments);
        self.value_type = Some(accessor.value_type().clone());
        Ok(context.binding_source.clone())
    }

    /// Intermediate source for a non terminal segment.
    fn generate_part(&mut self, accessor: &dyn AccessorCodeGenerator, context: &mut Context) -> Result<BindingSource> {
        self.track_types(accessor, context);
        let accepts_shared_source = context.accepts_shared_source && self.mode != BindingMode::OneTime;
        match accessor.binding_source(context.provider, accepts_shared_source) {
            Ok(created) => {
                let part_mode = match self.mode {
                    BindingMode::OneWayToSource => BindingMode::OneWay,
                    mode => mode,
                };
                let arguments = vec![
                    accessor.source_property(),
                    accessor.getter(),
                    self.binding_mode_expression(part_mode),
                ];
                let callee = format!("{}.BindPart", accessor.source().name);
                context.builder.print_call(Some(&created.name), &callee, &arguments);
                Ok(created)
            }
            Err(shared) => Ok(shared),
        }
    }

    fn property_accessor(&self, property: &Property, context: &Context) -> Result<PropertyAccessorCodeGenerator> {
        let source = context.binding_source.clone();
        let resolved = self
            .parameters
            .xaml_types
            .type_resolver()
            .get_property(&source.source_type, &property.name)?;
        Ok(PropertyAccessorCodeGenerator::new(source, resolved))
    }

    fn attached_property_accessor(
        &self,
        property: &AttachedDependencyProperty,
        context: &Context,
    ) -> Result<AttachedPropertyAccessorCodeGenerator> {
        let owner = self.parameters.xaml_types.resolve(&property.owner)?;
        let resolved = self
            .parameters
            .xaml_types
            .type_resolver()
            .get_attached_dependency_property(&owner, &property.name)?;
        Ok(AttachedPropertyAccessorCodeGenerator::new(
            context.binding_source.clone(),
            resolved,
        ))
    }

    /// Left operand of an accessor. A leading `.` reads the current source
    /// and emits nothing.
    fn accessor_source(&mut self, source: &BindingPathExpression, context: &mut Context<'a>) -> Result<BindingSource> {
        match source {
            BindingPathExpression::DataContextSource => Ok(context.binding_source.clone()),
            source => source.visit(self, context),
        }
    }

    fn indexer_accessor(&self, indexer: &Indexer, context: &Context) -> Result<IndexerAccessorCodeGenerator> {
        let source = context.binding_source.clone();
        let arguments = indexer
            .literals
            .iter()
            .map(|literal| literal_type(literal, &self.parameters.xaml_types).map(|t| (literal.clone(), t)))
            .collect::<Result<Vec<_>>>()?;
        let parameter_types: Vec<QualifiedType> = arguments.iter().map(|(_, t)| t.clone()).collect();
        let resolved = self
            .parameters
            .xaml_types
            .type_resolver()
            .get_indexer(&source.source_type, &parameter_types)?;
        Ok(IndexerAccessorCodeGenerator::new(source, resolved, &arguments))
    }
}

impl<'a> BindingPathVisitor for BindingPathCodeGenerator<'a> {
    type Context = Context<'a>;
    type Result = Result<BindingSource>;

    fn visit_data_context_source(&mut self, context: &mut Self::Context) -> Self::Result {
        if self.mode.updates_source() {
            return Err(CompilerError::UnsupportedBinding(format!(
                "the data context itself cannot be bound {}",
                self.mode
            )));
        }

        let source = context.binding_source.clone();
        context.use_type(&source.source_type);
        let type_resolver = self.parameters.xaml_types.type_resolver();
        let method = if is_assignable(type_resolver, &source.source_type, self.target.property_type()) {
            "BindSourceDataContextInvariantOneWay"
        } else {
            "BindSourceDataContextOneWay"
        };
        let arguments = vec![
            self.parameters.binding.id.to_string(),
            self.parameters.target_expression.clone(),
            self.target.dependency_property(),
            self.target.property_getter(),
            self.binding_mode_expression(self.mode),
        ];
        context
            .builder
            .print_call(None, &format!("{}.{}", source.name, method), &arguments);
        self.value_type = Some(source.source_type.clone());
        Ok(source)
    }

    fn visit_property(&mut self, property: &Property, context: &mut Self::Context) -> Self::Result {
        let accessor = self.property_accessor(property, context)?;
        self.generate_binding(&accessor, context)
    }

    fn visit_property_part(&mut self, property: &Property, context: &mut Self::Context) -> Self::Result {
        let accessor = self.property_accessor(property, context)?;
        self.generate_part(&accessor, context)
    }

    fn visit_indexer(&mut self, indexer: &Indexer, context: &mut Self::Context) -> Self::Result {
        let accessor = self.indexer_accessor(indexer, context)?;
        self.generate_binding(&accessor, context)
    }

    fn visit_indexer_part(&mut self, indexer: &Indexer, context: &mut Self::Context) -> Self::Result {
        let accessor = self.indexer_accessor(indexer, context)?;
        let source = self.generate_part(&accessor, context)?;
        context.accepts_shared_source = false;
        Ok(source)
    }

    fn visit_attached_dependency_property(
        &mut self,
        property: &AttachedDependencyProperty,
        context: &mut Self::Context,
    ) -> Self::Result {
        let accessor = self.attached_property_accessor(property, context)?;
        self.generate_binding(&accessor, context)
    }

    fn visit_attached_dependency_property_part(
        &mut self,
        property: &AttachedDependencyProperty,
        context: &mut Self::Context,
    ) -> Self::Result {
        let accessor = self.attached_property_accessor(property, context)?;
        self.generate_part(&accessor, context)
    }

    fn visit_property_accessor(&mut self, accessor: &PropertyAccessor, context: &mut Self::Context) -> Self::Result {
        let source = self.accessor_source(&accessor.source, context)?;
        let previous = std::mem::replace(&mut context.binding_source, source);
        let result = accessor.property.visit(self, context);
        context.binding_source = previous;
        result
    }

    fn visit_indexer_accessor(&mut self, accessor: &IndexerAccessor, context: &mut Self::Context) -> Self::Result {
        let source = self.accessor_source(&accessor.source, context)?;
        let previous = std::mem::replace(&mut context.binding_source, source);
        let result = accessor.indexer.visit(self, context);
        context.binding_source = previous;
        result
    }
}

/// `Default` follows the target property's metadata.
pub fn resolve_binding_mode(mode: BindingMode, target: &TargetValueCodeGenerator) -> BindingMode {
    match mode {
        BindingMode::Default if target.target_property.binds_two_way_by_default() => BindingMode::TwoWay,
        BindingMode::Default => BindingMode::OneWay,
        mode => mode,
    }
}
