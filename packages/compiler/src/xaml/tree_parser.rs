/**
 * Binding Tree Parser
 *
 * Walks a markup document depth first and collects binding markup extensions
 * into a `BindingTree`:
 *
 * - typed templates (`DataTemplate DataType=...` with an `x:Key`) open a
 *   binding root whose data context is the template's data type
 * - elements declaring a data context type (`d:DataContext`,
 *   `sx:Bindings.DataType`) together with `x:Class` open a binding root
 * - `DataContext="{Binding ...}"` opens a nested data context scope
 * - `ElementName=` bindings are grouped per source element and binding root
 * - `sx:Bindings.OptimizeBindings` switches compilation on or off for an
 *   element and its descendants
 */
use indexmap::IndexMap;
use tracing::debug;

use super::binding_tree::*;
use super::document::{ElementId, XName, XamlDocument, XamlElement};
use super::element_names::XamlElementNameResolver;
use super::markup_extension::{parse_type_reference, BindingAssignment, BindingMarkupExtensionParser};
use super::platform::{BindingXamlPlatformInfo, TypedTemplateDefinition};
use crate::error::{CompilerError, Result};
use crate::type_info::{QualifiedType, TypeResolver, XamlTypeResolver};

const DATA_CONTEXT_ATTRIBUTE_NAME: &str = "DataContext";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplateKind {
    Data,
    Control,
}

struct TreeContext<'a> {
    document: &'a XamlDocument,
    type_resolver: &'a dyn TypeResolver,
    names: &'a mut XamlElementNameResolver,
    roots: Vec<BindingRootNode>,
    skipped: Vec<SkippedBinding>,
}

impl<'a> TreeContext<'a> {
    fn element(&self, id: ElementId) -> &'a XamlElement {
        self.document.element(id)
    }

    fn namespaces(&self, id: ElementId) -> IndexMap<String, String> {
        self.document.namespaces_in_scope(id)
    }
}

pub struct BindingTreeParser<'p> {
    platform: &'p BindingXamlPlatformInfo,
    markup_extension_parser: BindingMarkupExtensionParser,
    opt_in_to_optimizations: bool,
}

impl<'p> BindingTreeParser<'p> {
    pub fn new(
        platform: &'p BindingXamlPlatformInfo,
        markup_extension_parser: BindingMarkupExtensionParser,
        opt_in_to_optimizations: bool,
    ) -> Self {
        BindingTreeParser {
            platform,
            markup_extension_parser,
            opt_in_to_optimizations,
        }
    }

    /// Returns `None` when optimizations are opt-in and the root element does
    /// not opt in. Fails only for structural errors (dangling `ElementName`).
    pub fn parse(
        &self,
        document: &XamlDocument,
        type_resolver: &dyn TypeResolver,
        names: &mut XamlElementNameResolver,
    ) -> Result<Option<BindingTree>> {
        let root = document.root();
        if self.opt_in_to_optimizations && !self.is_optimizing(root, false) {
            return Ok(None);
        }

        let mut context = TreeContext {
            document,
            type_resolver,
            names,
            roots: Vec::new(),
            skipped: Vec::new(),
        };
        let mut bindings = Vec::new();
        self.traverse(&mut context, root.id, None, &mut bindings, true)?;

        Ok(Some(BindingTree {
            roots: context.roots,
            skipped: context.skipped,
        }))
    }

    fn is_optimizing(&self, element: &XamlElement, is_optimizing: bool) -> bool {
        match element.attribute_value(&self.platform.optimize_bindings_name) {
            Some(value) => value.trim().eq_ignore_ascii_case("true"),
            None => is_optimizing,
        }
    }

    fn traverse(
        &self,
        context: &mut TreeContext,
        id: ElementId,
        root_context: Option<&mut BindingRootContext>,
        bindings: &mut Vec<BindingTreeNode>,
        is_optimizing: bool,
    ) -> Result<()> {
        let element = context.element(id);
        let is_optimizing = self.is_optimizing(element, is_optimizing);

        if element.is_property_element() {
            return self.traverse_children(context, id, root_context, bindings, is_optimizing);
        }

        if self.try_traverse_typed_template(context, id, is_optimizing, TemplateKind::Data)? {
            return Ok(());
        }

        if self.try_traverse_typed_template(context, id, is_optimizing, TemplateKind::Control)? {
            return Ok(());
        }

        if self.try_traverse_untyped_template(context, id, is_optimizing)? {
            return Ok(());
        }

        if self.platform.unsupported_elements.contains(&element.name) {
            return self.traverse_children(context, id, None, &mut Vec::new(), is_optimizing);
        }

        let element_name = context.names.try_register_name(context.document, id);
        let has_code_behind = root_context.as_ref().map_or(false, |r| r.has_code_behind);
        if self.try_traverse_with_data_context_type(context, id, has_code_behind, &element_name, is_optimizing)? {
            return Ok(());
        }

        self.traverse_element_bindings_and_children(context, id, root_context, bindings, element_name, is_optimizing)
    }

    fn traverse_children(
        &self,
        context: &mut TreeContext,
        id: ElementId,
        mut root_context: Option<&mut BindingRootContext>,
        bindings: &mut Vec<BindingTreeNode>,
        is_optimizing: bool,
    ) -> Result<()> {
        for child in context.element(id).children.iter().copied() {
            self.traverse(context, child, root_context.as_deref_mut(), bindings, is_optimizing)?;
        }
        Ok(())
    }

    fn parse_binding(&self, context: &mut TreeContext, id: ElementId, attribute_index: usize) -> Option<BindingAssignment> {
        let attribute = &context.element(id).attributes[attribute_index];
        match self.markup_extension_parser.parse(attribute) {
            Ok(assignment) => assignment,
            Err(error) => {
                context.skipped.push(SkippedBinding {
                    element: id,
                    attribute: attribute.qualified_name(),
                    reason: error.to_string(),
                });
                None
            }
        }
    }

    fn traverse_element_bindings_and_children(
        &self,
        context: &mut TreeContext,
        id: ElementId,
        mut root_context: Option<&mut BindingRootContext>,
        bindings: &mut Vec<BindingTreeNode>,
        element_name: String,
        is_optimizing: bool,
    ) -> Result<()> {
        let element = context.element(id);
        let data_context_name = XName::local(DATA_CONTEXT_ATTRIBUTE_NAME);
        let mut binding_id = 1;
        let mut next_id = |assignment: &BindingAssignment| {
            if assignment.has_additional_values() {
                let id = binding_id;
                binding_id += 1;
                id
            } else {
                -1
            }
        };

        let mut data_context_node = None;
        if let Some(index) = element.attributes.iter().position(|a| a.name == data_context_name) {
            if let Some(assignment) = self.parse_binding(context, id, index) {
                data_context_node = Some(DataContextTargetBindingNode {
                    binding: BindingNode {
                        target_element: id,
                        element_name: element_name.clone(),
                        id: next_id(&assignment),
                        assignment,
                        is_optimizing,
                    },
                    bindings: Vec::new(),
                });
            }
        }

        let mut scope_bindings = Vec::new();
        for index in 0..element.attributes.len() {
            if element.attributes[index].name == data_context_name {
                continue;
            }

            let assignment = match self.parse_binding(context, id, index) {
                Some(assignment) => assignment,
                None => continue,
            };

            let binding = BindingNode {
                target_element: id,
                element_name: element_name.clone(),
                id: next_id(&assignment),
                assignment,
                is_optimizing,
            };

            match binding.assignment.binding.element_name.clone().filter(|n| !n.is_empty()) {
                Some(source_name) => {
                    let source_element = context
                        .names
                        .resolve(&source_name)
                        .ok_or_else(|| CompilerError::ElementNotFound(source_name.clone()))?;
                    if let Some(root) = root_context.as_deref_mut() {
                        root.element_sources
                            .entry(source_name.clone())
                            .or_insert_with(|| ElementBindingSourceNode {
                                source_element,
                                element_name: source_name,
                                bindings: Vec::new(),
                            })
                            .bindings
                            .push(BindingTreeNode::Binding(binding));
                    }
                }
                None => scope_bindings.push(BindingTreeNode::Binding(binding)),
            }
        }

        match data_context_node {
            Some(mut node) => {
                node.bindings.append(&mut scope_bindings);
                self.traverse_children(context, id, root_context, &mut node.bindings, is_optimizing)?;
                bindings.push(BindingTreeNode::DataContextTarget(node));
            }
            None => {
                bindings.append(&mut scope_bindings);
                self.traverse_children(context, id, root_context, bindings, is_optimizing)?;
            }
        }

        Ok(())
    }

    fn try_traverse_with_data_context_type(
        &self,
        context: &mut TreeContext,
        id: ElementId,
        parent_has_code_behind: bool,
        element_name: &str,
        is_optimizing: bool,
    ) -> Result<bool> {
        let element = context.element(id);
        let data_type = element
            .attribute_value(&self.platform.designer_data_context_name)
            .or_else(|| element.attribute_value(&self.platform.bindings_data_type_name))
            .and_then(parse_type_reference);
        let data_type = match data_type {
            Some(data_type) => data_type,
            None => return Ok(false),
        };

        let namespaces = context.namespaces(id);
        let xaml_types = XamlTypeResolver::new(&namespaces, self.platform, context.type_resolver);
        let cast_type = match xaml_types.parse(&data_type) {
            Ok(cast_type) => cast_type,
            Err(_) => return Ok(false),
        };

        let element_type = match xaml_types.resolve_name(&element.name) {
            Ok(element_type) => element_type,
            Err(_) => return Ok(false),
        };

        let class_name = match element.attribute_value(&self.platform.x_class_name) {
            Some(class_name) if !class_name.trim().is_empty() => class_name.trim().to_string(),
            _ => return Ok(false),
        };

        let mut root_context = BindingRootContext::new(parent_has_code_behind || !class_name.is_empty());
        let root_index = context.roots.len();
        context.roots.push(BindingRootNode {
            element: id,
            modifications_root: id,
            root_type: binding_root_type(&class_name, &element_type),
            name: binding_root_name(&class_name, &cast_type.type_name),
            bindings: Vec::new(),
            has_code_behind: root_context.has_code_behind,
        });
        debug!(root = %context.roots[root_index].name, data_type = %cast_type, "binding root");

        let mut cast_bindings = Vec::new();
        self.traverse_element_bindings_and_children(
            context,
            id,
            Some(&mut root_context),
            &mut cast_bindings,
            element_name.to_string(),
            is_optimizing,
        )?;

        let mut root_bindings = vec![BindingTreeNode::CastDataContextBindingSource(
            CastDataContextBindingSourceNode {
                element: id,
                element_name: element_name.to_string(),
                name: class_name,
                cast_type,
                content_element: None,
                bindings: cast_bindings,
            },
        )];
        root_bindings.extend(
            root_context
                .element_sources
                .into_values()
                .map(BindingTreeNode::ElementBindingSource),
        );
        context.roots[root_index].bindings = root_bindings;
        Ok(true)
    }

    fn template_definition(&self, element: &XamlElement, kind: TemplateKind) -> Option<&'p TypedTemplateDefinition> {
        let definitions = match kind {
            TemplateKind::Data => &self.platform.data_template_definitions,
            TemplateKind::Control => &self.platform.control_template_definitions,
        };
        definitions.iter().find(|d| d.full_name == element.name)
    }

    fn try_traverse_typed_template(
        &self,
        context: &mut TreeContext,
        id: ElementId,
        is_optimizing: bool,
        kind: TemplateKind,
    ) -> Result<bool> {
        let element = context.element(id);
        let definition = match self.template_definition(element, kind) {
            Some(definition) => definition,
            None => return Ok(false),
        };

        let element_name = context.names.try_register_name(context.document, id);
        let content = match template_content_element(context.document, id, &definition.full_name.local_name) {
            Some(content) => content,
            None => return Ok(true),
        };

        match self.typed_template_root(context, id, content, definition)? {
            Some((key, cast_type, content_type)) => {
                let root_index = context.roots.len();
                context.roots.push(BindingRootNode {
                    element: id,
                    modifications_root: content,
                    root_type: content_type.to_namespace_qualified_type(),
                    name: binding_root_name(&key, &cast_type.type_name),
                    bindings: Vec::new(),
                    has_code_behind: false,
                });
                debug!(root = %context.roots[root_index].name, data_type = %cast_type, "template binding root");

                let mut root_context = BindingRootContext::new(false);
                let mut template_bindings = Vec::new();
                self.traverse(context, content, Some(&mut root_context), &mut template_bindings, is_optimizing)?;

                let node = CastDataContextBindingSourceNode {
                    element: id,
                    element_name,
                    name: key,
                    cast_type,
                    content_element: Some(content),
                    bindings: template_bindings,
                };
                let mut root_bindings = vec![match kind {
                    TemplateKind::Data => BindingTreeNode::DataTemplateCastDataContextBindingSource(node),
                    TemplateKind::Control => BindingTreeNode::ControlTemplateCastDataContextBindingSource(node),
                }];
                root_bindings.extend(
                    root_context
                        .element_sources
                        .into_values()
                        .map(BindingTreeNode::ElementBindingSource),
                );
                context.roots[root_index].bindings = root_bindings;
            }
            None => {
                self.traverse(context, content, None, &mut Vec::new(), is_optimizing)?;
            }
        }

        Ok(true)
    }

    /// Key, data type and content type of a typed template, or `None` when the
    /// template has no usable type information.
    fn typed_template_root(
        &self,
        context: &mut TreeContext,
        id: ElementId,
        content: ElementId,
        definition: &TypedTemplateDefinition,
    ) -> Result<Option<(String, QualifiedType, QualifiedType)>> {
        let element = context.element(id);
        let type_reference = match element
            .attribute_value(&definition.type_property_name)
            .and_then(parse_type_reference)
        {
            Some(type_reference) => type_reference,
            None => return Ok(None),
        };

        let key = match element.attribute_value(&self.platform.x_key_name) {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => return Ok(None),
        };

        let namespaces = context.namespaces(id);
        let xaml_types = XamlTypeResolver::new(&namespaces, self.platform, context.type_resolver);
        let cast_type = match xaml_types.parse(&type_reference) {
            Ok(cast_type) => cast_type,
            Err(_) => return Ok(None),
        };

        let content_type = match xaml_types.resolve_name(&context.element(content).name) {
            Ok(content_type) => content_type,
            Err(_) => return Ok(None),
        };

        Ok(Some((key, cast_type, content_type)))
    }

    fn try_traverse_untyped_template(&self, context: &mut TreeContext, id: ElementId, is_optimizing: bool) -> Result<bool> {
        let element = context.element(id);
        let definition = match self
            .platform
            .items_panel_template_definitions
            .iter()
            .find(|d| d.full_name == element.name)
        {
            Some(definition) => definition,
            None => return Ok(false),
        };

        if let Some(content) = template_content_element(context.document, id, &definition.full_name.local_name) {
            self.traverse(context, content, None, &mut Vec::new(), is_optimizing)?;
        }

        Ok(true)
    }
}

/// The visual content of a template: the first child that is not a property
/// element of the template, or the child of its `Template` property element.
fn template_content_element(document: &XamlDocument, id: ElementId, template_local_name: &str) -> Option<ElementId> {
    let property_prefix = format!("{}.", template_local_name);
    let template_property = format!("{}.Template", template_local_name);
    for child in document.children(id) {
        if !child.name.local_name.starts_with(&property_prefix) {
            return Some(child.id);
        }

        if child.name.local_name == template_property {
            return child.children.first().copied();
        }
    }

    None
}

/// Last segment of a class name or key, falling back to the data type name.
fn binding_root_name(suggested_name: &str, type_name: &str) -> String {
    if suggested_name.is_empty() {
        return type_name.to_string();
    }

    match suggested_name.rsplit_once('.') {
        Some((_, name)) => name.to_string(),
        None => suggested_name.to_string(),
    }
}

fn binding_root_type(suggested_type: &str, container_type: &QualifiedType) -> String {
    if suggested_type.is_empty() {
        container_type.to_namespace_qualified_type()
    } else {
        suggested_type.to_string()
    }
}
