//! Compiler Main Module
//!
//! `BindingCompiler` runs one markup document through the whole pipeline:
//! document -> binding tree -> generated container per binding root, plus the
//! markup modifications for the compiled bindings and the list of bindings
//! that stay with the runtime's reflection based binding.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::binding_path::BindingPathParser;
use crate::codegen::binding_path::{BindingPathCodeGenerator, CodeInfo, Context, Parameters};
use crate::codegen::binding_source::{BindingSource, BindingSourceProvider};
use crate::codegen::code_builder::CodeBuilder;
use crate::codegen::container::BindingContainer;
use crate::codegen::target_value::{target_expression, TargetValueCodeGenerator};
use crate::error::Result;
use crate::modification::{BindingXamlModification, XamlModificationCollection, XamlModificationTracker};
use crate::settings::BindingsOptimizerSettings;
use crate::type_info::{QualifiedType, ReadOnlyPropertyNotificationEventResolver, TypeResolver, XamlTypeResolver};
use crate::xaml::binding_tree::{BindingNode, BindingRootNode, BindingTreeNode, SkippedBinding};
use crate::xaml::document::{ElementId, XamlDocument};
use crate::xaml::element_names::{ElementName, XamlElementNameResolver};
use crate::xaml::markup_extension::BindingMarkupExtensionParser;
use crate::xaml::reader::parse_document;
use crate::xaml::tree_parser::BindingTreeParser;

/// A binding left to the runtime, with the reason it was not compiled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnconvertedBinding {
    pub element: ElementId,
    pub element_name: String,
    pub attribute: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContainer {
    pub container_type: QualifiedType,
    /// `Namespace.NameBindingContainer.g.cs`
    pub file_name: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOutput {
    pub containers: Vec<GeneratedContainer>,
    pub modifications: XamlModificationCollection,
    pub unconverted: Vec<UnconvertedBinding>,
    /// Binding attributes whose markup extension could not be parsed
    pub skipped: Vec<SkippedBinding>,
}

impl CompileOutput {
    pub fn converted_count(&self) -> usize {
        self.modifications.binding_count()
    }
}

struct CompiledBinding {
    code: CodeBuilder,
    extern_aliases: IndexSet<String>,
    info: CodeInfo,
    target_expression: String,
}

/// State for compiling one binding root into one container
struct RootCompilation<'r> {
    document: &'r XamlDocument,
    names: &'r XamlElementNameResolver,
    root: &'r BindingRootNode,
    provider: BindingSourceProvider,
    extern_aliases: IndexSet<String>,
    tracker: XamlModificationTracker,
    unconverted: Vec<UnconvertedBinding>,
}

impl<'r> RootCompilation<'r> {
    fn new(document: &'r XamlDocument, names: &'r XamlElementNameResolver, root: &'r BindingRootNode) -> Self {
        RootCompilation {
            document,
            names,
            root,
            provider: BindingSourceProvider::new(),
            extern_aliases: IndexSet::new(),
            tracker: XamlModificationTracker::new(),
            unconverted: Vec::new(),
        }
    }

    fn use_type(&mut self, qualified_type: &QualifiedType) {
        if qualified_type.is_extern_alias() {
            self.extern_aliases.insert(qualified_type.alias.clone());
        }
    }

    fn converted(&mut self, binding: &BindingNode) {
        let element_name = self
            .names
            .name_of(binding.target_element)
            .cloned()
            .unwrap_or_else(|| ElementName {
                name: binding.element_name.clone(),
                is_generated: false,
            });
        self.tracker.add(
            binding.target_element,
            &element_name,
            BindingXamlModification {
                binding_id: binding.id,
                assignment: binding.assignment.clone(),
            },
        );
    }

    fn unconverted(&mut self, binding: &BindingNode, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(
            element = %binding.element_name,
            attribute = %binding.assignment.attribute_name,
            path = %binding.assignment.binding.path,
            reason = %reason,
            "binding not compiled"
        );
        self.unconverted.push(UnconvertedBinding {
            element: binding.target_element,
            element_name: binding.element_name.clone(),
            attribute: binding.assignment.attribute_name.clone(),
            reason,
        });
    }

    /// Every optimizing binding below `nodes` stays with the runtime.
    fn unconverted_all(&mut self, nodes: &[BindingTreeNode], reason: &str) {
        for node in nodes {
            for binding in node.binding_nodes() {
                if binding.is_optimizing {
                    self.unconverted(binding, reason);
                }
            }
        }
    }
}

pub struct BindingCompiler<'a> {
    settings: &'a BindingsOptimizerSettings,
    type_resolver: &'a dyn TypeResolver,
    notification_events: ReadOnlyPropertyNotificationEventResolver,
}

impl<'a> BindingCompiler<'a> {
    pub fn new(settings: &'a BindingsOptimizerSettings, type_resolver: &'a dyn TypeResolver) -> Self {
        BindingCompiler {
            settings,
            type_resolver,
            notification_events: ReadOnlyPropertyNotificationEventResolver::new(
                settings.platform.read_only_notification_events.clone(),
            ),
        }
    }

    /// `None` when the document does not opt in to optimizations.
    pub fn compile_source(&self, source: &str) -> Result<Option<CompileOutput>> {
        let document = parse_document(source)?;
        self.compile_document(&document)
    }

    pub fn compile_document(&self, document: &XamlDocument) -> Result<Option<CompileOutput>> {
        let platform = &self.settings.platform;
        let mut names = XamlElementNameResolver::new(document, platform);
        let parser = BindingTreeParser::new(
            platform,
            BindingMarkupExtensionParser::new(),
            self.settings.opt_in_to_optimizations,
        );
        let tree = match parser.parse(document, self.type_resolver, &mut names)? {
            Some(tree) => tree,
            None => {
                debug!("document does not opt in to binding optimizations");
                return Ok(None);
            }
        };

        let mut output = CompileOutput {
            skipped: tree.skipped,
            ..CompileOutput::default()
        };
        for root in &tree.roots {
            self.compile_root(document, &names, root, &mut output);
        }

        Ok(Some(output))
    }

    fn compile_root(
        &self,
        document: &XamlDocument,
        names: &XamlElementNameResolver,
        root: &BindingRootNode,
        output: &mut CompileOutput,
    ) {
        let mut state = RootCompilation::new(document, names, root);
        let mut body = CodeBuilder::create_root();
        self.compile_nodes(&mut state, &root.bindings, None, &mut body);
        output.unconverted.append(&mut state.unconverted);

        if state.tracker.is_empty() {
            debug!(root = %root.name, "no bindings compiled, container omitted");
            return;
        }

        let mut container = BindingContainer::new(&root.name, self.container_namespace(root), root.root_type.clone());
        container.extern_aliases = state.extern_aliases;
        container.body = body;

        let container_type = QualifiedType::global(
            self.settings.assembly_name.clone(),
            container.namespace.clone(),
            container.name.clone(),
        );
        debug!(container = %container_type, "generated binding container");
        output.containers.push(GeneratedContainer {
            container_type: container_type.clone(),
            file_name: format!("{}.g.cs", container.full_name()),
            source: container.to_source(&self.settings.platform.runtime_namespace),
        });
        output
            .modifications
            .push(state.tracker.into_info(container_type, root.modifications_root));
    }

    fn container_namespace(&self, root: &BindingRootNode) -> String {
        if !self.settings.namespace.is_empty() {
            return self.settings.namespace.clone();
        }

        // template roots are typed by their content element, not a class of the project
        match root.root_type.rsplit_once('.') {
            Some((namespace, _)) if root.has_code_behind => namespace.to_string(),
            _ => self.settings.assembly_name.clone(),
        }
    }

    fn compile_nodes(
        &self,
        state: &mut RootCompilation,
        nodes: &[BindingTreeNode],
        source: Option<&BindingSource>,
        builder: &mut CodeBuilder,
    ) {
        for node in nodes {
            self.compile_node(state, node, source, builder);
        }
    }

    fn compile_node(
        &self,
        state: &mut RootCompilation,
        node: &BindingTreeNode,
        source: Option<&BindingSource>,
        builder: &mut CodeBuilder,
    ) {
        match node {
            BindingTreeNode::Binding(binding) => {
                if !binding.is_optimizing {
                    return;
                }
                let source = match source {
                    Some(source) => source,
                    None => {
                        state.unconverted(binding, "binding has no typed data context");
                        return;
                    }
                };
                match self.compile_binding(state, binding, source) {
                    Ok(compiled) => {
                        builder.append(&compiled.code);
                        state.extern_aliases.extend(compiled.extern_aliases);
                        state.converted(binding);
                    }
                    Err(error) => state.unconverted(binding, error.to_string()),
                }
            }
            BindingTreeNode::DataContextTarget(node) => {
                let binding = &node.binding;
                if !binding.is_optimizing {
                    state.unconverted_all(&node.bindings, "data context binding is not optimized");
                    return;
                }
                let source = match source {
                    Some(source) => source,
                    None => {
                        state.unconverted(binding, "binding has no typed data context");
                        state.unconverted_all(&node.bindings, "data context type is unknown");
                        return;
                    }
                };

                match self.compile_binding(state, binding, source) {
                    Ok(compiled) => {
                        builder.append(&compiled.code);
                        state.extern_aliases.extend(compiled.extern_aliases);
                        state.converted(binding);

                        let value_type = compiled.info.value_type;
                        let data_context = state.provider.add_data_context(&value_type);
                        let mut scope = CodeBuilder::create_root();
                        self.compile_nodes(state, &node.bindings, Some(&data_context), &mut scope);
                        if !scope.is_empty() {
                            state.use_type(&value_type);
                            builder.print_call(
                                Some(&data_context.name),
                                "this.GetDataContext",
                                &[
                                    compiled.target_expression,
                                    format!("element => ({})element.DataContext", value_type.to_alias_qualified_type()),
                                ],
                            );
                            builder.append(&scope);
                        }
                    }
                    Err(error) => {
                        let reason = error.to_string();
                        state.unconverted(binding, reason.clone());
                        state.unconverted_all(
                            &node.bindings,
                            &format!("data context binding was not compiled: {}", reason),
                        );
                    }
                }
            }
            BindingTreeNode::ElementBindingSource(node) => {
                let element_type = match self.element_type(state.document, node.source_element) {
                    Ok(element_type) => element_type,
                    Err(error) => {
                        state.unconverted_all(&node.bindings, &error.to_string());
                        return;
                    }
                };

                let element_source = state.provider.add_element(&element_type, &node.element_name);
                let mut scope = CodeBuilder::create_root();
                self.compile_nodes(state, &node.bindings, Some(&element_source), &mut scope);
                if !scope.is_empty() {
                    state.use_type(&element_type);
                    let element = target_expression(
                        &element_type,
                        &node.element_name,
                        node.source_element == state.root.modifications_root,
                        state.root.has_code_behind,
                    );
                    builder.println(&format!("var {} = {};", element_source.name, element));
                    builder.append(&scope);
                }
            }
            BindingTreeNode::CastDataContextBindingSource(node)
            | BindingTreeNode::DataTemplateCastDataContextBindingSource(node) => {
                let data_context = state.provider.add_data_context(&node.cast_type);
                let mut scope = CodeBuilder::create_root();
                self.compile_nodes(state, &node.bindings, Some(&data_context), &mut scope);
                if !scope.is_empty() {
                    state.use_type(&node.cast_type);
                    builder.print_call(
                        Some(&data_context.name),
                        "this.GetDataContext",
                        &[format!(
                            "view => ({})view.DataContext",
                            node.cast_type.to_alias_qualified_type()
                        )],
                    );
                    builder.append(&scope);
                }
            }
            BindingTreeNode::ControlTemplateCastDataContextBindingSource(node) => {
                state.unconverted_all(&node.bindings, "bindings in control templates are not compiled");
            }
        }
    }

    fn element_type(&self, document: &XamlDocument, id: ElementId) -> Result<QualifiedType> {
        let namespaces = document.namespaces_in_scope(id);
        let xaml_types = XamlTypeResolver::new(&namespaces, &self.settings.platform, self.type_resolver);
        xaml_types.resolve_name(&document.element(id).name)
    }

    /// Generates one binding. Provider state is rolled back on failure so no
    /// part of a failed binding is referenced by later ones.
    fn compile_binding(
        &self,
        state: &mut RootCompilation,
        binding: &BindingNode,
        source: &BindingSource,
    ) -> Result<CompiledBinding> {
        let document = state.document;
        let element = document.element(binding.target_element);
        let namespaces = document.namespaces_in_scope(element.id);
        let xaml_types = XamlTypeResolver::new(&namespaces, &self.settings.platform, self.type_resolver);
        let element_type = xaml_types.resolve_name(&element.name)?;
        let target = TargetValueCodeGenerator::get_target(&element_type, &binding.assignment, element, &xaml_types)?;
        let expression = BindingPathParser::new().parse(&binding.assignment.binding.path)?;

        let target_expression = target_expression(
            &element_type,
            &binding.element_name,
            binding.target_element == state.root.modifications_root,
            state.root.has_code_behind,
        );
        let parameters = Parameters {
            binding,
            target_expression: target_expression.clone(),
            xaml_types,
            notification_events: &self.notification_events,
        };

        let snapshot = state.provider.clone();
        let (result, mode, builder, extern_aliases) = {
            let mut generator = BindingPathCodeGenerator::new(parameters, target);
            let mut context = Context::new(source.clone(), &mut state.provider);
            let result = generator.generate(&expression, &mut context);
            (result, generator.mode(), context.builder, context.extern_aliases)
        };

        match result {
            Ok(info) => {
                debug!(
                    element = %binding.element_name,
                    attribute = %binding.assignment.attribute_name,
                    path = %binding.assignment.binding.path,
                    mode = %mode,
                    "compiled binding"
                );
                Ok(CompiledBinding {
                    code: builder,
                    extern_aliases,
                    info,
                    target_expression,
                })
            }
            Err(error) => {
                state.provider = snapshot;
                Err(error)
            }
        }
    }
}
