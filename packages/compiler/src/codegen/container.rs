//! Container Emitter
//!
//! Wraps the statements generated for one binding root into a container
//! class deriving from the runtime `BindingContainer<TRoot>`.

use indexmap::IndexSet;

use super::code_builder::CodeBuilder;

pub const CONTAINER_SUFFIX: &str = "BindingContainer";

#[derive(Debug, Clone)]
pub struct BindingContainer {
    pub name: String,
    pub namespace: String,
    /// Namespace qualified type of the element the container is attached to
    pub root_type: String,
    pub extern_aliases: IndexSet<String>,
    pub body: CodeBuilder,
}

impl BindingContainer {
    pub fn new(root_name: &str, namespace: impl Into<String>, root_type: impl Into<String>) -> Self {
        BindingContainer {
            name: format!("{}{}", root_name, CONTAINER_SUFFIX),
            namespace: namespace.into(),
            root_type: root_type.into(),
            extern_aliases: IndexSet::new(),
            body: CodeBuilder::create_root(),
        }
    }

    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn to_source(&self, runtime_namespace: &str) -> String {
        let mut builder = CodeBuilder::create_root();
        builder.println("// <auto-generated />");
        for alias in &self.extern_aliases {
            builder.println(&format!("extern alias {};", alias));
        }
        builder.println("");

        let has_namespace = !self.namespace.is_empty();
        if has_namespace {
            builder.println(&format!("namespace {}", self.namespace));
            builder.println("{");
            builder.inc_indent();
        }

        builder.println(&format!(
            "public sealed class {} : global::{}.BindingContainer<global::{}>",
            self.name, runtime_namespace, self.root_type
        ));
        builder.println("{");
        builder.inc_indent();

        builder.println("protected override void OnConnect()");
        builder.println("{");
        builder.inc_indent();
        builder.append(&self.body);
        builder.dec_indent();
        builder.println("}");
        builder.println("");

        builder.println("public override object ProvideValue(global::System.IServiceProvider serviceProvider)");
        builder.println("{");
        builder.inc_indent();
        builder.println(&format!("return new {}();", self.name));
        builder.dec_indent();
        builder.println("}");

        builder.dec_indent();
        builder.println("}");

        if has_namespace {
            builder.dec_indent();
            builder.println("}");
        }

        let mut source = builder.to_source();
        source.push('\n');
        source
    }
}
