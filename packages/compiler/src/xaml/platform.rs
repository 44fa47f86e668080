//! Markup Platform Information
//!
//! Names and tables that differ between markup platforms. The defaults describe
//! WPF; every field can be overridden from the settings file.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::document::XName;

pub const PRESENTATION_NAMESPACE: &str = "http://schemas.microsoft.com/winfx/2006/xaml/presentation";
pub const XAML_NAMESPACE: &str = "http://schemas.microsoft.com/winfx/2006/xaml";
pub const DESIGNER_NAMESPACE: &str = "http://schemas.microsoft.com/expression/blend/2008";
pub const SUNDEW_XAML_NAMESPACE: &str = "http://sundew.dev/xaml";

/// A template element whose content gets a typed data context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedTemplateDefinition {
    pub full_name: XName,
    /// Attribute carrying the data type, e.g. `DataType` or `TargetType`.
    pub type_property_name: XName,
}

impl TypedTemplateDefinition {
    pub fn new(full_name: XName, type_property_name: XName) -> Self {
        TypedTemplateDefinition {
            full_name,
            type_property_name,
        }
    }
}

/// A template element whose content keeps an unknown data context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UntypedTemplateDefinition {
    pub full_name: XName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BindingXamlPlatformInfo {
    pub presentation_namespace: String,
    pub xaml_namespace: String,
    pub designer_namespace: String,
    pub sundew_namespace: String,
    /// CLR namespaces searched for types in the presentation namespace
    pub presentation_clr_namespaces: Vec<String>,
    /// CLR namespaces searched for types in the `x:` namespace
    pub xaml_clr_namespaces: Vec<String>,
    pub data_template_definitions: Vec<TypedTemplateDefinition>,
    pub control_template_definitions: Vec<TypedTemplateDefinition>,
    pub items_panel_template_definitions: Vec<UntypedTemplateDefinition>,
    pub unsupported_elements: Vec<XName>,
    pub optimize_bindings_name: XName,
    pub bindings_data_type_name: XName,
    pub designer_data_context_name: XName,
    pub x_class_name: XName,
    pub x_key_name: XName,
    pub x_name_name: XName,
    pub name_name: XName,
    /// Namespace of the runtime binding types referenced by generated code
    pub runtime_namespace: String,
    pub binding_mode_type: String,
    pub update_source_trigger_type: String,
    /// `Assembly|Namespace.Type` -> read-only property -> notification event
    pub read_only_notification_events: IndexMap<String, IndexMap<String, String>>,
}

impl Default for BindingXamlPlatformInfo {
    fn default() -> Self {
        let presentation = |name: &str| XName::new(PRESENTATION_NAMESPACE, name);
        let mut framework_element_events = IndexMap::new();
        framework_element_events.insert("ActualWidth".to_string(), "SizeChanged".to_string());
        framework_element_events.insert("ActualHeight".to_string(), "SizeChanged".to_string());
        let mut read_only_notification_events = IndexMap::new();
        read_only_notification_events.insert(
            "PresentationFramework|System.Windows.FrameworkElement".to_string(),
            framework_element_events,
        );

        BindingXamlPlatformInfo {
            presentation_namespace: PRESENTATION_NAMESPACE.to_string(),
            xaml_namespace: XAML_NAMESPACE.to_string(),
            designer_namespace: DESIGNER_NAMESPACE.to_string(),
            sundew_namespace: SUNDEW_XAML_NAMESPACE.to_string(),
            presentation_clr_namespaces: [
                "System.Windows",
                "System.Windows.Controls",
                "System.Windows.Controls.Primitives",
                "System.Windows.Documents",
                "System.Windows.Shapes",
                "System.Windows.Media",
                "System.Windows.Media.Imaging",
                "System.Windows.Data",
                "System.Windows.Input",
            ]
            .iter()
            .map(|ns| ns.to_string())
            .collect(),
            xaml_clr_namespaces: vec!["System".to_string()],
            data_template_definitions: vec![
                TypedTemplateDefinition::new(presentation("DataTemplate"), XName::local("DataType")),
                TypedTemplateDefinition::new(presentation("HierarchicalDataTemplate"), XName::local("DataType")),
            ],
            control_template_definitions: vec![TypedTemplateDefinition::new(
                presentation("ControlTemplate"),
                XName::local("TargetType"),
            )],
            items_panel_template_definitions: vec![UntypedTemplateDefinition {
                full_name: presentation("ItemsPanelTemplate"),
            }],
            unsupported_elements: vec![presentation("Style")],
            optimize_bindings_name: XName::new(SUNDEW_XAML_NAMESPACE, "Bindings.OptimizeBindings"),
            bindings_data_type_name: XName::new(SUNDEW_XAML_NAMESPACE, "Bindings.DataType"),
            designer_data_context_name: XName::new(DESIGNER_NAMESPACE, "DataContext"),
            x_class_name: XName::new(XAML_NAMESPACE, "Class"),
            x_key_name: XName::new(XAML_NAMESPACE, "Key"),
            x_name_name: XName::new(XAML_NAMESPACE, "Name"),
            name_name: XName::local("Name"),
            runtime_namespace: "Sundew.Xaml.Optimizations.Bindings".to_string(),
            binding_mode_type: "global::System.Windows.Data.BindingMode".to_string(),
            update_source_trigger_type: "global::System.Windows.Data.UpdateSourceTrigger".to_string(),
            read_only_notification_events,
        }
    }
}

impl BindingXamlPlatformInfo {
    /// CLR namespaces behind a markup namespace uri: `clr-namespace:` and
    /// `using:` uris name their namespace; the platform uris map to fixed lists.
    pub fn clr_namespaces(&self, uri: &str) -> Vec<(String, String)> {
        if let Some(rest) = uri.strip_prefix("clr-namespace:") {
            let (namespace, assembly) = match rest.split_once(';') {
                Some((namespace, assembly)) => (
                    namespace.trim(),
                    assembly.trim().strip_prefix("assembly=").unwrap_or("").trim(),
                ),
                None => (rest.trim(), ""),
            };
            return vec![(namespace.to_string(), assembly.to_string())];
        }

        if let Some(namespace) = uri.strip_prefix("using:") {
            return vec![(namespace.trim().to_string(), String::new())];
        }

        let namespaces = if uri == self.presentation_namespace {
            &self.presentation_clr_namespaces
        } else if uri == self.xaml_namespace {
            &self.xaml_clr_namespaces
        } else {
            return Vec::new();
        };

        namespaces.iter().map(|ns| (ns.clone(), String::new())).collect()
    }

    pub fn is_name_attribute(&self, name: &XName) -> bool {
        *name == self.x_name_name || *name == self.name_name
    }
}
