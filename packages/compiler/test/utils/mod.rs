//! Shared fixtures: a small WPF-like type catalog and helpers wrapping markup
//! into a typed view.
#![allow(dead_code)]

use xaml_compiler::{BindingCompiler, BindingsOptimizerSettings, CompileOutput, TypeCatalog};

pub const CATALOG: &str = r#"{
    "types": [
        { "assembly": "WindowsBase", "namespace": "System.Windows", "name": "DependencyObject" },
        { "assembly": "PresentationFramework", "namespace": "System.Windows", "name": "FrameworkElement",
          "baseType": "System.Windows.DependencyObject",
          "properties": [
            { "name": "DataContext", "type": "System.Object", "dependency": true },
            { "name": "Tag", "type": "System.Object", "dependency": true },
            { "name": "Width", "type": "System.Double", "dependency": true },
            { "name": "ActualWidth", "type": "System.Double", "dependency": true, "readOnly": true }
          ] },
        { "assembly": "PresentationFramework", "namespace": "System.Windows.Controls", "name": "Control",
          "baseType": "System.Windows.FrameworkElement" },
        { "assembly": "PresentationFramework", "namespace": "System.Windows.Controls", "name": "UserControl",
          "baseType": "System.Windows.Controls.Control" },
        { "assembly": "PresentationFramework", "namespace": "System.Windows.Controls", "name": "StackPanel",
          "baseType": "System.Windows.FrameworkElement" },
        { "assembly": "PresentationFramework", "namespace": "System.Windows.Controls", "name": "Grid",
          "baseType": "System.Windows.FrameworkElement",
          "attachedProperties": [ { "name": "Row", "type": "System.Int32" } ] },
        { "assembly": "PresentationFramework", "namespace": "System.Windows.Controls", "name": "Canvas",
          "baseType": "System.Windows.FrameworkElement",
          "attachedProperties": [
            { "name": "Left", "type": "System.Double" },
            { "name": "Top", "type": "System.Double" }
          ] },
        { "assembly": "PresentationFramework", "namespace": "System.Windows.Controls", "name": "TextBlock",
          "baseType": "System.Windows.FrameworkElement",
          "properties": [ { "name": "Text", "type": "System.String", "dependency": true } ] },
        { "assembly": "PresentationFramework", "namespace": "System.Windows.Controls", "name": "TextBox",
          "baseType": "System.Windows.Controls.Control",
          "properties": [ { "name": "Text", "type": "System.String", "dependency": true, "bindsTwoWayByDefault": true } ] },
        { "assembly": "PresentationFramework", "namespace": "System.Windows.Controls", "name": "ItemsControl",
          "baseType": "System.Windows.Controls.Control",
          "properties": [ { "name": "ItemsSource", "type": "System.Collections.IEnumerable", "dependency": true } ] },
        { "assembly": "PresentationFramework", "namespace": "System.Windows.Shapes", "name": "Ellipse",
          "baseType": "System.Windows.FrameworkElement" },

        { "assembly": "App", "namespace": "App.ViewModels", "name": "Person",
          "properties": [
            { "name": "Name", "type": "System.String" },
            { "name": "Age", "type": "System.Int32" },
            { "name": "Left", "type": "System.Double" },
            { "name": "Width", "type": "System.Double" },
            { "name": "Id", "type": "System.String", "readOnly": true },
            { "name": "Address", "type": "App.ViewModels.Address" },
            { "name": "Friends", "type": "App.ViewModels.PersonList" }
          ] },
        { "assembly": "App", "namespace": "App.ViewModels", "name": "Address",
          "properties": [
            { "name": "City", "type": "System.String" },
            { "name": "Street", "type": "System.String" }
          ] },
        { "assembly": "App", "namespace": "App.ViewModels", "name": "PersonList",
          "interfaces": [ "System.Collections.IEnumerable" ],
          "properties": [ { "name": "Count", "type": "System.Int32", "readOnly": true } ],
          "indexers": [
            { "parameters": [ "System.Int32" ], "type": "App.ViewModels.Person" },
            { "parameters": [ "System.String" ], "type": "App.ViewModels.Person", "readOnly": true }
          ] },
        { "assembly": "App", "namespace": "App.ViewModels", "name": "Tags",
          "attachedProperties": [
            { "name": "Label", "type": "System.String" },
            { "name": "Home", "type": "App.ViewModels.Address" }
          ] },
        { "assembly": "App", "namespace": "App.ViewModels", "name": "Badges",
          "attachedProperties": [ { "name": "Home", "type": "App.ViewModels.Address" } ] },
        { "alias": "Core", "assembly": "App.Core", "namespace": "App.Core", "name": "Clock",
          "properties": [ { "name": "Time", "type": "System.String" } ] }
    ]
}"#;

pub const PRESENTATION: &str = "http://schemas.microsoft.com/winfx/2006/xaml/presentation";

pub fn catalog() -> TypeCatalog {
    TypeCatalog::from_json(CATALOG).unwrap()
}

/// `body` inside a `UserControl` with code behind and a `vm:Person` data context.
pub fn person_view(body: &str) -> String {
    format!(
        r#"<UserControl x:Class="App.Views.PersonView"
    xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation"
    xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml"
    xmlns:d="http://schemas.microsoft.com/expression/blend/2008"
    xmlns:sx="http://sundew.dev/xaml"
    xmlns:vm="clr-namespace:App.ViewModels;assembly=App"
    xmlns:core="clr-namespace:App.Core;assembly=App.Core"
    d:DataContext="{{d:DesignInstance Type=vm:Person}}">
{}
</UserControl>"#,
        body
    )
}

pub fn compile_with(settings: &BindingsOptimizerSettings, xaml: &str) -> CompileOutput {
    let catalog = catalog();
    BindingCompiler::new(settings, &catalog)
        .compile_source(xaml)
        .unwrap()
        .expect("document is compiled")
}

pub fn compile(xaml: &str) -> CompileOutput {
    compile_with(&BindingsOptimizerSettings::default(), xaml)
}

/// Source of the single generated container.
pub fn container_source(xaml: &str) -> String {
    let output = compile(xaml);
    assert_eq!(output.containers.len(), 1, "unconverted: {:?}", output.unconverted);
    output.containers[0].source.clone()
}

/// Generated statements with indentation stripped, one per line.
pub fn statements(xaml: &str) -> String {
    container_source(xaml)
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reasons of the bindings left to the runtime.
pub fn unconverted_reasons(xaml: &str) -> Vec<String> {
    compile(xaml).unconverted.into_iter().map(|u| u.reason).collect()
}
