/**
 * Binding Tree Parser Tests
 *
 * Grouping of markup bindings into binding roots and scopes
 */

#[path = "../utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{catalog, person_view};
    use xaml_compiler::xaml::{
        parse_document, BindingMarkupExtensionParser, BindingNode, BindingTree, BindingTreeNode, BindingTreeParser,
        BindingXamlPlatformInfo, CastDataContextBindingSourceNode, XamlElementNameResolver,
    };
    use xaml_compiler::CompilerError;

    fn try_parse_tree(xaml: &str, opt_in: bool) -> Result<Option<BindingTree>, CompilerError> {
        let document = parse_document(xaml).expect("Should read markup");
        let catalog = catalog();
        let platform = BindingXamlPlatformInfo::default();
        let mut names = XamlElementNameResolver::new(&document, &platform);
        BindingTreeParser::new(&platform, BindingMarkupExtensionParser::new(), opt_in).parse(
            &document,
            &catalog,
            &mut names,
        )
    }

    fn parse_tree(xaml: &str) -> BindingTree {
        try_parse_tree(xaml, false)
            .expect("Should parse binding tree")
            .expect("Should not be opted out")
    }

    fn cast_node(node: &BindingTreeNode) -> &CastDataContextBindingSourceNode {
        match node {
            BindingTreeNode::CastDataContextBindingSource(node)
            | BindingTreeNode::DataTemplateCastDataContextBindingSource(node)
            | BindingTreeNode::ControlTemplateCastDataContextBindingSource(node) => node,
            other => panic!("expected a cast data context node, got {:?}", other),
        }
    }

    fn binding(node: &BindingTreeNode) -> &BindingNode {
        match node {
            BindingTreeNode::Binding(binding) => binding,
            other => panic!("expected a binding, got {:?}", other),
        }
    }

    fn paths(nodes: &[BindingTreeNode]) -> Vec<String> {
        nodes
            .iter()
            .flat_map(|n| n.binding_nodes())
            .map(|b| b.assignment.binding.path.clone())
            .collect()
    }

    mod roots {
        use super::*;

        #[test]
        fn should_open_root_for_typed_view() {
            let tree = parse_tree(&person_view(r#"<TextBlock Text="{Binding Name}" />"#));
            assert_eq!(tree.roots.len(), 1);

            let root = &tree.roots[0];
            assert_eq!(root.name, "PersonView");
            assert_eq!(root.root_type, "App.Views.PersonView");
            assert_eq!(root.element, 0);
            assert_eq!(root.modifications_root, 0);
            assert!(root.has_code_behind);

            let cast = cast_node(&root.bindings[0]);
            assert_eq!(cast.cast_type.full_name(), "App.ViewModels.Person");
            assert_eq!(cast.name, "App.Views.PersonView");
            assert_eq!(cast.content_element, None);

            let text = binding(&cast.bindings[0]);
            assert_eq!(text.element_name, "TextBlock2");
            assert_eq!(text.assignment.attribute_name, "Text");
            assert_eq!(text.assignment.binding.path, "Name");
            assert_eq!(text.id, -1);
            assert!(text.is_optimizing);
        }

        #[test]
        fn should_not_open_root_without_class() {
            let tree = parse_tree(
                r#"<UserControl xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation"
                    xmlns:d="http://schemas.microsoft.com/expression/blend/2008"
                    xmlns:vm="clr-namespace:App.ViewModels;assembly=App"
                    d:DataContext="{d:DesignInstance Type=vm:Person}">
                    <TextBlock Text="{Binding Name}" />
                </UserControl>"#,
            );
            assert!(tree.roots.is_empty());
        }

        #[test]
        fn should_accept_bindings_data_type() {
            let tree = parse_tree(
                r#"<UserControl x:Class="App.Views.AddressView"
                    xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation"
                    xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml"
                    xmlns:sx="http://sundew.dev/xaml"
                    xmlns:vm="clr-namespace:App.ViewModels;assembly=App"
                    sx:Bindings.DataType="vm:Address">
                    <TextBlock Text="{Binding City}" />
                </UserControl>"#,
            );
            assert_eq!(tree.roots.len(), 1);
            assert_eq!(tree.roots[0].name, "AddressView");
            assert_eq!(
                cast_node(&tree.roots[0].bindings[0]).cast_type.full_name(),
                "App.ViewModels.Address"
            );
        }

        #[test]
        fn should_open_root_for_keyed_data_template() {
            let tree = parse_tree(&person_view(
                r#"<UserControl.Resources>
                     <DataTemplate x:Key="AddressTemplate" DataType="{x:Type vm:Address}">
                       <StackPanel>
                         <TextBlock Text="{Binding City}" />
                       </StackPanel>
                     </DataTemplate>
                   </UserControl.Resources>"#,
            ));
            assert_eq!(tree.roots.len(), 2);
            assert!(cast_node(&tree.roots[0].bindings[0]).bindings.is_empty());

            let template = &tree.roots[1];
            assert_eq!(template.name, "AddressTemplate");
            assert_eq!(template.root_type, "System.Windows.Controls.StackPanel");
            assert_eq!(template.element, 2);
            assert_eq!(template.modifications_root, 3);
            assert!(!template.has_code_behind);

            assert!(matches!(
                template.bindings[0],
                BindingTreeNode::DataTemplateCastDataContextBindingSource(_)
            ));
            let cast = cast_node(&template.bindings[0]);
            assert_eq!(cast.cast_type.full_name(), "App.ViewModels.Address");
            assert_eq!(cast.content_element, Some(3));
            assert_eq!(paths(&cast.bindings), vec!["City"]);
        }

        #[test]
        fn should_skip_untyped_data_template_content() {
            let tree = parse_tree(&person_view(
                r#"<ItemsControl ItemsSource="{Binding Friends}">
                     <ItemsControl.ItemTemplate>
                       <DataTemplate>
                         <TextBlock Text="{Binding Name}" />
                       </DataTemplate>
                     </ItemsControl.ItemTemplate>
                   </ItemsControl>"#,
            ));
            assert_eq!(tree.roots.len(), 1);
            assert_eq!(paths(&tree.roots[0].bindings), vec!["Friends"]);
        }

        #[test]
        fn should_mark_control_templates() {
            let tree = parse_tree(&person_view(
                r#"<UserControl.Resources>
                     <ControlTemplate x:Key="Frame" TargetType="{x:Type Control}">
                       <TextBlock Text="{Binding Name}" />
                     </ControlTemplate>
                   </UserControl.Resources>"#,
            ));
            assert_eq!(tree.roots.len(), 2);
            assert!(matches!(
                tree.roots[1].bindings[0],
                BindingTreeNode::ControlTemplateCastDataContextBindingSource(_)
            ));
        }
    }

    mod scopes {
        use super::*;

        #[test]
        fn should_nest_data_context_bindings() {
            let tree = parse_tree(&person_view(
                r#"<StackPanel DataContext="{Binding Address}" Tag="{Binding City}">
                     <TextBlock Text="{Binding Street}" />
                   </StackPanel>"#,
            ));
            let cast = cast_node(&tree.roots[0].bindings[0]);
            assert_eq!(cast.bindings.len(), 1);

            match &cast.bindings[0] {
                BindingTreeNode::DataContextTarget(node) => {
                    assert_eq!(node.binding.assignment.binding.path, "Address");
                    assert_eq!(node.binding.element_name, "StackPanel2");
                    assert_eq!(paths(&node.bindings), vec!["City", "Street"]);
                }
                other => panic!("expected a data context target, got {:?}", other),
            }
        }

        #[test]
        fn should_group_element_name_bindings_per_source() {
            let tree = parse_tree(&person_view(
                r#"<TextBlock Text="{Binding Text, ElementName=NameBox}" />
                   <TextBox x:Name="NameBox" Text="{Binding Name}" />
                   <TextBlock Tag="{Binding Text, ElementName=NameBox}" />"#,
            ));
            let root = &tree.roots[0];
            assert_eq!(root.bindings.len(), 2);
            assert_eq!(paths(&cast_node(&root.bindings[0]).bindings), vec!["Name"]);

            match &root.bindings[1] {
                BindingTreeNode::ElementBindingSource(node) => {
                    assert_eq!(node.element_name, "NameBox");
                    assert_eq!(node.source_element, 2);
                    let targets: Vec<_> = node.bindings.iter().map(|b| binding(b).element_name.clone()).collect();
                    assert_eq!(targets, vec!["TextBlock2", "TextBlock3"]);
                }
                other => panic!("expected an element binding source, got {:?}", other),
            }
        }

        #[test]
        fn should_fail_for_unknown_element_name() {
            let result = try_parse_tree(
                &person_view(r#"<TextBlock Text="{Binding Text, ElementName=Missing}" />"#),
                false,
            );
            assert_eq!(result.unwrap_err(), CompilerError::ElementNotFound("Missing".to_string()));
        }

        #[test]
        fn should_ignore_bindings_in_styles() {
            let tree = parse_tree(&person_view(
                r#"<UserControl.Resources>
                     <Style TargetType="TextBlock">
                       <Setter Property="Text" Value="{Binding Name}" />
                     </Style>
                   </UserControl.Resources>"#,
            ));
            assert!(paths(&tree.roots[0].bindings).is_empty());
        }
    }

    mod bindings {
        use super::*;

        #[test]
        fn should_number_bindings_with_additional_values() {
            let tree = parse_tree(&person_view(
                r#"<TextBlock Text="{Binding Name, StringFormat=Hi}" Tag="{Binding Age}" Width="{Binding Left, Converter={StaticResource C}}" />"#,
            ));
            let ids: Vec<i32> = cast_node(&tree.roots[0].bindings[0])
                .bindings
                .iter()
                .map(|b| binding(b).id)
                .collect();
            assert_eq!(ids, vec![1, -1, 2]);
        }

        #[test]
        fn should_record_unsupported_bindings_as_skipped() {
            let tree = parse_tree(&person_view(
                r#"<TextBlock Text="{Binding Name, RelativeSource={RelativeSource Self}}" />"#,
            ));
            assert!(paths(&tree.roots[0].bindings).is_empty());
            assert_eq!(tree.skipped.len(), 1);
            assert_eq!(tree.skipped[0].element, 1);
            assert_eq!(tree.skipped[0].attribute, "Text");
            assert_eq!(
                tree.skipped[0].reason,
                "invalid markup extension: 'RelativeSource' bindings are not compiled"
            );
        }

        #[test]
        fn should_inherit_optimize_bindings_switch() {
            let tree = parse_tree(&person_view(
                r#"<StackPanel sx:Bindings.OptimizeBindings="False">
                     <TextBlock Text="{Binding Name}" />
                     <TextBlock Text="{Binding Age}" sx:Bindings.OptimizeBindings="True" />
                   </StackPanel>"#,
            ));
            let optimizing: Vec<bool> = cast_node(&tree.roots[0].bindings[0])
                .bindings
                .iter()
                .map(|b| binding(b).is_optimizing)
                .collect();
            assert_eq!(optimizing, vec![false, true]);
        }
    }

    mod opt_in {
        use super::*;

        const OPTED_IN: &str = r#"<UserControl x:Class="App.Views.PersonView"
            xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation"
            xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml"
            xmlns:d="http://schemas.microsoft.com/expression/blend/2008"
            xmlns:sx="http://sundew.dev/xaml"
            xmlns:vm="clr-namespace:App.ViewModels;assembly=App"
            d:DataContext="{d:DesignInstance Type=vm:Person}"
            sx:Bindings.OptimizeBindings="True">
            <TextBlock Text="{Binding Name}" />
        </UserControl>"#;

        #[test]
        fn should_skip_documents_not_opting_in() {
            let tree = try_parse_tree(&person_view(r#"<TextBlock Text="{Binding Name}" />"#), true).unwrap();
            assert!(tree.is_none());
        }

        #[test]
        fn should_parse_documents_opting_in() {
            let tree = try_parse_tree(OPTED_IN, true).unwrap().expect("Should opt in");
            assert_eq!(paths(&tree.roots[0].bindings), vec!["Name"]);
        }
    }
}
