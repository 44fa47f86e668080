/**
 * Binding Path Code Generation Tests
 *
 * Statements emitted for single bindings inside a `vm:Person` typed view
 */

#[path = "../utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{person_view, statements, unconverted_reasons};
    use pretty_assertions::assert_eq;

    fn expect_statements(body: &str, expected: &[&str]) {
        let source = statements(&person_view(body));
        let expected = expected.join("\n");
        assert!(
            source.contains(&expected),
            "expected\n{}\n\nin\n{}",
            expected,
            source
        );
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    mod terminals {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_bind_property_one_way() {
            expect_statements(
                r#"<TextBlock Text="{Binding Name}" />"#,
                &[
                    "person1.BindInvariantOneWay(",
                    "-1,",
                    "this.Root.TextBlock2,",
                    "person1.CreateSourceProperty(nameof(global::App.ViewModels.Person.Name)),",
                    "s => s.Name,",
                    "global::System.Windows.Controls.TextBlock.TextProperty,",
                    "t => t.Text,",
                    "global::System.Windows.Data.BindingMode.OneWay);",
                ],
            );
        }

        #[test]
        fn should_bind_two_way_by_default_when_target_requests_it() {
            expect_statements(
                r#"<TextBox Text="{Binding Name}" />"#,
                &[
                    "person1.BindInvariant(",
                    "-1,",
                    "this.Root.TextBox2,",
                    "person1.CreateSourceProperty(nameof(global::App.ViewModels.Person.Name)),",
                    "s => s.Name,",
                    "global::System.Windows.Controls.TextBox.TextProperty,",
                    "t => t.Text,",
                    "(s, v) => s.Name = v,",
                    "global::System.Windows.Data.UpdateSourceTrigger.Default,",
                    "global::System.Windows.Data.BindingMode.TwoWay);",
                ],
            );
        }

        #[test]
        fn should_pass_update_source_trigger() {
            expect_statements(
                r#"<TextBox Text="{Binding Name, UpdateSourceTrigger=PropertyChanged}" />"#,
                &[
                    "(s, v) => s.Name = v,",
                    "global::System.Windows.Data.UpdateSourceTrigger.PropertyChanged,",
                    "global::System.Windows.Data.BindingMode.TwoWay);",
                ],
            );
        }

        #[test]
        fn should_convert_when_types_differ() {
            expect_statements(
                r#"<TextBlock Text="{Binding Age}" />"#,
                &[
                    "person1.BindOneWay(",
                    "-1,",
                    "this.Root.TextBlock2,",
                    "person1.CreateSourceProperty(nameof(global::App.ViewModels.Person.Age)),",
                ],
            );
        }

        #[test]
        fn should_not_convert_into_object_targets() {
            expect_statements(
                r#"<TextBlock Tag="{Binding Age}" />"#,
                &[
                    "person1.BindInvariantOneWay(",
                    "-1,",
                    "this.Root.TextBlock2,",
                    "person1.CreateSourceProperty(nameof(global::App.ViewModels.Person.Age)),",
                    "s => s.Age,",
                    "global::System.Windows.Controls.TextBlock.TagProperty,",
                    "t => t.Tag,",
                ],
            );
        }

        #[test]
        fn should_number_bindings_with_additional_values() {
            expect_statements(
                r#"<TextBlock Text="{Binding Name, Converter={StaticResource Upper}}" Tag="{Binding Age, FallbackValue=0}" />"#,
                &["person1.BindInvariantOneWay(", "1,", "this.Root.TextBlock2,"],
            );
            expect_statements(
                r#"<TextBlock Text="{Binding Name, Converter={StaticResource Upper}}" Tag="{Binding Age, FallbackValue=0}" />"#,
                &["person1.BindInvariantOneWay(", "2,", "this.Root.TextBlock2,"],
            );
        }

        #[test]
        fn should_bind_data_context_itself() {
            expect_statements(
                r#"<TextBlock Tag="{Binding}" />"#,
                &[
                    "person1.BindSourceDataContextInvariantOneWay(",
                    "-1,",
                    "this.Root.TextBlock2,",
                    "global::System.Windows.Controls.TextBlock.TagProperty,",
                    "t => t.Tag,",
                    "global::System.Windows.Data.BindingMode.OneWay);",
                ],
            );
            expect_statements(
                r#"<TextBlock Text="{Binding .}" />"#,
                &["person1.BindSourceDataContextOneWay("],
            );
        }

        #[test]
        fn should_reject_data_context_updates() {
            assert_eq!(
                unconverted_reasons(&person_view(r#"<TextBox Text="{Binding}" />"#)),
                vec!["unsupported binding: the data context itself cannot be bound TwoWay".to_string()]
            );
        }
    }

    mod attached_properties {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_bind_attached_target_property() {
            expect_statements(
                r#"<Ellipse Canvas.Left="{Binding Left}" />"#,
                &[
                    "person1.BindInvariantOneWay(",
                    "-1,",
                    "this.Root.Ellipse2,",
                    "person1.CreateSourceProperty(nameof(global::App.ViewModels.Person.Left)),",
                    "s => s.Left,",
                    "global::System.Windows.Controls.Canvas.LeftProperty,",
                    "t => global::System.Windows.Controls.Canvas.GetLeft(t),",
                    "global::System.Windows.Data.BindingMode.OneWay);",
                ],
            );
        }

        #[test]
        fn should_bind_attached_source_property_two_way() {
            expect_statements(
                r#"<TextBox Text="{Binding (vm:Tags.Label)}" />"#,
                &[
                    "person1.BindInvariant(",
                    "-1,",
                    "this.Root.TextBox2,",
                    "person1.CreateSourceProperty(global::App.ViewModels.Tags.LabelProperty),",
                    "s => global::App.ViewModels.Tags.GetLabel(s),",
                    "global::System.Windows.Controls.TextBox.TextProperty,",
                    "t => t.Text,",
                    "(s, v) => global::App.ViewModels.Tags.SetLabel(s, v),",
                    "global::System.Windows.Data.UpdateSourceTrigger.Default,",
                    "global::System.Windows.Data.BindingMode.TwoWay);",
                ],
            );
        }

        #[test]
        fn should_report_unknown_attached_property() {
            assert_eq!(
                unconverted_reasons(&person_view(r#"<TextBlock Text="{Binding (vm:Tags.Color)}" />"#)),
                vec!["type 'App.ViewModels.Tags' has no attached property 'Color'".to_string()]
            );
        }

        #[test]
        fn should_keep_attached_parts_of_different_owners_apart() {
            let source = statements(&person_view(
                r#"<TextBlock Text="{Binding (vm:Tags.Home).City}" />
                   <TextBlock Text="{Binding (vm:Badges.Home).City}" />
                   <TextBlock Text="{Binding (vm:Tags.Home).Street}" />"#,
            ));
            assert_eq!(
                count(&source, "var personHome1 = person1.BindPart(\nperson1.CreateSourceProperty(global::App.ViewModels.Tags.HomeProperty),"),
                1
            );
            assert_eq!(
                count(&source, "var personHome2 = person1.BindPart(\nperson1.CreateSourceProperty(global::App.ViewModels.Badges.HomeProperty),"),
                1
            );
            assert_eq!(count(&source, "personHome1.BindInvariantOneWay("), 2);
            assert_eq!(count(&source, "personHome2.BindInvariantOneWay("), 1);
            assert!(!source.contains("personHome3"));
        }
    }

    mod parts {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_share_property_parts_between_bindings() {
            let source = statements(&person_view(
                r#"<TextBlock Text="{Binding Address.City}" />
                   <TextBlock Text="{Binding Address.Street}" />"#,
            ));
            assert_eq!(count(&source, "var personAddress1 = person1.BindPart("), 1);
            assert_eq!(count(&source, "personAddress1.BindInvariantOneWay("), 2);
            assert!(!source.contains("personAddress2"));
        }

        #[test]
        fn should_emit_part_with_binding_mode() {
            expect_statements(
                r#"<TextBox Text="{Binding Address.City}" />"#,
                &[
                    "var personAddress1 = person1.BindPart(",
                    "person1.CreateSourceProperty(nameof(global::App.ViewModels.Person.Address)),",
                    "s => s.Address,",
                    "global::System.Windows.Data.BindingMode.TwoWay);",
                    "personAddress1.BindInvariant(",
                ],
            );
        }

        #[test]
        fn should_read_parts_one_way_for_one_way_to_source() {
            expect_statements(
                r#"<TextBlock Text="{Binding Address.City, Mode=OneWayToSource}" />"#,
                &[
                    "s => s.Address,",
                    "global::System.Windows.Data.BindingMode.OneWay);",
                    "personAddress1.BindInvariant(",
                ],
            );
        }

        #[test]
        fn should_not_share_one_time_parts() {
            let source = statements(&person_view(
                r#"<TextBlock Text="{Binding Address.City, Mode=OneTime}" />
                   <TextBlock Text="{Binding Address.Street, Mode=OneTime}" />"#,
            ));
            assert!(source.contains("var personAddress1 = person1.BindPart("));
            assert!(source.contains("var personAddress2 = person1.BindPart("));
            assert!(source.contains("global::System.Windows.Data.BindingMode.OneTime);"));
        }

        #[test]
        fn should_bind_through_indexer() {
            expect_statements(
                r#"<TextBlock Text="{Binding Friends[0].Name}" />"#,
                &[
                    "var personFriends1 = person1.BindPart(",
                    "person1.CreateSourceProperty(nameof(global::App.ViewModels.Person.Friends)),",
                    "s => s.Friends,",
                    "global::System.Windows.Data.BindingMode.OneWay);",
                    "var personListIndexer1 = personFriends1.BindPart(",
                    "personFriends1.CreateSourceProperty(\"Item[]\"),",
                    "s => s[0],",
                    "global::System.Windows.Data.BindingMode.OneWay);",
                    "personListIndexer1.BindInvariantOneWay(",
                    "-1,",
                    "this.Root.TextBlock2,",
                    "personListIndexer1.CreateSourceProperty(nameof(global::App.ViewModels.Person.Name)),",
                ],
            );
        }

        #[test]
        fn should_index_data_context_directly() {
            expect_statements(
                r#"<StackPanel DataContext="{Binding Friends}">
                     <TextBlock Text="{Binding .[0].Name}" />
                   </StackPanel>"#,
                &[
                    "var personList1 = this.GetDataContext(",
                    "this.Root.StackPanel2,",
                    "element => (global::App.ViewModels.PersonList)element.DataContext);",
                    "var personListIndexer1 = personList1.BindPart(",
                    "personList1.CreateSourceProperty(\"Item[]\"),",
                    "s => s[0],",
                    "global::System.Windows.Data.BindingMode.OneWay);",
                    "personListIndexer1.BindInvariantOneWay(",
                    "-1,",
                    "this.Root.TextBlock3,",
                    "personListIndexer1.CreateSourceProperty(nameof(global::App.ViewModels.Person.Name)),",
                ],
            );
        }

        #[test]
        fn should_read_property_after_dot_from_current_source() {
            expect_statements(
                r#"<TextBlock Text="{Binding ..Name}" />"#,
                &[
                    "person1.BindInvariantOneWay(",
                    "-1,",
                    "this.Root.TextBlock2,",
                    "person1.CreateSourceProperty(nameof(global::App.ViewModels.Person.Name)),",
                ],
            );
        }

        #[test]
        fn should_never_share_indexer_parts_or_what_follows() {
            let source = statements(&person_view(
                r#"<TextBlock Text="{Binding Friends[0].Address.City}" />
                   <TextBlock Text="{Binding Friends[0].Address.Street}" />"#,
            ));
            assert_eq!(count(&source, "var personFriends1 = "), 1);
            assert_eq!(count(&source, "= personFriends1.BindPart("), 2);
            assert!(source.contains("var personListIndexer1 = "));
            assert!(source.contains("var personListIndexer2 = "));
            assert!(source.contains("var personAddress1 = personListIndexer1.BindPart("));
            assert!(source.contains("var personAddress2 = personListIndexer2.BindPart("));
        }

        #[test]
        fn should_index_with_strings() {
            expect_statements(
                r#"<TextBlock Text="{Binding Friends[bob].Name}" />"#,
                &["personFriends1.CreateSourceProperty(\"Item[]\"),", "s => s[\"bob\"],"],
            );
        }

        #[test]
        fn should_terminate_on_indexer() {
            expect_statements(
                r#"<TextBlock Tag="{Binding Friends[0]}" />"#,
                &[
                    "personFriends1.BindInvariantOneWay(",
                    "-1,",
                    "this.Root.TextBlock2,",
                    "personFriends1.CreateSourceProperty(\"Item[]\"),",
                    "s => s[0],",
                ],
            );
        }

        #[test]
        fn should_report_unknown_indexer() {
            assert_eq!(
                unconverted_reasons(&person_view(r#"<TextBlock Text="{Binding Friends[1,2].Name}" />"#)),
                vec!["type 'App.ViewModels.PersonList' has no indexer taking (System.Int32, System.Int32)".to_string()]
            );
        }
    }

    mod read_only {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_reject_two_way_onto_read_only_source() {
            assert_eq!(
                unconverted_reasons(&person_view(r#"<TextBox Text="{Binding Id}" />"#)),
                vec![
                    "unsupported binding: source property 'Id' is read-only and cannot be updated by a TwoWay binding"
                        .to_string()
                ]
            );
        }

        #[test]
        fn should_reject_two_way_onto_read_only_indexer() {
            let reasons = unconverted_reasons(&person_view(r#"<TextBox Text="{Binding Friends[bob]}" />"#));
            assert_eq!(reasons.len(), 1);
            assert!(reasons[0].contains("source property 'Item' is read-only"), "{}", reasons[0]);
        }

        #[test]
        fn should_reject_one_way_onto_read_only_target() {
            assert_eq!(
                unconverted_reasons(&person_view(r#"<TextBlock ActualWidth="{Binding Width}" />"#)),
                vec!["unsupported binding: target property 'ActualWidth' is read-only".to_string()]
            );
        }

        #[test]
        fn should_reject_two_way_onto_read_only_target() {
            assert_eq!(
                unconverted_reasons(&person_view(r#"<TextBlock ActualWidth="{Binding Width, Mode=TwoWay}" />"#)),
                vec![
                    "unsupported binding: target property 'ActualWidth' is read-only and cannot be bound two way"
                        .to_string()
                ]
            );
        }

        #[test]
        fn should_use_notification_event_for_one_way_to_source() {
            expect_statements(
                r#"<TextBlock ActualWidth="{Binding Width, Mode=OneWayToSource}" />"#,
                &[
                    "person1.BindInvariant(",
                    "-1,",
                    "this.Root.TextBlock2,",
                    "person1.CreateSourceProperty(nameof(global::App.ViewModels.Person.Width)),",
                    "s => s.Width,",
                    "global::System.Windows.Controls.TextBlock.ActualWidthProperty,",
                    "t => t.ActualWidth,",
                    "(s, v) => s.Width = v,",
                    "global::System.Windows.Data.UpdateSourceTrigger.Default,",
                    "global::System.Windows.Data.BindingMode.OneWayToSource,",
                    "nameof(global::System.Windows.FrameworkElement.SizeChanged));",
                ],
            );
        }
    }

    mod failures {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_roll_back_sources_of_failed_binding() {
            let xaml = person_view(
                r#"<TextBlock Text="{Binding Address.Missing}" />
                   <TextBlock Text="{Binding Address.City}" />"#,
            );
            assert_eq!(
                unconverted_reasons(&xaml),
                vec!["type 'App.ViewModels.Address' has no property 'Missing'".to_string()]
            );

            let source = statements(&xaml);
            assert_eq!(count(&source, "var personAddress1 = person1.BindPart("), 1);
            assert!(!source.contains("personAddress2"));
            assert!(source.contains("this.Root.TextBlock3,"));
            assert!(!source.contains("this.Root.TextBlock2,"));
        }

        #[test]
        fn should_report_path_syntax_errors() {
            assert_eq!(
                unconverted_reasons(&person_view(r#"<TextBlock Text="{Binding Address.}" />"#)),
                vec!["binding path error: property name expected at <end> at 8".to_string()]
            );
        }

        #[test]
        fn should_report_unknown_target_property() {
            assert_eq!(
                unconverted_reasons(&person_view(r#"<TextBlock Content="{Binding Name}" />"#)),
                vec!["type 'System.Windows.Controls.TextBlock' has no property 'Content'".to_string()]
            );
        }
    }
}
