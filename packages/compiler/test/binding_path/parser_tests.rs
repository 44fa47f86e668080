/**
 * Parser Tests
 *
 * Test suite for the binding path parser
 */

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use xaml_compiler::binding_path::{
        AttachedDependencyProperty, BindingPathError, BindingPathExpression, BindingPathParser, Indexer, Literal,
        ParseError, Property, XamlType,
    };

    fn parse(path: &str) -> BindingPathExpression {
        BindingPathParser::new()
            .parse(path)
            .expect("Should parse successfully")
    }

    fn parse_error(path: &str) -> ParseError {
        BindingPathParser::new()
            .parse(path)
            .expect_err("Should fail to parse")
    }

    fn property(name: &str) -> BindingPathExpression {
        BindingPathExpression::Property(Property::new(name))
    }

    fn part(name: &str) -> BindingPathExpression {
        BindingPathExpression::PropertyPart(Property::new(name))
    }

    fn literal(value: &str) -> Literal {
        Literal::new(None, value)
    }

    mod data_context {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_parse_empty_path() {
            assert_eq!(parse(""), BindingPathExpression::DataContextSource);
        }

        #[test]
        fn should_parse_dot() {
            assert_eq!(parse("."), BindingPathExpression::DataContextSource);
            assert_eq!(parse(" . "), BindingPathExpression::DataContextSource);
        }

        #[test]
        fn should_require_accessor_after_dot() {
            assert_eq!(parse_error(".Name").error, BindingPathError::EndMissing);
        }

        #[test]
        fn should_index_data_context() {
            assert_eq!(
                parse(".[0]"),
                BindingPathExpression::indexer_accessor(
                    BindingPathExpression::DataContextSource,
                    BindingPathExpression::Indexer(Indexer::new(vec![literal("0")])),
                )
            );
        }

        #[test]
        fn should_access_property_of_data_context() {
            assert_eq!(
                parse("..Name"),
                BindingPathExpression::property_accessor(BindingPathExpression::DataContextSource, property("Name"))
            );
        }
    }

    mod properties {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_parse_single_property() {
            assert_eq!(parse("Name"), property("Name"));
        }

        #[test]
        fn should_trim_surrounding_spaces() {
            assert_eq!(parse(" Name "), property("Name"));
        }

        #[test]
        fn should_parse_property_chain_left_associative() {
            assert_eq!(
                parse("Address.Street.Name"),
                BindingPathExpression::property_accessor(
                    BindingPathExpression::property_accessor(part("Address"), part("Street")),
                    property("Name"),
                )
            );
        }

        #[test]
        fn should_require_property_after_dot() {
            let error = parse_error("Address.");
            assert_eq!(error.error, BindingPathError::PropertyNameMissing);
            assert!(error.lexeme.unwrap().is_end());
        }
    }

    mod indexers {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_parse_standalone_indexer() {
            assert_eq!(
                parse("[0]"),
                BindingPathExpression::Indexer(Indexer::new(vec![literal("0")]))
            );
        }

        #[test]
        fn should_parse_indexer_followed_by_property() {
            assert_eq!(
                parse("Friends[0].Name"),
                BindingPathExpression::property_accessor(
                    BindingPathExpression::indexer_accessor(
                        part("Friends"),
                        BindingPathExpression::IndexerPart(Indexer::new(vec![literal("0")])),
                    ),
                    property("Name"),
                )
            );
        }

        #[test]
        fn should_parse_consecutive_indexers() {
            assert_eq!(
                parse("[0][1]"),
                BindingPathExpression::indexer_accessor(
                    BindingPathExpression::IndexerPart(Indexer::new(vec![literal("0")])),
                    BindingPathExpression::Indexer(Indexer::new(vec![literal("1")])),
                )
            );
        }

        #[test]
        fn should_parse_cast_literals() {
            assert_eq!(
                parse("Map[(sys:Int32)1, key]"),
                BindingPathExpression::indexer_accessor(
                    part("Map"),
                    BindingPathExpression::Indexer(Indexer::new(vec![
                        Literal::new(Some(XamlType::new("sys", "Int32")), "1"),
                        literal("key"),
                    ])),
                )
            );
        }

        #[test]
        fn should_report_missing_closing_bracket_at_opening_bracket() {
            let error = parse_error("Friends[0");
            assert_eq!(error.error, BindingPathError::RightAngleBracketMissing);
            assert_eq!(error.lexeme.unwrap().position, 7);
        }

        #[test]
        fn should_require_a_value() {
            assert_eq!(parse_error("Friends[]").error, BindingPathError::ValueMissing);
            assert_eq!(parse_error("Friends[1,]").error, BindingPathError::ValueMissing);
        }

        #[test]
        fn should_require_closing_parenthesis_of_cast() {
            assert_eq!(
                parse_error("[(sys:Int32]").error,
                BindingPathError::RightParenthesisMissing
            );
        }
    }

    mod attached_properties {
        use super::*;
        use pretty_assertions::assert_eq;

        fn attached(prefix: &str, owner: &str, name: &str) -> AttachedDependencyProperty {
            AttachedDependencyProperty::new(XamlType::new(prefix, owner), name)
        }

        #[test]
        fn should_parse_attached_property() {
            assert_eq!(
                parse("(vm:Tags.Label)"),
                BindingPathExpression::AttachedDependencyProperty(attached("vm", "Tags", "Label"))
            );
        }

        #[test]
        fn should_parse_attached_property_without_prefix() {
            assert_eq!(
                parse("(Grid.Row)"),
                BindingPathExpression::AttachedDependencyProperty(attached("", "Grid", "Row"))
            );
        }

        #[test]
        fn should_parse_attached_property_in_chain() {
            assert_eq!(
                parse("Address.(vm:Tags.Label)"),
                BindingPathExpression::property_accessor(
                    part("Address"),
                    BindingPathExpression::AttachedDependencyProperty(attached("vm", "Tags", "Label")),
                )
            );
            assert_eq!(
                parse("(vm:Tags.Label).Length"),
                BindingPathExpression::property_accessor(
                    BindingPathExpression::AttachedDependencyPropertyPart(attached("vm", "Tags", "Label")),
                    property("Length"),
                )
            );
        }

        #[test]
        fn should_require_property_name() {
            let error = parse_error("(vm:Tags)");
            assert_eq!(error.error, BindingPathError::PropertyNameMissing);
            assert_eq!(error.lexeme.unwrap().text, ")");
        }

        #[test]
        fn should_require_closing_parenthesis() {
            let error = parse_error("(vm:Tags.Label");
            assert_eq!(error.error, BindingPathError::RightParenthesisMissing);
            assert!(error.lexeme.unwrap().is_end());
        }

        #[test]
        fn should_require_owner_type() {
            assert_eq!(parse_error("(.Label)").error, BindingPathError::XamlTypeMissing);
            assert_eq!(parse_error("(vm:.Label)").error, BindingPathError::XamlTypeMissing);
        }
    }

    #[test]
    fn should_reject_trailing_tokens() {
        let error = parse_error("Name)");
        assert_eq!(error.error, BindingPathError::EndMissing);
        assert_eq!(error.lexeme.unwrap().position, 4);
    }

    #[test]
    fn should_reject_leading_punctuation() {
        assert_eq!(parse_error(":Name").error, BindingPathError::SyntaxError);
    }

    #[test]
    fn should_describe_errors() {
        let error = parse_error("Friends[0");
        assert_eq!(error.to_string(), "']' expected at '[' at 7");
    }
}
