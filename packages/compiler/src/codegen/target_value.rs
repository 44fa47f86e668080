//! Target side of a binding: the dependency property being bound and the
//! expressions used to read it and to reach the target element.

use crate::error::Result;
use crate::type_info::{QualifiedProperty, QualifiedType, XamlTypeResolver};
use crate::xaml::document::{XName, XamlElement};
use crate::xaml::markup_extension::BindingAssignment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetValueCodeGenerator {
    /// Type owning the target property: the element type, or the owner of an
    /// attached property.
    pub target_type: QualifiedType,
    pub target_property: QualifiedProperty,
    pub is_attached: bool,
}

impl TargetValueCodeGenerator {
    /// `Grid.Row="{Binding ...}"` names an attached property; the owner prefix
    /// resolves through the attribute's namespace, or the element's when the
    /// attribute is unprefixed.
    pub fn get_target(
        element_type: &QualifiedType,
        assignment: &BindingAssignment,
        element: &XamlElement,
        xaml_types: &XamlTypeResolver,
    ) -> Result<Self> {
        let target_property = &assignment.target_property;
        match target_property.local_name.rsplit_once('.') {
            Some((owner, name)) => {
                let namespace = if target_property.namespace.is_empty() {
                    element.name.namespace.clone()
                } else {
                    target_property.namespace.clone()
                };
                let owner_type = xaml_types.resolve_name(&XName::new(namespace, owner))?;
                let property = xaml_types
                    .type_resolver()
                    .get_attached_dependency_property(&owner_type, name)?;
                Ok(TargetValueCodeGenerator {
                    target_type: owner_type,
                    target_property: property,
                    is_attached: true,
                })
            }
            None => {
                let property = xaml_types
                    .type_resolver()
                    .get_property(element_type, &target_property.local_name)?;
                Ok(TargetValueCodeGenerator {
                    target_type: element_type.clone(),
                    target_property: property,
                    is_attached: false,
                })
            }
        }
    }

    pub fn property_type(&self) -> &QualifiedType {
        &self.target_property.property_type
    }

    /// `Owner.NameProperty`
    pub fn dependency_property(&self) -> String {
        format!(
            "{}.{}Property",
            self.target_type.to_alias_qualified_type(),
            self.target_property.name
        )
    }

    /// Reads the target value from the target element `t`.
    pub fn property_getter(&self) -> String {
        if self.is_attached {
            format!(
                "t => {}.Get{}(t)",
                self.target_type.to_alias_qualified_type(),
                self.target_property.name
            )
        } else {
            format!("t => t.{}", self.target_property.name)
        }
    }
}

/// Expression reaching a markup element from inside the generated container.
pub fn target_expression(element_type: &QualifiedType, element_name: &str, is_root: bool, has_code_behind: bool) -> String {
    if is_root {
        "this.Root".to_string()
    } else if has_code_behind {
        format!("this.Root.{}", element_name)
    } else {
        format!(
            "({})this.Root.FindName(\"{}\")",
            element_type.to_alias_qualified_type(),
            element_name
        )
    }
}
