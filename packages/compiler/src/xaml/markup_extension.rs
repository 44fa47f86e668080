/**
 * Markup Extension Parser
 *
 * Parses `{Binding Path, Mode=TwoWay, ElementName=Other, ...}` attribute
 * values into a `BindingAssignment`. Arguments that only the runtime binding
 * engine understands (converters, string formats, ...) are kept verbatim in
 * `additional_values`.
 */
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::document::{XName, XamlAttribute};
use crate::chars;
use crate::error::{CompilerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BindingMode {
    #[default]
    Default,
    OneWay,
    OneTime,
    OneWayToSource,
    TwoWay,
}

impl BindingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingMode::Default => "Default",
            BindingMode::OneWay => "OneWay",
            BindingMode::OneTime => "OneTime",
            BindingMode::OneWayToSource => "OneWayToSource",
            BindingMode::TwoWay => "TwoWay",
        }
    }

    /// Modes that write values back into the source.
    pub fn updates_source(&self) -> bool {
        matches!(self, BindingMode::TwoWay | BindingMode::OneWayToSource)
    }
}

impl FromStr for BindingMode {
    type Err = CompilerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(BindingMode::Default),
            "oneway" => Ok(BindingMode::OneWay),
            "onetime" => Ok(BindingMode::OneTime),
            "onewaytosource" => Ok(BindingMode::OneWayToSource),
            "twoway" => Ok(BindingMode::TwoWay),
            _ => Err(CompilerError::MarkupExtension(format!("unknown binding mode '{}'", s))),
        }
    }
}

impl fmt::Display for BindingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UpdateSourceTrigger {
    #[default]
    Default,
    PropertyChanged,
    LostFocus,
    Explicit,
}

impl UpdateSourceTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateSourceTrigger::Default => "Default",
            UpdateSourceTrigger::PropertyChanged => "PropertyChanged",
            UpdateSourceTrigger::LostFocus => "LostFocus",
            UpdateSourceTrigger::Explicit => "Explicit",
        }
    }
}

impl FromStr for UpdateSourceTrigger {
    type Err = CompilerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(UpdateSourceTrigger::Default),
            "propertychanged" => Ok(UpdateSourceTrigger::PropertyChanged),
            "lostfocus" => Ok(UpdateSourceTrigger::LostFocus),
            "explicit" => Ok(UpdateSourceTrigger::Explicit),
            _ => Err(CompilerError::MarkupExtension(format!(
                "unknown update source trigger '{}'",
                s
            ))),
        }
    }
}

/// Arguments of a parsed `{Binding ...}` extension
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingMarkupExtension {
    pub path: String,
    pub mode: BindingMode,
    pub update_source_trigger: UpdateSourceTrigger,
    pub element_name: Option<String>,
    pub additional_values: IndexMap<String, String>,
}

/// A binding markup extension assigned to a target property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingAssignment {
    pub target_property: XName,
    /// Attribute name as written, `Text` or `Canvas.Left` or `p:Owner.Prop`
    pub attribute_name: String,
    pub binding: BindingMarkupExtension,
}

impl BindingAssignment {
    pub fn mode(&self) -> BindingMode {
        self.binding.mode
    }

    pub fn has_additional_values(&self) -> bool {
        !self.binding.additional_values.is_empty()
    }
}

/// Generic `{Name positional, Key=Value}` syntax
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkupExtensionSyntax {
    pub name: String,
    pub positional: Vec<String>,
    pub named: IndexMap<String, String>,
}

/// Parse `{Name arg, Key=Value, ...}`. Nested extensions and quoted values
/// are kept as single argument values.
pub fn parse_markup_extension(text: &str) -> Result<MarkupExtensionSyntax> {
    let text = text.trim();
    let inner = text
        .strip_prefix(chars::LBRACE)
        .and_then(|t| t.strip_suffix(chars::RBRACE))
        .ok_or_else(|| CompilerError::MarkupExtension(format!("'{}' is not a markup extension", text)))?
        .trim();

    let name_end = inner.find(chars::is_whitespace).unwrap_or(inner.len());
    let name = inner[..name_end].to_string();
    if name.is_empty() {
        return Err(CompilerError::MarkupExtension("markup extension name expected".to_string()));
    }

    let mut syntax = MarkupExtensionSyntax {
        name,
        ..Default::default()
    };

    for argument in split_arguments(&inner[name_end..])? {
        match split_named_argument(&argument) {
            Some((key, value)) => {
                syntax.named.insert(key, value);
            }
            None => syntax.positional.push(unquote(&argument)),
        }
    }

    Ok(syntax)
}

fn split_arguments(text: &str) -> Result<Vec<String>> {
    let mut arguments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    for ch in text.chars() {
        match ch {
            chars::SQ => {
                in_quote = !in_quote;
                current.push(ch);
            }
            chars::LBRACE if !in_quote => {
                depth += 1;
                current.push(ch);
            }
            chars::RBRACE if !in_quote => {
                if depth == 0 {
                    return Err(CompilerError::MarkupExtension("unbalanced '}'".to_string()));
                }
                depth -= 1;
                current.push(ch);
            }
            chars::COMMA if !in_quote && depth == 0 => {
                arguments.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if in_quote || depth != 0 {
        return Err(CompilerError::MarkupExtension("unterminated argument".to_string()));
    }

    let last = current.trim();
    if !last.is_empty() {
        arguments.push(last.to_string());
    } else if !arguments.is_empty() {
        return Err(CompilerError::MarkupExtension("argument expected after ','".to_string()));
    }

    Ok(arguments)
}

fn split_named_argument(argument: &str) -> Option<(String, String)> {
    let mut depth = 0usize;
    let mut in_quote = false;
    for (index, ch) in argument.char_indices() {
        match ch {
            chars::SQ => in_quote = !in_quote,
            chars::LBRACE if !in_quote => depth += 1,
            chars::RBRACE if !in_quote => depth = depth.saturating_sub(1),
            chars::EQ if !in_quote && depth == 0 => {
                let key = argument[..index].trim().to_string();
                let value = unquote(argument[index + 1..].trim());
                return Some((key, value));
            }
            _ => {}
        }
    }
    None
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix(chars::SQ)
        .and_then(|v| v.strip_suffix(chars::SQ))
        .unwrap_or(value)
        .to_string()
}

/// Type named by an attribute value: `local:Person`,
/// `{x:Type local:Person}` or `{d:DesignInstance Type=local:Person}`.
pub fn parse_type_reference(text: &str) -> Option<String> {
    let text = text.trim();
    if !text.starts_with(chars::LBRACE) {
        return if text.is_empty() { None } else { Some(text.to_string()) };
    }

    let syntax = parse_markup_extension(text).ok()?;
    syntax
        .named
        .get("Type")
        .or_else(|| syntax.named.get("TypeName"))
        .or_else(|| syntax.positional.first())
        .cloned()
}

const UNSUPPORTED_ARGUMENTS: [&str; 3] = ["RelativeSource", "Source", "XPath"];

/// Recognizes binding markup extensions in attributes
#[derive(Debug, Clone)]
pub struct BindingMarkupExtensionParser {
    extension_names: Vec<String>,
}

impl Default for BindingMarkupExtensionParser {
    fn default() -> Self {
        BindingMarkupExtensionParser {
            extension_names: vec!["Binding".to_string()],
        }
    }
}

impl BindingMarkupExtensionParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Ok(None)` when the attribute is not a binding; an error when it is a
    /// binding this compiler cannot handle.
    pub fn parse(&self, attribute: &XamlAttribute) -> Result<Option<BindingAssignment>> {
        let value = attribute.value.trim();
        if !value.starts_with(chars::LBRACE) || value.starts_with("{}") {
            return Ok(None);
        }

        let syntax = match parse_markup_extension(value) {
            Ok(syntax) => syntax,
            Err(_) => return Ok(None),
        };
        if !self.extension_names.iter().any(|n| *n == syntax.name) {
            return Ok(None);
        }

        let mut binding = BindingMarkupExtension::default();
        if syntax.positional.len() > 1 {
            return Err(CompilerError::MarkupExtension(
                "only the path may be given positionally".to_string(),
            ));
        }
        if let Some(path) = syntax.positional.first() {
            binding.path = path.clone();
        }

        for (key, value) in syntax.named {
            match key.as_str() {
                "Path" => binding.path = value,
                "Mode" => binding.mode = value.parse()?,
                "UpdateSourceTrigger" => binding.update_source_trigger = value.parse()?,
                "ElementName" => binding.element_name = Some(value),
                unsupported if UNSUPPORTED_ARGUMENTS.contains(&unsupported) => {
                    return Err(CompilerError::MarkupExtension(format!(
                        "'{}' bindings are not compiled",
                        unsupported
                    )));
                }
                _ => {
                    binding.additional_values.insert(key, value);
                }
            }
        }

        Ok(Some(BindingAssignment {
            target_property: attribute.name.clone(),
            attribute_name: attribute.qualified_name(),
            binding,
        }))
    }
}
