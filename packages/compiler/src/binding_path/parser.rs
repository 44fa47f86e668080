/**
 * Binding Path Parser
 *
 * Recursive descent parser for binding paths:
 *
 * ```text
 * BindingPath       := PrimaryExpression (IndexerAccessor | PropertyAccessor)*
 * PrimaryExpression := "." | Indexer | AttachedProperty | Property
 * PropertyAccessor  := "." (AttachedProperty | Property)
 * IndexerAccessor   := Indexer
 * Indexer           := "[" LiteralList "]"
 * LiteralList       := ("(" XamlType ")")? Value ("," LiteralList)?
 * AttachedProperty  := "(" XamlType "." Identifier ")"
 * Property          := Identifier
 * ```
 *
 * Whether an accessor is terminal or a part is decided by peeking for the end
 * of input right after it.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ast::*;
use super::lexer::{Lexeme, Lexemes, Lexer};

/// Binding path syntax errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingPathError {
    SyntaxError,
    RightParenthesisMissing,
    /// Closing `]` of an indexer is missing.
    RightAngleBracketMissing,
    ValueMissing,
    PropertyNameMissing,
    EndMissing,
    XamlTypeMissing,
}

impl fmt::Display for BindingPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            BindingPathError::SyntaxError => "syntax error",
            BindingPathError::RightParenthesisMissing => "')' expected",
            BindingPathError::RightAngleBracketMissing => "']' expected",
            BindingPathError::ValueMissing => "indexer value expected",
            BindingPathError::PropertyNameMissing => "property name expected",
            BindingPathError::EndMissing => "end of path expected",
            BindingPathError::XamlTypeMissing => "type name expected",
        };
        f.write_str(message)
    }
}

/// A rejected binding path together with the lexeme it was rejected at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub error: BindingPathError,
    pub lexeme: Option<Lexeme>,
}

impl ParseError {
    pub fn new(error: BindingPathError, lexeme: Option<Lexeme>) -> Self {
        ParseError { error, lexeme }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lexeme {
            Some(lexeme) => write!(f, "{} at {}", self.error, lexeme),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for ParseError {}

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Parser for binding paths
#[derive(Debug, Default, Clone)]
pub struct BindingPathParser {
    lexer: Lexer,
}

impl BindingPathParser {
    pub fn new() -> Self {
        BindingPathParser { lexer: Lexer::new() }
    }

    /// Parse a complete binding path. Errors are never partial: either the
    /// whole path yields a tree or the error names the offending lexeme.
    pub fn parse(&self, path: &str) -> ParseResult<BindingPathExpression> {
        let lexemes = self.lexer.analyze(path)?;
        let mut parse_path = ParsePath { lexemes };
        let expression = parse_path.binding_path()?;
        if !parse_path.lexemes.accept_end() {
            return Err(parse_path.error(BindingPathError::EndMissing));
        }

        Ok(expression)
    }
}

struct ParsePath {
    lexemes: Lexemes,
}

impl ParsePath {
    fn error(&self, error: BindingPathError) -> ParseError {
        ParseError::new(error, Some(self.lexemes.current().clone()))
    }

    fn binding_path(&mut self) -> ParseResult<BindingPathExpression> {
        if self.lexemes.is_at_end() {
            return Ok(BindingPathExpression::DataContextSource);
        }

        let mut lhs = if self.lexemes.accept_token(".") {
            BindingPathExpression::DataContextSource
        } else {
            self.primary_expression()?
        };
        loop {
            if let Some(indexer) = self.indexer()? {
                lhs = BindingPathExpression::indexer_accessor(lhs, indexer);
                continue;
            }

            if self.lexemes.accept_token(".") {
                let property = match self.attached_dependency_property()? {
                    Some(attached) => attached,
                    None => self.required_property()?,
                };
                lhs = BindingPathExpression::property_accessor(lhs, property);
                continue;
            }

            return Ok(lhs);
        }
    }

    fn primary_expression(&mut self) -> ParseResult<BindingPathExpression> {
        if let Some(indexer) = self.indexer()? {
            return Ok(indexer);
        }

        if let Some(attached) = self.attached_dependency_property()? {
            return Ok(attached);
        }

        match self.property() {
            Some(property) => Ok(property),
            None => Err(self.error(BindingPathError::SyntaxError)),
        }
    }

    fn attached_dependency_property(&mut self) -> ParseResult<Option<BindingPathExpression>> {
        if !self.lexemes.accept_token("(") {
            return Ok(None);
        }

        let owner = match self.xaml_type()? {
            Some(owner) => owner,
            None => return Err(self.error(BindingPathError::XamlTypeMissing)),
        };

        if !self.lexemes.accept_token(".") {
            return Err(self.error(BindingPathError::PropertyNameMissing));
        }

        let name = match self.lexemes.accept_identifier() {
            Some(name) => name,
            None => return Err(self.error(BindingPathError::PropertyNameMissing)),
        };

        if !self.lexemes.accept_token(")") {
            return Err(self.error(BindingPathError::RightParenthesisMissing));
        }

        let property = AttachedDependencyProperty::new(owner, name);
        if self.lexemes.is_at_end() {
            Ok(Some(BindingPathExpression::AttachedDependencyProperty(property)))
        } else {
            Ok(Some(BindingPathExpression::AttachedDependencyPropertyPart(property)))
        }
    }

    fn xaml_type(&mut self) -> ParseResult<Option<XamlType>> {
        let identifier = match self.lexemes.accept_identifier() {
            Some(identifier) => identifier,
            None => return Ok(None),
        };

        if self.lexemes.accept_token(":") {
            return match self.lexemes.accept_identifier() {
                Some(local_name) => Ok(Some(XamlType::new(identifier, local_name))),
                None => Err(self.error(BindingPathError::XamlTypeMissing)),
            };
        }

        Ok(Some(XamlType::new("", identifier)))
    }

    fn indexer(&mut self) -> ParseResult<Option<BindingPathExpression>> {
        let open = match self.lexemes.accept_token_lexeme("[") {
            Some(open) => open,
            None => return Ok(None),
        };

        if self.lexemes.is_at_end() {
            return Err(ParseError::new(BindingPathError::RightAngleBracketMissing, Some(open)));
        }

        let mut literals = Literals::new();
        self.literal_list(&mut literals)?;
        if !self.lexemes.accept_token("]") {
            return Err(ParseError::new(BindingPathError::RightAngleBracketMissing, Some(open)));
        }

        let indexer = Indexer { literals };
        if self.lexemes.is_at_end() {
            Ok(Some(BindingPathExpression::Indexer(indexer)))
        } else {
            Ok(Some(BindingPathExpression::IndexerPart(indexer)))
        }
    }

    fn literal_list(&mut self, literals: &mut Literals) -> ParseResult<()> {
        loop {
            let mut cast_type = None;
            if self.lexemes.accept_token("(") {
                match self.xaml_type()? {
                    Some(xaml_type) => cast_type = Some(xaml_type),
                    None => return Err(self.error(BindingPathError::XamlTypeMissing)),
                }

                if !self.lexemes.accept_token(")") {
                    return Err(self.error(BindingPathError::RightParenthesisMissing));
                }
            }

            let value = match self.lexemes.accept_value() {
                Some(value) => value,
                None => return Err(self.error(BindingPathError::ValueMissing)),
            };
            literals.push(Literal::new(cast_type, value));

            if !self.lexemes.accept_token(",") {
                return Ok(());
            }
        }
    }

    fn property(&mut self) -> Option<BindingPathExpression> {
        let name = self.lexemes.accept_identifier()?;
        let property = Property::new(name);
        if self.lexemes.is_at_end() {
            Some(BindingPathExpression::Property(property))
        } else {
            Some(BindingPathExpression::PropertyPart(property))
        }
    }

    fn required_property(&mut self) -> ParseResult<BindingPathExpression> {
        match self.property() {
            Some(property) => Ok(property),
            None => Err(self.error(BindingPathError::PropertyNameMissing)),
        }
    }
}
