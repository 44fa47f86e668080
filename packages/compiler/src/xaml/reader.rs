/**
 * Markup Reader
 *
 * Namespace aware XML reader producing a `XamlDocument`. Handles the prolog,
 * comments, processing instructions, CDATA, the predefined and numeric
 * entities, and `xmlns` scoping. DTDs are skipped, not interpreted.
 */
use indexmap::IndexMap;

use super::document::{ElementId, XName, XamlAttribute, XamlDocument, XamlElement, XMLNS};
use crate::chars;
use crate::error::{CompilerError, Result};

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Parse markup text into a document
pub fn parse_document(source: &str) -> Result<XamlDocument> {
    XamlReader::new(source).read()
}

struct CharCursor {
    chars: Vec<char>,
    index: usize,
    line: usize,
    col: usize,
}

impl CharCursor {
    fn new(source: &str) -> Self {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        CharCursor {
            chars: source.chars().collect(),
            index: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> char {
        self.chars.get(self.index).copied().unwrap_or(chars::EOF)
    }

    fn is_eof(&self) -> bool {
        self.index >= self.chars.len()
    }

    fn advance(&mut self) {
        if let Some(&ch) = self.chars.get(self.index) {
            self.index += 1;
            if ch == chars::NEWLINE {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        let mut index = self.index;
        for expected in s.chars() {
            match self.chars.get(index) {
                Some(&ch) if ch == expected => index += 1,
                _ => return false,
            }
        }
        true
    }
}

struct XamlReader {
    cursor: CharCursor,
    elements: Vec<XamlElement>,
    scopes: Vec<IndexMap<String, String>>,
}

impl XamlReader {
    fn new(source: &str) -> Self {
        let mut xml_scope = IndexMap::new();
        xml_scope.insert("xml".to_string(), XML_NAMESPACE.to_string());
        XamlReader {
            cursor: CharCursor::new(source),
            elements: Vec::new(),
            scopes: vec![xml_scope],
        }
    }

    fn error(&self, message: impl Into<String>) -> CompilerError {
        CompilerError::Xml {
            message: message.into(),
            line: self.cursor.line,
            col: self.cursor.col,
        }
    }

    fn read(mut self) -> Result<XamlDocument> {
        self.skip_misc()?;
        if self.cursor.peek() != chars::LT {
            return Err(self.error("root element expected"));
        }

        let root = self.consume_element(None)?;
        self.skip_misc()?;
        if !self.cursor.is_eof() {
            return Err(self.error("content after the root element"));
        }

        Ok(XamlDocument::new(self.elements, root))
    }

    fn attempt_str(&mut self, s: &str) -> bool {
        if self.cursor.starts_with(s) {
            for _ in s.chars() {
                self.cursor.advance();
            }
            true
        } else {
            false
        }
    }

    fn require_char(&mut self, ch: char) -> Result<()> {
        if self.cursor.peek() == ch {
            self.cursor.advance();
            Ok(())
        } else {
            Err(self.error(format!("'{}' expected", ch)))
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.cursor.is_eof() && chars::is_whitespace(self.cursor.peek()) {
            self.cursor.advance();
        }
    }

    fn skip_until(&mut self, terminator: &str) -> Result<String> {
        let mut skipped = String::new();
        while !self.attempt_str(terminator) {
            if self.cursor.is_eof() {
                return Err(self.error(format!("'{}' expected", terminator)));
            }
            skipped.push(self.cursor.peek());
            self.cursor.advance();
        }
        Ok(skipped)
    }

    /// Whitespace, comments, processing instructions and doctype.
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.attempt_str("<?") {
                self.skip_until("?>")?;
            } else if self.attempt_str("<!--") {
                self.skip_until("-->")?;
            } else if self.attempt_str("<!DOCTYPE") {
                self.skip_doc_type()?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_doc_type(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            match self.cursor.peek() {
                chars::EOF if self.cursor.is_eof() => return Err(self.error("unterminated doctype")),
                chars::LBRACKET => depth += 1,
                chars::RBRACKET => depth = depth.saturating_sub(1),
                chars::GT if depth == 0 => {
                    self.cursor.advance();
                    return Ok(());
                }
                _ => {}
            }
            self.cursor.advance();
        }
    }

    fn consume_name(&mut self) -> Result<(String, String)> {
        if !chars::is_name_start(self.cursor.peek()) {
            return Err(self.error("name expected"));
        }

        let mut first = String::new();
        while chars::is_name_char(self.cursor.peek()) {
            first.push(self.cursor.peek());
            self.cursor.advance();
        }

        if self.cursor.peek() == chars::COLON {
            self.cursor.advance();
            let mut local = String::new();
            while chars::is_name_char(self.cursor.peek()) {
                local.push(self.cursor.peek());
                self.cursor.advance();
            }
            if local.is_empty() {
                return Err(self.error("local name expected"));
            }
            return Ok((first, local));
        }

        Ok((String::new(), first))
    }

    fn consume_entity(&mut self, out: &mut String) -> Result<()> {
        let entity = self.skip_until(";")?;
        let decoded = match entity.as_str() {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(decimal) = entity.strip_prefix('#') {
                    decimal.parse::<u32>().ok()
                } else {
                    None
                };
                match code.and_then(char::from_u32) {
                    Some(ch) => ch,
                    None => return Err(self.error(format!("unknown entity '&{};'", entity))),
                }
            }
        };
        out.push(decoded);
        Ok(())
    }

    fn consume_attribute_value(&mut self) -> Result<String> {
        let quote = self.cursor.peek();
        if quote != chars::DQ && quote != chars::SQ {
            return Err(self.error("quoted attribute value expected"));
        }
        self.cursor.advance();

        let mut value = String::new();
        loop {
            let ch = self.cursor.peek();
            if self.cursor.is_eof() {
                return Err(self.error("unterminated attribute value"));
            }
            self.cursor.advance();
            match ch {
                c if c == quote => return Ok(value),
                chars::AMPERSAND => self.consume_entity(&mut value)?,
                chars::LT => return Err(self.error("'<' in attribute value")),
                c => value.push(c),
            }
        }
    }

    fn resolve_prefix(&self, prefix: &str, line: usize, col: usize) -> Result<String> {
        for scope in self.scopes.iter().rev() {
            if let Some(uri) = scope.get(prefix) {
                return Ok(uri.clone());
            }
        }

        if prefix.is_empty() {
            return Ok(String::new());
        }

        Err(CompilerError::Xml {
            message: format!("undeclared namespace prefix '{}'", prefix),
            line,
            col,
        })
    }

    fn consume_element(&mut self, parent: Option<ElementId>) -> Result<ElementId> {
        let (line, col) = (self.cursor.line, self.cursor.col);
        self.require_char(chars::LT)?;
        let (prefix, local_name) = self.consume_name()?;

        let mut raw_attributes = Vec::new();
        let mut namespaces = IndexMap::new();
        loop {
            self.skip_whitespace();
            match self.cursor.peek() {
                chars::SLASH | chars::GT => break,
                _ => {}
            }

            let (attribute_line, attribute_col) = (self.cursor.line, self.cursor.col);
            let (attribute_prefix, attribute_local) = self.consume_name()?;
            self.skip_whitespace();
            self.require_char(chars::EQ)?;
            self.skip_whitespace();
            let value = self.consume_attribute_value()?;

            if attribute_prefix == XMLNS {
                namespaces.insert(attribute_local, value);
            } else if attribute_prefix.is_empty() && attribute_local == XMLNS {
                namespaces.insert(String::new(), value);
            } else {
                raw_attributes.push((attribute_prefix, attribute_local, value, attribute_line, attribute_col));
            }
        }

        self.scopes.push(namespaces.clone());
        let element_namespace = self.resolve_prefix(&prefix, line, col)?;
        let mut attributes = Vec::with_capacity(raw_attributes.len());
        for (attribute_prefix, attribute_local, value, attribute_line, attribute_col) in raw_attributes {
            let namespace = if attribute_prefix.is_empty() {
                String::new()
            } else {
                self.resolve_prefix(&attribute_prefix, attribute_line, attribute_col)?
            };
            attributes.push(XamlAttribute {
                name: XName::new(namespace, attribute_local),
                prefix: attribute_prefix,
                value,
                line: attribute_line,
                col: attribute_col,
            });
        }

        let id = self.elements.len();
        self.elements.push(XamlElement {
            id,
            name: XName::new(element_namespace, local_name.clone()),
            prefix: prefix.clone(),
            attributes,
            namespaces,
            children: Vec::new(),
            parent,
            text: String::new(),
            line,
            col,
        });

        if self.attempt_str("/>") {
            self.scopes.pop();
            return Ok(id);
        }
        self.require_char(chars::GT)?;

        self.consume_content(id)?;

        let (close_prefix, close_local) = self.consume_name()?;
        if close_prefix != prefix || close_local != local_name {
            return Err(self.error(format!(
                "closing tag '{}' does not match '{}'",
                join_name(&close_prefix, &close_local),
                join_name(&prefix, &local_name)
            )));
        }
        self.skip_whitespace();
        self.require_char(chars::GT)?;
        self.scopes.pop();
        Ok(id)
    }

    /// Content up to and including the `</` of the closing tag.
    fn consume_content(&mut self, id: ElementId) -> Result<()> {
        let mut text = String::new();
        loop {
            if self.cursor.is_eof() {
                return Err(self.error("unexpected end of document"));
            }

            if self.attempt_str("</") {
                self.elements[id].text = text.trim().to_string();
                return Ok(());
            } else if self.attempt_str("<!--") {
                self.skip_until("-->")?;
            } else if self.attempt_str("<![CDATA[") {
                let data = self.skip_until("]]>")?;
                text.push_str(&data);
            } else if self.attempt_str("<?") {
                self.skip_until("?>")?;
            } else if self.cursor.peek() == chars::LT {
                let child = self.consume_element(Some(id))?;
                self.elements[id].children.push(child);
            } else if self.cursor.peek() == chars::AMPERSAND {
                self.cursor.advance();
                self.consume_entity(&mut text)?;
            } else {
                text.push(self.cursor.peek());
                self.cursor.advance();
            }
        }
    }
}

fn join_name(prefix: &str, local_name: &str) -> String {
    if prefix.is_empty() {
        local_name.to_string()
    } else {
        format!("{}:{}", prefix, local_name)
    }
}
