/**
 * Binding Path Lexer
 *
 * Splits a binding path such as `Foo.Bar[0].(ns:Owner.Attached)` into lexemes.
 * Word/space runs become `TokenType` lexemes, the punctuation `. ( ) [ ] : ,`
 * becomes single character lexemes and a synthetic `End` lexeme closes the list.
 */

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::parser::{BindingPathError, ParseError};
use crate::chars;

static TOKENIZER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w ]+|[.()\[\]:,]").expect("tokenizer pattern is valid"));

/// Lexeme kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    TokenType,
    WhiteSpace,
    End,
}

/// A single lexeme with its byte position in the path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexeme {
    pub text: String,
    pub kind: TokenKind,
    pub position: usize,
}

impl Lexeme {
    pub fn new(text: impl Into<String>, kind: TokenKind, position: usize) -> Self {
        Lexeme {
            text: text.into(),
            kind,
            position,
        }
    }

    pub fn end(position: usize) -> Self {
        Lexeme::new(String::new(), TokenKind::End, position)
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }

    pub fn is_token(&self, text: &str) -> bool {
        self.kind == TokenKind::TokenType && self.text == text
    }

    /// The trimmed text if this lexeme is a single identifier.
    pub fn identifier(&self) -> Option<&str> {
        if self.kind != TokenKind::TokenType {
            return None;
        }

        let text = self.text.trim();
        let mut chars_iter = text.chars();
        match chars_iter.next() {
            Some(first) if chars::is_identifier_start(first) => {}
            _ => return None,
        }

        if chars_iter.all(chars::is_word_char) {
            Some(text)
        } else {
            None
        }
    }

    /// The trimmed text if this lexeme is a word/space run (indexer values).
    pub fn value(&self) -> Option<&str> {
        if self.kind != TokenKind::TokenType {
            return None;
        }

        let text = self.text.trim();
        if !text.is_empty() && text.chars().all(|c| chars::is_word_char(c) || c == chars::SPACE) {
            Some(text)
        } else {
            None
        }
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::End => write!(f, "<end> at {}", self.position),
            _ => write!(f, "'{}' at {}", self.text, self.position),
        }
    }
}

/// Lexeme sequence with a read cursor.
///
/// The cursor skips whitespace lexemes and never moves past the `End` lexeme.
/// Lookahead is done with `peek`, so the parser never needs to step back.
#[derive(Debug, Clone)]
pub struct Lexemes {
    lexemes: Vec<Lexeme>,
    index: usize,
}

impl Lexemes {
    pub fn new(mut lexemes: Vec<Lexeme>) -> Self {
        let needs_end = lexemes.last().map_or(true, |l| !l.is_end());
        if needs_end {
            let position = lexemes.last().map_or(0, |l| l.position + l.text.len());
            lexemes.push(Lexeme::end(position));
        }

        Lexemes { lexemes, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.lexemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexemes.len() <= 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lexeme> {
        self.lexemes.iter()
    }

    fn next_significant(&self) -> usize {
        let mut index = self.index;
        while self.lexemes[index].kind == TokenKind::WhiteSpace {
            index += 1;
        }
        index
    }

    /// The next significant lexeme without consuming it.
    pub fn peek(&self) -> &Lexeme {
        &self.lexemes[self.next_significant()]
    }

    /// The lexeme the cursor is positioned on; used for diagnostics.
    pub fn current(&self) -> &Lexeme {
        self.peek()
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().is_end()
    }

    fn advance(&mut self) -> Lexeme {
        let index = self.next_significant();
        let lexeme = self.lexemes[index].clone();
        if !lexeme.is_end() {
            self.index = index + 1;
        } else {
            self.index = index;
        }
        lexeme
    }

    /// Consume the next lexeme if it is the given punctuation.
    pub fn accept_token(&mut self, text: &str) -> bool {
        if self.peek().is_token(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the next lexeme if it is the given punctuation, returning it.
    pub fn accept_token_lexeme(&mut self, text: &str) -> Option<Lexeme> {
        if self.peek().is_token(text) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn accept_identifier(&mut self) -> Option<String> {
        let identifier = self.peek().identifier().map(str::to_string)?;
        self.advance();
        Some(identifier)
    }

    pub fn accept_value(&mut self) -> Option<String> {
        let value = self.peek().value().map(str::to_string)?;
        self.advance();
        Some(value)
    }

    pub fn accept_end(&mut self) -> bool {
        self.is_at_end()
    }
}

/// Binding path lexical analyzer
#[derive(Debug, Default, Clone, Copy)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Lexer
    }

    /// Tokenize `input`. Every character must belong to a lexeme, otherwise the
    /// whole input is rejected with a syntax error.
    pub fn analyze(&self, input: &str) -> Result<Lexemes, ParseError> {
        let mut lexemes = Vec::new();
        let mut expected = 0;
        for found in TOKENIZER.find_iter(input) {
            if found.start() != expected {
                return Err(unexpected_character(input, expected));
            }

            let text = found.as_str();
            let kind = if text.trim().is_empty() {
                TokenKind::WhiteSpace
            } else {
                TokenKind::TokenType
            };
            lexemes.push(Lexeme::new(text, kind, found.start()));
            expected = found.end();
        }

        if expected != input.len() {
            return Err(unexpected_character(input, expected));
        }

        lexemes.push(Lexeme::end(input.len()));
        Ok(Lexemes::new(lexemes))
    }
}

fn unexpected_character(input: &str, position: usize) -> ParseError {
    let text = input[position..]
        .chars()
        .next()
        .map(|c| c.to_string())
        .unwrap_or_default();
    ParseError::new(
        BindingPathError::SyntaxError,
        Some(Lexeme::new(text, TokenKind::TokenType, position)),
    )
}
