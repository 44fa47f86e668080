/*
 * Character Codes
 *
 * Characters shared by the binding path lexer and the markup reader.
 */

// Special characters
pub const EOF: char = '\0';
pub const TAB: char = '\t';
pub const NEWLINE: char = '\n';
pub const RETURN: char = '\r';
pub const SPACE: char = ' ';

// Punctuation
pub const DQ: char = '"';
pub const AMPERSAND: char = '&';
pub const SQ: char = '\'';
pub const COMMA: char = ',';
pub const MINUS: char = '-';
pub const PERIOD: char = '.';
pub const SLASH: char = '/';
pub const COLON: char = ':';
pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';
pub const LBRACKET: char = '[';
pub const RBRACKET: char = ']';
pub const UNDERSCORE: char = '_';
pub const LBRACE: char = '{';
pub const RBRACE: char = '}';

pub const ZERO: char = '0';
pub const NINE: char = '9';

/// Check if character is whitespace
pub fn is_whitespace(ch: char) -> bool {
    ch == SPACE || ch == TAB || ch == NEWLINE || ch == RETURN || ch.is_whitespace()
}

/// Check if character is a digit
pub fn is_digit(ch: char) -> bool {
    (ZERO..=NINE).contains(&ch)
}

/// Word characters as understood by the binding path grammar (`\w`).
pub fn is_word_char(ch: char) -> bool {
    ch == UNDERSCORE || ch.is_alphanumeric()
}

/// Check if character can start an identifier in a binding path
pub fn is_identifier_start(ch: char) -> bool {
    ch == UNDERSCORE || ch.is_alphabetic()
}

/// Names in markup: letters, digits, `_`, `-`, `.` after the first character.
pub fn is_name_start(ch: char) -> bool {
    ch == UNDERSCORE || ch.is_alphabetic()
}

pub fn is_name_char(ch: char) -> bool {
    is_name_start(ch) || is_digit(ch) || ch == MINUS || ch == PERIOD || ch.is_alphanumeric()
}
