//! Lexer: ES5 tokenization, including automatic-semicolon-insertion hooks
//! and regex-vs-division disambiguation.
//!
//! A single cursor over `&str`: ES5 source text is read as UTF-8 and
//! re-encoded to UTF-16 only once strings reach the heap, via
//! [`crate::value::JsString`].

mod error;

pub use error::LexError;

use crate::error::Position;
use crate::unicode::{is_identifier_continue, is_identifier_start};
use std::rc::Rc;

/// A single lexical token, with a flag for whether a line terminator was
/// skipped immediately before it (the lexer's automatic-semicolon-insertion
/// hook).
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line_terminator_before: bool,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(Rc<str>),
    Keyword(Keyword),
    Punctuator(&'static str),
    NumericLiteral(f64, bool /* legacy octal-formatted */),
    StringLiteral(Rc<str>, bool /* contains octal escape */),
    RegularExpressionLiteral(Rc<str>, Rc<str>),
    BooleanLiteral(bool),
    NullLiteral,
    EOF,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Break,
    Case,
    Catch,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Finally,
    For,
    Function,
    If,
    In,
    InstanceOf,
    New,
    Return,
    Switch,
    This,
    Throw,
    Try,
    TypeOf,
    Var,
    Void,
    While,
    With,
}

impl Keyword {
    fn from_str(s: &str) -> Option<Self> {
        use Keyword::*;
        Some(match s {
            "break" => Break,
            "case" => Case,
            "catch" => Catch,
            "continue" => Continue,
            "debugger" => Debugger,
            "default" => Default,
            "delete" => Delete,
            "do" => Do,
            "else" => Else,
            "finally" => Finally,
            "for" => For,
            "function" => Function,
            "if" => If,
            "in" => In,
            "instanceof" => InstanceOf,
            "new" => New,
            "return" => Return,
            "switch" => Switch,
            "this" => This,
            "throw" => Throw,
            "try" => Try,
            "typeof" => TypeOf,
            "var" => Var,
            "void" => Void,
            "while" => While,
            "with" => With,
            _ => return None,
        })
    }
}

/// Whether a `/` at the current position should start a regex literal or a
/// division/assign-division operator, decided by the *previous* token
/// (regex-vs-division disambiguation). A `/` following a value-
/// producing token (identifier, literal, `)`, `]`, `++`, `--`) is division;
/// otherwise it's a regex.
fn regex_allowed_after(prev: Option<&TokenKind>) -> bool {
    match prev {
        None => true,
        Some(TokenKind::Identifier(_))
        | Some(TokenKind::NumericLiteral(_, _))
        | Some(TokenKind::StringLiteral(..))
        | Some(TokenKind::BooleanLiteral(_))
        | Some(TokenKind::NullLiteral)
        | Some(TokenKind::RegularExpressionLiteral(..)) => false,
        Some(TokenKind::Punctuator(p)) => !matches!(*p, ")" | "]"),
        Some(TokenKind::Keyword(Keyword::This)) => false,
        _ => true,
    }
}

const PUNCTUATORS: &[&str] = &[
    ">>>=", "===", "!==", ">>>", "<<=", ">>=", "**=", "&&=", "||=", "...", "=>", "==", "!=", "<=",
    ">=", "&&", "||", "??", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>",
    "**", "{", "}", "(", ")", "[", "]", ".", ";", ",", "<", ">", "+", "-", "*", "%", "&", "|", "^",
    "!", "~", "?", ":", "=", "/",
];

/// Lexes an entire source string eagerly into a token vector. ES5 sources
/// in the conformance suite are small enough that a lazy iterator buys
/// nothing over doing this once; the parser still consumes the result
/// lazily via its cursor.
pub struct Lexer<'a> {
    src: &'a str,
    chars: std::str::CharIndices<'a>,
    peeked: Option<(usize, char)>,
    line: u32,
    column: u32,
    prev_kind: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut chars = src.char_indices();
        let peeked = chars.next();
        Self {
            src,
            chars,
            peeked,
            line: 1,
            column: 1,
            prev_kind: None,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = self.peeked?;
        self.peeked = self.chars.next();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.peeked.map(|(_, c)| c)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.src[self.peeked?.0..].chars().nth(offset)
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.kind == TokenKind::EOF;
            self.prev_kind = Some(tok.kind.clone());
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let mut saw_newline = false;
        loop {
            match self.peek() {
                Some(c) if c == '\n' || c == '\u{2028}' || c == '\u{2029}' => {
                    saw_newline = true;
                    self.bump();
                }
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.bump();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    self.bump();
                    self.bump();
                    loop {
                        match self.peek() {
                            None => return Err(LexError::syntax("unterminated comment", self.position())),
                            Some('\n') => {
                                saw_newline = true;
                                self.bump();
                            }
                            Some('*') if self.peek_at(1) == Some('/') => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            Some(_) => {
                                self.bump();
                            }
                        }
                    }
                }
                _ => break,
            }
        }

        let position = self.position();
        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::EOF,
                line_terminator_before: saw_newline,
                position,
            });
        };

        let kind = if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit())) {
            self.read_number()?
        } else if c == '"' || c == '\'' {
            self.read_string(c)?
        } else if c == '/' && regex_allowed_after(self.prev_kind.as_ref()) {
            self.read_regex()?
        } else if is_identifier_start(c) {
            self.read_identifier()
        } else {
            self.read_punctuator()?
        };
        Ok(Token {
            kind,
            line_terminator_before: saw_newline,
            position,
        })
    }

    fn read_identifier(&mut self) -> TokenKind {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if is_identifier_continue(c) {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        match s.as_str() {
            "true" => TokenKind::BooleanLiteral(true),
            "false" => TokenKind::BooleanLiteral(false),
            "null" => TokenKind::NullLiteral,
            _ => {
                if let Some(kw) = Keyword::from_str(&s) {
                    TokenKind::Keyword(kw)
                } else {
                    TokenKind::Identifier(Rc::from(s))
                }
            }
        }
    }

    fn read_number(&mut self) -> Result<TokenKind, LexError> {
        let start_pos = self.position();
        let mut s = String::new();
        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x') | Some('X')) {
            s.push(self.bump().unwrap());
            s.push(self.bump().unwrap());
            while let Some(c) = self.peek() {
                if c.is_ascii_hexdigit() {
                    s.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
            let value = i64::from_str_radix(&s[2..], 16)
                .map(|v| v as f64)
                .map_err(|_| LexError::syntax("invalid hex literal", start_pos))?;
            return Ok(TokenKind::NumericLiteral(value, false));
        }
        // Legacy octal: a leading zero followed by more digits with no `.`/`e`.
        // A SyntaxError in strict-mode code (ES5 §7.8.3), mirroring the
        // octal-escape flag already carried on string literals.
        if self.peek() == Some('0') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            let mut digits = String::new();
            self.bump();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    digits.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
            if digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
                let value = i64::from_str_radix(&digits, 8).unwrap_or(0) as f64;
                return Ok(TokenKind::NumericLiteral(value, true));
            }
            s.push('0');
            s.push_str(&digits);
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if self.peek() == Some('.') {
            s.push('.');
            self.bump();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    s.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            s.push(self.bump().unwrap());
            if matches!(self.peek(), Some('+') | Some('-')) {
                s.push(self.bump().unwrap());
            }
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    s.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
        }
        let value = fast_float::parse(&s).map_err(|_| LexError::syntax("invalid number literal", start_pos))?;
        Ok(TokenKind::NumericLiteral(value, false))
    }

    fn read_string(&mut self, quote: char) -> Result<TokenKind, LexError> {
        let start_pos = self.position();
        self.bump();
        let mut s = String::new();
        let mut has_octal_escape = false;
        loop {
            match self.peek() {
                None => return Err(LexError::syntax("unterminated string literal", start_pos)),
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some('\n') => return Err(LexError::syntax("unterminated string literal", start_pos)),
                Some('\\') => {
                    self.bump();
                    match self.peek() {
                        Some('n') => {
                            s.push('\n');
                            self.bump();
                        }
                        Some('t') => {
                            s.push('\t');
                            self.bump();
                        }
                        Some('r') => {
                            s.push('\r');
                            self.bump();
                        }
                        Some('b') => {
                            s.push('\u{8}');
                            self.bump();
                        }
                        Some('f') => {
                            s.push('\u{c}');
                            self.bump();
                        }
                        Some('v') => {
                            s.push('\u{b}');
                            self.bump();
                        }
                        Some('\n') => {
                            self.bump();
                        }
                        Some('x') => {
                            self.bump();
                            let mut hex = String::new();
                            for _ in 0..2 {
                                hex.push(self.bump().ok_or_else(|| {
                                    LexError::syntax("invalid hex escape", start_pos)
                                })?);
                            }
                            let code = u32::from_str_radix(&hex, 16)
                                .map_err(|_| LexError::syntax("invalid hex escape", start_pos))?;
                            s.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                        }
                        Some('u') => {
                            self.bump();
                            let mut hex = String::new();
                            for _ in 0..4 {
                                hex.push(self.bump().ok_or_else(|| {
                                    LexError::syntax("invalid unicode escape", start_pos)
                                })?);
                            }
                            let code = u32::from_str_radix(&hex, 16)
                                .map_err(|_| LexError::syntax("invalid unicode escape", start_pos))?;
                            s.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                        }
                        Some(c) if c.is_ascii_digit() => {
                            if c != '0' || self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
                                has_octal_escape = true;
                            }
                            let mut digits = String::new();
                            while digits.len() < 3 && self.peek().is_some_and(|c| ('0'..='7').contains(&c)) {
                                digits.push(self.bump().unwrap());
                            }
                            let code = u32::from_str_radix(&digits, 8).unwrap_or(0);
                            s.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                        }
                        Some(other) => {
                            s.push(other);
                            self.bump();
                        }
                        None => return Err(LexError::syntax("unterminated escape", start_pos)),
                    }
                }
                Some(c) => {
                    s.push(c);
                    self.bump();
                }
            }
        }
        Ok(TokenKind::StringLiteral(Rc::from(s), has_octal_escape))
    }

    fn read_regex(&mut self) -> Result<TokenKind, LexError> {
        let start_pos = self.position();
        self.bump();
        let mut pattern = String::new();
        let mut in_class = false;
        loop {
            match self.peek() {
                None => return Err(LexError::syntax("unterminated regular expression", start_pos)),
                Some('\n') => return Err(LexError::syntax("unterminated regular expression", start_pos)),
                Some('\\') => {
                    pattern.push(self.bump().unwrap());
                    if let Some(c) = self.peek() {
                        pattern.push(c);
                        self.bump();
                    }
                }
                Some('[') => {
                    in_class = true;
                    pattern.push(self.bump().unwrap());
                }
                Some(']') if in_class => {
                    in_class = false;
                    pattern.push(self.bump().unwrap());
                }
                Some('/') if !in_class => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    pattern.push(c);
                    self.bump();
                }
            }
        }
        let mut flags = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphabetic() {
                flags.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Ok(TokenKind::RegularExpressionLiteral(Rc::from(pattern), Rc::from(flags)))
    }

    fn read_punctuator(&mut self) -> Result<TokenKind, LexError> {
        let rest = &self.src[self.peeked.map(|(i, _)| i).unwrap_or(self.src.len())..];
        for p in PUNCTUATORS {
            if rest.starts_with(p) {
                for _ in 0..p.chars().count() {
                    self.bump();
                }
                return Ok(TokenKind::Punctuator(p));
            }
        }
        Err(LexError::syntax(
            "unexpected character",
            self.position(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_a_simple_assignment() {
        let ks = kinds("var x = 1;");
        assert!(matches!(ks[0], TokenKind::Keyword(Keyword::Var)));
        assert!(matches!(ks[1], TokenKind::Identifier(_)));
        assert!(matches!(ks[2], TokenKind::Punctuator("=")));
        assert!(matches!(ks[3], TokenKind::NumericLiteral(n, _) if n == 1.0));
    }

    #[test]
    fn distinguishes_division_from_regex() {
        let ks = kinds("a / b");
        assert!(matches!(ks[1], TokenKind::Punctuator("/")));
        let ks2 = kinds("return /ab/;");
        assert!(matches!(ks2[1], TokenKind::RegularExpressionLiteral(..)));
    }

    #[test]
    fn octal_escape_is_flagged() {
        let ks = kinds(r#" "\101" "#);
        assert!(matches!(ks[0], TokenKind::StringLiteral(_, true)));
    }

    #[test]
    fn line_terminator_before_is_tracked_for_asi() {
        let toks = Lexer::new("1\n2").tokenize().unwrap();
        assert!(!toks[0].line_terminator_before);
        assert!(toks[1].line_terminator_before);
    }
}
