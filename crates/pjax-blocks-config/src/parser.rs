//! Recursive-descent parser for decorator expressions.

use crate::ast::{Argument, Expr, Index};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("syntax error at offset {offset}: {message}")]
pub struct SyntaxError {
    pub offset: usize,
    pub message: String,
}

/// Deepest nesting of brackets and unary minus accepted in one expression.
const MAX_DEPTH: usize = 64;

/// Parser for the expression part of a decorator, after the `@` marker.
pub struct DecoratorParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> DecoratorParser<'a> {
    /// Parse a complete expression. Trailing input is an error.
    pub fn parse(input: &'a str) -> Result<Expr, SyntaxError> {
        let mut parser = Self { input, pos: 0, depth: 0 };
        let expr = parser.parse_expr()?;
        parser.skip_whitespace();
        if !parser.is_at_end() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(expr)
    }

    // Every nested construct re-enters here, so the bound holds for all of them.
    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("expression nested too deeply"));
        }
        self.depth += 1;
        let expr = self.parse_unary();
        self.depth -= 1;
        expr
    }

    fn parse_unary(&mut self) -> Result<Expr, SyntaxError> {
        self.skip_whitespace();
        if self.peek() == Some('-') {
            self.advance();
            let operand = self.parse_expr()?;
            return Ok(Expr::Neg(Box::new(operand)));
        }
        let mut expr = self.parse_primary()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('(') => {
                    self.advance();
                    let args = self.parse_arguments()?;
                    expr = Expr::Call { func: Box::new(expr), args };
                }
                Some('[') => {
                    self.advance();
                    let index = self.parse_index()?;
                    self.expect(']')?;
                    expr = Expr::Subscript { value: Box::new(expr), index: Box::new(index) };
                }
                Some('.') => {
                    self.advance();
                    self.skip_whitespace();
                    let attr = self.parse_identifier()?;
                    expr = Expr::Attribute { value: Box::new(expr), attr };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        match self.peek() {
            Some('\'') | Some('"') => {
                let mut value = self.parse_string()?;
                // Adjacent literals concatenate.
                loop {
                    self.skip_whitespace();
                    if !matches!(self.peek(), Some('\'') | Some('"')) {
                        break;
                    }
                    value.push_str(&self.parse_string()?);
                }
                Ok(Expr::Str(value))
            }
            Some('0'..='9') => self.parse_number(),
            Some('[') => {
                self.advance();
                let items = self.parse_sequence(']')?;
                Ok(Expr::List(items))
            }
            Some('{') => {
                self.advance();
                self.parse_dict()
            }
            Some('(') => {
                self.advance();
                let inner = self.parse_expr()?;
                self.skip_whitespace();
                self.expect(')')?;
                Ok(inner)
            }
            Some(c) if c == '_' || c.is_alphabetic() => Ok(Expr::Name(self.parse_identifier()?)),
            Some(_) => Err(self.error("expected an expression")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Argument>, SyntaxError> {
        let mut args = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(')') {
                self.advance();
                return Ok(args);
            }
            args.push(self.parse_argument()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.advance(),
                Some(')') => {
                    self.advance();
                    return Ok(args);
                }
                _ => return Err(self.error("expected ',' or ')' in argument list")),
            }
        }
    }

    fn parse_argument(&mut self) -> Result<Argument, SyntaxError> {
        if self.peek_str("**") {
            self.advance_by(2);
            return Ok(Argument::DoubleStar(self.parse_expr()?));
        }
        if self.peek() == Some('*') {
            self.advance();
            return Ok(Argument::Star(self.parse_expr()?));
        }
        if let Some(keyword) = self.peek_keyword() {
            return Ok(Argument::Keyword(keyword, self.parse_expr()?));
        }
        Ok(Argument::Positional(self.parse_expr()?))
    }

    /// Consumes `name =` if it is next (but not `name ==`).
    fn peek_keyword(&mut self) -> Option<String> {
        let start = self.pos;
        if !matches!(self.peek(), Some(c) if c == '_' || c.is_alphabetic()) {
            return None;
        }
        let name = self.parse_identifier().ok()?;
        self.skip_whitespace();
        if self.peek() == Some('=') && !self.peek_str("==") {
            self.advance();
            Some(name)
        } else {
            self.pos = start;
            None
        }
    }

    fn parse_index(&mut self) -> Result<Index, SyntaxError> {
        self.skip_whitespace();
        let lower = if self.peek() == Some(':') { None } else { Some(self.parse_expr()?) };
        self.skip_whitespace();
        if self.peek() != Some(':') {
            return lower.map(Index::Item).ok_or_else(|| self.error("empty subscript"));
        }
        self.advance();
        self.skip_whitespace();
        let upper = if self.peek() == Some(']') { None } else { Some(self.parse_expr()?) };
        self.skip_whitespace();
        Ok(Index::Slice { lower, upper })
    }

    fn parse_sequence(&mut self, close: char) -> Result<Vec<Expr>, SyntaxError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.advance();
                return Ok(items);
            }
            items.push(self.parse_expr()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.advance(),
                Some(c) if c == close => {
                    self.advance();
                    return Ok(items);
                }
                _ => return Err(self.error("expected ',' or closing bracket")),
            }
        }
    }

    fn parse_dict(&mut self) -> Result<Expr, SyntaxError> {
        let mut entries = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.advance();
                return Ok(Expr::Dict(entries));
            }
            let key = self.parse_expr()?;
            self.skip_whitespace();
            self.expect(':')?;
            let value = self.parse_expr()?;
            entries.push((key, value));
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.advance(),
                Some('}') => {
                    self.advance();
                    return Ok(Expr::Dict(entries));
                }
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn parse_identifier(&mut self) -> Result<String, SyntaxError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c == '_' || c.is_alphabetic() => self.advance(),
            _ => return Err(self.error("expected an identifier")),
        }
        while let Some(c) = self.peek() {
            if c == '_' || c.is_alphanumeric() {
                self.advance();
            } else {
                break;
            }
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_string(&mut self) -> Result<String, SyntaxError> {
        let start = self.pos;
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected a string literal")),
        };
        self.advance();
        let mut result = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.pos = start;
                    return Err(self.error("unterminated string literal"));
                }
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some(c @ ('\\' | '\'' | '"')) => c,
                        Some(c) => {
                            // Unknown escapes are kept verbatim.
                            result.push('\\');
                            c
                        }
                        None => return Err(self.error("unterminated string literal")),
                    };
                    result.push(escaped);
                    self.advance();
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }
    }

    fn parse_number(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.pos;
        while matches!(self.peek(), Some('0'..='9' | '_')) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
            while matches!(self.peek(), Some('0'..='9' | '_')) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some(c) if c.is_alphabetic()) {
            return Err(self.error("invalid number literal"));
        }
        Ok(Expr::Number(self.input[start..self.pos].to_string()))
    }

    fn error(&self, message: &str) -> SyntaxError {
        SyntaxError { offset: self.pos, message: message.to_string() }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn expect(&mut self, expected: char) -> Result<(), SyntaxError> {
        if self.peek() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{expected}'")))
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }
}
