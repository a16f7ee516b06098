//! Recursive-descent parser for match expressions.

use crate::ast::*;
use crate::error::MatchError;

pub(crate) fn parse_expr(input: &str) -> Result<Expr, MatchError> {
    let mut parser = Parser::new(input);
    parser.parse_expression()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.advance(c.len_utf8());
        }
    }

    fn error(&self, message: impl Into<String>) -> MatchError {
        MatchError::parse(self.pos, message)
    }

    fn expect_char(&mut self, expected: char) -> Result<(), MatchError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance(c.len_utf8());
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', got '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', got end of input", expected))),
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, MatchError> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(self.error("empty expression"));
        }

        let mut segments = Vec::new();

        // The first segment is written without a leading dot: `foo`, `*`,
        // `[0]`, or `..key`.
        match self.peek() {
            Some('[') => segments.push(self.parse_bracket()?),
            Some('.') => self.parse_dotted(&mut segments)?,
            Some('*') => {
                self.advance(1);
                segments.push(Segment::Wildcard);
            }
            Some(_) => {
                let name = self.parse_identifier()?;
                segments.push(Segment::Attribute(name));
            }
            None => unreachable!(),
        }

        while self.pos < self.input.len() {
            if self.remaining().trim().is_empty() {
                self.pos = self.input.len();
                break;
            }
            match self.peek() {
                Some('.') => self.parse_dotted(&mut segments)?,
                Some('[') => segments.push(self.parse_bracket()?),
                Some(c) => return Err(self.error(format!("unexpected character '{}'", c))),
                None => break,
            }
        }

        Ok(Expr::new(segments))
    }

    /// Parse a `.`-introduced segment: `.key`, `.*`, `..`, `..key`, `..[...]`.
    fn parse_dotted(&mut self, segments: &mut Vec<Segment>) -> Result<(), MatchError> {
        self.advance(1);
        if self.peek() == Some('.') {
            self.advance(1);
            segments.push(Segment::Recursive);
            // `..` may stand alone or be followed by a key, wildcard, or
            // bracket; brackets are picked up by the main loop.
            match self.peek() {
                Some('*') => {
                    self.advance(1);
                    segments.push(Segment::Wildcard);
                }
                Some(c) if is_ident_start(c) => {
                    let name = self.parse_identifier()?;
                    segments.push(Segment::Attribute(name));
                }
                _ => {}
            }
            return Ok(());
        }
        if self.peek() == Some('*') {
            self.advance(1);
            segments.push(Segment::Wildcard);
            return Ok(());
        }
        let name = self.parse_identifier()?;
        segments.push(Segment::Attribute(name));
        Ok(())
    }

    fn parse_identifier(&mut self) -> Result<String, MatchError> {
        match self.peek() {
            Some(c) if is_ident_start(c) => {}
            _ => return Err(self.error("expected identifier")),
        }
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            self.advance(c.len_utf8());
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_bracket(&mut self) -> Result<Segment, MatchError> {
        self.expect_char('[')?;
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_selector()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.advance(1);
                }
                Some(']') => {
                    self.advance(1);
                    break;
                }
                Some(c) => {
                    return Err(self.error(format!("expected ',' or ']', got '{}'", c)));
                }
                None => return Err(self.error("expected ']', got end of input")),
            }
        }
        Ok(Segment::Bracket(selectors))
    }

    fn parse_selector(&mut self) -> Result<Selector, MatchError> {
        match self.peek() {
            Some('*') => {
                self.advance(1);
                Ok(Selector::Wildcard)
            }
            Some('\'') | Some('"') => {
                let name = self.parse_quoted_string()?;
                Ok(Selector::Attribute(name))
            }
            Some(':') => {
                self.advance(1);
                self.skip_whitespace();
                let end = self.parse_optional_integer();
                Ok(Selector::Slice { start: None, end })
            }
            Some(c) if c == '-' || c.is_ascii_digit() => {
                let first = self
                    .parse_optional_integer()
                    .ok_or_else(|| self.error("expected number"))?;
                self.skip_whitespace();
                if self.peek() == Some(':') {
                    self.advance(1);
                    self.skip_whitespace();
                    let end = self.parse_optional_integer();
                    Ok(Selector::Slice {
                        start: Some(first),
                        end,
                    })
                } else {
                    Ok(Selector::Index(first))
                }
            }
            Some(c) if is_ident_start(c) => self.parse_field_selector(),
            Some(c) => Err(self.error(format!("expected selector, got '{}'", c))),
            None => Err(self.error("expected selector, got end of input")),
        }
    }

    /// A selector starting with an identifier: a bare attribute, an
    /// existence filter (`key?`), or a comparison filter (`key == 1`).
    fn parse_field_selector(&mut self) -> Result<Selector, MatchError> {
        let mut fields = vec![self.parse_identifier()?];
        while self.peek() == Some('.') {
            self.advance(1);
            fields.push(self.parse_identifier()?);
        }
        self.skip_whitespace();

        if self.peek() == Some('?') {
            self.advance(1);
            return Ok(Selector::Exists(FieldPath { fields }));
        }

        if let Some(op) = self.try_parse_compare_op() {
            self.skip_whitespace();
            let literal = self.parse_literal()?;
            return Ok(Selector::Compare {
                path: FieldPath { fields },
                op,
                literal,
            });
        }

        if fields.len() == 1 {
            let name = fields.pop().unwrap_or_default();
            Ok(Selector::Attribute(name))
        } else {
            Err(self.error("expected comparison operator"))
        }
    }

    fn try_parse_compare_op(&mut self) -> Option<CompareOp> {
        let rem = self.remaining();
        if rem.starts_with("==") {
            self.advance(2);
            Some(CompareOp::Eq)
        } else if rem.starts_with("!=") {
            self.advance(2);
            Some(CompareOp::Ne)
        } else if rem.starts_with("<=") {
            self.advance(2);
            Some(CompareOp::Le)
        } else if rem.starts_with(">=") {
            self.advance(2);
            Some(CompareOp::Ge)
        } else if rem.starts_with('<') {
            self.advance(1);
            Some(CompareOp::Lt)
        } else if rem.starts_with('>') {
            self.advance(1);
            Some(CompareOp::Gt)
        } else {
            None
        }
    }

    fn parse_optional_integer(&mut self) -> Option<i64> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance(1);
        }
        let digits_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(1);
        }
        if self.pos == digits_start {
            self.pos = start;
            return None;
        }
        self.input[start..self.pos].parse().ok()
    }

    fn parse_quoted_string(&mut self) -> Result<String, MatchError> {
        let quote = match self.peek() {
            Some(c @ ('\'' | '"')) => c,
            _ => return Err(self.error("expected quoted string")),
        };
        self.advance(1);
        let mut out = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.advance(1);
                    return Ok(out);
                }
                Some('\\') => {
                    self.advance(1);
                    match self.peek() {
                        Some(escaped) => {
                            out.push(escaped);
                            self.advance(escaped.len_utf8());
                        }
                        None => return Err(self.error("unterminated string")),
                    }
                }
                Some(c) => {
                    out.push(c);
                    self.advance(c.len_utf8());
                }
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_literal(&mut self) -> Result<Literal, MatchError> {
        match self.peek() {
            Some('\'') | Some('"') => Ok(Literal::String(self.parse_quoted_string()?)),
            Some('t') if self.remaining().starts_with("true") => {
                self.advance(4);
                Ok(Literal::Bool(true))
            }
            Some('f') if self.remaining().starts_with("false") => {
                self.advance(5);
                Ok(Literal::Bool(false))
            }
            Some('n') if self.remaining().starts_with("null") => {
                self.advance(4);
                Ok(Literal::Null)
            }
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number_literal(),
            _ => Err(self.error("expected literal value")),
        }
    }

    fn parse_number_literal(&mut self) -> Result<Literal, MatchError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance(1);
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(1);
        }
        if self.peek() == Some('.') {
            self.advance(1);
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance(1);
            }
            let value: f64 = self.input[start..self.pos]
                .parse()
                .map_err(|_| self.error("invalid number"))?;
            Ok(Literal::Float(value))
        } else {
            let value: i64 = self.input[start..self.pos]
                .parse()
                .map_err(|_| self.error("invalid integer"))?;
            Ok(Literal::Int(value))
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}
