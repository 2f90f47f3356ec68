//! Python-style literal expressions.
//!
//! Registries written by earlier tooling store nested values as Python
//! dict reprs (`{'host': 'localhost', 'port': 5432}`), so the reader needs
//! the literal subset those reprs use, and the writer emits the same form.

use std::fmt::Write;

use crate::core::value::{Mapping, SecretValue};

/// Nesting limit for containers; deeper input is rejected.
const MAX_DEPTH: usize = 128;

#[derive(Debug)]
pub(super) struct SyntaxError {
    pub(super) offset: usize,
    pub(super) reason: &'static str,
}

type ParseResult<T> = std::result::Result<T, SyntaxError>;

/// Parse a complete literal expression.
pub(super) fn parse(input: &str) -> ParseResult<SecretValue> {
    let mut parser = Parser {
        src: input,
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos != input.len() {
        return Err(parser.error("trailing characters"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, reason: &'static str) -> SyntaxError {
        SyntaxError {
            offset: self.pos,
            reason,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char, reason: &'static str) -> ParseResult<()> {
        self.skip_ws();
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(reason))
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn value(&mut self) -> ParseResult<SecretValue> {
        self.skip_ws();
        match self.peek() {
            Some('{') => self.nested(Self::dict),
            Some('[') => self.nested(Self::list),
            Some('(') => self.nested(Self::tuple),
            Some('\'' | '"') => self.strings().map(SecretValue::Text),
            Some(c) if c.is_ascii_digit() || matches!(c, '.' | '-' | '+') => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.name(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn nested(&mut self, f: fn(&mut Self) -> ParseResult<SecretValue>) -> ParseResult<SecretValue> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn dict(&mut self) -> ParseResult<SecretValue> {
        self.bump();
        let mut mapping = Mapping::new();
        self.skip_ws();
        if self.eat('}') {
            return Ok(SecretValue::Mapping(mapping));
        }
        loop {
            let key = self.value()?;
            let key = self.key_text(key)?;
            self.expect(':', "expected ':' after dict key")?;
            let value = self.value()?;
            mapping.insert(key, value);

            self.skip_ws();
            if self.eat(',') {
                self.skip_ws();
                if self.eat('}') {
                    break;
                }
                continue;
            }
            self.expect('}', "expected ',' or '}'")?;
            break;
        }
        Ok(SecretValue::Mapping(mapping))
    }

    fn key_text(&self, key: SecretValue) -> ParseResult<String> {
        match key {
            SecretValue::Text(s) => Ok(s),
            SecretValue::List(_) | SecretValue::Mapping(_) => {
                Err(self.error("unhashable dict key"))
            }
            scalar => Ok(super::encode(&scalar)),
        }
    }

    fn list(&mut self) -> ParseResult<SecretValue> {
        self.bump();
        self.sequence(']').map(SecretValue::List)
    }

    fn tuple(&mut self) -> ParseResult<SecretValue> {
        self.bump();
        self.skip_ws();
        if self.eat(')') {
            return Ok(SecretValue::List(Vec::new()));
        }
        let first = self.value()?;
        self.skip_ws();
        // `(x)` is just a parenthesised value
        if self.eat(')') {
            return Ok(first);
        }
        self.expect(',', "expected ',' or ')'")?;
        let mut items = vec![first];
        items.extend(self.sequence(')')?);
        Ok(SecretValue::List(items))
    }

    /// Comma-separated values up to `close`, trailing comma allowed.
    fn sequence(&mut self, close: char) -> ParseResult<Vec<SecretValue>> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            if self.eat(close) {
                return Ok(items);
            }
            return Err(self.error("expected ',' or closing bracket"));
        }
    }

    /// One or more adjacent string literals, concatenated.
    fn strings(&mut self) -> ParseResult<String> {
        let mut out = self.string()?;
        loop {
            let save = self.pos;
            self.skip_ws();
            if matches!(self.peek(), Some('\'' | '"')) {
                out.push_str(&self.string()?);
            } else {
                self.pos = save;
                return Ok(out);
            }
        }
    }

    fn string(&mut self) -> ParseResult<String> {
        let quote = self.bump().ok_or_else(|| self.error("expected string"))?;
        let triple = self.peek() == Some(quote) && self.peek_nth(1) == Some(quote);
        if triple {
            self.bump();
            self.bump();
        }

        let mut out = String::new();
        loop {
            let c = self
                .bump()
                .ok_or_else(|| self.error("unterminated string"))?;
            match c {
                '\\' => self.escape(&mut out)?,
                c if c == quote && !triple => return Ok(out),
                c if c == quote
                    && self.peek() == Some(quote)
                    && self.peek_nth(1) == Some(quote) =>
                {
                    self.bump();
                    self.bump();
                    return Ok(out);
                }
                '\n' if !triple => return Err(self.error("newline in string")),
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> ParseResult<()> {
        let c = self
            .bump()
            .ok_or_else(|| self.error("unterminated escape"))?;
        match c {
            '\n' => {}
            '\\' | '\'' | '"' => out.push(c),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                out.push(self.code_point(code)?);
            }
            'x' => {
                let code = self.hex_digits(2)?;
                out.push(self.code_point(code)?);
            }
            'u' => {
                let code = self.hex_digits(4)?;
                out.push(self.code_point(code)?);
            }
            'U' => {
                let code = self.hex_digits(8)?;
                out.push(self.code_point(code)?);
            }
            other => {
                // unknown escapes are kept verbatim
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_digits(&mut self, count: usize) -> ParseResult<u32> {
        let mut code = 0u32;
        for _ in 0..count {
            let digit = self
                .bump()
                .and_then(|d| d.to_digit(16))
                .ok_or_else(|| self.error("truncated hex escape"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn code_point(&self, code: u32) -> ParseResult<char> {
        char::from_u32(code).ok_or_else(|| self.error("invalid code point"))
    }

    fn number(&mut self) -> ParseResult<SecretValue> {
        // a single unary sign, as in `-5` or `+ 1.5`
        let negative = match self.peek() {
            Some(sign @ ('-' | '+')) => {
                self.bump();
                self.skip_ws();
                sign == '-'
            }
            _ => false,
        };
        let sign = if negative { "-" } else { "" };
        let start = self.pos;

        if self.peek() == Some('0') {
            let radix = match self.peek_nth(1) {
                Some('x' | 'X') => Some(16),
                Some('o' | 'O') => Some(8),
                Some('b' | 'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.bump();
                self.bump();
                let digits = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let digits: String = digits.chars().filter(|&c| c != '_').collect();
                return i64::from_str_radix(&format!("{}{}", sign, digits), radix)
                    .map(SecretValue::Integer)
                    .map_err(|_| self.error("invalid integer literal"));
            }
        }

        let int_part = self.take_while(|c| c.is_ascii_digit() || c == '_').len();
        let mut is_float = false;
        let mut frac_part = 0;
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            frac_part = self.take_while(|c| c.is_ascii_digit() || c == '_').len();
        }
        if int_part == 0 && frac_part == 0 {
            return Err(self.error("expected digits"));
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('-' | '+')) {
                self.bump();
            }
            if self.take_while(|c| c.is_ascii_digit() || c == '_').is_empty() {
                return Err(self.error("expected exponent digits"));
            }
        }
        if matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            return Err(self.error("invalid number suffix"));
        }

        let digits: String = self.src[start..self.pos]
            .chars()
            .filter(|&c| c != '_')
            .collect();

        if is_float {
            return format!("{}{}", sign, digits)
                .parse::<f64>()
                .map(SecretValue::Float)
                .map_err(|_| self.error("invalid float literal"));
        }

        if digits.len() > 1 && digits.starts_with('0') && digits.chars().any(|c| c != '0') {
            return Err(self.error("leading zeros in integer literal"));
        }
        format!("{}{}", sign, digits)
            .parse::<i64>()
            .map(SecretValue::Integer)
            .map_err(|_| self.error("integer out of range"))
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn name(&mut self) -> ParseResult<SecretValue> {
        let start = self.pos;
        let name = self.take_while(|c| c.is_alphanumeric() || c == '_');
        match name {
            "True" => Ok(SecretValue::Bool(true)),
            "False" => Ok(SecretValue::Bool(false)),
            "None" => Ok(SecretValue::Null),
            _ => Err(SyntaxError {
                offset: start,
                reason: "unknown name",
            }),
        }
    }
}

/// Append the literal form of `value` as it appears inside a container.
pub(super) fn write_repr(out: &mut String, value: &SecretValue) {
    match value {
        SecretValue::Text(s) => write_str(out, s),
        SecretValue::Integer(i) => {
            let _ = write!(out, "{}", i);
        }
        SecretValue::Float(f) => out.push_str(&super::float_repr(*f)),
        SecretValue::Bool(true) => out.push_str("True"),
        SecretValue::Bool(false) => out.push_str("False"),
        SecretValue::Null => out.push_str("None"),
        SecretValue::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(out, item);
            }
            out.push(']');
        }
        SecretValue::Mapping(mapping) => {
            out.push('{');
            for (i, (key, item)) in mapping.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_str(out, key);
                out.push_str(": ");
                write_repr(out, item);
            }
            out.push('}');
        }
    }
}

/// Quote and escape a string the way Python's `repr` does.
fn write_str(out: &mut String, s: &str) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}
