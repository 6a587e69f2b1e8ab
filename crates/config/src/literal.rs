//! Best-effort coercion of raw environment values
//!
//! Values that read as a structured literal (`true`, `42`, `null`,
//! `[1,2,3]`, `{"a":1}`, `"quoted"`) become the matching JSON value.
//! Anything else is kept as the raw string. Coercion never fails.

use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::debug;

/// Nesting limit for arrays and objects inside a single literal
const MAX_DEPTH: usize = 128;

/// Why a raw value was not a literal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected} at offset {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub expected: &'static str,
}

/// Coerce a raw string into a richer value, falling back to the string itself.
pub fn coerce(raw: &str) -> Value {
    match parse_literal(raw) {
        Ok(value) => value,
        Err(err) => {
            debug!("Keeping raw string value ({})", err);
            Value::String(raw.to_string())
        }
    }
}

/// Parse `input` as a single literal surrounded by optional whitespace.
pub fn parse_literal(input: &str) -> Result<Value, LiteralError> {
    let mut parser = LiteralParser { src: input, pos: 0 };
    parser.skip_whitespace();
    let value = parser.value(0)?;
    parser.skip_whitespace();
    if parser.pos != input.len() {
        return parser.fail("end of input");
    }
    Ok(value)
}

struct LiteralParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn fail<T>(&self, expected: &'static str) -> Result<T, LiteralError> {
        Err(LiteralError {
            offset: self.pos,
            expected,
        })
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if depth > MAX_DEPTH {
            return self.fail("shallower nesting");
        }

        match self.peek() {
            Some(b'n') => self.keyword("null", Value::Null),
            Some(b't') => self.keyword("true", Value::Bool(true)),
            Some(b'f') => self.keyword("false", Value::Bool(false)),
            Some(b'"') => self.string().map(Value::String),
            Some(b'[') => self.array(depth),
            Some(b'{') => self.object(depth),
            Some(b'-' | b'0'..=b'9') => self.number(),
            _ => self.fail("a literal"),
        }
    }

    fn keyword(&mut self, word: &'static str, value: Value) -> Result<Value, LiteralError> {
        if self.src[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(value)
        } else {
            self.fail(word)
        }
    }

    fn array(&mut self, depth: usize) -> Result<Value, LiteralError> {
        self.pos += 1;
        let mut items = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::Array(items));
        }

        loop {
            self.skip_whitespace();
            items.push(self.value(depth + 1)?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                _ => return self.fail("',' or ']'"),
            }
        }
    }

    fn object(&mut self, depth: usize) -> Result<Value, LiteralError> {
        self.pos += 1;
        let mut map = Map::new();

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Object(map));
        }

        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return self.fail("a quoted key");
            }
            let key = self.string()?;

            self.skip_whitespace();
            if self.peek() != Some(b':') {
                return self.fail("':'");
            }
            self.pos += 1;

            self.skip_whitespace();
            let value = self.value(depth + 1)?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                _ => return self.fail("',' or '}'"),
            }
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }

        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => {
                self.digits();
            }
            _ => return self.fail("a digit"),
        }

        let mut integral = true;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if self.digits() == 0 {
                return self.fail("a fraction digit");
            }
            integral = false;
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                return self.fail("an exponent digit");
            }
            integral = false;
        }

        let src = self.src;
        let text = &src[start..self.pos];
        if integral {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Number(n.into()));
            }
            if let Ok(n) = text.parse::<u64>() {
                return Ok(Value::Number(n.into()));
            }
        }

        match text.parse::<f64>().ok().and_then(Number::from_f64) {
            Some(n) => Ok(Value::Number(n)),
            None => Err(LiteralError {
                offset: start,
                expected: "a finite number",
            }),
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        self.pos += 1;
        let mut out = String::new();

        loop {
            let Some(c) = self.src[self.pos..].chars().next() else {
                return self.fail("a closing quote");
            };
            match c {
                '"' => {
                    self.pos += 1;
                    return Ok(out);
                }
                '\\' => {
                    self.pos += 1;
                    out.push(self.escape()?);
                }
                c if (c as u32) < 0x20 => return self.fail("an escaped control character"),
                c => {
                    out.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
    }

    fn escape(&mut self) -> Result<char, LiteralError> {
        let c = match self.peek() {
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'b') => '\u{8}',
            Some(b'f') => '\u{c}',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(b'u') => {
                self.pos += 1;
                return self.unicode_escape();
            }
            _ => return self.fail("an escape sequence"),
        };
        self.pos += 1;
        Ok(c)
    }

    fn unicode_escape(&mut self) -> Result<char, LiteralError> {
        let high = self.hex4()?;
        let code = if (0xD800..0xDC00).contains(&high) {
            if !self.src[self.pos..].starts_with("\\u") {
                return self.fail("a low surrogate");
            }
            self.pos += 2;
            let low = self.hex4()?;
            if !(0xDC00..0xE000).contains(&low) {
                return self.fail("a low surrogate");
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };

        match char::from_u32(code) {
            Some(c) => Ok(c),
            None => self.fail("a unicode scalar value"),
        }
    }

    fn hex4(&mut self) -> Result<u32, LiteralError> {
        let src = self.src;
        let digits = match src.get(self.pos..self.pos + 4) {
            Some(d) if d.bytes().all(|b| b.is_ascii_hexdigit()) => d,
            _ => return self.fail("four hex digits"),
        };
        self.pos += 4;
        u32::from_str_radix(digits, 16).or_else(|_| self.fail("four hex digits"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_scalars() {
        assert_eq!(coerce("true"), json!(true));
        assert_eq!(coerce("false"), json!(false));
        assert_eq!(coerce("null"), Value::Null);
        assert_eq!(coerce("42"), json!(42));
        assert_eq!(coerce("-7"), json!(-7));
        assert_eq!(coerce("3.5"), json!(3.5));
        assert_eq!(coerce("1e3"), json!(1000.0));
        assert_eq!(coerce(" 42 "), json!(42));
    }

    #[test]
    fn test_coerce_structures() {
        assert_eq!(coerce("[1,2]"), json!([1, 2]));
        assert_eq!(coerce(r#"{"a":1}"#), json!({ "a": 1 }));
        assert_eq!(
            coerce(r#"{ "hosts": ["a", "b"], "tls": { "on": true } }"#),
            json!({ "hosts": ["a", "b"], "tls": { "on": true } })
        );
        assert_eq!(coerce("[]"), json!([]));
        assert_eq!(coerce("{}"), json!({}));
    }

    #[test]
    fn test_coerce_quoted_strings() {
        assert_eq!(coerce(r#""quoted""#), json!("quoted"));
        assert_eq!(coerce(r#""a\"b\\c\n""#), json!("a\"b\\c\n"));
        assert_eq!(coerce(r#""é😀""#), json!("é😀"));
    }

    #[test]
    fn test_coerce_falls_back_to_raw_string() {
        for raw in [
            "plain",
            "some/plain/string",
            "",
            "42abc",
            "True",
            "01",
            "1.",
            "[1,2",
            "{a:1}",
            "'single'",
            r#""\ud800""#,
            "1e999",
            "postgres://user:pw@host/db",
        ] {
            assert_eq!(coerce(raw), json!(raw), "raw value {raw:?}");
        }
    }

    #[test]
    fn test_large_integers() {
        assert_eq!(coerce("18446744073709551615"), json!(u64::MAX));
        assert_eq!(coerce("18446744073709551616"), json!(18446744073709551616.0));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 2), "]".repeat(MAX_DEPTH + 2));
        assert_eq!(coerce(&deep), Value::String(deep.clone()));

        let shallow = format!("{}{}", "[".repeat(8), "]".repeat(8));
        assert!(coerce(&shallow).is_array());
    }

    #[test]
    fn test_parse_literal_reports_offset() {
        let err = parse_literal("[1,]").unwrap_err();
        assert_eq!(err.offset, 3);
    }
}
