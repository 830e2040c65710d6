//! A parser for the JavaScript literal subset the kanji module is written in.
//!
//! Accepts `const <ident> [: <type>] = <value>[;]` where the value is built from arrays, objects,
//! strings, numbers, `true`, `false`, `null` and `undefined`. Values are produced as
//! [`serde_json::Value`] so they can be deserialized into typed records afterwards.
//! Nothing is ever evaluated: any other identifier is reported as unresolved.

use crate::error::DecodeError;
use serde_json::{Map, Number, Value};

/// A parsed `const` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub identifier: String,
    pub value: Value,
}

/// Parses a single declaration, which must make up the whole of `src` apart from whitespace,
/// comments and a trailing semicolon.
pub fn parse_declaration(src: &str) -> Result<Declaration, DecodeError> {
    let mut parser = Parser::new(src);
    parser.skip_trivia()?;
    parser.keyword("const")?;
    parser.skip_trivia()?;
    let identifier = parser.identifier()?.to_string();
    parser.skip_trivia()?;
    if parser.eat(b':') {
        parser.skip_type()?;
    }
    parser.expect(b'=')?;
    parser.skip_trivia()?;
    let value = parser.value()?;
    parser.skip_trivia()?;
    parser.eat(b';');
    parser.skip_trivia()?;
    parser.end()?;
    Ok(Declaration { identifier, value })
}

/// Parses a single literal value.
#[cfg(test)]
pub(crate) fn parse_value(src: &str) -> Result<Value, DecodeError> {
    let mut parser = Parser::new(src);
    parser.skip_trivia()?;
    let value = parser.value()?;
    parser.skip_trivia()?;
    parser.end()?;
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> Result<(), DecodeError> {
        if self.eat(b) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{}`", b as char)))
        }
    }

    fn end(&self) -> Result<(), DecodeError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.unexpected("end of input")),
        }
    }

    fn keyword(&mut self, keyword: &str) -> Result<(), DecodeError> {
        let start = self.pos;
        let identifier = self.identifier()?;
        if identifier == keyword {
            Ok(())
        } else {
            self.pos = start;
            Err(self.unexpected(&format!("`{keyword}`")))
        }
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), DecodeError> {
        let src = self.src;
        loop {
            let rest = &src[self.pos..];
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();
            if trimmed.starts_with("//") {
                self.pos += trimmed.find('\n').unwrap_or(trimmed.len());
            } else if trimmed.starts_with("/*") {
                let Some(len) = trimmed[2..].find("*/") else {
                    return Err(self.error("unterminated comment"));
                };
                self.pos += len + 4;
            } else {
                return Ok(());
            }
        }
    }

    // a type annotation runs up to the `=` of the declaration
    fn skip_type(&mut self) -> Result<(), DecodeError> {
        match self.src[self.pos..].find('=') {
            Some(len) => {
                self.pos += len;
                Ok(())
            }
            None => Err(self.error("unterminated type annotation")),
        }
    }

    fn identifier(&mut self) -> Result<&'a str, DecodeError> {
        let src = self.src;
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            let valid = if self.pos == start {
                is_identifier_start(c)
            } else {
                is_identifier_continue(c)
            };
            if !valid {
                break;
            }
            self.pos += c.len_utf8();
        }
        if self.pos == start {
            return Err(self.unexpected("an identifier"));
        }
        Ok(&src[start..self.pos])
    }

    fn value(&mut self) -> Result<Value, DecodeError> {
        match self.peek_char() {
            Some('[') => self.array(),
            Some('{') => self.object(),
            Some(q @ ('\'' | '"')) => self.string(q).map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => {
                self.number().map(Value::Number)
            }
            Some(c) if is_identifier_start(c) => {
                let start = self.pos;
                match self.identifier()? {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" | "undefined" => Ok(Value::Null),
                    name => {
                        let (line, column) = self.location_at(start);
                        Err(DecodeError::UnresolvedIdentifier {
                            name: name.to_string(),
                            line,
                            column,
                        })
                    }
                }
            }
            _ => Err(self.unexpected("a value")),
        }
    }

    fn array(&mut self) -> Result<Value, DecodeError> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.eat(b']') {
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_trivia()?;
            if !self.eat(b',') {
                self.expect(b']')?;
                return Ok(Value::Array(items));
            }
        }
    }

    fn object(&mut self) -> Result<Value, DecodeError> {
        self.expect(b'{')?;
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            if self.eat(b'}') {
                return Ok(Value::Object(map));
            }
            let key = self.key()?;
            self.skip_trivia()?;
            self.expect(b':')?;
            self.skip_trivia()?;
            let value = self.value()?;
            map.insert(key, value);
            self.skip_trivia()?;
            if !self.eat(b',') {
                self.expect(b'}')?;
                return Ok(Value::Object(map));
            }
        }
    }

    fn key(&mut self) -> Result<String, DecodeError> {
        match self.peek_char() {
            Some(q @ ('\'' | '"')) => self.string(q),
            Some(c) if c.is_ascii_digit() => self.number().map(|n| n.to_string()),
            Some(c) if is_identifier_start(c) => self.identifier().map(str::to_string),
            _ => Err(self.unexpected("a property name")),
        }
    }

    fn string(&mut self, quote: char) -> Result<String, DecodeError> {
        let start = self.pos;
        self.pos += quote.len_utf8();
        let mut s = String::new();
        loop {
            let Some(c) = self.bump_char() else {
                return Err(self.error_at(start, "unterminated string"));
            };
            match c {
                c if c == quote => return Ok(s),
                '\n' => return Err(self.error("line break in string")),
                '\\' => self.escape(&mut s)?,
                c => s.push(c),
            }
        }
    }

    fn escape(&mut self, s: &mut String) -> Result<(), DecodeError> {
        let Some(c) = self.bump_char() else {
            return Err(self.error("unterminated escape"));
        };
        match c {
            'n' => s.push('\n'),
            'r' => s.push('\r'),
            't' => s.push('\t'),
            'b' => s.push('\u{8}'),
            'f' => s.push('\u{c}'),
            'v' => s.push('\u{b}'),
            '0' if !self.peek().is_some_and(|b| b.is_ascii_digit()) => s.push('\0'),
            'x' => {
                let c = self.hex_char(2)?;
                s.push(c);
            }
            'u' => {
                let c = self.unicode_escape()?;
                s.push(c);
            }
            // line continuation
            '\n' => {}
            '\r' => {
                self.eat(b'\n');
            }
            '\u{2028}' | '\u{2029}' => {}
            c if c.is_ascii_digit() => return Err(self.error("octal escapes are not supported")),
            c => s.push(c),
        }
        Ok(())
    }

    fn unicode_escape(&mut self) -> Result<char, DecodeError> {
        let src = self.src;
        if self.eat(b'{') {
            let start = self.pos;
            while self.peek().is_some_and(|b| b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            let digits = &src[start..self.pos];
            self.expect(b'}')?;
            return u32::from_str_radix(digits, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| self.error("invalid unicode escape"));
        }

        let high = self.hex_unit(4)?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high).ok_or_else(|| self.error("unpaired surrogate"));
        }
        // a high surrogate has to be followed by an escaped low surrogate
        if !src[self.pos..].starts_with("\\u") {
            return Err(self.error("unpaired surrogate"));
        }
        self.pos += 2;
        let low = self.hex_unit(4)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(self.error("unpaired surrogate"));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code).ok_or_else(|| self.error("invalid unicode escape"))
    }

    fn hex_char(&mut self, len: usize) -> Result<char, DecodeError> {
        let unit = self.hex_unit(len)?;
        char::from_u32(unit).ok_or_else(|| self.error("invalid escape"))
    }

    fn hex_unit(&mut self, len: usize) -> Result<u32, DecodeError> {
        let src = self.src;
        let digits = src
            .get(self.pos..self.pos + len)
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("invalid hexadecimal escape"))?;
        self.pos += len;
        u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid hexadecimal escape"))
    }

    fn number(&mut self) -> Result<Number, DecodeError> {
        let start = self.pos;
        let negative = self.eat(b'-');
        if !negative {
            self.eat(b'+');
        }
        let digits_start = self.pos;
        self.digits();
        let mut integer = self.pos > digits_start;
        if self.eat(b'.') {
            integer = false;
            self.digits();
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            integer = false;
            self.pos += 1;
            if !self.eat(b'-') {
                self.eat(b'+');
            }
            self.digits();
        }

        let text = self.src[start..self.pos].trim_start_matches('+').replace('_', "");
        let invalid = || {
            let message = format!("invalid number `{}`", &self.src[start..self.pos]);
            self.error_at(start, &message)
        };
        if integer {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Number::from(n));
            }
            if let Ok(n) = text.parse::<u64>() {
                return Ok(Number::from(n));
            }
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .ok_or_else(invalid)
    }

    fn digits(&mut self) {
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_digit() || b == b'_')
        {
            self.pos += 1;
        }
    }

    // 1-based line and column of `pos`, only computed when reporting an error
    fn location_at(&self, pos: usize) -> (usize, usize) {
        let before = &self.src[..pos];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }

    fn error(&self, message: &str) -> DecodeError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: &str) -> DecodeError {
        let (line, column) = self.location_at(pos);
        DecodeError::Syntax {
            line,
            column,
            message: message.to_string(),
        }
    }

    fn unexpected(&self, expected: &str) -> DecodeError {
        let found = match self.peek_char() {
            Some(c) => format!("`{c}`"),
            None => "end of input".to_string(),
        };
        self.error(&format!("expected {expected}, found {found}"))
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_identifier_continue(c: char) -> bool {
    is_identifier_start(c) || c.is_alphanumeric()
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use std::{
        fmt::Write,
        time::{Duration, Instant},
    };

    fn grade_span(records: usize) -> String {
        let mut span = "const juniorHighKanji = [\n".to_string();
        for i in 0..records {
            writeln!(
                span,
                "  {{ character: '字', meanings: ['letter {i}', 'character'], onyomi: ['JI'], kunyomi: ['aza'], examples: [{{ word: '文字', reading: 'もじ', meaning: 'letter' }}], strokeCount: 6, frequency: {i} }},"
            )
            .unwrap();
        }
        span.push_str("];");
        span
    }

    // best of a few runs to keep scheduler noise out of the comparison
    fn decode_time(span: &str, records: usize) -> Duration {
        (0..3)
            .map(|_| {
                let start = Instant::now();
                let decl = parse_declaration(span).unwrap();
                let elapsed = start.elapsed();
                assert_eq!(decl.value.as_array().unwrap().len(), records);
                elapsed
            })
            .min()
            .unwrap()
    }

    #[test]
    fn parses_declaration() {
        let decl = parse_declaration(
            "const grade1Kanji = [\n  { character: '一', strokeCount: 1, jlptLevel: 'N5' },\n];",
        )
        .unwrap();
        assert_eq!(decl.identifier, "grade1Kanji");
        assert_eq!(
            decl.value,
            json!([{ "character": "一", "strokeCount": 1, "jlptLevel": "N5" }])
        );
    }

    #[test]
    fn skips_type_annotation() {
        let decl = parse_declaration("const a: Array<string> = ['x']").unwrap();
        assert_eq!(decl.identifier, "a");
        assert_eq!(decl.value, json!(["x"]));
    }

    #[test]
    fn parses_strings() {
        assert_eq!(parse_value(r#"'it\'s'"#).unwrap(), json!("it's"));
        assert_eq!(parse_value(r#""say \"hi\"""#).unwrap(), json!("say \"hi\""));
        assert_eq!(parse_value(r#"'a\\b'"#).unwrap(), json!("a\\b"));
        assert_eq!(parse_value(r#"'\n\r\t'"#).unwrap(), json!("\n\r\t"));
        assert_eq!(parse_value(r#"'一\u{4E8C}\x41'"#).unwrap(), json!("一二A"));
        assert_eq!(parse_value(r#"'𠮷'"#).unwrap(), json!("𠮷"));
        assert_eq!(parse_value("'a\\\nb'").unwrap(), json!("ab"));
        assert_eq!(parse_value(r#""[']""#).unwrap(), json!("[']"));
    }

    #[test]
    fn parses_numbers() {
        assert_eq!(parse_value("12").unwrap(), json!(12));
        assert_eq!(parse_value("-3").unwrap(), json!(-3));
        assert_eq!(parse_value("1.5").unwrap(), json!(1.5));
        assert_eq!(parse_value("2e3").unwrap(), json!(2000.0));
        assert_eq!(parse_value("1_000").unwrap(), json!(1000));
    }

    #[test]
    fn parses_keywords() {
        assert_eq!(
            parse_value("[true, false, null, undefined]").unwrap(),
            json!([true, false, null, null])
        );
    }

    #[test]
    fn accepts_trailing_commas_and_comments() {
        let value = parse_value(
            "[ // first\n { 'quoted': 1, \"double\": 2, 3: 'three', /* note */ plain: [4,], }, ]",
        )
        .unwrap();
        assert_eq!(
            value,
            json!([{ "quoted": 1, "double": 2, "3": "three", "plain": [4] }])
        );
    }

    #[test]
    fn rejects_unknown_identifiers() {
        let err = parse_value("[\n  { kanji: grade1Kanji }]").unwrap_err();
        match err {
            DecodeError::UnresolvedIdentifier { name, line, column } => {
                assert_eq!(name, "grade1Kanji");
                assert_eq!((line, column), (2, 12));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_comma() {
        let err = parse_value("[1 2]").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax { line: 1, column: 4, .. }));
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = parse_value("['abc]").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax { line: 1, column: 2, .. }));
    }

    #[test]
    fn decoding_time_grows_linearly() {
        let small = decode_time(&grade_span(1134), 1134);
        let large = decode_time(&grade_span(1134 * 8), 1134 * 8);
        // eight times the input, quadratic decoding would take about 64 times as long
        assert!(
            large <= small * 24 + Duration::from_millis(250),
            "{small:?} for 1134 records, {large:?} for 9072 records"
        );
    }

    #[test]
    fn reports_location_of_late_errors() {
        let mut span = grade_span(50);
        span.insert_str(span.len() - 2, "  { character: broken },\n");
        let err = parse_declaration(&span).unwrap_err();
        match err {
            DecodeError::UnresolvedIdentifier { name, line, column } => {
                assert_eq!(name, "broken");
                assert_eq!((line, column), (52, 16));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejects_trailing_input() {
        assert!(parse_declaration("const a = [1]; const b = [2];").is_err());
        assert!(parse_declaration("let a = [1]").is_err());
    }
}
