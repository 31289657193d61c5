pub mod error;

use base64::{Engine, engine::general_purpose::STANDARD};
use error::Error;

/*
ref: https://people.csail.mit.edu/rivest/Sexp.txt (readable transport forms)
*/

// Payloads up to this many bytes render as #...# instead of |...|.
const HEX_LIMIT: usize = 8;

fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'/' | b'_' | b':' | b'*' | b'+' | b'=')
}

/// One decoded atom token: the byte payload plus the optional display hint
/// carried in a `[...]` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    data: Vec<u8>,
    hint: Option<Vec<u8>>,
}

impl Token {
    pub fn new(data: Vec<u8>) -> Self {
        Token { data, hint: None }
    }

    pub fn with_hint(data: Vec<u8>, hint: Vec<u8>) -> Self {
        Token {
            data,
            hint: Some(hint),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn hint(&self) -> Option<&[u8]> {
        self.hint.as_deref()
    }

    pub fn into_parts(self) -> (Vec<u8>, Option<Vec<u8>>) {
        (self.data, self.hint)
    }
}

/// Scans one character run into a sequence of tokens.
///
/// The scanner is lazy and freshly constructed per run; it carries no state
/// across runs. A run of pure whitespace yields nothing. Errors are
/// terminal: after yielding one the scanner is exhausted.
///
/// Whitespace is insignificant between tokens and inside `#...#` and
/// `|...|` payloads, which is what allows rendered atoms to be wrapped
/// across lines without changing their value.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    pub fn new(run: &'a str) -> Self {
        Scanner { rest: run }
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn bail(&mut self, e: Error) -> Option<Result<Token, Error>> {
        self.rest = "";
        Some(Err(e))
    }

    /// Scans one body form (bare, quoted, hex, base64 or verbatim).
    fn scan_body(&mut self) -> Result<Vec<u8>, Error> {
        let c = match self.rest.chars().next() {
            Some(c) => c,
            // Only reachable through an unclosed [...] prefix.
            None => return Err(Error::UnterminatedHint),
        };
        match c {
            '"' => self.scan_quoted(),
            '#' => self.scan_hex(),
            '|' => self.scan_base64(),
            '0'..='9' => self.scan_verbatim(),
            c if c.is_ascii() && is_token_char(c as u8) => Ok(self.scan_bare()),
            c => Err(Error::UnexpectedChar(c)),
        }
    }

    fn scan_bare(&mut self) -> Vec<u8> {
        let end = self
            .rest
            .as_bytes()
            .iter()
            .position(|b| !is_token_char(*b))
            .unwrap_or(self.rest.len());
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        token.as_bytes().to_vec()
    }

    fn scan_quoted(&mut self) -> Result<Vec<u8>, Error> {
        let bytes = self.rest.as_bytes();
        let mut out = Vec::new();
        let mut i = 1;
        while i < bytes.len() {
            match bytes[i] {
                b'"' => {
                    self.rest = &self.rest[i + 1..];
                    return Ok(out);
                }
                b'\\' => i = unescape(bytes, i + 1, &mut out)?,
                b => {
                    out.push(b);
                    i += 1;
                }
            }
        }
        Err(Error::UnterminatedQuoted)
    }

    fn scan_hex(&mut self) -> Result<Vec<u8>, Error> {
        let bytes = self.rest.as_bytes();
        let mut out = Vec::new();
        let mut high: Option<u8> = None;
        let mut i = 1;
        while i < bytes.len() {
            let b = bytes[i];
            if b == b'#' {
                if high.is_some() {
                    return Err(Error::OddHexDigits);
                }
                self.rest = &self.rest[i + 1..];
                return Ok(out);
            }
            if !b.is_ascii_whitespace() {
                let v = hex_value(b)?;
                match high.take() {
                    Some(h) => out.push(h << 4 | v),
                    None => high = Some(v),
                }
            }
            i += 1;
        }
        Err(Error::UnterminatedHex)
    }

    fn scan_base64(&mut self) -> Result<Vec<u8>, Error> {
        let bytes = self.rest.as_bytes();
        let mut collected = Vec::new();
        let mut i = 1;
        while i < bytes.len() {
            let b = bytes[i];
            if b == b'|' {
                self.rest = &self.rest[i + 1..];
                return STANDARD.decode(&collected).map_err(Error::Base64Decode);
            }
            if !b.is_ascii_whitespace() {
                collected.push(b);
            }
            i += 1;
        }
        Err(Error::UnterminatedBase64)
    }

    fn scan_verbatim(&mut self) -> Result<Vec<u8>, Error> {
        let bytes = self.rest.as_bytes();
        let mut length: usize = 0;
        let mut i = 0;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            length = length
                .checked_mul(10)
                .and_then(|n| n.checked_add((bytes[i] - b'0') as usize))
                .ok_or(Error::LengthOutOfRange)?;
            i += 1;
        }
        if bytes.get(i) != Some(&b':') {
            return Err(Error::InvalidLengthPrefix);
        }
        let start = i + 1;
        let end = start.checked_add(length).ok_or(Error::LengthOutOfRange)?;
        if end > bytes.len() {
            return Err(Error::TruncatedVerbatim);
        }
        if !self.rest.is_char_boundary(end) {
            return Err(Error::VerbatimSplitsCharacter);
        }
        let data = bytes[start..end].to_vec();
        self.rest = &self.rest[end..];
        Ok(data)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        if self.rest.is_empty() {
            return None;
        }
        let mut hint = None;
        if self.rest.as_bytes()[0] == b'[' {
            self.rest = &self.rest[1..];
            self.skip_whitespace();
            let h = match self.scan_body() {
                Ok(h) => h,
                Err(e) => return self.bail(e),
            };
            self.skip_whitespace();
            if self.rest.as_bytes().first() != Some(&b']') {
                return self.bail(Error::UnterminatedHint);
            }
            self.rest = &self.rest[1..];
            self.skip_whitespace();
            match self.rest.as_bytes().first().copied() {
                None => return self.bail(Error::DanglingHint),
                Some(b'[') => return self.bail(Error::DoubleHint),
                Some(_) => {}
            }
            hint = Some(h);
        }
        let data = match self.scan_body() {
            Ok(d) => d,
            Err(e) => return self.bail(e),
        };
        Some(Ok(Token { data, hint }))
    }
}

// Returns the index of the first byte after the escape sequence.
fn unescape(bytes: &[u8], i: usize, out: &mut Vec<u8>) -> Result<usize, Error> {
    let c = match bytes.get(i) {
        Some(c) => *c,
        None => return Err(Error::TruncatedEscape),
    };
    match c {
        b'b' => out.push(8),
        b't' => out.push(b'\t'),
        b'n' => out.push(b'\n'),
        b'v' => out.push(11),
        b'f' => out.push(12),
        b'r' => out.push(b'\r'),
        b'\'' => out.push(b'\''),
        b'"' => out.push(b'"'),
        b'\\' => out.push(b'\\'),
        b'x' => {
            let (h, l) = match (bytes.get(i + 1), bytes.get(i + 2)) {
                (Some(h), Some(l)) => (hex_value(*h)?, hex_value(*l)?),
                _ => return Err(Error::TruncatedEscape),
            };
            out.push(h << 4 | l);
            return Ok(i + 3);
        }
        b'0'..=b'7' => {
            // exactly three octal digits
            let mut value: u32 = 0;
            for k in 0..3 {
                match bytes.get(i + k).copied() {
                    Some(d @ b'0'..=b'7') => value = value * 8 + u32::from(d - b'0'),
                    Some(d) => return Err(Error::InvalidEscape(d as char)),
                    None => return Err(Error::TruncatedEscape),
                }
            }
            if value > 255 {
                return Err(Error::OctalEscapeOutOfRange);
            }
            out.push(value as u8);
            return Ok(i + 3);
        }
        // a backslash before a line break elides the break
        b'\n' => {
            if bytes.get(i + 1) == Some(&b'\r') {
                return Ok(i + 2);
            }
            return Ok(i + 1);
        }
        b'\r' => {
            if bytes.get(i + 1) == Some(&b'\n') {
                return Ok(i + 2);
            }
            return Ok(i + 1);
        }
        c => return Err(Error::InvalidEscape(c as char)),
    }
    Ok(i + 1)
}

fn hex_value(b: u8) -> Result<u8, Error> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => Err(Error::InvalidHexDigit(b as char)),
    }
}

/// Renders a payload (and optional display hint) as one readable token.
///
/// Form selection: a payload that is itself a legal bare token stays bare;
/// printable text becomes a quoted string; short binary becomes `#...#`;
/// anything else becomes `|...|`. The scanner accepts every form
/// regardless of what the renderer would have chosen.
pub fn encode(data: &[u8], hint: Option<&[u8]>) -> String {
    let mut out = String::new();
    if let Some(hint) = hint {
        out.push('[');
        out.push_str(&encode_body(hint));
        out.push(']');
    }
    out.push_str(&encode_body(data));
    out
}

fn encode_body(data: &[u8]) -> String {
    if is_bare(data) {
        // token characters are all ASCII
        return String::from_utf8_lossy(data).into_owned();
    }
    if is_quotable(data) {
        return quote(data);
    }
    if data.len() <= HEX_LIMIT {
        let mut s = String::with_capacity(data.len() * 2 + 2);
        s.push('#');
        for b in data {
            s.push_str(&format!("{:02x}", b));
        }
        s.push('#');
        return s;
    }
    format!("|{}|", STANDARD.encode(data))
}

fn is_bare(data: &[u8]) -> bool {
    match data.first() {
        Some(b) if !b.is_ascii_digit() => data.iter().all(|b| is_token_char(*b)),
        _ => false,
    }
}

fn is_quotable(data: &[u8]) -> bool {
    data.iter()
        .all(|&b| matches!(b, 0x20..=0x7e | 8 | 11 | 12 | b'\t' | b'\n' | b'\r'))
}

fn quote(data: &[u8]) -> String {
    let mut s = String::with_capacity(data.len() + 2);
    s.push('"');
    for &b in data {
        match b {
            b'"' => s.push_str("\\\""),
            b'\\' => s.push_str("\\\\"),
            8 => s.push_str("\\b"),
            b'\t' => s.push_str("\\t"),
            b'\n' => s.push_str("\\n"),
            11 => s.push_str("\\v"),
            12 => s.push_str("\\f"),
            b'\r' => s.push_str("\\r"),
            b => s.push(b as char),
        }
    }
    s.push('"');
    s
}

/// Lays one encoded token out under the markup line discipline: the indent
/// prefixes every line, and a trailing `#...#` or `|...|` payload is filled
/// to the wrap width. Break points inside those delimiters are free because
/// the scanner ignores whitespace there; any other form stays on a single
/// line even when it overflows the width.
///
/// The returned block carries no trailing newline.
pub fn wrap(encoded: &str, indent: &str, width: usize) -> String {
    if indent.len() + encoded.len() <= width {
        return format!("{}{}", indent, encoded);
    }
    let (start, end) = match breakable_span(encoded) {
        Some(span) if width > indent.len() + 4 => span,
        _ => return format!("{}{}", indent, encoded),
    };
    let tail = &encoded[end..];
    let mut lines: Vec<String> = Vec::new();
    let mut line = format!("{}{}", indent, &encoded[..start]);
    let mut rest = &encoded[start..end];
    while !rest.is_empty() {
        let room = width.saturating_sub(line.len());
        if rest.len() + tail.len() <= room {
            line.push_str(rest);
            break;
        }
        if room == 0 {
            lines.push(line);
            line = indent.to_string();
            continue;
        }
        let mut take = room.min(rest.len());
        // a break point must not split a multi-byte character
        while take > 0 && !rest.is_char_boundary(take) {
            take -= 1;
        }
        line.push_str(&rest[..take]);
        rest = &rest[take..];
        lines.push(line);
        line = indent.to_string();
    }
    line.push_str(tail);
    lines.push(line);
    lines.join("\n")
}

/// Returns the payload range of an encoded token that ends in a `#...#` or
/// `|...|` form, excluding both delimiters.
fn breakable_span(encoded: &str) -> Option<(usize, usize)> {
    let bytes = encoded.as_bytes();
    let mut body = 0;
    if bytes.first() == Some(&b'[') {
        let inner = skip_form(&encoded[1..])?;
        if bytes.get(1 + inner) != Some(&b']') {
            return None;
        }
        body = inner + 2;
    }
    match bytes.get(body).copied() {
        Some(d @ (b'#' | b'|')) if bytes.last().copied() == Some(d) && encoded.len() - body > 2 => {
            Some((body + 1, encoded.len() - 1))
        }
        _ => None,
    }
}

// Returns the index just past one body form at the start of `s`.
fn skip_form(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    match bytes.first().copied()? {
        b'"' => {
            let mut i = 1;
            while i < bytes.len() {
                match bytes[i] {
                    b'"' => return Some(i + 1),
                    b'\\' => i += 2,
                    _ => i += 1,
                }
            }
            None
        }
        b'#' => s[1..].find('#').map(|i| i + 2),
        b'|' => s[1..].find('|').map(|i| i + 2),
        b if is_token_char(b) => Some(
            bytes
                .iter()
                .position(|b| !is_token_char(*b))
                .unwrap_or(bytes.len()),
        ),
        _ => None,
    }
}
