pub mod directory;
pub mod error;

use error::Error;
use nom::{IResult, Parser};
use sexp::{Atom, Value};
use trellis::decoder::{DecodableFrom, Decoder};
use trellis::encoder::{EncodableTo, Encoder};

/* ref: https://people.csail.mit.edu/rivest/Sexp.txt */

// Decoding refuses input nested deeper than this many lists.
const DEPTH_LIMIT: usize = 128;

/// Canonical byte form of a tree. One tree has exactly one canonical
/// form, so signatures and directory keys are computed over these bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    data: Vec<u8>,
}

impl Canonical {
    pub fn new(data: Vec<u8>) -> Self {
        Canonical { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl AsRef<[u8]> for Canonical {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for Canonical {
    fn from(data: Vec<u8>) -> Self {
        Canonical { data }
    }
}

impl DecodableFrom<Canonical> for Value {}

impl Decoder<Canonical, Value> for Canonical {
    type Error = Error;

    fn decode(&self) -> Result<Value, Error> {
        let (rest, value) = parse_value(&self.data, 0).map_err(Error::from_parse)?;
        if !rest.is_empty() {
            return Err(Error::TrailingBytes(rest.len()));
        }
        check_model(&value)?;
        Ok(value)
    }
}

impl EncodableTo<Value> for Canonical {}

impl Encoder<Value, Canonical> for Value {
    type Error = Error;

    fn encode(&self) -> Result<Canonical, Error> {
        let mut data = Vec::new();
        encode_value(self, &mut data)?;
        Ok(Canonical { data })
    }
}

// Every list must carry an atom type tag, at every depth.
fn check_model(value: &Value) -> Result<(), Error> {
    if let Value::List(items) = value {
        sexp::type_tag(items).map_err(Error::Model)?;
        for item in items {
            check_model(item)?;
        }
    }
    Ok(())
}

fn encode_value(value: &Value, out: &mut Vec<u8>) -> Result<(), Error> {
    match value {
        Value::Atom(atom) => {
            encode_atom(atom, out);
            Ok(())
        }
        Value::List(items) => {
            sexp::type_tag(items).map_err(Error::Model)?;
            out.push(b'(');
            for item in items {
                encode_value(item, out)?;
            }
            out.push(b')');
            Ok(())
        }
    }
}

fn encode_atom(atom: &Atom, out: &mut Vec<u8>) {
    if let Some(hint) = atom.hint() {
        out.push(b'[');
        encode_netstring(hint, out);
        out.push(b']');
    }
    encode_netstring(atom.as_bytes(), out);
}

fn encode_netstring(data: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(data.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(data);
}

fn parse_value(input: &[u8], depth: usize) -> IResult<&[u8], Value> {
    if input.first().copied() == Some(b'(') {
        return parse_list(input, depth);
    }
    let (input, atom) = parse_atom(input)?;
    Ok((input, Value::Atom(atom)))
}

fn parse_list(input: &[u8], depth: usize) -> IResult<&[u8], Value> {
    // Recursion is bounded so hostile nesting cannot exhaust the stack;
    // from_parse reports the Verify failure as Error::TooDeep.
    if depth >= DEPTH_LIMIT {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    let (input, _) = nom::bytes::complete::tag("(").parse(input)?;
    let mut items = Vec::new();
    let mut rest = input;
    while rest.first().copied() != Some(b')') {
        if rest.is_empty() {
            return Err(nom::Err::Failure(nom::error::Error::new(
                rest,
                nom::error::ErrorKind::Eof,
            )));
        }
        let (next, item) = parse_value(rest, depth + 1)?;
        rest = next;
        items.push(item);
    }
    let (input, _) = nom::bytes::complete::tag(")").parse(rest)?;
    Ok((input, Value::List(items)))
}

fn parse_atom(input: &[u8]) -> IResult<&[u8], Atom> {
    let (input, hint) = parse_hint(input)?;
    let (input, data) = parse_netstring(input)?;
    let atom = match hint {
        Some(hint) => Atom::with_hint(data, hint),
        None => Atom::new(data),
    };
    Ok((input, atom))
}

fn parse_hint(input: &[u8]) -> IResult<&[u8], Option<Vec<u8>>> {
    if input.first().copied() != Some(b'[') {
        return Ok((input, None));
    }
    let (input, _) = nom::bytes::complete::tag("[").parse(input)?;
    let (input, bytes) = parse_netstring(input)?;
    let (input, _) = nom::bytes::complete::tag("]").parse(input)?;
    Ok((input, Some(bytes)))
}

fn parse_netstring(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let (input, length) = parse_length(input)?;
    let (input, _) = nom::bytes::complete::tag(":").parse(input)?;
    let (input, data) = nom::bytes::complete::take(length).parse(input)?;
    Ok((input, data.to_vec()))
}

fn parse_length(input: &[u8]) -> IResult<&[u8], usize> {
    let (rest, digits) = nom::character::complete::digit1(input)?;
    let mut length = 0usize;
    for &d in digits {
        length = length
            .checked_mul(10)
            .and_then(|n| n.checked_add((d - b'0') as usize))
            .ok_or_else(|| {
                nom::Err::Failure(nom::error::Error::new(input, nom::error::ErrorKind::TooLarge))
            })?;
    }
    Ok((rest, length))
}
