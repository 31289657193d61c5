//! Markup Rendering for Certificate Trees
//!
//! This crate renders canonical S-expression trees as an XML-like markup
//! dialect meant for people to read and edit, and rebuilds trees from
//! such documents.
//!
//! The dialect is deliberately small:
//! - element tags come from list type tags, so documents need no schema
//! - atoms appear as readable token text between elements
//! - elements carry no attributes
//!
//! Type tags under the star convention map to tags with the `star`
//! prefix: `(* set ...)` renders as `<starset>`. Reading always rebuilds
//! the split form, which is the one lossy corner of the round trip.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::Error;
pub use reader::{Reader, read_document};
pub use writer::write;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use sexp::Value;
use trellis::decoder::{DecodableFrom, Decoder};
use trellis::encoder::{EncodableTo, Encoder};

/// A complete markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    text: String,
}

impl Markup {
    /// Wraps document text without validating it. Parsing with
    /// [`FromStr`] validates on the way in.
    pub fn new(text: String) -> Self {
        Markup { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Display for Markup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl FromStr for Markup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let markup = Markup {
            text: s.to_string(),
        };
        markup.decode()?;
        Ok(markup)
    }
}

impl DecodableFrom<Markup> for Value {}

impl Decoder<Markup, Value> for Markup {
    type Error = Error;

    fn decode(&self) -> Result<Value, Error> {
        reader::read_document(&self.text)
    }
}

impl EncodableTo<Value> for Markup {}

impl Encoder<Value, Markup> for Value {
    type Error = Error;

    fn encode(&self) -> Result<Markup, Error> {
        let text = writer::write(self)?;
        Ok(Markup { text })
    }
}
