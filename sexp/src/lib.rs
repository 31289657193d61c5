use std::{fmt::Display, str::FromStr};

use error::Error;
use token::Token;

pub mod error;
pub mod text;

/// One node of a certificate tree.
///
/// A tree is built bottom-up and is immutable once constructed: lists own
/// their children exclusively, so there is no sharing and no cycles. By
/// convention the first element of every list is an atom, the *type tag*,
/// which names the construct the list represents. The codecs check that
/// convention at their boundaries; the model itself does not forbid
/// malformed shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Atom(Atom),
    List(Vec<Value>),
}

impl Value {
    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Value::Atom(atom) => Some(atom),
            Value::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::Atom(_) => None,
            Value::List(items) => Some(items),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Atom(atom) => write!(f, "{}", atom),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<Atom> for Value {
    fn from(atom: Atom) -> Self {
        Value::Atom(atom)
    }
}

/// Returns the type tag of a list body: the atom that must head it.
pub fn type_tag(items: &[Value]) -> Result<&Atom, Error> {
    match items.first() {
        None => Err(Error::EmptyList),
        Some(Value::Atom(atom)) => Ok(atom),
        Some(Value::List(_)) => Err(Error::TypeTagNotAtom),
    }
}

/// An atomic value: an immutable byte payload plus an optional display
/// hint. The hint matters only to the readable rendering; equality covers
/// both payload and hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    data: Vec<u8>,
    hint: Option<Vec<u8>>,
}

impl Atom {
    pub fn new(data: Vec<u8>) -> Self {
        Atom { data, hint: None }
    }

    pub fn with_hint(data: Vec<u8>, hint: Vec<u8>) -> Self {
        Atom {
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

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl From<&str> for Atom {
    fn from(value: &str) -> Self {
        Atom::new(value.as_bytes().to_vec())
    }
}

impl From<String> for Atom {
    fn from(value: String) -> Self {
        Atom::new(value.into_bytes())
    }
}

impl From<&[u8]> for Atom {
    fn from(value: &[u8]) -> Self {
        Atom::new(value.to_vec())
    }
}

impl From<Vec<u8>> for Atom {
    fn from(value: Vec<u8>) -> Self {
        Atom::new(value)
    }
}

impl From<Token> for Atom {
    fn from(token: Token) -> Self {
        let (data, hint) = token.into_parts();
        Atom { data, hint }
    }
}

impl Display for Atom {
    /// Renders the canonical readable token text of this atom.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", token::encode(&self.data, self.hint.as_deref()))
    }
}

impl FromStr for Atom {
    type Err = Error;

    /// Parses a run holding exactly one atom.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut atoms = text::atoms(s);
        let first = match atoms.next() {
            Some(atom) => atom?,
            None => return Err(Error::NoAtom),
        };
        let extra = atoms.count();
        if extra > 0 {
            return Err(Error::ExpectedSingleAtom(extra + 1));
        }
        Ok(first)
    }
}
