use thiserror::Error;

/// Errors raised by the tree model and the atom grammar.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    // Tree shape errors
    /// Lists are non-empty by convention; an empty one has no type tag
    #[error("empty list has no type tag")]
    EmptyList,

    /// The first element of a list must be an atom naming its type
    #[error("list type tag is not an atom")]
    TypeTagNotAtom,

    // Atom run errors
    /// The run is not a clean concatenation of atom tokens
    #[error("atom token: {0}")]
    Token(token::error::Error),

    /// A run parsed as a single atom held none
    #[error("expected exactly one atom, found none")]
    NoAtom,

    /// A run parsed as a single atom held more than one
    #[error("expected exactly one atom, found {0}")]
    ExpectedSingleAtom(usize),
}
