//! Error types for markup reading and writing.

use thiserror::Error;

/// Errors that can occur while rendering a tree as markup or while
/// rebuilding a tree from a markup event stream.
///
/// Every error is terminal. A document that does not map exactly is
/// rejected rather than repaired, so no data is silently dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    // Group errors in the event stream structure
    /// An element close arrived with no element open
    #[error("element close with no open element: {0}")]
    UnbalancedClose(String),

    /// The close tag does not match the innermost open tag
    #[error("close tag {found} does not match open tag {expected}")]
    MismatchedClose { expected: String, found: String },

    /// The stream ended while elements were still open
    #[error("input ended with {0} elements still open")]
    Truncated(usize),

    /// A document holds exactly one root element
    #[error("document already has a root element, found {0}")]
    SecondRoot(String),

    /// Non-whitespace text appeared outside any element
    #[error("text outside of any element")]
    TextOutsideElement,

    /// The dialect has no attributes
    #[error("element {0} carries attributes")]
    UnexpectedAttributes(String),

    /// The underlying markup parser rejected the document
    #[error("markup parser: {0}")]
    Parse(String),

    // Group errors in tag mapping on the write side
    /// The type tag cannot be spelled as a markup tag
    #[error("type tag is not representable as a markup tag: {0}")]
    UnsupportedTag(String),

    /// A type tag with a display hint has nowhere to carry it
    #[error("type tag carries a display hint")]
    HintedTag,

    /// Literal tags starting with `star` would read back as star forms
    #[error("literal tag {0} collides with the star convention")]
    ReservedTag(String),

    // Group errors from the tree model
    #[error("model: {0}")]
    Model(sexp::error::Error),
    #[error("text run: {0}")]
    Run(sexp::error::Error),
}
