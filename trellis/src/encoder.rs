//! Encoder trait for type-safe conversions.
//!
//! The mirror image of [`crate::decoder`]: `Encoder` converts a richer
//! representation back toward the wire, and `EncodableTo` marks the valid
//! destination types. The `canonical` crate encodes a tree into the
//! canonical byte form, and the `xml` crate encodes a tree into a rendered
//! markup document.

/// Encoder trait for converting from type `T` to type `E`.
///
/// Implemented by the source type `T` (usually `Self`) for each destination
/// type `E` marked with `EncodableTo<T>`.
///
/// ```ignore
/// use trellis::encoder::Encoder;
/// use sexp::{Atom, Value};
/// use xml::Markup;
///
/// let tree = Value::List(vec![Atom::from("cert").into()]);
/// let markup: Markup = tree.encode().unwrap();
/// ```
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into type `E`.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion fails. The specific error
    /// conditions depend on the implementing type.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that type `E` can be encoded from type `T`.
///
/// The compile-time guard for `Encoder`, exactly as `DecodableFrom` guards
/// `Decoder`. Implement it for destination types that a source type may
/// encode into.
pub trait EncodableTo<T> {}
