//! # trellis
//!
//! Core traits for encoding and decoding in the trellis certificate toolkit.
//!
//! This crate defines the fundamental `Decoder` and `Encoder` traits that
//! establish a type-safe conversion pattern used throughout trellis.
//!
//! ## Overview
//!
//! The conversion pattern flows like this:
//! ```text
//! Markup → Value → Canonical → directory bytes
//! ```
//!
//! Each step uses the `Decoder` trait to convert from one representation to
//! the next, and the `Encoder` trait to convert in the reverse direction.
//! `Markup` is the rendered markup-tree document, `Value` is the in-memory
//! S-expression tree, and `Canonical` is the canonical byte form handed to
//! the certificate directory.
//!
//! ## Type Safety
//!
//! The traits use marker traits (`DecodableFrom` and `EncodableTo`) to ensure
//! type safety at compile time. This prevents invalid conversions and catches
//! errors early in the development process.
//!
//! ## Example
//!
//! The following example demonstrates the decoding pattern. Note that specific
//! implementations are provided by the `canonical` and `xml` crates:
//!
//! ```ignore
//! use trellis::decoder::Decoder;
//! use canonical::Canonical;
//! use sexp::Value;
//!
//! // Decode the canonical byte form into a tree
//! let form = Canonical::new(b"(4:cert1:x)".to_vec());
//! let tree: Value = form.decode().unwrap();
//! ```
//!
//! Encoding works in the reverse direction:
//!
//! ```ignore
//! use trellis::encoder::Encoder;
//! use canonical::Canonical;
//! use sexp::{Atom, Value};
//!
//! // Encode a tree back to the canonical byte form
//! let tree = Value::List(vec![Atom::from("cert").into()]);
//! let form: Canonical = tree.encode().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
