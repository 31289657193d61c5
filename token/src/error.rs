use base64::DecodeError;
use thiserror::Error;

/// Errors that can occur when scanning readable atom tokens.
///
/// A run is valid only if it is whitespace plus a clean concatenation of
/// token forms: bare tokens, quoted strings, `#...#` hexadecimal, `|...|`
/// base64, verbatim `N:` blocks, and `[...]` display hints.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A character that cannot start any token form
    #[error("unexpected character {0:?} in atom run")]
    UnexpectedChar(char),

    /// A quoted string with no closing quote
    #[error("unterminated quoted string")]
    UnterminatedQuoted,

    /// A hexadecimal form with no closing `#`
    #[error("unterminated hexadecimal form")]
    UnterminatedHex,

    /// A base64 form with no closing `|`
    #[error("unterminated base64 form")]
    UnterminatedBase64,

    /// A display hint with no closing `]`
    #[error("unterminated display hint")]
    UnterminatedHint,

    /// A display hint at the end of a run, with no atom body to attach to
    #[error("display hint without a following atom")]
    DanglingHint,

    /// Two display hints in front of a single atom body
    #[error("display hint follows another display hint")]
    DoubleHint,

    /// A backslash followed by a character that does not form an escape
    #[error("invalid escape sequence \\{0}")]
    InvalidEscape(char),

    /// A quoted string ending in the middle of an escape sequence
    #[error("truncated escape sequence")]
    TruncatedEscape,

    /// An octal escape above `\377`
    #[error("octal escape out of range")]
    OctalEscapeOutOfRange,

    /// A non-hexadecimal character between `#` delimiters
    #[error("invalid hexadecimal digit {0:?}")]
    InvalidHexDigit(char),

    /// An odd number of digits between `#` delimiters
    #[error("odd number of hexadecimal digits")]
    OddHexDigits,

    /// Failed to decode a base64 payload
    #[error("base64 decode: {0}")]
    Base64Decode(DecodeError),

    /// A decimal length prefix not followed by `:`
    #[error("decimal length prefix without ':'")]
    InvalidLengthPrefix,

    /// A verbatim block shorter than its declared length
    #[error("verbatim block is shorter than its declared length")]
    TruncatedVerbatim,

    /// A verbatim length too large to address
    #[error("verbatim length out of range")]
    LengthOutOfRange,

    /// A verbatim length ending inside a multi-byte character
    #[error("verbatim block splits a character boundary")]
    VerbatimSplitsCharacter,
}
