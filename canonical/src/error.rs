use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    // Group errors from the byte parser
    #[error("parser error {0:?}")]
    Parser(nom::error::ErrorKind),
    #[error("parser incomplete: {0:?}")]
    ParserIncomplete(nom::Needed),
    #[error("length field does not fit in usize")]
    LengthOverflow,
    #[error("value nesting is too deep")]
    TooDeep,
    #[error("{0} bytes remain after the root value")]
    TrailingBytes(usize),
    // Group errors from the tree model
    #[error("model: {0}")]
    Model(sexp::error::Error),
}

impl Error {
    pub(crate) fn from_parse(e: nom::Err<nom::error::Error<&[u8]>>) -> Self {
        match e {
            nom::Err::Incomplete(needed) => Error::ParserIncomplete(needed),
            nom::Err::Error(e) | nom::Err::Failure(e) => match e.code {
                nom::error::ErrorKind::TooLarge => Error::LengthOverflow,
                nom::error::ErrorKind::Verify => Error::TooDeep,
                code => Error::Parser(code),
            },
        }
    }
}
