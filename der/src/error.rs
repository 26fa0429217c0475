use nom::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("truncated DER input")]
    Truncated,
    #[error("indefinite or non-minimal length encoding")]
    InvalidLength,
    #[error("length does not fit in memory")]
    LengthTooLarge,
    #[error("high tag number form is not supported")]
    HighTagNumber,
    #[error("parser error {0:?}")]
    Parser(ErrorKind),
}

impl From<nom::Err<nom::error::Error<&[u8]>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&[u8]>>) -> Self {
        match err {
            nom::Err::Incomplete(_) => Error::Truncated,
            nom::Err::Error(e) | nom::Err::Failure(e) => match e.code {
                ErrorKind::Eof => Error::Truncated,
                ErrorKind::LengthValue => Error::InvalidLength,
                ErrorKind::TooLarge => Error::LengthTooLarge,
                ErrorKind::TagBits => Error::HighTagNumber,
                kind => Error::Parser(kind),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
