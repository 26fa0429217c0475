use base64::DecodeError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No `-----BEGIN <label>-----` line for the requested label
    #[error("no BEGIN line found")]
    MissingPreEncapsulationBoundary,

    /// A BEGIN line with no matching `-----END <label>-----` line after it
    #[error("no END line found")]
    MissingPostEncapsulationBoundary,

    #[error("empty body between BEGIN and END lines")]
    MissingData,

    #[error("unknown label")]
    InvalidLabel,

    #[error("BEGIN and END labels differ")]
    LabelMissMatch,

    #[error("malformed BEGIN or END line")]
    InvalidEncapsulationBoundary,

    /// Body line with characters outside the base64 alphabet
    #[error("malformed base64 body line")]
    InvalidBase64Line,

    /// Last body line with bad padding
    #[error("malformed final base64 line")]
    InvalidBase64Finl,

    #[error("invalid base64 payload: {0}")]
    Base64Decode(DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;
