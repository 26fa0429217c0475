use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ASN.1 error: {0}")]
    Asn1(#[from] sigkey_asn1::error::Error),

    #[error("Invalid DER: {0}")]
    InvalidDer(#[from] sigkey_der::error::Error),

    #[error("Invalid PEM: {0}")]
    InvalidPem(#[from] sigkey_pem::error::Error),

    #[error("expected SEQUENCE")]
    ExpectedSequence,

    #[error("expected {expected} elements, got {actual}")]
    InvalidElementCount {
        expected: &'static str,
        actual: usize,
    },

    #[error("expected INTEGER for {field}")]
    ExpectedInteger { field: &'static str },

    #[error("empty ASN1Object")]
    EmptyAsn1Object,

    #[error("trailing data after RSAPrivateKey")]
    TrailingData,

    #[error("Invalid version: {0} (must be 0 for two-prime or 1 for multi-prime)")]
    InvalidVersion(String),

    #[error("multi-prime RSA keys are not supported")]
    UnsupportedMultiPrime,

    #[error("invalid RSA key: {0}")]
    InvalidKey(&'static str),

    #[error("unexpected PEM label: expected {expected}")]
    UnexpectedLabel { expected: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
