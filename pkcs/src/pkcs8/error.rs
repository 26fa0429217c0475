use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ASN.1 error: {0}")]
    Asn1(#[from] sigkey_asn1::error::Error),

    #[error("Invalid DER: {0}")]
    InvalidDer(#[from] sigkey_der::error::Error),

    #[error("privateKeyAlgorithm: {0}")]
    Algorithm(#[from] crate::algorithm::Error),

    #[error("OneAsymmetricKey must be a SEQUENCE")]
    ExpectedSequence,

    #[error("OneAsymmetricKey must have at least 3 elements, got {0}")]
    TooFewElements(usize),

    #[error("expected INTEGER for version")]
    ExpectedVersion,

    #[error("Invalid version: {0} (must be 0 for v1 or 1 for v2)")]
    InvalidVersion(String),

    #[error("privateKey must be OCTET STRING")]
    ExpectedOctetString,

    #[error("unexpected element after privateKey: {0}")]
    UnexpectedElement(String),

    #[error("empty ASN1Object")]
    EmptyAsn1Object,

    #[error("trailing data after OneAsymmetricKey")]
    TrailingData,
}

pub type Result<T> = std::result::Result<T, Error>;
