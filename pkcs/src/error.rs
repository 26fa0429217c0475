use sigkey_pem::Label;
use thiserror::Error;

use crate::KeyAlgorithm;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ASN.1 error: {0}")]
    Asn1(#[from] sigkey_asn1::error::Error),

    #[error("PKCS#1 error: {0}")]
    Pkcs1(#[from] crate::pkcs1::Error),

    #[error("PKCS#8 error: {0}")]
    Pkcs8(#[from] crate::pkcs8::Error),

    #[error("Invalid PEM: {0}")]
    InvalidPem(#[from] sigkey_pem::error::Error),

    #[error("unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(KeyAlgorithm),

    #[error("invalid parameters for {0} key")]
    InvalidAlgorithmParameters(KeyAlgorithm),

    #[error("unexpected PEM label: {0}")]
    UnexpectedLabel(Label),
}

pub type Result<T> = std::result::Result<T, Error>;
