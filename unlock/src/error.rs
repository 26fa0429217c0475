use thiserror::Error;

/// Why the key structure parser refused the decrypted bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnsupportedAlgorithm,
    Malformed,
}

/// Pipeline stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EnvelopeNotFound,
    PayloadDecode,
    Decrypt,
    Parse(ParseErrorKind),
    Encrypt,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("key envelope not found: {0}")]
    EnvelopeNotFound(#[source] sigkey_pem::error::Error),

    #[error("failed to decode key payload: {0}")]
    PayloadDecode(#[source] sigkey_pem::error::Error),

    #[error("failed to decrypt key: {0}")]
    Decrypt(#[from] sigkey_encrypted::error::Error),

    #[error("failed to parse key: {0}")]
    Parse(#[from] sigkey_pkcs::Error),

    #[error("failed to encrypt key: {0}")]
    Encrypt(#[source] sigkey_encrypted::error::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EnvelopeNotFound(_) => ErrorKind::EnvelopeNotFound,
            Error::PayloadDecode(_) => ErrorKind::PayloadDecode,
            Error::Decrypt(_) => ErrorKind::Decrypt,
            Error::Parse(sigkey_pkcs::Error::UnsupportedAlgorithm(_)) => {
                ErrorKind::Parse(ParseErrorKind::UnsupportedAlgorithm)
            }
            Error::Parse(_) => ErrorKind::Parse(ParseErrorKind::Malformed),
            Error::Encrypt(_) => ErrorKind::Encrypt,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
