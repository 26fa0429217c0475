use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed encrypted payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown kdf name: {0}")]
    UnknownKdf(String),
    #[error("unknown cipher name: {0}")]
    UnknownCipher(String),
    #[error("unsupported scrypt parameters: N={n}, r={r}, p={p}")]
    UnsupportedKdfParams { n: u64, r: u64, p: u64 },
    #[error("invalid nonce length: expected 24 bytes, got {0}")]
    InvalidNonceLength(usize),
    #[error("key derivation failed: {0}")]
    Kdf(String),
    #[error("decryption failed")]
    DecryptionFailed,
    #[error("encryption failed")]
    EncryptionFailed,
    #[error("random number generator failed: {0}")]
    Rng(#[from] rand::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
