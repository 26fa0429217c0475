//! Password based encryption for sigstore private keys.
//!
//! The payload is a JSON document naming the KDF and cipher together with
//! their parameters:
//!
//! ```json
//! {"kdf":{"name":"scrypt","params":{"N":32768,"r":8,"p":1},"salt":"..."},
//!  "cipher":{"name":"nacl/secretbox","nonce":"..."},
//!  "ciphertext":"..."}
//! ```
//!
//! Only scrypt with a fixed set of cost parameters and NaCl secretbox are
//! understood.

mod base64_bytes;
pub mod cipher;
pub mod error;
pub mod kdf;

use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

pub use cipher::SecretBoxCipher;
use error::Result;
pub use kdf::{ScryptKdf, ScryptParams};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    pub kdf: ScryptKdf,
    pub cipher: SecretBoxCipher,
    #[serde(with = "base64_bytes")]
    pub ciphertext: Vec<u8>,
}

/// Decrypts a JSON payload with `password`.
///
/// All parameters are validated before the key is derived. A wrong password
/// and a tampered payload both surface as `DecryptionFailed`.
pub fn decrypt(payload: &[u8], password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let data: EncryptedData = serde_json::from_slice(payload)?;
    data.kdf.check()?;
    data.cipher.check()?;
    debug!(
        n = data.kdf.params.n,
        r = data.kdf.params.r,
        p = data.kdf.params.p,
        ciphertext_len = data.ciphertext.len(),
        "deriving key"
    );

    let key = data.kdf.derive_key(password)?;
    let plaintext = data.cipher.open(&key, &data.ciphertext)?;
    debug!(plaintext_len = plaintext.len(), "payload decrypted");
    Ok(plaintext)
}

/// Encrypts `plaintext` with the default (legacy) scrypt parameters.
pub fn encrypt(plaintext: &[u8], password: &[u8]) -> Result<Vec<u8>> {
    encrypt_with(plaintext, password, ScryptParams::default())
}

pub fn encrypt_with(plaintext: &[u8], password: &[u8], params: ScryptParams) -> Result<Vec<u8>> {
    let kdf = ScryptKdf::new(params)?;
    let cipher = SecretBoxCipher::new()?;
    debug!(n = params.n, r = params.r, p = params.p, "encrypting payload");

    let key = kdf.derive_key(password)?;
    let ciphertext = cipher.seal(&key, plaintext)?;
    let data = EncryptedData {
        kdf,
        cipher,
        ciphertext,
    };
    Ok(serde_json::to_vec(&data)?)
}
