use crypto_secretbox::XSalsa20Poly1305;
use crypto_secretbox::aead::generic_array::GenericArray;
use crypto_secretbox::aead::{AeadInPlace, KeyInit};
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::kdf::KEY_LEN;

pub const NAME: &str = "nacl/secretbox";
pub const NONCE_LEN: usize = 24;
pub const TAG_LEN: usize = 16;

/// NaCl secretbox settings. Sealed boxes are laid out as the Poly1305 tag
/// followed by the XSalsa20 ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretBoxCipher {
    pub name: String,
    #[serde(with = "crate::base64_bytes")]
    pub nonce: Vec<u8>,
}

impl SecretBoxCipher {
    /// Fresh cipher settings with a random nonce.
    pub fn new() -> Result<Self> {
        let mut nonce = vec![0u8; NONCE_LEN];
        OsRng.try_fill_bytes(&mut nonce)?;
        Ok(SecretBoxCipher {
            name: NAME.to_string(),
            nonce,
        })
    }

    pub fn check(&self) -> Result<()> {
        if self.name != NAME {
            return Err(Error::UnknownCipher(self.name.clone()));
        }
        if self.nonce.len() != NONCE_LEN {
            return Err(Error::InvalidNonceLength(self.nonce.len()));
        }
        Ok(())
    }

    fn cipher(key: &[u8; KEY_LEN]) -> Result<XSalsa20Poly1305> {
        XSalsa20Poly1305::new_from_slice(key).map_err(|_| Error::Kdf("invalid key length".to_string()))
    }

    pub fn seal(&self, key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
        self.check()?;
        let mut buffer = Vec::with_capacity(TAG_LEN + plaintext.len());
        buffer.extend_from_slice(&[0u8; TAG_LEN]);
        buffer.extend_from_slice(plaintext);

        let tag = Self::cipher(key)?
            .encrypt_in_place_detached(
                GenericArray::from_slice(&self.nonce),
                b"",
                &mut buffer[TAG_LEN..],
            )
            .map_err(|_| Error::EncryptionFailed)?;
        buffer[..TAG_LEN].copy_from_slice(&tag);
        Ok(buffer)
    }

    /// Opens a sealed box. Plaintext is only released when the tag verifies;
    /// every failure, including a truncated box, is `DecryptionFailed`.
    pub fn open(&self, key: &[u8; KEY_LEN], sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        self.check()?;
        if sealed.len() < TAG_LEN {
            return Err(Error::DecryptionFailed);
        }
        let (tag, ciphertext) = sealed.split_at(TAG_LEN);
        let mut buffer = Zeroizing::new(ciphertext.to_vec());

        Self::cipher(key)?
            .decrypt_in_place_detached(
                GenericArray::from_slice(&self.nonce),
                b"",
                &mut buffer[..],
                GenericArray::from_slice(tag),
            )
            .map_err(|_| Error::DecryptionFailed)?;
        Ok(buffer)
    }
}
