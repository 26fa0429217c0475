//! Private key dispatch over the PKCS#8 algorithm identifier.

use std::fmt::Display;
use std::str::FromStr;

use sigkey::decoder::{DecodableFrom, Decoder};
use sigkey::encoder::{EncodableTo, Encoder};
use sigkey_asn1::{ObjectIdentifier, OctetString};
use sigkey_pem::{FromPem, Label, Pem, ToPem};
use tracing::debug;

use crate::algorithm::{AlgorithmIdentifier, AlgorithmParameters};
use crate::error::{Error, Result};
use crate::pkcs1::RSAPrivateKey;
use crate::pkcs8::OneAsymmetricKey;

/// Key algorithm named by a PKCS#8 `privateKeyAlgorithm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Rsa,
    Ec,
    Ed25519,
    Ed448,
    X25519,
    X448,
    Dsa,
    Unknown(ObjectIdentifier),
}

impl KeyAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            KeyAlgorithm::Rsa => "RSA",
            KeyAlgorithm::Ec => "EC",
            KeyAlgorithm::Ed25519 => "Ed25519",
            KeyAlgorithm::Ed448 => "Ed448",
            KeyAlgorithm::X25519 => "X25519",
            KeyAlgorithm::X448 => "X448",
            KeyAlgorithm::Dsa => "DSA",
            KeyAlgorithm::Unknown(_) => "unknown",
        }
    }
}

impl From<&ObjectIdentifier> for KeyAlgorithm {
    fn from(oid: &ObjectIdentifier) -> Self {
        match oid.to_string().as_str() {
            AlgorithmIdentifier::OID_RSA_ENCRYPTION => KeyAlgorithm::Rsa,
            AlgorithmIdentifier::OID_EC_PUBLIC_KEY => KeyAlgorithm::Ec,
            AlgorithmIdentifier::OID_ED25519 => KeyAlgorithm::Ed25519,
            AlgorithmIdentifier::OID_ED448 => KeyAlgorithm::Ed448,
            AlgorithmIdentifier::OID_X25519 => KeyAlgorithm::X25519,
            AlgorithmIdentifier::OID_X448 => KeyAlgorithm::X448,
            AlgorithmIdentifier::OID_ID_DSA => KeyAlgorithm::Dsa,
            _ => KeyAlgorithm::Unknown(oid.clone()),
        }
    }
}

impl Display for KeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyAlgorithm::Unknown(oid) => write!(f, "unknown ({})", oid),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Common accessors shared by every concrete private key type.
pub trait PrivateKeyExt {
    /// Key size in bits.
    fn key_size(&self) -> u32;

    fn algorithm(&self) -> KeyAlgorithm;
}

/// A private key this crate can re-encode.
///
/// One variant per supported algorithm; anything else is rejected with
/// [`Error::UnsupportedAlgorithm`] while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivateKey {
    Rsa(RSAPrivateKey),
}

impl PrivateKey {
    /// Parses a DER encoded PKCS#8 `PrivateKeyInfo`.
    ///
    /// RSA keys are validated before they are returned.
    pub fn from_pkcs8_der(bytes: &[u8]) -> Result<Self> {
        let key = OneAsymmetricKey::from_der(bytes)?;
        key.decode()
    }

    /// Wraps the key into a DER encoded PKCS#8 `PrivateKeyInfo`.
    pub fn to_pkcs8_der(&self) -> Result<Vec<u8>> {
        let key: OneAsymmetricKey = self.encode()?;
        Ok(key.to_der()?)
    }

    /// Reads the first `RSA PRIVATE KEY` or `PRIVATE KEY` block of `text`.
    pub fn from_pem_str(text: &str) -> Result<Self> {
        let pem = Pem::from_str(text)?;
        Self::from_pem(&pem)
    }
}

impl PrivateKeyExt for PrivateKey {
    fn key_size(&self) -> u32 {
        match self {
            PrivateKey::Rsa(key) => key.key_size(),
        }
    }

    fn algorithm(&self) -> KeyAlgorithm {
        match self {
            PrivateKey::Rsa(key) => key.algorithm(),
        }
    }
}

impl DecodableFrom<OneAsymmetricKey> for PrivateKey {}

impl Decoder<OneAsymmetricKey, PrivateKey> for OneAsymmetricKey {
    type Error = Error;

    fn decode(&self) -> Result<PrivateKey> {
        let identifier = &self.private_key_algorithm;
        let algorithm = KeyAlgorithm::from(&identifier.algorithm);
        debug!(%algorithm, "decoding PKCS#8 private key");

        match algorithm {
            KeyAlgorithm::Rsa => {
                if !matches!(identifier.parameters, None | Some(AlgorithmParameters::Null)) {
                    return Err(Error::InvalidAlgorithmParameters(KeyAlgorithm::Rsa));
                }
                let key = RSAPrivateKey::from_der(self.private_key.as_bytes())?;
                key.validate()?;
                debug!(key_size = key.key_size(), "RSA private key validated");
                Ok(PrivateKey::Rsa(key))
            }
            other => Err(Error::UnsupportedAlgorithm(other)),
        }
    }
}

impl EncodableTo<PrivateKey> for OneAsymmetricKey {}

impl Encoder<PrivateKey, OneAsymmetricKey> for PrivateKey {
    type Error = Error;

    fn encode(&self) -> Result<OneAsymmetricKey> {
        match self {
            PrivateKey::Rsa(key) => {
                let algorithm = AlgorithmIdentifier::new(
                    ObjectIdentifier::from_str(AlgorithmIdentifier::OID_RSA_ENCRYPTION)?,
                    Some(AlgorithmParameters::Null),
                );
                Ok(OneAsymmetricKey::new(
                    algorithm,
                    OctetString::from(key.to_der()?),
                ))
            }
        }
    }
}

impl ToPem for PrivateKey {
    type Error = Error;

    fn pem_label(&self) -> Label {
        match self {
            PrivateKey::Rsa(_) => Label::RSAPrivateKey,
        }
    }

    fn to_pem(&self) -> Result<Pem> {
        match self {
            PrivateKey::Rsa(key) => Ok(key.to_pem()?),
        }
    }
}

impl FromPem for PrivateKey {
    type Error = Error;

    fn expected_label() -> Label {
        Label::PrivateKey
    }

    /// Accepts PKCS#8 `PRIVATE KEY` and PKCS#1 `RSA PRIVATE KEY` blocks.
    fn from_pem(pem: &Pem) -> Result<Self> {
        match pem.label() {
            Label::PrivateKey => {
                let bytes: Vec<u8> = pem.decode()?;
                PrivateKey::from_pkcs8_der(&bytes)
            }
            Label::RSAPrivateKey => {
                let key = RSAPrivateKey::from_pem(pem)?;
                key.validate()?;
                Ok(PrivateKey::Rsa(key))
            }
            other => Err(Error::UnexpectedLabel(other)),
        }
    }
}
