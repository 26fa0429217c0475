//! Private key structures.
//!
//! - [`pkcs8`]: `OneAsymmetricKey` / `PrivateKeyInfo` (RFC 5958)
//! - [`pkcs1`]: `RSAPrivateKey` (RFC 8017)
//! - [`PrivateKey`]: algorithm dispatch over the PKCS#8 wrapper
//!
//! ```ignore
//! let key = PrivateKey::from_pkcs8_der(&plaintext)?;
//! println!("{}", key.to_pem()?);
//! ```

pub mod algorithm;
pub mod error;
pub mod pkcs1;
pub mod pkcs8;
mod private_key;

pub use algorithm::{AlgorithmIdentifier, AlgorithmParameters};
pub use error::{Error, Result};
pub use private_key::{KeyAlgorithm, PrivateKey, PrivateKeyExt};
