use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

pub const NAME: &str = "scrypt";
pub const KEY_LEN: usize = 32;
pub const SALT_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptParams {
    #[serde(rename = "N")]
    pub n: u64,
    pub r: u64,
    pub p: u64,
}

impl ScryptParams {
    /// Parameters written by sigstore tooling by default.
    pub const LEGACY: ScryptParams = ScryptParams { n: 1 << 15, r: 8, p: 1 };
    pub const STANDARD: ScryptParams = ScryptParams { n: 1 << 16, r: 8, p: 1 };
    /// Parameters following the OWASP recommendation.
    pub const OWASP: ScryptParams = ScryptParams { n: 1 << 17, r: 8, p: 1 };

    const ACCEPTED: [ScryptParams; 3] = [Self::LEGACY, Self::STANDARD, Self::OWASP];

    /// Only the known parameter sets are accepted, weaker or stronger.
    pub fn check(&self) -> Result<()> {
        if Self::ACCEPTED.contains(self) {
            return Ok(());
        }
        Err(Error::UnsupportedKdfParams {
            n: self.n,
            r: self.r,
            p: self.p,
        })
    }

    fn to_scrypt(self) -> Result<scrypt::Params> {
        self.check()?;
        let log_n = self.n.trailing_zeros() as u8;
        let r = u32::try_from(self.r).map_err(|e| Error::Kdf(e.to_string()))?;
        let p = u32::try_from(self.p).map_err(|e| Error::Kdf(e.to_string()))?;
        scrypt::Params::new(log_n, r, p, KEY_LEN).map_err(|e| Error::Kdf(e.to_string()))
    }
}

impl Default for ScryptParams {
    fn default() -> Self {
        Self::LEGACY
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptKdf {
    pub name: String,
    pub params: ScryptParams,
    #[serde(with = "crate::base64_bytes")]
    pub salt: Vec<u8>,
}

impl ScryptKdf {
    /// Fresh KDF settings with a random salt.
    pub fn new(params: ScryptParams) -> Result<Self> {
        params.check()?;
        let mut salt = vec![0u8; SALT_LEN];
        OsRng.try_fill_bytes(&mut salt)?;
        Ok(ScryptKdf {
            name: NAME.to_string(),
            params,
            salt,
        })
    }

    pub fn check(&self) -> Result<()> {
        if self.name != NAME {
            return Err(Error::UnknownKdf(self.name.clone()));
        }
        self.params.check()
    }

    pub fn derive_key(&self, password: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        self.check()?;
        let params = self.params.to_scrypt()?;
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        scrypt::scrypt(password, &self.salt, &params, key.as_mut_slice())
            .map_err(|e| Error::Kdf(e.to_string()))?;
        Ok(key)
    }
}
