use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use sigkey::decoder::{DecodableFrom, Decoder};
use sigkey::encoder::{EncodableTo, Encoder};
use sigkey_asn1::{ASN1Object, Element, Integer};
use sigkey_der::Der;
use sigkey_pem::{FromPem, Label, Pem, ToPem};

use super::error::{Error, Result};
use crate::private_key::{KeyAlgorithm, PrivateKeyExt};

/*
RFC 8017 - PKCS #1: RSA Cryptography Specifications

RSAPrivateKey ::= SEQUENCE {
    version           Version,
    modulus           INTEGER,  -- n
    publicExponent    INTEGER,  -- e
    privateExponent   INTEGER,  -- d
    prime1            INTEGER,  -- p
    prime2            INTEGER,  -- q
    exponent1         INTEGER,  -- d mod (p-1)
    exponent2         INTEGER,  -- d mod (q-1)
    coefficient       INTEGER,  -- (inverse of q) mod p
    otherPrimeInfos   OtherPrimeInfos OPTIONAL
}

Version ::= INTEGER { two-prime(0), multi(1) }
    (CONSTRAINED BY {-- version must be multi if otherPrimeInfos present --})
*/

/// PKCS#1 RSAPrivateKey version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    TwoPrime = 0,
    Multi = 1,
}

impl From<Version> for Integer {
    fn from(v: Version) -> Self {
        Integer::from(v as u64)
    }
}

impl TryFrom<&Integer> for Version {
    type Error = Error;

    fn try_from(value: &Integer) -> Result<Self> {
        match value.to_u64() {
            Some(0) => Ok(Version::TwoPrime),
            Some(1) => Ok(Version::Multi),
            _ => Err(Error::InvalidVersion(value.to_string())),
        }
    }
}

impl DecodableFrom<Element> for Version {}

impl Decoder<Element, Version> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Version> {
        match self {
            Element::Integer(int) => Version::try_from(int),
            _ => Err(Error::ExpectedInteger { field: "version" }),
        }
    }
}

/// PKCS#1 RSA Private Key structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RSAPrivateKey {
    pub version: Version,
    pub modulus: Integer,          // n
    pub public_exponent: Integer,  // e
    pub private_exponent: Integer, // d
    pub prime1: Integer,           // p
    pub prime2: Integer,           // q
    pub exponent1: Integer,        // d mod (p-1)
    pub exponent2: Integer,        // d mod (q-1)
    pub coefficient: Integer,      // (inverse of q) mod p
}

impl RSAPrivateKey {
    /// Parses a DER encoded `RSAPrivateKey`.
    ///
    /// The input must hold exactly one element. The key is not validated;
    /// call [`RSAPrivateKey::validate`] for that.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let der: Der = bytes.decode()?;
        let asn1_obj: ASN1Object = der.decode()?;
        match asn1_obj.elements() {
            [element] => element.decode(),
            [] => Err(Error::EmptyAsn1Object),
            _ => Err(Error::TrailingData),
        }
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        let element: Element = self.encode()?;
        let der: Der = ASN1Object::new(vec![element]).encode()?;
        Ok(der.encode()?)
    }

    /// Checks the internal consistency of a two-prime key.
    ///
    /// The modulus must be the product of the primes, `d` must invert `e`
    /// modulo `p-1` and `q-1`, and the stored CRT values must match the ones
    /// derived from `d`, `p` and `q`.
    pub fn validate(&self) -> Result<()> {
        if self.version != Version::TwoPrime {
            return Err(Error::UnsupportedMultiPrime);
        }

        let n = self.modulus.as_bigint();
        let e = self.public_exponent.as_bigint();
        let d = self.private_exponent.as_bigint();
        let p = self.prime1.as_bigint();
        let q = self.prime2.as_bigint();
        let one = BigInt::one();

        if !n.is_positive() {
            return Err(Error::InvalidKey("modulus must be positive"));
        }
        if *e <= one {
            return Err(Error::InvalidKey("public exponent must be greater than 1"));
        }
        if !d.is_positive() {
            return Err(Error::InvalidKey("private exponent must be positive"));
        }
        if *p <= one || *q <= one {
            return Err(Error::InvalidKey("primes must be greater than 1"));
        }
        if p * q != *n {
            return Err(Error::InvalidKey("modulus does not match primes"));
        }

        let p1 = p - &one;
        let q1 = q - &one;
        let de1 = d * e - &one;
        if !(&de1 % &p1).is_zero() || !(&de1 % &q1).is_zero() {
            return Err(Error::InvalidKey("private exponent does not invert public exponent"));
        }

        if *self.exponent1.as_bigint() != d % &p1 {
            return Err(Error::InvalidKey("exponent1 does not match d mod (p-1)"));
        }
        if *self.exponent2.as_bigint() != d % &q1 {
            return Err(Error::InvalidKey("exponent2 does not match d mod (q-1)"));
        }
        let qinv = self.coefficient.as_bigint();
        if qinv.is_negative() || qinv >= p || !((qinv * q - &one) % p).is_zero() {
            return Err(Error::InvalidKey("coefficient is not the inverse of q mod p"));
        }

        Ok(())
    }
}

impl PrivateKeyExt for RSAPrivateKey {
    fn key_size(&self) -> u32 {
        u32::try_from(self.modulus.bits()).unwrap_or(u32::MAX)
    }

    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Rsa
    }
}

impl DecodableFrom<Element> for RSAPrivateKey {}

impl Decoder<Element, RSAPrivateKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RSAPrivateKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence);
        };

        let version: Version = elements
            .first()
            .ok_or(Error::InvalidElementCount {
                expected: "9",
                actual: 0,
            })?
            .decode()?;
        // otherPrimeInfos only exists in multi-prime keys
        if version == Version::Multi || elements.len() > 9 {
            return Err(Error::UnsupportedMultiPrime);
        }
        if elements.len() != 9 {
            return Err(Error::InvalidElementCount {
                expected: "9",
                actual: elements.len(),
            });
        }

        let get_integer = |idx: usize, field: &'static str| -> Result<Integer> {
            match &elements[idx] {
                Element::Integer(int) => Ok(int.clone()),
                _ => Err(Error::ExpectedInteger { field }),
            }
        };

        Ok(RSAPrivateKey {
            version,
            modulus: get_integer(1, "modulus")?,
            public_exponent: get_integer(2, "publicExponent")?,
            private_exponent: get_integer(3, "privateExponent")?,
            prime1: get_integer(4, "prime1")?,
            prime2: get_integer(5, "prime2")?,
            exponent1: get_integer(6, "exponent1")?,
            exponent2: get_integer(7, "exponent2")?,
            coefficient: get_integer(8, "coefficient")?,
        })
    }
}

impl EncodableTo<RSAPrivateKey> for Element {}

impl Encoder<RSAPrivateKey, Element> for RSAPrivateKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::Integer(self.version.into()),
            Element::Integer(self.modulus.clone()),
            Element::Integer(self.public_exponent.clone()),
            Element::Integer(self.private_exponent.clone()),
            Element::Integer(self.prime1.clone()),
            Element::Integer(self.prime2.clone()),
            Element::Integer(self.exponent1.clone()),
            Element::Integer(self.exponent2.clone()),
            Element::Integer(self.coefficient.clone()),
        ]))
    }
}

impl ToPem for RSAPrivateKey {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::RSAPrivateKey
    }

    fn to_pem(&self) -> Result<Pem> {
        Ok(Pem::from_bytes(self.pem_label(), &self.to_der()?))
    }
}

impl FromPem for RSAPrivateKey {
    type Error = Error;

    fn expected_label() -> Label {
        Label::RSAPrivateKey
    }

    fn from_pem(pem: &Pem) -> Result<Self> {
        pem.decode()
    }
}

impl DecodableFrom<Pem> for RSAPrivateKey {}

impl Decoder<Pem, RSAPrivateKey> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<RSAPrivateKey> {
        if self.label() != Label::RSAPrivateKey {
            return Err(Error::UnexpectedLabel {
                expected: "RSA PRIVATE KEY",
            });
        }
        let bytes: Vec<u8> = self.decode()?;
        RSAPrivateKey::from_der(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;
    use sigkey::decoder::Decoder;
    use sigkey::encoder::Encoder;
    use sigkey_asn1::{Element, Integer};
    use sigkey_pem::{Pem, ToPem};

    use super::{Error, RSAPrivateKey, Version};
    use crate::private_key::PrivateKeyExt;

    const RSA2048_PEM: &str = include_str!("../../../testdata/rsa2048.pem");

    // p = 61, q = 53, e = 17
    fn toy_key() -> RSAPrivateKey {
        RSAPrivateKey {
            version: Version::TwoPrime,
            modulus: Integer::from(3233u64),
            public_exponent: Integer::from(17u64),
            private_exponent: Integer::from(2753u64),
            prime1: Integer::from(61u64),
            prime2: Integer::from(53u64),
            exponent1: Integer::from(53u64),
            exponent2: Integer::from(49u64),
            coefficient: Integer::from(38u64),
        }
    }

    fn rsa2048() -> RSAPrivateKey {
        let pem = Pem::from_str(RSA2048_PEM).unwrap();
        pem.decode().unwrap()
    }

    #[test]
    fn test_decode_rsa2048_pem() {
        let key = rsa2048();
        assert_eq!(Version::TwoPrime, key.version);
        assert_eq!(2048, key.key_size());
        assert_eq!(Some(65537), key.public_exponent.to_u64());
        key.validate().unwrap();
    }

    #[test]
    fn test_rsa2048_pem_round_trip() {
        let key = rsa2048();
        let pem = key.to_pem().unwrap();
        assert_eq!(RSA2048_PEM.trim_end(), pem.to_string());
    }

    #[test]
    fn test_toy_key_validates() {
        toy_key().validate().unwrap();
    }

    #[test]
    fn test_decode_is_deterministic() {
        let der = toy_key().to_der().unwrap();
        let a = RSAPrivateKey::from_der(&der).unwrap();
        let b = RSAPrivateKey::from_der(&der).unwrap();
        assert_eq!(a, b);
        assert_eq!(toy_key(), a);
    }

    #[rstest]
    #[case::modulus(|k: &mut RSAPrivateKey| k.modulus = Integer::from(3235u64), "modulus does not match primes")]
    #[case::private_exponent(|k: &mut RSAPrivateKey| k.private_exponent = Integer::from(2754u64), "private exponent does not invert public exponent")]
    #[case::public_exponent(|k: &mut RSAPrivateKey| k.public_exponent = Integer::from(1u64), "public exponent must be greater than 1")]
    #[case::exponent1(|k: &mut RSAPrivateKey| k.exponent1 = Integer::from(52u64), "exponent1 does not match d mod (p-1)")]
    #[case::exponent2(|k: &mut RSAPrivateKey| k.exponent2 = Integer::from(48u64), "exponent2 does not match d mod (q-1)")]
    #[case::coefficient(|k: &mut RSAPrivateKey| k.coefficient = Integer::from(37u64), "coefficient is not the inverse of q mod p")]
    #[case::coefficient_out_of_range(|k: &mut RSAPrivateKey| k.coefficient = Integer::from(99u64), "coefficient is not the inverse of q mod p")]
    #[case::zero_prime(|k: &mut RSAPrivateKey| k.prime2 = Integer::from(0u64), "primes must be greater than 1")]
    fn test_validate_rejects(#[case] tamper: fn(&mut RSAPrivateKey), #[case] reason: &str) {
        let mut key = toy_key();
        tamper(&mut key);
        match key.validate() {
            Err(Error::InvalidKey(r)) => assert_eq!(reason, r),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_multi_prime_version() {
        let mut key = toy_key();
        key.version = Version::Multi;
        assert!(matches!(key.validate(), Err(Error::UnsupportedMultiPrime)));
    }

    #[rstest]
    #[case::not_sequence(Element::Null)]
    #[case::too_few(Element::Sequence(vec![Element::Integer(Integer::from(0u64)), Element::Integer(Integer::from(3233u64))]))]
    #[case::bad_version(Element::Sequence(vec![Element::Integer(Integer::from(2u64))]))]
    #[case::empty(Element::Sequence(vec![]))]
    fn test_decode_rejects_structure(#[case] element: Element) {
        let result: Result<RSAPrivateKey, Error> = element.decode();
        assert!(matches!(
            result,
            Err(Error::ExpectedSequence
                | Error::InvalidElementCount { .. }
                | Error::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_decode_rejects_other_prime_infos() {
        let Element::Sequence(mut elements) = toy_key().encode().unwrap() else {
            unreachable!()
        };
        elements[0] = Element::Integer(Integer::from(1u64));
        elements.push(Element::Sequence(vec![]));
        let result: Result<RSAPrivateKey, Error> = Element::Sequence(elements).decode();
        assert!(matches!(result, Err(Error::UnsupportedMultiPrime)));
    }

    #[test]
    fn test_decode_rejects_non_integer_field() {
        let Element::Sequence(mut elements) = toy_key().encode().unwrap() else {
            unreachable!()
        };
        elements[4] = Element::Null;
        let result: Result<RSAPrivateKey, Error> = Element::Sequence(elements).decode();
        assert!(matches!(
            result,
            Err(Error::ExpectedInteger { field: "prime1" })
        ));
    }

    #[test]
    fn test_from_der_rejects_trailing_data() {
        let mut der = toy_key().to_der().unwrap();
        der.extend_from_slice(&[0x05, 0x00]);
        assert!(matches!(
            RSAPrivateKey::from_der(&der),
            Err(Error::TrailingData)
        ));
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::truncated(&[0x30, 0x82, 0x01])]
    fn test_from_der_rejects_bad_input(#[case] input: &[u8]) {
        assert!(RSAPrivateKey::from_der(input).is_err());
    }

    #[test]
    fn test_decode_pem_wrong_label() {
        let pem = Pem::from_bytes(sigkey_pem::Label::PrivateKey, &toy_key().to_der().unwrap());
        let result: Result<RSAPrivateKey, Error> = pem.decode();
        assert!(matches!(result, Err(Error::UnexpectedLabel { .. })));
    }
}
