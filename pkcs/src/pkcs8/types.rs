use sigkey::decoder::{DecodableFrom, Decoder};
use sigkey::encoder::{EncodableTo, Encoder};
use sigkey_asn1::{ASN1Object, BitString, Element, Integer, OctetString};
use sigkey_der::Der;

use super::error::{Error, Result};
use crate::algorithm::AlgorithmIdentifier;

/*
RFC 5958 - Asymmetric Key Packages

OneAsymmetricKey ::= SEQUENCE {
    version                   Version,
    privateKeyAlgorithm       PrivateKeyAlgorithmIdentifier,
    privateKey                PrivateKey,
    attributes            [0] Attributes OPTIONAL,
    ...,
    [[2: publicKey        [1] PublicKey OPTIONAL ]],
    ...
}

PrivateKeyInfo ::= OneAsymmetricKey

Version ::= INTEGER { v1(0), v2(1) } (v1, ..., v2)

PrivateKeyAlgorithmIdentifier ::= AlgorithmIdentifier

PrivateKey ::= OCTET STRING

PublicKey ::= BIT STRING

Attributes ::= SET OF Attribute
*/

/// PKCS#8 OneAsymmetricKey version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// Version 1 (no public key)
    V1 = 0,
    /// Version 2 (with public key)
    V2 = 1,
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
            Some(0) => Ok(Version::V1),
            Some(1) => Ok(Version::V2),
            _ => Err(Error::InvalidVersion(value.to_string())),
        }
    }
}

/// OneAsymmetricKey (PKCS#8 v2)
///
/// `attributes` keeps every `Attribute` of the `[0]` set as is; nothing here
/// interprets them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneAsymmetricKey {
    pub version: Version,
    pub private_key_algorithm: AlgorithmIdentifier,
    /// Algorithm specific encoding, e.g. a DER `RSAPrivateKey`
    pub private_key: OctetString,
    pub attributes: Option<Vec<Element>>,
    pub public_key: Option<BitString>,
}

/// PrivateKeyInfo (PKCS#8 v1 compatibility)
pub type PrivateKeyInfo = OneAsymmetricKey;

impl OneAsymmetricKey {
    pub fn new(private_key_algorithm: AlgorithmIdentifier, private_key: OctetString) -> Self {
        OneAsymmetricKey {
            version: Version::V1,
            private_key_algorithm,
            private_key,
            attributes: None,
            public_key: None,
        }
    }

    /// Parses a DER encoded `OneAsymmetricKey`. Exactly one element is allowed.
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
}

impl DecodableFrom<Element> for OneAsymmetricKey {}

impl Decoder<Element, OneAsymmetricKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<OneAsymmetricKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence);
        };
        let [version, algorithm, private_key, optional @ ..] = elements.as_slice() else {
            return Err(Error::TooFewElements(elements.len()));
        };

        let Element::Integer(version) = version else {
            return Err(Error::ExpectedVersion);
        };
        let version = Version::try_from(version)?;

        let private_key_algorithm: AlgorithmIdentifier = algorithm.decode()?;

        let Element::OctetString(private_key) = private_key else {
            return Err(Error::ExpectedOctetString);
        };

        // [0] attributes then [1] publicKey, each at most once and in order
        let (attributes, public_key) = optional.iter().try_fold(
            (None, None),
            |(attrs, pubkey): (Option<Vec<Element>>, Option<BitString>), elem| -> Result<_> {
                match elem {
                    Element::ContextSpecific {
                        slot: 0,
                        constructed: true,
                        elements,
                    } if attrs.is_none() && pubkey.is_none() => Ok((Some(elements.clone()), pubkey)),
                    Element::ContextSpecific {
                        slot: 1,
                        constructed: false,
                        elements,
                    } if pubkey.is_none() => match elements.as_slice() {
                        [Element::OctetString(raw)] => {
                            let bits = BitString::try_from(raw.as_bytes())?;
                            Ok((attrs, Some(bits)))
                        }
                        _ => Err(Error::UnexpectedElement(elem.to_string())),
                    },
                    other => Err(Error::UnexpectedElement(other.to_string())),
                }
            },
        )?;

        Ok(OneAsymmetricKey {
            version,
            private_key_algorithm,
            private_key: private_key.clone(),
            attributes,
            public_key,
        })
    }
}

impl EncodableTo<OneAsymmetricKey> for Element {}

impl Encoder<OneAsymmetricKey, Element> for OneAsymmetricKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![
            Element::Integer(self.version.into()),
            self.private_key_algorithm.encode()?,
            Element::OctetString(self.private_key.clone()),
        ];
        if let Some(attributes) = &self.attributes {
            elements.push(Element::ContextSpecific {
                slot: 0,
                constructed: true,
                elements: attributes.clone(),
            });
        }
        if let Some(public_key) = &self.public_key {
            elements.push(Element::ContextSpecific {
                slot: 1,
                constructed: false,
                elements: vec![Element::BitString(public_key.clone())],
            });
        }
        Ok(Element::Sequence(elements))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;
    use sigkey::decoder::Decoder;
    use sigkey_asn1::{BitString, Element, Integer, ObjectIdentifier, OctetString};

    use super::{Error, OneAsymmetricKey, Version};
    use crate::algorithm::{AlgorithmIdentifier, AlgorithmParameters};

    const RSA2048_PK8: &[u8] = include_bytes!("../../../testdata/rsa2048.pk8.der");
    const EC_P256_PK8: &[u8] = include_bytes!("../../../testdata/ec-p256.pk8.der");
    const ED25519_PK8: &[u8] = include_bytes!("../../../testdata/ed25519.pk8.der");

    fn ed25519_algorithm() -> AlgorithmIdentifier {
        AlgorithmIdentifier::new(
            ObjectIdentifier::from_str(AlgorithmIdentifier::OID_ED25519).unwrap(),
            None,
        )
    }

    #[test]
    fn test_decode_rsa() {
        let key = OneAsymmetricKey::from_der(RSA2048_PK8).unwrap();
        assert_eq!(Version::V1, key.version);
        assert_eq!(
            key.private_key_algorithm.algorithm,
            AlgorithmIdentifier::OID_RSA_ENCRYPTION
        );
        assert_eq!(
            Some(AlgorithmParameters::Null),
            key.private_key_algorithm.parameters
        );
        assert_eq!(0x30, key.private_key.as_bytes()[0]);
        assert!(key.attributes.is_none());
        assert!(key.public_key.is_none());
    }

    #[test]
    fn test_decode_ec() {
        let key = OneAsymmetricKey::from_der(EC_P256_PK8).unwrap();
        assert_eq!(
            key.private_key_algorithm.algorithm,
            AlgorithmIdentifier::OID_EC_PUBLIC_KEY
        );
        let Some(AlgorithmParameters::Other(Element::ObjectIdentifier(curve))) =
            &key.private_key_algorithm.parameters
        else {
            panic!("expected named curve");
        };
        assert_eq!(*curve, "1.2.840.10045.3.1.7");
    }

    #[test]
    fn test_decode_ed25519() {
        let key = OneAsymmetricKey::from_der(ED25519_PK8).unwrap();
        assert_eq!(ed25519_algorithm(), key.private_key_algorithm);
    }

    #[rstest(input, case(RSA2048_PK8), case(EC_P256_PK8), case(ED25519_PK8))]
    fn test_encode_reproduces_der(input: &[u8]) {
        let key = OneAsymmetricKey::from_der(input).unwrap();
        assert_eq!(input, key.to_der().unwrap().as_slice());
    }

    #[test]
    fn test_optional_fields_round_trip() {
        let mut key = OneAsymmetricKey::new(ed25519_algorithm(), OctetString::from(vec![0x04, 0x01, 0xaa]));
        key.version = Version::V2;
        key.attributes = Some(vec![]);
        key.public_key = Some(BitString::new(0, vec![0x01, 0x02, 0x03]));

        let der = key.to_der().unwrap();
        let decoded = OneAsymmetricKey::from_der(&der).unwrap();
        assert_eq!(key, decoded);
    }

    #[rstest]
    #[case::not_sequence(Element::Null)]
    #[case::too_few(Element::Sequence(vec![Element::Integer(Integer::from(0u64))]))]
    #[case::bad_version(Element::Sequence(vec![
        Element::Integer(Integer::from(2u64)),
        Element::Sequence(vec![Element::ObjectIdentifier(ObjectIdentifier::from_str(AlgorithmIdentifier::OID_ED25519).unwrap())]),
        Element::OctetString(OctetString::from(vec![0x00])),
    ]))]
    #[case::private_key_not_octet_string(Element::Sequence(vec![
        Element::Integer(Integer::from(0u64)),
        Element::Sequence(vec![Element::ObjectIdentifier(ObjectIdentifier::from_str(AlgorithmIdentifier::OID_ED25519).unwrap())]),
        Element::Null,
    ]))]
    #[case::algorithm_not_sequence(Element::Sequence(vec![
        Element::Integer(Integer::from(0u64)),
        Element::Null,
        Element::OctetString(OctetString::from(vec![0x00])),
    ]))]
    #[case::unexpected_trailing_element(Element::Sequence(vec![
        Element::Integer(Integer::from(0u64)),
        Element::Sequence(vec![Element::ObjectIdentifier(ObjectIdentifier::from_str(AlgorithmIdentifier::OID_ED25519).unwrap())]),
        Element::OctetString(OctetString::from(vec![0x00])),
        Element::Null,
    ]))]
    fn test_decode_rejects(#[case] element: Element) {
        let result: Result<OneAsymmetricKey, Error> = element.decode();
        assert!(result.is_err());
    }

    fn attribute(oid: &str, value: Element) -> Element {
        Element::Sequence(vec![
            Element::ObjectIdentifier(ObjectIdentifier::from_str(oid).unwrap()),
            Element::Set(vec![value]),
        ])
    }

    #[rstest]
    #[case::none(vec![])]
    #[case::friendly_name(vec![
        attribute("1.2.840.113549.1.9.20", Element::OctetString(OctetString::from(b"cosign".to_vec()))),
    ])]
    #[case::friendly_name_and_local_key_id(vec![
        attribute("1.2.840.113549.1.9.20", Element::OctetString(OctetString::from(b"cosign".to_vec()))),
        attribute("1.2.840.113549.1.9.21", Element::OctetString(OctetString::from(vec![0x01, 0x02, 0x03, 0x04]))),
    ])]
    fn test_decode_attributes(#[case] attributes: Vec<Element>) {
        let mut key = OneAsymmetricKey::from_der(RSA2048_PK8).unwrap();
        key.attributes = Some(attributes.clone());
        let der = key.to_der().unwrap();

        let decoded = OneAsymmetricKey::from_der(&der).unwrap();
        assert_eq!(Some(attributes), decoded.attributes);
        assert_eq!(key.private_key, decoded.private_key);
        assert_eq!(der, decoded.to_der().unwrap());
    }

    #[test]
    fn test_from_der_rejects_trailing_data() {
        let mut der = RSA2048_PK8.to_vec();
        der.extend_from_slice(&[0x05, 0x00]);
        assert!(matches!(
            OneAsymmetricKey::from_der(&der),
            Err(Error::TrailingData)
        ));
    }

    #[test]
    fn test_from_der_rejects_truncated() {
        let der = &RSA2048_PK8[..RSA2048_PK8.len() - 1];
        assert!(matches!(
            OneAsymmetricKey::from_der(der),
            Err(Error::InvalidDer(_))
        ));
    }
}
