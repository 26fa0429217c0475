//! AlgorithmIdentifier type
//!
//! Defined in [RFC 5280 Section 4.1.1.2](https://datatracker.ietf.org/doc/html/rfc5280#section-4.1.1.2)

use sigkey::decoder::{DecodableFrom, Decoder};
use sigkey::encoder::{EncodableTo, Encoder};
use sigkey_asn1::{Element, ObjectIdentifier};

pub mod error;

pub use error::{Error, Result};

/*
AlgorithmIdentifier  ::=  SEQUENCE  {
    algorithm               OBJECT IDENTIFIER,
    parameters              ANY DEFINED BY algorithm OPTIONAL  }
*/

/// Parameters field in AlgorithmIdentifier
///
/// Wrapped in Option:
/// - None: field not present (EdDSA, X25519)
/// - Some(AlgorithmParameters::Null): explicit NULL (RSA)
/// - Some(AlgorithmParameters::Other(_)): anything else, e.g. an EC curve OID
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmParameters {
    Null,
    Other(Element),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub algorithm: ObjectIdentifier,
    pub parameters: Option<AlgorithmParameters>,
}

impl AlgorithmIdentifier {
    // RFC 8017
    pub const OID_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.1";
    // RFC 5480
    pub const OID_EC_PUBLIC_KEY: &'static str = "1.2.840.10045.2.1";
    // RFC 3279
    pub const OID_ID_DSA: &'static str = "1.2.840.10040.4.1";
    // RFC 8410
    pub const OID_X25519: &'static str = "1.3.101.110";
    pub const OID_X448: &'static str = "1.3.101.111";
    pub const OID_ED25519: &'static str = "1.3.101.112";
    pub const OID_ED448: &'static str = "1.3.101.113";

    pub fn new(algorithm: ObjectIdentifier, parameters: Option<AlgorithmParameters>) -> Self {
        AlgorithmIdentifier {
            algorithm,
            parameters,
        }
    }
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence);
        };
        let algorithm = match elements.first() {
            Some(Element::ObjectIdentifier(oid)) => oid.clone(),
            Some(_) => return Err(Error::ExpectedOidForAlgorithm),
            None => return Err(Error::EmptyAlgorithmIdentifier),
        };
        if elements.len() > 2 {
            return Err(Error::TooManyElements);
        }

        let parameters = match elements.get(1) {
            Some(Element::Null) => Some(AlgorithmParameters::Null),
            Some(other) => Some(AlgorithmParameters::Other(other.clone())),
            None => None,
        };

        Ok(AlgorithmIdentifier {
            algorithm,
            parameters,
        })
    }
}

impl EncodableTo<AlgorithmIdentifier> for Element {}

impl Encoder<AlgorithmIdentifier, Element> for AlgorithmIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let params_elem = self.parameters.as_ref().map(|params| match params {
            AlgorithmParameters::Null => Element::Null,
            AlgorithmParameters::Other(element) => element.clone(),
        });

        let elements: Vec<_> = std::iter::once(Element::ObjectIdentifier(self.algorithm.clone()))
            .chain(params_elem)
            .collect();

        Ok(Element::Sequence(elements))
    }
}
