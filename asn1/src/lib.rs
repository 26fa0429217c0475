use std::{fmt::Display, str::FromStr};

use error::Error;
use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive};
use sigkey::decoder::{DecodableFrom, Decoder};
use sigkey::encoder::{EncodableTo, Encoder};
use sigkey_der::{Der, PrimitiveTag, TAG_CONSTRUCTED, Tag, Tlv};

pub mod error;

#[derive(Debug, Clone)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;
    fn decode(&self) -> Result<ASN1Object, Error> {
        let mut elements = Vec::new();
        for tlv in self.elements() {
            let element = Element::try_from(tlv)?;
            elements.push(element);
        }
        Ok(ASN1Object { elements })
    }
}

impl EncodableTo<ASN1Object> for Der {}

impl Encoder<ASN1Object, Der> for ASN1Object {
    type Error = Error;

    fn encode(&self) -> Result<Der, Self::Error> {
        let mut tlvs = Vec::new();
        for element in &self.elements {
            tlvs.push(element.encode()?);
        }
        Ok(Der::new(tlvs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    /// `[n]` tagged value.
    ///
    /// Constructed tags keep every child in order: one for EXPLICIT tagging,
    /// any number for an IMPLICIT `SET OF` or `SEQUENCE OF`. Primitive tags
    /// hold a single `OctetString` with the raw contents.
    ContextSpecific {
        slot: u8,
        constructed: bool,
        elements: Vec<Element>,
    },
    Unimplemented(Tlv),
}

fn primitive_data<'a>(tlv: &'a Tlv, name: &'static str) -> Result<&'a [u8], Error> {
    tlv.data().ok_or(Error::UnexpectedConstructed(name))
}

fn constructed_elements(tlv: &Tlv, name: &'static str) -> Result<Vec<Element>, Error> {
    let tlvs = tlv.tlvs().ok_or(Error::UnexpectedPrimitive(name))?;
    tlvs.iter().map(Element::try_from).collect()
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        match tlv.tag() {
            Tag::Primitive(primitive_tag, _value) => match primitive_tag {
                PrimitiveTag::Boolean => match primitive_data(tlv, "BOOLEAN")? {
                    [0x00] => Ok(Element::Boolean(false)),
                    [0xff] => Ok(Element::Boolean(true)),
                    _ => Err(Error::InvalidBoolean),
                },
                PrimitiveTag::Integer => {
                    let integer = Integer::try_from(primitive_data(tlv, "INTEGER")?)?;
                    Ok(Element::Integer(integer))
                }
                PrimitiveTag::BitString => {
                    let bit_string = BitString::try_from(primitive_data(tlv, "BIT STRING")?)?;
                    Ok(Element::BitString(bit_string))
                }
                PrimitiveTag::OctetString => {
                    let data = primitive_data(tlv, "OCTET STRING")?;
                    Ok(Element::OctetString(OctetString::from(data)))
                }
                PrimitiveTag::Null => {
                    if !primitive_data(tlv, "NULL")?.is_empty() {
                        return Err(Error::NullWithContents);
                    }
                    Ok(Element::Null)
                }
                PrimitiveTag::ObjectIdentifier => {
                    let oid = ObjectIdentifier::try_from(primitive_data(tlv, "OBJECT IDENTIFIER")?)?;
                    Ok(Element::ObjectIdentifier(oid))
                }
                PrimitiveTag::Sequence => Ok(Element::Sequence(constructed_elements(tlv, "SEQUENCE")?)),
                PrimitiveTag::Set => Ok(Element::Set(constructed_elements(tlv, "SET")?)),
                PrimitiveTag::Unimplemented(_) => Ok(Element::Unimplemented(tlv.clone())),
            },
            Tag::ContextSpecific { slot, constructed } => {
                if *constructed {
                    Ok(Element::ContextSpecific {
                        slot: *slot,
                        constructed: true,
                        elements: constructed_elements(tlv, "context-specific")?,
                    })
                } else {
                    // IMPLICIT tagging: the upper layer interprets the raw contents
                    let data = tlv.data().ok_or_else(|| Error::InvalidContextSpecific {
                        slot: *slot,
                        msg: "context-specific primitive has no data".to_string(),
                    })?;
                    Ok(Element::ContextSpecific {
                        slot: *slot,
                        constructed: false,
                        elements: vec![Element::OctetString(OctetString::from(data))],
                    })
                }
            }
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Boolean(b) => write!(f, "Boolean({})", b),
            Element::Integer(i) => write!(f, "Integer({})", i),
            Element::BitString(bs) => write!(f, "BitString({} bits)", bs.bit_len()),
            Element::OctetString(os) => write!(f, "OctetString({} bytes)", os.as_bytes().len()),
            Element::Null => write!(f, "Null"),
            Element::ObjectIdentifier(oid) => write!(f, "ObjectIdentifier({})", oid),
            Element::Sequence(seq) => write!(f, "Sequence({} elements)", seq.len()),
            Element::Set(set) => write!(f, "Set({} elements)", set.len()),
            Element::ContextSpecific {
                slot,
                constructed,
                elements,
            } => {
                write!(
                    f,
                    "ContextSpecific(slot: {}, constructed: {}, {} elements)",
                    slot,
                    constructed,
                    elements.len()
                )
            }
            Element::Unimplemented(tlv) => write!(f, "Unimplemented({:?})", tlv.tag()),
        }
    }
}

fn universal(tag: PrimitiveTag) -> Tag {
    Tag::Primitive(tag, u8::from(&tag))
}

fn universal_constructed(tag: PrimitiveTag) -> Tag {
    Tag::Primitive(tag, u8::from(&tag) | TAG_CONSTRUCTED)
}

impl TryFrom<&Element> for Tlv {
    type Error = Error;

    fn try_from(element: &Element) -> Result<Self, Self::Error> {
        match element {
            Element::Boolean(b) => {
                let data = vec![if *b { 0xFF } else { 0x00 }];
                Ok(Tlv::new_primitive(universal(PrimitiveTag::Boolean), data))
            }
            Element::Integer(i) => {
                let data = i.as_bigint().to_signed_bytes_be();
                Ok(Tlv::new_primitive(universal(PrimitiveTag::Integer), data))
            }
            Element::BitString(bs) => {
                let mut data = Vec::with_capacity(bs.as_bytes().len() + 1);
                data.push(bs.unused_bits());
                data.extend_from_slice(bs.as_bytes());
                Ok(Tlv::new_primitive(universal(PrimitiveTag::BitString), data))
            }
            Element::OctetString(os) => Ok(Tlv::new_primitive(
                universal(PrimitiveTag::OctetString),
                os.as_bytes().to_vec(),
            )),
            Element::Null => Ok(Tlv::new_primitive(universal(PrimitiveTag::Null), vec![])),
            Element::ObjectIdentifier(oid) => {
                let data = Vec::try_from(oid)?;
                Ok(Tlv::new_primitive(universal(PrimitiveTag::ObjectIdentifier), data))
            }
            Element::Sequence(elements) => {
                let tlvs = elements
                    .iter()
                    .map(Tlv::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Tlv::new_constructed(universal_constructed(PrimitiveTag::Sequence), tlvs))
            }
            Element::Set(elements) => {
                let tlvs = elements
                    .iter()
                    .map(Tlv::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Tlv::new_constructed(universal_constructed(PrimitiveTag::Set), tlvs))
            }
            Element::ContextSpecific {
                slot,
                constructed,
                elements,
            } => {
                let tag = Tag::ContextSpecific {
                    slot: *slot,
                    constructed: *constructed,
                };

                if *constructed {
                    let tlvs = elements
                        .iter()
                        .map(Tlv::try_from)
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Tlv::new_constructed(tag, tlvs))
                } else {
                    let [element] = elements.as_slice() else {
                        return Err(Error::ElementCannotEncode("IMPLICIT primitive without exactly one element"));
                    };
                    let inner_tlv = Tlv::try_from(element)?;
                    let data = inner_tlv
                        .data()
                        .ok_or(Error::ElementCannotEncode("constructed IMPLICIT element"))?;
                    Ok(Tlv::new_primitive(tag, data.to_vec()))
                }
            }
            Element::Unimplemented(tlv) => Ok(tlv.clone()),
        }
    }
}

impl EncodableTo<Element> for Tlv {}

impl Encoder<Element, Tlv> for Element {
    type Error = Error;

    fn encode(&self) -> Result<Tlv, Self::Error> {
        Tlv::try_from(self)
    }
}

// ASN.1 INTEGER is an arbitrary sized two's complement value.
// DER requires the shortest encoding, so redundant leading 0x00/0xff octets are rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn is_positive(&self) -> bool {
        self.inner.is_positive()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }

    /// Number of significant bits of the magnitude.
    pub fn bits(&self) -> u64 {
        self.inner.bits()
    }

    /// Unsigned big-endian magnitude, or `None` for negative values.
    pub fn to_unsigned_bytes_be(&self) -> Option<Vec<u8>> {
        match self.inner.sign() {
            Sign::Minus => None,
            _ => Some(self.inner.magnitude().to_bytes_be()),
        }
    }
}

impl TryFrom<&[u8]> for Integer {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value {
            [] => Err(Error::IntegerNoData),
            [0x00, next, ..] if next & 0x80 == 0 => Err(Error::IntegerNonMinimal),
            [0xff, next, ..] if next & 0x80 != 0 => Err(Error::IntegerNonMinimal),
            _ => Ok(Integer {
                inner: BigInt::from_signed_bytes_be(value),
            }),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        Integer { inner: value }
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn components(&self) -> &[u64] {
        &self.inner
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut subidentifiers = Vec::new();
        let mut val = 0u64;
        let mut start = true;
        for v in value.iter() {
            if start && *v == 0x80 {
                return Err(Error::ObjectIdentifierNonMinimal);
            }
            if val > u64::MAX >> 7 {
                return Err(Error::ObjectIdentifierOverflow);
            }
            val = (val << 7) | (*v as u64 & 0x7F);
            start = *v & 0x80 == 0;
            if start {
                subidentifiers.push(val);
                val = 0;
            }
        }
        if !start {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        // The first subidentifier packs the first two arcs.
        let first = subidentifiers[0];
        let mut values = Vec::with_capacity(subidentifiers.len() + 1);
        if first < 80 {
            values.push(first / 40);
            values.push(first % 40);
        } else {
            values.push(2);
            values.push(first - 80);
        }
        values.extend_from_slice(&subidentifiers[1..]);

        Ok(ObjectIdentifier { inner: values })
    }
}

fn encode_base128(mut value: u64, out: &mut Vec<u8>) {
    let mut encoded = vec![value as u8 & 0x7F];
    value >>= 7;
    while value > 0 {
        encoded.push(value as u8 & 0x7F | 0x80);
        value >>= 7;
    }
    out.extend(encoded.iter().rev());
}

impl TryFrom<&ObjectIdentifier> for Vec<u8> {
    type Error = Error;

    fn try_from(oid: &ObjectIdentifier) -> Result<Self, Self::Error> {
        let (first, second) = match oid.inner.as_slice() {
            [first, second, ..] => (*first, *second),
            _ => return Err(Error::ObjectIdentifierTooFewComponents),
        };
        if first > 2 || (first < 2 && second >= 40) {
            return Err(Error::ObjectIdentifierInvalidArcs(first, second));
        }
        let packed = (first * 40)
            .checked_add(second)
            .ok_or(Error::ObjectIdentifierOverflow)?;

        let mut result = Vec::new();
        encode_base128(packed, &mut result);
        for v in oid.inner[2..].iter() {
            encode_base128(*v, &mut result);
        }

        Ok(result)
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split('.')
            .map(|s| s.parse::<u64>().map_err(Error::ParseInt))
            .collect::<Result<Vec<u64>, Error>>()?;
        if values.len() < 2 {
            return Err(Error::ObjectIdentifierTooFewComponents);
        }
        Ok(ObjectIdentifier { inner: values })
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        if self.data.is_empty() {
            0
        } else {
            self.data.len() * 8 - self.unused as usize
        }
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value {
            [] => Err(Error::BitStringNoData),
            [unused, ..] if *unused > 7 => Err(Error::BitStringUnusedBitsOutOfRange(*unused)),
            [unused] if *unused != 0 => Err(Error::BitStringUnusedBitsOutOfRange(*unused)),
            [unused, data @ ..] => Ok(BitString {
                unused: *unused,
                data: data.to_vec(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }
}

impl TryFrom<&OctetString> for ASN1Object {
    type Error = Error;

    fn try_from(value: &OctetString) -> Result<Self, Self::Error> {
        let der: Der = value.as_bytes().decode().map_err(Error::FailedToDecodeDer)?;
        der.decode()
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}
