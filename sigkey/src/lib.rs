//! # sigkey
//!
//! Conversion traits shared by every layer of the sigkey toolkit.
//!
//! Unlocking an encrypted sigstore key walks through a chain of
//! representations, each step being a `Decoder` implementation:
//!
//! ```text
//! text → Pem → Vec<u8> → (decrypt) → Der → ASN1Object → PrivateKey
//! ```
//!
//! and the output side walks back with `Encoder`:
//!
//! ```text
//! RSAPrivateKey → Element → ASN1Object → Der → Vec<u8> → Pem
//! ```
//!
//! The marker traits (`DecodableFrom`, `EncodableTo`) restrict which pairs of
//! types may be converted, so an impossible conversion is a compile error
//! rather than a runtime one.
//!
//! ```ignore
//! use sigkey::decoder::Decoder;
//! use sigkey_der::Der;
//! use sigkey_asn1::ASN1Object;
//!
//! let bytes = vec![0x30, 0x03, 0x02, 0x01, 0x05];
//! let der: Der = bytes.decode().unwrap();
//! let asn1: ASN1Object = der.decode().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
