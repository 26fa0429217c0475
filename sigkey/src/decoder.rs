//! Decoder trait for type-safe conversions.
//!
//! A source type `T` implements `Decoder<T, D>` to produce a `D`, and `D`
//! opts in with the marker `DecodableFrom<T>`. Several decoders can exist on
//! the same source type; the annotated destination picks one:
//!
//! ```ignore
//! let der: Der = bytes.decode()?;
//! let obj: ASN1Object = der.decode()?;
//! ```

/// Decodes `self` (of type `T`) into a `D`.
///
/// # Examples
///
/// ```no_run
/// use sigkey::decoder::{DecodableFrom, Decoder};
///
/// struct Label(String);
///
/// #[derive(Debug)]
/// struct NotUtf8;
///
/// impl DecodableFrom<Vec<u8>> for Label {}
///
/// impl Decoder<Vec<u8>, Label> for Vec<u8> {
///     type Error = NotUtf8;
///
///     fn decode(&self) -> Result<Label, Self::Error> {
///         String::from_utf8(self.clone()).map(Label).map_err(|_| NotUtf8)
///     }
/// }
/// ```
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into `D`.
    ///
    /// # Errors
    ///
    /// Returns an error when `self` is not a valid encoding of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait: `Self` can be decoded from `T`.
pub trait DecodableFrom<T> {}
