//! Encoder trait, the mirror image of [`Decoder`](crate::decoder::Decoder).

/// Encodes `self` (of type `T`) into an `E`.
///
/// # Examples
///
/// ```no_run
/// use sigkey::encoder::{EncodableTo, Encoder};
///
/// struct Label(String);
///
/// impl EncodableTo<Label> for Vec<u8> {}
///
/// impl Encoder<Label, Vec<u8>> for Label {
///     type Error = std::convert::Infallible;
///
///     fn encode(&self) -> Result<Vec<u8>, Self::Error> {
///         Ok(self.0.as_bytes().to_vec())
///     }
/// }
/// ```
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait: `Self` can be produced by encoding a `T`.
pub trait EncodableTo<T> {}
