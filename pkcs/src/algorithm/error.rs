use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("AlgorithmIdentifier: expected SEQUENCE")]
    ExpectedSequence,

    #[error("AlgorithmIdentifier: empty SEQUENCE")]
    EmptyAlgorithmIdentifier,

    #[error("AlgorithmIdentifier: expected OBJECT IDENTIFIER for algorithm")]
    ExpectedOidForAlgorithm,

    #[error("AlgorithmIdentifier: too many elements")]
    TooManyElements,
}

pub type Result<T> = std::result::Result<T, Error>;
