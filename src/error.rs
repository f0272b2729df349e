//! Error type of the crate and the status taxonomy reported at the public boundary
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status codes surfaced to callers. Every fallible operation either succeeds or fails with
/// exactly one of the failure codes; see [`Error::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Success,
    InvalidArgument,
    OutOfRange,
    IoError,
    BadAccess,
    BadAlloc,
    AlreadyExists,
    RuntimeError,
    Unknown,
}

impl Status {
    /// The numeric code of the status, with `Success` as zero
    pub fn code(&self) -> u32 {
        return *self as u32;
    }
}

/// Errors returned by every fallible operation of the crate.
///
/// Proof verification on its own never errors; it reports a `bool`. Only the
/// encrypt-and-verify path turns a failed verification into [`Error::ProofVerification`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed input such as an invalid vote, a zero nonce or a ballot that does not match
    /// its manifest
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A group element outside of `[0, modulus)`
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// A reference to an id that the manifest does not define
    #[error("no {kind} with id `{id}`")]
    NotFound { kind: &'static str, id: String },

    /// Two entities of the same kind share an id
    #[error("duplicate {kind} id `{id}`")]
    AlreadyExists { kind: &'static str, id: String },

    /// Import or export of JSON or of the compact binary form failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A freshly constructed proof did not verify
    #[error("proof verification failed: {0}")]
    ProofVerification(String),

    #[error("{0}")]
    Runtime(String),
}

impl Error {
    /// Translate the error into the status taxonomy
    pub fn status(&self) -> Status {
        return match self {
            Error::InvalidArgument(_) | Error::NotFound { .. } => Status::InvalidArgument,
            Error::OutOfRange(_) => Status::OutOfRange,
            Error::AlreadyExists { .. } => Status::AlreadyExists,
            Error::Serialization(_) => Status::IoError,
            Error::ProofVerification(_) | Error::Runtime(_) => Status::RuntimeError,
        };
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        return Error::Serialization(err.to_string());
    }
}

impl From<bincode::error::EncodeError> for Error {
    fn from(err: bincode::error::EncodeError) -> Self {
        return Error::Serialization(err.to_string());
    }
}

impl From<bincode::error::DecodeError> for Error {
    fn from(err: bincode::error::DecodeError) -> Self {
        return Error::Serialization(err.to_string());
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        return Error::InvalidArgument(format!("malformed hex: {err}"));
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The status of an operation's outcome
pub fn status_of<T>(result: &Result<T>) -> Status {
    return match result {
        Ok(_) => Status::Success,
        Err(err) => err.status(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let ok: Result<()> = Ok(());
        assert_eq!(status_of(&ok), Status::Success);
        assert_eq!(Status::Success.code(), 0);

        let missing = Error::NotFound {
            kind: "ballot style",
            id: "style-1".to_string(),
        };
        assert_eq!(missing.status(), Status::InvalidArgument);
        assert_eq!(
            Error::OutOfRange("x".to_string()).status(),
            Status::OutOfRange
        );
        assert_eq!(
            Error::ProofVerification("x".to_string()).status(),
            Status::RuntimeError
        );
        assert_eq!(
            Error::Serialization("x".to_string()).status(),
            Status::IoError
        );
    }
}
