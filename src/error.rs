//! Error types for VAPID operations.

use thiserror::Error;

/// Errors that can occur while generating keys, building claims, signing
/// tokens or handling `Authorization` headers.
///
/// None of these are retried internally; callers should treat any of them as
/// fatal to the current push attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VapidError {
    /// Key text is not valid standard or URL-safe base64, or the decoded
    /// bytes are not a usable P-256 key.
    #[error("invalid key encoding: {reason}")]
    InvalidKeyEncoding {
        /// Description of the encoding error
        reason: String,
    },
    /// Decoded key bytes have a length that matches neither a raw key nor a
    /// parseable key container.
    #[error(
        "invalid key length: decoded {actual} bytes; expected a 32-byte scalar, a 65-byte point or a DER key container"
    )]
    InvalidKeyLength {
        /// Number of decoded bytes
        actual: usize,
    },
    /// The operating system random source failed.
    #[error("key generation failed: {reason}; the entropy source is unavailable")]
    KeyGeneration {
        /// Description of the entropy failure
        reason: String,
    },
    /// The push endpoint cannot be turned into an audience.
    #[error("invalid push endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The rejected endpoint
        endpoint: String,
        /// Reason for rejection
        reason: String,
    },
    /// The private scalar cannot sign (zero or not below the curve order),
    /// or the signing input could not be produced.
    #[error("signing failed: {reason}")]
    Signing {
        /// Description of the signing error
        reason: String,
    },
    /// An `Authorization` header does not follow `vapid t=<token>, k=<key>`.
    #[error("malformed VAPID authorization header: {reason}")]
    MalformedHeader {
        /// Description of the format error
        reason: String,
    },
    /// A required field was not provided to a builder or configuration.
    #[error("missing required field '{field}'")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },
}

impl VapidError {
    pub(crate) fn encoding(reason: impl Into<String>) -> Self {
        Self::InvalidKeyEncoding {
            reason: reason.into(),
        }
    }

    pub(crate) fn signing(reason: impl Into<String>) -> Self {
        Self::Signing {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            reason: reason.into(),
        }
    }
}
