//! P-256 key pairs for VAPID identities.

use std::fmt;

use p256::ecdsa::{SigningKey, VerifyingKey};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::codec::{decode_private_key, decode_public_key, encode_url_safe, validate_public_point};
use crate::constants::{PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH};
use crate::error::VapidError;

/// An application server identity: a P-256 signing key and its public point.
///
/// The public half is always derived from the private scalar, so the pair
/// cannot go out of sync.
///
/// # Example
///
/// ```
/// use vapid_auth::VapidKeyPair;
///
/// let key_pair = VapidKeyPair::generate().unwrap();
///
/// assert_eq!(key_pair.private_key_text().len(), 43);
/// assert_eq!(key_pair.public_key_text().len(), 87);
///
/// let restored = VapidKeyPair::from_private_key_text(&key_pair.private_key_text()).unwrap();
/// assert_eq!(restored.public_key(), key_pair.public_key());
/// ```
#[derive(Clone)]
pub struct VapidKeyPair {
    signing_key: SigningKey,
}

impl VapidKeyPair {
    /// Draws a fresh key pair from the operating system random source.
    ///
    /// Candidate scalars that fall outside `[1, n)` are redrawn.
    ///
    /// # Errors
    ///
    /// Returns `VapidError::KeyGeneration` if the random source fails.
    pub fn generate() -> Result<Self, VapidError> {
        let mut candidate = [0u8; PRIVATE_KEY_LENGTH];
        loop {
            OsRng.try_fill_bytes(&mut candidate).map_err(|e| {
                tracing::error!(error = %e, "operating system random source failed");
                VapidError::KeyGeneration {
                    reason: e.to_string(),
                }
            })?;

            if let Ok(signing_key) = SigningKey::from_slice(&candidate) {
                return Ok(Self { signing_key });
            }
        }
    }

    /// Rebuilds a key pair from a raw 32-byte private scalar.
    ///
    /// # Errors
    ///
    /// Returns `VapidError::InvalidKeyEncoding` if the scalar is zero or not
    /// below the P-256 group order.
    pub fn from_private_scalar(scalar: &[u8; PRIVATE_KEY_LENGTH]) -> Result<Self, VapidError> {
        SigningKey::from_slice(scalar)
            .map(|signing_key| Self { signing_key })
            .map_err(|_| {
                VapidError::encoding("private scalar is zero or not below the P-256 group order")
            })
    }

    /// Rebuilds a key pair from private key text in any accepted encoding.
    ///
    /// See [`decode_private_key`] for the accepted forms.
    ///
    /// # Errors
    ///
    /// Returns the decoding error, or `VapidError::InvalidKeyEncoding` if the
    /// decoded scalar is not a valid P-256 private key.
    pub fn from_private_key_text(text: &str) -> Result<Self, VapidError> {
        Self::from_private_scalar(&decode_private_key(text)?)
    }

    /// Returns the raw 32-byte big-endian private scalar.
    #[must_use]
    pub fn private_scalar(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        let mut scalar = [0u8; PRIVATE_KEY_LENGTH];
        scalar.copy_from_slice(&self.signing_key.to_bytes());
        scalar
    }

    /// Returns the private scalar as 43-character unpadded base64url.
    #[must_use]
    pub fn private_key_text(&self) -> String {
        encode_url_safe(self.private_scalar())
    }

    /// Returns the public half.
    #[must_use]
    pub fn public_key(&self) -> VapidPublicKey {
        VapidPublicKey {
            inner: *self.signing_key.verifying_key(),
        }
    }

    /// Returns the 65-byte uncompressed public point.
    #[must_use]
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.public_key().to_bytes()
    }

    /// Returns the public point as 87-character unpadded base64url.
    ///
    /// This is the value browsers receive as `applicationServerKey` and the
    /// `k` parameter of the `Authorization` header.
    #[must_use]
    pub fn public_key_text(&self) -> String {
        self.public_key().to_text()
    }

    /// Exports both halves as text for the caller to persist.
    #[must_use]
    pub fn export(&self) -> ExportedKeys {
        ExportedKeys {
            private_key: self.private_key_text(),
            public_key: self.public_key_text(),
        }
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for VapidKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VapidKeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// The public half of a VAPID identity, a validated point on P-256.
#[derive(Clone, PartialEq, Eq)]
pub struct VapidPublicKey {
    inner: VerifyingKey,
}

impl VapidPublicKey {
    /// Creates a public key from a 65-byte uncompressed point.
    ///
    /// # Errors
    ///
    /// Returns `VapidError::InvalidKeyEncoding` if the bytes are not an
    /// uncompressed point on P-256.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_LENGTH]) -> Result<Self, VapidError> {
        validate_public_point(bytes)?;
        VerifyingKey::from_sec1_bytes(bytes)
            .map(|inner| Self { inner })
            .map_err(|_| VapidError::encoding("public key is not a point on P-256"))
    }

    /// Creates a public key from base64 text (either alphabet).
    ///
    /// # Errors
    ///
    /// Returns the error of [`decode_public_key`].
    pub fn from_text(text: &str) -> Result<Self, VapidError> {
        Self::from_bytes(&decode_public_key(text)?)
    }

    /// Returns the 65-byte uncompressed point.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        let point = self.inner.to_encoded_point(false);
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(point.as_bytes());
        bytes
    }

    /// Returns the point as unpadded base64url.
    #[must_use]
    pub fn to_text(&self) -> String {
        encode_url_safe(self.to_bytes())
    }

    /// Returns the ES256 verifying key for checking token signatures.
    #[must_use]
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }
}

impl fmt::Debug for VapidPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // first four bytes of X
        let bytes = self.to_bytes();
        write!(
            f,
            "VapidPublicKey({:02x}{:02x}{:02x}{:02x}...)",
            bytes[1], bytes[2], bytes[3], bytes[4]
        )
    }
}

impl fmt::Display for VapidPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Key export format: both halves as unpadded base64url text.
///
/// Suitable for a file, environment variables or a secret store; this crate
/// defines the format but not the storage.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedKeys {
    /// 43-character private scalar
    pub private_key: String,
    /// 87-character uncompressed public point
    pub public_key: String,
}

impl ExportedKeys {
    /// Rebuilds the key pair, checking that both halves belong together.
    ///
    /// # Errors
    ///
    /// Returns a decoding error for either half, or
    /// `VapidError::InvalidKeyEncoding` if the public key is not the one
    /// derived from the private key.
    pub fn into_key_pair(self) -> Result<VapidKeyPair, VapidError> {
        let key_pair = VapidKeyPair::from_private_key_text(&self.private_key)?;
        let public_key = VapidPublicKey::from_text(&self.public_key)?;
        if key_pair.public_key() != public_key {
            return Err(VapidError::encoding(
                "public key does not belong to the private key",
            ));
        }
        Ok(key_pair)
    }
}

impl fmt::Debug for ExportedKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedKeys")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Generates a fresh VAPID identity as `(private_key_text, public_key_text)`.
///
/// The private text is 43 characters and the public text 87 characters, both
/// unpadded base64url.
///
/// # Errors
///
/// Returns `VapidError::KeyGeneration` if the random source fails. Callers
/// should halt startup rather than run without an identity.
///
/// # Example
///
/// ```
/// let (private_key, public_key) = vapid_auth::generate_vapid_keys().unwrap();
///
/// assert_eq!(private_key.len(), 43);
/// assert_eq!(public_key.len(), 87);
/// ```
pub fn generate_vapid_keys() -> Result<(String, String), VapidError> {
    let exported = VapidKeyPair::generate()?.export();
    Ok((exported.private_key, exported.public_key))
}
