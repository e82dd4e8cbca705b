//! ES256 compact token signing.

use p256::ecdsa::signature::RandomizedSigner;
use p256::ecdsa::{Signature, SigningKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::claims::VapidClaims;
use crate::codec::encode_url_safe;
use crate::constants::{ALGORITHM, PRIVATE_KEY_LENGTH, TOKEN_TYPE};
use crate::error::VapidError;
use crate::keys::VapidKeyPair;

/// JOSE header of every VAPID token: `{"alg":"ES256","typ":"JWT"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Signature algorithm
    pub alg: String,
    /// Token type
    pub typ: String,
}

impl Default for TokenHeader {
    fn default() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        }
    }
}

/// Signs claims with a raw private scalar and returns the compact token.
///
/// The token is `header.payload.signature`, each segment unpadded base64url.
/// The signature is the 64-byte `r || s` form, produced with a fresh random
/// nonce, so two calls with the same input yield different tokens.
///
/// # Errors
///
/// Returns `VapidError::Signing` if the scalar is zero or not below the
/// P-256 group order.
///
/// # Example
///
/// ```
/// use vapid_auth::{sign_claims, VapidClaims, VapidKeyPair};
///
/// let key_pair = VapidKeyPair::generate().unwrap();
/// let claims = VapidClaims::for_endpoint(
///     "https://push.example.com/abc123",
///     "user@example.com",
///     false,
///     None,
/// )
/// .unwrap();
///
/// let token = sign_claims(&claims, &key_pair.private_scalar()).unwrap();
/// assert_eq!(token.split('.').count(), 3);
/// assert!(token.starts_with("eyJhbGciOiJFUzI1NiIsInR5cCI6IkpXVCJ9."));
/// ```
pub fn sign_claims(
    claims: &VapidClaims,
    private_scalar: &[u8; PRIVATE_KEY_LENGTH],
) -> Result<String, VapidError> {
    let signing_key = SigningKey::from_slice(private_scalar).map_err(|_| {
        VapidError::signing("private scalar is zero or not below the P-256 group order")
    })?;
    sign_with(claims, &signing_key)
}

/// Signs claims with an already validated key pair.
///
/// # Errors
///
/// Returns `VapidError::Signing` if the signing input cannot be produced.
pub fn sign_claims_with_key(
    claims: &VapidClaims,
    key_pair: &VapidKeyPair,
) -> Result<String, VapidError> {
    sign_with(claims, key_pair.signing_key())
}

/// Builds `base64url(header) "." base64url(claims)`.
pub(crate) fn signing_input(claims: &VapidClaims) -> Result<String, VapidError> {
    let header = serde_json::to_vec(&TokenHeader::default())
        .map_err(|e| VapidError::signing(format!("failed to serialize header: {e}")))?;
    let payload = serde_json::to_vec(claims)
        .map_err(|e| VapidError::signing(format!("failed to serialize claims: {e}")))?;

    Ok(format!(
        "{}.{}",
        encode_url_safe(header),
        encode_url_safe(payload)
    ))
}

fn sign_with(claims: &VapidClaims, signing_key: &SigningKey) -> Result<String, VapidError> {
    let input = signing_input(claims)?;
    let signature: Signature = signing_key
        .try_sign_with_rng(&mut OsRng, input.as_bytes())
        .map_err(|e| VapidError::signing(e.to_string()))?;

    tracing::debug!(aud = %claims.aud, exp = claims.exp, "signed VAPID token");

    Ok(format!("{input}.{}", encode_url_safe(signature.to_bytes())))
}
