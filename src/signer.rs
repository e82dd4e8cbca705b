//! Application server identity that signs VAPID tokens.

use std::time::Duration;

use crate::claims::{VapidClaims, VapidClaimsBuilder};
use crate::codec::decode_private_key;
use crate::constants::DEFAULT_TOKEN_TTL;
use crate::error::VapidError;
use crate::header::{VapidAuthorization, build_authorization_header};
use crate::keys::{VapidKeyPair, VapidPublicKey};
use crate::token::sign_claims_with_key;

/// Signs VAPID tokens for push endpoints on behalf of one sender.
///
/// The signer holds a key pair, the sender contact and a default token
/// lifetime. It is immutable and `Send + Sync`, so one instance can be shared
/// across threads.
///
/// # Example
///
/// ```
/// use vapid_auth::VapidSigner;
/// use std::time::Duration;
///
/// let signer = VapidSigner::generate("ops@example.com", false)
///     .unwrap()
///     .with_default_ttl(Duration::from_secs(3600));
///
/// let header = signer
///     .authorization_header("https://fcm.googleapis.com/fcm/send/abc")
///     .unwrap();
///
/// assert!(header.starts_with("vapid t="));
/// assert!(header.ends_with(&format!(", k={}", signer.public_key_text())));
/// ```
#[derive(Debug, Clone)]
pub struct VapidSigner {
    key_pair: VapidKeyPair,
    public_key_text: String,
    subject: String,
    subject_is_url: bool,
    default_ttl: Duration,
}

impl VapidSigner {
    /// Creates a signer.
    ///
    /// # Arguments
    ///
    /// * `key_pair` - The sender's P-256 identity
    /// * `subject` - Contact e-mail address, or an `https` URL
    /// * `subject_is_url` - Whether `subject` is a URL rather than an address
    #[must_use]
    pub fn new(key_pair: VapidKeyPair, subject: impl Into<String>, subject_is_url: bool) -> Self {
        let public_key_text = key_pair.public_key_text();
        Self {
            key_pair,
            public_key_text,
            subject: subject.into(),
            subject_is_url,
            default_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Creates a signer with a freshly generated key pair.
    ///
    /// # Errors
    ///
    /// Returns `VapidError::KeyGeneration` if the random source fails.
    pub fn generate(subject: impl Into<String>, subject_is_url: bool) -> Result<Self, VapidError> {
        Ok(Self::new(VapidKeyPair::generate()?, subject, subject_is_url))
    }

    /// Sets the lifetime used by [`VapidSigner::sign`].
    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Returns the public key text sent as `k` and handed to browsers.
    #[must_use]
    pub fn public_key_text(&self) -> &str {
        &self.public_key_text
    }

    /// Returns the key pair.
    #[must_use]
    pub fn key_pair(&self) -> &VapidKeyPair {
        &self.key_pair
    }

    /// Returns the sender contact as configured.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns whether the subject is a URL.
    #[must_use]
    pub fn subject_is_url(&self) -> bool {
        self.subject_is_url
    }

    /// Returns the default token lifetime.
    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Builds the claims a token for `endpoint` would carry.
    ///
    /// # Errors
    ///
    /// See [`VapidClaimsBuilder::build`].
    pub fn claims_for(&self, endpoint: &str) -> Result<VapidClaims, VapidError> {
        self.claims_with_ttl(endpoint, self.default_ttl)
    }

    /// Signs a token for `endpoint` with the default lifetime.
    ///
    /// # Errors
    ///
    /// Returns `VapidError::InvalidEndpoint` for an unusable endpoint, or a
    /// signing error.
    pub fn sign(&self, endpoint: &str) -> Result<String, VapidError> {
        self.sign_with_ttl(endpoint, self.default_ttl)
    }

    /// Signs a token for `endpoint` with a specific lifetime.
    ///
    /// # Errors
    ///
    /// Same as [`VapidSigner::sign`].
    pub fn sign_with_ttl(&self, endpoint: &str, ttl: Duration) -> Result<String, VapidError> {
        let claims = self.claims_with_ttl(endpoint, ttl)?;
        sign_claims_with_key(&claims, &self.key_pair)
    }

    /// Signs a token for `endpoint` and pairs it with the public key.
    ///
    /// # Errors
    ///
    /// Same as [`VapidSigner::sign`].
    pub fn authorization(&self, endpoint: &str) -> Result<VapidAuthorization, VapidError> {
        let token = self.sign(endpoint)?;
        Ok(VapidAuthorization::new(token, self.public_key_text.clone()))
    }

    /// Produces the `Authorization` header value for `endpoint`.
    ///
    /// # Errors
    ///
    /// Same as [`VapidSigner::sign`].
    pub fn authorization_header(&self, endpoint: &str) -> Result<String, VapidError> {
        Ok(self.authorization(endpoint)?.to_string())
    }

    fn claims_with_ttl(&self, endpoint: &str, ttl: Duration) -> Result<VapidClaims, VapidError> {
        VapidClaimsBuilder::new()
            .endpoint(endpoint)
            .subject(self.subject.as_str())
            .subject_is_url(self.subject_is_url)
            .ttl(ttl)
            .build()
    }
}

/// Produces an `Authorization` header straight from stored key text.
///
/// Runs the whole pipeline: decode the private key, check that
/// `public_key_text` is its public half, build claims, sign and format.
/// The `k` parameter carries the public key as unpadded base64url, whatever
/// alphabet it was stored in.
///
/// # Errors
///
/// - decoding errors for either key
/// - `VapidError::InvalidKeyEncoding` if the public key does not belong to
///   the private key
/// - `VapidError::Signing` if the private scalar cannot sign
/// - `VapidError::InvalidEndpoint` for an unusable endpoint
///
/// # Example
///
/// ```
/// use vapid_auth::{generate_vapid_keys, parse_authorization_header, vapid_authorization_header};
///
/// let (private_key, public_key) = generate_vapid_keys().unwrap();
/// let header = vapid_authorization_header(
///     "https://push.example.com/abc123",
///     "user@example.com",
///     false,
///     &public_key,
///     &private_key,
///     None,
/// )
/// .unwrap();
///
/// let (_token, key) = parse_authorization_header(&header).unwrap();
/// assert_eq!(key, public_key);
/// ```
pub fn vapid_authorization_header(
    endpoint: &str,
    subject: &str,
    subject_is_url: bool,
    public_key_text: &str,
    private_key_text: &str,
    ttl: Option<Duration>,
) -> Result<String, VapidError> {
    let scalar = decode_private_key(private_key_text)?;
    let key_pair = VapidKeyPair::from_private_scalar(&scalar).map_err(|_| {
        VapidError::signing("private scalar is zero or not below the P-256 group order")
    })?;

    let public_key = VapidPublicKey::from_text(public_key_text)?;
    if key_pair.public_key() != public_key {
        return Err(VapidError::encoding(
            "public key does not belong to the private key",
        ));
    }

    let claims = VapidClaims::for_endpoint(endpoint, subject, subject_is_url, ttl)?;
    let token = sign_claims_with_key(&claims, &key_pair)?;

    Ok(build_authorization_header(&token, &public_key.to_text()))
}
