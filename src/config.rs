//! Sender configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TOKEN_TTL;
use crate::error::VapidError;
use crate::keys::VapidKeyPair;
use crate::signer::VapidSigner;

/// Configuration for a VAPID sender.
///
/// Deserializes from any serde format; where it is loaded from is up to the
/// application.
///
/// # Example
///
/// ```
/// use vapid_auth::{generate_vapid_keys, VapidConfig};
///
/// let (private_key, _) = generate_vapid_keys().unwrap();
/// let json = format!(r#"{{"private_key":"{private_key}","subject":"ops@example.com"}}"#);
///
/// let config: VapidConfig = serde_json::from_str(&json).unwrap();
/// let signer = config.into_signer().unwrap();
///
/// assert_eq!(signer.subject(), "ops@example.com");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VapidConfig {
    /// Private key text in any form `decode_private_key` accepts.
    pub private_key: String,

    /// Contact e-mail address, or an `https` URL.
    pub subject: String,

    /// Whether `subject` is a URL.
    ///
    /// Default: false
    #[serde(default)]
    pub subject_is_url: bool,

    /// Token lifetime in seconds.
    ///
    /// Default: None (12 hours). Values above a day are clamped.
    #[serde(default)]
    pub token_ttl_secs: Option<u64>,
}

impl VapidConfig {
    /// Creates a configuration with an e-mail subject and default lifetime.
    #[must_use]
    pub fn new(private_key: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            subject: subject.into(),
            subject_is_url: false,
            token_ttl_secs: None,
        }
    }

    /// Marks the subject as a URL.
    #[must_use]
    pub fn with_subject_is_url(mut self, is_url: bool) -> Self {
        self.subject_is_url = is_url;
        self
    }

    /// Sets the token lifetime.
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl_secs = Some(ttl.as_secs());
        self
    }

    /// Returns the configured lifetime, or the 12-hour default.
    #[must_use]
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl_secs.map_or(DEFAULT_TOKEN_TTL, Duration::from_secs)
    }

    /// Builds a signer without consuming the configuration.
    ///
    /// # Errors
    ///
    /// - `VapidError::MissingField` if the private key or subject is empty
    /// - decoding errors for the private key
    pub fn signer(&self) -> Result<VapidSigner, VapidError> {
        if self.private_key.trim().is_empty() {
            return Err(VapidError::MissingField {
                field: "private_key",
            });
        }
        if self.subject.is_empty() {
            return Err(VapidError::MissingField { field: "subject" });
        }

        let key_pair = VapidKeyPair::from_private_key_text(&self.private_key)?;
        Ok(
            VapidSigner::new(key_pair, self.subject.as_str(), self.subject_is_url)
                .with_default_ttl(self.token_ttl()),
        )
    }

    /// Builds a signer.
    ///
    /// # Errors
    ///
    /// Same as [`VapidConfig::signer`].
    pub fn into_signer(self) -> Result<VapidSigner, VapidError> {
        self.signer()
    }
}

impl fmt::Debug for VapidConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VapidConfig")
            .field("private_key", &"<redacted>")
            .field("subject", &self.subject)
            .field("subject_is_url", &self.subject_is_url)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_applies_defaults() {
        let config: VapidConfig =
            serde_json::from_str(r#"{"private_key":"abc","subject":"ops@example.com"}"#).unwrap();

        assert!(!config.subject_is_url);
        assert!(config.token_ttl_secs.is_none());
        assert_eq!(config.token_ttl(), DEFAULT_TOKEN_TTL);
    }

    #[test]
    fn builder_pattern() {
        let config = VapidConfig::new("abc", "https://contact.example.com/")
            .with_subject_is_url(true)
            .with_token_ttl(Duration::from_secs(1800));

        assert!(config.subject_is_url);
        assert_eq!(config.token_ttl_secs, Some(1800));
        assert_eq!(config.token_ttl(), Duration::from_secs(1800));
    }

    #[test]
    fn signer_carries_settings() {
        let key_pair = VapidKeyPair::generate().unwrap();
        let config = VapidConfig::new(key_pair.private_key_text(), "ops@example.com")
            .with_token_ttl(Duration::from_secs(900));

        let signer = config.signer().unwrap();

        assert_eq!(signer.public_key_text(), key_pair.public_key_text());
        assert_eq!(signer.subject(), "ops@example.com");
        assert_eq!(signer.default_ttl(), Duration::from_secs(900));
    }

    #[test]
    fn empty_fields_rejected() {
        let key_pair = VapidKeyPair::generate().unwrap();

        assert_eq!(
            VapidConfig::new("", "ops@example.com").signer().unwrap_err(),
            VapidError::MissingField {
                field: "private_key"
            }
        );
        assert_eq!(
            VapidConfig::new(key_pair.private_key_text(), "")
                .into_signer()
                .unwrap_err(),
            VapidError::MissingField { field: "subject" }
        );
    }

    #[test]
    fn bad_private_key_surfaces_decode_error() {
        let result = VapidConfig::new("not base64!", "ops@example.com").signer();

        assert!(matches!(result, Err(VapidError::InvalidKeyEncoding { .. })));
    }

    #[test]
    fn debug_redacts_private_key() {
        let key_pair = VapidKeyPair::generate().unwrap();
        let config = VapidConfig::new(key_pair.private_key_text(), "ops@example.com");

        let debug = format!("{config:?}");

        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(&key_pair.private_key_text()));
    }
}
