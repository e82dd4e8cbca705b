//! VAPID claim set.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::{Host, Url};

use crate::constants::{DEFAULT_TOKEN_TTL, MAILTO_PREFIX, MAX_TOKEN_TTL, MIN_TOKEN_TTL};
use crate::error::VapidError;

/// Claims carried by a VAPID token.
///
/// Field order is fixed (`aud`, `exp`, `sub`), so the serialized payload is
/// reproducible for given values.
///
/// # Example
///
/// ```
/// use vapid_auth::VapidClaims;
///
/// let claims = VapidClaims::for_endpoint(
///     "https://push.example.com/abc123",
///     "user@example.com",
///     false,
///     None,
/// )
/// .unwrap();
///
/// assert_eq!(claims.aud, "https://push.example.com");
/// assert_eq!(claims.sub, "mailto:user@example.com");
/// assert!(!claims.is_expired());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VapidClaims {
    /// Origin of the push service (scheme and authority, no path)
    pub aud: String,
    /// Expiry as unix seconds
    pub exp: i64,
    /// Contact for the sender, a `mailto:` address or an `https` URL
    pub sub: String,
}

impl VapidClaims {
    /// Creates a new builder for VAPID claims.
    #[must_use]
    pub fn builder() -> VapidClaimsBuilder {
        VapidClaimsBuilder::new()
    }

    /// Builds claims for a push endpoint in one call.
    ///
    /// `subject` is used verbatim when `subject_is_url` is true and gets a
    /// `mailto:` prefix otherwise. `ttl` defaults to 12 hours and is clamped
    /// to 24 hours.
    ///
    /// # Errors
    ///
    /// - `VapidError::InvalidEndpoint` if the endpoint has no scheme or host
    /// - `VapidError::MissingField` if the subject is empty
    pub fn for_endpoint(
        endpoint: &str,
        subject: &str,
        subject_is_url: bool,
        ttl: Option<Duration>,
    ) -> Result<Self, VapidError> {
        let builder = VapidClaimsBuilder::new()
            .endpoint(endpoint)
            .subject(subject)
            .subject_is_url(subject_is_url);

        match ttl {
            Some(ttl) => builder.ttl(ttl).build(),
            None => builder.build(),
        }
    }

    /// Returns the expiry as a timestamp, if it is representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns true once the expiry has been reached.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Derives the `aud` claim from a push endpoint.
///
/// The audience is `scheme://host`, with `:port` appended only when the port
/// is not the scheme's default. IPv6 hosts keep their brackets.
///
/// # Errors
///
/// Returns `VapidError::InvalidEndpoint` if the endpoint is not an absolute
/// URL or has no host.
///
/// # Example
///
/// ```
/// use vapid_auth::audience;
///
/// assert_eq!(
///     audience("https://fcm.googleapis.com/fcm/send/abc").unwrap(),
///     "https://fcm.googleapis.com"
/// );
/// assert_eq!(
///     audience("http://localhost:8080/push").unwrap(),
///     "http://localhost:8080"
/// );
/// ```
pub fn audience(endpoint: &str) -> Result<String, VapidError> {
    let invalid = |reason: String| VapidError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let url = Url::parse(endpoint.trim()).map_err(|e| invalid(e.to_string()))?;
    let host = match url.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => format!("[{ip}]"),
        _ => return Err(invalid("endpoint has no host".to_string())),
    };

    Ok(match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    })
}

/// Builder for constructing `VapidClaims`.
///
/// # Example
///
/// ```
/// use vapid_auth::VapidClaimsBuilder;
/// use std::time::Duration;
///
/// let claims = VapidClaimsBuilder::new()
///     .endpoint("https://updates.push.services.mozilla.com/wpush/v2/gAAAA")
///     .subject("https://contact.example.com/")
///     .subject_is_url(true)
///     .ttl(Duration::from_secs(3600))
///     .build()
///     .unwrap();
///
/// assert_eq!(claims.aud, "https://updates.push.services.mozilla.com");
/// assert_eq!(claims.sub, "https://contact.example.com/");
/// ```
#[derive(Debug, Clone)]
pub struct VapidClaimsBuilder {
    endpoint: Option<String>,
    subject: Option<String>,
    subject_is_url: bool,
    ttl: Duration,
}

impl VapidClaimsBuilder {
    /// Creates a new builder with the default TTL of 12 hours and an e-mail
    /// subject.
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoint: None,
            subject: None,
            subject_is_url: false,
            ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Sets the push endpoint the token is for.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the sender contact, an e-mail address or an `https` URL.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Marks the subject as a URL, used verbatim instead of `mailto:`-prefixed.
    #[must_use]
    pub fn subject_is_url(mut self, is_url: bool) -> Self {
        self.subject_is_url = is_url;
        self
    }

    /// Sets the token lifetime.
    ///
    /// Values above 24 hours are clamped at build time; values below one
    /// second are raised to one second.
    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Builds the claims using the current time.
    ///
    /// # Errors
    ///
    /// - `VapidError::MissingField` if the endpoint or subject is unset or
    ///   the subject is empty
    /// - `VapidError::InvalidEndpoint` if the endpoint has no scheme or host
    pub fn build(self) -> Result<VapidClaims, VapidError> {
        self.build_at(Utc::now())
    }

    /// Builds the claims as of `now`.
    ///
    /// # Errors
    ///
    /// Same as [`VapidClaimsBuilder::build`].
    pub fn build_at(self, now: DateTime<Utc>) -> Result<VapidClaims, VapidError> {
        let endpoint = self
            .endpoint
            .ok_or(VapidError::MissingField { field: "endpoint" })?;
        let subject = self
            .subject
            .filter(|subject| !subject.is_empty())
            .ok_or(VapidError::MissingField { field: "subject" })?;

        let aud = audience(&endpoint)?;
        let sub = if self.subject_is_url {
            subject
        } else {
            format!("{MAILTO_PREFIX}{subject}")
        };
        let exp = now
            .timestamp()
            .saturating_add_unsigned(effective_ttl(self.ttl).as_secs());

        Ok(VapidClaims { aud, exp, sub })
    }
}

impl Default for VapidClaimsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounds a requested TTL to `[MIN_TOKEN_TTL, MAX_TOKEN_TTL]`.
pub(crate) fn effective_ttl(requested: Duration) -> Duration {
    if requested > MAX_TOKEN_TTL {
        tracing::warn!(
            requested_secs = requested.as_secs(),
            max_secs = MAX_TOKEN_TTL.as_secs(),
            "VAPID token TTL clamped to 24 hours"
        );
        MAX_TOKEN_TTL
    } else if requested < MIN_TOKEN_TTL {
        MIN_TOKEN_TTL
    } else {
        requested
    }
}
