//! The `Authorization: vapid t=<token>, k=<key>` header.
//!
//! Parsing is field-oriented: the scheme is matched case-insensitively, the
//! rest is a comma-separated list of `name=value` parameters. `t` and `k`
//! must each appear exactly once with a non-empty value; other parameters are
//! ignored. Values are returned exactly as they appear, so
//! `parse(build(t, k)) == (t, k)` holds for any `t` and `k` that are
//! non-empty and contain no comma.

use std::fmt;
use std::str::FromStr;

use crate::constants::AUTH_SCHEME;
use crate::error::VapidError;

/// A VAPID `Authorization` header value.
///
/// # Example
///
/// ```
/// use vapid_auth::VapidAuthorization;
///
/// let auth: VapidAuthorization = "vapid t=eyJ0.eyJh.c2ln, k=BPub".parse().unwrap();
///
/// assert_eq!(auth.token(), "eyJ0.eyJh.c2ln");
/// assert_eq!(auth.public_key(), "BPub");
/// assert_eq!(auth.to_string(), "vapid t=eyJ0.eyJh.c2ln, k=BPub");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VapidAuthorization {
    token: String,
    public_key: String,
}

impl VapidAuthorization {
    /// Pairs a signed token with the public key text that verifies it.
    #[must_use]
    pub fn new(token: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            public_key: public_key.into(),
        }
    }

    /// Parses a header value.
    ///
    /// # Errors
    ///
    /// Returns `VapidError::MalformedHeader` if the scheme is not `vapid`, a
    /// parameter is not `name=value`, or `t`/`k` is missing, empty or
    /// repeated.
    pub fn parse(header: &str) -> Result<Self, VapidError> {
        let (scheme, params) = header
            .trim_start()
            .split_once(' ')
            .ok_or_else(|| VapidError::malformed("expected '<scheme> <parameters>'"))?;

        if !scheme.eq_ignore_ascii_case(AUTH_SCHEME) {
            return Err(VapidError::malformed(format!(
                "unsupported scheme '{scheme}', expected '{AUTH_SCHEME}'"
            )));
        }

        let mut token = None;
        let mut public_key = None;

        for param in params.split(',').map(str::trim_start) {
            if param.is_empty() {
                continue;
            }
            let (name, value) = param.split_once('=').ok_or_else(|| {
                VapidError::malformed(format!("parameter '{param}' is not name=value"))
            })?;

            let name = name.trim();
            let slot = match name {
                "t" => &mut token,
                "k" => &mut public_key,
                _ => continue,
            };
            if slot.is_some() {
                return Err(VapidError::malformed(format!(
                    "parameter '{name}' appears more than once"
                )));
            }
            if value.is_empty() {
                return Err(VapidError::malformed(format!("parameter '{name}' is empty")));
            }
            *slot = Some(value.to_string());
        }

        let token = token.ok_or_else(|| VapidError::malformed("missing 't' parameter"))?;
        let public_key = public_key.ok_or_else(|| VapidError::malformed("missing 'k' parameter"))?;

        Ok(Self { token, public_key })
    }

    /// Returns the compact ES256 token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the base64url public key text.
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Splits into `(token, public_key)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.token, self.public_key)
    }
}

impl fmt::Display for VapidAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{AUTH_SCHEME} t={}, k={}", self.token, self.public_key)
    }
}

impl FromStr for VapidAuthorization {
    type Err = VapidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Formats `vapid t=<token>, k=<public_key>`.
///
/// # Example
///
/// ```
/// use vapid_auth::build_authorization_header;
///
/// assert_eq!(build_authorization_header("abc.def.ghi", "BKey"), "vapid t=abc.def.ghi, k=BKey");
/// ```
#[must_use]
pub fn build_authorization_header(token: &str, public_key_text: &str) -> String {
    VapidAuthorization::new(token, public_key_text).to_string()
}

/// Extracts `(token, public_key_text)` from a header value.
///
/// # Errors
///
/// See [`VapidAuthorization::parse`].
pub fn parse_authorization_header(header: &str) -> Result<(String, String), VapidError> {
    VapidAuthorization::parse(header).map(VapidAuthorization::into_parts)
}
