//! VAPID (RFC 8292) authentication for Web Push.
//!
//! This crate covers the application server side of VAPID: generating the
//! P-256 identity, turning a push endpoint into signed ES256 claims, and
//! producing the `Authorization` header a push service expects.
//!
//! # Overview
//!
//! A push request is authenticated with:
//!
//! ```text
//! Authorization: vapid t=<header>.<claims>.<signature>, k=<public-key>
//! ```
//!
//! where the claims are `{"aud":<push-service-origin>,"exp":<unix-seconds>,"sub":<contact>}`
//! and the signature is a raw 64-byte ECDSA P-256 / SHA-256 signature.
//!
//! # Quick Start
//!
//! ```rust
//! use vapid_auth::{generate_vapid_keys, vapid_authorization_header};
//!
//! // Once, at setup: persist both halves, give the public one to browsers
//! let (private_key, public_key) = generate_vapid_keys().unwrap();
//!
//! // Per push request
//! let header = vapid_authorization_header(
//!     "https://fcm.googleapis.com/fcm/send/abc123",
//!     "ops@example.com",
//!     false,
//!     &public_key,
//!     &private_key,
//!     None,
//! )
//! .unwrap();
//!
//! assert!(header.starts_with("vapid t="));
//! ```
//!
//! # Long-lived Signer
//!
//! ```rust
//! use vapid_auth::{VapidKeyPair, VapidSigner};
//! use std::time::Duration;
//!
//! let key_pair = VapidKeyPair::generate().unwrap();
//! let signer = VapidSigner::new(key_pair, "https://example.com/contact", true)
//!     .with_default_ttl(Duration::from_secs(3600));
//!
//! let auth = signer.authorization("https://updates.push.services.mozilla.com/wpush/v2/x").unwrap();
//! assert_eq!(auth.public_key(), signer.public_key_text());
//! ```
//!
//! # Key Formats
//!
//! | Key | Bytes | Exported text |
//! |-----|-------|---------------|
//! | Private | 32 (scalar) | 43 chars, unpadded base64url |
//! | Public | 65 (`0x04 \|\| X \|\| Y`) | 87 chars, unpadded base64url |
//!
//! Private keys are also read from padded standard base64 and from SEC1 or
//! PKCS#8 DER containers; see [`decode_private_key`].
//!
//! # Token Lifetime
//!
//! Tokens default to 12 hours. Longer lifetimes are clamped to 24 hours, the
//! most push services accept.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod claims;
mod codec;
mod config;
mod constants;
mod error;
mod header;
mod keys;
pub mod prelude;
mod signer;
mod token;

pub use claims::{VapidClaims, VapidClaimsBuilder, audience};
pub use codec::{
    Base64Variant, DecodedKey, decode_base64, decode_private_key, decode_public_key,
    encode_url_safe,
};
pub use config::VapidConfig;
pub use constants::{
    ALGORITHM, AUTH_SCHEME, DEFAULT_TOKEN_TTL, MAILTO_PREFIX, MAX_TOKEN_TTL, MIN_TOKEN_TTL,
    PRIVATE_KEY_LENGTH, PRIVATE_KEY_TEXT_LENGTH, PUBLIC_KEY_LENGTH, PUBLIC_KEY_TEXT_LENGTH,
    SIGNATURE_LENGTH, TOKEN_TYPE,
};
pub use error::VapidError;
pub use header::{VapidAuthorization, build_authorization_header, parse_authorization_header};
pub use keys::{ExportedKeys, VapidKeyPair, VapidPublicKey, generate_vapid_keys};
pub use signer::{VapidSigner, vapid_authorization_header};
pub use token::{TokenHeader, sign_claims, sign_claims_with_key};
