//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use vapid_auth::prelude::*;
//!
//! let signer = VapidSigner::generate("ops@example.com", false).unwrap();
//! let header = signer.authorization_header("https://push.example.com/abc").unwrap();
//! let auth: VapidAuthorization = header.parse().unwrap();
//! ```
//!
//! Codec helpers and constants stay at the crate root.

pub use crate::{
    // Core types
    ExportedKeys, VapidAuthorization, VapidClaims, VapidKeyPair, VapidPublicKey, VapidSigner,
    // Builders and configuration
    VapidClaimsBuilder, VapidConfig,
    // Errors
    VapidError,
    // Functions
    build_authorization_header, generate_vapid_keys, parse_authorization_header, sign_claims,
    vapid_authorization_header,
};
