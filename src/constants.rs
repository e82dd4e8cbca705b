//! Constants for VAPID key material, tokens and headers.

use std::time::Duration;

/// Length of a raw P-256 private scalar in bytes.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Length of an uncompressed SEC1 P-256 point (`0x04 || X || Y`) in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 65;

/// Length of a raw `r || s` ES256 signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Length of the unpadded base64url private key text.
pub const PRIVATE_KEY_TEXT_LENGTH: usize = 43;

/// Length of the unpadded base64url public key text.
pub const PUBLIC_KEY_TEXT_LENGTH: usize = 87;

/// Token lifetime used when the caller does not pick one (12 hours).
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_hours(12);

/// Longest token lifetime a push service accepts (24 hours).
pub const MAX_TOKEN_TTL: Duration = Duration::from_hours(24);

/// Shortest token lifetime; keeps `exp` strictly in the future.
pub const MIN_TOKEN_TTL: Duration = Duration::from_secs(1);

/// The `Authorization` header scheme.
pub const AUTH_SCHEME: &str = "vapid";

/// JWS `alg` value for ECDSA P-256 with SHA-256.
pub const ALGORITHM: &str = "ES256";

/// JWS `typ` value.
pub const TOKEN_TYPE: &str = "JWT";

/// Prefix applied to e-mail subjects.
pub const MAILTO_PREFIX: &str = "mailto:";
