//! Key text decoding and encoding.
//!
//! VAPID keys are exchanged as text and arrive from many tools: padded
//! standard base64, unpadded base64url, bare 32-byte scalars or complete
//! `ECPrivateKey` structures. Decoding is a fixed ladder of attempts with no
//! format flag from the caller:
//!
//! 1. standard base64 (`+`, `/`), padding optional
//! 2. URL-safe base64 (`-`, `_`), padding optional
//!
//! The first alphabet that decodes wins. The decoded bytes are then a raw
//! scalar when they are exactly 32 bytes long, otherwise a SEC1 or PKCS#8 DER
//! container is parsed and its scalar extracted.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use p256::SecretKey;
use p256::ecdsa::VerifyingKey;
use p256::pkcs8::DecodePrivateKey;

use crate::constants::{PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH};
use crate::error::VapidError;

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_encode_padding(false)
    .with_decode_allow_trailing_bits(true)
    .with_decode_padding_mode(DecodePaddingMode::Indifferent);

static STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
static URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Base64 alphabet a piece of key text was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base64Variant {
    /// RFC 4648 §4 alphabet (`+`, `/`)
    Standard,
    /// RFC 4648 §5 alphabet (`-`, `_`)
    UrlSafe,
}

impl Base64Variant {
    /// Variants in the order decoding tries them.
    pub const PRIORITY: [Self; 2] = [Self::Standard, Self::UrlSafe];

    /// Short name used in log events.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::UrlSafe => "url-safe",
        }
    }

    fn engine(self) -> &'static GeneralPurpose {
        match self {
            Self::Standard => &STANDARD_LENIENT,
            Self::UrlSafe => &URL_SAFE_LENIENT,
        }
    }
}

/// Bytes recovered from key text, tagged with the alphabet that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedKey {
    /// Alphabet the text decoded under
    pub variant: Base64Variant,
    /// Decoded bytes
    pub bytes: Vec<u8>,
}

/// Shape of the bytes a private scalar was recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrivateKeyForm {
    RawScalar,
    Sec1Der,
    Pkcs8Der,
}

impl PrivateKeyForm {
    const fn name(self) -> &'static str {
        match self {
            Self::RawScalar => "raw-scalar",
            Self::Sec1Der => "sec1-der",
            Self::Pkcs8Der => "pkcs8-der",
        }
    }
}

/// Decodes key text with the first base64 alphabet that accepts it.
///
/// Surrounding whitespace and embedded line breaks are ignored, padding is
/// optional under both alphabets, and non-zero trailing bits are accepted.
///
/// # Errors
///
/// Returns `VapidError::InvalidKeyEncoding` if the text is empty or decodes
/// under neither alphabet.
///
/// # Example
///
/// ```
/// use vapid_auth::{decode_base64, Base64Variant};
///
/// let decoded = decode_base64("-_8").unwrap();
/// assert_eq!(decoded.variant, Base64Variant::UrlSafe);
/// assert_eq!(decoded.bytes, vec![0xfb, 0xff]);
/// ```
pub fn decode_base64(input: &str) -> Result<DecodedKey, VapidError> {
    // line-wrapped key text
    let text: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect();
    if text.is_empty() {
        return Err(VapidError::encoding("key text is empty"));
    }

    Base64Variant::PRIORITY
        .into_iter()
        .find_map(|variant| {
            variant
                .engine()
                .decode(&text)
                .ok()
                .map(|bytes| DecodedKey { variant, bytes })
        })
        .ok_or_else(|| VapidError::encoding("text is neither standard nor URL-safe base64"))
}

/// Decodes VAPID private key text into the raw 32-byte scalar.
///
/// Accepts a bare scalar as well as SEC1 (`openssl ec` style) or PKCS#8 DER
/// containers, under either base64 alphabet. A bare scalar is returned
/// without range checks; signing rejects zero or out-of-range scalars.
///
/// # Errors
///
/// - `VapidError::InvalidKeyEncoding` if the text is not base64
/// - `VapidError::InvalidKeyLength` if the bytes are neither a 32-byte
///   scalar nor a parseable DER container
///
/// # Example
///
/// ```
/// use vapid_auth::decode_private_key;
///
/// let padded = decode_private_key("cXuKMOtvyDCP/2jtS5LH23+gaU8zI6wb1hAuneonAu4=").unwrap();
/// let unpadded = decode_private_key("cXuKMOtvyDCP_2jtS5LH23-gaU8zI6wb1hAuneonAu4").unwrap();
/// assert_eq!(padded, unpadded);
/// ```
pub fn decode_private_key(input: &str) -> Result<[u8; PRIVATE_KEY_LENGTH], VapidError> {
    let decoded = decode_base64(input)?;
    let (scalar, form) = scalar_from_bytes(&decoded.bytes)?;

    tracing::debug!(
        variant = decoded.variant.name(),
        form = form.name(),
        "decoded VAPID private key"
    );

    Ok(scalar)
}

fn scalar_from_bytes(
    bytes: &[u8],
) -> Result<([u8; PRIVATE_KEY_LENGTH], PrivateKeyForm), VapidError> {
    if let Ok(scalar) = <[u8; PRIVATE_KEY_LENGTH]>::try_from(bytes) {
        return Ok((scalar, PrivateKeyForm::RawScalar));
    }

    let invalid_length = VapidError::InvalidKeyLength {
        actual: bytes.len(),
    };
    if bytes.len() < PRIVATE_KEY_LENGTH {
        return Err(invalid_length);
    }

    let (secret, form) = if let Ok(secret) = SecretKey::from_sec1_der(bytes) {
        (secret, PrivateKeyForm::Sec1Der)
    } else if let Ok(secret) = SecretKey::from_pkcs8_der(bytes) {
        (secret, PrivateKeyForm::Pkcs8Der)
    } else {
        return Err(invalid_length);
    };

    let mut scalar = [0u8; PRIVATE_KEY_LENGTH];
    scalar.copy_from_slice(&secret.to_bytes());
    Ok((scalar, form))
}

/// Decodes public key text into a validated uncompressed P-256 point.
///
/// # Errors
///
/// - `VapidError::InvalidKeyEncoding` if the text is not base64 or the bytes
///   are not an uncompressed point on P-256
/// - `VapidError::InvalidKeyLength` if the bytes are not 65 long
pub fn decode_public_key(input: &str) -> Result<[u8; PUBLIC_KEY_LENGTH], VapidError> {
    let decoded = decode_base64(input)?;
    let point = <[u8; PUBLIC_KEY_LENGTH]>::try_from(decoded.bytes.as_slice()).map_err(|_| {
        VapidError::InvalidKeyLength {
            actual: decoded.bytes.len(),
        }
    })?;
    validate_public_point(&point)?;
    Ok(point)
}

pub(crate) fn validate_public_point(point: &[u8; PUBLIC_KEY_LENGTH]) -> Result<(), VapidError> {
    if point[0] != 0x04 {
        return Err(VapidError::encoding(
            "public key must be an uncompressed point starting with 0x04",
        ));
    }
    VerifyingKey::from_sec1_bytes(point)
        .map(|_| ())
        .map_err(|_| VapidError::encoding("public key is not a point on P-256"))
}

/// Encodes bytes as unpadded URL-safe base64.
///
/// This is the form both halves of a VAPID key pair are exported in.
#[must_use]
pub fn encode_url_safe(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}
