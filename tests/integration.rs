//! Integration tests for vapid-auth.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use p256::ecdsa::Signature;
use p256::ecdsa::signature::Verifier;
use vapid_auth::{
    MAX_TOKEN_TTL, VapidAuthorization, VapidClaims, VapidConfig, VapidError, VapidKeyPair,
    VapidPublicKey, VapidSigner, decode_base64, decode_private_key, generate_vapid_keys,
    parse_authorization_header, sign_claims, vapid_authorization_header,
};

const ENDPOINT: &str = "https://updates.push.services.mozilla.com/wpush/v2/gAAAAABkZ3Rlc3Q";

/// Splits a token into its signing input and decoded claims, checking the
/// ES256 signature against `public_key_text` on the way.
fn verify_token(token: &str, public_key_text: &str) -> Result<VapidClaims, String> {
    let (input, signature) = token.rsplit_once('.').ok_or("token has no signature")?;
    let signature_bytes = decode_base64(signature).map_err(|e| e.to_string())?.bytes;
    let signature = Signature::from_slice(&signature_bytes).map_err(|e| e.to_string())?;

    let public_key = VapidPublicKey::from_text(public_key_text).map_err(|e| e.to_string())?;
    public_key
        .verifying_key()
        .verify(input.as_bytes(), &signature)
        .map_err(|e| e.to_string())?;

    let (_, payload) = input.split_once('.').ok_or("token has no payload")?;
    let payload = decode_base64(payload).map_err(|e| e.to_string())?.bytes;
    serde_json::from_slice(&payload).map_err(|e| e.to_string())
}

fn end_to_end(subject: &str, subject_is_url: bool) -> VapidClaims {
    // Arrange
    let (private_key, public_key) = generate_vapid_keys().unwrap();

    // Act
    let header = vapid_authorization_header(
        ENDPOINT,
        subject,
        subject_is_url,
        &public_key,
        &private_key,
        None,
    )
    .unwrap();
    let (token, key) = parse_authorization_header(&header).unwrap();

    // Assert
    assert!(header.starts_with("vapid "));
    assert_eq!(header.matches("t=").count(), 1);
    assert_eq!(header.matches(", k=").count(), 1);
    assert_eq!(key, public_key);
    verify_token(&token, &key).unwrap()
}

#[test]
fn end_to_end_with_email_subject() {
    let claims = end_to_end("test@test.com", false);

    assert_eq!(claims.sub, "mailto:test@test.com");
    assert_eq!(claims.aud, "https://updates.push.services.mozilla.com");
    assert!(!claims.is_expired());
}

#[test]
fn end_to_end_with_url_subject() {
    let claims = end_to_end("https://test.com/", true);

    assert_eq!(claims.sub, "https://test.com/");
    assert!(!claims.aud.is_empty());
}

#[test]
fn token_fails_verification_with_other_key() {
    let signer = VapidSigner::generate("user@example.com", false).unwrap();
    let other = VapidKeyPair::generate().unwrap();

    let token = signer.sign(ENDPOINT).unwrap();

    assert!(verify_token(&token, signer.public_key_text()).is_ok());
    assert!(verify_token(&token, &other.public_key_text()).is_err());
}

#[test]
fn tampered_claims_fail_verification() {
    let signer = VapidSigner::generate("user@example.com", false).unwrap();
    let token = signer.sign(ENDPOINT).unwrap();

    let forged_claims = VapidClaims::for_endpoint(ENDPOINT, "attacker@example.com", false, None)
        .unwrap();
    let forged_payload = vapid_auth::encode_url_safe(serde_json::to_vec(&forged_claims).unwrap());
    let parts: Vec<&str> = token.split('.').collect();
    let forged = format!("{}.{forged_payload}.{}", parts[0], parts[2]);

    assert!(verify_token(&forged, signer.public_key_text()).is_err());
}

#[test]
fn sign_claims_accepts_decoded_key_text() {
    // Arrange
    let (private_key, public_key) = generate_vapid_keys().unwrap();
    let scalar = decode_private_key(&private_key).unwrap();
    let claims = VapidClaims::for_endpoint(
        "https://push.example.com/abc123",
        "user@example.com",
        false,
        None,
    )
    .unwrap();

    // Act
    let token = sign_claims(&claims, &scalar).unwrap();

    // Assert
    let verified = verify_token(&token, &public_key).unwrap();
    assert_eq!(verified, claims);
    assert_eq!(verified.aud, "https://push.example.com");
    assert_eq!(verified.sub, "mailto:user@example.com");
}

#[test]
fn padded_standard_key_text_is_accepted() {
    let scalar = decode_private_key("8Xq5BzDqeP9TqEfjt6ZB4TygtMd1ogwstfbAM3KF1W4=").unwrap();
    let key_pair = VapidKeyPair::from_private_scalar(&scalar).unwrap();

    let header = vapid_authorization_header(
        ENDPOINT,
        "test@test.com",
        false,
        &key_pair.public_key_text(),
        "8Xq5BzDqeP9TqEfjt6ZB4TygtMd1ogwstfbAM3KF1W4=",
        None,
    )
    .unwrap();

    let (token, key) = parse_authorization_header(&header).unwrap();
    assert!(verify_token(&token, &key).is_ok());
}

#[test]
fn sec1_container_key_text_is_accepted() {
    let sec1 = "MHcCAQEEIHF7ijDrb8gwj_9o7UuSx9t_oGlPMyOsG9YQLp3qJwLuoAoGCCqGSM49AwEHoUQDQgAEhB-nJdg0d5oOkdTYsKqbbuQ06ZUYkS0H-ELXsShIkpmcIVIO16Sj15YMBouesMbY4xPdepwF4Pj3QfaALRAG5Q";

    assert_eq!(
        decode_private_key(sec1).unwrap(),
        decode_private_key("cXuKMOtvyDCP/2jtS5LH23+gaU8zI6wb1hAuneonAu4=").unwrap()
    );

    let signer = VapidConfig::new(sec1, "test@test.com").into_signer().unwrap();
    let token = signer.sign(ENDPOINT).unwrap();
    assert!(verify_token(&token, signer.public_key_text()).is_ok());
}

#[test]
fn long_ttl_is_clamped_not_rejected() {
    let signer = VapidSigner::generate("user@example.com", false)
        .unwrap()
        .with_default_ttl(Duration::from_secs(30 * 24 * 60 * 60));

    let before = chrono::Utc::now().timestamp();
    let token = signer.sign(ENDPOINT).unwrap();
    let claims = verify_token(&token, signer.public_key_text()).unwrap();

    let max = i64::try_from(MAX_TOKEN_TTL.as_secs()).unwrap();
    assert!(claims.exp <= chrono::Utc::now().timestamp() + max);
    assert!(claims.exp >= before + max);
}

#[test]
fn authorization_round_trips_through_text() {
    let signer = VapidSigner::generate("user@example.com", false).unwrap();

    let auth = signer.authorization(ENDPOINT).unwrap();
    let reparsed: VapidAuthorization = auth.to_string().parse().unwrap();

    assert_eq!(reparsed, auth);
}

#[test]
fn invalid_endpoint_is_reported() {
    let (private_key, public_key) = generate_vapid_keys().unwrap();

    let result = vapid_authorization_header(
        "/relative/path",
        "user@example.com",
        false,
        &public_key,
        &private_key,
        None,
    );

    assert!(matches!(result, Err(VapidError::InvalidEndpoint { .. })));
}

#[test]
fn signer_is_shareable_across_threads() {
    let signer = Arc::new(VapidSigner::generate("user@example.com", false).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let signer = Arc::clone(&signer);
            thread::spawn(move || {
                let endpoint = format!("https://push{i}.example.com/sub/{i}");
                (endpoint.clone(), signer.sign(&endpoint).unwrap())
            })
        })
        .collect();

    for handle in handles {
        let (endpoint, token) = handle.join().unwrap();
        let claims = verify_token(&token, signer.public_key_text()).unwrap();
        assert_eq!(Some(claims.aud.as_str()), endpoint.rsplitn(3, '/').last());
    }
}

#[test]
fn concurrent_generation_yields_distinct_keys() {
    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(|| generate_vapid_keys().unwrap()))
        .collect();

    let mut private_keys: Vec<String> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap().0)
        .collect();
    private_keys.sort();
    private_keys.dedup();

    assert_eq!(private_keys.len(), 8);
}
