use sponowcli::spotify::auth::login_url_for;
use sponowcli::utils::*;

const VERIFIER_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier(128).unwrap();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only unreserved characters
    assert!(verifier.chars().all(|c| VERIFIER_ALPHABET.contains(c)));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier(128).unwrap();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_verifier_honors_requested_length() {
    for length in [MIN_VERIFIER_LENGTH, 64, MAX_VERIFIER_LENGTH] {
        let verifier = generate_code_verifier(length).unwrap();
        assert_eq!(verifier.len(), length);
    }
}

#[test]
fn test_generate_code_verifier_rejects_out_of_range_length() {
    assert!(generate_code_verifier(MIN_VERIFIER_LENGTH - 1).is_err());
    assert!(generate_code_verifier(MAX_VERIFIER_LENGTH + 1).is_err());
    assert!(generate_code_verifier(0).is_err());
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should not be empty
    assert!(!challenge.is_empty());

    // Should be deterministic - same input produces same output
    let challenge2 = generate_code_challenge(verifier);
    assert_eq!(challenge, challenge2);

    // Different input should produce different output
    let challenge3 = generate_code_challenge("different_verifier");
    assert_ne!(challenge, challenge3);

    // Should be base64-encoded (URL-safe, no padding)
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_generate_code_challenge_matches_rfc_7636_vector() {
    // Appendix B of RFC 7636
    let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    assert_eq!(
        generate_code_challenge(verifier),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
    );
}

#[test]
fn test_login_url_carries_required_parameters() {
    let url = login_url_for(
        "https://accounts.spotify.com/authorize",
        "client123",
        "http://127.0.0.1:8080/callback",
        "user-read-currently-playing user-read-playback-state",
        "challenge_abc",
    )
    .unwrap();

    assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
    assert!(url.contains("client_id=client123"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("code_challenge_method=S256"));
    assert!(url.contains("code_challenge=challenge_abc"));
    assert!(url.contains("show_dialog=true"));
    assert!(url.contains("user-read-currently-playing"));
    assert!(url.contains("user-read-playback-state"));

    // Redirect URI must be percent-encoded
    assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8080%2Fcallback"));
}

#[test]
fn test_login_url_rejects_invalid_base() {
    assert!(login_url_for("not a url", "id", "uri", "scope", "challenge").is_err());
}
